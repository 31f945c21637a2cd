use crate::error::Result;
use crate::minecraft::api::mc_api::{ExternalProfileClient, MinecraftApiService};
use crate::state::config_state::ServerConfig;
use crate::state::texture_state::{LocalTextureStore, TextureStore};
use std::sync::Arc;

/// Shared handles injected into every texture route.
#[derive(Clone)]
pub struct AppState {
    pub texture_store: Arc<dyn TextureStore>,
    pub profile_client: Arc<dyn ExternalProfileClient>,
}

impl AppState {
    pub fn new(
        texture_store: Arc<dyn TextureStore>,
        profile_client: Arc<dyn ExternalProfileClient>,
    ) -> Self {
        Self {
            texture_store,
            profile_client,
        }
    }

    /// Production wiring: local texture store plus the Mojang REST client.
    pub async fn init(config: &ServerConfig) -> Result<Self> {
        log::info!("AppState::init - Loading texture store from {:?}", config.data_dir);
        let store = LocalTextureStore::new(&config.data_dir);
        store.load().await?;

        let client =
            MinecraftApiService::with_base_urls(&config.mojang_api_url, &config.session_server_url);
        log::info!(
            "AppState::init - Using Mojang API {} and session server {}",
            config.mojang_api_url,
            config.session_server_url
        );

        Ok(Self::new(Arc::new(store), Arc::new(client)))
    }
}
