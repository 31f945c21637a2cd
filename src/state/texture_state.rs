use crate::config::HTTP_CLIENT;
use crate::error::{AppError, Result};
use crate::minecraft::dto::texture_payloads::{ModelVariant, TextureType};
use crate::utils::hash_utils::{calculate_sha256_from_bytes, is_sha256_hex};
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub const MAX_TEXTURE_SIZE: usize = 1 << 20;

const INDEX_FILENAME: &str = "texture_index.json";
const TEXTURES_DIRNAME: &str = "textures";

/// Persists texture bytes and profile → texture assignments.
#[async_trait]
pub trait TextureStore: Send + Sync {
    async fn get_texture(&self, hash: &str) -> Result<Vec<u8>>;

    async fn set_texture(
        &self,
        access_token: &str,
        profile_id: Uuid,
        url: &str,
        texture_type: TextureType,
        model: ModelVariant,
    ) -> Result<()>;

    async fn upload_texture(
        &self,
        access_token: &str,
        profile_id: Uuid,
        data: Vec<u8>,
        texture_type: TextureType,
        model: ModelVariant,
    ) -> Result<()>;

    async fn delete_texture(
        &self,
        access_token: &str,
        profile_id: Uuid,
        texture_type: TextureType,
    ) -> Result<()>;
}

/// A texture bound to a profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTexture {
    /// SHA-256 of the texture bytes, also the file name under `textures/`
    pub hash: String,
    pub model: ModelVariant,
    #[serde(default = "chrono::Utc::now")]
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileTextures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<StoredTexture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<StoredTexture>,
}

impl ProfileTextures {
    fn slot_mut(&mut self, texture_type: TextureType) -> &mut Option<StoredTexture> {
        match texture_type {
            TextureType::Skin => &mut self.skin,
            TextureType::Cape => &mut self.cape,
        }
    }

    fn is_empty(&self) -> bool {
        self.skin.is_none() && self.cape.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextureIndex {
    #[serde(default)]
    pub profiles: HashMap<Uuid, ProfileTextures>,
}

/// File-backed texture store: content-addressed bytes plus a JSON index.
///
/// Does not verify access tokens; that belongs to the auth service in front of it.
pub struct LocalTextureStore {
    index: Arc<RwLock<TextureIndex>>,
    index_path: PathBuf,
    textures_dir: PathBuf,
    save_lock: Mutex<()>,
    client: Client,
}

impl LocalTextureStore {
    pub fn new(data_dir: &Path) -> Self {
        Self::with_client(data_dir, HTTP_CLIENT.clone())
    }

    /// Same as [`LocalTextureStore::new`] but downloads `set_texture` urls with `client`.
    pub fn with_client(data_dir: &Path, client: Client) -> Self {
        info!(
            "LocalTextureStore: Initializing in {:?} (index loading deferred)",
            data_dir
        );
        Self {
            index: Arc::new(RwLock::new(TextureIndex::default())),
            index_path: data_dir.join(INDEX_FILENAME),
            textures_dir: data_dir.join(TEXTURES_DIRNAME),
            save_lock: Mutex::new(()),
            client,
        }
    }

    /// Loads the index from disk. A corrupt index is replaced by an empty one.
    pub async fn load(&self) -> Result<()> {
        fs::create_dir_all(&self.textures_dir).await?;

        if !self.index_path.exists() {
            info!("Texture index not found, starting with an empty index");
            self.save_index().await?;
            return Ok(());
        }

        info!("Loading texture index from: {:?}", self.index_path);
        let index_data = fs::read_to_string(&self.index_path).await?;

        match serde_json::from_str::<TextureIndex>(&index_data) {
            Ok(loaded) => {
                info!(
                    "Loaded texture index with {} profiles",
                    loaded.profiles.len()
                );
                *self.index.write().await = loaded;
            }
            Err(e) => {
                error!("Failed to parse texture index: {}", e);
                warn!("Using empty texture index and saving it");
                self.save_index().await?;
            }
        }

        Ok(())
    }

    async fn save_index(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;

        if let Some(parent_dir) = self.index_path.parent() {
            if !parent_dir.exists() {
                fs::create_dir_all(parent_dir).await?;
            }
        }

        let index_data = {
            let index = self.index.read().await;
            serde_json::to_string_pretty(&*index)?
        };
        fs::write(&self.index_path, index_data).await?;
        debug!("Saved texture index to: {:?}", self.index_path);
        Ok(())
    }

    pub async fn assignment(&self, profile_id: Uuid) -> Option<ProfileTextures> {
        self.index.read().await.profiles.get(&profile_id).cloned()
    }

    fn texture_path(&self, hash: &str) -> PathBuf {
        self.textures_dir.join(hash)
    }

    async fn write_texture(&self, data: &[u8]) -> Result<String> {
        let hash = calculate_sha256_from_bytes(data);
        let path = self.texture_path(&hash);
        if !path.exists() {
            fs::create_dir_all(&self.textures_dir).await?;
            fs::write(&path, data).await?;
            debug!("Stored texture {} ({} bytes)", hash, data.len());
        }
        Ok(hash)
    }

    async fn assign(
        &self,
        profile_id: Uuid,
        texture_type: TextureType,
        hash: String,
        model: ModelVariant,
    ) -> Result<()> {
        {
            let mut index = self.index.write().await;
            let entry = index.profiles.entry(profile_id).or_default();
            *entry.slot_mut(texture_type) = Some(StoredTexture {
                hash: hash.clone(),
                model,
                assigned_at: chrono::Utc::now(),
            });
        }
        self.save_index().await?;
        info!(
            "Assigned {} {} to profile {} (model {})",
            texture_type, hash, profile_id, model
        );
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading texture from: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Texture download from {} failed: {}", url, e);
                AppError::TextureDownload(e)
            })?;

        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(AppError::TextureDownload)?;
            if data.len() + chunk.len() > MAX_TEXTURE_SIZE {
                return Err(AppError::IllegalArgument(format!(
                    "Texture at {} is larger than 1MiB",
                    url
                )));
            }
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }
}

#[async_trait]
impl TextureStore for LocalTextureStore {
    async fn get_texture(&self, hash: &str) -> Result<Vec<u8>> {
        if !is_sha256_hex(hash) {
            return Err(AppError::TextureNotFound(hash.to_string()));
        }
        match fs::read(self.texture_path(hash)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::TextureNotFound(hash.to_string()))
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn set_texture(
        &self,
        _access_token: &str,
        profile_id: Uuid,
        url: &str,
        texture_type: TextureType,
        model: ModelVariant,
    ) -> Result<()> {
        let data = self.download(url).await?;
        let hash = self.write_texture(&data).await?;
        self.assign(profile_id, texture_type, hash, model).await
    }

    async fn upload_texture(
        &self,
        _access_token: &str,
        profile_id: Uuid,
        data: Vec<u8>,
        texture_type: TextureType,
        model: ModelVariant,
    ) -> Result<()> {
        let hash = self.write_texture(&data).await?;
        self.assign(profile_id, texture_type, hash, model).await
    }

    async fn delete_texture(
        &self,
        _access_token: &str,
        profile_id: Uuid,
        texture_type: TextureType,
    ) -> Result<()> {
        let removed = {
            let mut index = self.index.write().await;
            let removed = match index.profiles.get_mut(&profile_id) {
                Some(entry) => entry.slot_mut(texture_type).take().is_some(),
                None => false,
            };
            if index
                .profiles
                .get(&profile_id)
                .is_some_and(ProfileTextures::is_empty)
            {
                index.profiles.remove(&profile_id);
            }
            removed
        };

        if removed {
            info!("Removed {} from profile {}", texture_type, profile_id);
            self.save_index().await?;
        } else {
            debug!("No {} assigned to profile {}", texture_type, profile_id);
        }
        Ok(())
    }
}
