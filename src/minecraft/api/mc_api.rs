use crate::config::HTTP_CLIENT;
use crate::minecraft::dto::minecraft_profile::{MinecraftProfile, MojangAccount};
use crate::state::config_state::{DEFAULT_MOJANG_API_URL, DEFAULT_SESSION_SERVER_URL};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a single lookup against the external profile API.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The service answered 204: the account exists but has no public profile.
    #[error("no content")]
    NoContent,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Read-only lookups the skin resolver needs from the identity provider.
#[async_trait]
pub trait ExternalProfileClient: Send + Sync {
    /// `GET /users/profiles/minecraft/{username}`
    async fn resolve_account(&self, username: &str) -> Result<MojangAccount, LookupError>;

    /// `GET /session/minecraft/profile/{undashed uuid}`
    async fn resolve_profile(&self, profile_id: Uuid) -> Result<MinecraftProfile, LookupError>;
}

pub struct MinecraftApiService {
    client: Client,
    api_url: String,
    session_url: String,
}

impl MinecraftApiService {
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_MOJANG_API_URL, DEFAULT_SESSION_SERVER_URL)
    }

    pub fn with_base_urls(api_url: &str, session_url: &str) -> Self {
        Self::with_client(HTTP_CLIENT.clone(), api_url, session_url)
    }

    pub fn with_client(client: Client, api_url: &str, session_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            session_url: session_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_object<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        debug!("Request URL: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            debug!("API request failed: {:?}", e);
            LookupError::Transport(e)
        })?;

        let status = response.status();
        debug!("Received response with status: {}", status);

        if status == StatusCode::NO_CONTENT {
            return Err(LookupError::NoContent);
        }
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP Error {}", status));
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            debug!("Failed to parse response from {}: {}", url, e);
            LookupError::Malformed(e.to_string())
        })
    }
}

impl Default for MinecraftApiService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalProfileClient for MinecraftApiService {
    async fn resolve_account(&self, username: &str) -> Result<MojangAccount, LookupError> {
        debug!("API call: resolve_account for username: {}", username);
        let url = format!(
            "{}/users/profiles/minecraft/{}",
            self.api_url,
            urlencoding::encode(username)
        );
        let account = self.get_object::<MojangAccount>(&url).await?;
        debug!("API call completed: resolve_account -> {:?}", account.id);
        Ok(account)
    }

    async fn resolve_profile(&self, profile_id: Uuid) -> Result<MinecraftProfile, LookupError> {
        debug!("API call: resolve_profile for UUID: {}", profile_id);
        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.session_url,
            profile_id.simple()
        );
        let profile = self.get_object::<MinecraftProfile>(&url).await?;
        debug!("API call completed: resolve_profile");
        Ok(profile)
    }
}
