use crate::config::{config_file_path, default_data_dir};
use crate::error::{AppError, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

const CONFIG_CURRENT_VERSION: u32 = 1;

pub const DEFAULT_MOJANG_API_URL: &str = "https://api.mojang.com";
pub const DEFAULT_SESSION_SERVER_URL: &str = "https://sessionserver.mojang.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Falls back to `<data_dir>/logs` when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_mojang_api_url")]
    pub mojang_api_url: String,
    #[serde(default = "default_session_server_url")]
    pub session_server_url: String,
}

fn default_config_version() -> u32 {
    CONFIG_CURRENT_VERSION
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mojang_api_url() -> String {
    DEFAULT_MOJANG_API_URL.to_string()
}

fn default_session_server_url() -> String {
    DEFAULT_SESSION_SERVER_URL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_CURRENT_VERSION,
            bind_address: default_bind_address(),
            data_dir: default_data_dir(),
            log_dir: None,
            log_level: default_log_level(),
            mojang_api_url: default_mojang_api_url(),
            session_server_url: default_session_server_url(),
        }
    }
}

impl ServerConfig {
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            AppError::Config(format!(
                "Invalid bind_address '{}': {}",
                self.bind_address, e
            ))
        })
    }
}

/// Loads and persists the server configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
    save_lock: Mutex<()>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(config_file_path())
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self {
            config_path,
            save_lock: Mutex::new(()),
        }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Reads the config file. A missing file is created with defaults; an
    /// unparsable one is left untouched and defaults are used instead.
    pub async fn load(&self) -> Result<ServerConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found at {:?}, writing default configuration",
                self.config_path
            );
            let config = ServerConfig::default();
            self.save(&config).await?;
            return Ok(config);
        }

        info!("Loading server configuration from: {:?}", self.config_path);
        let config_data = fs::read_to_string(&self.config_path).await?;

        match serde_json::from_str::<ServerConfig>(&config_data) {
            Ok(config) => {
                debug!("Loaded config: {:?}", config);
                if config.version != CONFIG_CURRENT_VERSION {
                    warn!(
                        "Config version {} differs from current version {}",
                        config.version, CONFIG_CURRENT_VERSION
                    );
                }
                Ok(config)
            }
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                warn!("Using default configuration; the broken file is kept as-is");
                Ok(ServerConfig::default())
            }
        }
    }

    pub async fn save(&self, config: &ServerConfig) -> Result<()> {
        let _guard = self.save_lock.lock().await;

        if let Some(parent_dir) = self.config_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir).await?;
                info!("Created directory for config file: {:?}", parent_dir);
            }
        }

        let config_data = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, config_data).await?;
        info!("Saved server configuration to: {:?}", self.config_path);
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
