use directories::ProjectDirs;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::path::PathBuf;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "TEXTURE_SERVER_CONFIG";

const CONFIG_FILENAME: &str = "texture_server_config.json";

pub static SERVER_DIRECTORY: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("org", "yggdrasil", "texture-server"));

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// HTTP Client with server agent
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    reqwest::ClientBuilder::new()
        .user_agent(APP_USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Platform data directory, or `./data` when the platform offers none.
pub fn default_data_dir() -> PathBuf {
    match SERVER_DIRECTORY.as_ref() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("data"),
    }
}

/// Resolves the config file path: env override first, then the platform config dir.
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    match SERVER_DIRECTORY.as_ref() {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILENAME),
        None => PathBuf::from(CONFIG_FILENAME),
    }
}
