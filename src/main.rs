use log::{error, info};
use yggdrasil_texture_server_lib::commands::texture_router;
use yggdrasil_texture_server_lib::logging;
use yggdrasil_texture_server_lib::state::config_state::ConfigManager;
use yggdrasil_texture_server_lib::state::AppState;

#[tokio::main]
async fn main() {
    let config_manager = ConfigManager::new();
    let config = match config_manager.load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "ERROR: Could not load configuration from {:?}: {}",
                config_manager.config_path(),
                e
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::setup_logging(&config).await {
        eprintln!("ERROR: Logging could not be initialized: {}", e);
    }

    info!("Starting Yggdrasil texture server...");

    let state = match AppState::init(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("CRITICAL: Failed to initialize state: {}", e);
            std::process::exit(1);
        }
    };

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("CRITICAL: {}", e);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("CRITICAL: Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Texture server listening on http://{}", addr);

    let app = texture_router(state);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
    info!("Texture server shut down.");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // keep serving rather than exiting immediately
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
