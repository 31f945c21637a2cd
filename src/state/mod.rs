pub mod config_state;
pub mod state_manager;
pub mod texture_state;

pub use state_manager::AppState;
