pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod minecraft;
pub mod state;
pub mod utils;
