pub mod request_gate;
pub mod texture_command;

pub use texture_command::texture_router;
