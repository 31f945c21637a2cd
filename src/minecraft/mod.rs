pub mod api;
pub mod dto;
pub mod skin_import;

pub use api::*;
