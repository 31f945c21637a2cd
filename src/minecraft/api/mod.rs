pub mod mc_api;

pub use mc_api::{ExternalProfileClient, LookupError, MinecraftApiService};
