pub mod minecraft_profile;
pub mod texture_payloads;
