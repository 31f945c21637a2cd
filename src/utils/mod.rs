pub mod hash_utils;
pub mod texture_utils; // Decoding of the Mojang `textures` profile property
