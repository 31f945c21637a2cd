#![allow(non_snake_case)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account as returned by Mojang's username lookup.
///
/// Both fields stay optional: a response missing either one is a lookup miss,
/// not a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MojangAccount {
    /// Player UUID (without hyphens)
    #[serde(default)]
    pub id: Option<String>,
    /// Player username
    #[serde(default)]
    pub name: Option<String>,
}

/// Represents a Minecraft player profile as returned by Mojang's session server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinecraftProfile {
    /// Player UUID (without hyphens)
    #[serde(default)]
    pub id: Option<String>,
    /// Player username
    #[serde(default)]
    pub name: Option<String>,
    /// Raw `properties` field; kept untyped so a missing field, a non-list
    /// and an empty list can be told apart from each other.
    #[serde(default)]
    pub properties: Option<Value>,
}

impl MinecraftProfile {
    /// The property entries, or `None` when the field is absent, not a list, or empty.
    pub fn property_entries(&self) -> Option<&[Value]> {
        match self.properties.as_ref().and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => Some(entries.as_slice()),
            _ => None,
        }
    }
}

/// The part of a decoded `textures` manifest this server reads.
///
/// Only `textures.SKIN.url` is declared, so timestamps, profile fields, capes
/// and metadata are ignored whatever shape they have.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TexturesData {
    #[serde(default)]
    pub textures: Option<TexturesDictionary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TexturesDictionary {
    #[serde(default)]
    pub SKIN: Option<TextureInfo>,
}

/// Information about a skin texture
#[derive(Debug, Clone, Deserialize)]
pub struct TextureInfo {
    /// URL to the texture image
    pub url: String,
}

impl TexturesData {
    pub fn skin_url(&self) -> Option<&str> {
        self.textures
            .as_ref()
            .and_then(|t| t.SKIN.as_ref())
            .map(|skin| skin.url.as_str())
    }
}
