use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Skin,
    Cape,
}

impl TextureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureType::Skin => "skin",
            TextureType::Cape => "cape",
        }
    }
}

impl std::fmt::Display for TextureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureType {
    type Err = ();

    /// Only the exact lowercase wire values are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skin" => Ok(TextureType::Skin),
            "cape" => Ok(TextureType::Cape),
            _ => Err(()),
        }
    }
}

/// Player model a skin is drawn on. `Classic` is Steve, `Slim` is Alex.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    #[default]
    #[serde(rename = "default")]
    Classic,
    #[serde(rename = "slim")]
    Slim,
}

impl ModelVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Classic => "default",
            ModelVariant::Slim => "slim",
        }
    }

    /// Model field of the multipart upload form. Anything unrecognised is Classic.
    ///
    /// Yggdrasil clients send `ALEX`. Accepting `slim` as well is a deliberate
    /// extension of that contract so the form also takes this server's own model name.
    pub fn from_upload_field(value: &str) -> Self {
        match value {
            "ALEX" | "slim" => ModelVariant::Slim,
            _ => ModelVariant::Classic,
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ModelVariant::Classic),
            "slim" => Ok(ModelVariant::Slim),
            other => Err(format!(
                "model must be one of [slim default], got '{}'",
                other
            )),
        }
    }
}

/// How hard the server tries to replace the client's url with the official skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinImportPolicy {
    /// Keep the client url.
    None,
    /// Resolve the username to an account first, then continue as `ImportByProfile`
    /// against that account.
    ImportByAccount,
    /// Look up the path profile's official textures.
    ImportByProfile,
}

impl SkinImportPolicy {
    /// Maps the wire `forceMojangSkin` level. Level 2 is the only account-level
    /// import; every other positive level imports by profile.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => SkinImportPolicy::None,
            2 => SkinImportPolicy::ImportByAccount,
            _ => SkinImportPolicy::ImportByProfile,
        }
    }
}

/// Body of `PUT /texture/{uuid}/{textureType}` as it arrives on the wire.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetTextureRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub force_mojang_skin: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A validated set-texture body.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAssignment {
    pub url: String,
    pub model: ModelVariant,
    pub import: SkinImportPolicy,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_type_is_exact() {
        assert_eq!("skin".parse::<TextureType>(), Ok(TextureType::Skin));
        assert_eq!("cape".parse::<TextureType>(), Ok(TextureType::Cape));
        assert!("SKIN".parse::<TextureType>().is_err());
        assert!("elytra".parse::<TextureType>().is_err());
        assert!("".parse::<TextureType>().is_err());
    }

    #[test]
    fn test_model_variant_wire_values() {
        assert_eq!("default".parse::<ModelVariant>(), Ok(ModelVariant::Classic));
        assert_eq!("slim".parse::<ModelVariant>(), Ok(ModelVariant::Slim));
        assert!("classic".parse::<ModelVariant>().is_err());
        assert_eq!(ModelVariant::default(), ModelVariant::Classic);
        assert_eq!(ModelVariant::from_upload_field("ALEX"), ModelVariant::Slim);
        assert_eq!(ModelVariant::from_upload_field("slim"), ModelVariant::Slim);
        assert_eq!(ModelVariant::from_upload_field("STEVE"), ModelVariant::Classic);
        assert_eq!(ModelVariant::from_upload_field(""), ModelVariant::Classic);
    }

    #[test]
    fn test_import_policy_from_level() {
        assert_eq!(SkinImportPolicy::from_level(0), SkinImportPolicy::None);
        assert_eq!(SkinImportPolicy::from_level(-3), SkinImportPolicy::None);
        assert_eq!(
            SkinImportPolicy::from_level(1),
            SkinImportPolicy::ImportByProfile
        );
        assert_eq!(
            SkinImportPolicy::from_level(2),
            SkinImportPolicy::ImportByAccount
        );
        assert_eq!(
            SkinImportPolicy::from_level(3),
            SkinImportPolicy::ImportByProfile
        );
    }
}
