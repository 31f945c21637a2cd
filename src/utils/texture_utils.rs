use crate::minecraft::dto::minecraft_profile::TexturesData;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde_json::Value;

pub const TEXTURES_PROPERTY: &str = "textures";

/// Decodes the base64 JSON payload of a `textures` property.
pub fn decode_textures_value(value: &str) -> Option<TexturesData> {
    let decoded = match STANDARD.decode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Skipping textures property: invalid base64 ({})", e);
            return None;
        }
    };

    match serde_json::from_slice::<TexturesData>(&decoded) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("Skipping textures property: invalid manifest JSON ({})", e);
            None
        }
    }
}

/// Extracts `textures.SKIN.url` from one raw profile property entry.
///
/// Only `name` and `value` are looked at; `signature` or any other field may
/// have any shape. Entries that are not `textures` properties, or that fail
/// at any decoding step, yield `None`.
pub fn skin_url_from_property(entry: &Value) -> Option<String> {
    if entry.get("name").and_then(Value::as_str) != Some(TEXTURES_PROPERTY) {
        return None;
    }
    let value = entry.get("value").and_then(Value::as_str)?;
    decode_textures_value(value)?.skin_url().map(str::to_string)
}

/// First decodable skin url in property order.
pub fn first_skin_url(entries: &[Value]) -> Option<String> {
    entries.iter().find_map(skin_url_from_property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(manifest: &Value) -> String {
        STANDARD.encode(manifest.to_string())
    }

    #[test]
    fn test_decodes_skin_url() {
        let value = encode(&json!({
            "timestamp": 1700000000000i64,
            "profileId": "069a79f444e94726a5befca90e38aaf5",
            "profileName": "Notch",
            "textures": {
                "SKIN": {"url": "https://example/s.png", "metadata": {"model": "slim"}},
                "CAPE": {"url": "https://example/c.png"}
            }
        }));
        let entry = json!({"name": "textures", "value": value, "signature": "sig"});
        assert_eq!(
            skin_url_from_property(&entry).as_deref(),
            Some("https://example/s.png")
        );
    }

    #[test]
    fn test_skips_broken_entries() {
        assert!(skin_url_from_property(&json!("not an object")).is_none());
        assert!(skin_url_from_property(&json!({"name": "textures", "value": 7})).is_none());
        assert!(skin_url_from_property(&json!({"name": "textures", "value": "%%%"})).is_none());
        assert!(skin_url_from_property(&json!({
            "name": "textures",
            "value": STANDARD.encode("not json")
        }))
        .is_none());
        assert!(skin_url_from_property(&json!({
            "name": "textures",
            "value": encode(&json!({"textures": {"CAPE": {"url": "https://c"}}}))
        }))
        .is_none());
        assert!(skin_url_from_property(&json!({
            "name": "other",
            "value": encode(&json!({"textures": {"SKIN": {"url": "https://s"}}}))
        }))
        .is_none());
    }

    #[test]
    fn test_unread_fields_do_not_hide_the_skin() {
        let manifests = [
            json!({"timestamp": "1700000000000", "textures": {"SKIN": {"url": "https://s"}}}),
            json!({"textures": {"SKIN": {"url": "https://s"}, "CAPE": {}}}),
            json!({"textures": {"SKIN": {"url": "https://s", "metadata": {"model": 1}}}}),
            json!({"profileId": 42, "profileName": null, "textures": {"SKIN": {"url": "https://s"}}}),
        ];
        for manifest in manifests {
            let entry = json!({"name": "textures", "value": encode(&manifest)});
            assert_eq!(
                skin_url_from_property(&entry).as_deref(),
                Some("https://s"),
                "manifest: {}",
                manifest
            );
        }

        let entry = json!({
            "name": "textures",
            "value": encode(&json!({"textures": {"SKIN": {"url": "https://s"}}})),
            "signature": 5
        });
        assert_eq!(skin_url_from_property(&entry).as_deref(), Some("https://s"));
    }

    #[test]
    fn test_first_match_wins() {
        let entries = vec![
            json!({"name": "textures", "value": "corrupt!"}),
            json!({"name": "textures", "value": encode(&json!({"textures": {"SKIN": {"url": "https://first"}}}))}),
            json!({"name": "textures", "value": encode(&json!({"textures": {"SKIN": {"url": "https://second"}}}))}),
        ];
        assert_eq!(first_skin_url(&entries).as_deref(), Some("https://first"));
        assert!(first_skin_url(&entries[..1]).is_none());
    }
}
