use crate::error::{AppError, Result, MESSAGE_INVALID_TEXTURE_TYPE};
use crate::minecraft::dto::texture_payloads::{
    ModelVariant, SetTextureRequest, SkinImportPolicy, TextureAssignment, TextureType,
};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use log::debug;
use url::Url;
use uuid::Uuid;

const MIN_BEARER_LEN: usize = 8;
const BEARER_PREFIX_LEN: usize = 7;

/// Strips the 7-character scheme prefix from `Authorization`.
///
/// Only presence and length are checked; the scheme itself is not compared.
pub fn access_token(headers: &HeaderMap) -> Result<String> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if header.len() < MIN_BEARER_LEN {
        return Err(AppError::InvalidToken);
    }
    header
        .get(BEARER_PREFIX_LEN..)
        .map(str::to_string)
        .ok_or(AppError::InvalidToken)
}

pub fn profile_id(segment: &str) -> Result<Uuid> {
    Uuid::parse_str(segment).map_err(|e| AppError::IllegalArgument(e.to_string()))
}

pub fn texture_type(segment: &str) -> Result<TextureType> {
    segment
        .parse::<TextureType>()
        .map_err(|_| AppError::IllegalArgument(MESSAGE_INVALID_TEXTURE_TYPE.to_string()))
}

/// Token, profile id and texture type, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureTarget {
    pub access_token: String,
    pub profile_id: Uuid,
    pub texture_type: TextureType,
}

pub fn texture_target(headers: &HeaderMap, uuid: &str, texture: &str) -> Result<TextureTarget> {
    let access_token = access_token(headers)?;
    let profile_id = profile_id(uuid)?;
    let texture_type = texture_type(texture)?;
    Ok(TextureTarget {
        access_token,
        profile_id,
        texture_type,
    })
}

/// Binds and validates a set-texture body. Failures are `ForbiddenOperation`.
pub fn bind_set_texture(body: &[u8]) -> Result<TextureAssignment> {
    let request: SetTextureRequest =
        serde_json::from_slice(body).map_err(|e| AppError::ForbiddenOperation(e.to_string()))?;
    debug!("Binding set-texture request: {:?}", request);

    let url = match request.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::ForbiddenOperation("url is required".to_string())),
    };
    Url::parse(&url)
        .map_err(|e| AppError::ForbiddenOperation(format!("url '{}' is invalid: {}", url, e)))?;

    let model = match request.model.as_deref() {
        None => ModelVariant::Classic,
        Some(model) => model
            .parse::<ModelVariant>()
            .map_err(AppError::ForbiddenOperation)?,
    };

    Ok(TextureAssignment {
        url,
        model,
        import: SkinImportPolicy::from_level(request.force_mojang_skin.unwrap_or(0)),
        username: request.username.filter(|name| !name.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_access_token() {
        assert_eq!(access_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(access_token(&headers("Bearer x")).unwrap(), "x");
        assert!(matches!(
            access_token(&headers("Bearer ")),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            access_token(&HeaderMap::new()),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_texture_target_order() {
        // token is checked before the path segments
        assert!(matches!(
            texture_target(&headers("short"), "nope", "nope"),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            texture_target(&headers("Bearer token"), "nope", "skin"),
            Err(AppError::IllegalArgument(_))
        ));
        let err = texture_target(
            &headers("Bearer token"),
            "069a79f444e94726a5befca90e38aaf5",
            "hat",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid texture type.");

        let target = texture_target(
            &headers("Bearer token"),
            "069a79f4-44e9-4726-a5be-fca90e38aaf5",
            "cape",
        )
        .unwrap();
        assert_eq!(target.access_token, "token");
        assert_eq!(target.texture_type, TextureType::Cape);
    }

    #[test]
    fn test_bind_set_texture() {
        let bound = bind_set_texture(br#"{"url": "https://example/a.png"}"#).unwrap();
        assert_eq!(bound.model, ModelVariant::Classic);
        assert_eq!(bound.import, SkinImportPolicy::None);
        assert_eq!(bound.username, None);

        let bound = bind_set_texture(
            br#"{"url": "https://example/a.png", "model": "slim", "forceMojangSkin": 2, "username": "Notch"}"#,
        )
        .unwrap();
        assert_eq!(bound.model, ModelVariant::Slim);
        assert_eq!(bound.import, SkinImportPolicy::ImportByAccount);
        assert_eq!(bound.username.as_deref(), Some("Notch"));
    }

    #[test]
    fn test_bind_failures_are_forbidden() {
        let bodies: [&[u8]; 8] = [
            b"",
            b"not json",
            br#"{}"#,
            br#"{"url": ""}"#,
            br#"{"url": "relative/path.png"}"#,
            br#"{"url": "https://example/a.png", "model": "classic"}"#,
            br#"{"url": "https://example/a.png", "model": ""}"#,
            br#"{"url": "https://example/a.png", "forceMojangSkin": "yes"}"#,
        ];
        for body in bodies {
            assert!(
                matches!(bind_set_texture(body), Err(AppError::ForbiddenOperation(_))),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }
}
