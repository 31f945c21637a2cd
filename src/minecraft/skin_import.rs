use crate::error::{AppError, Result};
use crate::minecraft::api::mc_api::{ExternalProfileClient, LookupError};
use crate::minecraft::dto::minecraft_profile::MojangAccount;
use crate::minecraft::dto::texture_payloads::{SkinImportPolicy, TextureAssignment};
use crate::utils::texture_utils::first_skin_url;
use log::{debug, info, warn};
use uuid::Uuid;

/// What a username lookup produced, before it is folded into a result.
#[derive(Debug, PartialEq)]
pub enum AccountLookupOutcome {
    Resolved(Uuid),
    NoUsername,
    LookupFailed,
    NameMissing,
    IdMissing,
    IdUnparseable,
}

impl AccountLookupOutcome {
    pub fn classify(username: &str, lookup: std::result::Result<MojangAccount, LookupError>) -> Self {
        let account = match lookup {
            Ok(account) => account,
            Err(e) => {
                debug!("Account lookup for '{}' failed: {}", username, e);
                return AccountLookupOutcome::LookupFailed;
            }
        };
        if account.name.is_none() {
            return AccountLookupOutcome::NameMissing;
        }
        match account.id.as_deref() {
            None => AccountLookupOutcome::IdMissing,
            Some(id) => match Uuid::parse_str(id) {
                Ok(uuid) => AccountLookupOutcome::Resolved(uuid),
                Err(_) => AccountLookupOutcome::IdUnparseable,
            },
        }
    }

    /// Every miss collapses to NotFound; the caller cannot tell a bad username
    /// from a network error.
    pub fn into_result(self, username: &str) -> Result<Uuid> {
        match self {
            AccountLookupOutcome::Resolved(uuid) => Ok(uuid),
            AccountLookupOutcome::NoUsername
            | AccountLookupOutcome::LookupFailed
            | AccountLookupOutcome::NameMissing
            | AccountLookupOutcome::IdMissing
            | AccountLookupOutcome::IdUnparseable => Err(AppError::NotFound(format!(
                "Mojang account '{}' could not be resolved",
                username
            ))),
        }
    }
}

/// Swaps a client-declared texture url for the player's official Mojang skin.
pub struct MojangSkinResolver<'a> {
    client: &'a dyn ExternalProfileClient,
}

impl<'a> MojangSkinResolver<'a> {
    pub fn new(client: &'a dyn ExternalProfileClient) -> Self {
        Self { client }
    }

    /// Returns the url that should be stored for `profile_id`.
    pub async fn resolve(&self, assignment: &TextureAssignment, profile_id: Uuid) -> Result<String> {
        let target_id = match assignment.import {
            SkinImportPolicy::None => return Ok(assignment.url.clone()),
            SkinImportPolicy::ImportByAccount => {
                self.resolve_account_id(assignment.username.as_deref())
                    .await?
            }
            SkinImportPolicy::ImportByProfile => profile_id,
        };

        debug!(
            "Importing Mojang skin for profile {} from account {}",
            profile_id, target_id
        );

        let profile = match self.client.resolve_profile(target_id).await {
            Ok(profile) => profile,
            Err(LookupError::NoContent) => {
                return Err(AppError::NotFound(format!(
                    "Mojang profile {} has no public profile",
                    target_id.simple()
                )));
            }
            Err(e) => return Err(AppError::ExternalLookup(e)),
        };

        let entries = profile.property_entries().ok_or_else(|| {
            AppError::Processing("properties not found or of incorrect type in result".to_string())
        })?;

        match first_skin_url(entries) {
            Some(url) => {
                info!("Imported Mojang skin for profile {}: {}", profile_id, url);
                Ok(url)
            }
            None => {
                // TODO: decide whether a profile without a decodable skin should be NotFound
                warn!(
                    "No decodable skin in Mojang profile {}, keeping client url",
                    target_id.simple()
                );
                Ok(assignment.url.clone())
            }
        }
    }

    async fn resolve_account_id(&self, username: Option<&str>) -> Result<Uuid> {
        let username = username.unwrap_or_default();
        let outcome = if username.is_empty() {
            AccountLookupOutcome::NoUsername
        } else {
            AccountLookupOutcome::classify(username, self.client.resolve_account(username).await)
        };
        debug!("Account lookup for '{}': {:?}", username, outcome);
        outcome.into_result(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minecraft::dto::minecraft_profile::MinecraftProfile;
    use crate::minecraft::dto::texture_payloads::ModelVariant;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    const PATH_ID: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";
    const ACCOUNT_ID: &str = "853c80ef3c3749fdaa49938b674adae6";

    enum ProfileReply {
        Ok(Value),
        NoContent,
        Status(u16),
    }

    struct FakeClient {
        account: Option<Value>,
        profile: ProfileReply,
        profile_calls: Mutex<Vec<Uuid>>,
        account_calls: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(account: Option<Value>, profile: ProfileReply) -> Self {
            Self {
                account,
                profile,
                profile_calls: Mutex::new(Vec::new()),
                account_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExternalProfileClient for FakeClient {
        async fn resolve_account(
            &self,
            username: &str,
        ) -> std::result::Result<MojangAccount, LookupError> {
            self.account_calls.lock().unwrap().push(username.to_string());
            match &self.account {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| LookupError::Malformed(e.to_string())),
                None => Err(LookupError::Status {
                    status: 404,
                    body: String::new(),
                }),
            }
        }

        async fn resolve_profile(
            &self,
            profile_id: Uuid,
        ) -> std::result::Result<MinecraftProfile, LookupError> {
            self.profile_calls.lock().unwrap().push(profile_id);
            match &self.profile {
                ProfileReply::Ok(v) => Ok(serde_json::from_value(v.clone()).unwrap()),
                ProfileReply::NoContent => Err(LookupError::NoContent),
                ProfileReply::Status(status) => Err(LookupError::Status {
                    status: *status,
                    body: "upstream".into(),
                }),
            }
        }
    }

    fn textures_value(skin_url: &str) -> String {
        STANDARD.encode(json!({"textures": {"SKIN": {"url": skin_url}}}).to_string())
    }

    fn assignment(level: i64, username: Option<&str>) -> TextureAssignment {
        TextureAssignment {
            url: "https://client/declared.png".into(),
            model: ModelVariant::Classic,
            import: SkinImportPolicy::from_level(level),
            username: username.map(str::to_string),
        }
    }

    fn path_id() -> Uuid {
        Uuid::parse_str(PATH_ID).unwrap()
    }

    #[tokio::test]
    async fn test_level_zero_passes_url_through() {
        let client = FakeClient::new(None, ProfileReply::NoContent);
        let url = MojangSkinResolver::new(&client)
            .resolve(&assignment(0, Some("Notch")), path_id())
            .await
            .unwrap();
        assert_eq!(url, "https://client/declared.png");
        assert!(client.profile_calls.lock().unwrap().is_empty());
        assert!(client.account_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_level_one_overrides_with_skin_url() {
        let client = FakeClient::new(
            None,
            ProfileReply::Ok(json!({
                "id": ACCOUNT_ID,
                "name": "Notch",
                "properties": [{"name": "textures", "value": textures_value("https://example/s.png")}]
            })),
        );
        let url = MojangSkinResolver::new(&client)
            .resolve(&assignment(1, None), path_id())
            .await
            .unwrap();
        assert_eq!(url, "https://example/s.png");
        assert_eq!(*client.profile_calls.lock().unwrap(), vec![path_id()]);
    }

    #[tokio::test]
    async fn test_level_two_looks_up_account_id() {
        let client = FakeClient::new(
            Some(json!({"id": ACCOUNT_ID, "name": "jeb_"})),
            ProfileReply::Ok(json!({
                "properties": [{"name": "textures", "value": textures_value("https://example/jeb.png")}]
            })),
        );
        let url = MojangSkinResolver::new(&client)
            .resolve(&assignment(2, Some("jeb_")), path_id())
            .await
            .unwrap();
        assert_eq!(url, "https://example/jeb.png");
        assert_eq!(*client.account_calls.lock().unwrap(), vec!["jeb_".to_string()]);
        assert_eq!(
            *client.profile_calls.lock().unwrap(),
            vec![Uuid::parse_str(ACCOUNT_ID).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_level_two_unresolvable_username_is_not_found() {
        let client = FakeClient::new(None, ProfileReply::NoContent);
        let err = MojangSkinResolver::new(&client)
            .resolve(&assignment(2, Some("ghost")), path_id())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(client.profile_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_account_outcome_table() {
        let classify = |v: Value| {
            AccountLookupOutcome::classify("x", serde_json::from_value::<MojangAccount>(v).map_err(|e| LookupError::Malformed(e.to_string())))
        };
        assert_eq!(classify(json!({"id": ACCOUNT_ID})), AccountLookupOutcome::NameMissing);
        assert_eq!(classify(json!({"name": "x"})), AccountLookupOutcome::IdMissing);
        assert_eq!(
            classify(json!({"name": "x", "id": "zzz"})),
            AccountLookupOutcome::IdUnparseable
        );
        assert_eq!(classify(json!({"name": 5})), AccountLookupOutcome::LookupFailed);
        assert_eq!(
            classify(json!({"name": "x", "id": ACCOUNT_ID})),
            AccountLookupOutcome::Resolved(Uuid::parse_str(ACCOUNT_ID).unwrap())
        );
        for outcome in [
            AccountLookupOutcome::NoUsername,
            AccountLookupOutcome::LookupFailed,
            AccountLookupOutcome::NameMissing,
            AccountLookupOutcome::IdMissing,
            AccountLookupOutcome::IdUnparseable,
        ] {
            assert!(matches!(outcome.into_result("x"), Err(AppError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn test_level_two_without_username_skips_lookup() {
        let client = FakeClient::new(Some(json!({"id": ACCOUNT_ID, "name": "x"})), ProfileReply::NoContent);
        let err = MojangSkinResolver::new(&client)
            .resolve(&assignment(2, None), path_id())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(client.account_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_content_profile_is_not_found() {
        let client = FakeClient::new(None, ProfileReply::NoContent);
        let err = MojangSkinResolver::new(&client)
            .resolve(&assignment(1, None), path_id())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_other_profile_failures_surface_as_is() {
        let client = FakeClient::new(None, ProfileReply::Status(503));
        let err = MojangSkinResolver::new(&client)
            .resolve(&assignment(1, None), path_id())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ExternalLookup(LookupError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_or_empty_properties_is_processing_error() {
        for profile in [
            json!({"id": ACCOUNT_ID}),
            json!({"properties": []}),
            json!({"properties": "textures"}),
        ] {
            let client = FakeClient::new(None, ProfileReply::Ok(profile));
            let err = MojangSkinResolver::new(&client)
                .resolve(&assignment(1, None), path_id())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Processing(_)));
        }
    }

    #[tokio::test]
    async fn test_scan_miss_keeps_client_url() {
        let client = FakeClient::new(
            None,
            ProfileReply::Ok(json!({
                "properties": [
                    {"name": "textures", "value": "!!!not-base64!!!"},
                    {"name": "other", "value": textures_value("https://example/ignored.png")}
                ]
            })),
        );
        let url = MojangSkinResolver::new(&client)
            .resolve(&assignment(3, None), path_id())
            .await
            .unwrap();
        assert_eq!(url, "https://client/declared.png");
    }
}
