use crate::commands::request_gate::{bind_set_texture, texture_target};
use crate::error::{AppError, Result, MESSAGE_FILE_TOO_LARGE};
use crate::minecraft::dto::texture_payloads::ModelVariant;
use crate::minecraft::skin_import::MojangSkinResolver;
use crate::state::state_manager::AppState;
use crate::state::texture_state::MAX_TEXTURE_SIZE;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use log::{debug, error};

/// Limit for JSON bodies. Uploads run without one; their file field is capped
/// at `MAX_TEXTURE_SIZE` while it streams.
const MAX_REQUEST_BODY: usize = 4 * 1024 * 1024;
const TEXTURE_CACHE_CONTROL: &str = "public, max-age=31536000";

pub fn texture_router(state: AppState) -> Router {
    Router::new()
        .route("/texture/{hash}", get(get_texture))
        .route(
            "/texture/{uuid}/{texture_type}",
            put(set_texture)
                .delete(delete_texture)
                .merge(post(upload_texture).layer(DefaultBodyLimit::disable())),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .with_state(state)
}

/// `GET /texture/{hash}`
pub async fn get_texture(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Response> {
    debug!("Command called: get_texture for hash: {}", hash);
    let data = state.texture_store.get_texture(&hash).await?;
    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, TEXTURE_CACHE_CONTROL)],
        data,
    )
        .into_response())
}

/// `PUT /texture/{uuid}/{textureType}` with a JSON body.
///
/// The body is bound before the token is looked at, so a malformed body
/// answers 403 even without credentials.
pub async fn set_texture(
    State(state): State<AppState>,
    Path((uuid, texture)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    debug!("Command called: set_texture for {}/{}", uuid, texture);
    let assignment = bind_set_texture(&body)?;
    let target = texture_target(&headers, &uuid, &texture)?;

    let url = MojangSkinResolver::new(state.profile_client.as_ref())
        .resolve(&assignment, target.profile_id)
        .await?;

    state
        .texture_store
        .set_texture(
            &target.access_token,
            target.profile_id,
            &url,
            target.texture_type,
            assignment.model,
        )
        .await
        .map_err(|e| {
            debug!("Failed to set texture: {:?}", e);
            e
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /texture/{uuid}/{textureType}` with multipart fields `model` and `file`.
pub async fn upload_texture(
    State(state): State<AppState>,
    Path((uuid, texture)): Path<(String, String)>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<StatusCode> {
    debug!("Command called: upload_texture for {}/{}", uuid, texture);
    let target = texture_target(&headers, &uuid, &texture)?;
    let mut multipart = multipart.map_err(|e| AppError::IllegalArgument(e.body_text()))?;

    let mut model = ModelVariant::Classic;
    let mut file: Option<Vec<u8>> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::IllegalArgument(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("model") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::IllegalArgument(e.body_text()))?;
                model = ModelVariant::from_upload_field(&value);
            }
            Some("file") if file.is_none() => {
                let mut data = Vec::new();
                loop {
                    match field.chunk().await {
                        Ok(Some(chunk)) => {
                            if data.len() + chunk.len() > MAX_TEXTURE_SIZE {
                                return Err(AppError::IllegalArgument(
                                    MESSAGE_FILE_TOO_LARGE.to_string(),
                                ));
                            }
                            data.extend_from_slice(&chunk);
                        }
                        Ok(None) => break,
                        Err(e) => {
                            error!("Failed to read uploaded file: {}", e);
                            return Err(AppError::CannotOpenFile);
                        }
                    }
                }
                file = Some(data);
            }
            _ => {}
        }
    }

    let data = file.ok_or_else(|| AppError::IllegalArgument("file is required".to_string()))?;
    debug!("Received upload of {} bytes (model {})", data.len(), model);

    state
        .texture_store
        .upload_texture(
            &target.access_token,
            target.profile_id,
            data,
            target.texture_type,
            model,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /texture/{uuid}/{textureType}`
pub async fn delete_texture(
    State(state): State<AppState>,
    Path((uuid, texture)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    debug!("Command called: delete_texture for {}/{}", uuid, texture);
    let target = texture_target(&headers, &uuid, &texture)?;

    state
        .texture_store
        .delete_texture(&target.access_token, target.profile_id, target.texture_type)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
