use crate::minecraft::api::mc_api::LookupError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::io;
use thiserror::Error;

pub const MESSAGE_INVALID_TOKEN: &str = "Invalid token.";
pub const MESSAGE_INVALID_TEXTURE_TYPE: &str = "Invalid texture type.";
pub const MESSAGE_FILE_TOO_LARGE: &str = "File too large(more than 1MiB)";
pub const MESSAGE_CANNOT_OPEN_FILE: &str = "Can not open file.";

const KIND_ILLEGAL_ARGUMENT: &str = "IllegalArgumentException";
const KIND_FORBIDDEN_OPERATION: &str = "ForbiddenOperationException";
const KIND_NOT_FOUND: &str = "Not Found";
const KIND_UPSTREAM: &str = "Upstream Error";
const KIND_INTERNAL: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    IllegalArgument(String),

    #[error("{}", MESSAGE_INVALID_TOKEN)]
    InvalidToken,

    #[error("{0}")]
    ForbiddenOperation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Texture not found: {0}")]
    TextureNotFound(String),

    #[error("External profile lookup failed: {0}")]
    ExternalLookup(#[from] LookupError),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("{}", MESSAGE_CANNOT_OPEN_FILE)]
    CannotOpenFile,

    #[error("Texture download failed: {0}")]
    TextureDownload(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::IllegalArgument(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::TextureNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExternalLookup(LookupError::NoContent) => StatusCode::NOT_FOUND,
            AppError::ExternalLookup(LookupError::Status { status, .. }) => {
                match StatusCode::from_u16(*status) {
                    Ok(code) if code.is_client_error() || code.is_server_error() => code,
                    _ => StatusCode::BAD_GATEWAY,
                }
            }
            AppError::TextureDownload(_) => StatusCode::BAD_GATEWAY,
            AppError::ExternalLookup(_)
            | AppError::Processing(_)
            | AppError::CannotOpenFile
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::IllegalArgument(_) => KIND_ILLEGAL_ARGUMENT,
            AppError::InvalidToken | AppError::ForbiddenOperation(_) => KIND_FORBIDDEN_OPERATION,
            AppError::NotFound(_)
            | AppError::TextureNotFound(_)
            | AppError::ExternalLookup(LookupError::NoContent) => KIND_NOT_FOUND,
            AppError::ExternalLookup(LookupError::Status { .. }) | AppError::TextureDownload(_) => {
                KIND_UPSTREAM
            }
            _ => KIND_INTERNAL,
        }
    }
}

/// Yggdrasil-style error body returned by every failing endpoint.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        ErrorResponse {
            error: error.kind().to_string(),
            error_message: error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed with {}: {}", status, self);
        } else {
            log::debug!("Request rejected with {}: {}", status, self);
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
