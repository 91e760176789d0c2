use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::application::dto::ErrorResponse;
use crate::domain::errors::DomainError;

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Multipart(MultipartError),
    NotMultipart(MultipartRejection),
    MissingField(&'static str),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::NotMultipart(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart(e)
    }
}

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidImage(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Inference(_) | DomainError::Encoding(_) | DomainError::OperationFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Domain(e) => (status_for(&e), e.to_string()),
            // Sólo el límite de tamaño conserva su código; el resto es un formulario mal formado.
            ApiError::Multipart(e) => match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => (StatusCode::PAYLOAD_TOO_LARGE, e.body_text()),
                _ => (StatusCode::UNPROCESSABLE_ENTITY, e.body_text()),
            },
            ApiError::NotMultipart(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.body_text()),
            ApiError::MissingField(name) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("falta el campo multipart '{}'", name),
            ),
        };

        if status.is_server_error() {
            error!("❌ {}: {}", status, detail);
        } else {
            warn!("⚠️ {}: {}", status, detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
