use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::application::dto::{DetectResponse, MessageResponse};

pub const ROOT_MESSAGE: &str = "API Deteksi Kucing Aktif!";
pub const UPLOAD_FIELD: &str = "file";

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: ROOT_MESSAGE.to_string() })
}

pub async fn detect(
    State(st): State<HttpState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().unwrap_or("<sin nombre>").to_string();
            let bytes = field.bytes().await?;
            info!("📥 Recibido '{}' ({} bytes)", file_name, bytes.len());
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload.ok_or(ApiError::MissingField(UPLOAD_FIELD))?;
    let response = st.detection.detect_upload(bytes.to_vec()).await?;
    Ok(Json(response))
}
