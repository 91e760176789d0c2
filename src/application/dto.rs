use serde::{Deserialize, Serialize};

/// Una entrada de `hasil_teks`: nombre de la clase y confianza en porcentaje.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub jenis: String,
    pub akurasi: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub hasil_teks: Vec<DetectionSummary>,
    pub gambar_hasil: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
