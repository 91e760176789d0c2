#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use cat_detect::adapters::http::{router, state::HttpState};
use cat_detect::adapters::render::plotter::BoxPlotter;
use cat_detect::application::{ports::DetectorPort, services::DetectionService};
use cat_detect::domain::{
    detection::{BoundingBox, Detection},
    errors::{DomainError, DomainResult},
    labels::LabelTable,
};
use image::{ImageFormat, Rgb, RgbImage};

pub const BOUNDARY: &str = "----catdetectboundary";

/// Detector de pruebas: devuelve siempre las mismas detecciones.
pub struct FakeDetector {
    pub labels: LabelTable,
    pub detections: Vec<Detection>,
    pub fail: bool,
}

#[async_trait]
impl DetectorPort for FakeDetector {
    fn labels(&self) -> &LabelTable {
        &self.labels
    }

    async fn detect(&self, _image: Arc<RgbImage>) -> DomainResult<Vec<Detection>> {
        if self.fail {
            return Err(DomainError::Inference("pesos corruptos".into()));
        }
        Ok(self.detections.clone())
    }
}

pub fn labels() -> LabelTable {
    LabelTable::new(vec!["bengal".into(), "persian".into(), "sphynx".into()])
}

pub fn detection(class_id: usize, confidence: f32) -> Detection {
    Detection {
        class_id,
        class_name: labels().name(class_id),
        confidence,
        bbox: BoundingBox { x1: 4.0, y1: 4.0, x2: 40.0, y2: 30.0 },
    }
}

pub fn service_with(detections: Vec<Detection>, fail: bool, max_upload: usize) -> DetectionService {
    let detector = FakeDetector { labels: labels(), detections, fail };
    DetectionService::new(Arc::new(detector), Arc::new(BoxPlotter::new()), max_upload)
}

pub fn app_with(detections: Vec<Detection>, fail: bool) -> axum::Router {
    app_from(service_with(detections, fail, 1024 * 1024))
}

pub fn app_from(service: DetectionService) -> axum::Router {
    router(HttpState { detection: Arc::new(service) })
}

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("png");
    buf.into_inner()
}

/// Cuerpo multipart con un único campo.
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn detect_request(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(axum::body::Body::from(body))
        .expect("request")
}
