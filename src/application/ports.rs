use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{
    annotated::AnnotatedImage,
    detection::Detection,
    errors::DomainResult,
    labels::LabelTable,
    model::ModelId,
};

/// Detector de objetos precargado. Se construye una sola vez al arrancar
/// y se comparte (sólo lectura) entre todas las peticiones.
#[async_trait]
pub trait DetectorPort: Send + Sync {
    fn labels(&self) -> &LabelTable;
    async fn detect(&self, image: Arc<RgbImage>) -> DomainResult<Vec<Detection>>;
}

/// Dibuja las detecciones sobre una copia de la imagen.
pub trait AnnotatorPort: Send + Sync {
    fn annotate(&self, image: &RgbImage, detections: &[Detection]) -> DomainResult<AnnotatedImage>;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()>;
}
