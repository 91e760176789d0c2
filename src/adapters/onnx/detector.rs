use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;
use tracing::{info, warn};

use crate::adapters::onnx::{labels::load_labels_file, yolo_engine::OnnxYoloEngine};
use crate::application::ports::DetectorPort;
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
    labels::LabelTable,
    model::InferenceConfig,
};

/// Detector YOLO sobre ONNX Runtime.
/// La sesión exige acceso exclusivo, así que las inferencias concurrentes se serializan
/// con un mutex y se ejecutan en el pool bloqueante de Tokio.
pub struct OnnxDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
    config: InferenceConfig,
    labels: LabelTable,
}

impl OnnxDetector {
    pub fn load(config: InferenceConfig, labels_path: Option<&Path>) -> Result<Self> {
        let engine = OnnxYoloEngine::load(&config.model.onnx_path)?;

        let labels = match labels_path {
            Some(path) => load_labels_file(path)?,
            None => engine.embedded_labels().unwrap_or_else(|| {
                warn!("⚠️ El modelo no trae nombres de clase; se usará class_<id>");
                LabelTable::default()
            }),
        };

        info!(
            "🧠 Modelo '{}' cargado ({} clases, imgsz={})",
            config.model.name,
            labels.len(),
            config.params.input_size
        );

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            config,
            labels,
        })
    }
}

#[async_trait]
impl DetectorPort for OnnxDetector {
    fn labels(&self) -> &LabelTable {
        &self.labels
    }

    async fn detect(&self, image: Arc<RgbImage>) -> DomainResult<Vec<Detection>> {
        let engine = self.engine.clone();
        let params = self.config.params.clone();
        let labels = self.labels.clone();

        tokio::task::spawn_blocking(move || {
            let mut eng = engine
                .lock()
                .map_err(|_| DomainError::Inference("sesión ONNX envenenada".into()))?;
            eng.infer(&image, &params, &labels)
                .map_err(|e| DomainError::Inference(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("tarea de inferencia abortada: {e}")))?
    }
}
