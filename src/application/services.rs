use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info};

use crate::{
    application::{
        dto::{DetectResponse, DetectionSummary},
        encoder::{encode_annotated, encode_base64},
        extract::summarize,
        ports::{AnnotatorPort, DetectorPort},
        upload::decode_upload,
    },
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
    },
};

/// Resultado completo de analizar una imagen.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub detections: Vec<Detection>,
    pub summaries: Vec<DetectionSummary>,
    /// Imagen anotada ya codificada como JPEG.
    pub jpeg: Vec<u8>,
}

/// Orquestador de una petición de detección:
/// decodificar -> inferir -> extraer -> dibujar -> codificar.
/// No guarda estado entre peticiones.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
    annotator: Arc<dyn AnnotatorPort>,
    max_upload_bytes: usize,
}

impl DetectionService {
    pub fn new(
        detector: Arc<dyn DetectorPort>,
        annotator: Arc<dyn AnnotatorPort>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            detector,
            annotator,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Caso de uso de `POST /detect`.
    pub async fn detect_upload(&self, bytes: Vec<u8>) -> DomainResult<DetectResponse> {
        let max = self.max_upload_bytes;
        let image = run_blocking(move || decode_upload(&bytes, max)).await?;
        debug!("Imagen decodificada: {}x{}", image.width(), image.height());

        let analysis = self.analyze(image).await?;

        Ok(DetectResponse {
            hasil_teks: analysis.summaries,
            gambar_hasil: encode_base64(&analysis.jpeg),
        })
    }

    pub async fn analyze(&self, image: RgbImage) -> DomainResult<Analysis> {
        let image = Arc::new(image);

        let t_infer_start = Instant::now();
        let detections = self.detector.detect(image.clone()).await?;
        let infer_ms = t_infer_start.elapsed().as_secs_f32() * 1000.0;
        info!("Inferencia: {} detecciones en {:.1} ms", detections.len(), infer_ms);

        let summaries = summarize(&detections, self.detector.labels());

        // Sólo se envía una imagen por llamada, así que hay exactamente un conjunto de resultados.
        let annotator = self.annotator.clone();
        let to_draw = detections.clone();
        let jpeg = run_blocking(move || {
            let annotated = annotator.annotate(&image, &to_draw)?;
            encode_annotated(annotated)
        })
        .await?;

        Ok(Analysis {
            detections,
            summaries,
            jpeg,
        })
    }
}

/// Ejecuta trabajo de CPU fuera de los hilos del runtime async.
async fn run_blocking<T, F>(f: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::OperationFailed(format!("tarea bloqueante abortada: {e}")))?
}
