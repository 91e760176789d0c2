use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageFormat;
use tracing::info;

use crate::application::{
    dto::DetectionSummary,
    extract::format_accuracy,
    services::DetectionService,
    upload::decode_upload,
};

#[derive(Debug, Clone)]
pub struct PredictOutput {
    pub summaries: Vec<DetectionSummary>,
    pub saved_to: PathBuf,
}

/// Predicción única: decodifica `source`, detecta y guarda la imagen anotada
/// en `<save_dir>` con el mismo nombre de archivo (sobrescribe si existe).
pub async fn run_predict(
    service: &DetectionService,
    source: &Path,
    save_dir: &Path,
) -> Result<PredictOutput> {
    let bytes = tokio::fs::read(source)
        .await
        .with_context(|| format!("no se pudo leer {}", source.display()))?;
    let image = decode_upload(&bytes, usize::MAX)?;
    let (w, h) = image.dimensions();

    let analysis = service.analyze(image).await?;
    info!("🖼️ {} ({}x{}): {} detecciones", source.display(), w, h, analysis.detections.len());
    for det in &analysis.detections {
        info!(
            "  {} {} [{:.0}, {:.0}, {:.0}, {:.0}]",
            det.class_name,
            format_accuracy(det.confidence),
            det.bbox.x1,
            det.bbox.y1,
            det.bbox.x2,
            det.bbox.y2
        );
    }

    tokio::fs::create_dir_all(save_dir)
        .await
        .with_context(|| format!("no se pudo crear {}", save_dir.display()))?;

    let (saved_to, bytes) = output_for(source, save_dir, analysis.jpeg)?;
    tokio::fs::write(&saved_to, &bytes)
        .await
        .with_context(|| format!("no se pudo escribir {}", saved_to.display()))?;
    info!("💾 Resultado guardado en {}", saved_to.display());

    Ok(PredictOutput {
        summaries: analysis.summaries,
        saved_to,
    })
}

/// Ruta y bytes de salida: se conserva el nombre del archivo de entrada y se
/// recodifica al formato de su extensión. Extensiones sin codificador -> `<stem>.jpg`.
fn output_for(source: &Path, save_dir: &Path, jpeg: Vec<u8>) -> Result<(PathBuf, Vec<u8>)> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "prediction".to_string());

    let format = ImageFormat::from_path(source)
        .ok()
        .filter(|f| f.writing_enabled());

    match (format, source.file_name()) {
        (Some(ImageFormat::Jpeg), Some(name)) => Ok((save_dir.join(name), jpeg)),
        (Some(format), Some(name)) => {
            let annotated = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)
                .context("no se pudo releer la imagen anotada")?;
            let mut buf = Cursor::new(Vec::new());
            annotated
                .write_to(&mut buf, format)
                .with_context(|| format!("no se pudo codificar como {:?}", format))?;
            Ok((save_dir.join(name), buf.into_inner()))
        }
        _ => Ok((save_dir.join(format!("{}.jpg", stem)), jpeg)),
    }
}
