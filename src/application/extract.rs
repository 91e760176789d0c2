use crate::application::dto::DetectionSummary;
use crate::domain::{detection::Detection, labels::LabelTable};

/// `confidence * 100` con dos decimales seguido de `%`.
pub fn format_accuracy(confidence: f32) -> String {
    format!("{:.2}%", f64::from(confidence) * 100.0)
}

/// Convierte la salida del detector en pares `{jenis, akurasi}`.
/// No filtra ni reordena: se reporta tal cual lo que devuelve el detector.
pub fn summarize(detections: &[Detection], labels: &LabelTable) -> Vec<DetectionSummary> {
    detections
        .iter()
        .map(|d| DetectionSummary {
            jenis: labels.name(d.class_id),
            akurasi: format_accuracy(d.confidence),
        })
        .collect()
}
