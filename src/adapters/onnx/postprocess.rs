use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use ndarray::{s, ArrayView2};

use crate::adapters::onnx::preprocess::Letterbox;
use crate::domain::detection::Detection;
use crate::domain::labels::LabelTable;
use crate::domain::model::YoloParams;

/// Decodifica la salida YOLOv8 `[4 + nc, N]` (ya sin el eje de batch).
/// Las cajas se devuelven a píxeles de la imagen original deshaciendo el letterbox.
pub fn decode_output(
    view: ArrayView2<f32>,
    labels: &LabelTable,
    params: &YoloParams,
    geometry: &Letterbox,
) -> Result<Vec<Detection>> {
    let rows = view.shape()[0];
    if rows < 5 {
        return Err(anyhow!("Salida del modelo inesperada: {} filas (mínimo 5)", rows));
    }
    let num_candidates = view.shape()[1];

    let mut detections = Vec::new();

    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let (class_id, max_score) = scores
            .indexed_iter()
            .fold((0usize, f32::MIN), |best, (idx, &score)| {
                if score > best.1 { (idx, score) } else { best }
            });

        if max_score > params.conf_threshold {
            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let w = view[[2, i]];
            let h = view[[3, i]];

            detections.push(Detection {
                class_id,
                class_name: labels.name(class_id),
                confidence: max_score.clamp(0.0, 1.0),
                bbox: geometry.restore(cx, cy, w, h),
            });
        }
    }

    let mut kept = nms(detections, params.iou_threshold);
    kept.sort_by(by_confidence_desc);
    kept.truncate(params.max_detections);
    Ok(kept)
}

/// NMS por clase: cajas de clases distintas nunca se suprimen entre sí.
pub fn nms(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    let mut class_groups: HashMap<usize, Vec<Detection>> = HashMap::new();
    for detection in detections {
        class_groups.entry(detection.class_id).or_default().push(detection);
    }

    let mut all_results = Vec::new();

    for (_, mut class_detections) in class_groups {
        class_detections.sort_by(by_confidence_desc);

        let mut suppressed = vec![false; class_detections.len()];
        for i in 0..class_detections.len() {
            if suppressed[i] {
                continue;
            }
            for j in (i + 1)..class_detections.len() {
                if !suppressed[j]
                    && class_detections[i].bbox.iou(&class_detections[j].bbox) > iou_threshold
                {
                    suppressed[j] = true;
                }
            }
        }

        all_results.extend(
            class_detections
                .into_iter()
                .zip(suppressed)
                .filter(|(_, s)| !s)
                .map(|(d, _)| d),
        );
    }

    all_results
}

fn by_confidence_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal)
}
