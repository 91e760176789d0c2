use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::labels::LabelTable;

/// Lee un archivo de etiquetas: un nombre de clase por línea, en orden de índice.
pub fn load_labels_file(path: &Path) -> Result<LabelTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer el archivo de etiquetas {}", path.display()))?;
    let names = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    Ok(LabelTable::new(names))
}

/// Interpreta el metadato `names` que el exportador YOLO escribe en el ONNX,
/// p. ej. `{0: 'bengal', 1: 'maine coon'}`. Los huecos se rellenan con `class_<id>`.
pub fn parse_names_metadata(raw: &str) -> Option<LabelTable> {
    let re = Regex::new(r#"(\d+)\s*:\s*(?:'([^']*)'|"([^"]*)")"#).ok()?;

    let mut pairs: Vec<(usize, String)> = re
        .captures_iter(raw)
        .filter_map(|c| {
            let idx = c.get(1)?.as_str().parse().ok()?;
            let name = c.get(2).or_else(|| c.get(3))?.as_str().to_string();
            Some((idx, name))
        })
        .collect();

    if pairs.is_empty() {
        return None;
    }
    pairs.sort_by_key(|(idx, _)| *idx);

    let size = pairs.last().map(|(idx, _)| idx + 1).unwrap_or(0);
    let mut names: Vec<String> = (0..size).map(|i| format!("class_{}", i)).collect();
    for (idx, name) in pairs {
        names[idx] = name;
    }
    Some(LabelTable::new(names))
}
