use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{info, warn};

use crate::adapters::render::palette::class_color;
use crate::application::ports::AnnotatorPort;
use crate::domain::{annotated::AnnotatedImage, detection::Detection, errors::DomainResult};

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Fuentes sans-serif habituales en Linux, macOS y Windows.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Dibuja cajas y etiquetas `"<clase> <conf>"` sobre una copia de la imagen.
/// Sin fuente TrueType configurada sólo se dibujan las cajas.
pub struct BoxPlotter {
    font: Option<FontVec>,
}

impl BoxPlotter {
    pub fn new() -> Self {
        Self { font: None }
    }

    pub fn with_font_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("no se pudo leer la fuente {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|_| anyhow!("fuente TrueType inválida: {}", path.display()))?;
        Ok(Self { font: Some(font) })
    }

    /// Usa la primera fuente del sistema que se pueda cargar; sin ninguna,
    /// sólo se dibujan las cajas.
    pub fn from_system_fonts() -> Self {
        let candidates: Vec<PathBuf> = SYSTEM_FONTS.iter().map(PathBuf::from).collect();
        match first_loadable_font(&candidates) {
            Some((path, font)) => {
                info!("🔤 Fuente para etiquetas: {}", path.display());
                Self { font: Some(font) }
            }
            None => {
                warn!("⚠️ No se encontró ninguna fuente TrueType; usa --font para dibujar etiquetas");
                Self::new()
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

fn first_loadable_font(candidates: &[PathBuf]) -> Option<(PathBuf, FontVec)> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        let font = FontVec::try_from_vec(bytes).ok()?;
        Some((path.clone(), font))
    })
}

impl Default for BoxPlotter {
    fn default() -> Self {
        Self::new()
    }
}

/// Grosor de línea proporcional al tamaño de la imagen (mínimo 2 px).
pub fn line_width(width: u32, height: u32) -> u32 {
    (((width + height) as f32 / 2.0 * 0.003).round() as u32).max(2)
}

impl AnnotatorPort for BoxPlotter {
    fn annotate(&self, image: &RgbImage, detections: &[Detection]) -> DomainResult<AnnotatedImage> {
        let mut canvas = image.clone();
        let (w, h) = canvas.dimensions();
        if w == 0 || h == 0 {
            return Ok(AnnotatedImage::from_rgb(canvas));
        }

        let lw = line_width(w, h) as i32;
        let max_x = w as i32 - 1;
        let max_y = h as i32 - 1;

        for det in detections {
            let color = class_color(det.class_id);

            let x1 = (det.bbox.x1.round() as i32).clamp(0, max_x);
            let y1 = (det.bbox.y1.round() as i32).clamp(0, max_y);
            let x2 = (det.bbox.x2.round() as i32).clamp(0, max_x);
            let y2 = (det.bbox.y2.round() as i32).clamp(0, max_y);
            if x2 <= x1 || y2 <= y1 {
                continue;
            }

            // Borde grueso hacia el interior de la caja.
            for t in 0..lw {
                let bw = x2 - x1 + 1 - 2 * t;
                let bh = y2 - y1 + 1 - 2 * t;
                if bw <= 0 || bh <= 0 {
                    break;
                }
                draw_hollow_rect_mut(&mut canvas, Rect::at(x1 + t, y1 + t).of_size(bw as u32, bh as u32), color);
            }

            if let Some(font) = &self.font {
                let text = format!("{} {:.2}", det.class_name, det.confidence);
                let scale = PxScale::from(((w + h) as f32 / 2.0 * 0.035).max(12.0));
                let (tw, th) = text_size(scale, font, &text);
                let bar_h = th as i32 + 4;

                // Encima de la caja si cabe; si no, dentro.
                let bar_y = if y1 >= bar_h { y1 - bar_h } else { y1 };
                draw_filled_rect_mut(&mut canvas, Rect::at(x1, bar_y).of_size(tw + 4, bar_h as u32), color);
                draw_text_mut(&mut canvas, TEXT_COLOR, x1 + 2, bar_y + 2, scale, font, &text);
            }
        }

        Ok(AnnotatedImage::from_rgb(canvas))
    }
}
