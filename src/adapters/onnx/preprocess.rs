use image::{imageops::FilterType, Rgb, RgbImage};
use ndarray::Array4;

use crate::domain::detection::BoundingBox;

const PAD_COLOR: Rgb<u8> = Rgb([114, 114, 114]);

/// Geometría del letterbox aplicado a la entrada: escala uniforme y relleno
/// centrado. Permite devolver las cajas al espacio de la imagen original.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub src_width: u32,
    pub src_height: u32,
}

impl Letterbox {
    pub fn new(src_width: u32, src_height: u32, target: u32) -> Self {
        let scale = (target as f32 / src_width as f32).min(target as f32 / src_height as f32);
        let (new_w, new_h) = scaled_size(src_width, src_height, scale, target);
        Self {
            scale,
            pad_x: ((target - new_w) / 2) as f32,
            pad_y: ((target - new_h) / 2) as f32,
            src_width,
            src_height,
        }
    }

    /// Caja `(cx, cy, w, h)` en el espacio del modelo -> píxeles de la imagen
    /// original, recortada a sus límites.
    pub fn restore(&self, cx: f32, cy: f32, w: f32, h: f32) -> BoundingBox {
        let max_x = self.src_width as f32;
        let max_y = self.src_height as f32;
        let unpad_x = |x: f32| ((x - self.pad_x) / self.scale).clamp(0.0, max_x);
        let unpad_y = |y: f32| ((y - self.pad_y) / self.scale).clamp(0.0, max_y);

        BoundingBox {
            x1: unpad_x(cx - w / 2.0),
            y1: unpad_y(cy - h / 2.0),
            x2: unpad_x(cx + w / 2.0),
            y2: unpad_y(cy + h / 2.0),
        }
    }
}

fn scaled_size(w: u32, h: u32, scale: f32, target: u32) -> (u32, u32) {
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, target);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, target);
    (new_w, new_h)
}

/// Redimensiona manteniendo la proporción y rellena con gris 114 hasta `target`².
pub fn letterbox(rgb: &RgbImage, target: u32) -> (RgbImage, Letterbox) {
    let (w, h) = rgb.dimensions();
    let geometry = Letterbox::new(w, h, target);
    let (new_w, new_h) = scaled_size(w, h, geometry.scale, target);

    let resized = image::imageops::resize(rgb, new_w, new_h, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(target, target, PAD_COLOR);
    image::imageops::replace(
        &mut canvas,
        &resized,
        geometry.pad_x as i64,
        geometry.pad_y as i64,
    );

    (canvas, geometry)
}

/// Tensor NCHW f32 normalizado a [0, 1].
pub fn to_nchw(img: &RgbImage) -> Array4<f32> {
    let (w, h) = img.dimensions();
    let mut input = Array4::<f32>::zeros((1, 3, h as usize, w as usize));
    for (x, y, pixel) in img.enumerate_pixels() {
        input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
        input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
        input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
    }
    input
}
