use image::RgbImage;

/// Orden de canales del buffer de píxeles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Copia de la imagen de entrada con las cajas dibujadas encima.
/// Vive sólo durante la petición; se descarta tras codificarla.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub pixels: Vec<u8>,
}

impl AnnotatedImage {
    pub fn from_rgb(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            order: ChannelOrder::Rgb,
            pixels: img.into_raw(),
        }
    }
}
