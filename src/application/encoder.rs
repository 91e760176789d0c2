use base64::{prelude::BASE64_STANDARD, Engine};
use image::{codecs::jpeg::JpegEncoder, RgbImage};

use crate::domain::{
    annotated::{AnnotatedImage, ChannelOrder},
    errors::{DomainError, DomainResult},
};

/// Calidad JPEG por defecto de los codificadores habituales.
pub const JPEG_QUALITY: u8 = 75;

/// Normaliza el buffer anotado a RGB (intercambia B y R si viene en BGR).
pub fn to_rgb(img: AnnotatedImage) -> DomainResult<RgbImage> {
    if img.width == 0 || img.height == 0 {
        return Err(DomainError::Encoding(format!(
            "dimensiones inválidas {}x{}",
            img.width, img.height
        )));
    }

    let expected = img.width as usize * img.height as usize * 3;
    if img.pixels.len() != expected {
        return Err(DomainError::Encoding(format!(
            "buffer corrupto: {} bytes, se esperaban {}",
            img.pixels.len(),
            expected
        )));
    }

    let mut pixels = img.pixels;
    if img.order == ChannelOrder::Bgr {
        for px in pixels.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
    }

    RgbImage::from_raw(img.width, img.height, pixels)
        .ok_or_else(|| DomainError::Encoding("no se pudo reconstruir la imagen".into()))
}

pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> DomainResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(rgb)
        .map_err(|e| DomainError::Encoding(e.to_string()))?;
    Ok(buf)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// BGR/RGB -> RGB -> JPEG. Falla sin producir payload parcial.
pub fn encode_annotated(img: AnnotatedImage) -> DomainResult<Vec<u8>> {
    let rgb = to_rgb(img)?;
    encode_jpeg(&rgb, JPEG_QUALITY)
}
