use image::RgbImage;

use crate::domain::errors::{DomainError, DomainResult};

/// Tamaño máximo de subida por defecto (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Decodifica los bytes subidos a una imagen RGB8.
/// El formato se detecta por los bytes mágicos, no por el nombre del archivo.
pub fn decode_upload(bytes: &[u8], max_bytes: usize) -> DomainResult<RgbImage> {
    if bytes.is_empty() {
        return Err(DomainError::InvalidImage("archivo vacío".into()));
    }
    if bytes.len() > max_bytes {
        return Err(DomainError::InvalidImage(format!(
            "archivo demasiado grande: {} bytes (máx. {})",
            bytes.len(),
            max_bytes
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| DomainError::InvalidImage("formato de imagen no reconocido".into()))?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DomainError::InvalidImage(e.to_string()))?;

    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 128]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_png_with_alpha_to_rgb() {
        let rgb = decode_upload(&png_bytes(12, 7), DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(rgb.dimensions(), (12, 7));
    }

    #[test]
    fn rejects_text_payload() {
        let err = decode_upload(b"esto no es una imagen", DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, DomainError::InvalidImage(_)));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(
            decode_upload(&[], DEFAULT_MAX_UPLOAD_BYTES),
            Err(DomainError::InvalidImage(_))
        ));
    }

    #[test]
    fn rejects_oversized_payload() {
        let bytes = png_bytes(4, 4);
        assert!(matches!(
            decode_upload(&bytes, 8),
            Err(DomainError::InvalidImage(_))
        ));
    }

    #[test]
    fn rejects_truncated_png() {
        let bytes = png_bytes(16, 16);
        let err = decode_upload(&bytes[..20], DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, DomainError::InvalidImage(_)));
    }
}
