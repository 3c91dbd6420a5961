//! Image re-encoding applied before upload.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::config::{IMAGE_JPEG_QUALITY, IMAGE_MAX_WIDTH};
use crate::errors::{AppError, AppResult};

/// Decode an uploaded image, shrink it to at most `IMAGE_MAX_WIDTH` pixels wide
/// and re-encode it as JPEG.
///
/// Images narrower than the limit keep their size. CPU bound; call it from
/// `spawn_blocking`.
pub fn compress_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Uploaded file is not a valid image: {e}")))?;

    let img = if img.width() > IMAGE_MAX_WIDTH {
        img.resize(IMAGE_MAX_WIDTH, img.height(), FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), IMAGE_JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([200u8, 40, 40, 128]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_wide_image_is_shrunk_to_max_width() {
        let out = compress_image(&png(1600, 400)).unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let out = compress_image(&png(120, 90)).unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width(), 120);
        assert_eq!(decoded.height(), 90);
    }

    #[test]
    fn test_garbage_is_rejected_as_validation() {
        let err = compress_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
