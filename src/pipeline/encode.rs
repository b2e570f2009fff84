//! Image encoding: `DynamicImage` → JPEG bytes.
//!
//! Rendered pages end up inside a DOCX and images that are not JPEG end up
//! inside a PDF as `DCTDecode` streams; both want baseline RGB JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

/// Quality used for rendered pages and re-encoded images.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Encode as RGB JPEG. Any alpha channel is discarded.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = buf.len(),
        quality,
        "Encoded JPEG"
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let data = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).expect("encode should succeed");
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&data).expect("valid jpeg");
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        }));
        let high = encode_jpeg(&img, 95).unwrap();
        let low = encode_jpeg(&img, 10).unwrap();
        assert!(low.len() < high.len());
    }
}
