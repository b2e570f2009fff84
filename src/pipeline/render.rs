//! PDF rasterisation: render a page to JPEG via pdfium.
//!
//! Rendering is scale-based rather than pixel-capped: the image fallback
//! wants pages at a fixed multiple of their point size (2× by default) so
//! every page keeps its proportions in the resulting DOCX.

use super::encode::encode_jpeg;
use crate::error::ConverterError;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    #[serde(skip)]
    pub jpeg: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl PageImage {
    /// Height divided by width; 1.0 for degenerate images.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width_px == 0 {
            1.0
        } else {
            f64::from(self.height_px) / f64::from(self.width_px)
        }
    }
}

/// Render `page` at `scale` × its size in points and encode as JPEG.
///
/// Must be called from a blocking context (see `spawn_blocking` in
/// [`crate::convert`]).
pub fn render_page(
    page: &PdfPage,
    page_num: usize,
    scale: f32,
    jpeg_quality: u8,
) -> Result<PageImage, ConverterError> {
    let config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| ConverterError::RasterisationFailed {
            page: page_num,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    let jpeg = encode_jpeg(&image, jpeg_quality).map_err(|e| ConverterError::RasterisationFailed {
        page: page_num,
        detail: format!("JPEG encoding failed: {e}"),
    })?;
    debug!(
        "Rendered page {} → {}x{} px, {} bytes",
        page_num,
        image.width(),
        image.height(),
        jpeg.len()
    );

    Ok(PageImage {
        jpeg,
        width_px: image.width(),
        height_px: image.height(),
    })
}
