//! Positioned text runs from a pdfium page.

use super::lines::TextItem;
use pdfium_render::prelude::*;
use tracing::debug;

/// Every text segment on the page, anchored at the origin of its first
/// visible glyph so that runs sharing a baseline share a `y` regardless of
/// descenders. Whitespace-only segments are skipped.
pub fn page_text_items(page: &PdfPage) -> Result<Vec<TextItem>, PdfiumError> {
    let text = page.text()?;
    let items: Vec<TextItem> = text
        .segments()
        .iter()
        .filter_map(|segment| {
            let content = segment.text();
            if content.trim().is_empty() {
                return None;
            }
            let bounds = segment.bounds();
            let (x, y) = run_anchor(
                first_glyph_origin(&segment),
                (bounds.left().value, bounds.bottom().value),
            );
            Some(TextItem::new(x, y, content))
        })
        .collect();
    debug!(runs = items.len(), "Extracted text runs");
    Ok(items)
}

fn first_glyph_origin(segment: &PdfPageTextSegment) -> Option<(f32, f32)> {
    let chars = segment.chars().ok()?;
    let glyph = chars
        .iter()
        .find(|c| c.unicode_char().is_some_and(|ch| !ch.is_whitespace()))?;
    glyph.origin().ok().map(|(x, y)| (x.value, y.value))
}

/// The baseline origin when pdfium reports one, else the bottom-left of the
/// run's bounding box.
fn run_anchor(origin: Option<(f32, f32)>, bottom_left: (f32, f32)) -> (f32, f32) {
    origin
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unwrap_or(bottom_left)
}
