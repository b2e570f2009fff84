//! Whole-document edits: rotation, page order, metadata and repair.

use super::{effective_rotation, load, page_ids, save, DocumentBuilder};
use crate::error::ConverterError;
use lopdf::{Dictionary, Object};
use tracing::{info, warn};

/// Document-info subject written by [`protect_pdf`].
pub const PROTECTED_SUBJECT: &str = "Protected by Loving Converter";

/// Add `degrees` to the rotation of every page.
///
/// The page's effective rotation (its own `/Rotate` or the one it inherits)
/// is the starting point, and the result is normalised into `0..360`.
pub fn rotate_pdf(bytes: &[u8], degrees: i64) -> Result<Vec<u8>, ConverterError> {
    if degrees % 90 != 0 {
        return Err(ConverterError::InvalidInput(format!(
            "Rotation must be a multiple of 90 degrees, got {degrees}"
        )));
    }
    let mut doc = load(bytes)?;
    let pages = page_ids(&doc);
    for &page_id in &pages {
        let rotation = (effective_rotation(&doc, page_id) + degrees.rem_euclid(360)).rem_euclid(360);
        doc.get_dictionary_mut(page_id)?
            .set("Rotate", Object::Integer(rotation));
    }
    info!(pages = pages.len(), degrees, "Rotated pages");
    save(&mut doc)
}

/// Move the first page to the end. Documents with fewer than two pages are
/// returned re-saved but otherwise unchanged.
pub fn organize_pdf(bytes: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let total = super::page_count(bytes)?;
    if total < 2 {
        let mut doc = load(bytes)?;
        return save(&mut doc);
    }
    let order: Vec<u32> = (2..=total as u32).chain(std::iter::once(1)).collect();
    reorder_pages(bytes, &order)
}

/// Emit pages in the given 1-based order. Pages may be repeated or left out.
pub fn reorder_pages(bytes: &[u8], order: &[u32]) -> Result<Vec<u8>, ConverterError> {
    let source = load(bytes)?;
    let pages = page_ids(&source);
    if order.is_empty() {
        return Err(ConverterError::InvalidInput("Page order is empty".into()));
    }
    let selected = order
        .iter()
        .map(|&n| {
            pages
                .get((n as usize).wrapping_sub(1))
                .copied()
                .ok_or(ConverterError::PageOutOfRange {
                    page: n as usize,
                    total: pages.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = DocumentBuilder::new();
    builder.copy_pages(&source, &selected)?;
    info!(pages = selected.len(), "Reordered pages");
    builder.finish_bytes()
}

/// Mark the document as protected in its info dictionary.
///
/// This only records a `/Subject`; the file is not encrypted.
pub fn protect_pdf(bytes: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let mut doc = load(bytes)?;
    let subject = Object::string_literal(PROTECTED_SUBJECT);

    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok();
    match info_id.filter(|id| doc.get_dictionary(*id).is_ok()) {
        Some(id) => doc.get_dictionary_mut(id)?.set("Subject", subject),
        None => {
            if info_id.is_some() {
                warn!(?info_id, "Info reference is dangling; writing a new info dictionary");
            }
            let id = doc.add_object(Dictionary::from_iter([("Subject", subject)]));
            doc.trailer.set("Info", Object::Reference(id));
        }
    }
    save(&mut doc)
}

/// Parse and re-save. A damaged cross-reference table is rebuilt from the
/// object headers while loading, so the output gets a clean one; files with
/// no recoverable catalog are reported as [`ConverterError::CorruptPdf`].
pub fn repair_pdf(bytes: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let mut doc = load(bytes)?;
    info!(objects = doc.objects.len(), "Re-saving PDF");
    save(&mut doc)
}

/// Copy every page into a brand-new document with a fresh catalog and page
/// tree. Anything not reachable from a page (outlines, forms, stale objects)
/// is left behind.
pub fn rebuild_via_copy_pages(bytes: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let source = load(bytes)?;
    let pages = page_ids(&source);
    let mut builder = DocumentBuilder::new();
    builder.copy_pages(&source, &pages)?;
    info!(pages = pages.len(), "Rebuilt document from its pages");
    builder.finish_bytes()
}
