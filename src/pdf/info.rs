//! Document metadata from the trailer's `/Info` dictionary.

use super::{load, resolve};
use crate::error::ConverterError;
use crate::output::DocumentMetadata;
use lopdf::{Document, Object};

/// Read version, page count, encryption flag and the common `/Info`
/// entries without touching page content.
pub fn pdf_info(bytes: &[u8]) -> Result<DocumentMetadata, ConverterError> {
    let doc = load(bytes)?;
    let mut meta = DocumentMetadata {
        page_count: doc.get_pages().len(),
        pdf_version: doc.version.clone(),
        is_encrypted: doc.trailer.get(b"Encrypt").is_ok(),
        ..Default::default()
    };

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve(&doc, obj).as_dict().ok());
    if let Some(info) = info {
        let field = |key: &[u8]| info.get(key).ok().and_then(|o| text_string(&doc, o));
        meta.title = field(b"Title");
        meta.author = field(b"Author");
        meta.subject = field(b"Subject");
        meta.creator = field(b"Creator");
        meta.producer = field(b"Producer");
    }
    Ok(meta)
}

/// Decode a PDF text string: UTF-16BE when it starts with a BOM,
/// otherwise treated as Latin-1. Empty strings count as absent.
fn text_string(doc: &Document, obj: &Object) -> Option<String> {
    let Object::String(bytes, _) = resolve(doc, obj) else {
        return None;
    };
    let text = match bytes.as_slice() {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        latin1 => latin1.iter().map(|&b| char::from(b)).collect(),
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}
