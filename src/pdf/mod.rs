//! Structural PDF operations on the lopdf object graph.
//!
//! Every public function takes the raw bytes of one (or several) PDFs and
//! returns freshly serialised bytes; nothing is kept between calls.
//!
//! ```text
//! merge / split / organize / reorder ──▶ DocumentBuilder + PageCopier
//! rotate / protect / repair / compress ──▶ in-place edit of the loaded Document
//! watermark / page numbers             ──▶ stamp: extra content stream per page
//! images → PDF                          ──▶ DocumentBuilder::add_page
//! info                                 ──▶ read-only trailer lookup
//! ```
//!
//! Pages are never shared between documents by reference: a copy walks the
//! page's object graph and clones each reachable object exactly once into
//! the target (see [`PageCopier`]).

pub mod compress;
pub mod edit;
pub mod fonts;
pub mod images;
pub mod info;
pub mod merge;
pub mod split;
pub mod stamp;
pub(crate) mod xref;

pub use compress::compress_pdf;
pub use edit::{organize_pdf, protect_pdf, rebuild_via_copy_pages, repair_pdf, reorder_pages, rotate_pdf};
pub use images::images_to_pdf;
pub use info::pdf_info;
pub use merge::merge_pdfs;
pub use split::{split_pdf, split_pdf_with};
pub use stamp::{add_page_numbers, watermark_pdf};

use crate::error::ConverterError;
use crate::pipeline::input::check_pdf_magic;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// PDF version written into every document this crate creates.
pub(crate) const PDF_VERSION: &str = "1.5";

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 32;

/// US Letter, used when a page carries no usable `/MediaBox` anywhere.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

// ── Load / save ──────────────────────────────────────────────────────────

/// Parse PDF bytes into a lopdf document.
///
/// A file whose cross-reference data is damaged is retried once with a
/// table rebuilt from its object headers. Encrypted files are not retried.
pub(crate) fn load(bytes: &[u8]) -> Result<Document, ConverterError> {
    check_pdf_magic(bytes)?;
    let first = match Document::load_mem(bytes) {
        Ok(doc) => return Ok(doc),
        Err(e) => e,
    };
    let retry = !matches!(first, lopdf::Error::Header | lopdf::Error::Decryption(_))
        && !contains(bytes, b"/Encrypt");
    if retry {
        if let Some(doc) = xref::reconstruct(bytes).and_then(|fixed| Document::load_mem(&fixed).ok()) {
            warn!(error = %first, "Loaded PDF through a rebuilt cross-reference table");
            return Ok(doc);
        }
    }
    Err(ConverterError::CorruptPdf {
        detail: first.to_string(),
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Serialise a document back to bytes.
pub(crate) fn save(doc: &mut Document) -> Result<Vec<u8>, ConverterError> {
    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(lopdf::Error::from)?;
    debug!(bytes = out.len(), "PDF serialised");
    Ok(out)
}

/// Number of pages in a PDF.
pub fn page_count(bytes: &[u8]) -> Result<usize, ConverterError> {
    Ok(load(bytes)?.get_pages().len())
}

/// Page object ids in document order.
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

// ── Page-tree helpers ────────────────────────────────────────────────────

/// Follow a reference to the object it names; other objects are returned as is.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Look up `key` on the page or, failing that, on its nearest ancestor.
pub(crate) fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    warn!(
        ?page_id,
        key = %String::from_utf8_lossy(key),
        "Page tree too deep; inherited attribute lookup abandoned"
    );
    None
}

/// The page's effective `/MediaBox` as `[x0, y0, x1, y1]`.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(obj) = inherited_attribute(doc, page_id, b"MediaBox") else {
        return DEFAULT_MEDIA_BOX;
    };
    let Ok(arr) = resolve(doc, &obj).as_array() else {
        return DEFAULT_MEDIA_BOX;
    };
    let values: Vec<f32> = arr
        .iter()
        .filter_map(|o| resolve(doc, o).as_float().ok())
        .collect();
    match values.as_slice() {
        [x0, y0, x1, y1] => [x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1)],
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// The page's effective rotation in degrees, normalised into `0..360`.
pub(crate) fn effective_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|o| resolve(doc, &o).as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360)
}

// ── Building new documents ───────────────────────────────────────────────

/// Assembles a fresh document: pages are appended one at a time and the
/// page tree plus catalog are written by [`DocumentBuilder::finish`].
pub(crate) struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Mutable access for adding resources (images, fonts, content streams).
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append a page built by the caller. `/Type` and `/Parent` are set here.
    pub(crate) fn add_page(&mut self, mut page: Dictionary) -> ObjectId {
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        let id = self.doc.add_object(page);
        self.kids.push(id);
        id
    }

    /// Copy `pages` of `source`, in the given order, onto the end of this document.
    pub(crate) fn copy_pages(&mut self, source: &Document, pages: &[ObjectId]) -> Result<(), ConverterError> {
        let mut copier = PageCopier::new(source, &mut self.doc, pages);
        let mut copied = Vec::with_capacity(pages.len());
        for &page_id in pages {
            copied.push(copier.copy_page(page_id)?);
        }
        for id in copied {
            if let Ok(dict) = self.doc.get_dictionary_mut(id) {
                dict.set("Parent", Object::Reference(self.pages_id));
            }
            self.kids.push(id);
        }
        Ok(())
    }

    pub(crate) fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Write the page tree and catalog and hand back the finished document.
    pub(crate) fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ])),
        );
        let catalog_id = self.doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc
    }

    pub(crate) fn finish_bytes(self) -> Result<Vec<u8>, ConverterError> {
        save(&mut self.finish())
    }
}

/// Deep-copies pages from one document into another.
///
/// Every source object is cloned at most once per copier; repeated
/// references (shared fonts, images, resource dictionaries) resolve to the
/// same target object. Target ids for all pages are reserved up front so
/// that links between copied pages stay intact, while references to pages
/// or page-tree nodes outside the copied set become `null`.
pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    memo: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(source: &'a Document, target: &'a mut Document, pages: &[ObjectId]) -> Self {
        let mut memo = HashMap::with_capacity(pages.len());
        for &page_id in pages {
            if !memo.contains_key(&page_id) {
                memo.insert(page_id, target.new_object_id());
            }
        }
        Self { source, target, memo }
    }

    /// Copy one page, carrying its inherited attributes onto the copy.
    ///
    /// A page listed twice is copied twice: the second copy gets a fresh id
    /// because a page object may appear only once in a page tree.
    pub(crate) fn copy_page(&mut self, page_id: ObjectId) -> Result<ObjectId, ConverterError> {
        let mut page = self.source.get_dictionary(page_id)?.clone();
        for key in INHERITABLE {
            if !page.has(key) {
                if let Some(value) = inherited_attribute(self.source, page_id, key) {
                    page.set(key.to_vec(), value);
                }
            }
        }
        page.remove(b"Parent");

        let target_id = match self.memo.get(&page_id) {
            Some(&id) if !self.target.objects.contains_key(&id) => id,
            _ => self.target.new_object_id(),
        };
        let copied = self.copy_dictionary(&page);
        self.target.objects.insert(target_id, Object::Dictionary(copied));
        Ok(target_id)
    }

    fn copy_reference(&mut self, id: ObjectId) -> Object {
        if let Some(&mapped) = self.memo.get(&id) {
            return Object::Reference(mapped);
        }
        let Ok(source_obj) = self.source.get_object(id) else {
            warn!(?id, "Dangling reference while copying page; replaced with null");
            return Object::Null;
        };
        if let Ok(name) = source_obj.type_name() {
            if name == "Page" || name == "Pages" {
                return Object::Null;
            }
        }
        let new_id = self.target.new_object_id();
        self.memo.insert(id, new_id);
        let copied = self.copy_object(source_obj);
        self.target.objects.insert(new_id, copied);
        Object::Reference(new_id)
    }

    fn copy_object(&mut self, obj: &Object) -> Object {
        match obj {
            Object::Reference(id) => self.copy_reference(*id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)),
            Object::Array(items) => Object::Array(items.iter().map(|o| self.copy_object(o)).collect()),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(&stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            out.set(key.clone(), self.copy_object(value));
        }
        out
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{page_text, sample_pdf};
    use super::*;

    #[test]
    fn inherited_attributes_are_found_on_ancestors() {
        let doc = load(&sample_pdf(2)).unwrap();
        let first = page_ids(&doc)[0];
        assert!(doc.get_dictionary(first).unwrap().get(b"MediaBox").is_err());
        assert_eq!(media_box(&doc, first), [0.0, 0.0, 595.0, 842.0]);
        assert!(inherited_attribute(&doc, first, b"Resources").is_some());
        assert_eq!(effective_rotation(&doc, first), 0);
    }

    #[test]
    fn copied_pages_carry_inherited_attributes() {
        let source = load(&sample_pdf(3)).unwrap();
        let ids = page_ids(&source);
        let mut builder = DocumentBuilder::new();
        builder.copy_pages(&source, &[ids[2], ids[0]]).unwrap();
        let out = builder.finish();

        let copied = page_ids(&out);
        assert_eq!(copied.len(), 2);
        let page = out.get_dictionary(copied[0]).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert!(page_text(&out, copied[0]).contains("Page 3"));
        assert!(page_text(&out, copied[1]).contains("Page 1"));
    }

    #[test]
    fn shared_objects_are_copied_once() {
        let source = load(&sample_pdf(4)).unwrap();
        let mut builder = DocumentBuilder::new();
        builder.copy_pages(&source, &page_ids(&source)).unwrap();
        let out = builder.finish();

        let fonts = out
            .objects
            .values()
            .filter(|o| o.type_name().map(|n| n == "Font").unwrap_or(false))
            .count();
        assert_eq!(fonts, 1);
    }

    #[test]
    fn references_to_other_pages_are_not_followed() {
        let mut source = load(&sample_pdf(2)).unwrap();
        let ids = page_ids(&source);
        let annot = source.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Annot".to_vec())),
            ("Subtype", Object::Name(b"Link".to_vec())),
            ("P", Object::Reference(ids[1])),
        ]));
        source
            .get_dictionary_mut(ids[0])
            .unwrap()
            .set("Annots", Object::Array(vec![Object::Reference(annot)]));

        let mut builder = DocumentBuilder::new();
        builder.copy_pages(&source, &ids[..1]).unwrap();
        let mut out = builder.finish();

        let pages = out
            .objects
            .values()
            .filter(|o| o.type_name().map(|n| n == "Page").unwrap_or(false))
            .count();
        assert_eq!(pages, 1);

        let bytes = save(&mut out).unwrap();
        assert_eq!(page_count(&bytes).unwrap(), 1);
    }

    #[test]
    fn load_recovers_from_a_broken_xref() {
        let doc = load(&test_support::break_startxref(&sample_pdf(2))).unwrap();
        assert_eq!(page_ids(&doc).len(), 2);
        assert!(page_text(&doc, page_ids(&doc)[1]).contains("Page 2"));
    }

    #[test]
    fn load_rejects_non_pdf_bytes() {
        assert!(matches!(load(b"PK\x03\x04rest"), Err(ConverterError::NotAPdf { .. })));
    }
}
