//! Minimal Office Open XML (`.docx`) packages.
//!
//! A DOCX is a ZIP container. The writer emits only the parts Word needs to
//! open a file (content types, package relationships, the main document and
//! its relationships, plus any media), and the reader only looks at
//! `word/document.xml`.

pub mod reader;
pub mod writer;

pub use reader::{read_paragraphs, DocxParagraph};
pub use writer::{image_document, text_document, WordParagraph};

/// MIME type of a `.docx` file.
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;
