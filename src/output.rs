//! Result types and output file naming.

use crate::docx::DOCX_MIME;
use crate::error::PageError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";

/// Which kind of DOCX [`crate::convert::pdf_to_word`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocxKind {
    /// Editable paragraphs rebuilt from the PDF's text layer.
    Text,
    /// One rendered picture per page; the PDF had no extractable text.
    Image,
}

/// The complete result of a PDF → DOCX conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The `.docx` file.
    pub bytes: Vec<u8>,
    /// Always [`DOCX_MIME`].
    pub mime: &'static str,
    pub kind: DocxKind,
    /// Per-page results, in page order.
    pub pages: Vec<PageResult>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    pub(crate) fn docx(bytes: Vec<u8>, kind: DocxKind, pages: Vec<PageResult>, stats: ConversionStats) -> Self {
        Self {
            bytes,
            mime: DOCX_MIME,
            kind,
            pages,
            stats,
        }
    }
}

/// What happened to one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Characters of cleaned text recovered (0 in image mode).
    pub chars: usize,
    /// Paragraphs written for this page (text mode).
    pub paragraphs: usize,
    /// Set when the page could not be read or rendered.
    pub error: Option<PageError>,
}

/// Aggregate statistics for a conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_pages: usize,
    /// Pages that contributed content.
    pub processed_pages: usize,
    /// Pages that failed extraction or rendering.
    pub failed_pages: usize,
    /// True when the input only loaded after being rebuilt page by page.
    pub repaired: bool,
    pub total_duration_ms: u64,
    pub extract_duration_ms: u64,
    pub render_duration_ms: u64,
}

/// Basic facts about a PDF, read without rendering anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    pub is_encrypted: bool,
}

// ── File naming ──────────────────────────────────────────────────────────

/// File extension (with the dot) for a MIME type. Unknown types map to `.pdf`.
pub fn mime_extension(mime: &str) -> &'static str {
    match mime {
        "application/pdf" => ".pdf",
        "application/msword" | "application/rtf" => ".doc",
        DOCX_MIME => ".docx",
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "application/zip" => ".zip",
        "text/plain" => ".txt",
        _ => ".pdf",
    }
}

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Download name for a tool's output: `loving-converter-<tool>[_part_<n>]<ext>`,
/// where `<tool>` is lowercased with whitespace runs replaced by `-`.
pub fn download_name(tool: &str, part: Option<usize>, mime: &str) -> String {
    let slug = RE_WHITESPACE.replace_all(&tool.to_lowercase(), "-").into_owned();
    let suffix = part.map(|n| format!("_part_{n}")).unwrap_or_default();
    format!("loving-converter-{slug}{suffix}{}", mime_extension(mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_extension() {
        assert_eq!(mime_extension(PDF_MIME), ".pdf");
        assert_eq!(mime_extension(DOCX_MIME), ".docx");
        assert_eq!(mime_extension("application/rtf"), ".doc");
        assert_eq!(mime_extension("image/jpeg"), ".jpg");
        assert_eq!(mime_extension("text/plain"), ".txt");
        assert_eq!(mime_extension("application/x-unknown"), ".pdf");
    }

    #[test]
    fn test_download_name() {
        assert_eq!(
            download_name("Split PDF", Some(2), PDF_MIME),
            "loving-converter-split-pdf_part_2.pdf"
        );
        assert_eq!(
            download_name("PDF  to\tWord", None, DOCX_MIME),
            "loving-converter-pdf-to-word.docx"
        );
    }

    #[test]
    fn test_stats_serialise() {
        let stats = ConversionStats {
            total_pages: 3,
            processed_pages: 2,
            failed_pages: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"failed_pages\":1"));
    }
}
