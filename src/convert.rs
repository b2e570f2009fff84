//! Format conversion entry points.
//!
//! ## PDF → DOCX
//!
//! [`pdf_to_word`] prefers editable text: it rebuilds paragraphs from the
//! positioned text runs pdfium reports for each page. Only when the whole
//! document yields no text at all (scans, flattened exports) does it fall
//! back to rendering every page and embedding the pictures.
//!
//! ## DOCX → PDF
//!
//! [`word_to_pdf`] lays out a DOCX's paragraphs with the standard Helvetica
//! fonts. For faithful output use one of the external back-ends behind the
//! [`PdfConverter`] trait.

mod backend;
mod word_to_pdf;

pub use backend::{LocalWordConverter, PdfConverter};
pub use word_to_pdf::{layout_paragraphs, word_to_pdf};

use crate::config::PdfToWordConfig;
use crate::docx::{self, WordParagraph};
use crate::error::{ConverterError, PageError};
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata, DocxKind, PageResult};
use crate::pdf::rebuild_via_copy_pages;
use crate::pipeline::{clean, extract, input, lines, render};
use crate::pdfium;
use pdfium_render::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert PDF bytes to a DOCX.
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(ConverterError)` only for fatal errors:
/// - Not a PDF, or a PDF neither pdfium nor a page-tree rebuild can open
/// - Password missing or wrong
/// - No text anywhere and no page could be rendered
pub async fn pdf_to_word(bytes: &[u8], config: &PdfToWordConfig) -> Result<ConversionOutput, ConverterError> {
    input::check_pdf_magic(bytes)?;
    info!(bytes = bytes.len(), "Starting PDF → DOCX conversion");

    // pdfium is synchronous and not async-safe
    let owned = bytes.to_vec();
    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_blocking(&owned, &config))
        .await
        .map_err(|e| ConverterError::Internal(format!("conversion task panicked: {e}")))?
}

/// Convert a PDF file and write the DOCX to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn pdf_to_word_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &PdfToWordConfig,
) -> Result<ConversionStats, ConverterError> {
    let bytes = input::read_pdf(input_path).await?;
    let output = pdf_to_word(&bytes, config).await?;
    write_atomic(output_path.as_ref(), &output.bytes, "docx.tmp").await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`pdf_to_word`].
///
/// Creates a temporary tokio runtime internally.
pub fn pdf_to_word_sync(bytes: &[u8], config: &PdfToWordConfig) -> Result<ConversionOutput, ConverterError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConverterError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(pdf_to_word(bytes, config))
}

/// Extract PDF metadata without converting content. Does not need pdfium.
pub async fn inspect(path: impl AsRef<Path>) -> Result<DocumentMetadata, ConverterError> {
    let bytes = input::read_pdf(path).await?;
    crate::pdf::pdf_info(&bytes)
}

/// Write `data` next to `path` under a temporary extension, then rename.
pub(crate) async fn write_atomic(path: &Path, data: &[u8], tmp_extension: &str) -> Result<(), ConverterError> {
    let write_failed = |source| ConverterError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }
    let tmp_path = path.with_extension(tmp_extension);
    tokio::fs::write(&tmp_path, data).await.map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Everything pdfium touches, run on a blocking thread.
fn convert_blocking(bytes: &[u8], config: &PdfToWordConfig) -> Result<ConversionOutput, ConverterError> {
    let total_start = Instant::now();
    let pdfium = pdfium::bind()?;
    let password = config.password.as_deref();

    // ── Step 1: Load, rebuilding the page tree once if pdfium refuses ────
    let rebuilt: Vec<u8>;
    let (document, repaired) = match pdfium::open(&pdfium, bytes, password) {
        Ok(document) => (document, false),
        Err(first) => {
            rebuilt = rebuild_for_retry(bytes, first)?;
            (pdfium::open(&pdfium, &rebuilt, password)?, true)
        }
    };

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF has {} pages", total_pages);
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 2: Text of every page ───────────────────────────────────────
    let extract_start = Instant::now();
    let texts: Vec<Result<String, PageError>> = pages
        .iter()
        .enumerate()
        .map(|(idx, page)| page_text(&page, idx + 1, config.paragraph_gap_ratio))
        .collect();
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;


    let mut stats = ConversionStats {
        total_pages,
        repaired,
        extract_duration_ms,
        ..Default::default()
    };

    // ── Step 3: Build the DOCX ───────────────────────────────────────────
    let (bytes, kind, results) = if docx_kind(&texts) == DocxKind::Text {
        let (paragraphs, results) = text_paragraphs(texts, config);
        (docx::text_document(&paragraphs)?, DocxKind::Text, results)
    } else {
        info!("No text layer found; rendering pages as images");
        let render_start = Instant::now();
        let (images, results) = render_pages(&pages, config);
        stats.render_duration_ms = render_start.elapsed().as_millis() as u64;
        if images.is_empty() {
            return Err(ConverterError::NoPagesRendered);
        }
        (docx::image_document(&images)?, DocxKind::Image, results)
    };

    stats.processed_pages = results.iter().filter(|p| p.error.is_none()).count();
    stats.failed_pages = results.len() - stats.processed_pages;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {}/{} pages, {:?} DOCX, {}ms total",
        stats.processed_pages, total_pages, kind, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages, stats.processed_pages);
    }

    Ok(ConversionOutput::docx(bytes, kind, results, stats))
}

/// Bytes for a second pdfium attempt after `first` failed: every page
/// copied into a fresh document. Password errors and files lopdf cannot
/// rebuild give back `first`.
fn rebuild_for_retry(bytes: &[u8], first: ConverterError) -> Result<Vec<u8>, ConverterError> {
    if matches!(first, ConverterError::PasswordRequired | ConverterError::WrongPassword) {
        return Err(first);
    }
    warn!(error = %first, "pdfium could not open the document; rebuilding page tree");
    rebuild_via_copy_pages(bytes).map_err(|_| first)
}

/// Editable text when any page yielded some, page images otherwise.
fn docx_kind(texts: &[Result<String, PageError>]) -> DocxKind {
    let has_text = texts
        .iter()
        .any(|t| t.as_ref().is_ok_and(|text| !text.trim().is_empty()));
    if has_text {
        DocxKind::Text
    } else {
        DocxKind::Image
    }
}

/// Reconstructed, cleaned text of one page.
fn page_text(page: &PdfPage, page_num: usize, gap_ratio: Option<f32>) -> Result<String, PageError> {
    let items = extract::page_text_items(page).map_err(|e| {
        warn!("Text extraction failed on page {}: {:?}", page_num, e);
        PageError::ExtractFailed {
            page: page_num,
            detail: format!("{e:?}"),
        }
    })?;
    let text = clean::clean_text(&lines::reconstruct_page(&items, gap_ratio));
    debug!(page = page_num, runs = items.len(), chars = text.len(), "Page text reconstructed");
    Ok(text)
}

/// Paragraph list for a text DOCX. Every page after the first starts on a
/// new page; a page without text still gets one empty paragraph.
fn text_paragraphs(
    texts: Vec<Result<String, PageError>>,
    config: &PdfToWordConfig,
) -> (Vec<WordParagraph>, Vec<PageResult>) {
    let total_pages = texts.len();
    let mut paragraphs = Vec::new();
    let mut results = Vec::with_capacity(total_pages);

    for (idx, text) in texts.into_iter().enumerate() {
        let page_num = idx + 1;
        let page_break = idx > 0;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let (text, error) = match text {
            Ok(text) => (text, None),
            Err(e) => (String::new(), Some(e)),
        };
        let page_paragraphs = lines::split_paragraphs(&text);
        let chars: usize = page_paragraphs.iter().map(|p| p.chars().count()).sum();

        if page_paragraphs.is_empty() {
            paragraphs.push(WordParagraph::empty_page(page_break));
        } else {
            paragraphs.extend(
                page_paragraphs
                    .iter()
                    .enumerate()
                    .map(|(i, p)| WordParagraph::new(p.as_str()).with_page_break(page_break && i == 0)),
            );
        }

        if let Some(ref cb) = config.progress_callback {
            match &error {
                None => cb.on_page_complete(page_num, total_pages, chars),
                Some(e) => cb.on_page_error(page_num, total_pages, &e.to_string()),
            }
        }
        results.push(PageResult {
            page_num,
            chars,
            paragraphs: page_paragraphs.len(),
            error,
        });
    }
    (paragraphs, results)
}

/// Render every page for an image DOCX. Pages that fail are skipped and
/// reported.
fn render_pages(pages: &PdfPages, config: &PdfToWordConfig) -> (Vec<render::PageImage>, Vec<PageResult>) {
    let total_pages = pages.len() as usize;
    let mut images = Vec::with_capacity(total_pages);
    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }
        let error = match render::render_page(&page, page_num, config.render_scale, config.jpeg_quality) {
            Ok(image) => {
                images.push(image);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total_pages, 0);
                }
                None
            }
            Err(e) => {
                warn!("Failed to render page {}: {}", page_num, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, &e.to_string());
                }
                Some(PageError::RenderFailed {
                    page: page_num,
                    detail: e.to_string(),
                })
            }
        };
        results.push(PageResult {
            page_num,
            chars: 0,
            paragraphs: 0,
            error,
        });
    }
    (images, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConversionProgressCallback;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_page_complete(&self, page_num: usize, _total: usize, chars: usize) {
            self.events.lock().unwrap().push(format!("ok {page_num} {chars}"));
        }
        fn on_page_error(&self, page_num: usize, _total: usize, _error: &str) {
            self.events.lock().unwrap().push(format!("err {page_num}"));
        }
    }

    #[test]
    fn text_paragraphs_break_pages_and_fill_blank_ones() {
        let texts = vec![
            Ok("Intro line\ncontinues\n\nSecond para".to_string()),
            Ok(String::new()),
            Err(PageError::ExtractFailed {
                page: 3,
                detail: "boom".into(),
            }),
            Ok("Last".to_string()),
        ];
        let recorder = Arc::new(Recorder::default());
        let config = PdfToWordConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();

        let (paragraphs, results) = text_paragraphs(texts, &config);
        assert_eq!(
            paragraphs,
            vec![
                WordParagraph::new("Intro line continues"),
                WordParagraph::new("Second para"),
                WordParagraph::empty_page(true),
                WordParagraph::empty_page(true),
                WordParagraph::new("Last").with_page_break(true),
            ]
        );
        assert_eq!(results[0].paragraphs, 2);
        assert!(results[2].error.is_some());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["ok 1 31", "ok 2 0", "err 3", "ok 4 4"]
        );
    }

    #[test]
    fn broken_xref_is_rebuilt_for_a_second_attempt() {
        use crate::pdf::test_support::{break_startxref, sample_pdf};

        let broken = break_startxref(&sample_pdf(2));
        assert!(lopdf::Document::load_mem(&broken).is_err());

        let first = ConverterError::CorruptPdf {
            detail: "pdfium: format error".into(),
        };
        let rebuilt = rebuild_for_retry(&broken, first).unwrap();
        let doc = lopdf::Document::load_mem(&rebuilt).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn password_errors_are_not_retried() {
        use crate::pdf::test_support::sample_pdf;

        let err = rebuild_for_retry(&sample_pdf(1), ConverterError::WrongPassword).unwrap_err();
        assert!(matches!(err, ConverterError::WrongPassword));
    }

    #[test]
    fn unrecoverable_files_keep_the_first_error() {
        let first = ConverterError::CorruptPdf {
            detail: "pdfium: format error".into(),
        };
        let err = rebuild_for_retry(b"%PDF-1.4\ngarbage", first).unwrap_err();
        match err {
            ConverterError::CorruptPdf { detail } => assert_eq!(detail, "pdfium: format error"),
            other => panic!("expected CorruptPdf, got {other}"),
        }
    }

    #[test]
    fn any_page_text_selects_a_text_docx() {
        let failed = || -> Result<String, PageError> {
            Err(PageError::ExtractFailed {
                page: 1,
                detail: "boom".into(),
            })
        };
        assert_eq!(docx_kind(&[Ok("  \n ".into()), Ok("words".into())]), DocxKind::Text);
        assert_eq!(docx_kind(&[failed(), Ok("words".into())]), DocxKind::Text);
        assert_eq!(docx_kind(&[Ok(String::new()), Ok(" ".into())]), DocxKind::Image);
        assert_eq!(docx_kind(&[failed()]), DocxKind::Image);
        assert_eq!(docx_kind(&[]), DocxKind::Image);
    }

    #[test]
    fn rejects_non_pdf_before_touching_pdfium() {
        let err = pdf_to_word_sync(b"PK\x03\x04 not a pdf", &PdfToWordConfig::default()).unwrap_err();
        assert!(matches!(err, ConverterError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.docx");
        write_atomic(&path, b"data", "docx.tmp").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        assert!(!path.with_extension("docx.tmp").exists());
    }
}
