//! End-to-end tests that need native pieces outside the crate.
//!
//! PDF → DOCX needs libpdfium and runs only with `PDFIUM_TESTS` set; the
//! LibreOffice back-end needs `soffice` on `PATH` and runs only with
//! `SOFFICE_TESTS` set. Everything else here always runs.
//!
//! Run with:
//!   PDFIUM_TESTS=1 PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture
//!
//! To include LibreOffice:
//!   PDFIUM_TESTS=1 SOFFICE_TESTS=1 cargo test --test e2e -- --nocapture

mod common;

use common::{blank_pdf, docx, numbered_pdf, page_count, text_pdf, text_pdf_runs, zip_part};
use loving_converter::{
    inspect, pdf_to_word, pdf_to_word_file, pdf_to_word_sync, ConversionProgressCallback, ConverterError, DocxKind,
    LibreOfficeConverter, NoopProgressCallback, PdfConverter, PdfToWordConfig,
};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────

/// Return early unless the named environment variable is set.
macro_rules! skip_unless {
    ($var:literal) => {{
        if std::env::var($var).is_err() {
            println!("SKIP: set {}=1 to run this test", $var);
            return;
        }
    }};
}

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for EventLog {
    fn on_conversion_start(&self, total_pages: usize) {
        self.events.lock().unwrap().push(format!("start {total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, _total_pages: usize, _chars: usize) {
        self.events.lock().unwrap().push(format!("page {page_num}"));
    }

    fn on_page_error(&self, page_num: usize, _total_pages: usize, error: &str) {
        self.events.lock().unwrap().push(format!("error {page_num}: {error}"));
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {success_count}/{total_pages}"));
    }
}

// ── Always-on ────────────────────────────────────────────────────────────

#[tokio::test]
async fn inspect_reads_metadata_without_pdfium() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("three.pdf");
    std::fs::write(&path, numbered_pdf(3)).unwrap();

    let meta = inspect(&path).await.unwrap();
    println!("{}", serde_json::to_string_pretty(&meta).unwrap());
    assert_eq!(meta.page_count, 3);
    assert_eq!(meta.pdf_version, "1.5");
    assert!(!meta.is_encrypted);
}

#[tokio::test]
async fn inspect_nonexistent_file() {
    let err = inspect("/definitely/not/here.pdf").await.unwrap_err();
    assert!(matches!(err, ConverterError::FileNotFound { .. }), "{err}");
}

#[tokio::test]
async fn pdf_to_word_rejects_non_pdf_before_loading_pdfium() {
    let err = pdf_to_word(&docx(&[("", "x")]), &PdfToWordConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConverterError::NotAPdf { .. }), "{err}");
}

#[test]
fn noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NoopProgressCallback>();

    let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
    cb.on_page_error(1, 1, "an error");
}

// ── PDF → DOCX (pdfium) ──────────────────────────────────────────────────

#[tokio::test]
async fn text_pdf_becomes_text_docx() {
    skip_unless!("PDFIUM_TESTS");

    let pdf = text_pdf(&[&["Annual report", "Second line"], &["Closing remarks"]]);
    let log = Arc::new(EventLog::default());
    let config = PdfToWordConfig::builder()
        .progress_callback(Arc::clone(&log) as Arc<dyn ConversionProgressCallback>)
        .build()
        .unwrap();

    let output = pdf_to_word(&pdf, &config).await.unwrap();
    println!("{:#?}", output.stats);

    assert_eq!(output.kind, DocxKind::Text);
    assert_eq!(output.stats.total_pages, 2);
    assert_eq!(output.stats.failed_pages, 0);

    let xml = zip_part(&output.bytes, "word/document.xml");
    assert!(xml.contains("Annual report"), "{xml}");
    assert!(xml.contains("Closing remarks"));
    assert!(xml.contains("<w:pageBreakBefore/>"));

    let events = log.events.lock().unwrap().clone();
    assert_eq!(events.first().map(String::as_str), Some("start 2"));
    assert_eq!(events.last().map(String::as_str), Some("done 2/2"));
}

#[tokio::test]
async fn runs_on_one_baseline_form_one_line() {
    skip_unless!("PDFIUM_TESTS");

    // "typing" descends below the baseline, "Hello" does not
    let runs: &[(i64, i64, &str)] = &[(300, 700, "Hello"), (72, 700, "typing")];
    let pdf = text_pdf_runs(&[runs]);
    let output = pdf_to_word(&pdf, &PdfToWordConfig::default()).await.unwrap();

    let xml = zip_part(&output.bytes, "word/document.xml");
    let typing = xml.find("typing").expect("typing missing");
    let hello = xml.find("Hello").expect("Hello missing");
    assert!(typing < hello, "runs were not read left to right: {xml}");
}

#[tokio::test]
async fn textless_pdf_falls_back_to_page_images() {
    skip_unless!("PDFIUM_TESTS");

    let config = PdfToWordConfig::builder().render_scale(0.5).build().unwrap();
    let output = pdf_to_word(&blank_pdf(2), &config).await.unwrap();

    assert_eq!(output.kind, DocxKind::Image);
    assert_eq!(output.pages.len(), 2);
    let rels = zip_part(&output.bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains("media/image1.jpg"));
    assert!(rels.contains("media/image2.jpg"));
}

#[tokio::test]
async fn file_conversion_leaves_no_temp_file() {
    skip_unless!("PDFIUM_TESTS");

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out/converted.docx");
    std::fs::write(&input, numbered_pdf(2)).unwrap();

    let stats = pdf_to_word_file(&input, &output, &PdfToWordConfig::default())
        .await
        .unwrap();
    assert_eq!(stats.total_pages, 2);
    assert!(output.exists());
    assert!(!output.with_extension("docx.tmp").exists());
}

#[test]
fn sync_wrapper_converts_outside_a_runtime() {
    skip_unless!("PDFIUM_TESTS");

    let output = pdf_to_word_sync(&numbered_pdf(1), &PdfToWordConfig::default()).unwrap();
    assert_eq!(output.kind, DocxKind::Text);
    assert!(zip_part(&output.bytes, "word/document.xml").contains("Page 1"));
}

// ── DOCX → PDF (LibreOffice) ─────────────────────────────────────────────

#[tokio::test]
async fn libreoffice_converts_docx() {
    skip_unless!("SOFFICE_TESTS");

    let backend: Box<dyn PdfConverter> = Box::new(LibreOfficeConverter::default());
    let pdf = backend
        .to_pdf(&docx(&[("Heading1", "Agenda"), ("", "Item one")]), "agenda.docx")
        .await
        .unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(page_count(&pdf) >= 1);
}
