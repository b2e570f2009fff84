//! Per-page events from PDF → DOCX.
//!
//! Attach an implementation with
//! [`crate::config::PdfToWordConfigBuilder::progress_callback`] to follow a
//! conversion page by page, in text mode and in the image fallback alike.
//!
//! ```rust
//! use loving_converter::{ConversionProgressCallback, PdfToWordConfig};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct FailedPages(Mutex<Vec<usize>>);
//!
//! impl ConversionProgressCallback for FailedPages {
//!     fn on_page_error(&self, page_num: usize, _total: usize, error: &str) {
//!         eprintln!("page {page_num}: {error}");
//!         self.0.lock().unwrap().push(page_num);
//!     }
//! }
//!
//! let failed = Arc::new(FailedPages::default());
//! let config = PdfToWordConfig::builder()
//!     .progress_callback(failed.clone())
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Receiver for conversion events. Every method defaults to doing nothing.
///
/// Events arrive on the blocking thread that owns pdfium, so
/// implementations must be `Send + Sync`.
pub trait ConversionProgressCallback: Send + Sync {
    /// The document is open and has `total_pages` pages.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Text extraction of `page_num` (1-based) begins.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// `page_num` made it into the DOCX. `chars` counts the cleaned text
    /// written for it; image-fallback pages report 0.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// `page_num` could not be extracted or rendered and was left out.
    /// The remaining pages are still converted.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Every page has been attempted; `success_count` of them made it.
    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// Ignores every event.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// How [`crate::config::PdfToWordConfig`] holds its callback.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
