//! # loving-converter
//!
//! A PDF toolkit: merge, split, compress, rotate, watermark and number
//! pages, build PDFs from images, and convert between PDF and DOCX.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes ──▶ pdf::*                 lopdf object-graph edits ──▶ PDF bytes
//!
//! PDF bytes ──▶ convert::pdf_to_word
//!                ├─ 1. Input    check %PDF magic
//!                ├─ 2. Load     pdfium (one page-tree rebuild on failure)
//!                ├─ 3. Extract  positioned text runs per page
//!                ├─ 4. Lines    rows → lines → paragraphs
//!                ├─ 5. Clean    mojibake repair, XML sanitising
//!                └─ 6. Output   text DOCX, or image DOCX when no text exists
//!
//! DOCX bytes ──▶ PdfConverter          local layout | LibreOffice | CloudConvert
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loving_converter::{merge_pdfs, pdf_to_word, PdfToWordConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let a = std::fs::read("a.pdf")?;
//!     let b = std::fs::read("b.pdf")?;
//!     std::fs::write("merged.pdf", merge_pdfs(&[&a, &b])?)?;
//!
//!     let output = pdf_to_word(&a, &PdfToWordConfig::default()).await?;
//!     std::fs::write("a.docx", &output.bytes)?;
//!     eprintln!("{:?} DOCX, {} pages", output.kind, output.stats.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lovingconv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! loving-converter = { version = "0.2", default-features = false }
//! ```
//!
//! ## Run-time requirements
//!
//! Only PDF → DOCX needs libpdfium (see [`pdfium`]). The LibreOffice
//! back-end needs `soffice`; the CloudConvert back-end needs
//! `CLOUDCONVERT_API_KEY`.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cloudconvert;
pub mod config;
pub mod convert;
pub mod docx;
pub mod error;
pub mod libreoffice;
pub mod output;
pub mod pdf;
pub mod pdfium;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cloudconvert::CloudConvertClient;
pub use config::{
    CloudConvertConfig, CloudConvertConfigBuilder, CompressionLevel, PageRange, PageSelection, PdfToWordConfig,
    PdfToWordConfigBuilder, SplitMode, SplitOptions, WatermarkOptions, WatermarkOptionsBuilder,
};
pub use convert::{
    inspect, pdf_to_word, pdf_to_word_file, pdf_to_word_sync, word_to_pdf, LocalWordConverter, PdfConverter,
};
pub use error::{ConverterError, PageError};
pub use libreoffice::LibreOfficeConverter;
pub use output::{
    download_name, mime_extension, ConversionOutput, ConversionStats, DocumentMetadata, DocxKind, PageResult,
};
pub use pdf::{
    add_page_numbers, compress_pdf, images_to_pdf, merge_pdfs, organize_pdf, page_count, pdf_info, protect_pdf,
    rebuild_via_copy_pages, reorder_pages, repair_pdf, rotate_pdf, split_pdf, split_pdf_with, watermark_pdf,
};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
