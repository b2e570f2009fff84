//! Pipeline stages for PDF → DOCX conversion.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested without pdfium wherever possible.
//!
//! ## Data Flow
//!
//! ```text
//!                      ┌─▶ extract ──▶ lines ──▶ clean ──▶ docx::writer (text)
//! input ──▶ pdfium ────┤
//! (bytes)   (load)     └─▶ render ──▶ encode ─────────────▶ docx::writer (image)
//! ```
//!
//! 1. [`input`]   — read files and check magic bytes
//! 2. [`extract`] — positioned text runs per page (pdfium)
//! 3. [`lines`]   — runs → lines → paragraphs
//! 4. [`clean`]   — mojibake repair and XML sanitising
//! 5. [`render`]  — rasterise a page when the document has no text layer
//! 6. [`encode`]  — JPEG-encode rendered pages and foreign images

pub mod clean;
pub mod encode;
pub mod extract;
pub mod input;
pub mod lines;
pub mod render;
