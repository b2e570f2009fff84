//! Binding to the pdfium shared library.
//!
//! pdfium is loaded at run time, never linked. Lookup order:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one;
//! 2. the platform library name in the working directory;
//! 3. the system library search path.
//!
//! Only text extraction and page rendering (PDF → DOCX) need pdfium; every
//! other operation in this crate runs on lopdf alone.

use crate::error::ConverterError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing at libpdfium (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium using the lookup order described in the module docs.
pub fn bind() -> Result<Pdfium, ConverterError> {
    let mut attempts: Vec<String> = Vec::new();

    if let Ok(configured) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let path = library_path(Path::new(&configured));
        match Pdfium::bind_to_library(&path) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", path.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e}", path.display())),
        }
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    match Pdfium::bind_to_library(&local) {
        Ok(bindings) => {
            debug!("Bound pdfium from working directory");
            return Ok(Pdfium::new(bindings));
        }
        Err(e) => attempts.push(format!("{}: {e}", local.display())),
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound system pdfium");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e}"));
            Err(ConverterError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

fn library_path(configured: &Path) -> PathBuf {
    if configured.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(configured)
    } else {
        configured.to_path_buf()
    }
}

/// Open a document from memory, turning pdfium's load errors into
/// password or corruption errors.
pub(crate) fn open<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    password: Option<&str>,
) -> Result<PdfDocument<'a>, ConverterError> {
    pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| {
            let detail = format!("{e:?}");
            if detail.contains("Password") {
                if password.is_some() {
                    ConverterError::WrongPassword
                } else {
                    ConverterError::PasswordRequired
                }
            } else {
                ConverterError::CorruptPdf { detail }
            }
        })
}
