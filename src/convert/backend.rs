//! Interchangeable DOCX → PDF back-ends.

use super::word_to_pdf::word_to_pdf;
use crate::error::ConverterError;
use async_trait::async_trait;

/// Anything that can turn an office document into PDF bytes.
///
/// Implemented by [`LocalWordConverter`],
/// [`crate::libreoffice::LibreOfficeConverter`] and
/// [`crate::cloudconvert::CloudConvertClient`], so the back-end can be
/// picked at run time:
///
/// ```rust,no_run
/// use loving_converter::{LocalWordConverter, PdfConverter};
///
/// # async fn run(docx: Vec<u8>) -> Result<(), loving_converter::ConverterError> {
/// let backend: Box<dyn PdfConverter> = Box::new(LocalWordConverter);
/// let pdf = backend.to_pdf(&docx, "report.docx").await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PdfConverter: Send + Sync {
    /// Convert `bytes`. `filename` is the original file name; back-ends use
    /// its extension to tell the input format.
    async fn to_pdf(&self, bytes: &[u8], filename: &str) -> Result<Vec<u8>, ConverterError>;

    /// Short name for logs and CLI output.
    fn name(&self) -> &'static str;
}

/// The built-in Helvetica layout engine. Only reads `.docx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWordConverter;

#[async_trait]
impl PdfConverter for LocalWordConverter {
    async fn to_pdf(&self, bytes: &[u8], _filename: &str) -> Result<Vec<u8>, ConverterError> {
        word_to_pdf(bytes)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_backend_rejects_non_docx() {
        let backend: Box<dyn PdfConverter> = Box::new(LocalWordConverter);
        let err = backend.to_pdf(b"%PDF-1.5", "x.docx").await.unwrap_err();
        assert!(matches!(err, ConverterError::InvalidDocx(_)));
        assert_eq!(backend.name(), "local");
    }
}
