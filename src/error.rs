//! Error types for the loving-converter library.
//!
//! Two error types mirror two failure scopes:
//!
//! * [`ConverterError`] — **Fatal**: the operation cannot produce an output
//!   (unreadable input, corrupt PDF, failed remote job, missing API key).
//!   Returned as `Err(ConverterError)` from every public operation.
//!
//! * [`PageError`] — **Non-fatal**: a single page could not be read or
//!   rendered during PDF → DOCX conversion. Stored inside
//!   [`crate::output::PageResult`]; the page contributes an empty paragraph
//!   and the rest of the document is still converted.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the loving-converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes were read, but they are not a PDF.
    #[error("Input is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    /// The caller passed arguments the operation cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}\nTry the repair operation first.")]
    CorruptPdf { detail: String },

    /// lopdf failed while reading or writing the object graph.
    #[error("PDF processing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF")]
    WrongPassword,

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Every requested range was empty after clamping to the document.
    #[error("No pages selected: every range falls outside the {total}-page document")]
    NoPagesSelected { total: usize },

    /// The image fallback of PDF → DOCX could not render a single page.
    #[error("No pages could be rendered from the PDF")]
    NoPagesRendered,

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction and page rendering need libpdfium at run time.\n\
  • Install it system-wide (e.g. /usr/lib/libpdfium.so), or\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── DOCX errors ───────────────────────────────────────────────────────
    /// The input is not a readable Office Open XML package.
    #[error("Invalid DOCX: {0}")]
    InvalidDocx(String),

    /// Reading or writing the ZIP container failed.
    #[error("ZIP container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Decoding or encoding an image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // ── CloudConvert errors ───────────────────────────────────────────────
    /// `CLOUDCONVERT_API_KEY` is not set.
    #[error("CloudConvert API key not configured\nSet CLOUDCONVERT_API_KEY (or add it to .env.local).")]
    MissingApiKey,

    /// The job-creation request was rejected.
    #[error("Create Job Failed: HTTP {status}: {body}")]
    CreateJobFailed { status: u16, body: String },

    /// The API answered with JSON that lacks a required field.
    #[error("Malformed CloudConvert response: {0}")]
    MalformedResponse(String),

    /// The created job has no `import/upload` task with an upload form.
    #[error("No upload form in CloudConvert job '{job_id}'")]
    NoUploadForm { job_id: String },

    /// The signed upload request failed.
    #[error("Upload failed: HTTP {status}: {body}")]
    UploadFailed { status: u16, body: String },

    /// The job reached the `error` or `failed` status.
    #[error("Job failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// The job did not finish within the configured number of polls.
    #[error("Job '{job_id}' did not finish after {polls} status checks")]
    JobTimedOut { job_id: String, polls: u32 },

    /// The finished job has no exported file.
    #[error("No export file in CloudConvert job '{job_id}'")]
    NoExportFile { job_id: String },

    /// Downloading the converted file failed.
    #[error("Download failed: {reason}")]
    DownloadFailed { reason: String },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── External tool errors ──────────────────────────────────────────────
    /// The converter binary could not be started.
    #[error("'{binary}' could not be started: {source}\nInstall LibreOffice or point --soffice at the binary.")]
    ExternalToolMissing {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited unsuccessfully.
    #[error("'{binary}' exited with {status}: {stderr}")]
    ExternalToolFailed {
        binary: String,
        status: String,
        stderr: String,
    },

    /// The converter ran longer than the configured timeout.
    #[error("'{binary}' did not finish within {secs}s")]
    ExternalToolTimedOut { binary: String, secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Text extraction failed for the page.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractFailed { page: usize, detail: String },

    /// Page rasterisation failed.
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_job_failed_display() {
        let e = ConverterError::CreateJobFailed {
            status: 422,
            body: "invalid task".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("422"), "got: {msg}");
        assert!(msg.contains("invalid task"));
    }

    #[test]
    fn job_failed_display_uses_remote_message() {
        let e = ConverterError::JobFailed {
            job_id: "abc".into(),
            message: "Unsupported input".into(),
        };
        assert_eq!(e.to_string(), "Job failed: Unsupported input");
    }

    #[test]
    fn job_timed_out_display() {
        let e = ConverterError::JobTimedOut {
            job_id: "j-1".into(),
            polls: 120,
        };
        assert!(e.to_string().contains("120"));
        assert!(e.to_string().contains("j-1"));
    }

    #[test]
    fn no_pages_selected_display() {
        let e = ConverterError::NoPagesSelected { total: 4 };
        assert!(e.to_string().contains("4-page"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::RenderFailed {
            page: 3,
            detail: "bitmap".into(),
        };
        assert!(e.to_string().starts_with("Page 3"));
    }
}
