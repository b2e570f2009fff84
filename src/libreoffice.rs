//! Office → PDF through a local LibreOffice install.
//!
//! Runs `soffice --headless --convert-to pdf --outdir <dir> <input>` in a
//! scratch directory that is removed when the conversion returns.

use crate::convert::PdfConverter;
use crate::error::ConverterError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    /// Program to run. Default: `soffice` from `PATH`.
    pub binary: String,
    /// Kill the conversion after this long. Default: 120 s.
    pub timeout_secs: u64,
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self {
            binary: "soffice".to_string(),
            timeout_secs: 120,
        }
    }
}

impl LibreOfficeConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }

    /// Convert a document whose format is given by `extension` (`docx`,
    /// `.odt`, …) and return the PDF bytes.
    pub async fn convert_to_pdf(&self, bytes: &[u8], extension: &str) -> Result<Vec<u8>, ConverterError> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConverterError::InvalidInput(format!(
                "Unsupported file extension '{extension}'"
            )));
        }

        let dir = tempfile::tempdir().map_err(|e| ConverterError::Internal(format!("tempdir: {e}")))?;
        let input = dir.path().join(format!("input.{extension}"));
        tokio::fs::write(&input, bytes)
            .await
            .map_err(|e| ConverterError::Internal(format!("tempfile write: {e}")))?;

        info!(binary = %self.binary, extension, "Converting with LibreOffice");
        self.run(dir.path(), &input).await?;

        let output = dir.path().join("input.pdf");
        let pdf = tokio::fs::read(&output).await.map_err(|e| ConverterError::ExternalToolFailed {
            binary: self.binary.clone(),
            status: "exit status 0".to_string(),
            stderr: format!("no PDF produced: {e}"),
        })?;
        debug!(bytes = pdf.len(), "LibreOffice produced PDF");
        Ok(pdf)
    }

    async fn run(&self, outdir: &Path, input: &Path) -> Result<(), ConverterError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(outdir)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| ConverterError::ExternalToolMissing {
            binary: self.binary.clone(),
            source,
        })?;

        let output = tokio::time::timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output())
            .await
            .map_err(|_| {
                warn!(binary = %self.binary, secs = self.timeout_secs, "LibreOffice timed out");
                ConverterError::ExternalToolTimedOut {
                    binary: self.binary.clone(),
                    secs: self.timeout_secs,
                }
            })?
            .map_err(|e| ConverterError::Internal(format!("waiting for {}: {e}", self.binary)))?;

        if !output.status.success() {
            return Err(ConverterError::ExternalToolFailed {
                binary: self.binary.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PdfConverter for LibreOfficeConverter {
    async fn to_pdf(&self, bytes: &[u8], filename: &str) -> Result<Vec<u8>, ConverterError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("docx");
        self.convert_to_pdf(bytes, extension).await
    }

    fn name(&self) -> &'static str {
        "libreoffice"
    }
}
