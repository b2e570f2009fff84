use super::types::{Envelope, Job, JobStatus, TaskGraph, OP_EXPORT_URL, OP_IMPORT_UPLOAD};
use crate::config::CloudConvertConfig;
use crate::convert::PdfConverter;
use crate::docx::DOCX_MIME;
use crate::error::ConverterError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the CloudConvert jobs API.
///
/// A conversion is one job with three tasks (see [`TaskGraph::convert`]):
/// the file is uploaded to the signed form of the import task, the job is
/// polled until it finishes, and the export task's URL is downloaded.
#[derive(Debug, Clone)]
pub struct CloudConvertClient {
    config: CloudConvertConfig,
    http: Client,
}

impl CloudConvertClient {
    pub fn new(config: CloudConvertConfig) -> Result<Self, ConverterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    /// Client configured from `CLOUDCONVERT_API_KEY`.
    pub fn from_env() -> Result<Self, ConverterError> {
        Self::new(CloudConvertConfig::from_env()?)
    }

    pub fn config(&self) -> &CloudConvertConfig {
        &self.config
    }

    /// Register a job.
    pub async fn create_job(&self, graph: &TaskGraph) -> Result<Job, ConverterError> {
        let response = self
            .http
            .post(format!("{}/jobs", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(graph)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Create job failed: HTTP {} {}", status.as_u16(), body);
            return Err(ConverterError::CreateJobFailed {
                status: status.as_u16(),
                body,
            });
        }

        let job = parse_job(&body)?;
        if job.id.is_empty() {
            return Err(ConverterError::MalformedResponse(format!("No job id in {body}")));
        }
        info!(job_id = %job.id, "CloudConvert job created");
        Ok(job)
    }

    /// Send the input file to the job's signed upload form. Every form
    /// parameter goes first, the file last.
    pub async fn upload(
        &self,
        job: &Job,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<(), ConverterError> {
        let form = job
            .task(OP_IMPORT_UPLOAD)
            .and_then(|t| t.result.as_ref())
            .and_then(|r| r.form.as_ref())
            .ok_or_else(|| ConverterError::NoUploadForm { job_id: job.id.clone() })?;

        let mut multipart = Form::new();
        for (key, value) in &form.parameters {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            multipart = multipart.text(key.clone(), text);
        }
        let file = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        multipart = multipart.part("file", file);

        debug!(job_id = %job.id, bytes = bytes.len(), "Uploading file");
        let response = self.http.post(&form.url).multipart(multipart).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConverterError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }
        info!(job_id = %job.id, "Upload successful");
        Ok(())
    }

    /// Poll the job until it finishes, fails, or `max_polls` is exhausted.
    pub async fn wait_for_job(&self, job_id: &str) -> Result<Job, ConverterError> {
        let url = format!("{}/jobs/{}", self.config.base_url, job_id);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_polls {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(ConverterError::MalformedResponse(format!(
                    "Job status request returned HTTP {}: {}",
                    status.as_u16(),
                    body
                )));
            }

            let job = parse_job(&body)?;
            match job.status {
                JobStatus::Finished => {
                    info!(job_id, polls = attempt, "CloudConvert job finished");
                    return Ok(job);
                }
                s if s.is_failure() => {
                    let message = job.failure_message();
                    warn!(job_id, "CloudConvert job failed: {}", message);
                    return Err(ConverterError::JobFailed {
                        job_id: job_id.to_string(),
                        message,
                    });
                }
                JobStatus::Unknown => warn!(job_id, attempt, "Unrecognised job status"),
                other => debug!(job_id, attempt, status = ?other, "Job status"),
            }

            if attempt < self.config.max_polls {
                tokio::time::sleep(interval).await;
            }
        }

        Err(ConverterError::JobTimedOut {
            job_id: job_id.to_string(),
            polls: self.config.max_polls,
        })
    }

    /// Fetch the first file exported by a finished job.
    pub async fn download(&self, job: &Job) -> Result<Vec<u8>, ConverterError> {
        let file = job
            .tasks
            .iter()
            .filter(|t| t.operation == OP_EXPORT_URL && t.status == JobStatus::Finished)
            .find_map(|t| t.result.as_ref().and_then(|r| r.files.first()))
            .ok_or_else(|| ConverterError::NoExportFile { job_id: job.id.clone() })?;

        debug!(job_id = %job.id, filename = %file.filename, "Downloading result");
        let response = self
            .http
            .get(&file.url)
            .send()
            .await
            .map_err(|e| ConverterError::DownloadFailed { reason: e.to_string() })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConverterError::DownloadFailed {
                reason: format!("HTTP {}", status.as_u16()),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConverterError::DownloadFailed { reason: e.to_string() })?;
        Ok(bytes.to_vec())
    }

    /// Convert `bytes` to `output_format`; the upload's content type is
    /// guessed from `filename`.
    pub async fn convert(&self, bytes: &[u8], filename: &str, output_format: &str) -> Result<Vec<u8>, ConverterError> {
        self.run(bytes, filename, content_type_for(filename), output_format)
            .await
    }

    /// Convert a Word document to PDF.
    pub async fn convert_word_to_pdf(&self, bytes: &[u8], filename: &str) -> Result<Vec<u8>, ConverterError> {
        self.run(bytes, filename, DOCX_MIME, "pdf").await
    }

    async fn run(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, ConverterError> {
        info!(filename, output_format, "Starting CloudConvert conversion");
        let name = (!filename.is_empty()).then_some(filename);
        let job = self.create_job(&TaskGraph::convert(name, output_format)).await?;
        self.upload(&job, bytes, filename, content_type).await?;
        let finished = self.wait_for_job(&job.id).await?;
        let output = self.download(&finished).await?;
        info!(job_id = %job.id, bytes = output.len(), "CloudConvert conversion complete");
        Ok(output)
    }
}

#[async_trait]
impl PdfConverter for CloudConvertClient {
    async fn to_pdf(&self, bytes: &[u8], filename: &str) -> Result<Vec<u8>, ConverterError> {
        self.convert(bytes, filename, "pdf").await
    }

    fn name(&self) -> &'static str {
        "cloudconvert"
    }
}

fn parse_job(body: &str) -> Result<Job, ConverterError> {
    serde_json::from_str::<Envelope<Job>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| ConverterError::MalformedResponse(format!("{e}: {body}")))
}

/// Upload content type by file extension.
fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("docx") => DOCX_MIME,
        Some("doc") => "application/msword",
        Some("rtf") => "application/rtf",
        Some("pdf") => "application/pdf",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("Report.DOCX"), DOCX_MIME);
        assert_eq!(content_type_for("old.doc"), "application/msword");
        assert_eq!(content_type_for("scan.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn parse_job_reports_malformed_json() {
        assert!(matches!(
            parse_job(r#"{"nope": 1}"#),
            Err(ConverterError::MalformedResponse(_))
        ));
        assert_eq!(parse_job(r#"{"data": {"id": "abc"}}"#).unwrap().id, "abc");
    }
}
