//! CloudConvert back-end for conversions this crate cannot do locally.
//!
//! ```rust,no_run
//! use loving_converter::cloudconvert::CloudConvertClient;
//!
//! # async fn run(docx: Vec<u8>) -> Result<(), loving_converter::ConverterError> {
//! let client = CloudConvertClient::from_env()?;
//! let pdf = client.convert_word_to_pdf(&docx, "report.docx").await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::CloudConvertClient;
pub use types::{ExportedFile, Job, JobStatus, Task, TaskGraph, TaskResult, UploadForm};
