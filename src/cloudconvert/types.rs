//! Wire types of the CloudConvert v2 jobs API.
//!
//! Only the fields this crate reads are modelled; everything else in the
//! responses is ignored. Responses wrap their payload in `{"data": …}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const IMPORT_TASK: &str = "import-my-file";
pub const CONVERT_TASK: &str = "convert-my-file";
pub const EXPORT_TASK: &str = "export-my-file";

pub const OP_IMPORT_UPLOAD: &str = "import/upload";
pub const OP_CONVERT: &str = "convert";
pub const OP_EXPORT_URL: &str = "export/url";

/// The `{"data": …}` envelope around every API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Status of a job or of one of its tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Waiting,
    Processing,
    Finished,
    Error,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// `error` and `failed` both end a job unsuccessfully.
    pub fn is_failure(self) -> bool {
        matches!(self, JobStatus::Error | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Job {
    /// First task running `operation`.
    pub fn task(&self, operation: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.operation == operation)
    }

    /// The best available explanation for a failed job.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| {
                self.tasks
                    .iter()
                    .filter(|t| t.status.is_failure())
                    .find_map(|t| t.message.clone())
            })
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<TaskResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub form: Option<UploadForm>,
    #[serde(default)]
    pub files: Vec<ExportedFile>,
}

/// Signed upload target returned for an `import/upload` task.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadForm {
    pub url: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportedFile {
    #[serde(default)]
    pub filename: String,
    pub url: String,
}

// ── Job creation ─────────────────────────────────────────────────────────

/// One entry of the task graph sent when creating a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSpec {
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

/// The body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGraph {
    pub tasks: BTreeMap<String, TaskSpec>,
}

impl TaskGraph {
    /// upload → convert to `output_format` → export as a URL.
    pub fn convert(filename: Option<&str>, output_format: &str) -> Self {
        let mut tasks = BTreeMap::new();
        tasks.insert(
            IMPORT_TASK.to_string(),
            TaskSpec {
                operation: OP_IMPORT_UPLOAD.to_string(),
                filename: filename.map(str::to_string),
                input: None,
                output_format: None,
            },
        );
        tasks.insert(
            CONVERT_TASK.to_string(),
            TaskSpec {
                operation: OP_CONVERT.to_string(),
                filename: None,
                input: Some(IMPORT_TASK.to_string()),
                output_format: Some(output_format.to_string()),
            },
        );
        tasks.insert(
            EXPORT_TASK.to_string(),
            TaskSpec {
                operation: OP_EXPORT_URL.to_string(),
                filename: None,
                input: Some(CONVERT_TASK.to_string()),
                output_format: None,
            },
        );
        Self { tasks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_graph_serialises_like_the_api_expects() {
        let graph = TaskGraph::convert(Some("report.docx"), "pdf");
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(
            value,
            json!({"tasks": {
                "import-my-file": {"operation": "import/upload", "filename": "report.docx"},
                "convert-my-file": {"operation": "convert", "input": "import-my-file", "output_format": "pdf"},
                "export-my-file": {"operation": "export/url", "input": "convert-my-file"}
            }})
        );
    }

    #[test]
    fn unknown_statuses_do_not_fail_parsing() {
        let job: Envelope<Job> = serde_json::from_value(json!({
            "data": {"id": "j1", "status": "paused", "tasks": [{"operation": "convert", "status": "queued"}]}
        }))
        .unwrap();
        assert_eq!(job.data.status, JobStatus::Unknown);
        assert_eq!(job.data.tasks[0].status, JobStatus::Unknown);
    }

    #[test]
    fn failure_message_falls_back_to_tasks() {
        let job: Job = serde_json::from_value(json!({
            "id": "j1",
            "status": "error",
            "tasks": [
                {"operation": "import/upload", "status": "finished"},
                {"operation": "convert", "status": "error", "message": "Unsupported input"}
            ]
        }))
        .unwrap();
        assert_eq!(job.failure_message(), "Unsupported input");
        assert!(job.task(OP_CONVERT).is_some());
    }
}
