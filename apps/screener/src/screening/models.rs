use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Deep single-document review vs. ranked shortlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Single,
    Bulk,
}

/// A file as received from the upload boundary. Identity within a batch is `name`.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Lightweight description of a selected file, safe to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl From<&UploadedFile> for SelectedFile {
    fn from(file: &UploadedFile) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
        }
    }
}

/// Base64 document plus its content type, ready for inline transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub content: String,
    pub mime_type: String,
}

/// Full coaching review produced in single mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewResult {
    pub score: u8,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Shortlist entry produced in bulk mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub score: u8,
    pub summary: String,
}

/// A validated response from the scoring service. Score is always within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Review(ReviewResult),
    Screening(ScreeningResult),
}

impl AnalysisResult {
    pub fn score(&self) -> u8 {
        match self {
            AnalysisResult::Review(r) => r.score,
            AnalysisResult::Screening(r) => r.score,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            AnalysisResult::Review(r) => &r.summary,
            AnalysisResult::Screening(r) => &r.summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Loading,
    Success,
    Error,
}

/// Terminal outcome of one file's pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Success(AnalysisResult),
    Error(String),
}

/// Per-file unit of work. The payload shape is tied to the status, so a loading job
/// can never carry a result and a failed job always carries its message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Job {
    Loading {
        file_name: String,
    },
    Success {
        file_name: String,
        result: AnalysisResult,
    },
    Error {
        file_name: String,
        error: String,
    },
}

impl Job {
    pub fn loading(file_name: impl Into<String>) -> Self {
        Job::Loading {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Job::Loading { file_name }
            | Job::Success { file_name, .. }
            | Job::Error { file_name, .. } => file_name,
        }
    }

    pub fn status(&self) -> JobStatus {
        match self {
            Job::Loading { .. } => JobStatus::Loading,
            Job::Success { .. } => JobStatus::Success,
            Job::Error { .. } => JobStatus::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Job::Loading { .. })
    }

    pub fn score(&self) -> Option<u8> {
        match self {
            Job::Success { result, .. } => Some(result.score()),
            _ => None,
        }
    }
}
