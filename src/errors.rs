use std::time::Duration;

use crate::core::TaskId;

/// Reasons the terminal task's output could not be turned into an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("no ```json fenced block found in the final output")]
    NoBlockFound,
    #[error("fenced JSON block is malformed: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("artifact does not match the configured schema: {0}")]
    SchemaViolation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Task '{task}' started before its dependencies completed (missing: {missing:?})")]
    DependencyViolation { task: TaskId, missing: Vec<TaskId> },
    #[error("Task '{task}' timed out after {timeout:?}")]
    TaskTimeout { task: TaskId, timeout: Duration },
    #[error("Task '{task}' failed: {reason}")]
    TaskFailure { task: TaskId, reason: String },
    #[error("Pipeline error: {0}")]
    Pipeline(String),
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("LLM error: {0}")]
    Llm(String),
    #[error("Tool '{tool}' error: {reason}")]
    Tool { tool: String, reason: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Whether the pipeline mechanics succeeded but produced an unusable artifact.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Error::Extraction(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
