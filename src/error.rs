use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineupForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Empty Search Space: {0}")]
    EmptySearchSpace(String),

    #[error("Resume Mismatch: {0}")]
    ResumeMismatch(String),

    #[error("Task for lineup index {index} failed: {reason}")]
    TaskFailed { index: u64, reason: String },

    #[error("Progress Sink Error: {0}")]
    Sink(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Protocol Error: {0}")]
    Protocol(String),
}

pub type LfResult<T> = Result<T, LineupForgeError>;
