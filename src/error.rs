use std::time::Duration;

/// Represents the possible errors that can occur when using the APIFRAME client.
#[derive(Debug, thiserror::Error)]
pub enum ApiframeError {
    #[error("API key is missing. Please provide it or set the API_KEY environment variable.")]
    MissingApiKey,
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// The API answered with a non-successful HTTP status.
    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },
    /// The task could not be created. Never retried.
    #[error("Task submission failed: {reason}")]
    Submission { reason: String },
    /// The provider reported a status outside the known vocabulary.
    #[error("Task {task_id} reported unexpected status {status:?}")]
    UnexpectedStatus { task_id: String, status: String },
    /// The task finished but the expected result field was absent.
    #[error("Task {task_id} completed without a `{field}` field")]
    MissingResult { task_id: String, field: &'static str },
    #[error("Task {task_id} did not complete within {elapsed:?}")]
    Timeout { task_id: String, elapsed: Duration },
    #[error("Task {task_id} still pending after {attempts} attempts (last status: {})", .last_status.as_deref().unwrap_or("none"))]
    RetriesExhausted {
        task_id: String,
        attempts: u32,
        last_status: Option<String>,
    },
}

/// A coarse classification of [`ApiframeError`], stable enough to map onto
/// transport-level codes (see the `server` module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Submission,
    Fetch,
    UnexpectedStatus,
    MissingResult,
    Timeout,
    RetriesExhausted,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Submission => "submission",
            ErrorKind::Fetch => "fetch",
            ErrorKind::UnexpectedStatus => "unexpected_status",
            ErrorKind::MissingResult => "missing_result",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RetriesExhausted => "retries_exhausted",
            ErrorKind::Io => "io",
        }
    }
}

impl ApiframeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiframeError::MissingApiKey
            | ApiframeError::InvalidApiKey
            | ApiframeError::InvalidConfig(_)
            | ApiframeError::UrlParseFailed(_) => ErrorKind::Configuration,
            ApiframeError::RequestFailed(_)
            | ApiframeError::ResponseParseFailed(_)
            | ApiframeError::ApiError { .. } => ErrorKind::Fetch,
            ApiframeError::IoError(_) => ErrorKind::Io,
            ApiframeError::Submission { .. } => ErrorKind::Submission,
            ApiframeError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            ApiframeError::MissingResult { .. } => ErrorKind::MissingResult,
            ApiframeError::Timeout { .. } => ErrorKind::Timeout,
            ApiframeError::RetriesExhausted { .. } => ErrorKind::RetriesExhausted,
        }
    }
}
