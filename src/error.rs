//! Error types for mailbox triage

use thiserror::Error;

/// Errors that can occur while classifying a message
#[derive(Error, Debug)]
pub enum TriageError {
    /// The generation backend refused the request or the connection failed
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response stream broke while being read
    #[error("generation stream failed: {0}")]
    Stream(#[from] std::io::Error),

    /// A non-blank streamed line was not valid JSON
    #[error("malformed stream line: {0}")]
    StreamParse(serde_json::Error),

    /// Model output contained no parseable classification record
    #[error("no classification record in model output: {0}")]
    ResultParse(serde_json::Error),

    /// The mailbox collaborator reported a failure
    #[error("mailbox operation failed: {0}")]
    Mailbox(String),
}

/// Result type for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;
