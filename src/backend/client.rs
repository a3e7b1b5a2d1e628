use std::fmt;

use async_trait::async_trait;

use super::types::{AskRequest, VerifyOutcome};

/// Errors that can occur while talking to the question-answering backend.
///
/// All variants collapse to the same user-visible text; the distinction only
/// shows up in the log.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Client could not be built (bad TLS setup, invalid timeout). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-success status.
    Api { status: u16, message: String },
    /// Response body did not match the expected shape.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Returns the name of the backend, for logging.
    fn name(&self) -> &str;

    /// `POST /verify`. `Ok(Rejected)` only for an explicit unauthorized response.
    async fn verify(&self, access_code: &str) -> Result<VerifyOutcome, BackendError>;

    /// `POST /ask`. Returns the answer text exactly as sent by the backend.
    async fn ask(&self, request: &AskRequest) -> Result<String, BackendError>;

    /// `GET /health`.
    async fn health(&self) -> Result<(), BackendError>;
}
