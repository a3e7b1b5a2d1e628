use serde::{Deserialize, Serialize};

/// Result of a `/verify` call that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Accepted,
    /// Explicit 401 from the backend.
    Rejected,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest<'a> {
    pub access_code: &'a str,
}

/// Body of `POST /ask`. `access_code` is omitted when the gate is disabled.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

/// Body of a successful `/ask` response.
///
/// The backend also returns the retrieved context as `sources`; its shape
/// differs between retrieval paths so it is kept untyped.
#[derive(Deserialize, Debug, Clone)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<serde_json::Value>,
}

impl AskResponse {
    /// Number of source entries, for logging.
    pub fn source_count(&self) -> usize {
        match &self.sources {
            Some(serde_json::Value::Array(items)) => items.len(),
            Some(serde_json::Value::Null) | None => 0,
            Some(_) => 1,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
}
