use serde::Serialize;
use std::fmt;

/// Engine-level failure taxonomy. Collaborator failures stay opaque inside
/// `Load` and `PublishRejected`; the engine never retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("load failed: {0}")]
    Load(anyhow::Error),

    #[error("publish rejected: {0}")]
    PublishRejected(anyhow::Error),

    #[error("a publish is already in flight for this scope")]
    PublishInFlight,

    #[error("integrity violation: {0}")]
    Integrity(IntegrityViolation),
}

/// Serializable error record in the console's code/message/details shape.
/// Used for staging-logic defects: the offending operation is skipped, the
/// record is flagged to the caller, and nothing malformed is submitted.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityViolation {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntegrityViolation {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
