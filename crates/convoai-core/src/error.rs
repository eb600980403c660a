//! Error types for the Conversational AI REST client.
//!
//! Local failures (`Validation`, `Configuration`) are raised before any
//! request leaves the process and are never retried. Remote failures keep
//! the service's own `reason`/`detail` fields intact so callers can branch
//! on them programmatically.

/// Errors surfaced by the client and its builders.
#[derive(Debug, thiserror::Error)]
pub enum ConvoAiError {
    /// A caller-supplied argument is missing or malformed. The message names
    /// the offending field.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// A vendor configuration is malformed or references an unrecognized
    /// vendor with no raw-params escape hatch.
    #[error("invalid vendor configuration: {0}")]
    Configuration(String),

    /// The service rejected the Basic Auth credentials (HTTP 401/403).
    /// Fatal to the call; retrying with the same credentials cannot succeed.
    #[error("authentication rejected (HTTP {status}): {detail}")]
    Authentication { status: u16, detail: String },

    /// A network failure or 5xx response. Idempotent requests may be retried
    /// against this; non-idempotent ones are surfaced as-is.
    #[error("transient service error: {0}")]
    Transient(String),

    /// A structured error returned by the agent service (4xx other than
    /// auth). `reason` and `detail` are passed through verbatim.
    #[error("agent service error (HTTP {status}): {reason}: {detail}")]
    RemoteAgent {
        status: u16,
        reason: String,
        detail: String,
    },

    /// The service returned 2xx but the body did not match the documented
    /// response shape.
    #[error("unexpected response body: {0}")]
    Response(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvoAiError>;

impl ConvoAiError {
    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ConvoAiError::Transient(_))
    }
}

impl From<reqwest::Error> for ConvoAiError {
    fn from(err: reqwest::Error) -> Self {
        // Connection failures, DNS errors and timeouts are all transient
        // from the caller's point of view.
        ConvoAiError::Transient(err.to_string())
    }
}
