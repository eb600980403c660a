//! Response wire models.

use serde::{Deserialize, Serialize};

/// Successful join response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JoinSuccess {
    /// Unique identifier of the created agent; the key for leave/query.
    pub agent_id: String,
    /// Unix seconds at which the agent was created.
    #[serde(default)]
    pub create_ts: Option<i64>,
    /// Running status: IDLE, STARTING, RUNNING, STOPPING, STOPPED,
    /// RECOVERING or FAILED.
    #[serde(default)]
    pub status: Option<String>,
}

/// Agent status returned by the query endpoint. Same shape as a join
/// success plus whatever runtime fields the service includes; unknown
/// fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentDetail {
    pub agent_id: String,
    #[serde(default)]
    pub create_ts: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Structured error body returned by the service on failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteErrorBody {
    /// Machine-readable reason, e.g. `"InvalidToken"`.
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable detail.
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_success_parses_minimal_body() {
        let success: JoinSuccess = serde_json::from_str(r#"{"agent_id": "agent-1"}"#).unwrap();
        assert_eq!(success.agent_id, "agent-1");
        assert_eq!(success.create_ts, None);
    }

    #[test]
    fn test_join_success_parses_full_body() {
        let body = r#"{"agent_id": "agent-1", "create_ts": 1700000000, "status": "RUNNING"}"#;
        let success: JoinSuccess = serde_json::from_str(body).unwrap();
        assert_eq!(success.create_ts, Some(1700000000));
        assert_eq!(success.status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn test_remote_error_tolerates_unknown_shape() {
        let error: RemoteErrorBody = serde_json::from_str(r#"{"something": "else"}"#).unwrap();
        assert_eq!(error.reason, None);
        assert_eq!(error.detail, None);
    }
}
