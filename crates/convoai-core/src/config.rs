//! Client configuration: service region, timeouts and retry policy.

use std::time::Duration;

use crate::auth::BasicAuthCredential;
use crate::error::{ConvoAiError, Result};

/// Service region the client talks to.
///
/// Chinese Mainland and Global are two separate deployments with distinct
/// base URLs; an app id is provisioned in exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceRegion {
    Global,
    ChineseMainland,
}

impl ServiceRegion {
    pub fn base_url(self) -> &'static str {
        match self {
            ServiceRegion::Global => "https://api.agora.io",
            ServiceRegion::ChineseMainland => "https://api.agora.io/cn",
        }
    }
}

/// Everything needed to connect to the Conversational AI engine.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub app_id: String,
    pub credential: BasicAuthCredential,
    pub service_region: ServiceRegion,
    /// Per-request timeout.
    pub http_timeout: Duration,
    /// Extra attempts for idempotent requests that hit a transient failure.
    pub retry_count: u32,
    /// Base URL override, used by tests to point at a local server.
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_RETRY_COUNT: u32 = 3;

    pub fn new(
        app_id: impl Into<String>,
        credential: BasicAuthCredential,
        service_region: ServiceRegion,
    ) -> Result<Self> {
        let app_id = app_id.into();
        if app_id.is_empty() {
            return Err(ConvoAiError::Validation("app_id cannot be empty".into()));
        }
        Ok(Self {
            app_id,
            credential,
            service_region,
            http_timeout: Self::DEFAULT_TIMEOUT,
            retry_count: Self::DEFAULT_RETRY_COUNT,
            base_url: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Effective base URL: explicit override, else the region default.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.service_region.base_url().to_string())
    }

    /// API path prefix shared by all endpoints:
    /// `/api/conversational-ai-agent/v2/projects/{app_id}`.
    pub fn prefix_path(&self) -> String {
        format!("/api/conversational-ai-agent/v2/projects/{}", self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> BasicAuthCredential {
        BasicAuthCredential::new("id", "secret").unwrap()
    }

    #[test]
    fn test_region_base_urls() {
        assert_eq!(ServiceRegion::Global.base_url(), "https://api.agora.io");
        assert_eq!(
            ServiceRegion::ChineseMainland.base_url(),
            "https://api.agora.io/cn"
        );
    }

    #[test]
    fn test_prefix_path() {
        let config = ClientConfig::new("my_app", credential(), ServiceRegion::Global).unwrap();
        assert_eq!(
            config.prefix_path(),
            "/api/conversational-ai-agent/v2/projects/my_app"
        );
    }

    #[test]
    fn test_empty_app_id_rejected() {
        let err = ClientConfig::new("", credential(), ServiceRegion::Global).unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::new("my_app", credential(), ServiceRegion::Global)
            .unwrap()
            .with_base_url("http://127.0.0.1:8080");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }
}
