//! High-level agent client.
//!
//! One call to start an agent: generate its channel token, assemble the
//! join properties from the three vendor configs, and POST the join
//! request. The returned [`AgentHandle`] is the only state a caller needs
//! to keep; the agent lifecycle itself lives in the remote service.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use convoai_core::auth::BasicAuthCredential;
use convoai_core::client::ConvoAiClient;
use convoai_core::config::{ClientConfig, ServiceRegion};
use convoai_core::error::{ConvoAiError, Result};
use convoai_core::req::JoinRequest;
use convoai_core::resp::AgentDetail;

use crate::components::{AsrConfig, LlmConfig, TtsConfig};
use crate::property::{build_join_properties_with, PropertyOverrides};
use crate::token::TokenBuilder;

/// The four secrets needed to operate agents in one project.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub app_id: String,
    pub app_certificate: String,
    pub customer_id: String,
    pub customer_secret: String,
}

impl Credentials {
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: impl Into<String>,
        customer_id: impl Into<String>,
        customer_secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            app_id: app_id.into(),
            app_certificate: app_certificate.into(),
            customer_id: customer_id.into(),
            customer_secret: customer_secret.into(),
        };
        for (field, value) in [
            ("app_id", &credentials.app_id),
            ("app_certificate", &credentials.app_certificate),
            ("customer_id", &credentials.customer_id),
            ("customer_secret", &credentials.customer_secret),
        ] {
            if value.is_empty() {
                return Err(ConvoAiError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(credentials)
    }
}

/// Reference to a running agent, returned by a successful start.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AgentHandle {
    pub agent_id: String,
}

/// Bootstrap data for a client application joining a fresh channel:
/// a generated channel name, random user and agent uids, and a user token.
/// Serializes to the JSON shape a web frontend consumes directly.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelSession {
    pub app_id: String,
    pub token: String,
    pub uid: String,
    pub channel_name: String,
    pub agent_uid: String,
}

/// Start/stop façade over the REST client.
#[derive(Clone, Debug)]
pub struct AgentClient {
    credentials: Credentials,
    client: ConvoAiClient,
}

impl AgentClient {
    /// Client against the global service region.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_region(credentials, ServiceRegion::Global)
    }

    pub fn with_region(credentials: Credentials, region: ServiceRegion) -> Result<Self> {
        let config = ClientConfig::new(
            credentials.app_id.clone(),
            BasicAuthCredential::new(&credentials.customer_id, &credentials.customer_secret)?,
            region,
        )?;
        Self::with_client_config(credentials, config)
    }

    /// Full control over the transport configuration (timeouts, retry
    /// count, base URL override).
    pub fn with_client_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            credentials,
            client: ConvoAiClient::new(config)?,
        })
    }

    /// Start an agent in `channel_name` with default join settings.
    ///
    /// `agent_uid` must be a numeric uid distinct from every entry in
    /// `remote_uids`.
    pub async fn start_agent(
        &self,
        channel_name: &str,
        agent_uid: &str,
        remote_uids: &[String],
        asr: &AsrConfig,
        llm: &LlmConfig,
        tts: &TtsConfig,
    ) -> Result<AgentHandle> {
        self.start_agent_with(
            channel_name,
            agent_uid,
            remote_uids,
            asr,
            llm,
            tts,
            &PropertyOverrides::default(),
        )
        .await
    }

    /// Start an agent with caller overrides for the non-vendor settings.
    #[allow(clippy::too_many_arguments)]
    pub async fn start_agent_with(
        &self,
        channel_name: &str,
        agent_uid: &str,
        remote_uids: &[String],
        asr: &AsrConfig,
        llm: &LlmConfig,
        tts: &TtsConfig,
        overrides: &PropertyOverrides,
    ) -> Result<AgentHandle> {
        let uid: u32 = agent_uid.parse().map_err(|_| {
            ConvoAiError::Validation(format!("agent_uid must be a numeric uid, got '{agent_uid}'"))
        })?;

        let token = TokenBuilder::generate(
            &self.credentials.app_id,
            &self.credentials.app_certificate,
            channel_name,
            uid,
        )?;
        let properties = build_join_properties_with(
            token,
            channel_name,
            agent_uid,
            remote_uids,
            asr,
            llm,
            tts,
            overrides,
        )?;

        // Agent names must be unique per running agent; app id + channel
        // gives one agent per channel.
        let name = format!("{}:{}", self.credentials.app_id, channel_name);
        debug!(
            channel = channel_name,
            asr = asr.vendor(),
            tts = tts.vendor(),
            "starting agent"
        );

        let success = self.client.join(&JoinRequest { name, properties }).await?;
        info!(agent_id = %success.agent_id, channel = channel_name, "agent started");
        Ok(AgentHandle {
            agent_id: success.agent_id,
        })
    }

    /// Stop a running agent.
    pub async fn stop_agent(&self, agent_id: &str) -> Result<()> {
        self.client.leave(agent_id).await?;
        info!(agent_id, "agent stopped");
        Ok(())
    }

    /// Read a running agent's status.
    pub async fn query_agent(&self, agent_id: &str) -> Result<AgentDetail> {
        self.client.query(agent_id).await
    }

    /// Bootstrap data for a client application: random user and agent
    /// uids, a timestamped channel name, and a user token for it.
    ///
    /// The uid ranges are a convenience, not a service requirement: any
    /// uids that fit in a u32 and differ from each other work.
    pub fn generate_session(&self) -> Result<ChannelSession> {
        let mut rng = rand::thread_rng();
        let user_uid: u32 = rng.gen_range(1_000..=9_999_999);
        let agent_uid: u32 = rng.gen_range(10_000_000..=99_999_999);
        let channel_name = format!("channel_{}", chrono::Utc::now().timestamp());

        let token = TokenBuilder::generate(
            &self.credentials.app_id,
            &self.credentials.app_certificate,
            &channel_name,
            user_uid,
        )?;

        Ok(ChannelSession {
            app_id: self.credentials.app_id.clone(),
            token,
            uid: user_uid.to_string(),
            channel_name,
            agent_uid: agent_uid.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{DeepgramAsrConfig, ElevenLabsTtsConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("app1", "cert1", "customer", "secret").unwrap()
    }

    fn test_client(base_url: &str) -> AgentClient {
        let creds = credentials();
        let config = ClientConfig::new(
            creds.app_id.clone(),
            BasicAuthCredential::new(&creds.customer_id, &creds.customer_secret).unwrap(),
            ServiceRegion::Global,
        )
        .unwrap()
        .with_base_url(base_url);
        AgentClient::with_client_config(creds, config).unwrap()
    }

    fn configs() -> (AsrConfig, LlmConfig, TtsConfig) {
        (
            AsrConfig::Deepgram(DeepgramAsrConfig::new("asr_key")),
            LlmConfig::new("llm_key"),
            TtsConfig::ElevenLabs(ElevenLabsTtsConfig::new("tts_key")),
        )
    }

    #[test]
    fn test_credentials_require_every_field() {
        let err = Credentials::new("app", "cert", "customer", "").unwrap_err();
        assert!(matches!(err, ConvoAiError::Validation(_)));
        assert!(err.to_string().contains("customer_secret"));
    }

    #[tokio::test]
    async fn test_start_agent_posts_full_join_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversational-ai-agent/v2/projects/app1/join"))
            .and(body_partial_json(json!({
                "name": "app1:room",
                "properties": {
                    "channel": "room",
                    "agent_rtc_uid": "123456",
                    "remote_rtc_uids": ["654321"],
                    "asr": {"vendor": "deepgram", "params": {"key": "asr_key"}},
                    "llm": {"api_key": "llm_key", "url": "https://api.openai.com/v1"},
                    "tts": {"vendor": "elevenlabs", "params": {"key": "tts_key"}}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "agent_id": "agent-7",
                "create_ts": 1700000000i64,
                "status": "RUNNING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (asr, llm, tts) = configs();
        let handle = client
            .start_agent("room", "123456", &["654321".into()], &asr, &llm, &tts)
            .await
            .unwrap();
        assert_eq!(handle.agent_id, "agent-7");
    }

    #[tokio::test]
    async fn test_start_agent_rejects_non_numeric_uid_locally() {
        let server = MockServer::start().await;
        let client = test_client(&server.uri());
        let (asr, llm, tts) = configs();
        let err = client
            .start_agent("room", "not-a-number", &["654321".into()], &asr, &llm, &tts)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvoAiError::Validation(_)));
        // No request reaches the server.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_agent_surfaces_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "reason": "InvalidToken",
                "detail": "token expired"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (asr, llm, tts) = configs();
        match client
            .start_agent("room", "123456", &["654321".into()], &asr, &llm, &tts)
            .await
            .unwrap_err()
        {
            ConvoAiError::RemoteAgent { reason, detail, .. } => {
                assert_eq!(reason, "InvalidToken");
                assert_eq!(detail, "token expired");
            }
            other => panic!("expected RemoteAgent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stop_agent_calls_leave() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/api/conversational-ai-agent/v2/projects/app1/agents/agent-7/leave",
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.stop_agent("agent-7").await.unwrap();
    }

    #[test]
    fn test_generate_session_produces_usable_bootstrap() {
        // No HTTP involved; the unused server keeps the constructor happy.
        let client = test_client("http://127.0.0.1:1");
        let session = client.generate_session().unwrap();

        assert_eq!(session.app_id, "app1");
        assert!(session.channel_name.starts_with("channel_"));
        assert_ne!(session.uid, session.agent_uid);

        let parsed = convoai_core::token::parse(&session.token).unwrap();
        assert!(parsed.verify("cert1"));
        assert_eq!(parsed.rtc_service().unwrap().uid, session.uid);
    }
}
