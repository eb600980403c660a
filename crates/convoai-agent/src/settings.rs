//! Settings loading from the environment.
//!
//! Values come from the process environment, with `.env` files loaded
//! first when present. Each project key is checked under three names in
//! order (`VITE_AG_<KEY>`, `AGORA_<KEY>`, then the bare `<KEY>`) so the
//! same `.env` works for a web frontend and this SDK. `API_KEY` /
//! `API_SECRET` are accepted as legacy spellings of the customer id and
//! secret.

use tracing::debug;

use convoai_core::error::{ConvoAiError, Result};

use crate::client::Credentials;

/// Everything an agent deployment reads from the environment.
#[derive(Clone, Debug)]
pub struct AgentSettings {
    pub app_id: String,
    pub app_certificate: String,
    pub customer_id: String,
    pub customer_secret: String,
    /// `LLM_API_KEY` — required.
    pub llm_api_key: String,
    /// `TTS_ELEVENLABS_API_KEY` — optional.
    pub tts_api_key: Option<String>,
    /// `ASR_DEEPGRAM_API_KEY` — optional.
    pub asr_api_key: Option<String>,
}

impl AgentSettings {
    /// Load settings, reading a `.env` file from the working directory
    /// first if one exists.
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_ok() {
            debug!("loaded .env file");
        }
        Self::from_process_env()
    }

    /// Load settings from the process environment only.
    pub fn from_process_env() -> Result<Self> {
        let app_id = project_var("APP_ID");
        let app_certificate = project_var("APP_CERTIFICATE");
        let customer_id = project_var("CUSTOMER_ID").or_else(|| env_var("API_KEY"));
        let customer_secret = project_var("CUSTOMER_SECRET").or_else(|| env_var("API_SECRET"));

        let mut missing = Vec::new();
        if app_id.is_none() {
            missing.push("APP_ID");
        }
        if app_certificate.is_none() {
            missing.push("APP_CERTIFICATE");
        }
        if customer_id.is_none() {
            missing.push("CUSTOMER_ID (or API_KEY)");
        }
        if customer_secret.is_none() {
            missing.push("CUSTOMER_SECRET (or API_SECRET)");
        }
        if !missing.is_empty() {
            return Err(ConvoAiError::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let llm_api_key = env_var("LLM_API_KEY").ok_or_else(|| {
            ConvoAiError::Configuration("missing required environment variable: LLM_API_KEY".into())
        })?;

        Ok(Self {
            app_id: app_id.unwrap_or_default(),
            app_certificate: app_certificate.unwrap_or_default(),
            customer_id: customer_id.unwrap_or_default(),
            customer_secret: customer_secret.unwrap_or_default(),
            llm_api_key,
            tts_api_key: env_var("TTS_ELEVENLABS_API_KEY"),
            asr_api_key: env_var("ASR_DEEPGRAM_API_KEY"),
        })
    }

    /// The credential set for [`crate::client::AgentClient`].
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            &self.app_id,
            &self.app_certificate,
            &self.customer_id,
            &self.customer_secret,
        )
    }
}

/// A project key under its three accepted prefixes, first hit wins.
fn project_var(key: &str) -> Option<String> {
    env_var(&format!("VITE_AG_{key}"))
        .or_else(|| env_var(&format!("AGORA_{key}")))
        .or_else(|| env_var(key))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
