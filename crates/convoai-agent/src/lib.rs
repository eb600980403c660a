//! High-level client for running conversational AI agents.
//!
//! # Architecture
//!
//! - [`components`] — per-vendor ASR/LLM/TTS configuration with dual
//!   typed-or-mapping input and wire normalization
//! - [`token::TokenBuilder`] — channel tokens granting RTC, RTM and Chat
//!   privileges in one credential
//! - [`property`] — join-properties assembly and validation
//! - [`client::AgentClient`] — the start/stop/query façade
//! - [`settings::AgentSettings`] — environment-based configuration
//!
//! ```no_run
//! use convoai_agent::{AgentClient, AsrConfig, Credentials, LlmConfig, TtsConfig};
//! use convoai_agent::components::{DeepgramAsrConfig, ElevenLabsTtsConfig};
//!
//! # async fn run() -> convoai_core::Result<()> {
//! let client = AgentClient::new(Credentials::new(
//!     "app_id", "app_certificate", "customer_id", "customer_secret",
//! )?)?;
//!
//! let handle = client
//!     .start_agent(
//!         "support_room",
//!         "123456",
//!         &["654321".into()],
//!         &AsrConfig::Deepgram(DeepgramAsrConfig::new("deepgram_key")),
//!         &LlmConfig::new("openai_key"),
//!         &TtsConfig::ElevenLabs(ElevenLabsTtsConfig::new("elevenlabs_key")),
//!     )
//!     .await?;
//!
//! client.stop_agent(&handle.agent_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod components;
pub mod property;
pub mod settings;
pub mod token;

// Re-export main types for convenience
pub use client::{AgentClient, AgentHandle, ChannelSession, Credentials};
pub use components::{AsrConfig, LlmConfig, TtsConfig};
pub use property::{build_join_properties, build_join_properties_with, PropertyOverrides};
pub use settings::AgentSettings;
pub use token::{RtcRole, TokenBuilder};

// Low-level types callers commonly need alongside the façade.
pub use convoai_core::{ClientConfig, ConvoAiError, Result, ServiceRegion};
