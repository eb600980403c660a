//! Start an agent in a fresh channel, print its status, and stop it.
//!
//! Reads credentials from the environment (or a `.env` file):
//! APP_ID, APP_CERTIFICATE, CUSTOMER_ID, CUSTOMER_SECRET, LLM_API_KEY,
//! and optionally TTS_ELEVENLABS_API_KEY / ASR_DEEPGRAM_API_KEY.

use anyhow::Context;
use convoai_agent::components::{DeepgramAsrConfig, ElevenLabsTtsConfig};
use convoai_agent::{AgentClient, AgentSettings, AsrConfig, LlmConfig, TtsConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info,convoai_core=debug,convoai_agent=debug"),
        ))
        .init();

    let settings = AgentSettings::from_env().context("loading settings")?;
    let client = AgentClient::new(settings.credentials()?)?;

    let asr = AsrConfig::Deepgram(DeepgramAsrConfig::new(
        settings.asr_api_key.clone().unwrap_or_default(),
    ));
    let llm = LlmConfig::new(&settings.llm_api_key);
    let tts = TtsConfig::ElevenLabs(ElevenLabsTtsConfig::new(
        settings.tts_api_key.clone().unwrap_or_default(),
    ));

    let session = client.generate_session()?;
    println!("channel: {}", session.channel_name);
    println!("user uid: {} (token: {}...)", session.uid, &session.token[..24]);

    let handle = client
        .start_agent(
            &session.channel_name,
            &session.agent_uid,
            &[session.uid.clone()],
            &asr,
            &llm,
            &tts,
        )
        .await
        .context("starting agent")?;
    println!("agent started: {}", handle.agent_id);

    let detail = client.query_agent(&handle.agent_id).await?;
    println!("status: {}", detail.status.as_deref().unwrap_or("unknown"));

    client.stop_agent(&handle.agent_id).await?;
    println!("agent stopped");
    Ok(())
}
