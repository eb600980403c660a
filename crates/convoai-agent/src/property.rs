//! Join-properties assembly.
//!
//! Merges a generated token, the channel identifiers and the three
//! normalized vendor payloads into one request body, applying the standard
//! conversational-agent defaults wherever the caller does not override.

use convoai_core::error::{ConvoAiError, Result};
use convoai_core::req::{
    AdvancedFeatures, FixedParams, JoinProperties, Parameters, TurnDetection,
};

use crate::components::{AsrConfig, LlmConfig, TtsConfig};

/// Caller overrides for the non-vendor parts of the join body. Unset
/// fields fall back to the defaults below.
#[derive(Clone, Debug, Default)]
pub struct PropertyOverrides {
    pub enable_string_uid: Option<bool>,
    pub idle_timeout: Option<u32>,
    pub advanced_features: Option<AdvancedFeatures>,
    pub turn_detection: Option<TurnDetection>,
    pub parameters: Option<Parameters>,
}

/// Build the join body with default settings.
pub fn build_join_properties(
    token: impl Into<String>,
    channel: &str,
    agent_uid: &str,
    remote_uids: &[String],
    asr: &AsrConfig,
    llm: &LlmConfig,
    tts: &TtsConfig,
) -> Result<JoinProperties> {
    build_join_properties_with(
        token,
        channel,
        agent_uid,
        remote_uids,
        asr,
        llm,
        tts,
        &PropertyOverrides::default(),
    )
}

/// Build the join body, applying `overrides` where set.
///
/// Fails with a validation error when `channel` or `agent_uid` is empty,
/// or when `agent_uid` appears in `remote_uids` (the agent cannot share a
/// uid with a participant). Vendor configuration failures propagate with
/// their original error kind.
#[allow(clippy::too_many_arguments)]
pub fn build_join_properties_with(
    token: impl Into<String>,
    channel: &str,
    agent_uid: &str,
    remote_uids: &[String],
    asr: &AsrConfig,
    llm: &LlmConfig,
    tts: &TtsConfig,
    overrides: &PropertyOverrides,
) -> Result<JoinProperties> {
    if channel.is_empty() {
        return Err(ConvoAiError::Validation("channel_name cannot be empty".into()));
    }
    if agent_uid.is_empty() {
        return Err(ConvoAiError::Validation("agent_uid cannot be empty".into()));
    }
    if remote_uids.iter().any(|uid| uid == agent_uid) {
        return Err(ConvoAiError::Validation(format!(
            "agent_uid {agent_uid} must not appear in remote_uids"
        )));
    }

    Ok(JoinProperties {
        token: token.into(),
        channel: channel.to_string(),
        agent_rtc_uid: agent_uid.to_string(),
        // Caller order is significant for the caller's own bookkeeping;
        // carry it through untouched.
        remote_rtc_uids: remote_uids.to_vec(),
        enable_string_uid: Some(overrides.enable_string_uid.unwrap_or(false)),
        idle_timeout: Some(overrides.idle_timeout.unwrap_or(120)),
        advanced_features: Some(
            overrides
                .advanced_features
                .clone()
                .unwrap_or_else(default_advanced_features),
        ),
        llm: Some(llm.to_body()?),
        tts: Some(tts.to_body()?),
        asr: Some(asr.to_body()?),
        turn_detection: Some(
            overrides
                .turn_detection
                .clone()
                .unwrap_or_else(default_turn_detection),
        ),
        parameters: Some(
            overrides
                .parameters
                .clone()
                .unwrap_or_else(default_parameters),
        ),
    })
}

fn default_advanced_features() -> AdvancedFeatures {
    AdvancedFeatures {
        enable_aivad: Some(true),
        enable_rtm: Some(true),
        enable_sal: Some(true),
    }
}

fn default_turn_detection() -> TurnDetection {
    TurnDetection {
        interrupt_duration_ms: Some(160),
        prefix_padding_ms: Some(300),
        silence_duration_ms: Some(480),
        threshold: Some(0.5),
        ..Default::default()
    }
}

fn default_parameters() -> Parameters {
    Parameters {
        fixed_params: Some(FixedParams {
            data_channel: Some("rtm".into()),
            enable_metrics: Some(true),
            enable_error_message: Some(true),
            ..Default::default()
        }),
        extra_params: None,
    }
}
