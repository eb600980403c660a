//! Join request wire models.
//!
//! These structs serialize to exactly the JSON shape the join endpoint
//! expects. Unset optional fields are omitted from the payload rather than
//! sent as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level join request: a unique agent name plus the channel properties.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct JoinRequest {
    pub name: String,
    pub properties: JoinProperties,
}

/// Everything the agent needs to join an RTC channel.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct JoinProperties {
    /// Channel access token for the agent's uid.
    pub token: String,
    /// RTC channel name the agent joins.
    pub channel: String,
    /// The agent's uid inside the channel, rendered as a decimal string.
    pub agent_rtc_uid: String,
    /// Uids the agent subscribes to, in caller order. `["*"]` subscribes to
    /// every participant.
    pub remote_rtc_uids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_string_uid: Option<bool>,
    /// Seconds the channel may sit idle before the agent leaves on its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_features: Option<AdvancedFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asr: Option<AsrBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<TurnDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// Language-model block. The endpoint speaks the OpenAI chat-completions
/// protocol to whatever `url` points at.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LlmBody {
    pub url: String,
    pub api_key: String,
    /// Messages prepended to every completion call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_messages: Option<Vec<Value>>,
    /// Extra fields forwarded in the completion request body
    /// (e.g. `model`, `max_tokens`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// Short-term memory entries kept per conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<u32>,
    /// Spoken to the first user who subscribes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_modalities: Option<Vec<String>>,
    /// Spoken through TTS when the completion call fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Text-to-speech block: a vendor tag plus that vendor's parameter mapping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TtsBody {
    pub vendor: String,
    pub params: Map<String, Value>,
    /// Bracket classes the synthesizer skips when reading LLM output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_patterns: Option<Vec<u32>>,
}

/// Speech-recognition block.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AsrBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub vendor: String,
    pub params: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdvancedFeatures {
    /// Graceful-interruption voice activity detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_aivad: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rtm: Option<bool>,
    /// Speaker adaptive learning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sal: Option<bool>,
}

/// Conversation turn detection settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TurnDetection {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub detection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_mode: Option<String>,
    /// Milliseconds the user's voice must exceed the VAD threshold before
    /// it counts as an interruption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_duration_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_padding_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_duration_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_response: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_response: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eagerness: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SilenceConfig {
    /// Maximum agent silence in milliseconds, range (0, 60000].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FixedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_config: Option<SilenceConfig>,
    /// Agent data transmission channel: `"rtm"` or `"datastream"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_error_message: Option<bool>,
}

/// Agent parameters: a typed fixed block plus a free-form extra block.
///
/// On the wire the two are flattened into one object; an extra key wins
/// over the fixed key of the same name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    pub fixed_params: Option<FixedParams>,
    pub extra_params: Option<Map<String, Value>>,
}

impl Parameters {
    /// The merged wire object.
    pub fn merged(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        if let Some(fixed) = &self.fixed_params {
            if let Ok(Value::Object(fields)) = serde_json::to_value(fixed) {
                merged.extend(fields);
            }
        }
        if let Some(extra) = &self.extra_params {
            for (key, value) in extra {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

impl Serialize for Parameters {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.merged().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_properties_omits_unset_fields() {
        let properties = JoinProperties {
            token: "t".into(),
            channel: "c".into(),
            agent_rtc_uid: "1".into(),
            remote_rtc_uids: vec!["2".into()],
            enable_string_uid: None,
            idle_timeout: None,
            advanced_features: None,
            llm: None,
            tts: None,
            asr: None,
            turn_detection: None,
            parameters: None,
        };
        let value = serde_json::to_value(&properties).unwrap();
        assert_eq!(
            value,
            json!({
                "token": "t",
                "channel": "c",
                "agent_rtc_uid": "1",
                "remote_rtc_uids": ["2"]
            })
        );
    }

    #[test]
    fn test_turn_detection_type_field_name() {
        let detection = TurnDetection {
            detection_type: Some("agora_vad".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&detection).unwrap();
        assert_eq!(value, json!({"type": "agora_vad"}));
    }

    #[test]
    fn test_parameters_merge_extra_overrides_fixed() {
        let mut extra = Map::new();
        extra.insert("data_channel".into(), json!("datastream"));
        extra.insert("custom_flag".into(), json!(true));

        let parameters = Parameters {
            fixed_params: Some(FixedParams {
                data_channel: Some("rtm".into()),
                enable_metrics: Some(true),
                ..Default::default()
            }),
            extra_params: Some(extra),
        };

        let value = serde_json::to_value(&parameters).unwrap();
        assert_eq!(
            value,
            json!({
                "data_channel": "datastream",
                "enable_metrics": true,
                "custom_flag": true
            })
        );
    }

    #[test]
    fn test_parameters_empty_serializes_to_empty_object() {
        let value = serde_json::to_value(Parameters::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}
