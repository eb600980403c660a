//! Per-vendor ASR / LLM / TTS configuration.
//!
//! Each speech slot is a closed set of vendor variants plus a `Custom`
//! escape hatch for vendors this crate does not enumerate. Every typed
//! record constructs from just its credential (all other fields carry
//! documented defaults) and normalizes itself into the exact parameter
//! mapping the join API expects for that vendor, including field renames
//! such as `api_key` → `key`.
//!
//! Configs accept two equivalent inputs: the typed structs below, or a
//! plain JSON mapping with the same keys (`from_map` / `TryFrom<Value>`).
//! Both paths produce identical normalized output.

use serde_json::{json, Map, Value};

use convoai_core::error::{ConvoAiError, Result};
use convoai_core::req::{AsrBody, LlmBody, TtsBody};

// ─────────────────────────────────────────────
// Mapping-input helpers
// ─────────────────────────────────────────────

fn require_str(map: &Map<String, Value>, context: &str, field: &str) -> Result<String> {
    match map.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ConvoAiError::Configuration(format!(
            "{context}: {field} is required"
        ))),
    }
}

fn str_or(map: &Map<String, Value>, field: &str, default: &str) -> String {
    map.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn opt_str(map: &Map<String, Value>, field: &str) -> Option<String> {
    map.get(field).and_then(Value::as_str).map(str::to_string)
}

fn u32_or(map: &Map<String, Value>, field: &str, default: u32) -> u32 {
    map.get(field)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(default)
}

fn i64_or(map: &Map<String, Value>, field: &str, default: i64) -> i64 {
    map.get(field).and_then(Value::as_i64).unwrap_or(default)
}

fn f64_or(map: &Map<String, Value>, field: &str, default: f64) -> f64 {
    map.get(field).and_then(Value::as_f64).unwrap_or(default)
}

fn opt_u32(map: &Map<String, Value>, field: &str) -> Option<u32> {
    map.get(field).and_then(Value::as_u64).map(|v| v as u32)
}

fn opt_f64(map: &Map<String, Value>, field: &str) -> Option<f64> {
    map.get(field).and_then(Value::as_f64)
}

fn opt_bool(map: &Map<String, Value>, field: &str) -> Option<bool> {
    map.get(field).and_then(Value::as_bool)
}

fn require_credential(context: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConvoAiError::Configuration(format!(
            "{context}: {field} is required"
        )));
    }
    Ok(())
}

/// The mapping form of an unrecognized vendor: pass `params` through
/// untouched, or fail if there is nothing to pass through.
fn custom_from_map(
    map: &Map<String, Value>,
    slot: &str,
    vendor: &str,
) -> Result<(String, Map<String, Value>)> {
    match map.get("params").and_then(Value::as_object) {
        Some(params) => Ok((vendor.to_string(), params.clone())),
        None => Err(ConvoAiError::Configuration(format!(
            "unrecognized {slot} vendor '{vendor}' and no params payload"
        ))),
    }
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ConvoAiError::Configuration(format!("{context}: expected a JSON object"))
    })
}

// ─────────────────────────────────────────────
// ASR configurations
// ─────────────────────────────────────────────

/// Deepgram streaming speech recognition.
#[derive(Clone, Debug, PartialEq)]
pub struct DeepgramAsrConfig {
    pub api_key: String,
    /// Default `wss://api.deepgram.com/v1/listen`.
    pub url: String,
    /// Default `nova-2`.
    pub model: String,
    /// Default `en-US`.
    pub language: String,
}

impl DeepgramAsrConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "deepgram asr", "api_key")?,
            url: str_or(map, "url", "wss://api.deepgram.com/v1/listen"),
            model: str_or(map, "model", "nova-2"),
            language: str_or(map, "language", "en-US"),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("url".into(), json!(self.url));
        params.insert("key".into(), json!(self.api_key));
        params.insert("model".into(), json!(self.model));
        params.insert("language".into(), json!(self.language));
        params
    }
}

impl Default for DeepgramAsrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: "wss://api.deepgram.com/v1/listen".into(),
            model: "nova-2".into(),
            language: "en-US".into(),
        }
    }
}

/// Tencent real-time speech recognition.
#[derive(Clone, Debug, PartialEq)]
pub struct TencentAsrConfig {
    pub key: String,
    pub app_id: String,
    pub secret: String,
    /// Default `16k_zh`.
    pub engine_model_type: String,
    pub voice_id: String,
}

impl TencentAsrConfig {
    pub fn new(
        key: impl Into<String>,
        app_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            app_id: app_id.into(),
            secret: secret.into(),
            engine_model_type: "16k_zh".into(),
            voice_id: String::new(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            key: require_str(map, "tencent asr", "key")?,
            app_id: require_str(map, "tencent asr", "app_id")?,
            secret: require_str(map, "tencent asr", "secret")?,
            engine_model_type: str_or(map, "engine_model_type", "16k_zh"),
            voice_id: str_or(map, "voice_id", ""),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("key".into(), json!(self.key));
        params.insert("app_id".into(), json!(self.app_id));
        params.insert("secret".into(), json!(self.secret));
        params.insert("engine_model_type".into(), json!(self.engine_model_type));
        params.insert("voice_id".into(), json!(self.voice_id));
        params
    }
}

/// Microsoft Azure speech recognition.
#[derive(Clone, Debug, PartialEq)]
pub struct MicrosoftAsrConfig {
    pub api_key: String,
    /// Default `eastus`.
    pub region: String,
    /// Default `en-US`.
    pub language: String,
    /// Phrases boosted during recognition.
    pub phrase_list: Vec<String>,
}

impl MicrosoftAsrConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let phrase_list = map
            .get("phrase_list")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            api_key: require_str(map, "microsoft asr", "api_key")?,
            region: str_or(map, "region", "eastus"),
            language: str_or(map, "language", "en-US"),
            phrase_list,
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("key".into(), json!(self.api_key));
        params.insert("region".into(), json!(self.region));
        params.insert("language".into(), json!(self.language));
        params.insert("phrase_list".into(), json!(self.phrase_list));
        params
    }
}

impl Default for MicrosoftAsrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: "eastus".into(),
            language: "en-US".into(),
            phrase_list: Vec::new(),
        }
    }
}

/// Speech-recognition vendor selection. Exactly one variant per request.
#[derive(Clone, Debug, PartialEq)]
pub enum AsrConfig {
    Deepgram(DeepgramAsrConfig),
    Tencent(TencentAsrConfig),
    Microsoft(MicrosoftAsrConfig),
    /// Built-in vendor, no parameters.
    Fengming,
    /// Built-in vendor, no parameters.
    Ares,
    /// Unlisted vendor: `params` is forwarded to the service untouched.
    Custom {
        vendor: String,
        params: Map<String, Value>,
    },
}

impl AsrConfig {
    pub fn vendor(&self) -> &str {
        match self {
            AsrConfig::Deepgram(_) => "deepgram",
            AsrConfig::Tencent(_) => "tencent",
            AsrConfig::Microsoft(_) => "microsoft",
            AsrConfig::Fengming => "fengming",
            AsrConfig::Ares => "ares",
            AsrConfig::Custom { vendor, .. } => vendor,
        }
    }

    /// Construct from a plain mapping with a `vendor` tag. Equivalent typed
    /// and mapping inputs normalize identically.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let vendor = require_str(map, "asr config", "vendor")?;
        match vendor.as_str() {
            "deepgram" => Ok(AsrConfig::Deepgram(DeepgramAsrConfig::from_map(map)?)),
            "tencent" => Ok(AsrConfig::Tencent(TencentAsrConfig::from_map(map)?)),
            "microsoft" => Ok(AsrConfig::Microsoft(MicrosoftAsrConfig::from_map(map)?)),
            "fengming" => Ok(AsrConfig::Fengming),
            "ares" => Ok(AsrConfig::Ares),
            other => {
                let (vendor, params) = custom_from_map(map, "asr", other)?;
                Ok(AsrConfig::Custom { vendor, params })
            }
        }
    }

    /// Normalize into the wire body.
    pub fn to_body(&self) -> Result<AsrBody> {
        let (language, params) = match self {
            AsrConfig::Deepgram(cfg) => {
                require_credential("deepgram asr", "api_key", &cfg.api_key)?;
                (Some(cfg.language.clone()), cfg.params())
            }
            AsrConfig::Tencent(cfg) => {
                require_credential("tencent asr", "key", &cfg.key)?;
                require_credential("tencent asr", "app_id", &cfg.app_id)?;
                require_credential("tencent asr", "secret", &cfg.secret)?;
                (None, cfg.params())
            }
            AsrConfig::Microsoft(cfg) => {
                require_credential("microsoft asr", "api_key", &cfg.api_key)?;
                (Some(cfg.language.clone()), cfg.params())
            }
            AsrConfig::Fengming | AsrConfig::Ares => (None, Map::new()),
            AsrConfig::Custom { params, .. } => (None, params.clone()),
        };
        Ok(AsrBody {
            language,
            vendor: self.vendor().to_string(),
            params,
        })
    }
}

impl TryFrom<&Value> for AsrConfig {
    type Error = ConvoAiError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "asr config")?)
    }
}

// ─────────────────────────────────────────────
// LLM configuration (OpenAI-compatible)
// ─────────────────────────────────────────────

/// Language-model configuration. The endpoint must speak the OpenAI
/// chat-completions protocol; any compatible gateway works via `url`.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmConfig {
    pub api_key: String,
    /// Default `https://api.openai.com/v1`.
    pub url: String,
    /// Default `gpt-4`.
    pub model: String,
    /// Default 1024.
    pub max_tokens: u32,
    /// Default 64.
    pub max_history: u32,
    /// Default `"You are a helpful assistant."`.
    pub system_message: String,
    /// Default `"Hello, how can I help you?"`.
    pub greeting: String,
    /// Extra fields merged into the completion request body; a key here
    /// overrides the built-in `model`/`max_tokens` entries.
    pub extra_params: Option<Map<String, Value>>,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "llm config", "api_key")?,
            url: str_or(map, "url", "https://api.openai.com/v1"),
            model: str_or(map, "model", "gpt-4"),
            max_tokens: u32_or(map, "max_tokens", 1024),
            max_history: u32_or(map, "max_history", 64),
            system_message: str_or(map, "system_message", "You are a helpful assistant."),
            greeting: str_or(map, "greeting", "Hello, how can I help you?"),
            extra_params: map.get("params").and_then(Value::as_object).cloned(),
        })
    }

    pub fn to_body(&self) -> Result<LlmBody> {
        require_credential("llm config", "api_key", &self.api_key)?;

        let mut params = Map::new();
        params.insert("model".into(), json!(self.model));
        params.insert("max_tokens".into(), json!(self.max_tokens));
        if let Some(extra) = &self.extra_params {
            for (key, value) in extra {
                params.insert(key.clone(), value.clone());
            }
        }

        Ok(LlmBody {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            system_messages: Some(vec![json!({
                "role": "system",
                "content": self.system_message,
            })]),
            params: Some(params),
            max_history: Some(self.max_history),
            greeting_message: Some(self.greeting.clone()),
            input_modalities: Some(vec!["text".into()]),
            output_modalities: Some(vec!["text".into()]),
            failure_message: None,
            vendor: None,
            style: None,
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: "https://api.openai.com/v1".into(),
            model: "gpt-4".into(),
            max_tokens: 1024,
            max_history: 64,
            system_message: "You are a helpful assistant.".into(),
            greeting: "Hello, how can I help you?".into(),
            extra_params: None,
        }
    }
}

impl TryFrom<&Value> for LlmConfig {
    type Error = ConvoAiError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "llm config")?)
    }
}

// ─────────────────────────────────────────────
// TTS configurations
// ─────────────────────────────────────────────

/// ElevenLabs speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevenLabsTtsConfig {
    pub api_key: String,
    /// Default `eleven_multilingual_v2`.
    pub model_id: String,
    /// Default `pNInz6obpgDQGcFmaJgB` (the stock "Adam" voice).
    pub voice_id: String,
    pub sample_rate: Option<u32>,
    pub stability: Option<f64>,
    pub similarity_boost: Option<f64>,
    pub style: Option<f64>,
    pub use_speaker_boost: Option<bool>,
}

impl ElevenLabsTtsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "elevenlabs tts", "api_key")?,
            model_id: str_or(map, "model_id", "eleven_multilingual_v2"),
            voice_id: str_or(map, "voice_id", "pNInz6obpgDQGcFmaJgB"),
            sample_rate: opt_u32(map, "sample_rate"),
            stability: opt_f64(map, "stability"),
            similarity_boost: opt_f64(map, "similarity_boost"),
            style: opt_f64(map, "style"),
            use_speaker_boost: opt_bool(map, "use_speaker_boost"),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("key".into(), json!(self.api_key));
        params.insert("model_id".into(), json!(self.model_id));
        params.insert("voice_id".into(), json!(self.voice_id));
        if let Some(sample_rate) = self.sample_rate {
            params.insert("sample_rate".into(), json!(sample_rate));
        }
        if let Some(stability) = self.stability {
            params.insert("stability".into(), json!(stability));
        }
        if let Some(similarity_boost) = self.similarity_boost {
            params.insert("similarity_boost".into(), json!(similarity_boost));
        }
        if let Some(style) = self.style {
            params.insert("style".into(), json!(style));
        }
        if let Some(use_speaker_boost) = self.use_speaker_boost {
            params.insert("use_speaker_boost".into(), json!(use_speaker_boost));
        }
        params
    }
}

impl Default for ElevenLabsTtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_id: "eleven_multilingual_v2".into(),
            voice_id: "pNInz6obpgDQGcFmaJgB".into(),
            sample_rate: None,
            stability: None,
            similarity_boost: None,
            style: None,
            use_speaker_boost: None,
        }
    }
}

/// MiniMax speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimaxTtsConfig {
    pub group_id: String,
    pub api_key: String,
    /// Default `speech-01-turbo`.
    pub model: String,
    pub voice_id: Option<String>,
    pub speed: Option<f64>,
    pub vol: Option<f64>,
    pub pitch: Option<i64>,
    pub emotion: Option<String>,
    pub sample_rate: Option<u32>,
}

impl MinimaxTtsConfig {
    pub fn new(group_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            api_key: api_key.into(),
            model: "speech-01-turbo".into(),
            voice_id: None,
            speed: None,
            vol: None,
            pitch: None,
            emotion: None,
            sample_rate: None,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            group_id: require_str(map, "minimax tts", "group_id")?,
            api_key: require_str(map, "minimax tts", "api_key")?,
            model: str_or(map, "model", "speech-01-turbo"),
            voice_id: opt_str(map, "voice_id"),
            speed: opt_f64(map, "speed"),
            vol: opt_f64(map, "vol"),
            pitch: map.get("pitch").and_then(Value::as_i64),
            emotion: opt_str(map, "emotion"),
            sample_rate: opt_u32(map, "sample_rate"),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("group_id".into(), json!(self.group_id));
        params.insert("key".into(), json!(self.api_key));
        params.insert("model".into(), json!(self.model));

        // Voice fields nest under voice_setting on the wire.
        let mut voice_setting = Map::new();
        if let Some(voice_id) = &self.voice_id {
            voice_setting.insert("voice_id".into(), json!(voice_id));
        }
        if let Some(speed) = self.speed {
            voice_setting.insert("speed".into(), json!(speed));
        }
        if let Some(vol) = self.vol {
            voice_setting.insert("vol".into(), json!(vol));
        }
        if let Some(pitch) = self.pitch {
            voice_setting.insert("pitch".into(), json!(pitch));
        }
        if let Some(emotion) = &self.emotion {
            voice_setting.insert("emotion".into(), json!(emotion));
        }
        if !voice_setting.is_empty() {
            params.insert("voice_setting".into(), Value::Object(voice_setting));
        }
        if let Some(sample_rate) = self.sample_rate {
            params.insert("audio_setting".into(), json!({ "sample_rate": sample_rate }));
        }
        params
    }
}

/// Tencent speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct TencentTtsConfig {
    pub app_id: String,
    pub secret_id: String,
    pub secret_key: String,
    /// Default 0 (the service's standard voice).
    pub voice_type: i64,
    pub volume: i64,
    pub speed: i64,
    /// Default `neutral`.
    pub emotion_category: String,
    /// Default 100.
    pub emotion_intensity: i64,
}

impl TencentTtsConfig {
    pub fn new(
        app_id: impl Into<String>,
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            voice_type: 0,
            volume: 0,
            speed: 0,
            emotion_category: "neutral".into(),
            emotion_intensity: 100,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            app_id: require_str(map, "tencent tts", "app_id")?,
            secret_id: require_str(map, "tencent tts", "secret_id")?,
            secret_key: require_str(map, "tencent tts", "secret_key")?,
            voice_type: i64_or(map, "voice_type", 0),
            volume: i64_or(map, "volume", 0),
            speed: i64_or(map, "speed", 0),
            emotion_category: str_or(map, "emotion_category", "neutral"),
            emotion_intensity: i64_or(map, "emotion_intensity", 100),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("app_id".into(), json!(self.app_id));
        params.insert("secret_id".into(), json!(self.secret_id));
        params.insert("secret_key".into(), json!(self.secret_key));
        params.insert("voice_type".into(), json!(self.voice_type));
        params.insert("volume".into(), json!(self.volume));
        params.insert("speed".into(), json!(self.speed));
        params.insert("emotion_category".into(), json!(self.emotion_category));
        params.insert("emotion_intensity".into(), json!(self.emotion_intensity));
        params
    }
}

/// Bytedance (Volcano Engine) speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct BytedanceTtsConfig {
    pub token: String,
    pub app_id: String,
    /// Default `volcano_tts`.
    pub cluster: String,
    /// Default `BV001_streaming`.
    pub voice_type: String,
    /// Defaults 1.0.
    pub speed_ratio: f64,
    pub volume_ratio: f64,
    pub pitch_ratio: f64,
    pub emotion: Option<String>,
}

impl BytedanceTtsConfig {
    pub fn new(token: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            app_id: app_id.into(),
            cluster: "volcano_tts".into(),
            voice_type: "BV001_streaming".into(),
            speed_ratio: 1.0,
            volume_ratio: 1.0,
            pitch_ratio: 1.0,
            emotion: None,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            token: require_str(map, "bytedance tts", "token")?,
            app_id: require_str(map, "bytedance tts", "app_id")?,
            cluster: str_or(map, "cluster", "volcano_tts"),
            voice_type: str_or(map, "voice_type", "BV001_streaming"),
            speed_ratio: f64_or(map, "speed_ratio", 1.0),
            volume_ratio: f64_or(map, "volume_ratio", 1.0),
            pitch_ratio: f64_or(map, "pitch_ratio", 1.0),
            emotion: opt_str(map, "emotion"),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("token".into(), json!(self.token));
        params.insert("app_id".into(), json!(self.app_id));
        params.insert("cluster".into(), json!(self.cluster));
        params.insert("voice_type".into(), json!(self.voice_type));
        params.insert("speed_ratio".into(), json!(self.speed_ratio));
        params.insert("volume_ratio".into(), json!(self.volume_ratio));
        params.insert("pitch_ratio".into(), json!(self.pitch_ratio));
        if let Some(emotion) = &self.emotion {
            params.insert("emotion".into(), json!(emotion));
        }
        params
    }
}

/// Microsoft Azure speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct MicrosoftTtsConfig {
    pub api_key: String,
    /// Default `eastus`.
    pub region: String,
    /// Default `en-US-JennyNeural`.
    pub voice_name: String,
    /// Speaking rate, 0.5–2.0; default 1.0.
    pub speed: f64,
    /// Volume, 0.0–100.0; default 70.0.
    pub volume: f64,
    /// Default 24000 Hz.
    pub sample_rate: u32,
}

impl MicrosoftTtsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "microsoft tts", "api_key")?,
            region: str_or(map, "region", "eastus"),
            voice_name: str_or(map, "voice_name", "en-US-JennyNeural"),
            speed: f64_or(map, "speed", 1.0),
            volume: f64_or(map, "volume", 70.0),
            sample_rate: u32_or(map, "sample_rate", 24000),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("key".into(), json!(self.api_key));
        params.insert("region".into(), json!(self.region));
        params.insert("voice_name".into(), json!(self.voice_name));
        params.insert("speed".into(), json!(self.speed));
        params.insert("volume".into(), json!(self.volume));
        params.insert("sample_rate".into(), json!(self.sample_rate));
        params
    }
}

impl Default for MicrosoftTtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: "eastus".into(),
            voice_name: "en-US-JennyNeural".into(),
            speed: 1.0,
            volume: 70.0,
            sample_rate: 24000,
        }
    }
}

/// Cartesia speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesiaTtsConfig {
    pub api_key: String,
    /// Default `sonic-2`.
    pub model_id: String,
    pub voice_id: Option<String>,
}

impl CartesiaTtsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_id: "sonic-2".into(),
            voice_id: None,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "cartesia tts", "api_key")?,
            model_id: str_or(map, "model_id", "sonic-2"),
            voice_id: opt_str(map, "voice_id"),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        // Cartesia keeps the api_key name on the wire.
        params.insert("api_key".into(), json!(self.api_key));
        params.insert("model_id".into(), json!(self.model_id));
        if let Some(voice_id) = &self.voice_id {
            params.insert("voice".into(), json!({ "mode": "id", "id": voice_id }));
        }
        params
    }
}

/// OpenAI speech synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenAiTtsConfig {
    pub api_key: String,
    /// Default `gpt-4o-mini-tts`.
    pub model: String,
    /// Default `alloy`.
    pub voice: String,
    pub instructions: Option<String>,
    /// Default 1.0.
    pub speed: f64,
}

impl OpenAiTtsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-4o-mini-tts".into(),
            voice: "alloy".into(),
            instructions: None,
            speed: 1.0,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            api_key: require_str(map, "openai tts", "api_key")?,
            model: str_or(map, "model", "gpt-4o-mini-tts"),
            voice: str_or(map, "voice", "alloy"),
            instructions: opt_str(map, "instructions"),
            speed: f64_or(map, "speed", 1.0),
        })
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("api_key".into(), json!(self.api_key));
        params.insert("model".into(), json!(self.model));
        params.insert("voice".into(), json!(self.voice));
        if let Some(instructions) = &self.instructions {
            params.insert("instructions".into(), json!(instructions));
        }
        params.insert("speed".into(), json!(self.speed));
        params
    }
}

/// Speech-synthesis vendor selection. Exactly one variant per request.
#[derive(Clone, Debug, PartialEq)]
pub enum TtsConfig {
    ElevenLabs(ElevenLabsTtsConfig),
    Minimax(MinimaxTtsConfig),
    Tencent(TencentTtsConfig),
    Bytedance(BytedanceTtsConfig),
    Microsoft(MicrosoftTtsConfig),
    Cartesia(CartesiaTtsConfig),
    OpenAi(OpenAiTtsConfig),
    /// Unlisted vendor: `params` is forwarded to the service untouched.
    Custom {
        vendor: String,
        params: Map<String, Value>,
    },
}

impl TtsConfig {
    pub fn vendor(&self) -> &str {
        match self {
            TtsConfig::ElevenLabs(_) => "elevenlabs",
            TtsConfig::Minimax(_) => "minimax",
            TtsConfig::Tencent(_) => "tencent",
            TtsConfig::Bytedance(_) => "bytedance",
            TtsConfig::Microsoft(_) => "microsoft",
            TtsConfig::Cartesia(_) => "cartesia",
            TtsConfig::OpenAi(_) => "openai",
            TtsConfig::Custom { vendor, .. } => vendor,
        }
    }

    /// Construct from a plain mapping with a `vendor` tag.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let vendor = require_str(map, "tts config", "vendor")?;
        match vendor.as_str() {
            "elevenlabs" => Ok(TtsConfig::ElevenLabs(ElevenLabsTtsConfig::from_map(map)?)),
            "minimax" => Ok(TtsConfig::Minimax(MinimaxTtsConfig::from_map(map)?)),
            "tencent" => Ok(TtsConfig::Tencent(TencentTtsConfig::from_map(map)?)),
            "bytedance" => Ok(TtsConfig::Bytedance(BytedanceTtsConfig::from_map(map)?)),
            "microsoft" => Ok(TtsConfig::Microsoft(MicrosoftTtsConfig::from_map(map)?)),
            "cartesia" => Ok(TtsConfig::Cartesia(CartesiaTtsConfig::from_map(map)?)),
            "openai" => Ok(TtsConfig::OpenAi(OpenAiTtsConfig::from_map(map)?)),
            other => {
                let (vendor, params) = custom_from_map(map, "tts", other)?;
                Ok(TtsConfig::Custom { vendor, params })
            }
        }
    }

    /// Normalize into the wire body.
    pub fn to_body(&self) -> Result<TtsBody> {
        let params = match self {
            TtsConfig::ElevenLabs(cfg) => {
                require_credential("elevenlabs tts", "api_key", &cfg.api_key)?;
                cfg.params()
            }
            TtsConfig::Minimax(cfg) => {
                require_credential("minimax tts", "group_id", &cfg.group_id)?;
                require_credential("minimax tts", "api_key", &cfg.api_key)?;
                cfg.params()
            }
            TtsConfig::Tencent(cfg) => {
                require_credential("tencent tts", "app_id", &cfg.app_id)?;
                require_credential("tencent tts", "secret_id", &cfg.secret_id)?;
                require_credential("tencent tts", "secret_key", &cfg.secret_key)?;
                cfg.params()
            }
            TtsConfig::Bytedance(cfg) => {
                require_credential("bytedance tts", "token", &cfg.token)?;
                require_credential("bytedance tts", "app_id", &cfg.app_id)?;
                cfg.params()
            }
            TtsConfig::Microsoft(cfg) => {
                require_credential("microsoft tts", "api_key", &cfg.api_key)?;
                cfg.params()
            }
            TtsConfig::Cartesia(cfg) => {
                require_credential("cartesia tts", "api_key", &cfg.api_key)?;
                cfg.params()
            }
            TtsConfig::OpenAi(cfg) => {
                require_credential("openai tts", "api_key", &cfg.api_key)?;
                cfg.params()
            }
            TtsConfig::Custom { params, .. } => params.clone(),
        };
        Ok(TtsBody {
            vendor: self.vendor().to_string(),
            params,
            skip_patterns: None,
        })
    }
}

impl TryFrom<&Value> for TtsConfig {
    type Error = ConvoAiError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_map(as_object(value, "tts config")?)
    }
}

// ─────────────────────────────────────────────
// Aliases kept from earlier releases
// ─────────────────────────────────────────────

/// Earlier releases shipped a single vendor per slot under these names.
pub type DefaultAsrConfig = DeepgramAsrConfig;
pub type DefaultLlmConfig = LlmConfig;
pub type DefaultTtsConfig = ElevenLabsTtsConfig;
