//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so partial
//! JSON files deserialize cleanly — missing fields get production defaults.

use serde::{Deserialize, Serialize};

/// Root settings type for the Compass backend.
///
/// Loaded from `~/.compass/settings.json` with defaults applied for missing
/// fields. Environment variables override specific values after the file
/// merge. Example file:
///
/// ```json
/// {
///   "model": { "model": "gpt-4o", "temperature": 0.5 },
///   "context": { "messageWindowSize": 30 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompassSettings {
    /// Settings schema version.
    pub version: String,
    /// Model selection and sampling parameters.
    pub model: ModelSettings,
    /// Context window and summarization cadence.
    pub context: ContextSettings,
    /// Model-call deadlines.
    pub timeouts: TimeoutSettings,
    /// Provider endpoint and credentials.
    pub api: ApiSettings,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            model: ModelSettings::default(),
            context: ContextSettings::default(),
            timeouts: TimeoutSettings::default(),
            api: ApiSettings::default(),
        }
    }
}

impl CompassSettings {
    /// Check every value against its allowed range.
    ///
    /// Called after file merge and env overrides so a bad file fails loudly
    /// instead of producing a counselor with a zero-width window.
    pub fn validate(&self) -> crate::errors::Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(crate::errors::SettingsError::InvalidValue(format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.max_tokens == 0 {
            return Err(crate::errors::SettingsError::InvalidValue(
                "model.maxTokens must be at least 1".to_string(),
            ));
        }
        if self.context.message_window_size == 0 {
            return Err(crate::errors::SettingsError::InvalidValue(
                "context.messageWindowSize must be at least 1".to_string(),
            ));
        }
        if self.context.summary_interval == 0 {
            return Err(crate::errors::SettingsError::InvalidValue(
                "context.summaryInterval must be at least 1".to_string(),
            ));
        }
        if self.timeouts.response_ms == 0 || self.timeouts.compression_ms == 0 {
            return Err(crate::errors::SettingsError::InvalidValue(
                "timeouts must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }
}

/// Model selection and pass-through sampling parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    /// Model ID sent to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Top-p nucleus sampling, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Frequency penalty, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Stop sequences, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
        }
    }
}

/// Context window and summarization cadence settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSettings {
    /// Number of recent messages included in each prompt.
    pub message_window_size: usize,
    /// Summarization is due when the post-turn message total is a multiple
    /// of this interval.
    pub summary_interval: u64,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            message_window_size: 20,
            summary_interval: 10,
        }
    }
}

/// Deadlines for model calls, in milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeoutSettings {
    /// Deadline for a reply generation call.
    pub response_ms: u64,
    /// Deadline for a summary compression call.
    pub compression_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            response_ms: 30_000,
            compression_ms: 45_000,
        }
    }
}

/// Provider endpoint and credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL of the chat-completions endpoint.
    pub base_url: String,
    /// API key. Usually supplied via `OPENAI_API_KEY` rather than the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
