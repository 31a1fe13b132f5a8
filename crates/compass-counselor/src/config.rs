//! Counselor configuration.
//!
//! [`CounselorConfig`] is the runtime shape the orchestration components
//! share; it is usually built from loaded [`CompassSettings`] but can be
//! assembled directly in tests.

use std::time::Duration;

use compass_llm::provider::GenerateOptions;
use compass_settings::types::CompassSettings;

use crate::prompt::PromptTemplates;

/// Runtime configuration for turn orchestration.
#[derive(Clone, Debug)]
pub struct CounselorConfig {
    /// Number of recent messages included in each prompt.
    pub window_size: usize,
    /// Summarization cadence in total messages.
    pub summary_interval: u64,
    /// Pass-through sampling parameters for reply generation.
    pub options: GenerateOptions,
    /// Deadline for a reply generation call.
    pub response_timeout: Duration,
    /// Deadline for a summary compression call.
    pub compression_timeout: Duration,
    /// Prompt wording.
    pub templates: PromptTemplates,
}

impl Default for CounselorConfig {
    fn default() -> Self {
        Self::from(&CompassSettings::default())
    }
}

impl From<&CompassSettings> for CounselorConfig {
    fn from(settings: &CompassSettings) -> Self {
        Self {
            window_size: settings.context.message_window_size,
            summary_interval: settings.context.summary_interval,
            options: GenerateOptions {
                temperature: Some(settings.model.temperature),
                max_tokens: Some(settings.model.max_tokens),
                top_p: settings.model.top_p,
                frequency_penalty: settings.model.frequency_penalty,
                presence_penalty: settings.model.presence_penalty,
                stop: settings.model.stop.clone(),
            },
            response_timeout: Duration::from_millis(settings.timeouts.response_ms),
            compression_timeout: Duration::from_millis(settings.timeouts.compression_ms),
            templates: PromptTemplates::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
