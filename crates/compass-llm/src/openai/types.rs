//! Configuration and wire types for the `OpenAI` chat-completions API.
//!
//! Wire field names are snake_case per the provider's JSON format; the
//! role strings on [`ChatMessage`](compass_core::messages::ChatMessage)
//! already serialize as `system` / `user` / `assistant`.

use serde::{Deserialize, Serialize};

use compass_core::messages::ChatMessage;

/// Default chat-completions endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for [`OpenAiModel`](super::OpenAiModel).
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Model ID sent with each request.
    pub model: String,
    /// Endpoint base URL (no trailing `/chat/completions`).
    pub base_url: String,
    /// Bearer API key.
    pub api_key: String,
}

impl OpenAiConfig {
    /// Create a config against the production endpoint.
    #[must_use]
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the endpoint base URL (self-hosted gateways, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format — request
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// Model ID.
    pub model: String,
    /// Role-ordered prompt messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Top-p nucleus sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format — response
// ─────────────────────────────────────────────────────────────────────────────

/// Response body for a successful completion.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions; the first choice is the reply.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token accounting.
    pub usage: Option<WireUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChoiceMessage,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Message payload within a choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Author role (`assistant`).
    pub role: Option<String>,
    /// Reply text. `None` for tool-call-only replies, which this backend
    /// never requests.
    pub content: Option<String>,
}

/// Token usage in wire naming.
#[derive(Debug, Deserialize)]
pub struct WireUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens generated in the reply.
    pub completion_tokens: u64,
    /// Total billed tokens.
    pub total_tokens: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format — error
// ─────────────────────────────────────────────────────────────────────────────

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Provider error payload.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// Error class (`invalid_request_error`, `rate_limit_error`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Machine code (`rate_limit_exceeded`, ...).
    pub code: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
