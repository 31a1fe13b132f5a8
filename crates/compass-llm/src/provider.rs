//! # Chat model trait
//!
//! Core abstraction over generative model backends. The orchestration layer
//! holds a `dyn ChatModel` and never learns which provider sits behind it.
//!
//! The trait is deliberately non-streaming: a turn needs the full reply
//! before anything is persisted, and the transport layer owns any streaming
//! simulation toward the UI.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use compass_core::messages::ChatMessage;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

// ─────────────────────────────────────────────────────────────────────────────
// ModelError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during a model call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// HTTP request failed (network, connect, timeout at the socket level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed (invalid or missing key).
    #[error("auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested retry delay in milliseconds.
        retry_after_ms: u64,
        /// Error description.
        message: String,
    },

    /// Provider returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Provider-specific error code.
        code: Option<String>,
        /// Whether this error can be retried.
        retryable: bool,
    },

    /// Provider returned a well-formed response with no usable content.
    #[error("malformed model response: {message}")]
    Malformed {
        /// Error description.
        message: String,
    },
}

impl ModelError {
    /// Whether a fresh call could plausibly succeed.
    ///
    /// Advisory for the caller — nothing in this workspace retries a paid
    /// model call on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                    })
            }
            Self::RateLimited { .. } => true,
            Self::Api { retryable, .. } => *retryable,
            Self::Json(_) | Self::Auth { .. } | Self::Malformed { .. } => false,
        }
    }

    /// Error category string for logging and diagnostics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) => "parse",
            Self::Auth { .. } => "auth",
            Self::RateLimited { .. } => "rate_limit",
            Self::Api { .. } => "api",
            Self::Malformed { .. } => "malformed",
        }
    }

    /// Structured diagnostics payload for surfacing to callers.
    ///
    /// This is what ends up in the `details` field of an AI-response error.
    #[must_use]
    pub fn diagnostics(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "category": self.category(),
            "message": self.to_string(),
            "retryable": self.is_retryable(),
        });
        match self {
            Self::Api { status, code, .. } => {
                payload["status"] = serde_json::json!(status);
                if let Some(code) = code {
                    payload["code"] = serde_json::json!(code);
                }
            }
            Self::RateLimited { retry_after_ms, .. } => {
                payload["retryAfterMs"] = serde_json::json!(retry_after_ms);
            }
            Self::Http(e) => {
                if let Some(status) = e.status() {
                    payload["status"] = serde_json::json!(status.as_u16());
                }
            }
            Self::Json(_) | Self::Auth { .. } | Self::Malformed { .. } => {}
        }
        payload
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response types
// ─────────────────────────────────────────────────────────────────────────────

/// Pass-through sampling parameters for a generate call.
///
/// All fields are optional — the provider applies its own defaults when a
/// field is unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
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

/// Token usage reported by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens generated in the reply.
    pub completion_tokens: u64,
    /// Total billed tokens.
    pub total_tokens: u64,
}

/// A completed model reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Reply text, verbatim from the provider.
    pub content: String,
    /// Token usage, when the provider reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

// ─────────────────────────────────────────────────────────────────────────────
// ChatModel
// ─────────────────────────────────────────────────────────────────────────────

/// Core chat model trait.
///
/// Implementors must be `Send + Sync` for use across async tasks. A call
/// either returns the complete reply or a classified [`ModelError`]; there
/// is no partial state to clean up after a failure.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model ID this handle talks to (e.g. `"gpt-4o-mini"`).
    fn model(&self) -> &str;

    /// Generate a reply for the given role-ordered messages.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> ModelResult<ModelResponse>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
