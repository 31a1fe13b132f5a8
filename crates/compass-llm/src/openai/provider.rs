//! `OpenAI` chat-completions client implementing [`ChatModel`].
//!
//! A thin, non-streaming client: one POST per generate call, Bearer auth,
//! status-based error classification. The HTTP client carries no request
//! deadline of its own — the orchestration layer wraps calls in
//! `tokio::time::timeout` so reply and compression calls can run under
//! different budgets against the same handle.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use tracing::{debug, warn};

use compass_core::messages::ChatMessage;

use crate::provider::{
    ChatModel, GenerateOptions, ModelError, ModelResponse, ModelResult, TokenUsage,
};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope, OpenAiConfig,
};

/// Fallback retry delay when a 429 response carries no `Retry-After` header.
const DEFAULT_RETRY_AFTER_MS: u64 = 1_000;

/// `OpenAI` chat-completions model handle.
pub struct OpenAiModel {
    /// Provider configuration.
    config: OpenAiConfig,
    /// HTTP client (reused across requests).
    client: reqwest::Client,
}

impl OpenAiModel {
    /// Create a new model handle.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint URL for chat completions.
    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Map a non-success response to a classified [`ModelError`].
    fn classify_failure(status: StatusCode, retry_after_ms: Option<u64>, body: &str) -> ModelError {
        // The error envelope is best-effort: some gateways return bare text.
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error);
        let message = detail
            .as_ref()
            .map_or_else(|| body.trim().to_owned(), |d| d.message.clone());
        let code = detail.and_then(|d| d.code);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Auth { message },
            StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited {
                retry_after_ms: retry_after_ms.unwrap_or(DEFAULT_RETRY_AFTER_MS),
                message,
            },
            _ => ModelError::Api {
                status: status.as_u16(),
                message,
                code,
                retryable: status.is_server_error(),
            },
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> ModelResult<ModelResponse> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            stop: options.stop.clone(),
        };

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ModelError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1_000);
            let body = response.text().await.unwrap_or_default();
            let err = Self::classify_failure(status, retry_after_ms, &body);
            warn!(
                model = %self.config.model,
                status = status.as_u16(),
                category = err.category(),
                "chat completion request failed"
            );
            return Err(err);
        }

        let body = response.text().await.map_err(ModelError::Http)?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(ModelError::Malformed {
                message: "response contained no choices".into(),
            });
        };
        let Some(content) = choice.message.content.filter(|c| !c.is_empty()) else {
            return Err(ModelError::Malformed {
                message: "first choice contained no text content".into(),
            });
        };

        let usage = completion.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        debug!(
            model = %self.config.model,
            reply_chars = content.len(),
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "chat completion succeeded"
        );

        Ok(ModelResponse { content, usage })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_model(server: &MockServer) -> OpenAiModel {
        let config = OpenAiConfig::new("gpt-4o-mini", "sk-test")
            .with_base_url(format!("{}/v1", server.uri()));
        OpenAiModel::new(config)
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
        })
    }

    // -- success path --

    #[tokio::test]
    async fn generate_returns_content_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Consider a lateral move first.")))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let resp = model
            .generate(&[ChatMessage::user("Should I switch teams?")], &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(resp.content, "Consider a lateral move first.");
        assert_eq!(resp.usage.unwrap().total_tokens, 28);
    }

    #[tokio::test]
    async fn generate_passes_sampling_params_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.7,
                "max_tokens": 2000,
                "top_p": 0.9
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let model = test_model(&server);
        let options = GenerateOptions {
            temperature: Some(0.7),
            max_tokens: Some(2000),
            top_p: Some(0.9),
            ..Default::default()
        };
        let resp = model
            .generate(&[ChatMessage::user("hi")], &options)
            .await
            .unwrap();
        assert_eq!(resp.content, "ok");
    }

    #[tokio::test]
    async fn generate_sends_role_ordered_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "You are a career counselor."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let model = test_model(&server);
        let messages = vec![
            ChatMessage::system("You are a career counselor."),
            ChatMessage::user("hello"),
        ];
        let _ = model
            .generate(&messages, &GenerateOptions::default())
            .await
            .unwrap();
    }

    // -- failure classification --

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, ModelError::Auth { message } if message.contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited_with_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "2")
                    .set_body_json(serde_json::json!({
                        "error": {"message": "Rate limit reached", "type": "rate_limit_error", "code": "rate_limit_exceeded"}
                    })),
            )
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ModelError::RateLimited { retry_after_ms: 2000, .. }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn rate_limit_without_header_uses_fallback_delay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ModelError::RateLimited { retry_after_ms: DEFAULT_RETRY_AFTER_MS, .. }
        );
    }

    #[tokio::test]
    async fn server_error_is_retryable_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"message": "The engine is currently overloaded", "type": "server_error"}
            })))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, ModelError::Api { status: 503, retryable: true, .. });
    }

    #[tokio::test]
    async fn bad_request_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "Invalid value for temperature", "type": "invalid_request_error", "code": "invalid_value"}
            })))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ModelError::Api { status: 400, retryable: false, code: Some(code), .. } if code == "invalid_value"
        );
    }

    // -- malformed responses --

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [],
                "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}
            })))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, ModelError::Malformed { .. });
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn null_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "stop"}]
            })))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, ModelError::Malformed { .. });
    }

    #[tokio::test]
    async fn invalid_json_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let model = test_model(&server);
        let err = model
            .generate(&[ChatMessage::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_matches!(err, ModelError::Json(_));
    }

    // -- url handling --

    #[test]
    fn completions_url_strips_trailing_slash() {
        let config =
            OpenAiConfig::new("gpt-4o-mini", "sk-test").with_base_url("http://localhost:1234/v1/");
        let model = OpenAiModel::new(config);
        assert_eq!(
            model.completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn model_reports_configured_id() {
        let model = OpenAiModel::new(OpenAiConfig::new("gpt-4o-mini", "sk-test"));
        assert_eq!(model.model(), "gpt-4o-mini");
    }
}
