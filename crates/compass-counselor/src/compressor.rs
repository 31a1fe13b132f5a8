//! Summary compression.
//!
//! Folds messages older than the recent window into the running summary by
//! invoking the model with a compression instruction. The returned string is
//! not a mutation — the caller persists it (or doesn't), which makes a
//! compression call safe to repeat with the same inputs.
//!
//! Failure policy: [`SummaryCompressor::refresh_summary`] is the one place
//! in this workspace where a model failure is downgraded instead of raised.
//! A missed compression returns [`SummaryOutcome::Retained`] — the previous
//! summary stays untouched and the trigger counts as not yet satisfied, so a
//! later turn retries. Store failures still propagate: the store is
//! authoritative.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use compass_core::conversation::Conversation;
use compass_core::errors::{CounselorError, CounselorResult};
use compass_core::messages::StoredMessage;
use compass_context::store::MessageStore;
use compass_llm::provider::ChatModel;

use crate::config::CounselorConfig;
use crate::prompt::build_compression_prompt;

// ─────────────────────────────────────────────────────────────────────────────
// SummaryOutcome
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a summary refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// A new summary was produced; the caller persists it.
    Updated {
        /// The replacement summary.
        summary: String,
    },
    /// The previous summary stays in place; retry on a later turn.
    Retained {
        /// Why no new summary was produced.
        reason: String,
    },
}

impl SummaryOutcome {
    /// Returns `true` if a new summary was produced.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SummaryCompressor
// ─────────────────────────────────────────────────────────────────────────────

/// Folds pre-window history into a running summary via the model.
pub struct SummaryCompressor {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn MessageStore>,
    config: CounselorConfig,
}

impl SummaryCompressor {
    /// Create a compressor over the given model and store.
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn MessageStore>,
        config: CounselorConfig,
    ) -> Self {
        Self {
            model,
            store,
            config,
        }
    }

    /// Produce a new summary from the prior one plus the messages to fold.
    ///
    /// Pure with respect to state: nothing is persisted here, so the result
    /// can be discarded and the call repeated with identical inputs.
    pub async fn compress(
        &self,
        prior_summary: &str,
        messages_to_fold: &[StoredMessage],
    ) -> CounselorResult<String> {
        let prompt =
            build_compression_prompt(&self.config.templates, prior_summary, messages_to_fold);

        debug!(
            folding = messages_to_fold.len(),
            has_prior = !prior_summary.is_empty(),
            "invoking model for summary compression"
        );

        let call = self.model.generate(&prompt, &self.config.options);
        match timeout(self.config.compression_timeout, call).await {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(err)) => Err(CounselorError::ai_response_with_details(
                format!("summary compression failed: {err}"),
                err.diagnostics(),
            )),
            Err(_) => Err(CounselorError::ai_response(format!(
                "summary compression timed out after {}ms",
                self.config.compression_timeout.as_millis()
            ))),
        }
    }

    /// Regenerate the running summary for a conversation.
    ///
    /// Reads everything older than the last `window_size` messages, folds it
    /// together with the prior summary, and returns the replacement string
    /// for the caller to persist. Model failures downgrade to
    /// [`SummaryOutcome::Retained`]; store failures propagate.
    pub async fn refresh_summary(
        &self,
        conversation: &Conversation,
    ) -> CounselorResult<SummaryOutcome> {
        let total = self.store.count(&conversation.id).await?;
        let window = self.config.window_size as u64;
        if total <= window {
            return Ok(SummaryOutcome::Retained {
                reason: "no messages older than the recent window".to_string(),
            });
        }

        // Suffix read of the full log; the fold range is everything except
        // the last `window_size` entries.
        let all = self
            .store
            .last_n(&conversation.id, usize::try_from(total).unwrap_or(usize::MAX))
            .await?;
        let fold_len = all.len().saturating_sub(self.config.window_size);
        let fold = &all[..fold_len];
        if fold.is_empty() {
            return Ok(SummaryOutcome::Retained {
                reason: "no messages older than the recent window".to_string(),
            });
        }

        match self.compress(&conversation.summary, fold).await {
            Ok(summary) => {
                debug!(
                    conversation = %conversation.id,
                    folded = fold.len(),
                    summary_chars = summary.len(),
                    "summary refreshed"
                );
                Ok(SummaryOutcome::Updated { summary })
            }
            Err(err) => {
                warn!(
                    conversation = %conversation.id,
                    error = %err,
                    "summary compression failed; retaining previous summary"
                );
                Ok(SummaryOutcome::Retained {
                    reason: err.to_string(),
                })
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use compass_context::assembler::ContextAssembler;
    use compass_context::memory::InMemoryMessageStore;
    use compass_context::store::{StoreError, StoreOperation, StoreResult};
    use compass_core::ids::{ConversationId, UserId};
    use compass_llm::provider::{GenerateOptions, ModelError, ModelResponse, ModelResult};
    use compass_core::messages::ChatMessage;

    // -- Scripted model --

    struct ScriptedModel {
        replies: Mutex<VecDeque<ModelResult<ModelResponse>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
        delay: Option<Duration>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<ModelResult<ModelResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn reply(text: &str) -> Self {
            Self::new(vec![Ok(ModelResponse {
                content: text.to_string(),
                usage: None,
            })])
        }

        fn failing() -> Self {
            Self::new(vec![Err(ModelError::Api {
                status: 503,
                message: "overloaded".into(),
                code: None,
                retryable: true,
            })])
        }

        fn slow(text: &str, delay: Duration) -> Self {
            let mut model = Self::reply(text);
            model.delay = Some(delay);
            model
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> Vec<ChatMessage> {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            messages: &[ChatMessage],
            _options: &GenerateOptions,
        ) -> ModelResult<ModelResponse> {
            self.calls.lock().unwrap().push(messages.to_vec());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(ModelResponse {
                        content: "fallback".into(),
                        usage: None,
                    })
                })
        }
    }

    // -- Failing store --

    struct FailingStore;

    #[async_trait]
    impl MessageStore for FailingStore {
        async fn last_n(
            &self,
            _conversation_id: &ConversationId,
            _n: usize,
        ) -> StoreResult<Vec<StoredMessage>> {
            Err(StoreError::new(StoreOperation::Read, "connection reset"))
        }

        async fn count(&self, _conversation_id: &ConversationId) -> StoreResult<u64> {
            Err(StoreError::new(StoreOperation::Count, "connection reset"))
        }
    }

    // -- Fixtures --

    fn seeded(count: usize) -> (Conversation, Arc<InMemoryMessageStore>) {
        let conversation = Conversation::new(UserId::from("user-1"), "t");
        let store = Arc::new(InMemoryMessageStore::new());
        for i in 0..count {
            let msg = if i % 2 == 0 {
                StoredMessage::user(format!("m{i}"))
            } else {
                StoredMessage::assistant(format!("m{i}"))
            };
            store.append(&conversation.id, msg);
        }
        (conversation, store)
    }

    fn config() -> CounselorConfig {
        CounselorConfig::default()
    }

    // -- compress --

    #[tokio::test]
    async fn compress_returns_model_text_verbatim() {
        let model = Arc::new(ScriptedModel::reply("condensed history"));
        let (_, store) = seeded(0);
        let compressor = SummaryCompressor::new(model.clone(), store, config());

        let summary = compressor
            .compress("", &[StoredMessage::user("hello")])
            .await
            .unwrap();

        assert_eq!(summary, "condensed history");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn compress_is_repeatable_with_same_inputs() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelResponse {
                content: "same".into(),
                usage: None,
            }),
            Ok(ModelResponse {
                content: "same".into(),
                usage: None,
            }),
        ]));
        let (_, store) = seeded(0);
        let compressor = SummaryCompressor::new(model.clone(), store, config());
        let fold = vec![StoredMessage::user("hello")];

        let first = compressor.compress("prior", &fold).await.unwrap();
        let second = compressor.compress("prior", &fold).await.unwrap();

        assert_eq!(first, second);
        // Identical prompts both times — nothing was mutated in between.
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn compress_failure_maps_to_ai_response() {
        let model = Arc::new(ScriptedModel::failing());
        let (_, store) = seeded(0);
        let compressor = SummaryCompressor::new(model, store, config());

        let err = compressor
            .compress("", &[StoredMessage::user("hello")])
            .await
            .unwrap_err();

        assert_eq!(err.code(), "AI_RESPONSE_ERROR");
    }

    #[tokio::test]
    async fn compress_timeout_is_a_failure() {
        let model = Arc::new(ScriptedModel::slow("late", Duration::from_millis(100)));
        let (_, store) = seeded(0);
        let mut cfg = config();
        cfg.compression_timeout = Duration::from_millis(5);
        let compressor = SummaryCompressor::new(model, store, cfg);

        let err = compressor
            .compress("", &[StoredMessage::user("hello")])
            .await
            .unwrap_err();

        assert_eq!(err.code(), "AI_RESPONSE_ERROR");
        assert!(err.to_string().contains("timed out"));
    }

    // -- refresh_summary --

    #[tokio::test]
    async fn refresh_folds_only_pre_window_messages() {
        let (conversation, store) = seeded(30);
        let model = Arc::new(ScriptedModel::reply("new summary"));
        let compressor = SummaryCompressor::new(model.clone(), store, config());

        let outcome = compressor.refresh_summary(&conversation).await.unwrap();

        assert_eq!(
            outcome,
            SummaryOutcome::Updated {
                summary: "new summary".into()
            }
        );
        // Window is 20, so exactly m0..m9 are folded.
        let call = model.last_call();
        let body = &call[1].content;
        assert!(body.contains("m0"));
        assert!(body.contains("m9"));
        assert!(!body.contains("m10"));
    }

    #[tokio::test]
    async fn refresh_includes_prior_summary_in_prompt() {
        let (mut conversation, store) = seeded(30);
        conversation.record_summary("wants a fintech role in Berlin".into());
        let model = Arc::new(ScriptedModel::reply("newer summary"));
        let compressor = SummaryCompressor::new(model.clone(), store, config());

        let _ = compressor.refresh_summary(&conversation).await.unwrap();

        let call = model.last_call();
        assert!(call[1].content.contains("wants a fintech role in Berlin"));
    }

    #[tokio::test]
    async fn refresh_retains_when_nothing_outside_window() {
        let (conversation, store) = seeded(12);
        let model = Arc::new(ScriptedModel::reply("unused"));
        let compressor = SummaryCompressor::new(model.clone(), store, config());

        let outcome = compressor.refresh_summary(&conversation).await.unwrap();

        assert!(!outcome.is_updated());
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn refresh_downgrades_model_failure_to_retained() {
        let (mut conversation, store) = seeded(30);
        conversation.record_summary("the prior summary".into());
        let model = Arc::new(ScriptedModel::failing());
        let compressor = SummaryCompressor::new(model, store, config());

        let outcome = compressor.refresh_summary(&conversation).await.unwrap();

        assert!(matches!(outcome, SummaryOutcome::Retained { ref reason } if !reason.is_empty()));
        // Round-trip: the caller persists nothing, the prior summary stands.
        assert_eq!(conversation.summary, "the prior summary");
    }

    #[tokio::test]
    async fn refresh_timeout_downgrades_to_retained() {
        let (conversation, store) = seeded(30);
        let model = Arc::new(ScriptedModel::slow("late", Duration::from_millis(100)));
        let mut cfg = config();
        cfg.compression_timeout = Duration::from_millis(5);
        let compressor = SummaryCompressor::new(model, store, cfg);

        let outcome = compressor.refresh_summary(&conversation).await.unwrap();
        assert!(!outcome.is_updated());
    }

    #[tokio::test]
    async fn refresh_propagates_store_failure() {
        let conversation = Conversation::new(UserId::from("user-1"), "t");
        let model = Arc::new(ScriptedModel::reply("unused"));
        let compressor = SummaryCompressor::new(model, Arc::new(FailingStore), config());

        let err = compressor.refresh_summary(&conversation).await.unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    // -- compression feeding assembly --

    #[tokio::test]
    async fn updated_summary_flows_into_next_assembly() {
        let (mut conversation, store) = seeded(30);
        let model = Arc::new(ScriptedModel::reply("folded: early QA background discussion"));
        let compressor = SummaryCompressor::new(model, store.clone(), config());

        let outcome = compressor.refresh_summary(&conversation).await.unwrap();
        let SummaryOutcome::Updated { summary } = outcome else {
            panic!("expected an updated summary");
        };
        conversation.record_summary(summary);

        let assembler = ContextAssembler::new(20);
        let ctx = assembler
            .assemble(&conversation, store.as_ref())
            .await
            .unwrap();

        assert_eq!(ctx.summary, "folded: early QA background discussion");
        // The window starts exactly where the fold ended.
        assert_eq!(ctx.recent_messages.len(), 20);
        assert_eq!(ctx.recent_messages[0].content, "m10");
    }
}
