//! Single-turn response generation.
//!
//! [`ResponseGenerator::generate_response`] drives one turn end to end:
//! assemble the bounded context, invoke the model under the response
//! deadline, classify failures, and report whether summarization is due.
//!
//! Contract with the caller (the owning service):
//! - The turn's user message is appended — and the conversation's counter
//!   recorded — **before** this call; it arrives as the last entry of the
//!   assembled window.
//! - Nothing is persisted here. On success the caller appends the assistant
//!   message; on failure it marks the user message `status=error` and
//!   appends nothing. A failed call never yields fabricated reply text.
//! - Turns for one conversation are serialized externally (see
//!   [`crate::lease`]).

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use compass_core::conversation::Conversation;
use compass_core::errors::{CounselorError, CounselorResult};
use compass_context::assembler::ContextAssembler;
use compass_context::store::MessageStore;
use compass_llm::provider::ChatModel;

use crate::config::CounselorConfig;
use crate::prompt::build_turn_prompt;
use crate::trigger::SummaryTrigger;

// ─────────────────────────────────────────────────────────────────────────────
// TurnOutcome
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a successful turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The model's reply text, verbatim.
    pub response: String,
    /// Whether the caller should run summary compression after persisting
    /// this turn's assistant message.
    pub should_update_summary: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// ResponseGenerator
// ─────────────────────────────────────────────────────────────────────────────

/// Orchestrates one conversation turn against the model.
pub struct ResponseGenerator {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn MessageStore>,
    assembler: ContextAssembler,
    trigger: SummaryTrigger,
    config: CounselorConfig,
}

impl ResponseGenerator {
    /// Create a generator over the given model and store.
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn MessageStore>,
        config: CounselorConfig,
    ) -> Self {
        Self {
            model,
            store,
            assembler: ContextAssembler::new(config.window_size),
            trigger: SummaryTrigger::new(config.summary_interval),
            config,
        }
    }

    /// Generate the reply for the current turn.
    ///
    /// `user_text` is the text of the user message the caller already
    /// appended; it is validated here once and re-read from the store as
    /// part of the window.
    pub async fn generate_response(
        &self,
        user_text: &str,
        conversation: &Conversation,
    ) -> CounselorResult<TurnOutcome> {
        if user_text.trim().is_empty() {
            return Err(CounselorError::validation_field(
                "message content must not be empty",
                "content",
            ));
        }

        // Assembling
        debug!(conversation = %conversation.id, "turn: assembling context");
        let context = self.assembler.assemble(conversation, self.store.as_ref()).await?;
        if context.recent_messages.is_empty() {
            return Err(CounselorError::validation(
                "conversation has no messages; append the user message before generating",
            ));
        }

        // Invoking
        let prompt = build_turn_prompt(&self.config.templates, &context);
        debug!(
            conversation = %conversation.id,
            model = self.model.model(),
            prompt_messages = prompt.len(),
            "turn: invoking model"
        );
        let call = self.model.generate(&prompt, &self.config.options);
        let response = match timeout(self.config.response_timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(
                    conversation = %conversation.id,
                    category = err.category(),
                    error = %err,
                    "turn: model call failed"
                );
                return Err(CounselorError::ai_response_with_details(
                    format!("model call failed: {err}"),
                    err.diagnostics(),
                ));
            }
            Err(_) => {
                warn!(
                    conversation = %conversation.id,
                    timeout_ms = self.config.response_timeout.as_millis() as u64,
                    "turn: model call timed out"
                );
                return Err(CounselorError::ai_response(format!(
                    "model call timed out after {}ms",
                    self.config.response_timeout.as_millis()
                )));
            }
        };

        // Succeeded. The post-turn total counts the user message already
        // appended plus the assistant message the caller is about to append.
        let post_turn_total = conversation.message_count + 1;
        let should_update_summary = self.trigger.is_due(post_turn_total);

        debug!(
            conversation = %conversation.id,
            post_turn_total,
            should_update_summary,
            reply_chars = response.content.len(),
            "turn: succeeded"
        );

        Ok(TurnOutcome {
            response: response.content,
            should_update_summary,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
