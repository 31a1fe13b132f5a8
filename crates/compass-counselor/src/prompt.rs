//! Prompt construction.
//!
//! Two prompt shapes leave this backend:
//!
//! - **Turn prompt**: system instruction, then the running summary framed as
//!   prior context (when present), then the recent messages in their
//!   original role order. The current turn's user message is already the
//!   last entry of the window — nothing is appended twice.
//! - **Compression prompt**: the compression instruction, then a single user
//!   message holding the prior summary (when present) and a labeled
//!   transcript of the messages being folded.

use compass_core::messages::{ChatMessage, MessageRole, StoredMessage};
use compass_context::assembler::AssembledContext;

use crate::constants::{
    DEFAULT_COMPRESSION_INSTRUCTION, DEFAULT_SUMMARY_FRAME, DEFAULT_SYSTEM_PROMPT,
    PRIOR_SUMMARY_HEADER, TRANSCRIPT_HEADER,
};

// ─────────────────────────────────────────────────────────────────────────────
// PromptTemplates
// ─────────────────────────────────────────────────────────────────────────────

/// Configurable prompt wording.
///
/// Exact text is a deployment concern; the structure around it is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplates {
    /// System instruction for reply generation.
    pub system_prompt: String,
    /// Frame placed in front of the running summary.
    pub summary_frame: String,
    /// Instruction for summary compression.
    pub compression_instruction: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            summary_frame: DEFAULT_SUMMARY_FRAME.to_string(),
            compression_instruction: DEFAULT_COMPRESSION_INSTRUCTION.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builders
// ─────────────────────────────────────────────────────────────────────────────

/// Build the role-ordered prompt for one reply generation call.
#[must_use]
pub fn build_turn_prompt(
    templates: &PromptTemplates,
    context: &AssembledContext,
) -> Vec<ChatMessage> {
    let mut prompt = Vec::with_capacity(context.recent_messages.len() + 2);
    prompt.push(ChatMessage::system(templates.system_prompt.clone()));

    if !context.summary.is_empty() {
        prompt.push(ChatMessage::system(format!(
            "{}\n\n{}",
            templates.summary_frame, context.summary
        )));
    }

    prompt.extend(context.recent_messages.iter().map(StoredMessage::to_chat_message));
    prompt
}

/// Build the prompt for one summary compression call.
#[must_use]
pub fn build_compression_prompt(
    templates: &PromptTemplates,
    prior_summary: &str,
    messages_to_fold: &[StoredMessage],
) -> Vec<ChatMessage> {
    let mut body = String::new();
    if !prior_summary.is_empty() {
        body.push_str(PRIOR_SUMMARY_HEADER);
        body.push('\n');
        body.push_str(prior_summary);
        body.push_str("\n\n");
    }
    body.push_str(TRANSCRIPT_HEADER);
    body.push('\n');
    for message in messages_to_fold {
        let label = match message.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Counselor",
        };
        body.push_str(label);
        body.push_str(": ");
        body.push_str(&message.content);
        body.push('\n');
    }

    vec![
        ChatMessage::system(templates.compression_instruction.clone()),
        ChatMessage::user(body),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
