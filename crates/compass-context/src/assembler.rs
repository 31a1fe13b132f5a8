//! Bounded context assembly.
//!
//! Produces the two-tier prompt state for a turn: the conversation's running
//! summary (verbatim, possibly empty) plus the chronologically last
//! `window_size` messages. Assembly is a pure read — the summary is never
//! re-derived here, no message is reordered, and the cost is O(window)
//! because the store contract returns suffixes directly.

use tracing::debug;

use compass_core::conversation::Conversation;
use compass_core::messages::StoredMessage;

use crate::store::{MessageStore, StoreResult};

/// Default number of recent messages included in each prompt.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// AssembledContext
// ─────────────────────────────────────────────────────────────────────────────

/// The bounded context for one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledContext {
    /// Running summary of everything older than the window. Empty until the
    /// first compression.
    pub summary: String,
    /// The last `min(window_size, total_messages)` messages, in
    /// chronological order. Includes the current turn's user message, which
    /// the caller appended before assembly.
    pub recent_messages: Vec<StoredMessage>,
    /// Live total message count, including the current turn's user message.
    pub total_messages: u64,
}

impl AssembledContext {
    /// Returns `true` if older history has been pushed out of the window.
    #[must_use]
    pub fn is_windowed(&self) -> bool {
        (self.recent_messages.len() as u64) < self.total_messages
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextAssembler
// ─────────────────────────────────────────────────────────────────────────────

/// Assembles bounded prompt context for conversations.
#[derive(Clone, Copy, Debug)]
pub struct ContextAssembler {
    /// Number of recent messages to include.
    window_size: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ContextAssembler {
    /// Create an assembler with the given window size.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Configured window size.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Assemble the bounded context for a conversation.
    ///
    /// Idempotent: calling twice against unchanged store state returns
    /// identical results.
    pub async fn assemble(
        &self,
        conversation: &Conversation,
        store: &dyn MessageStore,
    ) -> StoreResult<AssembledContext> {
        let total_messages = store.count(&conversation.id).await?;
        let recent_messages = store.last_n(&conversation.id, self.window_size).await?;

        debug!(
            conversation = %conversation.id,
            total_messages,
            window = recent_messages.len(),
            has_summary = conversation.has_summary(),
            "assembled context"
        );

        Ok(AssembledContext {
            summary: conversation.summary.clone(),
            recent_messages,
            total_messages,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
