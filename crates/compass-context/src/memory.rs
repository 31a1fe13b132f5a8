//! In-memory message store adapter.
//!
//! Reference implementation of the [`MessageStore`] read contract, keyed by
//! conversation with one ordered vector per dialogue. Appends enforce the
//! non-decreasing `created_at` invariant by clamping a stray earlier
//! timestamp up to the tail's — insertion order is the tiebreaker either
//! way, so the total order stays intact.
//!
//! Used as the test double across the workspace and as a viable store for
//! single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use compass_core::ids::ConversationId;
use compass_core::messages::StoredMessage;

use crate::store::{MessageStore, StoreResult};

/// In-memory, per-conversation ordered message log.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    logs: RwLock<HashMap<ConversationId, Vec<StoredMessage>>>,
}

impl InMemoryMessageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a conversation's log.
    ///
    /// Creates the log on first append. Clamps `created_at` up to the
    /// current tail's timestamp if the clock went backwards.
    pub fn append(&self, conversation_id: &ConversationId, mut message: StoredMessage) {
        let mut logs = self.logs.write();
        let log = logs.entry(conversation_id.clone()).or_default();
        if let Some(last) = log.last() {
            if message.created_at < last.created_at {
                message.created_at = last.created_at;
            }
        }
        log.push(message);
    }

    /// Append a batch of messages in order.
    pub fn append_all(
        &self,
        conversation_id: &ConversationId,
        messages: impl IntoIterator<Item = StoredMessage>,
    ) {
        for message in messages {
            self.append(conversation_id, message);
        }
    }

    /// Number of conversations with at least one message.
    #[must_use]
    pub fn conversations(&self) -> usize {
        self.logs.read().len()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn last_n(
        &self,
        conversation_id: &ConversationId,
        n: usize,
    ) -> StoreResult<Vec<StoredMessage>> {
        let logs = self.logs.read();
        let Some(log) = logs.get(conversation_id) else {
            return Ok(Vec::new());
        };
        let start = log.len().saturating_sub(n);
        Ok(log[start..].to_vec())
    }

    async fn count(&self, conversation_id: &ConversationId) -> StoreResult<u64> {
        let logs = self.logs.read();
        Ok(logs.get(conversation_id).map_or(0, |log| log.len() as u64))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
