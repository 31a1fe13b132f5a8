//! Per-conversation turn leases.
//!
//! The core mandates at most one in-flight turn per conversation: context
//! assembly reads counters a concurrent turn would be mutating, and two
//! racing turns could both observe a pre-summarization total and compress
//! redundantly. The components themselves stay lock-free; this registry is
//! the keyed lease the owning service holds around assemble + invoke +
//! persist.
//!
//! The guard releases on drop, covering every exit path including failures.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use compass_core::ids::ConversationId;

/// Keyed async mutex over conversation IDs.
#[derive(Debug, Default)]
pub struct ConversationLeases {
    locks: DashMap<ConversationId, Arc<Mutex<()>>>,
}

/// Held lease for one conversation's turn. Dropping it releases the turn.
#[derive(Debug)]
pub struct TurnLease {
    _guard: OwnedMutexGuard<()>,
}

impl ConversationLeases {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lease for a conversation, waiting if a turn is in flight.
    pub async fn acquire(&self, conversation_id: &ConversationId) -> TurnLease {
        let mutex = self.mutex_for(conversation_id);
        TurnLease {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Try to acquire the lease without waiting.
    ///
    /// Returns `None` while another turn holds it — callers reject or queue
    /// the new turn instead of racing.
    #[must_use]
    pub fn try_acquire(&self, conversation_id: &ConversationId) -> Option<TurnLease> {
        let mutex = self.mutex_for(conversation_id);
        mutex
            .try_lock_owned()
            .ok()
            .map(|guard| TurnLease { _guard: guard })
    }

    /// Number of conversations with a registered lease entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` if no lease entry exists yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Get or create the mutex for a conversation.
    ///
    /// The shard guard must not be held across an await, so the `Arc` is
    /// cloned out before any locking happens.
    fn mutex_for(&self, conversation_id: &ConversationId) -> Arc<Mutex<()>> {
        self.locks
            .entry(conversation_id.clone())
            .or_default()
            .clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
