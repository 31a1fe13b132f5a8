//! Read contract against the owner's message persistence.
//!
//! The core never writes messages — appends, status updates, and summary
//! persistence belong to the owning service. What the core requires is an
//! ordered read surface cheap enough to call on every turn:
//!
//! - [`MessageStore::last_n`] must return the chronologically last `n`
//!   messages of a conversation **in chronological order**, in O(n) or
//!   better. Context assembly leans on this to stay O(window) regardless of
//!   history length.
//! - [`MessageStore::count`] must return the live total.
//!
//! Implementations must preserve the total order `(created_at, insertion
//! sequence)` — the assembler never reorders.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use compass_core::ids::ConversationId;
use compass_core::messages::StoredMessage;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// StoreError
// ─────────────────────────────────────────────────────────────────────────────

/// Store operation kind, for error context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    /// Reading a message suffix.
    Read,
    /// Counting messages.
    Count,
    /// Appending a message (in-memory adapter only).
    Append,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Count => write!(f, "count"),
            Self::Append => write!(f, "append"),
        }
    }
}

/// A message-store failure.
///
/// The orchestration layer wraps this into its database error kind; the
/// store stays authoritative and its failures are never papered over.
#[derive(Debug, Error)]
#[error("message store {operation} failed: {message}")]
pub struct StoreError {
    /// Operation that failed.
    pub operation: StoreOperation,
    /// Human-readable message.
    pub message: String,
    /// Original cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Set the error cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl From<StoreError> for compass_core::errors::CounselorError {
    fn from(err: StoreError) -> Self {
        let message = format!("message store {} failed", err.operation);
        Self::database_with_source(message, err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MessageStore
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered read access to a conversation's message log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Return the chronologically last `n` messages, in chronological order.
    ///
    /// Returns fewer than `n` when the conversation is shorter; an unknown
    /// conversation reads as empty. Cost must be O(n) or better.
    async fn last_n(
        &self,
        conversation_id: &ConversationId,
        n: usize,
    ) -> StoreResult<Vec<StoredMessage>>;

    /// Return the total number of messages in the conversation.
    async fn count(&self, conversation_id: &ConversationId) -> StoreResult<u64>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
