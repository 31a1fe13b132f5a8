//! Conversation state and derived session data.
//!
//! A [`Conversation`] is the per-dialogue record the core mutates through its
//! owner: a running summary of folded history, a monotonic message counter
//! that drives summarization cadence, and a last-touched timestamp. Message
//! rows themselves live behind the store adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ConversationId, UserId};
use crate::messages::StoredMessage;

/// Maximum length of a title derived from the opening message.
const DERIVED_TITLE_MAX: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Conversation
// ─────────────────────────────────────────────────────────────────────────────

/// Per-dialogue state record.
///
/// `message_count` counts every message ever appended and never decreases,
/// even if messages are later deleted out-of-band — summarization cadence is
/// a function of this counter, so recomputing it from live rows would shift
/// the compression schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation ID.
    pub id: ConversationId,
    /// Owning user.
    pub user_id: UserId,
    /// Display title.
    pub title: String,
    /// Running summary of all messages older than the recent window.
    /// Empty until the first compression.
    #[serde(default)]
    pub summary: String,
    /// Monotonic count of messages ever appended.
    #[serde(default)]
    pub message_count: u64,
    /// Timestamp of the last mutation (message append or summary update).
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with no summary and a zero counter.
    #[must_use]
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            user_id,
            title: title.into(),
            summary: String::new(),
            message_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Returns `true` if a summary has been generated for this conversation.
    #[must_use]
    pub fn has_summary(&self) -> bool {
        !self.summary.is_empty()
    }

    /// Record `n` appended messages, refreshing `updated_at`.
    pub fn record_appended(&mut self, n: u64) {
        self.message_count += n;
        self.updated_at = Utc::now();
    }

    /// Replace the running summary, refreshing `updated_at`.
    pub fn record_summary(&mut self, summary: String) {
        self.summary = summary;
        self.updated_at = Utc::now();
    }
}

/// Derive a display title from a conversation's opening message.
///
/// Truncates to 50 characters on a char boundary and appends an ellipsis
/// when anything was cut.
#[must_use]
pub fn derive_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    if trimmed.chars().count() <= DERIVED_TITLE_MAX {
        return trimmed.to_owned();
    }
    let cut: String = trimmed.chars().take(DERIVED_TITLE_MAX).collect();
    format!("{cut}...")
}

// ─────────────────────────────────────────────────────────────────────────────
// SessionStats
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate statistics over a conversation's message log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Total number of messages.
    pub total_messages: u64,
    /// Messages authored by the user.
    pub user_messages: u64,
    /// Messages authored by the model.
    pub assistant_messages: u64,
    /// Whole minutes between the first and last message.
    pub duration_minutes: i64,
}

impl SessionStats {
    /// Compute stats from an ordered message slice.
    #[must_use]
    pub fn from_messages(messages: &[StoredMessage]) -> Self {
        let user_messages = messages.iter().filter(|m| m.is_user()).count() as u64;
        let assistant_messages = messages.iter().filter(|m| m.is_assistant()).count() as u64;

        let duration_minutes = match (messages.first(), messages.last()) {
            (Some(first), Some(last)) => {
                (last.created_at - first.created_at).num_seconds() / 60
            }
            _ => 0,
        };

        Self {
            total_messages: messages.len() as u64,
            user_messages,
            assistant_messages,
            duration_minutes,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
