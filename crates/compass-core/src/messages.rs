//! Message types for the counseling conversation model.
//!
//! Two vocabularies live here on purpose:
//!
//! - [`StoredMessage`] is the persisted record: a closed [`MessageRole`]
//!   (`user` | `assistant`) plus a delivery [`MessageStatus`]. A message is
//!   immutable once created and totally ordered within its conversation by
//!   `(created_at, insertion sequence)`.
//! - [`ChatMessage`] is the outbound prompt shape: [`PromptRole`] adds
//!   `system`, which exists only for the duration of a model call and is
//!   never persisted as a conversation role.
//!
//! Role validation happens once, at this boundary, via the closed enums —
//! downstream components never re-check role strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a persisted conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message authored by the user.
    User,
    /// Reply authored by the model.
    Assistant,
}

/// Role of a message inside an outbound prompt.
///
/// Superset of [`MessageRole`]: `System` carries instruction text that is
/// synthesized per call and never written to the message log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    /// Instruction framing for the model.
    System,
    /// Message authored by the user.
    User,
    /// Reply authored by the model.
    Assistant,
}

impl From<MessageRole> for PromptRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Assistant,
        }
    }
}

/// Delivery status of a persisted message.
///
/// `Error` marks a message whose turn failed; it is surfaced to the user,
/// never retried automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Message was processed normally.
    #[default]
    Sent,
    /// The turn that produced or consumed this message failed.
    Error,
}

// ─────────────────────────────────────────────────────────────────────────────
// StoredMessage
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted conversation message.
///
/// Immutable once created. `created_at` is strictly non-decreasing within a
/// conversation; ties are broken by insertion order, which the store adapter
/// is required to preserve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    /// Unique message ID.
    pub id: MessageId,
    /// Author role.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Delivery status.
    #[serde(default)]
    pub status: MessageStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Create a user message stamped with the current time.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message stamped with the current time.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a message with the given role, stamped with the current time.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        }
    }

    /// Set the delivery status.
    #[must_use]
    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns `true` if this is a user message.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns `true` if this is an assistant message.
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Project this record into its outbound prompt shape.
    #[must_use]
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChatMessage
// ─────────────────────────────────────────────────────────────────────────────

/// A role-tagged message in an outbound model prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Prompt role.
    pub role: PromptRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
