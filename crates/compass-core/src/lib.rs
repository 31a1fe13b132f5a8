//! # compass-core
//!
//! Foundation types, errors, and branded IDs for the Compass counseling
//! backend.
//!
//! This crate provides the shared vocabulary that all other Compass crates
//! depend on:
//!
//! - **Branded IDs**: `ConversationId`, `MessageId`, `UserId` as newtypes for
//!   type safety
//! - **Messages**: `StoredMessage` with a closed `MessageRole` enum and a
//!   delivery `MessageStatus`
//! - **Conversations**: `Conversation` state record plus derived
//!   `SessionStats` and title helpers
//! - **Errors**: the closed `CounselorError` taxonomy via `thiserror`, with
//!   stable machine-readable codes

#![deny(unsafe_code)]

pub mod conversation;
pub mod errors;
pub mod ids;
pub mod messages;

pub use conversation::{Conversation, SessionStats, derive_title};
pub use errors::{CounselorError, CounselorResult};
pub use ids::{ConversationId, MessageId, UserId};
pub use messages::{ChatMessage, MessageRole, MessageStatus, PromptRole, StoredMessage};
