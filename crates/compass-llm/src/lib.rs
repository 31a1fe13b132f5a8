//! # compass-llm
//!
//! Chat model abstraction and the OpenAI chat-completions client.
//!
//! Defines the [`ChatModel`] trait the orchestration layer calls per turn:
//! a single non-streaming `generate` over role-tagged messages with
//! pass-through sampling parameters, returning the reply text and token
//! usage. Failures are classified into [`ModelError`] with retryability and
//! structured diagnostics for the caller.
//!
//! [`OpenAiModel`] is the production implementation over the chat-completions
//! wire format.

#![deny(unsafe_code)]

pub mod openai;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiModel};
pub use provider::{ChatModel, GenerateOptions, ModelError, ModelResponse, ModelResult, TokenUsage};
