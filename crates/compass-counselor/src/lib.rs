//! # compass-counselor
//!
//! Turn orchestration for the Compass counseling backend.
//!
//! One turn flows through [`ResponseGenerator::generate_response`]:
//! assemble the bounded context, invoke the model under a deadline, classify
//! failures, and report whether summarization is due. The caller owns all
//! persistence — appending messages, marking a failed turn's user message,
//! and storing the summary string returned by [`SummaryCompressor`].
//!
//! Summarization runs on a fixed cadence ([`SummaryTrigger`]) and is the one
//! place a model failure is downgraded instead of raised: a missed
//! compression retains the previous summary and retries on a later turn,
//! because it must never block a reply that already succeeded.
//!
//! [`ConversationLeases`] gives the owning service the required
//! one-in-flight-turn-per-conversation serialization as a keyed async lease.

#![deny(unsafe_code)]

pub mod compressor;
pub mod config;
pub mod constants;
pub mod generator;
pub mod lease;
pub mod prompt;
pub mod trigger;

pub use compressor::{SummaryCompressor, SummaryOutcome};
pub use config::CounselorConfig;
pub use generator::{ResponseGenerator, TurnOutcome};
pub use lease::{ConversationLeases, TurnLease};
pub use prompt::PromptTemplates;
pub use trigger::SummaryTrigger;
