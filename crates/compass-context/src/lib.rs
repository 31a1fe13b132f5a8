//! # compass-context
//!
//! Message store contract and bounded context assembly.
//!
//! - [`MessageStore`]: the read contract the core requires of the owner's
//!   persistence layer — an ordered suffix (`last_n`) and a total count.
//!   Writes stay with the owner.
//! - [`InMemoryMessageStore`]: reference adapter backed by per-conversation
//!   vectors; used in tests and as the contract's executable documentation.
//! - [`ContextAssembler`]: produces the bounded prompt context (running
//!   summary + recent message window) for a conversation at a given turn.
//!   Pure reads, cost bounded by the window size, never the history length.

#![deny(unsafe_code)]

pub mod assembler;
pub mod memory;
pub mod store;

pub use assembler::{AssembledContext, ContextAssembler};
pub use memory::InMemoryMessageStore;
pub use store::{MessageStore, StoreError, StoreOperation, StoreResult};
