//! Default prompt text.
//!
//! Exact wording is configuration, not contract — every string here can be
//! overridden through [`PromptTemplates`](crate::prompt::PromptTemplates).

/// Default system instruction for reply generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced career counselor. You help people \
navigate career decisions: changing roles or industries, negotiating offers, planning skill \
growth, and finding work that fits their goals and constraints. Be concrete and practical, ask \
clarifying questions when goals are vague, and build on what the person has already told you \
instead of repeating earlier advice.";

/// Frame placed in front of the running summary when it enters a prompt.
pub const DEFAULT_SUMMARY_FRAME: &str =
    "Context from earlier in this conversation (older messages have been summarized):";

/// Instruction for folding older messages into a new running summary.
pub const DEFAULT_COMPRESSION_INSTRUCTION: &str = "Condense the conversation below into a running \
summary for future context. Preserve the person's stated career goals, every constraint they \
mentioned (timeline, industry, location, compensation), and the advice already given, so it is \
not repeated later. Write plain prose. Respond with the summary only.";

/// Header above the prior summary inside a compression prompt.
pub const PRIOR_SUMMARY_HEADER: &str = "Previous summary:";

/// Header above the transcript inside a compression prompt.
pub const TRANSCRIPT_HEADER: &str = "Conversation to fold in:";
