//! Error taxonomy for the Compass counseling backend.
//!
//! [`CounselorError`] is a closed sum type with exactly four kinds, each
//! carrying a human-readable message and, where applicable, structured
//! details. Callers branch exhaustively on the variant (or on [`code`]) —
//! there is no open hierarchy to probe.
//!
//! Propagation policy: every component raises these rather than swallowing
//! them. The summary compressor is the single deliberate exception — it
//! downgrades a model failure to "retain the previous summary" because a
//! summarization miss must never block a reply that already succeeded.
//!
//! [`code`]: CounselorError::code

use thiserror::Error;

/// Result alias for core operations.
pub type CounselorResult<T> = Result<T, CounselorError>;

// ─────────────────────────────────────────────────────────────────────────────
// CounselorError
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error type for the counseling core.
#[derive(Debug, Error)]
pub enum CounselorError {
    /// Caller supplied malformed input. Always a caller bug, never retried.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable message.
        message: String,
        /// Offending field, when known.
        field: Option<String>,
    },

    /// Referenced conversation does not exist or is outside the caller's
    /// scope. Surfaced as not-found, never retried.
    #[error("chat session not found: {session_id}")]
    SessionNotFound {
        /// The conversation ID that failed to resolve.
        session_id: String,
    },

    /// The model call failed, timed out, or returned malformed output.
    /// Recoverable by a caller-initiated retry with a fresh call.
    #[error("AI response failed: {message}")]
    AiResponse {
        /// Human-readable message.
        message: String,
        /// Provider diagnostics, when available.
        details: Option<serde_json::Value>,
    },

    /// A message-store operation failed. The store is authoritative; its
    /// failures are surfaced, not papered over.
    #[error("database operation failed: {message}")]
    Database {
        /// Human-readable message.
        message: String,
        /// Original cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CounselorError {
    /// Create a validation error without a field reference.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending field.
    #[must_use]
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not-found error for a conversation ID.
    #[must_use]
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    /// Create a model-failure error without diagnostics.
    #[must_use]
    pub fn ai_response(message: impl Into<String>) -> Self {
        Self::AiResponse {
            message: message.into(),
            details: None,
        }
    }

    /// Create a model-failure error carrying provider diagnostics.
    #[must_use]
    pub fn ai_response_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::AiResponse {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a store-failure error.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store-failure error wrapping its cause.
    #[must_use]
    pub fn database_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            Self::AiResponse { .. } => "AI_RESPONSE_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
        }
    }

    /// Whether a caller-initiated retry with a fresh call can succeed.
    ///
    /// Only model failures qualify; the other kinds are caller bugs or
    /// authoritative store state.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AiResponse { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- codes --

    #[test]
    fn codes_are_stable() {
        assert_eq!(CounselorError::validation("x").code(), "VALIDATION_ERROR");
        assert_eq!(
            CounselorError::session_not_found("conv-1").code(),
            "SESSION_NOT_FOUND"
        );
        assert_eq!(CounselorError::ai_response("x").code(), "AI_RESPONSE_ERROR");
        assert_eq!(CounselorError::database("x").code(), "DATABASE_ERROR");
    }

    // -- retryability --

    #[test]
    fn only_ai_response_is_retryable() {
        assert!(CounselorError::ai_response("timeout").is_retryable());
        assert!(!CounselorError::validation("empty").is_retryable());
        assert!(!CounselorError::session_not_found("c").is_retryable());
        assert!(!CounselorError::database("down").is_retryable());
    }

    // -- constructors --

    #[test]
    fn validation_field_carries_field() {
        let err = CounselorError::validation_field("must not be empty", "content");
        assert_matches!(err, CounselorError::Validation { field: Some(f), .. } if f == "content");
    }

    #[test]
    fn session_not_found_display_includes_id() {
        let err = CounselorError::session_not_found("conv-42");
        assert!(err.to_string().contains("conv-42"));
    }

    #[test]
    fn ai_response_with_details_keeps_payload() {
        let details = serde_json::json!({"status": 429, "code": "rate_limit_exceeded"});
        let err = CounselorError::ai_response_with_details("rate limited", details.clone());
        assert_matches!(err, CounselorError::AiResponse { details: Some(d), .. } if d == details);
    }

    #[test]
    fn database_with_source_chains_cause() {
        let cause = std::io::Error::other("connection reset");
        let err = CounselorError::database_with_source("store read failed", cause);
        assert_matches!(err, CounselorError::Database { source: Some(_), .. });
        let _: &dyn std::error::Error = &err;
    }

    // -- display --

    #[test]
    fn display_formats() {
        assert_eq!(
            CounselorError::validation("message content is empty").to_string(),
            "validation failed: message content is empty"
        );
        assert_eq!(
            CounselorError::ai_response("model call timed out").to_string(),
            "AI response failed: model call timed out"
        );
    }

    // -- exhaustive branching --

    #[test]
    fn callers_can_branch_on_kind() {
        let errors = vec![
            CounselorError::validation("v"),
            CounselorError::session_not_found("s"),
            CounselorError::ai_response("a"),
            CounselorError::database("d"),
        ];
        let codes: Vec<&str> = errors
            .iter()
            .map(|e| match e {
                CounselorError::Validation { .. } => "v",
                CounselorError::SessionNotFound { .. } => "s",
                CounselorError::AiResponse { .. } => "a",
                CounselorError::Database { .. } => "d",
            })
            .collect();
        assert_eq!(codes, vec!["v", "s", "a", "d"]);
    }
}
