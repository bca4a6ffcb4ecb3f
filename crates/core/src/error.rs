//! Core error model.

use thiserror::Error;

/// Result type used across the core types.
pub type CoreResult<T> = Result<T, CoreError>;

/// Parsing/validation failure for identity values.
///
/// These only surface at boundaries (profile payloads, persisted state). The
/// routing layer never sees them: a value that fails here simply never
/// becomes a `Principal`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A role code or name outside the closed role table.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A profile payload lacked a field required to build a principal.
    #[error("incomplete profile: {0}")]
    IncompleteProfile(String),
}

impl CoreError {
    pub fn unknown_role(raw: impl Into<String>) -> Self {
        Self::UnknownRole(raw.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn incomplete_profile(msg: impl Into<String>) -> Self {
        Self::IncompleteProfile(msg.into())
    }
}
