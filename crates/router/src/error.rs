use thiserror::Error;

use crate::page::Page;

/// Problems detected while building a route table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("path '{pattern}' is declared twice in the same group")]
    DuplicateRoute { pattern: String },

    #[error("path '{pattern}' maps to {existing:?} and {conflicting:?}")]
    PageConflict {
        pattern: String,
        existing: Page,
        conflicting: Page,
    },

    #[error("path '{pattern}' has no access variants")]
    NoVariants { pattern: String },
}
