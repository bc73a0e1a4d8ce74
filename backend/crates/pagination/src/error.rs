//! Error types for pagination input parsing.

use thiserror::Error;

/// Errors raised while interpreting raw pagination inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A pagination parameter was not an integer.
    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger {
        /// Name of the offending parameter (`page` or `per_page`).
        field: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
}

impl PaginationError {
    /// Name of the parameter that failed to parse.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotAnInteger { field, .. } => field,
        }
    }
}
