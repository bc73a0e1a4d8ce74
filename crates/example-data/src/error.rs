//! Error types for the example-data crate.
//!
//! Registry parsing and community generation each get their own semantic
//! error enum, derived with `thiserror`.

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// Two seed definitions share a name.
    #[error("seed '{name}' is defined more than once")]
    DuplicateSeed {
        /// The repeated seed name.
        name: String,
    },

    /// A seed asks for more superusers than users.
    #[error("seed '{name}' requests {superusers} superusers but only {users} users")]
    TooManySuperusers {
        /// The offending seed name.
        name: String,
        /// Requested superuser count.
        superusers: usize,
        /// Requested user count.
        users: usize,
    },

    /// A seed's vote percentage exceeds 100.
    #[error("seed '{name}' vote percentage {percent} exceeds 100")]
    InvalidVotePercent {
        /// The offending seed name.
        name: String,
        /// The out-of-range percentage.
        percent: u32,
    },

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during community generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate a unique, valid username after maximum retries.
    #[error("failed to generate a unique username after {max_attempts} attempts")]
    UsernameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },
}
