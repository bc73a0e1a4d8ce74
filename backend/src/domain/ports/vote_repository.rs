//! Port abstraction for the vote ledger and subject counters.
//!
//! Adapters execute the whole read-decide-write cycle of a vote as one
//! atomic unit: read the voter's ledger entry, resolve the
//! [`VoteTransition`], mutate the ledger, adjust the counters, and read the
//! refreshed tally back. Concurrent votes on the same subject must serialise
//! on the subject so no counter update is lost.

use async_trait::async_trait;

use crate::domain::{SubjectRef, UserId, VoteDirection, VoteTally, VoteTransition};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by vote repository adapters.
    pub enum VoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "vote repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "vote repository query failed: {message}",
        /// The voted subject does not exist.
        SubjectNotFound { subject: String } => "{subject} not found",
    }
}

/// Result of applying one vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The transition applied to the ledger.
    pub transition: VoteTransition,
    /// Counters read back after the transition committed.
    pub tally: VoteTally,
}

/// Port for applying votes atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Apply `direction` from `voter` to `subject`.
    ///
    /// Returns [`VoteRepositoryError::SubjectNotFound`] when the subject does
    /// not exist; nothing is written in that case.
    async fn apply_vote(
        &self,
        subject: SubjectRef,
        voter: &UserId,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, VoteRepositoryError>;
}
