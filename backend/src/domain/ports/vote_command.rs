//! Driving port for casting votes.
//!
//! Votes are toggles: repeating a direction removes the vote. Callers must
//! therefore never retry a vote blindly.

use async_trait::async_trait;

use crate::domain::{Error, SubjectRef, UserId, VoteDirection, VoteTally};

/// A vote intent from an authenticated voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    /// Voted subject.
    pub subject: SubjectRef,
    /// Voter.
    pub voter: UserId,
    /// Requested direction.
    pub direction: VoteDirection,
}

/// Refreshed counters after a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteResponse {
    /// Voted subject.
    pub subject: SubjectRef,
    /// Counters after the vote committed.
    pub tally: VoteTally,
    /// The voter's ledger entry after the vote.
    pub user_vote: Option<VoteDirection>,
}

/// Domain use-case port for casting votes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Apply a vote and return the refreshed counters.
    async fn cast_vote(&self, request: VoteRequest) -> Result<VoteResponse, Error>;
}
