//! Port abstraction for applying example data seeds.
//!
//! This port encapsulates the transactional persistence needed to seed an
//! example community while recording the seed run. Adapters must insert the
//! seed run record and the community atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewCommentDraft, NewPostDraft, User, UserId, VoteDirection, VoteTally};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by example data seed repository adapters.
    pub enum ExampleDataSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "example data seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "example data seeding query failed: {message}",
    }
}

/// Outcome of recording a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// Seed was newly recorded and the community inserted.
    Applied,
    /// Seed was already recorded; nothing was written.
    AlreadySeeded,
}

/// A generated post with its precomputed counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPost {
    /// Author.
    pub author_id: UserId,
    /// Validated content.
    pub draft: NewPostDraft,
    /// Backdated creation instant.
    pub created_at: DateTime<Utc>,
    /// Counters matching the post's generated ledger entries.
    pub tally: VoteTally,
}

/// A generated comment addressed by its parent's position in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedComment {
    /// Index into [`ExampleDataSeedRequest::posts`].
    pub post_index: usize,
    /// Author.
    pub author_id: UserId,
    /// Validated content.
    pub draft: NewCommentDraft,
    /// Backdated creation instant.
    pub created_at: DateTime<Utc>,
    /// Counters matching the comment's generated ledger entries.
    pub tally: VoteTally,
}

/// Subject of a generated vote, by position in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedVoteTarget {
    /// Index into [`ExampleDataSeedRequest::posts`].
    Post(usize),
    /// Index into [`ExampleDataSeedRequest::comments`].
    Comment(usize),
}

/// A generated ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedVote {
    /// Voted subject.
    pub target: SeedVoteTarget,
    /// Voter.
    pub voter_id: UserId,
    /// Direction.
    pub direction: VoteDirection,
}

/// Request payload for applying a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedRequest {
    /// Seed name recorded in the seed run table.
    pub seed_key: String,
    /// Number of users generated for the seed.
    pub user_count: i32,
    /// RNG seed value used for deterministic generation.
    pub seed: i64,
    /// Generated users.
    pub users: Vec<User>,
    /// Generated posts.
    pub posts: Vec<SeedPost>,
    /// Generated comments.
    pub comments: Vec<SeedComment>,
    /// Generated ledger.
    pub votes: Vec<SeedVote>,
}

/// Port for applying example data seeds in a single transaction.
///
/// Implementations must:
/// - Insert a seed run record guarded by `ON CONFLICT DO NOTHING`.
/// - Insert users, posts, comments, and ledger entries only when the run is new.
/// - Roll back all changes if any step fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleDataSeedRepository: Send + Sync {
    /// Apply a seed run and persist the generated community.
    ///
    /// Returns `Applied` when the seed run is recorded and data is inserted,
    /// or `AlreadySeeded` when the seed key already exists.
    async fn seed_example_data(
        &self,
        request: ExampleDataSeedRequest,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError>;
}
