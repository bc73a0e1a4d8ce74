//! Example data seeding orchestration.
//!
//! Converts the deterministic example community into domain users, posts,
//! comments, and ledger entries, then delegates persistence to the seeding
//! repository port.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use example_data::{
    ExampleCommentSeed, ExampleCommunity, ExamplePostSeed, ExampleUserSeed, ExampleVoteSeed,
    GenerationError, RegistryError, RoleSeed, SeedRegistry, VoteDirectionSeed, VoteTargetSeed,
    generate_example_community,
};
use mockable::Clock;
use thiserror::Error;

use crate::domain::ports::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    SeedComment, SeedPost, SeedVote, SeedVoteTarget, SeedingResult,
};
use crate::domain::{
    ClientToken, Error, NewCommentDraft, NewPostDraft, Role, User, UserId, UserValidationError,
    Username, VoteDirection, VoteTally,
};

/// Result of attempting to apply example data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    /// Seed key used to record the run.
    pub seed_key: String,
    /// Number of users generated and persisted.
    pub user_count: usize,
    /// Persistence outcome for the seed run.
    pub result: SeedingResult,
}

/// Errors raised while preparing or applying example data.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    /// Seed registry lookups failed.
    #[error("seed registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Community generation failed.
    #[error("example data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Generated username failed backend validation.
    #[error("generated user failed validation: {0}")]
    UserInvalid(#[from] UserValidationError),
    /// Generated post or comment failed backend validation.
    #[error("generated content failed validation: {0}")]
    Draft(Error),
    /// Seed value cannot be represented in the database.
    #[error("seed value {seed} exceeds maximum representable value")]
    SeedOverflow { seed: u64 },
    /// User count cannot be represented in the database.
    #[error("user count {count} exceeds maximum representable value")]
    UserCountOverflow { count: usize },
    /// Persistence adapter failed while seeding.
    #[error("example data persistence error: {0}")]
    Persistence(#[from] ExampleDataSeedRepositoryError),
}

/// Service that orchestrates example data seeding.
#[derive(Clone)]
pub struct ExampleDataSeeder<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ExampleDataSeeder<R> {
    /// Create a new seeder with the given persistence adapter and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ExampleDataSeeder<R>
where
    R: ExampleDataSeedRepository,
{
    /// Apply example data for a named seed within the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ExampleDataSeedingError`] if registry lookup, generation,
    /// validation, or persistence fails.
    pub async fn seed_from_registry(
        &self,
        registry: &SeedRegistry,
        seed_name: &str,
        user_count_override: Option<usize>,
    ) -> Result<ExampleDataSeedOutcome, ExampleDataSeedingError> {
        let mut seed_def = registry.find_seed(seed_name)?.clone();
        if let Some(count) = user_count_override {
            seed_def = seed_def.with_user_count(count);
        }
        let seed_key = seed_def.name().to_owned();
        let user_count = seed_def.user_count();
        let user_count_i32 = i32::try_from(user_count)
            .map_err(|_| ExampleDataSeedingError::UserCountOverflow { count: user_count })?;
        let seed_value = seed_def.seed();
        let seed_value_i64 = i64::try_from(seed_value)
            .map_err(|_| ExampleDataSeedingError::SeedOverflow { seed: seed_value })?;

        let community = generate_example_community(&seed_def)?;
        let request = build_request(
            seed_key.clone(),
            user_count_i32,
            seed_value_i64,
            community,
            self.clock.utc(),
        )?;
        let result = self.repository.seed_example_data(request).await?;

        Ok(ExampleDataSeedOutcome {
            seed_key,
            user_count,
            result,
        })
    }
}

fn build_request(
    seed_key: String,
    user_count: i32,
    seed: i64,
    community: ExampleCommunity,
    now: DateTime<Utc>,
) -> Result<ExampleDataSeedRequest, ExampleDataSeedingError> {
    let users = community
        .users
        .into_iter()
        .map(|user| convert_user(user, now))
        .collect::<Result<Vec<_>, _>>()?;
    let posts = community
        .posts
        .into_iter()
        .map(|post| convert_post(post, now))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ExampleDataSeedingError::Draft)?;
    let comments = community
        .comments
        .into_iter()
        .map(|comment| convert_comment(comment, now))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ExampleDataSeedingError::Draft)?;
    let votes = community.votes.into_iter().map(convert_vote).collect();

    Ok(ExampleDataSeedRequest {
        seed_key,
        user_count,
        seed,
        users,
        posts,
        comments,
        votes,
    })
}

fn backdate(now: DateTime<Utc>, age_minutes: u32) -> DateTime<Utc> {
    now - Duration::minutes(i64::from(age_minutes))
}

fn convert_user(seed: ExampleUserSeed, now: DateTime<Utc>) -> Result<User, UserValidationError> {
    let role = match seed.role {
        RoleSeed::Regular => Role::Regular,
        RoleSeed::Superuser => Role::Superuser,
    };
    Ok(User::new(
        UserId::from_uuid(seed.id),
        Username::new(seed.username)?,
        role,
        now,
    ))
}

fn convert_post(seed: ExamplePostSeed, now: DateTime<Utc>) -> Result<SeedPost, Error> {
    let token = ClientToken::new(seed.client_token.to_string())?;
    Ok(SeedPost {
        author_id: UserId::from_uuid(seed.author_id),
        draft: NewPostDraft::new(seed.title, seed.content, token)?,
        created_at: backdate(now, seed.age_minutes),
        tally: VoteTally::new(seed.up_votes, seed.down_votes),
    })
}

fn convert_comment(seed: ExampleCommentSeed, now: DateTime<Utc>) -> Result<SeedComment, Error> {
    let token = ClientToken::new(seed.client_token.to_string())?;
    Ok(SeedComment {
        post_index: seed.post_index,
        author_id: UserId::from_uuid(seed.author_id),
        draft: NewCommentDraft::new(seed.content, token)?,
        created_at: backdate(now, seed.age_minutes),
        tally: VoteTally::new(seed.up_votes, seed.down_votes),
    })
}

fn convert_vote(seed: ExampleVoteSeed) -> SeedVote {
    SeedVote {
        target: match seed.target {
            VoteTargetSeed::Post(index) => SeedVoteTarget::Post(index),
            VoteTargetSeed::Comment(index) => SeedVoteTarget::Comment(index),
        },
        voter_id: UserId::from_uuid(seed.voter_id),
        direction: match seed.direction {
            VoteDirectionSeed::Up => VoteDirection::Up,
            VoteDirectionSeed::Down => VoteDirection::Down,
        },
    }
}
