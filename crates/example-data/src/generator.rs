//! Deterministic community generation from seed definitions.
//!
//! All mutable generation state lives in a [`GenerationContext`] that is
//! created per call and threaded through each stage, so concurrent or
//! repeated generations never share state. The same seed definition always
//! yields an identical community.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::lorem::raw::{Paragraph, Sentence};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::SeedDefinition;
use crate::seed::{
    ExampleCommentSeed, ExampleCommunity, ExamplePostSeed, ExampleUserSeed, ExampleVoteSeed,
    RoleSeed, VoteDirectionSeed, VoteTargetSeed,
};
use crate::validation::{USERNAME_MAX, is_valid_username, sanitize_username};

/// Maximum number of attempts to generate a unique valid username.
const MAX_USERNAME_ATTEMPTS: usize = 100;

/// Longest base name kept before a uniqueness suffix is appended.
const USERNAME_BASE_MAX: usize = USERNAME_MAX - 6;

/// Oldest generated content, in minutes (two weeks).
const MAX_AGE_MINUTES: u32 = 60 * 24 * 14;

/// Share of generated votes that are up votes, in percent.
const UP_VOTE_PERCENT: u32 = 75;

/// Generates an example community from a seed definition.
///
/// Users are generated first (superusers leading), then `posts_per_user`
/// posts per user, then up to `comments_per_post` comments per post, and
/// finally the vote ledger. Each user votes on each subject with
/// `vote_percent` probability; counters on the generated posts and comments
/// are derived from that ledger.
///
/// # Errors
///
/// Returns [`GenerationError`] if a unique username cannot be produced.
/// A definition with zero users yields an empty community.
///
/// # Example
///
/// ```
/// use example_data::{SeedDefinition, generate_example_community};
///
/// let seed_def = SeedDefinition::new("test", 42, 3);
/// let first = generate_example_community(&seed_def).expect("generated");
/// let second = generate_example_community(&seed_def).expect("generated");
/// assert_eq!(first, second);
/// ```
pub fn generate_example_community(
    seed_def: &SeedDefinition,
) -> Result<ExampleCommunity, GenerationError> {
    let mut context = GenerationContext::new(seed_def);
    context.generate_users()?;
    context.generate_posts();
    context.generate_comments();
    context.generate_votes();
    Ok(context.finish())
}

/// Explicit state carried through each generation stage.
struct GenerationContext<'a> {
    definition: &'a SeedDefinition,
    rng: ChaCha8Rng,
    usernames: HashSet<String>,
    community: ExampleCommunity,
}

impl<'a> GenerationContext<'a> {
    fn new(definition: &'a SeedDefinition) -> Self {
        Self {
            definition,
            rng: ChaCha8Rng::seed_from_u64(definition.seed()),
            usernames: HashSet::with_capacity(definition.user_count()),
            community: ExampleCommunity::default(),
        }
    }

    fn generate_users(&mut self) -> Result<(), GenerationError> {
        let superusers = self.definition.superuser_count();
        for index in 0..self.definition.user_count() {
            let id = Uuid::from_u128(self.rng.random());
            let username = self.unique_username()?;
            let role = if index < superusers {
                RoleSeed::Superuser
            } else {
                RoleSeed::Regular
            };
            self.community
                .users
                .push(ExampleUserSeed { id, username, role });
        }
        Ok(())
    }

    fn unique_username(&mut self) -> Result<String, GenerationError> {
        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            let first: String = FirstName(EN).fake_with_rng(&mut self.rng);
            let last: String = LastName(EN).fake_with_rng(&mut self.rng);
            let base: String = sanitize_username(&format!("{first} {last}"))
                .chars()
                .take(USERNAME_BASE_MAX)
                .collect();
            let candidate = if attempt == 0 {
                base
            } else {
                let suffix: u32 = self.rng.random_range(1..10_000);
                format!("{base}_{suffix}")
            };

            if is_valid_username(&candidate) && self.usernames.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(GenerationError::UsernameGenerationFailed {
            max_attempts: MAX_USERNAME_ATTEMPTS,
        })
    }

    fn generate_posts(&mut self) {
        let posts_per_user = self.definition.posts_per_user();
        let authors: Vec<Uuid> = self.community.users.iter().map(|user| user.id).collect();
        for author_id in authors {
            for _ in 0..posts_per_user {
                let sentence: String = Sentence(EN, 3..8).fake_with_rng(&mut self.rng);
                let title = sentence.trim_end_matches('.').to_owned();
                let content: String = Paragraph(EN, 1..4).fake_with_rng(&mut self.rng);
                let client_token = Uuid::from_u128(self.rng.random());
                let age_minutes = self.rng.random_range(0..=MAX_AGE_MINUTES);
                self.community.posts.push(ExamplePostSeed {
                    author_id,
                    title,
                    content,
                    client_token,
                    age_minutes,
                    up_votes: 0,
                    down_votes: 0,
                });
            }
        }
    }

    fn generate_comments(&mut self) {
        let authors: Vec<Uuid> = self.community.users.iter().map(|user| user.id).collect();
        if authors.is_empty() {
            return;
        }
        let post_ages: Vec<u32> = self
            .community
            .posts
            .iter()
            .map(|post| post.age_minutes)
            .collect();

        for (post_index, post_age) in post_ages.into_iter().enumerate() {
            let count = self
                .rng
                .random_range(0..=self.definition.comments_per_post());
            for _ in 0..count {
                let author_index = self.rng.random_range(0..authors.len());
                let Some(author_id) = authors.get(author_index).copied() else {
                    continue;
                };
                let content: String = Sentence(EN, 4..16).fake_with_rng(&mut self.rng);
                let client_token = Uuid::from_u128(self.rng.random());
                let age_minutes = self.rng.random_range(0..=post_age);
                self.community.comments.push(ExampleCommentSeed {
                    post_index,
                    author_id,
                    content,
                    client_token,
                    age_minutes,
                    up_votes: 0,
                    down_votes: 0,
                });
            }
        }
    }

    fn generate_votes(&mut self) {
        let voters: Vec<Uuid> = self.community.users.iter().map(|user| user.id).collect();
        let percent = self.definition.vote_percent();

        for (index, post) in self.community.posts.iter_mut().enumerate() {
            for voter_id in &voters {
                if let Some(direction) = roll_vote(&mut self.rng, percent) {
                    tally(&mut post.up_votes, &mut post.down_votes, direction);
                    self.community.votes.push(ExampleVoteSeed {
                        target: VoteTargetSeed::Post(index),
                        voter_id: *voter_id,
                        direction,
                    });
                }
            }
        }

        for (index, comment) in self.community.comments.iter_mut().enumerate() {
            for voter_id in &voters {
                if let Some(direction) = roll_vote(&mut self.rng, percent) {
                    tally(&mut comment.up_votes, &mut comment.down_votes, direction);
                    self.community.votes.push(ExampleVoteSeed {
                        target: VoteTargetSeed::Comment(index),
                        voter_id: *voter_id,
                        direction,
                    });
                }
            }
        }
    }

    fn finish(self) -> ExampleCommunity {
        self.community
    }
}

fn roll_vote(rng: &mut ChaCha8Rng, percent: u32) -> Option<VoteDirectionSeed> {
    if !rng.random_ratio(percent.min(100), 100) {
        return None;
    }
    if rng.random_ratio(UP_VOTE_PERCENT, 100) {
        Some(VoteDirectionSeed::Up)
    } else {
        Some(VoteDirectionSeed::Down)
    }
}

fn tally(up: &mut u32, down: &mut u32, direction: VoteDirectionSeed) {
    match direction {
        VoteDirectionSeed::Up => *up = up.saturating_add(1),
        VoteDirectionSeed::Down => *down = down.saturating_add(1),
    }
}
