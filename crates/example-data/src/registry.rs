//! Seed registry types and JSON parsing.
//!
//! A registry holds named seed definitions. Each definition fixes the RNG
//! seed and the shape of the community it generates, so a seed name is
//! enough to reproduce an identical data set.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

const DEFAULT_POSTS_PER_USER: usize = 2;
const DEFAULT_COMMENTS_PER_POST: usize = 3;
const DEFAULT_VOTE_PERCENT: u32 = 40;

/// A seed registry containing named seed definitions.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{"name": "test", "seed": 42, "userCount": 5}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// assert_eq!(registry.seeds()[0].posts_per_user(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or a required field is missing
    /// - The version is unsupported
    /// - The seeds array is empty or repeats a name
    /// - A seed definition is internally inconsistent
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let mut names = HashSet::with_capacity(raw.seeds.len());
        let mut seeds = Vec::with_capacity(raw.seeds.len());
        for raw_seed in raw.seeds {
            if !names.insert(raw_seed.name.clone()) {
                return Err(RegistryError::DuplicateSeed {
                    name: raw_seed.name,
                });
            }
            seeds.push(SeedDefinition::try_from(raw_seed)?);
        }

        Ok(Self {
            version: raw.version,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named seed definition for deterministic community generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    user_count: usize,
    posts_per_user: usize,
    comments_per_post: usize,
    vote_percent: u32,
    superuser_count: usize,
}

impl SeedDefinition {
    /// Build a definition with default content shape for `user_count` users.
    ///
    /// One superuser is included whenever at least one user is requested.
    #[must_use]
    pub fn new(name: impl Into<String>, seed: u64, user_count: usize) -> Self {
        Self {
            name: name.into(),
            seed,
            user_count,
            posts_per_user: DEFAULT_POSTS_PER_USER,
            comments_per_post: DEFAULT_COMMENTS_PER_POST,
            vote_percent: DEFAULT_VOTE_PERCENT,
            superuser_count: user_count.min(1),
        }
    }

    /// Override the user count, keeping the superuser count within bounds.
    #[must_use]
    pub fn with_user_count(mut self, user_count: usize) -> Self {
        self.user_count = user_count;
        self.superuser_count = self.superuser_count.min(user_count);
        self
    }

    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of users to generate.
    #[must_use]
    pub const fn user_count(&self) -> usize {
        self.user_count
    }

    /// Returns the number of posts each user authors.
    #[must_use]
    pub const fn posts_per_user(&self) -> usize {
        self.posts_per_user
    }

    /// Returns the maximum number of comments generated per post.
    #[must_use]
    pub const fn comments_per_post(&self) -> usize {
        self.comments_per_post
    }

    /// Returns the chance, in percent, that a user votes on a given subject.
    #[must_use]
    pub const fn vote_percent(&self) -> u32 {
        self.vote_percent
    }

    /// Returns how many of the generated users are superusers.
    #[must_use]
    pub const fn superuser_count(&self) -> usize {
        self.superuser_count
    }
}

impl TryFrom<RawSeedDefinition> for SeedDefinition {
    type Error = RegistryError;

    fn try_from(raw: RawSeedDefinition) -> Result<Self, Self::Error> {
        let vote_percent = raw.vote_percent.unwrap_or(DEFAULT_VOTE_PERCENT);
        if vote_percent > 100 {
            return Err(RegistryError::InvalidVotePercent {
                name: raw.name,
                percent: vote_percent,
            });
        }

        let superuser_count = raw.superuser_count.unwrap_or(raw.user_count.min(1));
        if superuser_count > raw.user_count {
            return Err(RegistryError::TooManySuperusers {
                name: raw.name,
                superusers: superuser_count,
                users: raw.user_count,
            });
        }

        Ok(Self {
            name: raw.name,
            seed: raw.seed,
            user_count: raw.user_count,
            posts_per_user: raw.posts_per_user.unwrap_or(DEFAULT_POSTS_PER_USER),
            comments_per_post: raw.comments_per_post.unwrap_or(DEFAULT_COMMENTS_PER_POST),
            vote_percent,
            superuser_count,
        })
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    seeds: Vec<RawSeedDefinition>,
}

/// Raw JSON representation of a seed definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    user_count: usize,
    posts_per_user: Option<usize>,
    comments_per_post: Option<usize>,
    vote_percent: Option<u32>,
    superuser_count: Option<usize>,
}
