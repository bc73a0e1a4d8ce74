//! Deterministic example community generation for demonstration purposes.
//!
//! This crate produces believable, reproducible social data (users, posts,
//! comments, and votes) from a JSON seed registry. It is independent of the
//! backend's domain types so the backend can convert the output at the point
//! of use without a circular dependency.
//!
//! # Overview
//!
//! - Seed registries are parsed from JSON and hold named seed definitions.
//! - Generation is driven by a ChaCha8 RNG seeded from the definition, so the
//!   same seed always yields the same community.
//! - Vote counters on generated posts and comments always match the
//!   generated vote ledger.
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_community};
//!
//! let json = r#"{
//!     "version": 1,
//!     "seeds": [{
//!         "name": "test-seed",
//!         "seed": 42,
//!         "userCount": 4,
//!         "postsPerUser": 2,
//!         "commentsPerPost": 3,
//!         "votePercent": 50
//!     }]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("test-seed").expect("seed exists");
//! let community = generate_example_community(seed_def).expect("generation succeeds");
//!
//! assert_eq!(community.users.len(), 4);
//! assert_eq!(community.posts.len(), 8);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::generate_example_community;
pub use registry::{SeedDefinition, SeedRegistry};
pub use seed::{
    ExampleCommentSeed, ExampleCommunity, ExamplePostSeed, ExampleUserSeed, ExampleVoteSeed,
    RoleSeed, VoteDirectionSeed, VoteTargetSeed,
};
pub use validation::{USERNAME_MAX, USERNAME_MIN, is_valid_username};
