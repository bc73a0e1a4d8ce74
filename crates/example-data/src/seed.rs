//! Generated community seed types.
//!
//! These types are independent of backend domain types. Posts and comments
//! are addressed by their position in the generated vectors so the backend
//! can assign database identifiers when it persists them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role for a generated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSeed {
    /// Ordinary member.
    #[default]
    Regular,
    /// Member allowed to moderate other members' content.
    Superuser,
}

/// Direction of a generated vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirectionSeed {
    /// Up vote.
    Up,
    /// Down vote.
    Down,
}

/// A generated example user.
///
/// # Example
///
/// ```
/// use example_data::{ExampleUserSeed, RoleSeed};
/// use uuid::Uuid;
///
/// let user = ExampleUserSeed {
///     id: Uuid::nil(),
///     username: "ada_lovelace".to_owned(),
///     role: RoleSeed::Regular,
/// };
/// assert_eq!(user.username, "ada_lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleUserSeed {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Unique username.
    pub username: String,
    /// Account role.
    pub role: RoleSeed,
}

/// A generated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePostSeed {
    /// Author's user identifier.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Client token used for idempotent creation.
    pub client_token: Uuid,
    /// How long before the seeding instant the post was written.
    pub age_minutes: u32,
    /// Number of up votes in the generated ledger.
    pub up_votes: u32,
    /// Number of down votes in the generated ledger.
    pub down_votes: u32,
}

/// A generated comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleCommentSeed {
    /// Index of the parent post in [`ExampleCommunity::posts`].
    pub post_index: usize,
    /// Author's user identifier.
    pub author_id: Uuid,
    /// Comment body.
    pub content: String,
    /// Client token used for idempotent creation.
    pub client_token: Uuid,
    /// How long before the seeding instant the comment was written.
    pub age_minutes: u32,
    /// Number of up votes in the generated ledger.
    pub up_votes: u32,
    /// Number of down votes in the generated ledger.
    pub down_votes: u32,
}

/// The subject a generated vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "index")]
pub enum VoteTargetSeed {
    /// Index into [`ExampleCommunity::posts`].
    Post(usize),
    /// Index into [`ExampleCommunity::comments`].
    Comment(usize),
}

/// A generated ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleVoteSeed {
    /// Voted subject.
    pub target: VoteTargetSeed,
    /// Voter's user identifier.
    pub voter_id: Uuid,
    /// Vote direction.
    pub direction: VoteDirectionSeed,
}

/// A complete generated community.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleCommunity {
    /// Generated users; superusers come first.
    pub users: Vec<ExampleUserSeed>,
    /// Generated posts.
    pub posts: Vec<ExamplePostSeed>,
    /// Generated comments.
    pub comments: Vec<ExampleCommentSeed>,
    /// Generated vote ledger, at most one entry per subject and voter.
    pub votes: Vec<ExampleVoteSeed>,
}
