//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Error, NewPostDraft, Post, PostId, PostPatch};

use super::Created;

/// Confirmation message returned when a post is deleted.
pub const POST_DELETED_MESSAGE: &str = "Post and it comments deleted successfully";

/// Snapshot of a removed subject with a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted<T> {
    /// The subject as it was before deletion.
    pub subject: T,
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Domain use-case port for creating, updating, and deleting posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Create a post authored by `actor`.
    async fn create_post(&self, actor: &Actor, draft: NewPostDraft) -> Result<Created<Post>, Error>;

    /// Patch a post. Only its author may do so; `None` when it is missing.
    async fn update_post(
        &self,
        actor: &Actor,
        id: PostId,
        patch: PostPatch,
    ) -> Result<Option<Post>, Error>;

    /// Delete a post and everything hanging off it. Authors and superusers
    /// may do so; `None` when it is missing.
    async fn delete_post(&self, actor: &Actor, id: PostId) -> Result<Option<Deleted<Post>>, Error>;
}
