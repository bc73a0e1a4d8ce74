//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Comment, CommentId, CommentPatch, Error, NewCommentDraft, PostId};

use super::{Created, Deleted};

/// Confirmation message returned when a comment is deleted.
pub const COMMENT_DELETED_MESSAGE: &str = "Comment deleted successfully";

/// Domain use-case port for creating, updating, and deleting comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Comment on a post; `NotFound` when the post is missing.
    async fn create_comment(
        &self,
        actor: &Actor,
        post: PostId,
        draft: NewCommentDraft,
    ) -> Result<Created<Comment>, Error>;

    /// Patch a comment. Only its author may do so; `None` when it is missing.
    async fn update_comment(
        &self,
        actor: &Actor,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, Error>;

    /// Delete a comment and its ledger. Authors and superusers may do so;
    /// `None` when it is missing.
    async fn delete_comment(
        &self,
        actor: &Actor,
        id: CommentId,
    ) -> Result<Option<Deleted<Comment>>, Error>;
}
