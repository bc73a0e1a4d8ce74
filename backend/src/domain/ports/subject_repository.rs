//! Port abstraction for creating, changing, and removing posts and comments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, CommentId, CommentPatch, NewCommentDraft, NewPostDraft, Post, PostId, PostPatch,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by subject repository adapters.
    pub enum SubjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subject repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subject repository query failed: {message}",
        /// The parent post of a new comment does not exist.
        PostNotFound { post_id: i64 } => "post {post_id} not found",
    }
}

/// A post ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostRecord {
    /// Author.
    pub author_id: UserId,
    /// Validated content.
    pub draft: NewPostDraft,
    /// Creation instant; also the initial modification instant.
    pub now: DateTime<Utc>,
}

/// A comment ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommentRecord {
    /// Parent post.
    pub post_id: PostId,
    /// Author.
    pub author_id: UserId,
    /// Validated content.
    pub draft: NewCommentDraft,
    /// Creation instant; also the initial modification instant.
    pub now: DateTime<Utc>,
}

/// Result of an idempotent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created<T> {
    /// The stored subject.
    pub subject: T,
    /// `true` when the author had already used the client token and the
    /// stored subject is returned unchanged.
    pub replayed: bool,
}

/// Port for subject mutations.
///
/// New subjects start with zero counters. Deleting a post removes its
/// comments and every ledger entry of the post and those comments within
/// the same transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Store a post, or return the one already stored for the author and token.
    async fn create_post(&self, record: NewPostRecord)
    -> Result<Created<Post>, SubjectRepositoryError>;

    /// Store a comment, or return the one already stored for the author and token.
    async fn create_comment(
        &self,
        record: NewCommentRecord,
    ) -> Result<Created<Comment>, SubjectRepositoryError>;

    /// Fetch a post.
    async fn find_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError>;

    /// Fetch a comment.
    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, SubjectRepositoryError>;

    /// Apply a patch; `None` when the post does not exist.
    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, SubjectRepositoryError>;

    /// Apply a patch; `None` when the comment does not exist.
    async fn update_comment(
        &self,
        id: CommentId,
        patch: &CommentPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, SubjectRepositoryError>;

    /// Delete a post with its comments and ledger; returns the removed post.
    async fn delete_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError>;

    /// Delete a comment with its ledger; returns the removed comment.
    async fn delete_comment(&self, id: CommentId)
    -> Result<Option<Comment>, SubjectRepositoryError>;
}
