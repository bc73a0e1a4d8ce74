//! Port abstraction for paginated feed reads.
//!
//! Reads are non-blocking relative to votes; counters may trail a concurrent
//! vote by one commit. When a voter is supplied, every item carries that
//! voter's ledger entry (or `None`) through an outer join, so items without a
//! vote are never dropped.

use async_trait::async_trait;

use crate::domain::{CommentView, ListingWindow, PostId, PostView, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by feed repository adapters.
    pub enum FeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feed repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "feed repository query failed: {message}",
    }
}

/// Port for reading posts and comments with author and vote annotations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// One window of posts, without their comments.
    async fn list_posts(&self, window: &ListingWindow) -> Result<Vec<PostView>, FeedRepositoryError>;

    /// Number of posts.
    async fn count_posts(&self) -> Result<u64, FeedRepositoryError>;

    /// Every comment of the given posts, ordered by creation time then id.
    async fn comments_for_posts(
        &self,
        posts: &[PostId],
        voter: Option<UserId>,
    ) -> Result<Vec<CommentView>, FeedRepositoryError>;

    /// One window of a post's comments.
    async fn list_comments(
        &self,
        post: PostId,
        window: &ListingWindow,
    ) -> Result<Vec<CommentView>, FeedRepositoryError>;

    /// Number of comments on a post.
    async fn count_comments(&self, post: PostId) -> Result<u64, FeedRepositoryError>;

    /// Whether the post exists.
    async fn post_exists(&self, post: PostId) -> Result<bool, FeedRepositoryError>;
}
