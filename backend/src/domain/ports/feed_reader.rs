//! Driving port for paginated feeds.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{CommentView, Error, FeedQuery, PostId, PostView};

/// Domain use-case port for reading feeds.
///
/// Queries arrive validated, so an invalid sort or order never reaches
/// storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedReader: Send + Sync {
    /// One page of posts, each embedding its comments.
    async fn list_posts(&self, query: FeedQuery) -> Result<Paginated<PostView>, Error>;

    /// One page of a post's comments; `NotFound` when the post is missing.
    async fn list_comments(
        &self,
        post: PostId,
        query: FeedQuery,
    ) -> Result<Paginated<CommentView>, Error>;
}
