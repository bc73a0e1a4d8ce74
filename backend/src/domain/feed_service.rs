//! Feed reader service implementing [`FeedReader`].
//!
//! Fetches one storage window, reorders it in memory when the sort field is
//! computed, embeds comments into posts, and builds the pagination metadata.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Paginated, Pagination};

use crate::domain::ports::{FeedReader, FeedRepository, FeedRepositoryError};
use crate::domain::{CommentView, Error, FeedQuery, PostId, PostView, SubjectRef};

/// Feed service backed by a [`FeedRepository`].
#[derive(Clone)]
pub struct FeedService<R> {
    repository: Arc<R>,
}

impl<R> FeedService<R> {
    /// Create a new service with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_feed_error(error: FeedRepositoryError) -> Error {
    match error {
        FeedRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feed repository unavailable: {message}"))
        }
        FeedRepositoryError::Query { message } => {
            Error::internal(format!("feed repository error: {message}"))
        }
    }
}

fn paginate<T>(query: &FeedQuery, items: Vec<T>, total: Option<u64>) -> Paginated<T> {
    let pagination = Pagination::for_window(query.page, items.len());
    let pagination = match total {
        Some(total) => pagination.with_total(total),
        None => pagination,
    };
    Paginated::new(items, pagination)
}

impl<R> FeedService<R>
where
    R: FeedRepository,
{
    async fn embed_comments(&self, posts: &mut [PostView], query: &FeedQuery) -> Result<(), Error> {
        if posts.is_empty() {
            return Ok(());
        }
        let ids: Vec<PostId> = posts.iter().map(|view| view.post.id).collect();
        let comments = self
            .repository
            .comments_for_posts(&ids, query.voter.clone())
            .await
            .map_err(map_feed_error)?;

        let mut by_post: HashMap<PostId, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            by_post
                .entry(comment.comment.post_id)
                .or_default()
                .push(comment);
        }
        for view in posts.iter_mut() {
            view.comments = by_post.remove(&view.post.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl<R> FeedReader for FeedService<R>
where
    R: FeedRepository,
{
    async fn list_posts(&self, query: FeedQuery) -> Result<Paginated<PostView>, Error> {
        let window = query.window();
        let mut items = self
            .repository
            .list_posts(&window)
            .await
            .map_err(map_feed_error)?;
        query.sort_post_page(&mut items);
        self.embed_comments(&mut items, &query).await?;

        let total = if query.include_total {
            Some(self.repository.count_posts().await.map_err(map_feed_error)?)
        } else {
            None
        };
        Ok(paginate(&query, items, total))
    }

    async fn list_comments(
        &self,
        post: PostId,
        query: FeedQuery,
    ) -> Result<Paginated<CommentView>, Error> {
        let exists = self
            .repository
            .post_exists(post)
            .await
            .map_err(map_feed_error)?;
        if !exists {
            return Err(SubjectRef::Post(post).not_found());
        }

        let window = query.window();
        let mut items = self
            .repository
            .list_comments(post, &window)
            .await
            .map_err(map_feed_error)?;
        query.sort_comment_page(&mut items);

        let total = if query.include_total {
            Some(
                self.repository
                    .count_comments(post)
                    .await
                    .map_err(map_feed_error)?,
            )
        } else {
            None
        };
        Ok(paginate(&query, items, total))
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;
