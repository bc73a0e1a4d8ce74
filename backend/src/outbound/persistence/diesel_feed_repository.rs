//! PostgreSQL-backed feed adapter.
//!
//! Listings inner-join the author and left-join the ledger row of the
//! requesting voter, so `user_vote` arrives with the page in one query.
//! Without a voter the join matches nothing and every `user_vote` is null.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FeedRepository, FeedRepositoryError};
use crate::domain::{
    CommentView, ListingWindow, PostId, PostView, SortField, SortOrder, UserId, VoteDirection,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AuthorRow, CommentRow, PostRow, parse_direction};
use super::pool::{DbPool, PoolError};
use super::schema::{comment_votes, comments, post_votes, posts, users};

/// Diesel-backed implementation of the feed repository.
#[derive(Clone)]
pub struct DieselFeedRepository {
    pool: DbPool,
}

impl DieselFeedRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedRepositoryError {
    map_basic_pool_error(error, FeedRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FeedRepositoryError {
    map_basic_diesel_error(
        error,
        FeedRepositoryError::query,
        FeedRepositoryError::connection,
    )
}

fn window_bounds(window: &ListingWindow) -> Result<(i64, i64), FeedRepositoryError> {
    let offset = i64::try_from(window.offset)
        .map_err(|_| FeedRepositoryError::query("listing offset exceeds i64 range"))?;
    Ok((offset, i64::from(window.limit)))
}

/// Ledger filter for the join: the voter's id, or nothing at all.
fn voter_ids(voter: Option<&UserId>) -> Vec<Uuid> {
    voter.map(|id| *id.as_uuid()).into_iter().collect()
}

/// Orders a boxed query by `$column`, breaking ties by `$tie` in the same
/// direction.
macro_rules! order_by_field {
    ($query:expr, $order:expr, $column:expr, $tie:expr) => {
        match $order {
            SortOrder::Asc => $query.order_by(($column.asc(), $tie.asc())),
            SortOrder::Desc => $query.order_by(($column.desc(), $tie.desc())),
        }
    };
}

fn user_vote(raw: Option<String>) -> Result<Option<VoteDirection>, FeedRepositoryError> {
    raw.as_deref()
        .map(parse_direction)
        .transpose()
        .map_err(FeedRepositoryError::query)
}

type PostListingRow = (PostRow, AuthorRow, Option<String>);
type CommentListingRow = (CommentRow, AuthorRow, Option<String>);

fn post_view((row, author, vote): PostListingRow) -> Result<PostView, FeedRepositoryError> {
    Ok(PostView {
        post: row.into_domain().map_err(FeedRepositoryError::query)?,
        author: author.into_domain().map_err(FeedRepositoryError::query)?,
        user_vote: user_vote(vote)?,
        comments: Vec::new(),
    })
}

fn comment_view(
    (row, author, vote): CommentListingRow,
) -> Result<CommentView, FeedRepositoryError> {
    Ok(CommentView {
        comment: row.into_domain().map_err(FeedRepositoryError::query)?,
        author: author.into_domain().map_err(FeedRepositoryError::query)?,
        user_vote: user_vote(vote)?,
    })
}

/// Comments joined with their author and the voter's ledger row.
macro_rules! comment_listing {
    ($voters:expr) => {
        comments::table
            .inner_join(users::table)
            .left_join(
                comment_votes::table.on(comment_votes::comment_id
                    .eq(comments::id)
                    .and(comment_votes::user_id.eq_any($voters))),
            )
            .select((
                CommentRow::as_select(),
                AuthorRow::as_select(),
                comment_votes::direction.nullable(),
            ))
    };
}

#[async_trait]
impl FeedRepository for DieselFeedRepository {
    async fn list_posts(&self, window: &ListingWindow) -> Result<Vec<PostView>, FeedRepositoryError> {
        let (offset, limit) = window_bounds(window)?;
        let voters = voter_ids(window.voter.as_ref());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = posts::table
            .inner_join(users::table)
            .left_join(
                post_votes::table.on(post_votes::post_id
                    .eq(posts::id)
                    .and(post_votes::user_id.eq_any(voters))),
            )
            .select((
                PostRow::as_select(),
                AuthorRow::as_select(),
                post_votes::direction.nullable(),
            ))
            .into_boxed();
        let query = match window.sort {
            SortField::UserId => order_by_field!(query, window.order, posts::author_id, posts::id),
            SortField::Title => order_by_field!(query, window.order, posts::title, posts::id),
            SortField::Content => order_by_field!(query, window.order, posts::content, posts::id),
            SortField::CreatedAt => {
                order_by_field!(query, window.order, posts::created_at, posts::id)
            }
            SortField::UpdatedAt => {
                order_by_field!(query, window.order, posts::updated_at, posts::id)
            }
            SortField::UpVotes => order_by_field!(query, window.order, posts::up_votes, posts::id),
            SortField::DownVotes => {
                order_by_field!(query, window.order, posts::down_votes, posts::id)
            }
            SortField::Id | SortField::TotalVotes | SortField::UserVote => {
                order_by_field!(query, window.order, posts::id, posts::id)
            }
        };
        query
            .offset(offset)
            .limit(limit)
            .load::<PostListingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(post_view)
            .collect()
    }

    async fn count_posts(&self) -> Result<u64, FeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total = posts::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| FeedRepositoryError::query("negative post count"))
    }

    async fn comments_for_posts(
        &self,
        posts: &[PostId],
        voter: Option<UserId>,
    ) -> Result<Vec<CommentView>, FeedRepositoryError> {
        let ids: Vec<i64> = posts.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comment_listing!(voter_ids(voter.as_ref()))
            .filter(comments::post_id.eq_any(ids))
            .order_by((comments::created_at.asc(), comments::id.asc()))
            .load::<CommentListingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(comment_view)
            .collect()
    }

    async fn list_comments(
        &self,
        post: PostId,
        window: &ListingWindow,
    ) -> Result<Vec<CommentView>, FeedRepositoryError> {
        let (offset, limit) = window_bounds(window)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = comment_listing!(voter_ids(window.voter.as_ref()))
            .filter(comments::post_id.eq(post.get()))
            .into_boxed();
        let query = match window.sort {
            SortField::UserId => {
                order_by_field!(query, window.order, comments::author_id, comments::id)
            }
            SortField::Content => {
                order_by_field!(query, window.order, comments::content, comments::id)
            }
            SortField::CreatedAt => {
                order_by_field!(query, window.order, comments::created_at, comments::id)
            }
            SortField::UpdatedAt => {
                order_by_field!(query, window.order, comments::updated_at, comments::id)
            }
            SortField::UpVotes => {
                order_by_field!(query, window.order, comments::up_votes, comments::id)
            }
            SortField::DownVotes => {
                order_by_field!(query, window.order, comments::down_votes, comments::id)
            }
            SortField::Id | SortField::Title | SortField::TotalVotes | SortField::UserVote => {
                order_by_field!(query, window.order, comments::id, comments::id)
            }
        };
        query
            .offset(offset)
            .limit(limit)
            .load::<CommentListingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(comment_view)
            .collect()
    }

    async fn count_comments(&self, post: PostId) -> Result<u64, FeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total = comments::table
            .filter(comments::post_id.eq(post.get()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| FeedRepositoryError::query("negative comment count"))
    }

    async fn post_exists(&self, post: PostId) -> Result<bool, FeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(posts::table.find(post.get())))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some("up"), Some(VoteDirection::Up))]
    #[case(Some("down"), Some(VoteDirection::Down))]
    fn joined_ledger_column_becomes_user_vote(
        #[case] raw: Option<&str>,
        #[case] expected: Option<VoteDirection>,
    ) {
        assert_eq!(
            user_vote(raw.map(str::to_owned)).expect("valid column"),
            expected
        );
    }

    #[rstest]
    fn corrupt_ledger_column_is_a_query_error() {
        let error = user_vote(Some("maybe".to_owned())).expect_err("corrupt");
        assert!(matches!(error, FeedRepositoryError::Query { .. }));
    }

    #[rstest]
    fn anonymous_readers_join_no_ledger_rows() {
        assert!(voter_ids(None).is_empty());
        let voter = UserId::random();
        assert_eq!(voter_ids(Some(&voter)), vec![*voter.as_uuid()]);
    }

    #[rstest]
    fn window_bounds_follow_the_listing() {
        let window = ListingWindow {
            sort: SortField::Id,
            order: SortOrder::Asc,
            offset: 40,
            limit: 20,
            voter: None,
        };
        assert_eq!(window_bounds(&window).expect("bounds"), (40, 20));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("refused"));
        assert_eq!(error, FeedRepositoryError::connection("refused"));
    }
}
