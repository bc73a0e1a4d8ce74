//! PostgreSQL-backed example data seeding adapter.
//!
//! A seed run is applied in one transaction: the run record is inserted
//! first and, when it is new, the generated users, posts, comments, and
//! ledger rows follow. Generated rows address each other by position, so
//! posts and comments are inserted one at a time to learn their identifiers.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::info;

use crate::domain::ports::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    SeedComment, SeedPost, SeedVote, SeedVoteTarget, SeedingResult,
};
use crate::domain::VoteTally;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    NewCommentRow, NewCommentVoteRow, NewExampleDataRunRow, NewPostRow, NewPostVoteRow,
    NewUserRow, counter,
};
use super::pool::{DbPool, PoolError};
use super::schema::{comment_votes, comments, example_data_runs, post_votes, posts, users};

/// Diesel-backed implementation of the example data seeding repository.
#[derive(Clone)]
pub struct DieselExampleDataSeedRepository {
    pool: DbPool,
}

impl DieselExampleDataSeedRepository {
    /// Create a new seeding repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use social_backend::outbound::persistence::{
    ///     DbPool, DieselExampleDataSeedRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselExampleDataSeedRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExampleDataSeedRepositoryError {
    map_basic_pool_error(error, ExampleDataSeedRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExampleDataSeedRepositoryError {
    map_basic_diesel_error(
        error,
        ExampleDataSeedRepositoryError::query,
        ExampleDataSeedRepositoryError::connection,
    )
}

impl From<diesel::result::Error> for ExampleDataSeedRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        map_diesel_error(error)
    }
}

fn seeded_counters(tally: VoteTally) -> Result<(i32, i32), ExampleDataSeedRepositoryError> {
    let up = counter(tally.up).map_err(ExampleDataSeedRepositoryError::query)?;
    let down = counter(tally.down).map_err(ExampleDataSeedRepositoryError::query)?;
    Ok((up, down))
}

fn resolve(ids: &[i64], index: usize, kind: &str) -> Result<i64, ExampleDataSeedRepositoryError> {
    ids.get(index).copied().ok_or_else(|| {
        ExampleDataSeedRepositoryError::query(format!("seed references missing {kind} {index}"))
    })
}

async fn insert_posts(
    conn: &mut AsyncPgConnection,
    seeded: &[SeedPost],
) -> Result<Vec<i64>, ExampleDataSeedRepositoryError> {
    let mut ids = Vec::with_capacity(seeded.len());
    for post in seeded {
        let (up_votes, down_votes) = seeded_counters(post.tally)?;
        let id = diesel::insert_into(posts::table)
            .values(NewPostRow {
                author_id: *post.author_id.as_uuid(),
                title: &post.draft.title,
                content: &post.draft.content,
                up_votes,
                down_votes,
                client_token: post.draft.client_token.as_ref(),
                created_at: post.created_at,
                updated_at: post.created_at,
            })
            .returning(posts::id)
            .get_result::<i64>(conn)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

async fn insert_comments(
    conn: &mut AsyncPgConnection,
    seeded: &[SeedComment],
    post_ids: &[i64],
) -> Result<Vec<i64>, ExampleDataSeedRepositoryError> {
    let mut ids = Vec::with_capacity(seeded.len());
    for comment in seeded {
        let (up_votes, down_votes) = seeded_counters(comment.tally)?;
        let id = diesel::insert_into(comments::table)
            .values(NewCommentRow {
                post_id: resolve(post_ids, comment.post_index, "post")?,
                author_id: *comment.author_id.as_uuid(),
                content: &comment.draft.content,
                up_votes,
                down_votes,
                client_token: comment.draft.client_token.as_ref(),
                created_at: comment.created_at,
                updated_at: comment.created_at,
            })
            .returning(comments::id)
            .get_result::<i64>(conn)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

type LedgerRows = (Vec<NewPostVoteRow>, Vec<NewCommentVoteRow>);

fn ledger_rows(
    votes: &[SeedVote],
    post_ids: &[i64],
    comment_ids: &[i64],
) -> Result<LedgerRows, ExampleDataSeedRepositoryError> {
    let mut post_rows = Vec::new();
    let mut comment_rows = Vec::new();
    for vote in votes {
        let user_id = *vote.voter_id.as_uuid();
        let direction = vote.direction.as_str();
        match vote.target {
            SeedVoteTarget::Post(index) => post_rows.push(NewPostVoteRow {
                post_id: resolve(post_ids, index, "post")?,
                user_id,
                direction,
            }),
            SeedVoteTarget::Comment(index) => comment_rows.push(NewCommentVoteRow {
                comment_id: resolve(comment_ids, index, "comment")?,
                user_id,
                direction,
            }),
        }
    }
    Ok((post_rows, comment_rows))
}

#[async_trait]
impl ExampleDataSeedRepository for DieselExampleDataSeedRepository {
    async fn seed_example_data(
        &self,
        request: ExampleDataSeedRequest,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError> {
        let ExampleDataSeedRequest {
            seed_key,
            user_count,
            seed,
            users: seeded_users,
            posts: seeded_posts,
            comments: seeded_comments,
            votes,
        } = request;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<SeedingResult, ExampleDataSeedRepositoryError, _>(|conn| {
            async move {
                let rows_affected = diesel::insert_into(example_data_runs::table)
                    .values(NewExampleDataRunRow {
                        seed_key: seed_key.as_str(),
                        user_count,
                        seed,
                    })
                    .on_conflict(example_data_runs::seed_key)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if rows_affected == 0 {
                    return Ok(SeedingResult::AlreadySeeded);
                }

                let user_rows: Vec<NewUserRow<'_>> =
                    seeded_users.iter().map(NewUserRow::from).collect();
                if !user_rows.is_empty() {
                    diesel::insert_into(users::table)
                        .values(&user_rows)
                        .on_conflict(users::id)
                        .do_update()
                        .set((
                            users::username.eq(excluded(users::username)),
                            users::role.eq(excluded(users::role)),
                        ))
                        .execute(conn)
                        .await?;
                }

                let post_ids = insert_posts(conn, &seeded_posts).await?;
                let comment_ids = insert_comments(conn, &seeded_comments, &post_ids).await?;
                let (post_ledger, comment_ledger) = ledger_rows(&votes, &post_ids, &comment_ids)?;
                if !post_ledger.is_empty() {
                    diesel::insert_into(post_votes::table)
                        .values(&post_ledger)
                        .execute(conn)
                        .await?;
                }
                if !comment_ledger.is_empty() {
                    diesel::insert_into(comment_votes::table)
                        .values(&comment_ledger)
                        .execute(conn)
                        .await?;
                }

                info!(
                    seed_key = %seed_key,
                    users = user_rows.len(),
                    posts = post_ids.len(),
                    comments = comment_ids.len(),
                    votes = votes.len(),
                    "example community inserted"
                );
                Ok(SeedingResult::Applied)
            }
            .scope_boxed()
        })
        .await
    }
}
