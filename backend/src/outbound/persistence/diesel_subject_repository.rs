//! PostgreSQL-backed post and comment mutations.
//!
//! Creation is idempotent on `(author_id, client_token)`: the insert uses
//! `ON CONFLICT DO NOTHING` and, when nothing was inserted, the stored row is
//! read back and reported as a replay. Deletes rely on `ON DELETE CASCADE` to
//! remove comments and ledger rows in the same statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    Created, NewCommentRecord, NewPostRecord, SubjectRepository, SubjectRepositoryError,
};
use crate::domain::{Comment, CommentId, CommentPatch, Post, PostId, PostPatch};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    CommentChanges, CommentRow, NewCommentRow, NewPostRow, PostChanges, PostRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, posts};

/// Constraint guarding a comment's parent post.
const COMMENT_POST_FOREIGN_KEY: &str = "comments_post_id_fkey";

/// Diesel-backed implementation of the subject repository.
#[derive(Clone)]
pub struct DieselSubjectRepository {
    pool: DbPool,
}

impl DieselSubjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubjectRepositoryError {
    map_basic_pool_error(error, SubjectRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> SubjectRepositoryError {
    map_basic_diesel_error(
        error,
        SubjectRepositoryError::query,
        SubjectRepositoryError::connection,
    )
}

fn violates_parent_post(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(_, info) if is_foreign_key_violation(error) => {
            info.constraint_name() == Some(COMMENT_POST_FOREIGN_KEY)
        }
        _ => false,
    }
}

fn map_comment_insert_error(error: DieselError, post_id: PostId) -> SubjectRepositoryError {
    if violates_parent_post(&error) {
        return SubjectRepositoryError::post_not_found(post_id.get());
    }
    map_diesel_error(error)
}

fn post_from_row(row: PostRow) -> Result<Post, SubjectRepositoryError> {
    row.into_domain().map_err(SubjectRepositoryError::query)
}

fn comment_from_row(row: CommentRow) -> Result<Comment, SubjectRepositoryError> {
    row.into_domain().map_err(SubjectRepositoryError::query)
}

#[async_trait]
impl SubjectRepository for DieselSubjectRepository {
    async fn create_post(
        &self,
        record: NewPostRecord,
    ) -> Result<Created<Post>, SubjectRepositoryError> {
        let author_id = *record.author_id.as_uuid();
        let token = record.draft.client_token.as_ref();
        let row = NewPostRow {
            author_id,
            title: &record.draft.title,
            content: &record.draft.content,
            up_votes: 0,
            down_votes: 0,
            client_token: token,
            created_at: record.now,
            updated_at: record.now,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(posts::table)
            .values(&row)
            .on_conflict((posts::author_id, posts::client_token))
            .do_nothing()
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(row) = inserted {
            return Ok(Created {
                subject: post_from_row(row)?,
                replayed: false,
            });
        }

        debug!(client_token = token, "post creation replayed");
        let stored = posts::table
            .filter(posts::author_id.eq(author_id))
            .filter(posts::client_token.eq(token))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Created {
            subject: post_from_row(stored)?,
            replayed: true,
        })
    }

    async fn create_comment(
        &self,
        record: NewCommentRecord,
    ) -> Result<Created<Comment>, SubjectRepositoryError> {
        let author_id = *record.author_id.as_uuid();
        let token = record.draft.client_token.as_ref();
        let row = NewCommentRow {
            post_id: record.post_id.get(),
            author_id,
            content: &record.draft.content,
            up_votes: 0,
            down_votes: 0,
            client_token: token,
            created_at: record.now,
            updated_at: record.now,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(comments::table)
            .values(&row)
            .on_conflict((comments::author_id, comments::client_token))
            .do_nothing()
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(|error| map_comment_insert_error(error, record.post_id))?;
        if let Some(row) = inserted {
            return Ok(Created {
                subject: comment_from_row(row)?,
                replayed: false,
            });
        }

        debug!(client_token = token, "comment creation replayed");
        let stored = comments::table
            .filter(comments::author_id.eq(author_id))
            .filter(comments::client_token.eq(token))
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Created {
            subject: comment_from_row(stored)?,
            replayed: true,
        })
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(post_from_row)
            .transpose()
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(comment_from_row)
            .transpose()
    }

    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, SubjectRepositoryError> {
        let changes = PostChanges {
            title: patch.title.as_deref(),
            content: patch.content.as_deref(),
            updated_at: now,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(posts::table.find(id.get()))
            .set(&changes)
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(post_from_row)
            .transpose()
    }

    async fn update_comment(
        &self,
        id: CommentId,
        patch: &CommentPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, SubjectRepositoryError> {
        let changes = CommentChanges {
            content: patch.content.as_deref(),
            updated_at: now,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(comments::table.find(id.get()))
            .set(&changes)
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(comment_from_row)
            .transpose()
    }

    async fn delete_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(posts::table.find(id.get()))
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(post_from_row)
            .transpose()
    }

    async fn delete_comment(
        &self,
        id: CommentId,
    ) -> Result<Option<Comment>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(comments::table.find(id.get()))
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(comment_from_row)
            .transpose()
    }
}
