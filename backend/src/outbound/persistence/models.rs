//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AuthorSummary, ClientToken, Comment, CommentId, Post, PostId, Role, User, UserId, Username,
    VoteDirection, VoteTally,
};

use super::schema::{comment_votes, comments, example_data_runs, post_votes, posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        let role = Role::from_str(&self.role).map_err(|err| err.to_string())?;
        Ok(
            User::new(UserId::from_uuid(self.id), username, role, self.created_at)
                .with_timestamps(self.created_at, self.updated_at),
        )
    }
}

/// Author columns joined into feed rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
}

impl AuthorRow {
    pub(crate) fn into_domain(self) -> Result<AuthorSummary, String> {
        Ok(AuthorSummary {
            user_id: UserId::from_uuid(self.id),
            username: Username::new(self.username).map_err(|err| err.to_string())?,
        })
    }
}

/// Insertable struct for creating or refreshing user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            role: user.role().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

fn tally(up: i32, down: i32) -> Result<VoteTally, String> {
    let up = u32::try_from(up).map_err(|_| format!("negative up counter {up}"))?;
    let down = u32::try_from(down).map_err(|_| format!("negative down counter {down}"))?;
    Ok(VoteTally::new(up, down))
}

/// Converts a domain counter into its column value.
pub(crate) fn counter(value: u32) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("counter {value} exceeds column range"))
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub up_votes: i32,
    pub down_votes: i32,
    pub client_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    pub(crate) fn into_domain(self) -> Result<Post, String> {
        Ok(Post {
            id: PostId::new(self.id).map_err(|err| err.to_string())?,
            author_id: UserId::from_uuid(self.author_id),
            title: self.title,
            content: self.content,
            tally: tally(self.up_votes, self.down_votes)?,
            client_token: ClientToken::new(self.client_token).map_err(|err| err.to_string())?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for new posts, including seeded counters.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub author_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub up_votes: i32,
    pub down_votes: i32,
    pub client_token: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for post patches; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostChanges<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Uuid,
    pub content: String,
    pub up_votes: i32,
    pub down_votes: i32,
    pub client_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentRow {
    pub(crate) fn into_domain(self) -> Result<Comment, String> {
        Ok(Comment {
            id: CommentId::new(self.id).map_err(|err| err.to_string())?,
            post_id: PostId::new(self.post_id).map_err(|err| err.to_string())?,
            author_id: UserId::from_uuid(self.author_id),
            content: self.content,
            tally: tally(self.up_votes, self.down_votes)?,
            client_token: ClientToken::new(self.client_token).map_err(|err| err.to_string())?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for new comments, including seeded counters.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: Uuid,
    pub content: &'a str,
    pub up_votes: i32,
    pub down_votes: i32,
    pub client_token: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for comment patches.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = comments)]
pub(crate) struct CommentChanges<'a> {
    pub content: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable post ledger entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post_votes)]
pub(crate) struct NewPostVoteRow {
    pub post_id: i64,
    pub user_id: Uuid,
    pub direction: &'static str,
}

/// Insertable comment ledger entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comment_votes)]
pub(crate) struct NewCommentVoteRow {
    pub comment_id: i64,
    pub user_id: Uuid,
    pub direction: &'static str,
}

/// Parse a stored ledger direction.
pub(crate) fn parse_direction(raw: &str) -> Result<VoteDirection, String> {
    VoteDirection::from_str(raw).map_err(|err| err.to_string())
}

/// Insertable struct for recording seed runs.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = example_data_runs)]
pub(crate) struct NewExampleDataRunRow<'a> {
    pub seed_key: &'a str,
    pub user_count: i32,
    pub seed: i64,
}
