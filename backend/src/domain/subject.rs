//! Posts, comments, and the read models the feed returns.
//!
//! Posts and comments are both *subjects*: votable records owned by their
//! author and carrying a denormalised [`VoteTally`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Error, UserId, Username, VoteDirection, VoteTally};

/// Longest accepted post title, in characters.
pub const TITLE_MAX: usize = 255;
/// Longest accepted client token, in characters.
pub const CLIENT_TOKEN_MAX: usize = 128;

macro_rules! subject_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Validate a positive database identifier.
            pub fn new(raw: i64) -> Result<Self, Error> {
                if raw < 1 {
                    return Err(Error::invalid_request(concat!($label, " must be positive"))
                        .with_details(json!({ "field": $label, "value": raw })));
                }
                Ok(Self(raw))
            }

            /// Raw database identifier.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

subject_id!(
    /// Database identifier of a post.
    PostId,
    "post_id"
);
subject_id!(
    /// Database identifier of a comment.
    CommentId,
    "comment_id"
);

/// Kind of votable subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// A top-level post.
    Post,
    /// A comment on a post.
    Comment,
}

impl SubjectKind {
    /// Human-readable noun, capitalised for messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Comment => "Comment",
        }
    }
}

/// Reference to a single votable subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectRef {
    /// A post.
    Post(PostId),
    /// A comment.
    Comment(CommentId),
}

impl SubjectRef {
    /// Kind of the referenced subject.
    pub fn kind(self) -> SubjectKind {
        match self {
            Self::Post(_) => SubjectKind::Post,
            Self::Comment(_) => SubjectKind::Comment,
        }
    }

    /// Raw identifier of the referenced subject.
    pub fn raw_id(self) -> i64 {
        match self {
            Self::Post(id) => id.get(),
            Self::Comment(id) => id.get(),
        }
    }

    /// The `NotFound` error reported for this subject.
    pub fn not_found(self) -> Error {
        let field = match self {
            Self::Post(_) => "postId",
            Self::Comment(_) => "commentId",
        };
        Error::not_found(format!("{self} not found"))
            .with_details(json!({ field: self.raw_id() }))
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().label(), self.raw_id())
    }
}

/// Client-supplied idempotency token (`temp_id`) for creations.
///
/// Repeating a create with the same author and token returns the stored
/// subject instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientToken(String);

impl ClientToken {
    /// Validate a token: non-blank and at most [`CLIENT_TOKEN_MAX`] characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(Error::invalid_request("temp_id is required")
                .with_details(json!({ "field": "temp_id", "code": "missing_field" })));
        }
        if raw.chars().count() > CLIENT_TOKEN_MAX {
            return Err(Error::invalid_request(format!(
                "temp_id must be at most {CLIENT_TOKEN_MAX} characters"
            ))
            .with_details(json!({ "field": "temp_id", "code": "too_long" })));
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ClientToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ClientToken> for String {
    fn from(value: ClientToken) -> Self {
        value.0
    }
}

impl TryFrom<String> for ClientToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Identifier.
    pub id: PostId,
    /// Author's identifier.
    pub author_id: UserId,
    /// Title, at most [`TITLE_MAX`] characters.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Denormalised vote counters.
    pub tally: VoteTally,
    /// Idempotency token the post was created with.
    pub client_token: ClientToken,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Identifier.
    pub id: CommentId,
    /// Parent post.
    pub post_id: PostId,
    /// Author's identifier.
    pub author_id: UserId,
    /// Body text.
    pub content: String,
    /// Denormalised vote counters.
    pub tally: VoteTally,
    /// Idempotency token the comment was created with.
    pub client_token: ClientToken,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// Author details embedded in feed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    /// Author's identifier.
    pub user_id: UserId,
    /// Author's username.
    pub username: Username,
}

/// A comment as shown in a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// The comment record.
    pub comment: Comment,
    /// Its author.
    pub author: AuthorSummary,
    /// The requesting voter's ledger entry, if a voter was supplied.
    pub user_vote: Option<VoteDirection>,
}

/// A post as shown in a feed, with its comments embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    /// The post record.
    pub post: Post,
    /// Its author.
    pub author: AuthorSummary,
    /// The requesting voter's ledger entry, if a voter was supplied.
    pub user_vote: Option<VoteDirection>,
    /// Comments on the post, oldest first.
    pub comments: Vec<CommentView>,
}

/// Validated input for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostDraft {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Idempotency token.
    pub client_token: ClientToken,
}

impl NewPostDraft {
    /// Validate a post draft.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::{ClientToken, NewPostDraft};
    ///
    /// let token = ClientToken::new("tmp-1").expect("token");
    /// assert!(NewPostDraft::new("Hello", "World", token.clone()).is_ok());
    /// assert!(NewPostDraft::new("  ", "World", token).is_err());
    /// ```
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        client_token: ClientToken,
    ) -> Result<Self, Error> {
        Ok(Self {
            title: validate_title(title.into())?,
            content: validate_content(content.into())?,
            client_token,
        })
    }
}

/// Validated input for a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommentDraft {
    /// Body text.
    pub content: String,
    /// Idempotency token.
    pub client_token: ClientToken,
}

impl NewCommentDraft {
    /// Validate a comment draft.
    pub fn new(content: impl Into<String>, client_token: ClientToken) -> Result<Self, Error> {
        Ok(Self {
            content: validate_content(content.into())?,
            client_token,
        })
    }
}

/// Partial update of a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement body.
    pub content: Option<String>,
}

impl PostPatch {
    /// Validate the supplied fields; an empty patch is rejected.
    pub fn new(title: Option<String>, content: Option<String>) -> Result<Self, Error> {
        if title.is_none() && content.is_none() {
            return Err(no_input());
        }
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            content: content.map(validate_content).transpose()?,
        })
    }

    /// Apply the patch to a post, stamping `now` as the modification time.
    pub fn apply_to(&self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        post.updated_at = now;
    }
}

/// Partial update of a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    /// Replacement body.
    pub content: Option<String>,
}

impl CommentPatch {
    /// Validate the supplied fields; an empty patch is rejected.
    pub fn new(content: Option<String>) -> Result<Self, Error> {
        let Some(content) = content else {
            return Err(no_input());
        };
        Ok(Self {
            content: Some(validate_content(content)?),
        })
    }

    /// Apply the patch to a comment, stamping `now` as the modification time.
    pub fn apply_to(&self, comment: &mut Comment, now: DateTime<Utc>) {
        if let Some(content) = &self.content {
            comment.content.clone_from(content);
        }
        comment.updated_at = now;
    }
}

fn no_input() -> Error {
    Error::invalid_request("No input data provided")
}

fn validate_title(title: String) -> Result<String, Error> {
    if title.trim().is_empty() {
        return Err(missing("title"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(
            Error::invalid_request(format!("title must be at most {TITLE_MAX} characters"))
                .with_details(json!({ "field": "title", "code": "too_long" })),
        );
    }
    Ok(title)
}

fn validate_content(content: String) -> Result<String, Error> {
    if content.trim().is_empty() {
        return Err(missing("content"));
    }
    Ok(content)
}

fn missing(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}
