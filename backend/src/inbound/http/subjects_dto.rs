//! Wire shapes for posts, comments, feeds, and votes.
//!
//! Field names follow the public API (`post_id`, `up_votes`, ...), which
//! differs from the domain's vocabulary. Conversions live here so handlers
//! stay thin.

use chrono::{DateTime, Utc};
use pagination::{PageLinks, Paginated, Pagination};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::VoteResponse;
use crate::domain::{
    AuthorSummary, Comment, CommentView, Post, PostView, SubjectRef, UserId, VoteDirection,
};

/// Author embedded in feed items.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    /// Author's identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    /// Author's username.
    #[schema(example = "ada")]
    pub username: String,
}

impl From<AuthorSummary> for AuthorDto {
    fn from(value: AuthorSummary) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            username: value.username.to_string(),
        }
    }
}

/// A stored post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    /// Identifier.
    #[schema(example = 4)]
    pub post_id: i64,
    /// Author's identifier.
    pub user_id: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Up votes.
    pub up_votes: u32,
    /// Down votes.
    pub down_votes: u32,
    /// `up_votes - down_votes`.
    pub total_votes: i64,
    /// Idempotency token the post was created with.
    pub temp_id: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(value: Post) -> Self {
        Self {
            post_id: value.id.get(),
            user_id: value.author_id.to_string(),
            title: value.title,
            content: value.content,
            up_votes: value.tally.up,
            down_votes: value.tally.down,
            total_votes: value.tally.total(),
            temp_id: value.client_token.into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// A stored comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    /// Identifier.
    #[schema(example = 9)]
    pub comment_id: i64,
    /// Parent post.
    pub post_id: i64,
    /// Author's identifier.
    pub user_id: String,
    /// Body text.
    pub content: String,
    /// Up votes.
    pub up_votes: u32,
    /// Down votes.
    pub down_votes: u32,
    /// `up_votes - down_votes`.
    pub total_votes: i64,
    /// Idempotency token the comment was created with.
    pub temp_id: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(value: Comment) -> Self {
        Self {
            comment_id: value.id.get(),
            post_id: value.post_id.get(),
            user_id: value.author_id.to_string(),
            content: value.content,
            up_votes: value.tally.up,
            down_votes: value.tally.down,
            total_votes: value.tally.total(),
            temp_id: value.client_token.into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn direction(vote: Option<VoteDirection>) -> Option<String> {
    vote.map(|v| v.as_str().to_owned())
}

/// A comment in a feed, annotated for the requesting voter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentFeedItem {
    /// The comment.
    #[serde(flatten)]
    pub comment: CommentDto,
    /// Its author.
    pub author: AuthorDto,
    /// The requesting voter's vote, `up` or `down`.
    #[schema(example = "up")]
    pub user_vote: Option<String>,
}

impl From<CommentView> for CommentFeedItem {
    fn from(value: CommentView) -> Self {
        Self {
            comment: value.comment.into(),
            author: value.author.into(),
            user_vote: direction(value.user_vote),
        }
    }
}

/// A post in a feed with its comments embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostFeedItem {
    /// The post.
    #[serde(flatten)]
    pub post: PostDto,
    /// Its author.
    pub author: AuthorDto,
    /// The requesting voter's vote, `up` or `down`.
    pub user_vote: Option<String>,
    /// Comments on the post, oldest first.
    pub comments: Vec<CommentFeedItem>,
}

impl From<PostView> for PostFeedItem {
    fn from(value: PostView) -> Self {
        Self {
            post: value.post.into(),
            author: value.author.into(),
            user_vote: direction(value.user_vote),
            comments: value.comments.into_iter().map(Into::into).collect(),
        }
    }
}

/// One page of a feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedPage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Where the page sits in the listing.
    #[schema(value_type = crate::inbound::http::schemas::PaginationSchema)]
    pub pagination: Pagination,
    /// Navigation links.
    #[schema(value_type = crate::inbound::http::schemas::PageLinksSchema)]
    pub links: PageLinks,
    /// Voter whose votes annotate the items, when logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl<T> FeedPage<T> {
    /// Convert a domain page, building links relative to `base`.
    pub fn from_page<D>(page: Paginated<D>, base: &url::Url, voter: Option<&UserId>) -> Self
    where
        D: Into<T>,
    {
        let Paginated { items, pagination } = page;
        Self {
            items: items.into_iter().map(Into::into).collect(),
            links: PageLinks::build(base, &pagination),
            pagination,
            user_id: voter.map(ToString::to_string),
        }
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Title.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
    /// Client-generated idempotency token.
    pub temp_id: Option<String>,
}

/// Body of `POST /posts/{post_id}/comments`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    /// Body text.
    pub content: Option<String>,
    /// Client-generated idempotency token.
    pub temp_id: Option<String>,
}

/// Body of `PUT /posts/{post_id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement body.
    pub content: Option<String>,
}

/// Body of `PUT /comments/{comment_id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    /// Replacement body.
    pub content: Option<String>,
}

/// Response to a post creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostCreatedResponse {
    /// Confirmation.
    #[schema(example = "Post Created Successfully")]
    pub message: String,
    /// The stored post.
    pub post: PostDto,
}

/// Response to a comment creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentCreatedResponse {
    /// Confirmation.
    #[schema(example = "Comment Created Successfully")]
    pub message: String,
    /// The stored comment.
    pub comment: CommentDto,
}

/// Response to a post deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDeletedResponse {
    /// Confirmation.
    #[schema(example = "Post and it comments deleted successfully")]
    pub message: String,
    /// Identifier of the removed post.
    pub post_id: i64,
    /// The post as it was.
    pub post: PostDto,
}

/// Response to a comment deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDeletedResponse {
    /// Confirmation.
    #[schema(example = "Comment deleted successfully")]
    pub message: String,
    /// Identifier of the removed comment.
    pub comment_id: i64,
    /// The comment as it was.
    pub comment: CommentDto,
}

/// Body of the vote endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoteBody {
    /// `up` or `down`.
    #[schema(example = "up")]
    pub vote: Option<String>,
}

/// Counters after a vote.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteResultDto {
    /// Voted post, for post votes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    /// Voted comment, for comment votes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<i64>,
    /// Up votes.
    pub up_votes: u32,
    /// Down votes.
    pub down_votes: u32,
    /// `up_votes - down_votes`.
    pub total_votes: i64,
    /// The voter's vote after this request; absent after a toggle-off.
    pub user_vote: Option<String>,
}

impl From<VoteResponse> for VoteResultDto {
    fn from(value: VoteResponse) -> Self {
        let (post_id, comment_id) = match value.subject {
            SubjectRef::Post(id) => (Some(id.get()), None),
            SubjectRef::Comment(id) => (None, Some(id.get())),
        };
        Self {
            post_id,
            comment_id,
            up_votes: value.tally.up,
            down_votes: value.tally.down,
            total_votes: value.tally.total(),
            user_vote: direction(value.user_vote),
        }
    }
}
