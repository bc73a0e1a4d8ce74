//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define the strongly typed vote, feed, and subject model the
//! adapters translate to and from. Types here know nothing about HTTP or
//! SQL; adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User / UserId / Username / Role / Actor: members and the caller.
//! - Post / Comment / SubjectRef and read models: votable subjects.
//! - VoteDirection / VoteTally / VoteTransition: the toggle state machine.
//! - FeedQuery / SortField / SortOrder / ListingWindow: validated feed reads.
//! - authorize_mutation / authorize_author: the ownership guard.
//! - Services implementing the driving ports.

pub mod authorization;
pub mod error;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod feed;
pub mod feed_service;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ports;
pub mod subject;
pub mod subject_service;
pub mod trace_id;
pub mod user;
pub mod users_service;
pub mod vote;
pub mod vote_service;

pub use self::authorization::{authorize_author, authorize_mutation};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
#[cfg(feature = "example-data")]
pub use self::example_data::{ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError};
pub use self::feed::{FeedQuery, ListingWindow, SortField, SortOrder};
pub use self::feed_service::FeedService;
pub use self::subject::{
    AuthorSummary, ClientToken, Comment, CommentId, CommentPatch, CommentView, NewCommentDraft,
    NewPostDraft, Post, PostId, PostPatch, PostView, SubjectKind, SubjectRef,
};
pub use self::subject_service::SubjectService;
pub use self::trace_id::TraceId;
pub use self::user::{Actor, Role, User, UserId, UserValidationError, Username};
pub use self::users_service::UsersService;
pub use self::vote::{VoteDirection, VoteTally, VoteTransition};
pub use self::vote_service::VoteService;

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use social_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
