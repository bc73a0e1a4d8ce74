//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage
//! and expose their own error enums. Driving ports (commands and queries)
//! are what inbound adapters call; they speak [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod comment_command;
mod example_data_seed_repository;
mod feed_reader;
mod feed_repository;
mod post_command;
mod subject_repository;
mod user_repository;
mod users_query;
mod vote_command;
mod vote_repository;

#[cfg(test)]
pub use comment_command::MockCommentCommand;
pub use comment_command::{COMMENT_DELETED_MESSAGE, CommentCommand};
#[cfg(test)]
pub use example_data_seed_repository::MockExampleDataSeedRepository;
pub use example_data_seed_repository::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    SeedComment, SeedPost, SeedVote, SeedVoteTarget, SeedingResult,
};
#[cfg(test)]
pub use feed_reader::MockFeedReader;
pub use feed_reader::FeedReader;
#[cfg(test)]
pub use feed_repository::MockFeedRepository;
pub use feed_repository::{FeedRepository, FeedRepositoryError};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{Deleted, POST_DELETED_MESSAGE, PostCommand};
#[cfg(test)]
pub use subject_repository::MockSubjectRepository;
pub use subject_repository::{
    Created, NewCommentRecord, NewPostRecord, SubjectRepository, SubjectRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
#[cfg(test)]
pub use vote_command::MockVoteCommand;
pub use vote_command::{VoteCommand, VoteRequest, VoteResponse};
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{VoteOutcome, VoteRepository, VoteRepositoryError};
