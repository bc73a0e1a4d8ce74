//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    CommentCommand, ExampleDataSeedRepository, FeedReader, FeedRepository, PostCommand,
    SubjectRepository, UserRepository, UsersQuery, VoteCommand, VoteRepository,
};
use crate::domain::{FeedService, SubjectService, UsersService, VoteService};
use crate::outbound::memory::InMemoryStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub feed: Arc<dyn FeedReader>,
    pub posts: Arc<dyn PostCommand>,
    pub comments: Arc<dyn CommentCommand>,
    pub votes: Arc<dyn VoteCommand>,
}

/// Storage behind every driven port the HTTP surface needs.
///
/// Implemented by the in-memory store and by any bundle of adapters that
/// covers all ports.
pub trait SocialStore:
    UserRepository
    + FeedRepository
    + SubjectRepository
    + VoteRepository
    + ExampleDataSeedRepository
    + 'static
{
}

impl<T> SocialStore for T where
    T: UserRepository
        + FeedRepository
        + SubjectRepository
        + VoteRepository
        + ExampleDataSeedRepository
        + 'static
{
}

impl HttpState {
    /// Wire the domain services over separate repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use social_backend::inbound::http::state::HttpState;
    /// use social_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// let _feed = state.feed.clone();
    /// ```
    pub fn from_repositories<U, F, S, V>(
        users: Arc<U>,
        feed: Arc<F>,
        subjects: Arc<S>,
        votes: Arc<V>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        F: FeedRepository + 'static,
        S: SubjectRepository + 'static,
        V: VoteRepository + 'static,
    {
        let subject_service = Arc::new(SubjectService::new(subjects, clock));
        Self {
            users: Arc::new(UsersService::new(users)),
            feed: Arc::new(FeedService::new(feed)),
            posts: subject_service.clone(),
            comments: subject_service,
            votes: Arc::new(VoteService::new(votes)),
        }
    }

    /// Wire every service over one store.
    pub fn from_store<T: SocialStore>(store: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self::from_repositories(store.clone(), store.clone(), store.clone(), store, clock)
    }

    /// State backed by a fresh in-memory store and the system clock.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (Self::from_store(store.clone(), Arc::new(DefaultClock)), store)
    }
}
