//! User lookups implementing [`UsersQuery`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersQuery};
use crate::domain::{Error, User, UserId};

/// Users service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UsersService<R> {
    repository: Arc<R>,
}

impl<R> UsersService<R> {
    /// Create a new service with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UsersService<R>
where
    R: UserRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.repository.find_by_id(id).await.map_err(map_user_error)
    }
}
