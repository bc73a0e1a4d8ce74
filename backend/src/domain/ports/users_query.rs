//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to resolve session identities and profile
//! lookups without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for looking up users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user; `None` when no such user exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
