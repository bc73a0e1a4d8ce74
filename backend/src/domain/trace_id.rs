//! Correlation id for one HTTP request.
//!
//! The [`crate::Trace`] middleware mints a [`TraceId`] per request and runs
//! the handler inside [`TraceId::scope`]. [`crate::domain::Error`]
//! constructors read it back through [`TraceId::current`], so every error
//! envelope and the `trace-id` response header carry the same value.
//!
//! The id lives in a tokio task-local and does not follow work onto spawned
//! tasks; wrap such futures in [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random per-request identifier, rendered as a hyphenated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `self` as the current identifier.
    ///
    /// ```
    /// use social_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id = TraceId::new();
    /// assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
    /// assert_eq!(TraceId::current(), None);
    /// # });
    /// ```
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}
