//! Builds the HTTP dependency bundle for the configured storage.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use social_backend::inbound::http::health::StorageKind;
use social_backend::inbound::http::state::HttpState;
use social_backend::outbound::persistence::{
    DbPool, DieselFeedRepository, DieselSubjectRepository, DieselUserRepository,
    DieselVoteRepository,
};

use super::config::Storage;

fn postgres_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselFeedRepository::new(pool.clone())),
        Arc::new(DieselSubjectRepository::new(pool.clone())),
        Arc::new(DieselVoteRepository::new(pool.clone())),
        clock,
    )
}

/// Wire domain services over the chosen storage.
pub(crate) fn build_http_state(storage: &Storage) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match storage {
        Storage::Postgres(pool) => postgres_state(pool, clock),
        Storage::Memory(store) => HttpState::from_store(store.clone(), clock),
    };
    web::Data::new(state)
}

impl Storage {
    /// Kind reported by the health probes.
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Postgres(_) => StorageKind::Postgres,
            Self::Memory(_) => StorageKind::Memory,
        }
    }
}
