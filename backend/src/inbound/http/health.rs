//! Liveness and readiness probes.
//!
//! Readiness flips on once storage is wired (and migrated, when backed by
//! PostgreSQL); liveness flips off when shutdown begins so orchestrators stop
//! routing traffic before connections drain.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Which storage backend answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// PostgreSQL through the connection pool.
    Postgres,
    /// The process-local store.
    Memory,
}

/// Shared probe state.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    storage: StorageKind,
}

impl HealthState {
    /// Not ready, alive, serving from `storage`.
    pub fn new(storage: StorageKind) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            storage,
        }
    }

    /// Start accepting traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so the instance is drained.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn respond(&self, ok: bool) -> HttpResponse {
        let mut builder = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        builder
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeBody {
                status: if ok { "ok" } else { "unavailable" },
                storage: self.storage,
            })
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    /// `ok` or `unavailable`.
    status: &'static str,
    /// Backend behind the API.
    storage: StorageKind,
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Ready for traffic", body = ProbeBody),
        (status = 503, description = "Still starting", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Alive", body = ProbeBody),
        (status = 503, description = "Shutting down", body = ProbeBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.respond(state.is_alive())
}
