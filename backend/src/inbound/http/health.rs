//! Readiness and liveness probes.
//!
//! Readiness flips once the listener is bound and reports which store backs
//! the objectives, so operators can spot a pod that fell back to the
//! in-memory demo data. Liveness answers as long as the process serves HTTP.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Store backing the objective ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Diesel adapters over a PostgreSQL pool.
    Postgres,
    /// Process-local store seeded with the demo organisation.
    Memory,
}

/// Readiness flag plus the storage the server was started with.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    storage: StorageBackend,
}

impl HealthState {
    /// Not yet ready; call [`HealthState::mark_ready`] after binding.
    #[must_use]
    pub const fn new(storage: StorageBackend) -> Self {
        Self {
            ready: AtomicBool::new(false),
            storage,
        }
    }

    /// Mark the service as accepting traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether the service accepts traffic.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    #[schema(value_type = String, example = "ready")]
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage: Option<StorageBackend>,
}

fn probe(ok: bool, body: &ProbeBody) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body)
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ProbeBody),
        (status = 503, description = "Server is still starting", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready();
    probe(
        ok,
        &ProbeBody {
            status: if ok { "ready" } else { "starting" },
            storage: Some(state.storage),
        },
    )
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is serving requests", body = ProbeBody))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    probe(
        true,
        &ProbeBody {
            status: "alive",
            storage: None,
        },
    )
}
