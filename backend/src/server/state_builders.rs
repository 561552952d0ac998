//! Wiring of driven adapters into the HTTP state.
//!
//! A configured pool selects the Diesel adapters; otherwise one in-memory
//! store seeded with the demo organisation backs every port.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use okr_backend::domain::ports::{EmployeeDirectory, ObjectiveRepository, ReviewRepository};
use okr_backend::domain::{DirectoryLoginService, ObjectiveLifecycleService};
use okr_backend::inbound::http::state::HttpState;
use okr_backend::outbound::memory::InMemoryObjectiveStore;
use okr_backend::outbound::persistence::{
    DieselEmployeeDirectory, DieselObjectiveRepository, DieselReviewRepository,
};

use super::ServerConfig;

fn assemble<R, V, D>(objectives: Arc<R>, reviews: Arc<V>, directory: Arc<D>) -> HttpState
where
    R: ObjectiveRepository + 'static,
    V: ReviewRepository + 'static,
    D: EmployeeDirectory + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = Arc::new(ObjectiveLifecycleService::new(
        objectives,
        reviews,
        directory.clone(),
        clock,
    ));
    HttpState::new(
        Arc::new(DirectoryLoginService::new(directory)),
        service.clone(),
        service,
    )
}

/// Build the HTTP state for `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("serving objectives from PostgreSQL");
            assemble(
                Arc::new(DieselObjectiveRepository::new(pool.clone())),
                Arc::new(DieselReviewRepository::new(pool.clone())),
                Arc::new(DieselEmployeeDirectory::new(pool.clone())),
            )
        }
        None => {
            warn!("no database configured; serving the in-memory demo organisation");
            let store = Arc::new(InMemoryObjectiveStore::with_demo_organisation());
            assemble(store.clone(), store.clone(), store)
        }
    };
    web::Data::new(state)
}
