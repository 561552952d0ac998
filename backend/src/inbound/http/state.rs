//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable against mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, ObjectiveCommand, ObjectiveQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resolves login credentials into an actor.
    pub login: Arc<dyn LoginService>,
    /// Objective and key-result mutations.
    pub objectives: Arc<dyn ObjectiveCommand>,
    /// Objective reads and listings.
    pub objectives_query: Arc<dyn ObjectiveQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use okr_backend::domain::{DirectoryLoginService, ObjectiveLifecycleService};
    /// use okr_backend::inbound::http::state::HttpState;
    /// use okr_backend::outbound::memory::InMemoryObjectiveStore;
    ///
    /// let store = Arc::new(InMemoryObjectiveStore::with_demo_organisation());
    /// let service = Arc::new(ObjectiveLifecycleService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(mockable::DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     Arc::new(DirectoryLoginService::new(store)),
    ///     service.clone(),
    ///     service,
    /// );
    /// let _objectives = state.objectives.clone();
    /// ```
    pub const fn new(
        login: Arc<dyn LoginService>,
        objectives: Arc<dyn ObjectiveCommand>,
        objectives_query: Arc<dyn ObjectiveQuery>,
    ) -> Self {
        Self {
            login,
            objectives,
            objectives_query,
        }
    }
}
