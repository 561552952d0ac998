//! In-process adapter for the objective, review and directory ports.
//!
//! Backs the server when no database URL is configured and gives behaviour
//! tests a real store to drive. A single mutex guards all state, so every
//! port call is atomic with respect to the others.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{
    EmployeeDirectory, EmployeeDirectoryError, ObjectiveRepository, ObjectiveRepositoryError,
    ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{
    Employee, EmployeeId, KeyResult, KeyResultId, KeyResultPatch, NewKeyResult, NewObjective,
    Objective, ObjectiveFilter, ObjectiveId, ObjectivePatch, Review, ReviewId, Role,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct State {
    employees: BTreeMap<EmployeeId, Employee>,
    reviews: BTreeMap<ReviewId, Review>,
    objectives: BTreeMap<ObjectiveId, Objective>,
    last_objective_id: i64,
    last_key_result_id: i64,
}

impl State {
    fn next_objective_id(&mut self) -> ObjectiveId {
        self.last_objective_id += 1;
        ObjectiveId::new(self.last_objective_id)
    }

    fn next_key_result_id(&mut self) -> KeyResultId {
        self.last_key_result_id += 1;
        KeyResultId::new(self.last_key_result_id)
    }

    fn materialize_key_result(
        &mut self,
        objective_id: ObjectiveId,
        draft: &NewKeyResult,
    ) -> KeyResult {
        KeyResult {
            id: self.next_key_result_id(),
            objective_id,
            title: draft.title.clone(),
            target_value: draft.target_value,
            current_value: draft.current_value,
            unit: draft.unit.clone(),
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    fn key_result_mut(
        &mut self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Option<&mut KeyResult> {
        self.objectives
            .get_mut(&objective_id)?
            .key_results
            .iter_mut()
            .find(|kr| kr.id == key_result_id)
    }
}

/// Shared in-memory store implementing every driven port.
#[derive(Debug, Default)]
pub struct InMemoryObjectiveStore {
    state: Mutex<State>,
}

impl InMemoryObjectiveStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a small organisation for local runs.
    ///
    /// Employee 1 is an administrator; employee 7 manages employees 42 and
    /// 43; employee 9 conducts review 1 for employee 42 and review 2 for
    /// employee 43.
    ///
    /// # Examples
    /// ```
    /// use okr_backend::outbound::memory::InMemoryObjectiveStore;
    ///
    /// let store = InMemoryObjectiveStore::with_demo_organisation();
    /// assert_eq!(store.employee_count(), 5);
    /// ```
    #[must_use]
    pub fn with_demo_organisation() -> Self {
        let admin = EmployeeId::new(1);
        let manager = EmployeeId::new(7);
        let reviewer = EmployeeId::new(9);
        let employee = EmployeeId::new(42);
        let colleague = EmployeeId::new(43);
        let mut state = State::default();
        for record in [
            Employee::new(admin, "Hana", "Sato", None, Role::Administrator),
            Employee::new(manager, "Grace", "Hopper", None, Role::Employee),
            Employee::new(reviewer, "Edsger", "Dijkstra", None, Role::Employee),
            Employee::new(employee, "Ada", "Lovelace", Some(manager), Role::Employee),
            Employee::new(colleague, "Alan", "Turing", Some(manager), Role::Employee),
        ] {
            state.employees.insert(record.id(), record);
        }
        for review in [
            Review::new(ReviewId::new(1), employee, reviewer),
            Review::new(ReviewId::new(2), colleague, reviewer),
        ] {
            state.reviews.insert(review.id(), review);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }

    /// Add or replace an employee directory entry.
    ///
    /// # Errors
    ///
    /// Fails when an earlier panic poisoned the store.
    pub fn insert_employee(&self, employee: Employee) -> Result<(), EmployeeDirectoryError> {
        let mut state = self.lock().map_err(EmployeeDirectoryError::query)?;
        state.employees.insert(employee.id(), employee);
        Ok(())
    }

    /// Add or replace a review record.
    ///
    /// # Errors
    ///
    /// Fails when an earlier panic poisoned the store.
    pub fn insert_review(&self, review: Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.lock().map_err(ReviewRepositoryError::query)?;
        state.reviews.insert(review.id(), review);
        Ok(())
    }

    /// Number of directory entries.
    #[must_use]
    pub fn employee_count(&self) -> usize {
        self.lock().map_or(0, |state| state.employees.len())
    }
}

#[async_trait]
impl ObjectiveRepository for InMemoryObjectiveStore {
    async fn create(&self, objective: &NewObjective) -> Result<Objective, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        let id = state.next_objective_id();
        let key_results = objective
            .key_results
            .iter()
            .map(|draft| state.materialize_key_result(id, draft))
            .collect();
        let created = Objective {
            id,
            employee_id: objective.employee_id,
            review_id: objective.review_id,
            title: objective.title.clone(),
            description: objective.description.clone(),
            objective_type: objective.objective_type,
            category: objective.category.clone(),
            metric_type: objective.metric_type,
            target_value: objective.target_value,
            current_value: objective.current_value,
            weight: objective.weight,
            start_date: objective.start_date,
            due_date: objective.due_date,
            status: objective.status,
            self_progress: None,
            manager_progress: None,
            self_comments: None,
            manager_comments: None,
            completed_at: None,
            created_at: objective.created_at,
            updated_at: objective.created_at,
            key_results,
        };
        state.objectives.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: ObjectiveId,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError> {
        let state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        Ok(state.objectives.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        Ok(state.objectives.get_mut(&id).map(|objective| {
            patch.apply_to(objective);
            objective.clone()
        }))
    }

    async fn delete(&self, id: ObjectiveId) -> Result<bool, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        Ok(state.objectives.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &ObjectiveFilter,
        page: PageRequest,
    ) -> Result<Paginated<Objective>, ObjectiveRepositoryError> {
        let state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        let mut matching: Vec<&Objective> = state
            .objectives
            .values()
            .filter(|objective| filter.matches(objective))
            .collect();
        matching.sort_by_key(|objective| (objective.due_date, objective.id));

        let total = u64::try_from(matching.len())
            .map_err(|_| ObjectiveRepositoryError::query("result count out of range"))?;
        let offset = usize::try_from(page.offset())
            .map_err(|_| ObjectiveRepositoryError::query("page offset out of range"))?;
        let limit = usize::try_from(page.limit())
            .map_err(|_| ObjectiveRepositoryError::query("page limit out of range"))?;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(Paginated::new(items, page, total))
    }

    async fn add_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result: &NewKeyResult,
    ) -> Result<KeyResult, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        if !state.objectives.contains_key(&objective_id) {
            return Err(ObjectiveRepositoryError::query(format!(
                "objective {objective_id} does not exist"
            )));
        }
        let created = state.materialize_key_result(objective_id, key_result);
        if let Some(objective) = state.objectives.get_mut(&objective_id) {
            objective.key_results.push(created.clone());
        }
        Ok(created)
    }

    async fn find_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        Ok(state.key_result_mut(objective_id, key_result_id).cloned())
    }

    async fn update_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
        patch: &KeyResultPatch,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        Ok(state
            .key_result_mut(objective_id, key_result_id)
            .map(|key_result| {
                patch.apply_to(key_result);
                key_result.clone()
            }))
    }

    async fn delete_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<bool, ObjectiveRepositoryError> {
        let mut state = self.lock().map_err(ObjectiveRepositoryError::query)?;
        let Some(objective) = state.objectives.get_mut(&objective_id) else {
            return Ok(false);
        };
        let before = objective.key_results.len();
        objective.key_results.retain(|kr| kr.id != key_result_id);
        Ok(objective.key_results.len() < before)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryObjectiveStore {
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let state = self.lock().map_err(ReviewRepositoryError::query)?;
        Ok(state.reviews.get(&id).copied())
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryObjectiveStore {
    async fn find_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeDirectoryError> {
        let state = self.lock().map_err(EmployeeDirectoryError::query)?;
        Ok(state.employees.get(&id).cloned())
    }

    async fn list_reportees(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeDirectoryError> {
        let state = self.lock().map_err(EmployeeDirectoryError::query)?;
        Ok(state
            .employees
            .values()
            .filter(|employee| employee.is_managed_by(manager_id))
            .cloned()
            .collect())
    }
}
