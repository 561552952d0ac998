//! Port for objective and key-result persistence.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    KeyResult, KeyResultId, KeyResultPatch, NewKeyResult, NewObjective, Objective,
    ObjectiveFilter, ObjectiveId, ObjectivePatch,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by objective repository adapters.
    pub enum ObjectiveRepositoryError for "objective repository";
}

/// Port for storing objectives and their key results.
///
/// Objectives are always returned with their key results attached, ordered by
/// key-result id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectiveRepository: Send + Sync {
    /// Insert an objective together with its key results as one unit of work.
    async fn create(&self, objective: &NewObjective) -> Result<Objective, ObjectiveRepositoryError>;

    /// Find an objective by id.
    async fn find_by_id(
        &self,
        id: ObjectiveId,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError>;

    /// Write the populated columns of `patch`; `None` when the objective is
    /// gone.
    async fn update(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError>;

    /// Delete an objective and its key results; `false` when nothing matched.
    async fn delete(&self, id: ObjectiveId) -> Result<bool, ObjectiveRepositoryError>;

    /// List objectives matching `filter`, ordered by due date then id.
    async fn list(
        &self,
        filter: &ObjectiveFilter,
        page: PageRequest,
    ) -> Result<Paginated<Objective>, ObjectiveRepositoryError>;

    /// Append a key result to an existing objective.
    async fn add_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result: &NewKeyResult,
    ) -> Result<KeyResult, ObjectiveRepositoryError>;

    /// Find a key result that belongs to `objective_id`.
    async fn find_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError>;

    /// Write the populated columns of `patch` on a key result of
    /// `objective_id`.
    async fn update_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
        patch: &KeyResultPatch,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError>;

    /// Delete a key result of `objective_id`; `false` when nothing matched.
    async fn delete_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<bool, ObjectiveRepositoryError>;
}
