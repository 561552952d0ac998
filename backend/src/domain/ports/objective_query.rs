//! Driving port for objective reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    Actor, EmployeeId, Error, ObjectiveDetails, ObjectiveId, ObjectiveStatus, ObjectiveType,
    ReviewId,
};

/// Request to read one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetObjectiveRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
}

/// Request to list objectives visible to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListObjectivesRequest {
    pub actor: Actor,
    pub employee_id: Option<EmployeeId>,
    pub status: Option<ObjectiveStatus>,
    pub objective_type: Option<ObjectiveType>,
    pub review_id: Option<ReviewId>,
    pub page: PageRequest,
}

/// Request to list objectives owned by the actor's direct reportees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTeamObjectivesRequest {
    pub actor: Actor,
    pub status: Option<ObjectiveStatus>,
    pub page: PageRequest,
}

/// Driving port for objective read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectiveQuery: Send + Sync {
    /// Read one objective with its owner and key results.
    async fn get(&self, request: GetObjectiveRequest) -> Result<ObjectiveDetails, Error>;

    /// List objectives the actor may see, ordered by due date then id.
    async fn list(
        &self,
        request: ListObjectivesRequest,
    ) -> Result<Paginated<ObjectiveDetails>, Error>;

    /// List objectives of the actor's direct reportees.
    async fn list_team(
        &self,
        request: ListTeamObjectivesRequest,
    ) -> Result<Paginated<ObjectiveDetails>, Error>;
}
