//! Driving port for objective and key-result mutations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, EmployeeId, Error, KeyResult, KeyResultId, KeyResultStatus, MetricType,
    ObjectiveDetails, ObjectiveId, ObjectiveStatus, ObjectiveType, Progress, ReviewId, Weight,
};

/// Key result supplied at creation time or added later.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResultDraft {
    pub title: String,
    pub target_value: Option<f64>,
    /// Defaults to zero.
    pub current_value: Option<f64>,
    pub unit: Option<String>,
}

/// Request to create an objective.
///
/// Omitted optional fields fall back to the lifecycle defaults: individual
/// type, percentage metric, zero current value, weight 100.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateObjectiveRequest {
    pub actor: Actor,
    pub employee_id: EmployeeId,
    pub review_id: Option<ReviewId>,
    pub title: String,
    pub description: Option<String>,
    pub objective_type: Option<ObjectiveType>,
    pub category: Option<String>,
    pub metric_type: Option<MetricType>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub weight: Option<Weight>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub key_results: Vec<KeyResultDraft>,
}

/// General field changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objective_type: Option<ObjectiveType>,
    pub category: Option<String>,
    pub metric_type: Option<MetricType>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub weight: Option<Weight>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<ObjectiveStatus>,
}

/// Request to edit general objective fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateObjectiveRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub changes: ObjectiveChanges,
}

/// Request to report progress from the owner's or the manager's side.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProgressRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub progress: Progress,
    pub comments: Option<String>,
    pub current_value: Option<f64>,
    /// Report on the manager's side; the actor must be verified as manager.
    pub as_manager: bool,
}

/// Request to link an unlinked objective to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReviewRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub review_id: ReviewId,
}

/// Request to delete an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteObjectiveRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
}

/// Request to add a key result to an objective.
#[derive(Debug, Clone, PartialEq)]
pub struct AddKeyResultRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub key_result: KeyResultDraft,
}

/// Key-result field changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyResultChanges {
    pub title: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<KeyResultStatus>,
}

/// Request to edit a key result.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateKeyResultRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub key_result_id: KeyResultId,
    pub changes: KeyResultChanges,
}

/// Request to delete a key result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteKeyResultRequest {
    pub actor: Actor,
    pub objective_id: ObjectiveId,
    pub key_result_id: KeyResultId,
}

/// Driving port for objective write operations.
///
/// Every operation authorizes the request's actor before touching the store
/// and fails with `forbidden`, `not_found` or `invalid_request` errors as the
/// lifecycle rules dictate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectiveCommand: Send + Sync {
    /// Create an objective and its initial key results.
    async fn create(&self, request: CreateObjectiveRequest) -> Result<ObjectiveDetails, Error>;

    /// Edit general fields. Setting the status to completed stamps the
    /// completion time.
    async fn update(&self, request: UpdateObjectiveRequest) -> Result<ObjectiveDetails, Error>;

    /// Record self or manager progress and derive the resulting status.
    async fn update_progress(
        &self,
        request: UpdateProgressRequest,
    ) -> Result<ObjectiveDetails, Error>;

    /// Link an objective to a performance review.
    async fn link_review(&self, request: LinkReviewRequest) -> Result<ObjectiveDetails, Error>;

    /// Delete an objective together with its key results.
    async fn delete(&self, request: DeleteObjectiveRequest) -> Result<(), Error>;

    /// Append a key result.
    async fn add_key_result(&self, request: AddKeyResultRequest) -> Result<KeyResult, Error>;

    /// Edit a key result that belongs to the objective.
    async fn update_key_result(&self, request: UpdateKeyResultRequest)
    -> Result<KeyResult, Error>;

    /// Delete a key result that belongs to the objective.
    async fn delete_key_result(&self, request: DeleteKeyResultRequest) -> Result<(), Error>;
}
