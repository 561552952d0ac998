//! Objective lifecycle domain service.
//!
//! Implements the objective driving ports: authorizes each request against
//! the linked review and the employee directory, derives status transitions
//! from progress reports and writes column-level patches through the
//! repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::Paginated;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::objectives::policy;
use crate::domain::ports::{
    AddKeyResultRequest, CreateObjectiveRequest, DeleteKeyResultRequest, DeleteObjectiveRequest,
    EmployeeDirectory, GetObjectiveRequest, KeyResultDraft, LinkReviewRequest,
    ListObjectivesRequest, ListTeamObjectivesRequest, ObjectiveCommand, ObjectiveQuery,
    ObjectiveRepository, ReviewRepository, UpdateKeyResultRequest, UpdateObjectiveRequest,
    UpdateProgressRequest,
};
use crate::domain::{
    Actor, Employee, EmployeeId, EmployeeSummary, Error, KeyResult, KeyResultId, KeyResultPatch,
    KeyResultStatus, NewKeyResult, NewObjective, Objective, ObjectiveDetails, ObjectiveFilter,
    ObjectiveId, ObjectivePatch, ObjectiveStatus, ObjectiveValidationError, Review, ReviewId,
    Weight, completion_stamp, progress_transition, validate_schedule, validate_title,
};

/// Domain service implementing [`ObjectiveCommand`] and [`ObjectiveQuery`].
#[derive(Clone)]
pub struct ObjectiveLifecycleService<R, V, D> {
    objectives: Arc<R>,
    reviews: Arc<V>,
    directory: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<R, V, D> ObjectiveLifecycleService<R, V, D> {
    /// Create a new service over the given collaborators.
    pub fn new(
        objectives: Arc<R>,
        reviews: Arc<V>,
        directory: Arc<D>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            objectives,
            reviews,
            directory,
            clock,
        }
    }
}

fn map_validation_error(error: &ObjectiveValidationError) -> Error {
    let (field, code) = match error {
        ObjectiveValidationError::WeightOutOfRange { .. } => ("weight", "weight_out_of_range"),
        ObjectiveValidationError::ProgressOutOfRange { .. } => {
            ("progress", "progress_out_of_range")
        }
        ObjectiveValidationError::EmptyTitle => ("title", "empty_title"),
        ObjectiveValidationError::DueBeforeStart { .. } => ("dueDate", "due_before_start"),
        ObjectiveValidationError::UnknownVariant { .. } => ("value", "unknown_variant"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn objective_not_found(id: ObjectiveId) -> Error {
    Error::not_found(format!("objective {id} not found"))
}

fn key_result_not_found(objective_id: ObjectiveId, key_result_id: KeyResultId) -> Error {
    Error::not_found(format!(
        "key result {key_result_id} not found on objective {objective_id}"
    ))
}

fn review_employee_mismatch() -> Error {
    Error::invalid_request("review belongs to a different employee")
}

fn checked_title(title: &str) -> Result<String, Error> {
    validate_title(title).map_err(|err| map_validation_error(&err))
}

fn new_key_result(
    draft: KeyResultDraft,
    created_at: DateTime<Utc>,
) -> Result<NewKeyResult, Error> {
    Ok(NewKeyResult {
        title: checked_title(&draft.title)?,
        target_value: draft.target_value,
        current_value: draft.current_value.unwrap_or_default(),
        unit: draft.unit,
        status: KeyResultStatus::NotStarted,
        created_at,
    })
}

impl<R, V, D> ObjectiveLifecycleService<R, V, D>
where
    R: ObjectiveRepository,
    V: ReviewRepository,
    D: EmployeeDirectory,
{
    async fn load_objective(&self, id: ObjectiveId) -> Result<Objective, Error> {
        self.objectives
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| objective_not_found(id))
    }

    async fn require_review(&self, id: ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| Error::not_found(format!("review {id} not found")))
    }

    async fn linked_review(&self, objective: &Objective) -> Result<Option<Review>, Error> {
        let Some(review_id) = objective.review_id else {
            return Ok(None);
        };
        let review = self
            .reviews
            .find_by_id(review_id)
            .await
            .map_err(Error::from)?;
        if review.is_none() {
            warn!(
                objective_id = %objective.id,
                review_id = %review_id,
                "linked review no longer resolves; treating objective as unlinked"
            );
        }
        Ok(review)
    }

    async fn find_employee(&self, id: EmployeeId) -> Result<Option<Employee>, Error> {
        self.directory
            .find_employee(id)
            .await
            .map_err(Error::from)
    }

    async fn with_owner(&self, objective: Objective) -> Result<ObjectiveDetails, Error> {
        let owner = self
            .find_employee(objective.employee_id)
            .await?
            .map(|employee| employee.summary());
        Ok(ObjectiveDetails { objective, owner })
    }

    async fn write_patch(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> Result<Objective, Error> {
        self.objectives
            .update(id, patch)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| objective_not_found(id))
    }

    async fn editable_objective(
        &self,
        actor: &Actor,
        id: ObjectiveId,
    ) -> Result<Objective, Error> {
        let objective = self.load_objective(id).await?;
        let review = self.linked_review(&objective).await?;
        if !policy::may_edit(actor, &objective, review.as_ref()) {
            return Err(Error::forbidden(
                "only the objective owner or the review manager may edit this objective",
            ));
        }
        Ok(objective)
    }

    async fn enrich_page(
        &self,
        page: Paginated<Objective>,
        mut owners: BTreeMap<EmployeeId, Option<EmployeeSummary>>,
    ) -> Result<Paginated<ObjectiveDetails>, Error> {
        let mut items = Vec::with_capacity(page.items.len());
        for objective in page.items {
            let owner = if let Some(cached) = owners.get(&objective.employee_id) {
                cached.clone()
            } else {
                let resolved = self
                    .find_employee(objective.employee_id)
                    .await?
                    .map(|employee| employee.summary());
                owners.insert(objective.employee_id, resolved.clone());
                resolved
            };
            items.push(ObjectiveDetails { objective, owner });
        }
        Ok(Paginated {
            items,
            meta: page.meta,
        })
    }
}

#[async_trait]
impl<R, V, D> ObjectiveCommand for ObjectiveLifecycleService<R, V, D>
where
    R: ObjectiveRepository,
    V: ReviewRepository,
    D: EmployeeDirectory,
{
    async fn create(&self, request: CreateObjectiveRequest) -> Result<ObjectiveDetails, Error> {
        let title = checked_title(&request.title)?;
        validate_schedule(request.start_date, request.due_date)
            .map_err(|err| map_validation_error(&err))?;

        let owner = self
            .find_employee(request.employee_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("employee {} not found", request.employee_id)))?;

        if let Some(review_id) = request.review_id {
            let review = self.require_review(review_id).await?;
            if !policy::may_use_review(&request.actor, request.employee_id, &review) {
                return Err(Error::forbidden(
                    "only the review manager or the employee may create objectives for this review",
                ));
            }
            if review.employee_id() != request.employee_id {
                return Err(review_employee_mismatch());
            }
        } else if !policy::may_create_unlinked(&request.actor, &owner) {
            return Err(Error::forbidden(
                "not permitted to create objectives for this employee",
            ));
        }

        let now = self.clock.utc();
        let key_results = request
            .key_results
            .into_iter()
            .map(|draft| new_key_result(draft, now))
            .collect::<Result<Vec<_>, _>>()?;
        let new_objective = NewObjective {
            employee_id: request.employee_id,
            review_id: request.review_id,
            title,
            description: request.description,
            objective_type: request.objective_type.unwrap_or_default(),
            category: request.category,
            metric_type: request.metric_type.unwrap_or_default(),
            target_value: request.target_value,
            current_value: request.current_value.unwrap_or_default(),
            weight: request.weight.unwrap_or(Weight::DEFAULT),
            start_date: request.start_date,
            due_date: request.due_date,
            status: ObjectiveStatus::NotStarted,
            created_at: now,
            key_results,
        };

        let objective = self
            .objectives
            .create(&new_objective)
            .await
            .map_err(Error::from)?;
        info!(
            objective_id = %objective.id,
            employee_id = %objective.employee_id,
            actor = %request.actor.employee_id,
            key_results = objective.key_results.len(),
            "objective created"
        );
        Ok(ObjectiveDetails {
            objective,
            owner: Some(owner.summary()),
        })
    }

    async fn update(&self, request: UpdateObjectiveRequest) -> Result<ObjectiveDetails, Error> {
        let objective = self
            .editable_objective(&request.actor, request.objective_id)
            .await?;
        let changes = request.changes;

        let title = changes.title.as_deref().map(checked_title).transpose()?;
        if changes.start_date.is_some() || changes.due_date.is_some() {
            validate_schedule(
                changes.start_date.unwrap_or(objective.start_date),
                changes.due_date.unwrap_or(objective.due_date),
            )
            .map_err(|err| map_validation_error(&err))?;
        }

        let now = self.clock.utc();
        let patch = ObjectivePatch {
            title,
            description: changes.description,
            objective_type: changes.objective_type,
            category: changes.category,
            metric_type: changes.metric_type,
            target_value: changes.target_value,
            current_value: changes.current_value,
            weight: changes.weight,
            start_date: changes.start_date,
            due_date: changes.due_date,
            status: changes.status,
            completed_at: completion_stamp(changes.status, now),
            ..ObjectivePatch::touching(now)
        };
        let updated = self.write_patch(objective.id, &patch).await?;
        if patch.completed_at.is_some() {
            info!(objective_id = %updated.id, "objective marked completed by update");
        }
        self.with_owner(updated).await
    }

    async fn update_progress(
        &self,
        request: UpdateProgressRequest,
    ) -> Result<ObjectiveDetails, Error> {
        let objective = self.load_objective(request.objective_id).await?;
        let review = self.linked_review(&objective).await?;

        if request.as_manager {
            let owner = if review.is_none() {
                self.find_employee(objective.employee_id).await?
            } else {
                None
            };
            if !policy::may_report_manager_progress(&request.actor, review.as_ref(), owner.as_ref())
            {
                return Err(Error::forbidden(
                    "only the objective owner's manager may report manager progress",
                ));
            }
        } else if !policy::may_report_self_progress(&request.actor, &objective) {
            return Err(Error::forbidden(
                "only the objective owner may report self progress",
            ));
        }

        let now = self.clock.utc();
        let transition = progress_transition(objective.status, request.progress, now);
        let mut patch = ObjectivePatch {
            current_value: request.current_value,
            status: transition.status,
            status_from: transition.requires,
            completed_at: transition.completed_at,
            ..ObjectivePatch::touching(now)
        };
        if request.as_manager {
            patch.manager_progress = Some(request.progress);
            patch.manager_comments = request.comments;
        } else {
            patch.self_progress = Some(request.progress);
            patch.self_comments = request.comments;
        }

        let updated = self.write_patch(objective.id, &patch).await?;
        info!(
            objective_id = %updated.id,
            actor = %request.actor.employee_id,
            as_manager = request.as_manager,
            progress = request.progress.get(),
            status = %updated.status,
            "objective progress recorded"
        );
        self.with_owner(updated).await
    }

    async fn link_review(&self, request: LinkReviewRequest) -> Result<ObjectiveDetails, Error> {
        let objective = self.load_objective(request.objective_id).await?;
        if objective.is_linked() {
            return Err(Error::invalid_request(
                "objective is already linked to a review",
            ));
        }
        let review = self.require_review(request.review_id).await?;
        if !policy::may_use_review(&request.actor, objective.employee_id, &review) {
            return Err(Error::forbidden(
                "only the review manager or the objective owner may link this review",
            ));
        }
        if review.employee_id() != objective.employee_id {
            return Err(review_employee_mismatch());
        }

        let patch = ObjectivePatch {
            review_id: Some(review.id()),
            ..ObjectivePatch::touching(self.clock.utc())
        };
        let updated = self.write_patch(objective.id, &patch).await?;
        info!(objective_id = %updated.id, review_id = %review.id(), "objective linked to review");
        self.with_owner(updated).await
    }

    async fn delete(&self, request: DeleteObjectiveRequest) -> Result<(), Error> {
        let objective = self.load_objective(request.objective_id).await?;
        let review = self.linked_review(&objective).await?;
        if !policy::may_delete(&request.actor, &objective, review.as_ref()) {
            return Err(Error::forbidden("not permitted to delete this objective"));
        }
        let deleted = self
            .objectives
            .delete(objective.id)
            .await
            .map_err(Error::from)?;
        if !deleted {
            return Err(objective_not_found(objective.id));
        }
        info!(objective_id = %objective.id, actor = %request.actor.employee_id, "objective deleted");
        Ok(())
    }

    async fn add_key_result(&self, request: AddKeyResultRequest) -> Result<KeyResult, Error> {
        let objective = self
            .editable_objective(&request.actor, request.objective_id)
            .await?;
        let key_result = new_key_result(request.key_result, self.clock.utc())?;
        let created = self
            .objectives
            .add_key_result(objective.id, &key_result)
            .await
            .map_err(Error::from)?;
        info!(objective_id = %objective.id, key_result_id = %created.id, "key result added");
        Ok(created)
    }

    async fn update_key_result(
        &self,
        request: UpdateKeyResultRequest,
    ) -> Result<KeyResult, Error> {
        let objective = self
            .editable_objective(&request.actor, request.objective_id)
            .await?;
        self.objectives
            .find_key_result(objective.id, request.key_result_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| key_result_not_found(objective.id, request.key_result_id))?;

        let changes = request.changes;
        let patch = KeyResultPatch {
            title: changes.title.as_deref().map(checked_title).transpose()?,
            target_value: changes.target_value,
            current_value: changes.current_value,
            unit: changes.unit,
            status: changes.status,
            updated_at: self.clock.utc(),
        };
        self.objectives
            .update_key_result(objective.id, request.key_result_id, &patch)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| key_result_not_found(objective.id, request.key_result_id))
    }

    async fn delete_key_result(&self, request: DeleteKeyResultRequest) -> Result<(), Error> {
        let objective = self
            .editable_objective(&request.actor, request.objective_id)
            .await?;
        self.objectives
            .find_key_result(objective.id, request.key_result_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| key_result_not_found(objective.id, request.key_result_id))?;
        let deleted = self
            .objectives
            .delete_key_result(objective.id, request.key_result_id)
            .await
            .map_err(Error::from)?;
        if !deleted {
            return Err(key_result_not_found(objective.id, request.key_result_id));
        }
        info!(
            objective_id = %objective.id,
            key_result_id = %request.key_result_id,
            "key result deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<R, V, D> ObjectiveQuery for ObjectiveLifecycleService<R, V, D>
where
    R: ObjectiveRepository,
    V: ReviewRepository,
    D: EmployeeDirectory,
{
    async fn get(&self, request: GetObjectiveRequest) -> Result<ObjectiveDetails, Error> {
        let objective = self.load_objective(request.objective_id).await?;
        let review = self.linked_review(&objective).await?;
        let owner = self.find_employee(objective.employee_id).await?;
        if !policy::may_view(&request.actor, &objective, review.as_ref(), owner.as_ref()) {
            return Err(Error::forbidden("not permitted to view this objective"));
        }
        Ok(ObjectiveDetails {
            objective,
            owner: owner.map(|employee| employee.summary()),
        })
    }

    async fn list(
        &self,
        request: ListObjectivesRequest,
    ) -> Result<Paginated<ObjectiveDetails>, Error> {
        let actor = request.actor;
        let owners = if actor.is_administrator() {
            None
        } else {
            let reportees = self
                .directory
                .list_reportees(actor.employee_id)
                .await
                .map_err(Error::from)?;
            let mut scope = Vec::with_capacity(reportees.len() + 1);
            scope.push(actor.employee_id);
            scope.extend(reportees.iter().map(Employee::id));
            if let Some(employee_id) = request.employee_id.filter(|id| !scope.contains(id)) {
                return Err(Error::forbidden(format!(
                    "not permitted to list objectives of employee {employee_id}"
                )));
            }
            Some(scope)
        };

        let filter = ObjectiveFilter {
            owners,
            employee_id: request.employee_id,
            status: request.status,
            objective_type: request.objective_type,
            review_id: request.review_id,
        };
        let page = self
            .objectives
            .list(&filter, request.page)
            .await
            .map_err(Error::from)?;
        self.enrich_page(page, BTreeMap::new()).await
    }

    async fn list_team(
        &self,
        request: ListTeamObjectivesRequest,
    ) -> Result<Paginated<ObjectiveDetails>, Error> {
        let reportees = self
            .directory
            .list_reportees(request.actor.employee_id)
            .await
            .map_err(Error::from)?;
        if reportees.is_empty() {
            return Ok(Paginated::new(Vec::new(), request.page, 0));
        }

        let known: BTreeMap<_, _> = reportees
            .iter()
            .map(|employee| (employee.id(), Some(employee.summary())))
            .collect();
        let filter = ObjectiveFilter {
            owners: Some(known.keys().copied().collect()),
            status: request.status,
            ..ObjectiveFilter::default()
        };
        let page = self
            .objectives
            .list(&filter, request.page)
            .await
            .map_err(Error::from)?;
        self.enrich_page(page, known).await
    }
}

#[cfg(test)]
#[path = "objective_service_tests.rs"]
mod tests;
