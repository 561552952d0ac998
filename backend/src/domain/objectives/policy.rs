//! Authorization predicates for objective operations.
//!
//! Every predicate is pure: callers resolve the linked review and the owner's
//! directory record first, then ask whether the actor may proceed.

use crate::domain::{Actor, Employee, EmployeeId, Review};

use super::Objective;

/// Whether `actor` may attach an objective for `employee_id` to `review`.
///
/// Shared by creation and linking: the review's manager or the employee
/// themselves.
#[must_use]
pub fn may_use_review(actor: &Actor, employee_id: EmployeeId, review: &Review) -> bool {
    actor.is(review.manager_id()) || actor.is(employee_id)
}

/// Whether `actor` may create an unlinked objective owned by `owner`.
#[must_use]
pub fn may_create_unlinked(actor: &Actor, owner: &Employee) -> bool {
    actor.is(owner.id()) || owner.is_managed_by(actor.employee_id) || actor.is_administrator()
}

/// Whether `actor` may edit fields or key results of `objective`.
#[must_use]
pub fn may_edit(actor: &Actor, objective: &Objective, review: Option<&Review>) -> bool {
    actor.is(objective.employee_id) || review.is_some_and(|review| actor.is(review.manager_id()))
}

/// Whether `actor` may report progress on the owner's side.
#[must_use]
pub fn may_report_self_progress(actor: &Actor, objective: &Objective) -> bool {
    actor.is(objective.employee_id)
}

/// Whether `actor` may report progress on the manager's side.
///
/// Linked objectives answer to the review's manager; unlinked ones to the
/// owner's direct manager.
#[must_use]
pub fn may_report_manager_progress(
    actor: &Actor,
    review: Option<&Review>,
    owner: Option<&Employee>,
) -> bool {
    match review {
        Some(review) => actor.is(review.manager_id()),
        None => owner.is_some_and(|owner| owner.is_managed_by(actor.employee_id)),
    }
}

/// Whether `actor` may delete `objective`.
#[must_use]
pub fn may_delete(actor: &Actor, objective: &Objective, review: Option<&Review>) -> bool {
    match review {
        Some(review) => actor.is(review.manager_id()),
        None => actor.is(objective.employee_id) || actor.is_administrator(),
    }
}

/// Whether `actor` may read `objective`.
#[must_use]
pub fn may_view(
    actor: &Actor,
    objective: &Objective,
    review: Option<&Review>,
    owner: Option<&Employee>,
) -> bool {
    actor.is_administrator()
        || actor.is(objective.employee_id)
        || review.is_some_and(|review| actor.is(review.manager_id()))
        || owner.is_some_and(|owner| owner.is_managed_by(actor.employee_id))
}
