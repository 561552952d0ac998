//! Performance review records referenced by objectives.

use super::{EmployeeId, ReviewId};

/// A performance review linking one employee and one manager for a cycle.
///
/// Only the fields the objective lifecycle matches against are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    employee_id: EmployeeId,
    manager_id: EmployeeId,
}

impl Review {
    /// Build a review record.
    pub fn new(id: ReviewId, employee_id: EmployeeId, manager_id: EmployeeId) -> Self {
        Self {
            id,
            employee_id,
            manager_id,
        }
    }

    /// Review identifier.
    pub fn id(&self) -> ReviewId {
        self.id
    }

    /// Employee under review.
    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Manager conducting the review.
    pub fn manager_id(&self) -> EmployeeId {
        self.manager_id
    }
}
