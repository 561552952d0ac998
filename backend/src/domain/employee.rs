//! Read-only employee records consumed from the employee directory.

use serde::{Deserialize, Serialize};

use super::{EmployeeId, Role};

/// Employee record as exposed by the directory.
///
/// The directory owns these records; this domain only reads names, reporting
/// lines and roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: EmployeeId,
    first_name: String,
    last_name: String,
    manager_id: Option<EmployeeId>,
    role: Role,
}

impl Employee {
    /// Build an employee record.
    ///
    /// # Examples
    /// ```
    /// use okr_backend::domain::{Employee, EmployeeId, Role};
    ///
    /// let employee = Employee::new(
    ///     EmployeeId::new(42),
    ///     "Ada",
    ///     "Lovelace",
    ///     Some(EmployeeId::new(7)),
    ///     Role::Employee,
    /// );
    /// assert_eq!(employee.name(), "Ada Lovelace");
    /// assert!(employee.is_managed_by(EmployeeId::new(7)));
    /// ```
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        manager_id: Option<EmployeeId>,
        role: Role,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            manager_id,
            role,
        }
    }

    /// Directory identifier.
    pub fn id(&self) -> EmployeeId {
        self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Direct manager, if the employee reports to anyone.
    pub fn manager_id(&self) -> Option<EmployeeId> {
        self.manager_id
    }

    /// Application role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Full display name.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Whether `manager` is this employee's direct manager.
    pub fn is_managed_by(&self, manager: EmployeeId) -> bool {
        self.manager_id == Some(manager)
    }

    /// Minimal identity used to enrich responses.
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            name: self.name(),
        }
    }
}

/// Minimal employee identity attached to objective responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    /// Directory identifier.
    pub id: EmployeeId,
    /// Full display name.
    pub name: String,
}
