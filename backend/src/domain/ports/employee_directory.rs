//! Port for the employee directory.

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee directory adapters.
    pub enum EmployeeDirectoryError for "employee directory";
}

/// Read-only view of employees and their reporting lines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Resolve an employee by id.
    async fn find_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeDirectoryError>;

    /// List employees whose direct manager is `manager_id`.
    async fn list_reportees(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeDirectoryError>;
}
