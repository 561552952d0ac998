//! PostgreSQL-backed `EmployeeDirectory` adapter.
//!
//! Reads the `employees` table, which carries each person's direct manager
//! and their application role.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EmployeeDirectory, EmployeeDirectoryError};
use crate::domain::{Employee, EmployeeId, Role};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::EmployeeRow;
use super::pool::{DbPool, PoolError};
use super::schema::employees;

/// Diesel-backed employee directory.
#[derive(Clone)]
pub struct DieselEmployeeDirectory {
    pool: DbPool,
}

impl DieselEmployeeDirectory {
    /// Create a new directory with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeeDirectoryError {
    map_basic_pool_error(error, |message| EmployeeDirectoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeeDirectoryError {
    map_basic_diesel_error(
        error,
        EmployeeDirectoryError::query,
        EmployeeDirectoryError::connection,
    )
}

fn row_to_employee(row: EmployeeRow) -> Result<Employee, EmployeeDirectoryError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|err| EmployeeDirectoryError::query(format!("stored role is invalid: {err}")))?;
    Ok(Employee::new(
        EmployeeId::new(row.id),
        row.first_name,
        row.last_name,
        row.manager_id.map(EmployeeId::new),
        role,
    ))
}

#[async_trait]
impl EmployeeDirectory for DieselEmployeeDirectory {
    async fn find_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .find(id.get())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn list_reportees(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::manager_id.eq(manager_id.get()))
            .select(EmployeeRow::as_select())
            .order(employees::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_employee).collect()
    }
}
