//! Development login backed by the employee directory.
//!
//! Usernames are employee ids; every directory entry shares
//! [`DEVELOPMENT_PASSWORD`]. The resolved role comes from the directory record.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{EmployeeDirectory, LoginService};
use crate::domain::{Actor, EmployeeId, Error, LoginCredentials};

/// Shared password accepted for every directory entry.
pub const DEVELOPMENT_PASSWORD: &str = "password";

/// Login service resolving actors through an [`EmployeeDirectory`].
#[derive(Clone)]
pub struct DirectoryLoginService<D> {
    directory: Arc<D>,
}

impl<D> DirectoryLoginService<D> {
    /// Create a login service over `directory`.
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<D> LoginService for DirectoryLoginService<D>
where
    D: EmployeeDirectory,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error> {
        let employee_id: EmployeeId = credentials
            .username()
            .parse()
            .map_err(|_| invalid_credentials())?;
        if credentials.password() != DEVELOPMENT_PASSWORD {
            return Err(invalid_credentials());
        }
        let employee = self
            .directory
            .find_employee(employee_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(invalid_credentials)?;

        info!(employee_id = %employee.id(), role = %employee.role(), "login succeeded");
        Ok(Actor {
            employee_id: employee.id(),
            role: employee.role(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{EmployeeDirectoryError, MockEmployeeDirectory};
    use crate::domain::{Employee, Role};
    use rstest::rstest;

    fn service_with(employee: Option<Employee>) -> DirectoryLoginService<MockEmployeeDirectory> {
        let mut directory = MockEmployeeDirectory::new();
        directory
            .expect_find_employee()
            .return_once(move |_| Ok(employee));
        DirectoryLoginService::new(Arc::new(directory))
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_actor_with_directory_role() {
        let admin = Employee::new(EmployeeId::new(1), "Hr", "Admin", None, Role::Administrator);
        let service = service_with(Some(admin));
        let credentials = LoginCredentials::try_from_parts("1", "password").expect("credentials");

        let actor = service.authenticate(&credentials).await.expect("login");

        assert_eq!(actor, Actor::administrator(EmployeeId::new(1)));
    }

    #[rstest]
    #[case("42", "wrong")]
    #[case("not-a-number", "password")]
    #[tokio::test]
    async fn rejects_bad_credentials(#[case] username: &str, #[case] password: &str) {
        let service = DirectoryLoginService::new(Arc::new(MockEmployeeDirectory::new()));
        let credentials =
            LoginCredentials::try_from_parts(username, password).expect("credentials");

        let error = service
            .authenticate(&credentials)
            .await
            .expect_err("login should fail");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_unknown_employee() {
        let service = service_with(None);
        let credentials = LoginCredentials::try_from_parts("77", "password").expect("credentials");

        let error = service
            .authenticate(&credentials)
            .await
            .expect_err("login should fail");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn surfaces_directory_outage() {
        let mut directory = MockEmployeeDirectory::new();
        directory
            .expect_find_employee()
            .return_once(|_| Err(EmployeeDirectoryError::connection("refused")));
        let service = DirectoryLoginService::new(Arc::new(directory));
        let credentials = LoginCredentials::try_from_parts("42", "password").expect("credentials");

        let error = service
            .authenticate(&credentials)
            .await
            .expect_err("login should fail");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
