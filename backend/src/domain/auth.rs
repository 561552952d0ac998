//! Authenticated callers and login credentials.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// Application role attached to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular employee.
    #[default]
    Employee,
    /// HR administrator with organisation-wide visibility.
    Administrator,
}

impl Role {
    /// Stable wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Administrator => "ADMINISTRATOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Self::Employee),
            "ADMINISTRATOR" => Ok(Self::Administrator),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// The authenticated caller performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Employee identity of the caller.
    pub employee_id: EmployeeId,
    /// Role resolved at login.
    pub role: Role,
}

impl Actor {
    /// Caller acting with regular employee rights.
    pub fn employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            role: Role::Employee,
        }
    }

    /// Caller acting with administrator rights.
    pub fn administrator(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            role: Role::Administrator,
        }
    }

    /// Whether the caller holds the administrator role.
    pub fn is_administrator(&self) -> bool {
        matches!(self.role, Role::Administrator)
    }

    /// Whether the caller is the given employee.
    pub fn is(&self, employee_id: EmployeeId) -> bool {
        self.employee_id == employee_id
    }
}

/// Validation failures for login credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and build credentials from raw request fields.
    ///
    /// # Examples
    /// ```
    /// use okr_backend::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts(" 42 ", "password").expect("valid");
    /// assert_eq!(creds.username(), "42");
    /// ```
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Raw password.
    pub fn password(&self) -> &str {
        &self.password
    }
}
