//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed objective lifecycle used by the API and
//! persistence layers. Entities stay transport agnostic; ports describe the
//! collaborators services depend on.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Objective`, `KeyResult` and their value types.
//! - `Employee`, `Review`: read-only collaborator records.
//! - `Actor`: the authenticated caller every operation is checked against.
//! - `ObjectiveLifecycleService`: implementation of the objective ports.

pub mod auth;
pub mod employee;
pub mod error;
pub mod ids;
pub mod login_service;
pub mod objective_service;
pub mod objectives;
pub mod ports;
pub mod review;
pub mod trace_id;

pub use self::auth::{Actor, LoginCredentials, LoginValidationError, ParseRoleError, Role};
pub use self::employee::{Employee, EmployeeSummary};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{EmployeeId, KeyResultId, ObjectiveId, ReviewId};
pub use self::login_service::{DEVELOPMENT_PASSWORD, DirectoryLoginService};
pub use self::objective_service::ObjectiveLifecycleService;
pub use self::objectives::{
    KeyResult, KeyResultPatch, KeyResultStatus, MetricType, NewKeyResult, NewObjective, Objective,
    ObjectiveDetails, ObjectiveFilter, ObjectivePatch, ObjectiveStatus, ObjectiveType,
    ObjectiveValidationError, Progress, StatusTransition, Weight, completion_stamp,
    progress_transition, validate_schedule, validate_title,
};
pub use self::review::Review;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use okr_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
