//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ObjectiveRepository`, `ReviewRepository`,
//! `EmployeeDirectory`) are implemented by outbound adapters. Driving ports
//! (`ObjectiveCommand`, `ObjectiveQuery`, `LoginService`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod employee_directory;
mod login_service;
mod objective_command;
mod objective_query;
mod objective_repository;
mod review_repository;

#[cfg(test)]
pub use employee_directory::MockEmployeeDirectory;
pub use employee_directory::{EmployeeDirectory, EmployeeDirectoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use objective_command::MockObjectiveCommand;
pub use objective_command::{
    AddKeyResultRequest, CreateObjectiveRequest, DeleteKeyResultRequest, DeleteObjectiveRequest,
    KeyResultChanges, KeyResultDraft, LinkReviewRequest, ObjectiveChanges, ObjectiveCommand,
    UpdateKeyResultRequest, UpdateObjectiveRequest, UpdateProgressRequest,
};
#[cfg(test)]
pub use objective_query::MockObjectiveQuery;
pub use objective_query::{
    GetObjectiveRequest, ListObjectivesRequest, ListTeamObjectivesRequest, ObjectiveQuery,
};
#[cfg(test)]
pub use objective_repository::MockObjectiveRepository;
pub use objective_repository::{ObjectiveRepository, ObjectiveRepositoryError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
