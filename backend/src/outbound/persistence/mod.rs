//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the objective, review, and employee directory
//! ports backed by PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module, and every database failure is mapped onto the owning port's error
//! type.
//!
//! # Example
//!
//! ```ignore
//! use okr_backend::outbound::persistence::{DbPool, DieselObjectiveRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/okr")).await?;
//! let objectives = DieselObjectiveRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_employee_directory;
mod diesel_objective_repository;
mod diesel_review_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_employee_directory::DieselEmployeeDirectory;
pub use diesel_objective_repository::DieselObjectiveRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, seed_demo_organisation};
pub use pool::{DbPool, PoolConfig, PoolError};
