//! Embedded schema migrations and the optional demo seed.
//!
//! The SQL under `backend/migrations` is compiled into the binary and applied
//! on startup over a short-lived synchronous connection, off the async
//! runtime. Demo rows live in `backend/seeds` and are only written when an
//! operator asks for them.

use diesel::Connection;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};

/// Migrations from the `backend/migrations` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEMO_ORGANISATION: &str = include_str!("../../../seeds/demo_organisation.sql");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The demo seed failed to apply.
    #[error("failed to seed demo organisation: {message}")]
    Seed { message: String },
    /// The blocking migration task did not complete.
    #[error("migration task aborted: {message}")]
    Task { message: String },
}

fn connect(database_url: &str) -> Result<PgConnection, MigrationError> {
    PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
        message: err.to_string(),
    })
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = connect(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

fn apply_seed(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = connect(database_url)?;
    conn.batch_execute(DEMO_ORGANISATION)
        .map_err(|err| MigrationError::Seed {
            message: err.to_string(),
        })
}

async fn off_runtime<T, F>(database_url: &str, work: F) -> Result<T, MigrationError>
where
    T: Send + 'static,
    F: FnOnce(&str) -> Result<T, MigrationError> + Send + 'static,
{
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || work(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })?
}

/// Apply every pending migration against `database_url`.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let applied = off_runtime(database_url, apply_pending).await?;
    info!(applied, "database migrations complete");
    Ok(())
}

/// Insert the demo organisation (administrator 1, manager 7, reviewer 9,
/// employees 42 and 43, reviews 1 and 2). Existing rows are left alone.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or the seed
/// fails.
pub async fn seed_demo_organisation(database_url: &str) -> Result<(), MigrationError> {
    off_runtime(database_url, apply_seed).await?;
    warn!("demo organisation seeded; every demo employee shares one password");
    Ok(())
}

#[cfg(test)]
mod tests {
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;

    use super::*;

    #[test]
    fn schema_migrations_carry_no_demo_rows() {
        let migrations = <EmbeddedMigrations as MigrationSource<Pg>>::migrations(&MIGRATIONS)
            .expect("embedded migrations");

        assert_eq!(migrations.len(), 2);
        assert!(
            migrations
                .iter()
                .all(|migration| !migration.name().to_string().contains("seed"))
        );
    }

    #[test]
    fn demo_seed_is_idempotent_sql() {
        assert!(DEMO_ORGANISATION.contains("'ADMINISTRATOR'"));
        assert_eq!(DEMO_ORGANISATION.matches("ON CONFLICT (id) DO NOTHING").count(), 2);
    }
}
