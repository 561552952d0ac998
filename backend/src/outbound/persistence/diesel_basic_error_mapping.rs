//! Translation of pool and Diesel failures into port error constructors.
//!
//! Each adapter passes its own port's `query`/`connection` constructors so
//! the mapping lives in one place while error types stay per-port.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's connection error.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "database pool unavailable");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto the port's query or connection error.
///
/// Only closed connections count as connectivity failures; constraint
/// violations keep a short description of the violated rule and everything
/// else collapses to a generic query error. Database messages are logged at
/// debug level and never forwarded.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("value violates a table constraint")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("record already exists")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("server detail".to_owned()))
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, Mapped::Connection("database connection error"))]
    #[case(
        DatabaseErrorKind::ForeignKeyViolation,
        Mapped::Query("referenced record does not exist")
    )]
    #[case(
        DatabaseErrorKind::CheckViolation,
        Mapped::Query("value violates a table constraint")
    )]
    #[case(DatabaseErrorKind::UniqueViolation, Mapped::Query("record already exists"))]
    fn database_errors_keep_only_a_summary(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: Mapped,
    ) {
        assert_eq!(map(database_error(kind)), expected);
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(map(DieselError::NotFound), Mapped::Query("record not found"));
    }

    #[rstest]
    fn pool_failures_forward_their_message() {
        let mapped = map_basic_pool_error(PoolError::build("bad url"), |message| message);
        assert_eq!(mapped, "bad url");
    }
}
