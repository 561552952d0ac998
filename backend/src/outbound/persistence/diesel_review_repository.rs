//! PostgreSQL-backed `ReviewRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{EmployeeId, Review, ReviewId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ReviewRow;
use super::pool::{DbPool, PoolError};
use super::schema::performance_reviews;

/// Diesel-backed reader for performance reviews.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, |message| ReviewRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn row_to_review(row: ReviewRow) -> Review {
    Review::new(
        ReviewId::new(row.id),
        EmployeeId::new(row.employee_id),
        EmployeeId::new(row.manager_id),
    )
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ReviewRow> = performance_reviews::table
            .find(id.get())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_review))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn row_keeps_both_participants() {
        let review = row_to_review(ReviewRow {
            id: 1,
            employee_id: 42,
            manager_id: 9,
        });

        assert_eq!(review.employee_id(), EmployeeId::new(42));
        assert_eq!(review.manager_id(), EmployeeId::new(9));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(error, ReviewRepositoryError::Connection { .. }));
    }
}
