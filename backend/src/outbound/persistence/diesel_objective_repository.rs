//! PostgreSQL-backed `ObjectiveRepository` implementation using Diesel ORM.
//!
//! Objectives and key results live in separate tables; reads stitch them back
//! together ordered by key-result id. Creation inserts both inside one
//! transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{ObjectiveRepository, ObjectiveRepositoryError};
use crate::domain::{
    EmployeeId, KeyResult, KeyResultId, KeyResultPatch, NewKeyResult, NewObjective, Objective,
    ObjectiveFilter, ObjectiveId, ObjectivePatch, Progress, ReviewId, Weight,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    KeyResultChangeset, KeyResultRow, NewKeyResultRow, NewObjectiveRow, ObjectiveChangeset,
    ObjectiveRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{key_results, objectives};

/// Diesel-backed implementation of the objective repository port.
#[derive(Clone)]
pub struct DieselObjectiveRepository {
    pool: DbPool,
}

impl DieselObjectiveRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ObjectiveRepositoryError {
    map_basic_pool_error(error, |message| {
        ObjectiveRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ObjectiveRepositoryError {
    map_basic_diesel_error(
        error,
        ObjectiveRepositoryError::query,
        ObjectiveRepositoryError::connection,
    )
}

fn corrupt(column: &str, value: impl std::fmt::Display) -> ObjectiveRepositoryError {
    ObjectiveRepositoryError::query(format!("stored {column} is invalid: {value}"))
}

fn to_db_small(value: u8) -> i16 {
    i16::from(value)
}

fn stored_progress(
    column: &str,
    value: Option<i16>,
) -> Result<Option<Progress>, ObjectiveRepositoryError> {
    value
        .map(|raw| Progress::new(i64::from(raw)).map_err(|err| corrupt(column, err)))
        .transpose()
}

fn row_to_key_result(row: KeyResultRow) -> Result<KeyResult, ObjectiveRepositoryError> {
    Ok(KeyResult {
        id: KeyResultId::new(row.id),
        objective_id: ObjectiveId::new(row.objective_id),
        title: row.title,
        target_value: row.target_value,
        current_value: row.current_value,
        unit: row.unit,
        status: row
            .status
            .parse()
            .map_err(|err| corrupt("key result status", err))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_objective(
    row: ObjectiveRow,
    key_results: Vec<KeyResult>,
) -> Result<Objective, ObjectiveRepositoryError> {
    Ok(Objective {
        id: ObjectiveId::new(row.id),
        employee_id: EmployeeId::new(row.employee_id),
        review_id: row.review_id.map(ReviewId::new),
        title: row.title,
        description: row.description,
        objective_type: row
            .objective_type
            .parse()
            .map_err(|err| corrupt("objective type", err))?,
        category: row.category,
        metric_type: row
            .metric_type
            .parse()
            .map_err(|err| corrupt("metric type", err))?,
        target_value: row.target_value,
        current_value: row.current_value,
        weight: Weight::new(i64::from(row.weight)).map_err(|err| corrupt("weight", err))?,
        start_date: row.start_date,
        due_date: row.due_date,
        status: row
            .status
            .parse()
            .map_err(|err| corrupt("objective status", err))?,
        self_progress: stored_progress("self progress", row.self_progress)?,
        manager_progress: stored_progress("manager progress", row.manager_progress)?,
        self_comments: row.self_comments,
        manager_comments: row.manager_comments,
        completed_at: row.completed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
        key_results,
    })
}

fn new_key_result_row(objective_id: i64, draft: &NewKeyResult) -> NewKeyResultRow<'_> {
    NewKeyResultRow {
        objective_id,
        title: &draft.title,
        target_value: draft.target_value,
        current_value: draft.current_value,
        unit: draft.unit.as_deref(),
        status: draft.status.as_str(),
        created_at: draft.created_at,
        updated_at: draft.created_at,
    }
}

fn objective_changeset(patch: &ObjectivePatch) -> ObjectiveChangeset<'_> {
    ObjectiveChangeset {
        review_id: patch.review_id.map(ReviewId::get),
        title: patch.title.as_deref(),
        description: patch.description.as_deref(),
        objective_type: patch.objective_type.map(|kind| kind.as_str()),
        category: patch.category.as_deref(),
        metric_type: patch.metric_type.map(|kind| kind.as_str()),
        target_value: patch.target_value,
        current_value: patch.current_value,
        weight: patch.weight.map(|weight| to_db_small(weight.get())),
        start_date: patch.start_date,
        due_date: patch.due_date,
        status: patch
            .status
            .filter(|_| patch.status_from.is_none())
            .map(|status| status.as_str()),
        self_progress: patch.self_progress.map(|value| to_db_small(value.get())),
        manager_progress: patch.manager_progress.map(|value| to_db_small(value.get())),
        self_comments: patch.self_comments.as_deref(),
        manager_comments: patch.manager_comments.as_deref(),
        completed_at: patch.completed_at,
        updated_at: patch.updated_at,
    }
}

/// Apply the listing filter to a boxed objectives query.
fn filtered<'a, ST>(
    mut query: objectives::BoxedQuery<'a, Pg, ST>,
    filter: &ObjectiveFilter,
) -> objectives::BoxedQuery<'a, Pg, ST> {
    if let Some(owners) = &filter.owners {
        let ids: Vec<i64> = owners.iter().map(|id| id.get()).collect();
        query = query.filter(objectives::employee_id.eq_any(ids));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(objectives::employee_id.eq(employee_id.get()));
    }
    if let Some(status) = filter.status {
        query = query.filter(objectives::status.eq(status.as_str()));
    }
    if let Some(kind) = filter.objective_type {
        query = query.filter(objectives::objective_type.eq(kind.as_str()));
    }
    if let Some(review_id) = filter.review_id {
        query = query.filter(objectives::review_id.eq(review_id.get()));
    }
    query
}

/// Load key results for `objective_ids`, grouped by objective.
async fn load_key_results(
    conn: &mut AsyncPgConnection,
    objective_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<KeyResult>>, ObjectiveRepositoryError> {
    if objective_ids.is_empty() {
        return Ok(BTreeMap::new());
    }
    let rows: Vec<KeyResultRow> = key_results::table
        .filter(key_results::objective_id.eq_any(objective_ids))
        .select(KeyResultRow::as_select())
        .order(key_results::id.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut grouped: BTreeMap<i64, Vec<KeyResult>> = BTreeMap::new();
    for row in rows {
        let objective_id = row.objective_id;
        grouped
            .entry(objective_id)
            .or_default()
            .push(row_to_key_result(row)?);
    }
    Ok(grouped)
}

async fn assemble(
    conn: &mut AsyncPgConnection,
    row: ObjectiveRow,
) -> Result<Objective, ObjectiveRepositoryError> {
    let mut grouped = load_key_results(conn, &[row.id]).await?;
    let key_results = grouped.remove(&row.id).unwrap_or_default();
    row_to_objective(row, key_results)
}

#[async_trait]
impl ObjectiveRepository for DieselObjectiveRepository {
    async fn create(&self, objective: &NewObjective) -> Result<Objective, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewObjectiveRow {
            employee_id: objective.employee_id.get(),
            review_id: objective.review_id.map(ReviewId::get),
            title: &objective.title,
            description: objective.description.as_deref(),
            objective_type: objective.objective_type.as_str(),
            category: objective.category.as_deref(),
            metric_type: objective.metric_type.as_str(),
            target_value: objective.target_value,
            current_value: objective.current_value,
            weight: to_db_small(objective.weight.get()),
            start_date: objective.start_date,
            due_date: objective.due_date,
            status: objective.status.as_str(),
            created_at: objective.created_at,
            updated_at: objective.created_at,
        };

        let (row, key_result_rows) = conn
            .transaction(|conn| {
                async move {
                    let row: ObjectiveRow = diesel::insert_into(objectives::table)
                        .values(&new_row)
                        .returning(ObjectiveRow::as_returning())
                        .get_result(conn)
                        .await?;

                    if objective.key_results.is_empty() {
                        return Ok((row, Vec::new()));
                    }

                    let drafts: Vec<NewKeyResultRow<'_>> = objective
                        .key_results
                        .iter()
                        .map(|draft| new_key_result_row(row.id, draft))
                        .collect();
                    let key_result_rows: Vec<KeyResultRow> =
                        diesel::insert_into(key_results::table)
                            .values(&drafts)
                            .returning(KeyResultRow::as_returning())
                            .get_results(conn)
                            .await?;
                    Ok::<_, diesel::result::Error>((row, key_result_rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let key_results = key_result_rows
            .into_iter()
            .map(row_to_key_result)
            .collect::<Result<Vec<_>, _>>()?;
        row_to_objective(row, key_results)
    }

    async fn find_by_id(
        &self,
        id: ObjectiveId,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ObjectiveRow> = objectives::table
            .find(id.get())
            .select(ObjectiveRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => assemble(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> Result<Option<Objective>, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = objective_changeset(patch);
        let guarded_status = patch.status_from.zip(patch.status);

        // The first statement locks the row, so the guarded status write
        // sees any completion committed before it.
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: Option<ObjectiveRow> =
                        diesel::update(objectives::table.find(id.get()))
                            .set(&changeset)
                            .returning(ObjectiveRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let Some((expected, status)) = guarded_status else {
                        return Ok(Some(row));
                    };
                    let moved: Option<ObjectiveRow> = diesel::update(
                        objectives::table
                            .find(id.get())
                            .filter(objectives::status.eq(expected.as_str())),
                    )
                    .set(objectives::status.eq(status.as_str()))
                    .returning(ObjectiveRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    Ok::<_, diesel::result::Error>(Some(moved.unwrap_or(row)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => assemble(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ObjectiveId) -> Result<bool, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(objectives::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(
        &self,
        filter: &ObjectiveFilter,
        page: PageRequest,
    ) -> Result<Paginated<Objective>, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let offset = i64::try_from(page.offset())
            .map_err(|_| ObjectiveRepositoryError::query("page offset out of range"))?;

        let total: i64 = filtered(objectives::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ObjectiveRow> = filtered(
            objectives::table
                .select(ObjectiveRow::as_select())
                .into_boxed(),
            filter,
        )
        .order((objectives::due_date.asc(), objectives::id.asc()))
        .limit(i64::from(page.limit()))
        .offset(offset)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut grouped = load_key_results(&mut conn, &ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let key_results = grouped.remove(&row.id).unwrap_or_default();
                row_to_objective(row, key_results)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total).map_err(|_| corrupt("objective count", total))?;
        Ok(Paginated::new(items, page, total))
    }

    async fn add_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result: &NewKeyResult,
    ) -> Result<KeyResult, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: KeyResultRow = diesel::insert_into(key_results::table)
            .values(&new_key_result_row(objective_id.get(), key_result))
            .returning(KeyResultRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_key_result(row)
    }

    async fn find_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<KeyResultRow> = key_results::table
            .filter(key_results::id.eq(key_result_id.get()))
            .filter(key_results::objective_id.eq(objective_id.get()))
            .select(KeyResultRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_key_result).transpose()
    }

    async fn update_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
        patch: &KeyResultPatch,
    ) -> Result<Option<KeyResult>, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = KeyResultChangeset {
            title: patch.title.as_deref(),
            target_value: patch.target_value,
            current_value: patch.current_value,
            unit: patch.unit.as_deref(),
            status: patch.status.map(|status| status.as_str()),
            updated_at: patch.updated_at,
        };
        let row: Option<KeyResultRow> = diesel::update(
            key_results::table
                .filter(key_results::id.eq(key_result_id.get()))
                .filter(key_results::objective_id.eq(objective_id.get())),
        )
        .set(&changeset)
        .returning(KeyResultRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_key_result).transpose()
    }

    async fn delete_key_result(
        &self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
    ) -> Result<bool, ObjectiveRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            key_results::table
                .filter(key_results::id.eq(key_result_id.get()))
                .filter(key_results::objective_id.eq(objective_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row mapping and error translation.
    use super::*;
    use crate::domain::{KeyResultStatus, ObjectiveStatus};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> ObjectiveRow {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        ObjectiveRow {
            id: 5,
            employee_id: 42,
            review_id: Some(1),
            title: "Cut latency".to_owned(),
            description: None,
            objective_type: "TEAM".to_owned(),
            category: None,
            metric_type: "NUMERIC".to_owned(),
            target_value: Some(200.0),
            current_value: 250.0,
            weight: 40,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 1).expect("date"),
            status: "IN_PROGRESS".to_owned(),
            self_progress: Some(30),
            manager_progress: None,
            self_comments: None,
            manager_comments: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_maps_to_domain_objective(row: ObjectiveRow) {
        let objective = row_to_objective(row, Vec::new()).expect("valid row");

        assert_eq!(objective.id, ObjectiveId::new(5));
        assert_eq!(objective.review_id, Some(ReviewId::new(1)));
        assert_eq!(objective.status, ObjectiveStatus::InProgress);
        assert_eq!(objective.weight.get(), 40);
        assert_eq!(objective.self_progress, Progress::new(30).ok());
    }

    #[rstest]
    #[case::bad_status("status")]
    #[case::bad_weight("weight")]
    #[case::bad_progress("progress")]
    fn corrupt_rows_surface_query_errors(mut row: ObjectiveRow, #[case] column: &str) {
        match column {
            "status" => row.status = "PAUSED".to_owned(),
            "weight" => row.weight = 0,
            _ => row.manager_progress = Some(150),
        }

        let error = row_to_objective(row, Vec::new()).expect_err("corrupt row");

        assert!(matches!(error, ObjectiveRepositoryError::Query { .. }));
    }

    #[rstest]
    fn key_result_status_is_parsed() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        let key_result = row_to_key_result(KeyResultRow {
            id: 3,
            objective_id: 5,
            title: "p95 under 200ms".to_owned(),
            target_value: None,
            current_value: 0.0,
            unit: Some("ms".to_owned()),
            status: "AT_RISK".to_owned(),
            created_at: now,
            updated_at: now,
        })
        .expect("valid row");

        assert_eq!(key_result.status, KeyResultStatus::AtRisk);
    }

    #[rstest]
    fn changeset_skips_untouched_columns() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        let mut patch = ObjectivePatch::touching(now);
        patch.manager_progress = Progress::new(100).ok();
        patch.status = Some(ObjectiveStatus::Completed);

        let changeset = objective_changeset(&patch);

        assert_eq!(changeset.manager_progress, Some(100));
        assert_eq!(changeset.status, Some("COMPLETED"));
        assert_eq!(changeset.self_progress, None);
        assert_eq!(changeset.title, None);
    }

    #[rstest]
    fn guarded_status_is_left_out_of_the_plain_changeset() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        let mut patch = ObjectivePatch::touching(now);
        patch.self_progress = Progress::new(40).ok();
        patch.status = Some(ObjectiveStatus::InProgress);
        patch.status_from = Some(ObjectiveStatus::NotStarted);

        let changeset = objective_changeset(&patch);

        assert_eq!(changeset.status, None);
        assert_eq!(changeset.self_progress, Some(40));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(error, ObjectiveRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, ObjectiveRepositoryError::Query { .. }));
    }
}
