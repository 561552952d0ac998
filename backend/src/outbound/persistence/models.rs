//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{employees, key_results, objectives, performance_reviews};

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub manager_id: Option<i64>,
    pub role: String,
}

/// Row struct for reading from the performance_reviews table.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = performance_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub employee_id: i64,
    pub manager_id: i64,
}

/// Row struct for reading from the objectives table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = objectives)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ObjectiveRow {
    pub id: i64,
    pub employee_id: i64,
    pub review_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub objective_type: String,
    pub category: Option<String>,
    pub metric_type: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub weight: i16,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub self_progress: Option<i16>,
    pub manager_progress: Option<i16>,
    pub self_comments: Option<String>,
    pub manager_comments: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating objective records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = objectives)]
pub(crate) struct NewObjectiveRow<'a> {
    pub employee_id: i64,
    pub review_id: Option<i64>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub objective_type: &'static str,
    pub category: Option<&'a str>,
    pub metric_type: &'static str,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub weight: i16,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for objective records; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = objectives)]
pub(crate) struct ObjectiveChangeset<'a> {
    pub review_id: Option<i64>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub objective_type: Option<&'static str>,
    pub category: Option<&'a str>,
    pub metric_type: Option<&'static str>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub weight: Option<i16>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<&'static str>,
    pub self_progress: Option<i16>,
    pub manager_progress: Option<i16>,
    pub self_comments: Option<&'a str>,
    pub manager_comments: Option<&'a str>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the key_results table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = key_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct KeyResultRow {
    pub id: i64,
    pub objective_id: i64,
    pub title: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub unit: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating key-result records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = key_results)]
pub(crate) struct NewKeyResultRow<'a> {
    pub objective_id: i64,
    pub title: &'a str,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub unit: Option<&'a str>,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for key-result records; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = key_results)]
pub(crate) struct KeyResultChangeset<'a> {
    pub title: Option<&'a str>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<&'a str>,
    pub status: Option<&'static str>,
    pub updated_at: DateTime<Utc>,
}
