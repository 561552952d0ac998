//! Wire representations for objective and key-result endpoints.
//!
//! Requests arrive with every field optional so missing or malformed values
//! surface as field-level `400`s instead of opaque deserialisation failures.
//! Enumerations travel as SCREAMING_SNAKE_CASE strings and dates as
//! ISO-8601 calendar dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::KeyResultDraft;
use crate::domain::{EmployeeSummary, Error, KeyResult, Objective, ObjectiveDetails};
use crate::inbound::http::validation::{FieldName, non_blank, require};

/// Key-result seed or addition.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultBody {
    /// Short statement of the measurable result.
    #[schema(example = "p95 latency under 200ms")]
    pub title: Option<String>,
    pub target_value: Option<f64>,
    /// Defaults to `0`.
    pub current_value: Option<f64>,
    #[schema(example = "ms")]
    pub unit: Option<String>,
}

impl KeyResultBody {
    pub(crate) fn into_draft(self) -> Result<KeyResultDraft, Error> {
        const TITLE: FieldName = FieldName::new("title");
        Ok(KeyResultDraft {
            title: non_blank(require(self.title, TITLE)?, TITLE)?,
            target_value: self.target_value,
            current_value: self.current_value,
            unit: self.unit,
        })
    }
}

/// Body of `POST /api/v1/objectives`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectiveBody {
    /// Owning employee.
    #[schema(example = 42)]
    pub employee_id: Option<i64>,
    pub review_id: Option<i64>,
    #[schema(example = "Reduce checkout latency")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// `INDIVIDUAL`, `TEAM` or `COMPANY`; defaults to `INDIVIDUAL`.
    #[serde(rename = "type")]
    #[schema(example = "INDIVIDUAL")]
    pub objective_type: Option<String>,
    pub category: Option<String>,
    /// `PERCENTAGE`, `NUMERIC`, `BOOLEAN` or `CURRENCY`.
    #[schema(example = "PERCENTAGE")]
    pub metric_type: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    /// 1 to 100; defaults to 100.
    #[schema(example = 50)]
    pub weight: Option<i64>,
    #[schema(example = "2026-01-01")]
    pub start_date: Option<String>,
    #[schema(example = "2026-03-31")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub key_results: Vec<KeyResultBody>,
}

/// Body of `PATCH /api/v1/objectives/{id}`; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectiveBody {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub objective_type: Option<String>,
    pub category: Option<String>,
    pub metric_type: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub weight: Option<i64>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    /// Setting `COMPLETED` stamps `completedAt`.
    pub status: Option<String>,
}

/// Body of `PUT /api/v1/objectives/{id}/progress`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBody {
    /// 0 to 100.
    #[schema(example = 40)]
    pub progress: Option<i64>,
    pub comments: Option<String>,
    pub current_value: Option<f64>,
    /// Report as the objective's manager rather than its owner.
    #[serde(default)]
    pub as_manager: bool,
}

/// Body of `POST /api/v1/objectives/{id}/review`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkReviewBody {
    #[schema(example = 1)]
    pub review_id: Option<i64>,
}

/// Body of `PATCH /api/v1/objectives/{id}/key-results/{krId}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyResultBody {
    pub title: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    /// `NOT_STARTED`, `IN_PROGRESS`, `AT_RISK` or `COMPLETED`.
    pub status: Option<String>,
}

/// Query string of `GET /api/v1/objectives`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListObjectivesQuery {
    /// Restrict to one owner.
    pub employee_id: Option<i64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub objective_type: Option<String>,
    pub review_id: Option<i64>,
    /// One-based page number; defaults to 1.
    pub page: Option<i64>,
    /// Page size between 1 and 100; defaults to 20.
    pub limit: Option<i64>,
}

/// Query string of `GET /api/v1/objectives/team`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeamObjectivesQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Owner identity attached to objective responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: i64,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl From<EmployeeSummary> for OwnerResponse {
    fn from(value: EmployeeSummary) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

/// Key result as returned to clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultResponse {
    pub id: i64,
    pub objective_id: i64,
    pub title: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub unit: Option<String>,
    #[schema(example = "NOT_STARTED")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KeyResult> for KeyResultResponse {
    fn from(value: KeyResult) -> Self {
        Self {
            id: value.id.get(),
            objective_id: value.objective_id.get(),
            title: value.title,
            target_value: value.target_value,
            current_value: value.current_value,
            unit: value.unit,
            status: value.status.to_string(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Objective as returned to clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveResponse {
    pub id: i64,
    pub employee_id: i64,
    pub review_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "INDIVIDUAL")]
    pub objective_type: String,
    pub category: Option<String>,
    #[schema(example = "PERCENTAGE")]
    pub metric_type: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub weight: u8,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
    pub self_progress: Option<u8>,
    pub manager_progress: Option<u8>,
    pub self_comments: Option<String>,
    pub manager_comments: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owner summary; absent when the directory no longer knows the owner.
    pub employee: Option<OwnerResponse>,
    pub key_results: Vec<KeyResultResponse>,
}

impl From<ObjectiveDetails> for ObjectiveResponse {
    fn from(value: ObjectiveDetails) -> Self {
        let ObjectiveDetails { objective, owner } = value;
        let Objective {
            id,
            employee_id,
            review_id,
            title,
            description,
            objective_type,
            category,
            metric_type,
            target_value,
            current_value,
            weight,
            start_date,
            due_date,
            status,
            self_progress,
            manager_progress,
            self_comments,
            manager_comments,
            completed_at,
            created_at,
            updated_at,
            key_results,
        } = objective;
        Self {
            id: id.get(),
            employee_id: employee_id.get(),
            review_id: review_id.map(|review| review.get()),
            title,
            description,
            objective_type: objective_type.to_string(),
            category,
            metric_type: metric_type.to_string(),
            target_value,
            current_value,
            weight: weight.get(),
            start_date,
            due_date,
            status: status.to_string(),
            self_progress: self_progress.map(|progress| progress.get()),
            manager_progress: manager_progress.map(|progress| progress.get()),
            self_comments,
            manager_comments,
            completed_at,
            created_at,
            updated_at,
            employee: owner.map(OwnerResponse::from),
            key_results: key_results
                .into_iter()
                .map(KeyResultResponse::from)
                .collect(),
        }
    }
}
