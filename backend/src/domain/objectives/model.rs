//! Objective and key-result entities plus their validated value types.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{EmployeeId, EmployeeSummary, KeyResultId, ObjectiveId, ReviewId};

/// Validation failures for objective and key-result values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectiveValidationError {
    /// Weight outside `1..=100`.
    #[error("weight must be between 1 and 100, got {value}")]
    WeightOutOfRange { value: i64 },
    /// Progress outside `0..=100`.
    #[error("progress must be between 0 and 100, got {value}")]
    ProgressOutOfRange { value: i64 },
    /// Title blank after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Due date earlier than start date.
    #[error("due date {due_date} precedes start date {start_date}")]
    DueBeforeStart {
        start_date: NaiveDate,
        due_date: NaiveDate,
    },
    /// Value outside a closed enumeration.
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

macro_rules! define_wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable wire and storage representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ObjectiveValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ObjectiveValidationError::UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

define_wire_enum! {
    /// Organisational scope of an objective.
    #[derive(Default)]
    ObjectiveType, "objective type" {
        /// Owned and pursued by one employee.
        #[default]
        Individual => "INDIVIDUAL",
        /// Shared goal of a team.
        Team => "TEAM",
        /// Company-wide goal.
        Company => "COMPANY",
    }
}

define_wire_enum! {
    /// How an objective's target and current values are measured.
    #[derive(Default)]
    MetricType, "metric type" {
        /// Percentage points.
        #[default]
        Percentage => "PERCENTAGE",
        /// Plain number.
        Numeric => "NUMERIC",
        /// Done / not done.
        Boolean => "BOOLEAN",
        /// Monetary amount.
        Currency => "CURRENCY",
    }
}

define_wire_enum! {
    /// Lifecycle status of an objective.
    #[derive(Default)]
    ObjectiveStatus, "objective status" {
        /// No progress reported yet.
        #[default]
        NotStarted => "NOT_STARTED",
        /// Some progress reported.
        InProgress => "IN_PROGRESS",
        /// Completed by progress or administrative override.
        Completed => "COMPLETED",
    }
}

define_wire_enum! {
    /// Status of a key result, managed independently of its objective.
    #[derive(Default)]
    KeyResultStatus, "key result status" {
        /// Not started.
        #[default]
        NotStarted => "NOT_STARTED",
        /// Under way.
        InProgress => "IN_PROGRESS",
        /// Under way but unlikely to hit target.
        AtRisk => "AT_RISK",
        /// Done.
        Completed => "COMPLETED",
    }
}

/// Relative importance of an objective, `1..=100`.
///
/// # Examples
/// ```
/// use okr_backend::domain::Weight;
///
/// assert_eq!(Weight::new(50).map(Weight::get), Ok(50));
/// assert!(Weight::new(0).is_err());
/// assert!(Weight::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weight(u8);

impl Weight {
    /// Weight applied when the creator omits one.
    pub const DEFAULT: Self = Self(100);

    /// Validate a raw weight.
    pub fn new(value: i64) -> Result<Self, ObjectiveValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|weight| (1..=100).contains(weight))
            .map(Self)
            .ok_or(ObjectiveValidationError::WeightOutOfRange { value })
    }

    /// Raw weight.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reported completion percentage, `0..=100`.
///
/// # Examples
/// ```
/// use okr_backend::domain::Progress;
///
/// let done = Progress::new(100).expect("in range");
/// assert!(done.is_complete());
/// assert!(Progress::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    /// Validate a raw progress percentage.
    pub fn new(value: i64) -> Result<Self, ObjectiveValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|progress| *progress <= 100)
            .map(Self)
            .ok_or(ObjectiveValidationError::ProgressOutOfRange { value })
    }

    /// Raw percentage.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether the percentage is exactly 100.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == 100
    }

    /// Whether any progress has been made.
    #[must_use]
    pub const fn is_started(self) -> bool {
        self.0 > 0
    }
}

/// Trim a title and reject it when blank.
pub fn validate_title(title: &str) -> Result<String, ObjectiveValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ObjectiveValidationError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// Reject date ranges whose due date precedes the start date.
pub fn validate_schedule(
    start_date: NaiveDate,
    due_date: NaiveDate,
) -> Result<(), ObjectiveValidationError> {
    if due_date < start_date {
        return Err(ObjectiveValidationError::DueBeforeStart {
            start_date,
            due_date,
        });
    }
    Ok(())
}

/// A persisted key result.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResult {
    pub id: KeyResultId,
    pub objective_id: ObjectiveId,
    pub title: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub unit: Option<String>,
    pub status: KeyResultStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted objective together with its ordered key results.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub id: ObjectiveId,
    pub employee_id: EmployeeId,
    pub review_id: Option<ReviewId>,
    pub title: String,
    pub description: Option<String>,
    pub objective_type: ObjectiveType,
    pub category: Option<String>,
    pub metric_type: MetricType,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub weight: Weight,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: ObjectiveStatus,
    pub self_progress: Option<Progress>,
    pub manager_progress: Option<Progress>,
    pub self_comments: Option<String>,
    pub manager_comments: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub key_results: Vec<KeyResult>,
}

impl Objective {
    /// Whether the objective is tied to a performance review.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.review_id.is_some()
    }
}

/// Objective enriched with its owner's minimal identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveDetails {
    pub objective: Objective,
    /// `None` when the owner no longer resolves in the directory.
    pub owner: Option<EmployeeSummary>,
}

/// Key result to insert, with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewKeyResult {
    pub title: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub unit: Option<String>,
    pub status: KeyResultStatus,
    pub created_at: DateTime<Utc>,
}

/// Objective to insert, with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObjective {
    pub employee_id: EmployeeId,
    pub review_id: Option<ReviewId>,
    pub title: String,
    pub description: Option<String>,
    pub objective_type: ObjectiveType,
    pub category: Option<String>,
    pub metric_type: MetricType,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub weight: Weight,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: ObjectiveStatus,
    pub created_at: DateTime<Utc>,
    pub key_results: Vec<NewKeyResult>,
}

/// Column-level change set for an objective.
///
/// `None` leaves a column untouched, so writers that touch disjoint fields do
/// not overwrite each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectivePatch {
    pub review_id: Option<ReviewId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub objective_type: Option<ObjectiveType>,
    pub category: Option<String>,
    pub metric_type: Option<MetricType>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub weight: Option<Weight>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<ObjectiveStatus>,
    /// Write `status` only while the stored status still equals this value.
    pub status_from: Option<ObjectiveStatus>,
    pub self_progress: Option<Progress>,
    pub self_comments: Option<String>,
    pub manager_progress: Option<Progress>,
    pub manager_comments: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ObjectivePatch {
    /// An empty change set that only bumps `updated_at`.
    #[must_use]
    pub const fn touching(updated_at: DateTime<Utc>) -> Self {
        Self {
            review_id: None,
            title: None,
            description: None,
            objective_type: None,
            category: None,
            metric_type: None,
            target_value: None,
            current_value: None,
            weight: None,
            start_date: None,
            due_date: None,
            status: None,
            status_from: None,
            self_progress: None,
            self_comments: None,
            manager_progress: None,
            manager_comments: None,
            completed_at: None,
            updated_at,
        }
    }

    /// Apply the change set to an in-memory objective.
    pub fn apply_to(&self, objective: &mut Objective) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        set_opt(&mut objective.review_id, &self.review_id);
        set(&mut objective.title, &self.title);
        set_opt(&mut objective.description, &self.description);
        set(&mut objective.objective_type, &self.objective_type);
        set_opt(&mut objective.category, &self.category);
        set(&mut objective.metric_type, &self.metric_type);
        set_opt(&mut objective.target_value, &self.target_value);
        set(&mut objective.current_value, &self.current_value);
        set(&mut objective.weight, &self.weight);
        set(&mut objective.start_date, &self.start_date);
        set(&mut objective.due_date, &self.due_date);
        if self
            .status_from
            .is_none_or(|expected| expected == objective.status)
        {
            set(&mut objective.status, &self.status);
        }
        set_opt(&mut objective.self_progress, &self.self_progress);
        set_opt(&mut objective.self_comments, &self.self_comments);
        set_opt(&mut objective.manager_progress, &self.manager_progress);
        set_opt(&mut objective.manager_comments, &self.manager_comments);
        set_opt(&mut objective.completed_at, &self.completed_at);
        objective.updated_at = self.updated_at;
    }
}

/// Column-level change set for a key result.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResultPatch {
    pub title: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<KeyResultStatus>,
    pub updated_at: DateTime<Utc>,
}

impl KeyResultPatch {
    /// Apply the change set to an in-memory key result.
    pub fn apply_to(&self, key_result: &mut KeyResult) {
        if let Some(title) = &self.title {
            key_result.title.clone_from(title);
        }
        if self.target_value.is_some() {
            key_result.target_value = self.target_value;
        }
        if let Some(current_value) = self.current_value {
            key_result.current_value = current_value;
        }
        if self.unit.is_some() {
            key_result.unit.clone_from(&self.unit);
        }
        if let Some(status) = self.status {
            key_result.status = status;
        }
        key_result.updated_at = self.updated_at;
    }
}

/// Filters accepted by objective listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveFilter {
    /// Restrict results to these owners; `None` means unrestricted.
    pub owners: Option<Vec<EmployeeId>>,
    pub employee_id: Option<EmployeeId>,
    pub status: Option<ObjectiveStatus>,
    pub objective_type: Option<ObjectiveType>,
    pub review_id: Option<ReviewId>,
}

impl ObjectiveFilter {
    /// Whether `objective` satisfies every populated filter.
    #[must_use]
    pub fn matches(&self, objective: &Objective) -> bool {
        self.owners
            .as_ref()
            .is_none_or(|owners| owners.contains(&objective.employee_id))
            && self
                .employee_id
                .is_none_or(|id| objective.employee_id == id)
            && self.status.is_none_or(|status| objective.status == status)
            && self
                .objective_type
                .is_none_or(|kind| objective.objective_type == kind)
            && self
                .review_id
                .is_none_or(|id| objective.review_id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for value validation and change sets.
    use super::*;
    use rstest::{fixture, rstest};

    #[rstest]
    #[case(1)]
    #[case(50)]
    #[case(100)]
    fn weight_accepts_bounds(#[case] value: i64) {
        assert!(Weight::new(value).is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(-5)]
    #[case(1_000)]
    fn weight_rejects_out_of_range(#[case] value: i64) {
        assert_eq!(
            Weight::new(value),
            Err(ObjectiveValidationError::WeightOutOfRange { value })
        );
    }

    #[rstest]
    #[case(-1)]
    #[case(101)]
    #[case(256)]
    fn progress_rejects_out_of_range(#[case] value: i64) {
        assert_eq!(
            Progress::new(value),
            Err(ObjectiveValidationError::ProgressOutOfRange { value })
        );
    }

    #[rstest]
    fn progress_flags() {
        let zero = Progress::new(0).expect("zero");
        assert!(!zero.is_started());
        assert!(!zero.is_complete());
        assert!(Progress::new(1).expect("one").is_started());
        assert!(Progress::new(100).expect("hundred").is_complete());
    }

    #[rstest]
    fn wire_enums_round_trip_through_strings() {
        for status in ObjectiveStatus::ALL {
            assert_eq!(status.as_str().parse::<ObjectiveStatus>(), Ok(*status));
        }
        for status in KeyResultStatus::ALL {
            assert_eq!(status.as_str().parse::<KeyResultStatus>(), Ok(*status));
        }
        assert_eq!(
            "QUARTERLY".parse::<ObjectiveType>(),
            Err(ObjectiveValidationError::UnknownVariant {
                kind: "objective type",
                value: "QUARTERLY".to_owned(),
            })
        );
    }

    #[rstest]
    fn title_is_trimmed_and_required() {
        assert_eq!(validate_title("  Ship it "), Ok("Ship it".to_owned()));
        assert_eq!(
            validate_title("   "),
            Err(ObjectiveValidationError::EmptyTitle)
        );
    }

    #[rstest]
    fn schedule_rejects_due_before_start() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
        let due = NaiveDate::from_ymd_opt(2026, 2, 1).expect("date");
        assert!(validate_schedule(start, start).is_ok());
        assert_eq!(
            validate_schedule(start, due),
            Err(ObjectiveValidationError::DueBeforeStart {
                start_date: start,
                due_date: due
            })
        );
    }

    #[fixture]
    fn objective() -> Objective {
        let now = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        Objective {
            id: ObjectiveId::new(1),
            employee_id: EmployeeId::new(42),
            review_id: None,
            title: "Reduce churn".to_owned(),
            description: None,
            objective_type: ObjectiveType::Individual,
            category: None,
            metric_type: MetricType::Percentage,
            target_value: None,
            current_value: 0.0,
            weight: Weight::DEFAULT,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            status: ObjectiveStatus::NotStarted,
            self_progress: None,
            manager_progress: None,
            self_comments: None,
            manager_comments: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
            key_results: Vec::new(),
        }
    }

    #[rstest]
    fn patch_only_touches_populated_fields(mut objective: Objective) {
        let later = objective.updated_at + chrono::Duration::minutes(5);
        let mut patch = ObjectivePatch::touching(later);
        patch.self_progress = Some(Progress::new(40).expect("progress"));
        patch.status = Some(ObjectiveStatus::InProgress);

        patch.apply_to(&mut objective);

        assert_eq!(objective.self_progress, Progress::new(40).ok());
        assert_eq!(objective.manager_progress, None);
        assert_eq!(objective.status, ObjectiveStatus::InProgress);
        assert_eq!(objective.title, "Reduce churn");
        assert_eq!(objective.updated_at, later);
    }

    #[rstest]
    fn guarded_status_is_skipped_once_the_stored_status_moved(mut objective: Objective) {
        let later = objective.updated_at + chrono::Duration::minutes(5);
        objective.status = ObjectiveStatus::Completed;
        objective.completed_at = Some(later);
        let mut patch = ObjectivePatch::touching(later);
        patch.self_progress = Some(Progress::new(40).expect("progress"));
        patch.status = Some(ObjectiveStatus::InProgress);
        patch.status_from = Some(ObjectiveStatus::NotStarted);

        patch.apply_to(&mut objective);

        assert_eq!(objective.status, ObjectiveStatus::Completed);
        assert_eq!(objective.completed_at, Some(later));
        assert_eq!(objective.self_progress, Progress::new(40).ok());
    }

    #[rstest]
    fn filter_matches_all_populated_fields(objective: Objective) {
        let mut filter = ObjectiveFilter {
            owners: Some(vec![EmployeeId::new(42)]),
            status: Some(ObjectiveStatus::NotStarted),
            ..ObjectiveFilter::default()
        };
        assert!(filter.matches(&objective));

        filter.review_id = Some(ReviewId::new(3));
        assert!(!filter.matches(&objective));

        let scoped_out = ObjectiveFilter {
            owners: Some(vec![EmployeeId::new(7)]),
            ..ObjectiveFilter::default()
        };
        assert!(!scoped_out.matches(&objective));
    }
}
