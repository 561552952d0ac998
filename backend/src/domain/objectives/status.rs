//! Status transitions driven by progress reports.
//!
//! Progress reports are the only automatic driver of objective status:
//!
//! - exactly 100 completes the objective and stamps `completed_at`, even when
//!   it is already complete;
//! - any other positive value moves a `NOT_STARTED` objective to
//!   `IN_PROGRESS`;
//! - everything else leaves the status alone, so later lower reports never
//!   regress it.

use chrono::{DateTime, Utc};

use super::{ObjectiveStatus, Progress};

/// Outcome of applying a progress report to an objective's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status to persist, or `None` when unchanged.
    pub status: Option<ObjectiveStatus>,
    /// Completion stamp to persist, or `None` when unchanged.
    pub completed_at: Option<DateTime<Utc>>,
    /// Stored status the write is conditional on; a concurrent completion
    /// must win over a start.
    pub requires: Option<ObjectiveStatus>,
}

impl StatusTransition {
    const UNCHANGED: Self = Self {
        status: None,
        completed_at: None,
        requires: None,
    };
}

/// Derive the status change caused by reporting `progress`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use okr_backend::domain::{ObjectiveStatus, Progress, progress_transition};
///
/// let now = Utc::now();
/// let started = progress_transition(
///     ObjectiveStatus::NotStarted,
///     Progress::new(40).expect("in range"),
///     now,
/// );
/// assert_eq!(started.status, Some(ObjectiveStatus::InProgress));
/// assert_eq!(started.completed_at, None);
/// ```
#[must_use]
pub fn progress_transition(
    prior: ObjectiveStatus,
    progress: Progress,
    now: DateTime<Utc>,
) -> StatusTransition {
    if progress.is_complete() {
        return StatusTransition {
            status: Some(ObjectiveStatus::Completed),
            completed_at: Some(now),
            requires: None,
        };
    }
    if progress.is_started() && prior == ObjectiveStatus::NotStarted {
        return StatusTransition {
            status: Some(ObjectiveStatus::InProgress),
            completed_at: None,
            requires: Some(ObjectiveStatus::NotStarted),
        };
    }
    StatusTransition::UNCHANGED
}

/// Completion stamp required when a general update sets `status`.
#[must_use]
pub fn completion_stamp(
    status: Option<ObjectiveStatus>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    matches!(status, Some(ObjectiveStatus::Completed)).then_some(now)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-04-01T09:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn progress(value: i64) -> Progress {
        Progress::new(value).expect("valid progress")
    }

    #[rstest]
    #[case(ObjectiveStatus::NotStarted, 40, Some(ObjectiveStatus::InProgress))]
    #[case(ObjectiveStatus::NotStarted, 0, None)]
    #[case(ObjectiveStatus::InProgress, 10, None)]
    #[case(ObjectiveStatus::InProgress, 0, None)]
    #[case(ObjectiveStatus::Completed, 30, None)]
    #[case(ObjectiveStatus::Completed, 0, None)]
    fn partial_progress_only_starts_objectives(
        #[case] prior: ObjectiveStatus,
        #[case] value: i64,
        #[case] expected: Option<ObjectiveStatus>,
    ) {
        let transition = progress_transition(prior, progress(value), now());
        assert_eq!(transition.status, expected);
        assert_eq!(transition.completed_at, None);
    }

    #[rstest]
    #[case(ObjectiveStatus::NotStarted)]
    #[case(ObjectiveStatus::InProgress)]
    #[case(ObjectiveStatus::Completed)]
    fn full_progress_always_completes_and_stamps(#[case] prior: ObjectiveStatus) {
        let transition = progress_transition(prior, progress(100), now());
        assert_eq!(transition.status, Some(ObjectiveStatus::Completed));
        assert_eq!(transition.completed_at, Some(now()));
        assert_eq!(transition.requires, None);
    }

    #[test]
    fn starting_is_conditional_on_not_started() {
        let transition = progress_transition(ObjectiveStatus::NotStarted, progress(40), now());
        assert_eq!(transition.requires, Some(ObjectiveStatus::NotStarted));
    }

    #[rstest]
    #[case(Some(ObjectiveStatus::Completed), Some(now()))]
    #[case(Some(ObjectiveStatus::InProgress), None)]
    #[case(None, None)]
    fn general_update_stamps_only_on_completion(
        #[case] status: Option<ObjectiveStatus>,
        #[case] expected: Option<DateTime<Utc>>,
    ) {
        assert_eq!(completion_stamp(status, now()), expected);
    }
}
