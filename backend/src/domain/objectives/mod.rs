//! Objectives, key results and the rules that move them through their
//! lifecycle.

mod model;
pub mod policy;
mod status;

pub use self::model::{
    KeyResult, KeyResultPatch, KeyResultStatus, MetricType, NewKeyResult, NewObjective, Objective,
    ObjectiveDetails, ObjectiveFilter, ObjectivePatch, ObjectiveStatus, ObjectiveType,
    ObjectiveValidationError, Progress, Weight, validate_schedule, validate_title,
};
pub use self::status::{StatusTransition, completion_stamp, progress_transition};
