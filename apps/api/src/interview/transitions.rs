//! Stage status transition rules.
//!
//! - `pending`     -> `scheduled`, `in_progress`, `cancelled`
//! - `scheduled`   -> `scheduled` (reschedule), `pending`, `in_progress`,
//!   `completed`, `passed`, `failed`, `cancelled`
//! - `in_progress` -> `completed`, `passed`, `failed`, `cancelled`
//! - `completed`   -> `passed`, `failed` (graded after the round)
//! - `cancelled`   -> `pending`, `scheduled` (re-open)
//! - `passed`, `failed` are final

use crate::interview::error::InterviewError;
use crate::interview::models::StageStatus;

pub fn valid_transitions(from: StageStatus) -> &'static [StageStatus] {
    use StageStatus::*;
    match from {
        Pending => &[Scheduled, InProgress, Cancelled],
        Scheduled => &[
            Scheduled, Pending, InProgress, Completed, Passed, Failed, Cancelled,
        ],
        InProgress => &[Completed, Passed, Failed, Cancelled],
        Completed => &[Passed, Failed],
        Cancelled => &[Pending, Scheduled],
        Passed | Failed => &[],
    }
}

pub fn validate_transition(from: StageStatus, to: StageStatus) -> Result<(), InterviewError> {
    if valid_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(InterviewError::InvalidTransition { from, to })
    }
}
