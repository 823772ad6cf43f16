use thiserror::Error;

use crate::interview::models::{ProcessStatus, StageStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterviewError {
    #[error("Stage index {index} is out of range (process has {len} stages)")]
    InvalidStageIndex { index: usize, len: usize },

    #[error("Cannot move stage from '{from}' to '{to}'")]
    InvalidTransition { from: StageStatus, to: StageStatus },

    #[error("Stage {index} is '{status}' and cannot be removed")]
    StageLocked { index: usize, status: StageStatus },

    #[error("Process status '{requested}' does not match its stages ('{derived}')")]
    StatusMismatch {
        requested: ProcessStatus,
        derived: ProcessStatus,
    },

    #[error("An interview process needs at least one stage")]
    NoStages,

    #[error("Unrecognized time '{0}', expected HH:MM or h:mm AM/PM")]
    InvalidTime(String),
}
