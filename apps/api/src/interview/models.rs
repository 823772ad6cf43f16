use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    NotStarted,
    InProgress,
    Completed,
    Rejected,
    Hired,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessStatus::NotStarted => "not_started",
            ProcessStatus::InProgress => "in_progress",
            ProcessStatus::Completed => "completed",
            ProcessStatus::Rejected => "rejected",
            ProcessStatus::Hired => "hired",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinalDecision {
    Pending,
    Selected,
    Rejected,
    OnHold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    Assessment,
    Technical,
    Hr,
    Managerial,
    Final,
    NonTechnical,
    Custom,
}

impl StageType {
    /// Display name for scheduling confirmations. `None` for custom stages,
    /// which use their own `stage_name`.
    pub fn round_label(self) -> Option<&'static str> {
        match self {
            StageType::Assessment => Some("Assessment"),
            StageType::Technical => Some("Technical round"),
            StageType::Hr => Some("HR round"),
            StageType::Managerial => Some("Managerial round"),
            StageType::Final => Some("Final round"),
            StageType::NonTechnical => Some("Non-Technical round"),
            StageType::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Passed,
    Failed,
    Cancelled,
}

impl StageStatus {
    /// Completed and passed both count toward `completed_stages`.
    pub fn is_success(self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Passed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Scheduled => "scheduled",
            StageStatus::InProgress => "in_progress",
            StageStatus::Completed => "completed",
            StageStatus::Passed => "passed",
            StageStatus::Failed => "failed",
            StageStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who made a change recorded in a stage history or communication log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActorModel {
    Employer,
    Admin,
    Candidate,
    #[default]
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub status: StageStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<Uuid>,
    pub changed_by_model: ActorModel,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewStage {
    pub stage_type: StageType,
    pub stage_name: String,
    pub stage_order: u32,

    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    /// 24-hour `HH:MM`.
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    #[serde(default)]
    pub interviewer_email: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,

    #[serde(default)]
    pub status: StageStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub interviewer_notes: Option<String>,
    #[serde(default)]
    pub candidate_notes: Option<String>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
}

impl InterviewStage {
    pub fn new(stage_type: StageType, stage_name: impl Into<String>, stage_order: u32) -> Self {
        Self {
            stage_type,
            stage_name: stage_name.into(),
            stage_order,
            scheduled_date: None,
            scheduled_time: None,
            from_date: None,
            to_date: None,
            location: None,
            interviewer_name: None,
            interviewer_email: None,
            meeting_link: None,
            instructions: None,
            status: StageStatus::Pending,
            feedback: None,
            interviewer_notes: None,
            candidate_notes: None,
            started_at: None,
            completed_at: None,
            status_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationKind {
    Email,
    Sms,
    Call,
    Notification,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Communication {
    pub kind: CommunicationKind,
    pub subject: Option<String>,
    pub message: String,
    pub sent_by: Option<Uuid>,
    pub sent_by_model: ActorModel,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub read: bool,
}

/// One candidate's interview pipeline for one application. Persisted as a
/// JSONB document in `interview_processes.data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewProcess {
    pub id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,

    pub process_status: ProcessStatus,
    pub stages: Vec<InterviewStage>,
    pub process_started_at: Option<DateTime<Utc>>,
    pub process_completed_at: Option<DateTime<Utc>>,

    pub final_decision: FinalDecision,
    #[serde(default)]
    pub final_feedback: Option<String>,

    /// Derived; rewritten by `update_process_status`.
    pub total_stages: usize,
    /// Derived; rewritten by `update_process_status`.
    pub completed_stages: usize,
    /// 1-based index of the stage last moved to in_progress, 0 if none.
    pub current_stage: usize,

    #[serde(default)]
    pub communications: Vec<Communication>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API shape: the document plus its derived completion percentage.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewProcessView {
    #[serde(flatten)]
    pub process: InterviewProcess,
    pub completion_percentage: u8,
}

impl From<InterviewProcess> for InterviewProcessView {
    fn from(process: InterviewProcess) -> Self {
        let completion_percentage = process.completion_percentage();
        Self {
            process,
            completion_percentage,
        }
    }
}
