use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::interview::error::InterviewError;
use crate::interview::models::{
    ActorModel, Communication, CommunicationKind, FinalDecision, InterviewProcess,
    InterviewStage, ProcessStatus, StageStatus, StatusChange,
};
use crate::interview::transitions::validate_transition;

/// One stage status change, with its audit fields.
#[derive(Debug, Clone)]
pub struct StageUpdate {
    pub status: StageStatus,
    pub notes: Option<String>,
    pub changed_by: Option<Uuid>,
    pub changed_by_model: ActorModel,
    pub changed_at: DateTime<Utc>,
}

/// Parties an interview process belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ProcessParties {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,
}

/// Client-supplied decision fields on the create-or-update endpoint.
#[derive(Debug, Clone, Default)]
pub struct DecisionOverrides {
    pub process_status: Option<ProcessStatus>,
    pub final_decision: Option<FinalDecision>,
    pub final_feedback: Option<String>,
}

impl InterviewProcess {
    pub fn new(
        parties: ProcessParties,
        stages: Vec<InterviewStage>,
        now: DateTime<Utc>,
    ) -> Result<Self, InterviewError> {
        let mut process = Self {
            id: Uuid::new_v4(),
            application_id: parties.application_id,
            job_id: parties.job_id,
            candidate_id: parties.candidate_id,
            employer_id: parties.employer_id,
            process_status: ProcessStatus::NotStarted,
            stages: Vec::new(),
            process_started_at: None,
            process_completed_at: None,
            final_decision: FinalDecision::Pending,
            final_feedback: None,
            total_stages: 0,
            completed_stages: 0,
            current_stage: 0,
            communications: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        process.replace_stages(stages, None, ActorModel::System, now)?;
        Ok(process)
    }

    /// `round(100 * completed / total)`, 0 for a process without stages.
    pub fn completion_percentage(&self) -> u8 {
        if self.total_stages == 0 {
            return 0;
        }
        ((self.completed_stages as f64 / self.total_stages as f64) * 100.0).round() as u8
    }

    /// Moves one stage to a new status, records history, then recomputes the
    /// process rollup.
    pub fn update_stage_status(
        &mut self,
        stage_index: usize,
        update: StageUpdate,
    ) -> Result<(), InterviewError> {
        let len = self.stages.len();
        let stage = self
            .stages
            .get_mut(stage_index)
            .ok_or(InterviewError::InvalidStageIndex {
                index: stage_index,
                len,
            })?;

        let old_status = stage.status;
        validate_transition(old_status, update.status)?;

        stage.status = update.status;
        stage.status_history.push(StatusChange {
            status: update.status,
            changed_at: update.changed_at,
            changed_by: update.changed_by,
            changed_by_model: update.changed_by_model,
            notes: update.notes,
        });

        if update.status.is_success() {
            stage.completed_at = Some(update.changed_at);
            if !old_status.is_success() {
                self.completed_stages += 1;
            }
        } else if old_status.is_success() {
            self.completed_stages = self.completed_stages.saturating_sub(1);
        }

        if update.status == StageStatus::InProgress {
            stage.started_at.get_or_insert(update.changed_at);
            self.current_stage = stage_index + 1;
        }

        self.updated_at = update.changed_at;
        self.update_process_status(update.changed_at);
        Ok(())
    }

    /// The status the stages alone imply. Never `hired`.
    pub fn derived_status(&self) -> ProcessStatus {
        let total = self.stages.len();
        let completed = self.stages.iter().filter(|s| s.status.is_success()).count();
        if self.stages.iter().any(|s| s.status == StageStatus::Failed) {
            ProcessStatus::Rejected
        } else if total > 0 && completed == total {
            ProcessStatus::Completed
        } else if completed > 0 {
            ProcessStatus::InProgress
        } else {
            ProcessStatus::NotStarted
        }
    }

    /// Recomputes the derived counters and process status from the stages.
    ///
    /// The incremental counter maintained by `update_stage_status` is never
    /// trusted here. A failed stage rejects the whole process regardless of
    /// the other stages. `hired` is kept only while every stage succeeded.
    /// Repeated calls without a stage change are no-ops.
    pub fn update_process_status(&mut self, now: DateTime<Utc>) {
        let derived = self.derived_status();
        self.total_stages = self.stages.len();
        self.completed_stages = self.stages.iter().filter(|s| s.status.is_success()).count();

        if self.process_status == ProcessStatus::Rejected
            && derived != ProcessStatus::Rejected
            && self.final_decision == FinalDecision::Rejected
        {
            self.final_decision = FinalDecision::Pending;
        }
        match derived {
            ProcessStatus::Rejected => self.final_decision = FinalDecision::Rejected,
            ProcessStatus::Completed if self.final_decision == FinalDecision::Pending => {
                self.final_decision = FinalDecision::Selected;
            }
            _ => {}
        }

        let hired = self.process_status == ProcessStatus::Hired;
        self.process_status = if hired && derived == ProcessStatus::Completed {
            ProcessStatus::Hired
        } else {
            derived
        };

        if self.process_status != ProcessStatus::NotStarted {
            self.process_started_at.get_or_insert(now);
        }
        if matches!(
            self.process_status,
            ProcessStatus::Completed | ProcessStatus::Rejected | ProcessStatus::Hired
        ) {
            self.process_completed_at.get_or_insert(now);
        } else {
            self.process_completed_at = None;
        }
    }

    /// Merges an edited stage list into the process by position.
    ///
    /// Status changes go through the transition table and are appended to the
    /// stored history; history sent by the client is ignored. Trailing stages
    /// may only be dropped while pending or cancelled. Nothing changes unless
    /// every stage checks out.
    pub fn replace_stages(
        &mut self,
        stages: Vec<InterviewStage>,
        changed_by: Option<Uuid>,
        changed_by_model: ActorModel,
        now: DateTime<Utc>,
    ) -> Result<(), InterviewError> {
        if stages.is_empty() {
            return Err(InterviewError::NoStages);
        }
        for (index, dropped) in self.stages.iter().enumerate().skip(stages.len()) {
            if !matches!(dropped.status, StageStatus::Pending | StageStatus::Cancelled) {
                return Err(InterviewError::StageLocked {
                    index,
                    status: dropped.status,
                });
            }
        }
        for (index, stage) in stages.iter().enumerate() {
            let from = self
                .stages
                .get(index)
                .map_or(StageStatus::Pending, |s| s.status);
            if stage.status != from {
                validate_transition(from, stage.status)?;
            }
        }

        let mut previous = std::mem::take(&mut self.stages).into_iter();
        self.stages = stages
            .into_iter()
            .map(|mut stage| {
                let from = match previous.next() {
                    Some(old) => {
                        stage.status_history = old.status_history;
                        stage.started_at = old.started_at;
                        stage.completed_at = old.completed_at;
                        old.status
                    }
                    None => {
                        stage.status_history = Vec::new();
                        stage.started_at = None;
                        stage.completed_at = None;
                        StageStatus::Pending
                    }
                };
                if stage.status != from {
                    stage.status_history.push(StatusChange {
                        status: stage.status,
                        changed_at: now,
                        changed_by,
                        changed_by_model,
                        notes: None,
                    });
                    if stage.status == StageStatus::InProgress {
                        stage.started_at.get_or_insert(now);
                    }
                    if stage.status.is_success() {
                        stage.completed_at = Some(now);
                    }
                }
                stage
            })
            .collect();

        if self.current_stage > self.stages.len() {
            self.current_stage = 0;
        }
        self.updated_at = now;
        self.update_process_status(now);
        Ok(())
    }

    /// Applies the employer's decision fields, then lets the stage rollup
    /// have the last word.
    ///
    /// A requested `process_status` must match what the stages imply, except
    /// `hired`, which is accepted once every stage has succeeded.
    pub fn apply_overrides(
        &mut self,
        overrides: DecisionOverrides,
        now: DateTime<Utc>,
    ) -> Result<(), InterviewError> {
        let derived = self.derived_status();
        if let Some(requested) = overrides.process_status {
            let hire = requested == ProcessStatus::Hired && derived == ProcessStatus::Completed;
            if requested != derived && !hire {
                return Err(InterviewError::StatusMismatch { requested, derived });
            }
            self.process_status = requested;
        }
        if let Some(decision) = overrides.final_decision {
            self.final_decision = decision;
        }
        if overrides.final_feedback.is_some() {
            self.final_feedback = overrides.final_feedback;
        }
        self.updated_at = now;
        self.update_process_status(now);
        Ok(())
    }

    pub fn add_communication(
        &mut self,
        kind: CommunicationKind,
        message: String,
        subject: Option<String>,
        sent_by: Option<Uuid>,
        sent_by_model: ActorModel,
        sent_at: DateTime<Utc>,
    ) {
        self.communications.push(Communication {
            kind,
            subject,
            message,
            sent_by,
            sent_by_model,
            sent_at,
            delivered: false,
            read: false,
        });
        self.updated_at = sent_at;
    }
}
