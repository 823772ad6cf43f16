use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    ActorModel, CommunicationKind, FinalDecision, InterviewProcess, InterviewProcessView,
    InterviewStage, ProcessStatus, StageStatus,
};
use crate::interview::repository;
use crate::interview::schedule::{normalize_stage_times, ScheduleRequest};
use crate::interview::tracker::{DecisionOverrides, ProcessParties, StageUpdate};
use crate::jobs::repository::find_application;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpsertProcessRequest {
    pub employer_id: Uuid,
    pub stages: Vec<InterviewStage>,
    /// Checked against the stage rollup, e.g. marking a selected candidate
    /// as hired.
    pub process_status: Option<ProcessStatus>,
    pub final_decision: Option<FinalDecision>,
    pub final_feedback: Option<String>,
}

#[derive(Deserialize)]
pub struct StageStatusRequest {
    pub employer_id: Uuid,
    pub status: StageStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ScheduleStageRequest {
    pub employer_id: Uuid,
    #[serde(flatten)]
    pub details: ScheduleRequest,
}

#[derive(Serialize)]
pub struct ScheduleStageResponse {
    pub message: String,
    pub interview_process: InterviewProcessView,
}

#[derive(Deserialize)]
pub struct CommunicationRequest {
    pub employer_id: Uuid,
    pub kind: CommunicationKind,
    pub subject: Option<String>,
    pub message: String,
}

async fn load_owned(
    state: &AppState,
    application_id: Uuid,
    employer_id: Uuid,
) -> Result<InterviewProcess, AppError> {
    let process = repository::find_by_application(&state.db, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview process not found".to_string()))?;
    if process.employer_id != employer_id {
        return Err(AppError::Forbidden);
    }
    Ok(process)
}

/// Persists the process and drops the application lists that embed its
/// status.
async fn persist(state: &AppState, process: InterviewProcess) -> Result<InterviewProcessView, AppError> {
    repository::save(&state.db, &process).await?;
    state.cache.clear_candidate_application_caches().await;
    Ok(InterviewProcessView::from(process))
}

/// PUT /api/v1/applications/:id/interview-process
pub async fn handle_upsert_process(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<UpsertProcessRequest>,
) -> Result<Json<InterviewProcessView>, AppError> {
    let application = find_application(&state.db, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    if application.employer_id != req.employer_id {
        return Err(AppError::Forbidden);
    }

    let mut stages = req.stages;
    normalize_stage_times(&mut stages)?;

    let now = Utc::now();
    let mut process = match repository::find_by_application(&state.db, application_id).await? {
        Some(mut existing) => {
            existing.replace_stages(stages, Some(req.employer_id), ActorModel::Employer, now)?;
            existing
        }
        None => InterviewProcess::new(
            ProcessParties {
                application_id,
                job_id: application.job_id,
                candidate_id: application.candidate_id,
                employer_id: application.employer_id,
            },
            stages,
            now,
        )?,
    };
    process.apply_overrides(
        DecisionOverrides {
            process_status: req.process_status,
            final_decision: req.final_decision,
            final_feedback: req.final_feedback,
        },
        now,
    )?;

    info!(
        "Interview process for application {application_id} saved with {} stages",
        process.total_stages
    );
    Ok(Json(persist(&state, process).await?))
}

/// GET /api/v1/applications/:id/interview-process
pub async fn handle_get_process(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<InterviewProcessView>, AppError> {
    let process = repository::find_by_application(&state.db, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview process not found".to_string()))?;
    Ok(Json(process.into()))
}

/// PATCH /api/v1/applications/:id/interview-process/stages/:idx
pub async fn handle_update_stage(
    State(state): State<AppState>,
    Path((application_id, stage_index)): Path<(Uuid, usize)>,
    Json(req): Json<StageStatusRequest>,
) -> Result<Json<InterviewProcessView>, AppError> {
    let mut process = load_owned(&state, application_id, req.employer_id).await?;
    process.update_stage_status(
        stage_index,
        StageUpdate {
            status: req.status,
            notes: req.notes,
            changed_by: Some(req.employer_id),
            changed_by_model: ActorModel::Employer,
            changed_at: Utc::now(),
        },
    )?;
    info!(
        "Stage {stage_index} of application {application_id} moved to {}",
        req.status
    );
    Ok(Json(persist(&state, process).await?))
}

/// POST /api/v1/applications/:id/interview-process/stages/:idx/schedule
pub async fn handle_schedule_stage(
    State(state): State<AppState>,
    Path((application_id, stage_index)): Path<(Uuid, usize)>,
    Json(req): Json<ScheduleStageRequest>,
) -> Result<Json<ScheduleStageResponse>, AppError> {
    let mut process = load_owned(&state, application_id, req.employer_id).await?;
    let message =
        process.schedule_stage(stage_index, req.details, Some(req.employer_id), Utc::now())?;
    info!("{message} (application {application_id})");
    Ok(Json(ScheduleStageResponse {
        message,
        interview_process: persist(&state, process).await?,
    }))
}

/// POST /api/v1/applications/:id/interview-process/communications
pub async fn handle_add_communication(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<CommunicationRequest>,
) -> Result<(StatusCode, Json<InterviewProcessView>), AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }
    let mut process = load_owned(&state, application_id, req.employer_id).await?;
    process.add_communication(
        req.kind,
        req.message,
        req.subject,
        Some(req.employer_id),
        ActorModel::Employer,
        Utc::now(),
    );
    Ok((StatusCode::CREATED, Json(persist(&state, process).await?)))
}
