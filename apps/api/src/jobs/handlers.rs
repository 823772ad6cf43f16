use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{keys, CacheTag};
use crate::errors::AppError;
use crate::interview::models::ProcessStatus;
use crate::jobs::repository::{self, JobFilterCounts, JobListPage, JobListQuery, JobPatch, NewJob};
use crate::models::job::{ApplicationRow, CandidateApplicationRow, JobRow};
use crate::profile::employer::calculate_employer_completion;
use crate::profile::repository::{find_candidate, find_employer};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EmployerIdQuery {
    pub employer_id: Uuid,
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: Option<String>,
    pub status: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub interview_status: Option<ProcessStatus>,
    pub interview_completion: Option<u8>,
}

impl From<CandidateApplicationRow> for CandidateApplication {
    fn from(row: CandidateApplicationRow) -> Self {
        let process = row.interview_process.map(|p| p.0);
        Self {
            id: row.id,
            job_id: row.job_id,
            job_title: row.job_title,
            company_name: row.company_name,
            status: row.status,
            applied_at: row.applied_at,
            interview_status: process.as_ref().map(|p| p.process_status),
            interview_completion: process.as_ref().map(|p| p.completion_percentage()),
        }
    }
}

async fn owned_job(state: &AppState, job_id: Uuid, employer_id: Uuid) -> Result<JobRow, AppError> {
    let job = repository::find_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if job.employer_id != employer_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListPage>, AppError> {
    let query = query.normalized();
    let key = keys::job_list(&query);
    if let Some(hit) = state.cache.get::<JobListPage>(&key).await {
        debug!("Cache hit: {key}");
        return Ok(Json(hit));
    }
    debug!("Cache miss: {key}");

    let page = repository::list_jobs(&state.db, &query).await?;
    state
        .cache
        .set(&key, &page, state.config.cache_list_ttl, &[CacheTag::Jobs])
        .await;
    Ok(Json(page))
}

/// GET /api/v1/jobs/filter-counts
pub async fn handle_job_filter_counts(
    State(state): State<AppState>,
) -> Result<Json<JobFilterCounts>, AppError> {
    if let Some(hit) = state.cache.get::<JobFilterCounts>(keys::JOB_FILTER_COUNTS).await {
        return Ok(Json(hit));
    }
    let counts = repository::job_filter_counts(&state.db).await?;
    state
        .cache
        .set(
            keys::JOB_FILTER_COUNTS,
            &counts,
            state.config.cache_list_ttl,
            &[CacheTag::Jobs],
        )
        .await;
    Ok(Json(counts))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let key = keys::job_detail(id);
    if let Some(hit) = state.cache.get::<JobRow>(&key).await {
        debug!("Cache hit: {key}");
        return Ok(Json(hit));
    }

    let job = repository::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    state
        .cache
        .set(
            &key,
            &job,
            state.config.cache_detail_ttl,
            &[CacheTag::Jobs, CacheTag::Job(id)],
        )
        .await;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    let employer = find_employer(&state.db, req.employer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employer {} not found", req.employer_id)))?;
    let completion = calculate_employer_completion(Some(&employer.data.0), employer.account());
    if !completion.can_post_jobs {
        return Err(AppError::Validation(completion.message));
    }

    let id = repository::insert_job(&state.db, &req).await?;
    state.cache.clear_job_caches().await;
    info!("Employer {} posted job {id}", req.employer_id);

    let job = repository::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<JobRow>, AppError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("title cannot be blank".to_string()));
    }
    owned_job(&state, id, patch.employer_id).await?;

    if !repository::update_job(&state.db, id, &patch).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    state.cache.clear_job_caches().await;
    state.cache.clear_job_cache(id).await;

    let job = repository::find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(actor): Query<EmployerIdQuery>,
) -> Result<StatusCode, AppError> {
    owned_job(&state, id, actor.employer_id).await?;
    repository::delete_job(&state.db, id).await?;
    state.cache.clear_job_caches().await;
    state.cache.clear_job_cache(id).await;
    info!("Employer {} deleted job {id}", actor.employer_id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let job = repository::find_job(&state.db, id)
        .await?
        .filter(|j| j.is_active)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    find_candidate(&state.db, req.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", req.candidate_id)))?;

    let application = repository::insert_application(&state.db, &job, req.candidate_id)
        .await?
        .ok_or_else(|| AppError::Conflict("Already applied to this job".to_string()))?;
    state.cache.clear_candidate_application_caches().await;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/candidates/:id/applications
pub async fn handle_candidate_applications(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateApplication>>, AppError> {
    let key = keys::candidate_applications(candidate_id);
    if let Some(hit) = state.cache.get::<Vec<CandidateApplication>>(&key).await {
        debug!("Cache hit: {key}");
        return Ok(Json(hit));
    }

    let applications: Vec<CandidateApplication> =
        repository::candidate_applications(&state.db, candidate_id)
            .await?
            .into_iter()
            .map(CandidateApplication::from)
            .collect();
    state
        .cache
        .set(
            &key,
            &applications,
            state.config.cache_list_ttl,
            &[CacheTag::Applications],
        )
        .await;
    Ok(Json(applications))
}
