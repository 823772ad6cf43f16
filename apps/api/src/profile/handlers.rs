use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{keys, CacheTag};
use crate::employment::experience::{employment_summary, EmploymentSummary};
use crate::errors::AppError;
use crate::jobs::repository::{list_jobs, JobListQuery};
use crate::models::account::EmployerCardRow;
use crate::models::job::JobRow;
use crate::profile::candidate::{calculate_candidate_completion, CandidateCompletion};
use crate::profile::employer::{calculate_employer_completion, EmployerCompletion};
use crate::profile::models::{CandidateProfile, EmployerAccount, EmployerProfile};
use crate::profile::repository::{self, EmployerGridQuery};
use crate::state::AppState;

#[derive(Serialize)]
pub struct EmployerProfileResponse {
    pub employer_id: Uuid,
    pub profile: EmployerProfile,
    pub completion: EmployerCompletion,
}

#[derive(Serialize)]
pub struct CandidateProfileResponse {
    pub candidate_id: Uuid,
    pub profile: CandidateProfile,
    pub completion: CandidateCompletion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerDetail {
    pub id: Uuid,
    pub profile: EmployerProfile,
    pub is_approved: bool,
    pub jobs: Vec<JobRow>,
}

#[derive(Deserialize)]
pub struct ApprovalRequest {
    pub is_approved: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Employers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/employers
pub async fn handle_employer_grid(
    State(state): State<AppState>,
    Query(query): Query<EmployerGridQuery>,
) -> Result<Json<Vec<EmployerCardRow>>, AppError> {
    let query = query.normalized();
    let key = keys::employer_grid(&query);
    if let Some(hit) = state.cache.get::<Vec<EmployerCardRow>>(&key).await {
        debug!("Cache hit: {key}");
        return Ok(Json(hit));
    }

    let cards = repository::employer_grid(&state.db, &query).await?;
    state
        .cache
        .set(&key, &cards, state.config.cache_list_ttl, &[CacheTag::Employers])
        .await;
    Ok(Json(cards))
}

/// GET /api/v1/employers/:id
pub async fn handle_get_employer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployerDetail>, AppError> {
    let key = keys::employer_detail(id);
    if let Some(hit) = state.cache.get::<EmployerDetail>(&key).await {
        debug!("Cache hit: {key}");
        return Ok(Json(hit));
    }

    let employer = repository::find_employer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employer {id} not found")))?;
    let jobs = list_jobs(
        &state.db,
        &JobListQuery {
            employer_id: Some(id),
            ..Default::default()
        }
        .normalized(),
    )
    .await?
    .jobs;

    let detail = EmployerDetail {
        id,
        is_approved: employer.is_approved,
        profile: employer.data.0,
        jobs,
    };
    state
        .cache
        .set(
            &key,
            &detail,
            state.config.cache_detail_ttl,
            &[CacheTag::Employers, CacheTag::Employer(id)],
        )
        .await;
    Ok(Json(detail))
}

/// PUT /api/v1/employers/:id/profile
///
/// Saving a profile with every required field submits it for admin review.
pub async fn handle_upsert_employer_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<EmployerProfile>,
) -> Result<Json<EmployerProfileResponse>, AppError> {
    let previous = repository::find_employer(&state.db, id).await?;
    let account = previous.as_ref().map(|e| e.account()).unwrap_or_default();
    let submit = calculate_employer_completion(Some(&profile), account).is_profile_complete;

    let row = repository::upsert_employer_profile(&state.db, id, &profile, submit).await?;
    // Job rows embed the company name.
    state.cache.clear_employer_caches(Some(id)).await;
    state.cache.clear_job_caches().await;

    let completion = calculate_employer_completion(Some(&row.data.0), row.account());
    info!(
        "Employer {id} profile saved ({}% complete)",
        completion.completion
    );
    Ok(Json(EmployerProfileResponse {
        employer_id: id,
        profile: row.data.0,
        completion,
    }))
}

/// GET /api/v1/employers/:id/profile-completion
pub async fn handle_employer_completion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployerCompletion>, AppError> {
    let completion = match repository::find_employer(&state.db, id).await? {
        Some(row) => calculate_employer_completion(Some(&row.data.0), row.account()),
        None => calculate_employer_completion(None, EmployerAccount::default()),
    };
    Ok(Json(completion))
}

/// PATCH /api/v1/admin/employers/:id/approval
pub async fn handle_set_employer_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApprovalRequest>,
) -> Result<Json<EmployerCompletion>, AppError> {
    let row = repository::set_employer_approval(&state.db, id, req.is_approved)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employer {id} not found")))?;
    // Approval changes grid membership and the detail view.
    state.cache.clear_employer_grid_caches().await;
    state.cache.delete(&keys::employer_detail(id)).await;
    info!("Employer {id} approval set to {}", req.is_approved);
    Ok(Json(calculate_employer_completion(
        Some(&row.data.0),
        row.account(),
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/candidates/:id/profile
pub async fn handle_upsert_candidate_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<CandidateProfile>,
) -> Result<Json<CandidateProfileResponse>, AppError> {
    let row = repository::upsert_candidate_profile(&state.db, id, &profile).await?;
    let completion = calculate_candidate_completion(Some(&row.data.0));
    info!("Candidate {id} profile saved ({}% complete)", completion.percentage);
    Ok(Json(CandidateProfileResponse {
        candidate_id: id,
        profile: row.data.0,
        completion,
    }))
}

/// GET /api/v1/candidates/:id/profile-completion
pub async fn handle_candidate_completion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateCompletion>, AppError> {
    let row = repository::find_candidate(&state.db, id).await?;
    Ok(Json(calculate_candidate_completion(
        row.as_ref().map(|r| &r.data.0),
    )))
}

/// GET /api/v1/candidates/:id/experience
pub async fn handle_candidate_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmploymentSummary>, AppError> {
    let row = repository::find_candidate(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(employment_summary(
        &row.data.employment,
        Utc::now().date_naive(),
    )))
}
