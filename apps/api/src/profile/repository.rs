use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::contains_pattern;
use crate::models::account::{CandidateRow, EmployerCardRow, EmployerRow};
use crate::profile::models::{CandidateProfile, EmployerProfile};

const GRID_PAGE_SIZE: u32 = 24;

/// Employer grid filters; serialized into the grid cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerGridQuery {
    pub search: Option<String>,
    pub industry_sector: Option<String>,
    pub page: Option<u32>,
}

impl EmployerGridQuery {
    pub fn normalized(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            search: clean(self.search),
            industry_sector: clean(self.industry_sector),
            page: Some(self.page.unwrap_or(1).max(1)),
        }
    }
}

pub async fn find_employer(pool: &PgPool, employer_id: Uuid) -> Result<Option<EmployerRow>> {
    sqlx::query_as::<_, EmployerRow>(
        "SELECT id, data, is_approved, profile_submitted_for_review, created_at, updated_at \
         FROM employers WHERE id = $1",
    )
    .bind(employer_id)
    .fetch_optional(pool)
    .await
}

/// Creates or replaces an employer's profile document. `submit_for_review`
/// only ever sets the review flag; it is never cleared here.
pub async fn upsert_employer_profile(
    pool: &PgPool,
    employer_id: Uuid,
    profile: &EmployerProfile,
    submit_for_review: bool,
) -> Result<EmployerRow> {
    sqlx::query_as::<_, EmployerRow>(
        r#"
        INSERT INTO employers (id, data, profile_submitted_for_review)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE SET
            data = EXCLUDED.data,
            profile_submitted_for_review =
                employers.profile_submitted_for_review OR EXCLUDED.profile_submitted_for_review,
            updated_at = NOW()
        RETURNING id, data, is_approved, profile_submitted_for_review, created_at, updated_at
        "#,
    )
    .bind(employer_id)
    .bind(Json(profile))
    .bind(submit_for_review)
    .fetch_one(pool)
    .await
}

pub async fn set_employer_approval(
    pool: &PgPool,
    employer_id: Uuid,
    is_approved: bool,
) -> Result<Option<EmployerRow>> {
    sqlx::query_as::<_, EmployerRow>(
        r#"
        UPDATE employers SET is_approved = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, data, is_approved, profile_submitted_for_review, created_at, updated_at
        "#,
    )
    .bind(employer_id)
    .bind(is_approved)
    .fetch_optional(pool)
    .await
}

/// Approved employers with their open-job counts.
pub async fn employer_grid(pool: &PgPool, query: &EmployerGridQuery) -> Result<Vec<EmployerCardRow>> {
    let page = query.page.unwrap_or(1).max(1) as i64;
    let limit = GRID_PAGE_SIZE as i64;
    sqlx::query_as::<_, EmployerCardRow>(
        r#"
        SELECT e.id,
               e.data->>'company_name'    AS company_name,
               e.data->>'logo'            AS logo,
               e.data->>'location'        AS location,
               e.data->>'industry_sector' AS industry_sector,
               COUNT(j.id) FILTER (WHERE j.is_active) AS open_jobs
        FROM employers e
        LEFT JOIN jobs j ON j.employer_id = e.id
        WHERE e.is_approved
          AND ($1::text IS NULL OR e.data->>'company_name' ILIKE $1 ESCAPE '\')
          AND ($2::text IS NULL OR e.data->>'industry_sector' = $2)
        GROUP BY e.id
        ORDER BY e.data->>'company_name'
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.search.as_deref().map(contains_pattern))
    .bind(&query.industry_sector)
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await
}

pub async fn find_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<Option<CandidateRow>> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT id, data, created_at, updated_at FROM candidates WHERE id = $1",
    )
    .bind(candidate_id)
    .fetch_optional(pool)
    .await
}

pub async fn upsert_candidate_profile(
    pool: &PgPool,
    candidate_id: Uuid,
    profile: &CandidateProfile,
) -> Result<CandidateRow> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates (id, data)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
        RETURNING id, data, created_at, updated_at
        "#,
    )
    .bind(candidate_id)
    .bind(Json(profile))
    .fetch_one(pool)
    .await
}
