use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::contains_pattern;
use crate::models::job::{ApplicationRow, CandidateApplicationRow, FacetCountRow, JobRow};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

const JOB_COLUMNS: &str = r#"
    j.id, j.employer_id, j.title, j.description, j.location, j.job_type,
    j.category, j.ctc, j.vacancies, j.is_active, j.created_at, j.updated_at,
    e.data->>'company_name' AS company_name
"#;

const JOB_FILTERS: &str = r#"
    j.is_active
    AND ($1::text IS NULL OR j.location ILIKE $1 ESCAPE '\')
    AND ($2::text IS NULL OR j.job_type = $2)
    AND ($3::text IS NULL OR j.category = $3)
    AND ($4::text IS NULL OR j.title ILIKE $4 ESCAPE '\' OR j.description ILIKE $4 ESCAPE '\')
    AND ($5::uuid IS NULL OR j.employer_id = $5)
"#;

/// Job list filters. Also the cache key input, so field order matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListQuery {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub employer_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobListQuery {
    /// Fills paging defaults and drops blank filters so equivalent requests
    /// share a cache key.
    pub fn normalized(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            location: clean(self.location),
            job_type: clean(self.job_type),
            category: clean(self.category),
            search: clean(self.search),
            employer_id: self.employer_id,
            page: Some(self.page.unwrap_or(1).max(1)),
            limit: Some(
                self.limit
                    .unwrap_or(DEFAULT_PAGE_SIZE)
                    .clamp(1, MAX_PAGE_SIZE),
            ),
        }
    }

    fn limit_offset(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE) as i64;
        let page = self.page.unwrap_or(1).max(1) as i64;
        (limit, (page - 1) * limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListPage {
    pub jobs: Vec<JobRow>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilterCounts {
    pub job_types: BTreeMap<String, i64>,
    pub categories: BTreeMap<String, i64>,
    pub locations: BTreeMap<String, i64>,
}

impl JobFilterCounts {
    fn from_rows(rows: Vec<FacetCountRow>) -> Self {
        let mut counts = Self::default();
        for row in rows {
            let bucket = match row.facet.as_str() {
                "job_type" => &mut counts.job_types,
                "category" => &mut counts.categories,
                "location" => &mut counts.locations,
                _ => continue,
            };
            bucket.insert(row.value, row.count);
        }
        counts
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub employer_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub ctc: Option<String>,
    pub vacancies: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPatch {
    pub employer_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub ctc: Option<String>,
    pub vacancies: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn list_jobs(pool: &PgPool, query: &JobListQuery) -> Result<JobListPage> {
    let (limit, offset) = query.limit_offset();
    let location = query.location.as_deref().map(contains_pattern);
    let search = query.search.as_deref().map(contains_pattern);

    let jobs = sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs j JOIN employers e ON e.id = j.employer_id \
         WHERE {JOB_FILTERS} ORDER BY j.created_at DESC LIMIT $6 OFFSET $7"
    ))
    .bind(&location)
    .bind(&query.job_type)
    .bind(&query.category)
    .bind(&search)
    .bind(query.employer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM jobs j WHERE {JOB_FILTERS}"
    ))
    .bind(&location)
    .bind(&query.job_type)
    .bind(&query.category)
    .bind(&search)
    .bind(query.employer_id)
    .fetch_one(pool)
    .await?;

    Ok(JobListPage {
        jobs,
        total,
        page: query.page.unwrap_or(1),
        limit: limit as u32,
    })
}

pub async fn find_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>> {
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs j JOIN employers e ON e.id = j.employer_id WHERE j.id = $1"
    ))
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

pub async fn job_filter_counts(pool: &PgPool) -> Result<JobFilterCounts> {
    let rows = sqlx::query_as::<_, FacetCountRow>(
        r#"
        SELECT 'job_type' AS facet, job_type AS value, COUNT(*) AS count
        FROM jobs WHERE is_active AND job_type IS NOT NULL GROUP BY job_type
        UNION ALL
        SELECT 'category', category, COUNT(*)
        FROM jobs WHERE is_active AND category IS NOT NULL GROUP BY category
        UNION ALL
        SELECT 'location', location, COUNT(*)
        FROM jobs WHERE is_active AND location IS NOT NULL GROUP BY location
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(JobFilterCounts::from_rows(rows))
}

pub async fn insert_job(pool: &PgPool, job: &NewJob) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO jobs
            (id, employer_id, title, description, location, job_type, category, ctc, vacancies)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(job.employer_id)
    .bind(job.title.trim())
    .bind(&job.description)
    .bind(&job.location)
    .bind(&job.job_type)
    .bind(&job.category)
    .bind(&job.ctc)
    .bind(job.vacancies)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Applies the set fields of `patch`. Returns false when no row matched.
pub async fn update_job(pool: &PgPool, job_id: Uuid, patch: &JobPatch) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE jobs SET
            title       = COALESCE($2, title),
            description = COALESCE($3, description),
            location    = COALESCE($4, location),
            job_type    = COALESCE($5, job_type),
            category    = COALESCE($6, category),
            ctc         = COALESCE($7, ctc),
            vacancies   = COALESCE($8, vacancies),
            is_active   = COALESCE($9, is_active),
            updated_at  = NOW()
        WHERE id = $1
        "#,
    )
    .bind(job_id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.location)
    .bind(&patch.job_type)
    .bind(&patch.category)
    .bind(&patch.ctc)
    .bind(patch.vacancies)
    .bind(patch.is_active)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts an application. `None` when the candidate already applied.
pub async fn insert_application(
    pool: &PgPool,
    job: &JobRow,
    candidate_id: Uuid,
) -> Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, job_id, candidate_id, employer_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (job_id, candidate_id) DO NOTHING
        RETURNING id, job_id, candidate_id, employer_id, status, applied_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(candidate_id)
    .bind(job.employer_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_application(pool: &PgPool, application_id: Uuid) -> Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT id, job_id, candidate_id, employer_id, status, applied_at FROM applications WHERE id = $1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await
}

pub async fn candidate_applications(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<CandidateApplicationRow>> {
    sqlx::query_as::<_, CandidateApplicationRow>(
        r#"
        SELECT a.id, a.job_id, a.status, a.applied_at,
               j.title AS job_title,
               e.data->>'company_name' AS company_name,
               ip.data AS interview_process
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        JOIN employers e ON e.id = a.employer_id
        LEFT JOIN interview_processes ip ON ip.application_id = a.id
        WHERE a.candidate_id = $1
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}
