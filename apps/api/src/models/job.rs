use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::interview::models::InterviewProcess;

/// A job posting joined with its employer's company name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub ctc: Option<String>,
    pub vacancies: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// One row of a candidate's application list.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: Option<String>,
    pub interview_process: Option<Json<InterviewProcess>>,
}

/// One facet bucket from the filter-count query.
#[derive(Debug, Clone, FromRow)]
pub struct FacetCountRow {
    pub facet: String,
    pub value: String,
    pub count: i64,
}
