use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::models::{CandidateProfile, EmployerAccount, EmployerProfile};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployerRow {
    pub id: Uuid,
    pub data: Json<EmployerProfile>,
    pub is_approved: bool,
    pub profile_submitted_for_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployerRow {
    pub fn account(&self) -> EmployerAccount {
        EmployerAccount {
            is_approved: self.is_approved,
            profile_submitted_for_review: self.profile_submitted_for_review,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub data: Json<CandidateProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One card of the public employer grid.
#[derive(Debug, Clone, Serialize, serde::Deserialize, FromRow)]
pub struct EmployerCardRow {
    pub id: Uuid,
    pub company_name: Option<String>,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub industry_sector: Option<String>,
    pub open_jobs: i64,
}
