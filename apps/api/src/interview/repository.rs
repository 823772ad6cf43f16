use sqlx::types::Json;
use sqlx::{PgPool, Result};
use tracing::debug;
use uuid::Uuid;

use crate::interview::models::InterviewProcess;

pub async fn find_by_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Option<InterviewProcess>> {
    let row: Option<Json<InterviewProcess>> =
        sqlx::query_scalar("SELECT data FROM interview_processes WHERE application_id = $1")
            .bind(application_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|Json(process)| process))
}

/// Writes the whole process document; one row per application.
pub async fn save(pool: &PgPool, process: &InterviewProcess) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO interview_processes (id, application_id, employer_id, data, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (application_id) DO UPDATE SET
            data = EXCLUDED.data,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(process.id)
    .bind(process.application_id)
    .bind(process.employer_id)
    .bind(Json(process))
    .bind(process.updated_at)
    .execute(pool)
    .await?;

    debug!(
        "Saved interview process {} ({:?}, {}/{} stages)",
        process.id, process.process_status, process.completed_stages, process.total_stages
    );
    Ok(())
}
