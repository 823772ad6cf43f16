pub mod cache_admin;
pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/filter-counts",
            get(jobs::handle_job_filter_counts),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .patch(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/apply", post(jobs::handle_apply))
        // Employers
        .route("/api/v1/employers", get(profile::handle_employer_grid))
        .route("/api/v1/employers/:id", get(profile::handle_get_employer))
        .route(
            "/api/v1/employers/:id/profile",
            put(profile::handle_upsert_employer_profile),
        )
        .route(
            "/api/v1/employers/:id/profile-completion",
            get(profile::handle_employer_completion),
        )
        // Candidates
        .route(
            "/api/v1/candidates/:id/profile",
            put(profile::handle_upsert_candidate_profile),
        )
        .route(
            "/api/v1/candidates/:id/profile-completion",
            get(profile::handle_candidate_completion),
        )
        .route(
            "/api/v1/candidates/:id/experience",
            get(profile::handle_candidate_experience),
        )
        .route(
            "/api/v1/candidates/:id/applications",
            get(jobs::handle_candidate_applications),
        )
        // Interview processes
        .route(
            "/api/v1/applications/:id/interview-process",
            get(interview::handle_get_process).put(interview::handle_upsert_process),
        )
        .route(
            "/api/v1/applications/:id/interview-process/stages/:idx",
            patch(interview::handle_update_stage),
        )
        .route(
            "/api/v1/applications/:id/interview-process/stages/:idx/schedule",
            post(interview::handle_schedule_stage),
        )
        .route(
            "/api/v1/applications/:id/interview-process/communications",
            post(interview::handle_add_communication),
        )
        // Admin
        .route(
            "/api/v1/admin/employers/:id/approval",
            patch(profile::handle_set_employer_approval),
        )
        .route(
            "/api/v1/admin/cache/stats",
            get(cache_admin::handle_cache_stats),
        )
        .route(
            "/api/v1/admin/cache/clear",
            post(cache_admin::handle_clear_patterns),
        )
        .route(
            "/api/v1/admin/cache",
            axum::routing::delete(cache_admin::handle_clear_all),
        )
        .with_state(state)
}
