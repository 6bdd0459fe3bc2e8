pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::intake::handlers as resumes;
use crate::orchestrator::handlers as jobs;
use crate::presentation::handlers as views;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/dashboard", get(views::handle_dashboard))
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resumes).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/analyze", post(jobs::handle_analyze_job))
        .route("/api/v1/candidates", get(views::handle_list_candidates))
        .route("/api/v1/analyses/:id", get(views::handle_get_analysis))
        .with_state(state)
}
