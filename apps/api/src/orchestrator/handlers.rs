//! Job description endpoints and the analysis trigger.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{JobDescription, NewJobDescription};
use crate::orchestrator::{analyze_job, AnalyzeResponse};
use crate::state::AppState;
use crate::store::AnalysisOrder;

#[derive(Debug, Serialize)]
pub struct JobListItem {
    #[serde(flatten)]
    pub job: JobDescription,
    /// Distinct resumes analyzed against this job.
    pub candidate_count: usize,
    pub analysis_running: bool,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(form): Json<NewJobDescription>,
) -> Result<(StatusCode, Json<JobDescription>), AppError> {
    let job = state.store.create_job(form.validate()?).await?;
    tracing::info!("Created job description {} ({})", job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobListItem>>, AppError> {
    let jobs = state.store.list_jobs().await?;
    let analyses = state.store.list_analyses(AnalysisOrder::NewestFirst).await?;

    let mut candidates: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for analysis in &analyses {
        candidates
            .entry(analysis.job_description_id)
            .or_default()
            .insert(analysis.resume_id);
    }

    let items = jobs
        .into_iter()
        .map(|job| JobListItem {
            candidate_count: candidates.get(&job.id).map_or(0, HashSet::len),
            analysis_running: state.active_runs.is_running(job.id),
            job,
        })
        .collect();
    Ok(Json(items))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDescription>, AppError> {
    state
        .store
        .get_job(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job description {id} not found")))
}

/// POST /api/v1/jobs/:id/analyze
///
/// Runs the job against every stored resume. A run that stops on an oracle or store
/// failure still answers 200; the failure is in `summary.error` and the alert.
/// The run outlives this request if the client goes away.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = analyze_job(
        state.store.clone(),
        state.analysis.clone(),
        &state.active_runs,
        id,
    )
    .await?;
    Ok(Json(response))
}
