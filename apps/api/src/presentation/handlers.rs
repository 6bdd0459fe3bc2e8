//! Read-only view endpoints backed by the presentation layer.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::presentation::{
    analysis_details, dashboard_summary, filter_and_sort, AnalysisDetails, CandidateList,
    CandidateQuery, DashboardSummary,
};
use crate::state::AppState;
use crate::store::AnalysisOrder;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let resumes = state.store.list_resumes().await?;
    let jobs = state.store.list_jobs().await?;
    let analyses = state
        .store
        .list_analyses(AnalysisOrder::HighestScoreFirst)
        .await?;
    Ok(Json(dashboard_summary(&resumes, &jobs, &analyses)))
}

/// GET /api/v1/candidates?search=&job_id=&sort=&direction=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidateList>, AppError> {
    let resumes = state.store.list_resumes().await?;
    let analyses = state.store.list_analyses(AnalysisOrder::NewestFirst).await?;
    Ok(Json(filter_and_sort(&resumes, &analyses, &query)))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisDetails>, AppError> {
    let analysis = state
        .store
        .get_analysis(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    let resume = state
        .store
        .get_resume(analysis.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", analysis.resume_id)))?;
    let job = state
        .store
        .get_job(analysis.job_description_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Job description {} not found",
                analysis.job_description_id
            ))
        })?;

    Ok(Json(analysis_details(&analysis, &resume, &job)))
}
