//! Analysis Orchestrator: runs one job description against every stored resume.
//!
//! A run is sequential and fail-fast: see `run::run_analysis`. `analyze_job` is the
//! entry point used by the HTTP layer; it resolves the job, refuses a second run for
//! the same job while one is in flight, and turns the outcome into a status banner.
//!
//! The run itself is a spawned task. Dropping the caller (a client disconnect, a proxy
//! timeout) does not stop it; the batch still finishes or stops at its first failure.

use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::oracle::AnalysisOracle;
use crate::store::EntityStore;

pub mod active_runs;
pub mod handlers;
pub mod run;

pub use active_runs::ActiveRuns;
pub use run::{run_analysis, Alert, RunSummary};

pub const NO_CANDIDATES_MESSAGE: &str = "No candidates found. Please upload resumes first.";

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub job_id: Uuid,
    pub summary: RunSummary,
    pub alert: Alert,
}

pub async fn analyze_job(
    store: Arc<dyn EntityStore>,
    oracle: Arc<dyn AnalysisOracle>,
    runs: &ActiveRuns,
    job_id: Uuid,
) -> Result<AnalyzeResponse, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job description {job_id} not found")))?;

    let guard = runs.try_start(job.id).ok_or_else(|| {
        AppError::Conflict(format!("An analysis run for '{}' is already in progress", job.title))
    })?;

    let resumes = store.list_resumes().await?;
    if resumes.is_empty() {
        info!("Analysis for job {} requested with no resumes on file", job.id);
        return Ok(AnalyzeResponse {
            job_id: job.id,
            summary: RunSummary::default(),
            alert: Alert::warning(NO_CANDIDATES_MESSAGE),
        });
    }

    let task = tokio::spawn(async move {
        // Held by the task so the job stays marked as running until the batch ends.
        let _guard = guard;
        let summary = run_analysis(store.as_ref(), oracle.as_ref(), &job, &resumes).await;
        let alert = summary.alert(&job.title);
        AnalyzeResponse {
            job_id: job.id,
            summary,
            alert,
        }
    });

    task.await
        .map_err(|e| AppError::Internal(anyhow!("Analysis task for job {job_id} failed: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::{NewJobDescription, NewResume};
    use crate::orchestrator::run::AlertKind;
    use crate::presentation::bands::MatchBand;
    use crate::presentation::{filter_and_sort, CandidateQuery};
    use crate::store::{AnalysisFilter, AnalysisOrder, MemoryStore};
    use crate::testing::{new_job, new_resume, ScriptedOracle};

    async fn seed_job(store: &MemoryStore) -> Uuid {
        store
            .create_job(new_job("Backend Engineer", &["Go", "SQL"]))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let oracle = Arc::new(ScriptedOracle::always(50.0));
        let err = analyze_job(store, oracle, &ActiveRuns::new(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_resumes_gives_warning_without_oracle_calls() {
        let store = Arc::new(MemoryStore::new());
        let job_id = seed_job(&store).await;
        let oracle = Arc::new(ScriptedOracle::always(50.0));

        let response = analyze_job(store, oracle.clone(), &ActiveRuns::new(), job_id)
            .await
            .unwrap();
        assert_eq!(response.alert.kind, AlertKind::Warning);
        assert_eq!(response.alert.message, NO_CANDIDATES_MESSAGE);
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_in_progress_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let job_id = seed_job(&store).await;
        let runs = ActiveRuns::new();
        let _held = runs.try_start(job_id).unwrap();

        let err = analyze_job(store, Arc::new(ScriptedOracle::always(50.0)), &runs, job_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_guard_released_after_run() {
        let store = Arc::new(MemoryStore::new());
        let job_id = seed_job(&store).await;
        store
            .create_resume(new_resume("Ada", &["Go"], "Ada built Go services"))
            .await
            .unwrap();
        let runs = ActiveRuns::new();
        analyze_job(store, Arc::new(ScriptedOracle::always(50.0)), &runs, job_id)
            .await
            .unwrap();
        assert!(!runs.is_running(job_id));
    }

    /// Two resumes, a job, two runs: the second run creates nothing and leaves
    /// the first run's analyses untouched.
    #[tokio::test]
    async fn test_two_runs_end_to_end() {
        let store = Arc::new(MemoryStore::new());
        let r1 = store
            .create_resume(new_resume("Ada", &["Go", "SQL"], "Ada built Go services"))
            .await
            .unwrap();
        let r2 = store
            .create_resume(new_resume("Grace", &["COBOL"], "Grace wrote compilers"))
            .await
            .unwrap();
        let job_id = store
            .create_job(NewJobDescription {
                required_skills: vec!["Go".to_string()],
                ..new_job("Backend Engineer", &[])
            })
            .await
            .unwrap()
            .id;

        let oracle = Arc::new(
            ScriptedOracle::always(40.0)
                .scoring("Ada built Go services", 88.0)
                .scoring("Grace wrote compilers", 55.0),
        );
        let runs = ActiveRuns::new();

        let first = analyze_job(store.clone(), oracle.clone(), &runs, job_id)
            .await
            .unwrap();
        assert_eq!((first.summary.analyzed, first.summary.skipped), (2, 0));
        assert_eq!(first.alert.kind, AlertKind::Success);
        assert_eq!(
            first.alert.message,
            "Successfully analyzed 2 new candidates for Backend Engineer."
        );

        let before = store.list_analyses(AnalysisOrder::NewestFirst).await.unwrap();

        let second = analyze_job(store.clone(), oracle.clone(), &runs, job_id)
            .await
            .unwrap();
        assert_eq!((second.summary.analyzed, second.summary.skipped), (0, 2));
        assert_eq!(
            second.alert.message,
            "2 candidates were already analyzed for Backend Engineer."
        );
        assert_eq!(oracle.calls(), 2);

        let after = store.list_analyses(AnalysisOrder::NewestFirst).await.unwrap();
        assert_eq!(before, after, "existing analyses must not be overwritten");

        let ada = store
            .find_analyses(AnalysisFilter::pair(r1.id, job_id))
            .await
            .unwrap();
        assert_eq!(ada.len(), 1);
        assert_eq!(ada[0].report.overall_score, 88.0);
        let grace = store
            .find_analyses(AnalysisFilter::pair(r2.id, job_id))
            .await
            .unwrap();
        assert_eq!(grace[0].report.overall_score, 55.0);
    }

    /// Go/SQL and Java candidates scored 90 and 40, then read back through the
    /// candidate table the way the dashboard lists them.
    #[tokio::test]
    async fn test_scored_candidates_show_in_candidate_table() {
        let store = Arc::new(MemoryStore::new());
        let r1 = store
            .create_resume(new_resume("Ada", &["Go", "SQL"], "Ada: Go and SQL"))
            .await
            .unwrap();
        let r2 = store
            .create_resume(new_resume("James", &["Java"], "James: Java"))
            .await
            .unwrap();
        let job_id = seed_job(&store).await;
        let oracle = Arc::new(
            ScriptedOracle::always(0.0)
                .scoring("Ada: Go and SQL", 90.0)
                .scoring("James: Java", 40.0),
        );
        let runs = ActiveRuns::new();

        let first = analyze_job(store.clone(), oracle.clone(), &runs, job_id)
            .await
            .unwrap();
        assert_eq!(first.summary.analyzed, 2);

        let resumes = store.list_resumes().await.unwrap();
        let analyses = store.list_analyses(AnalysisOrder::NewestFirst).await.unwrap();
        let query = CandidateQuery {
            job_id: Some(job_id),
            ..Default::default()
        };
        let table = filter_and_sort(&resumes, &analyses, &query);
        assert_eq!(table.total, 2);

        let row = |id: Uuid| table.rows.iter().find(|r| r.resume_id == id).unwrap();
        assert_eq!(row(r1.id).top_score_display, "90%");
        assert_eq!(row(r1.id).band, MatchBand::Good);
        assert_eq!(row(r2.id).top_score_display, "40%");
        assert_eq!(row(r2.id).band, MatchBand::Poor);

        let rerun = analyze_job(store.clone(), oracle.clone(), &runs, job_id)
            .await
            .unwrap();
        assert_eq!((rerun.summary.analyzed, rerun.summary.skipped), (0, 2));
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_resume_payload_reaches_oracle_as_text() {
        let store = Arc::new(MemoryStore::new());
        let job_id = seed_job(&store).await;
        let resume: NewResume = new_resume("Ada", &["Go"], "only this text");
        store.create_resume(resume).await.unwrap();
        let oracle = Arc::new(ScriptedOracle::always(10.0));

        analyze_job(store, oracle.clone(), &ActiveRuns::new(), job_id)
            .await
            .unwrap();
        assert_eq!(oracle.seen_texts(), vec!["only this text".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_finishes_after_caller_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let job_id = seed_job(&store).await;
        for name in ["A", "B", "C", "D", "E"] {
            store
                .create_resume(new_resume(name, &["Go"], &format!("{name} writes Go")))
                .await
                .unwrap();
        }
        let oracle = Arc::new(ScriptedOracle::always(70.0).with_delay(Duration::from_millis(100)));
        let runs = ActiveRuns::new();

        // The caller gives up partway through the batch.
        let call = analyze_job(store.clone(), oracle.clone(), &runs, job_id);
        let gave_up = tokio::time::timeout(Duration::from_millis(250), call).await;
        assert!(gave_up.is_err());
        assert!(runs.is_running(job_id));

        tokio::time::sleep(Duration::from_secs(1)).await;

        let analyses = store.list_analyses(AnalysisOrder::NewestFirst).await.unwrap();
        assert_eq!(analyses.len(), 5);
        assert_eq!(oracle.calls(), 5);
        assert!(!runs.is_running(job_id));
    }
}
