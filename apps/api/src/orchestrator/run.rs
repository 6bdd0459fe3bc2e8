use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{JobDescription, NewAnalysis, Resume};
use crate::oracle::AnalysisOracle;
use crate::store::{AnalysisFilter, EntityStore};

/// What happened to one resume during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Analyzed { analysis_id: Uuid },
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeOutcome {
    pub resume_id: Uuid,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub analyzed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Message of the failure that stopped the run, if any.
    pub error: Option<String>,
    /// Per-resume outcomes in processing order. Resumes after a failure are absent.
    pub outcomes: Vec<ResumeOutcome>,
}

impl RunSummary {
    fn record(&mut self, resume_id: Uuid, outcome: RunOutcome) {
        match &outcome {
            RunOutcome::Analyzed { .. } => self.analyzed += 1,
            RunOutcome::Skipped => self.skipped += 1,
            RunOutcome::Failed { error } => {
                self.failed += 1;
                self.error = Some(error.clone());
            }
        }
        self.outcomes.push(ResumeOutcome { resume_id, outcome });
    }

    /// The status banner shown after a run.
    pub fn alert(&self, job_title: &str) -> Alert {
        if let Some(error) = &self.error {
            let mut message = format!("Error during analysis: {error}");
            if self.analyzed + self.skipped > 0 {
                message.push_str(&format!(
                    " ({} analyzed, {} already analyzed before the failure)",
                    self.analyzed, self.skipped
                ));
            }
            return Alert::error(message);
        }

        let mut parts = Vec::new();
        if self.analyzed > 0 {
            parts.push(format!(
                "Successfully analyzed {} new candidate{}",
                self.analyzed,
                plural(self.analyzed)
            ));
        }
        if self.skipped > 0 {
            parts.push(format!(
                "{} candidate{} already analyzed",
                self.skipped,
                if self.skipped == 1 { " was" } else { "s were" }
            ));
        }
        if parts.is_empty() {
            parts.push("No new candidates to analyze".to_string());
        }
        // The job title closes the last sentence.
        Alert::success(format!("{} for {job_title}.", parts.join(". ")))
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

/// A single dismissable status banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

/// Analyzes every resume against `job`, in input order, one at a time.
///
/// Pairs that already have an analysis are skipped without calling the oracle.
/// The first oracle or store failure ends the run; the remaining resumes are not
/// attempted and no retry is made.
pub async fn run_analysis(
    store: &dyn EntityStore,
    oracle: &dyn AnalysisOracle,
    job: &JobDescription,
    resumes: &[Resume],
) -> RunSummary {
    info!(
        "Starting analysis run for job {} ({}) over {} resumes",
        job.id,
        job.title,
        resumes.len()
    );

    let mut summary = RunSummary::default();
    for resume in resumes {
        let outcome = analyze_one(store, oracle, job, resume).await;
        let failed = matches!(outcome, RunOutcome::Failed { .. });
        summary.record(resume.id, outcome);
        if failed {
            warn!(
                "Analysis run for job {} stopped at resume {}: {}",
                job.id,
                resume.id,
                summary.error.as_deref().unwrap_or_default()
            );
            break;
        }
    }

    info!(
        "Analysis run for job {} finished: analyzed={} skipped={} failed={}",
        job.id, summary.analyzed, summary.skipped, summary.failed
    );
    summary
}

async fn analyze_one(
    store: &dyn EntityStore,
    oracle: &dyn AnalysisOracle,
    job: &JobDescription,
    resume: &Resume,
) -> RunOutcome {
    match store
        .find_analyses(AnalysisFilter::pair(resume.id, job.id))
        .await
    {
        Ok(existing) if !existing.is_empty() => return RunOutcome::Skipped,
        Ok(_) => {}
        Err(e) => {
            return RunOutcome::Failed {
                error: e.to_string(),
            }
        }
    }

    let report = match oracle.analyze(job, &resume.extracted_text).await {
        Ok(report) => report,
        Err(e) => {
            return RunOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    match store
        .create_analysis(NewAnalysis {
            resume_id: resume.id,
            job_description_id: job.id,
            report,
        })
        .await
    {
        Ok(analysis) => RunOutcome::Analyzed {
            analysis_id: analysis.id,
        },
        Err(e) => RunOutcome::Failed {
            error: e.to_string(),
        },
    }
}
