use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Analysis, JobDescription, Resume};
use crate::presentation::bands::{bias_band, BandedScore, BiasBand};

const TOP_CANDIDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub resumes: usize,
    pub active_jobs: usize,
    pub analyses: usize,
    pub average_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCandidate {
    pub analysis_id: Uuid,
    pub resume_id: Uuid,
    pub candidate_name: String,
    pub job_id: Uuid,
    pub job_title: String,
    pub overall: BandedScore,
    pub bias_score: f64,
    pub bias_band: BiasBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub top_candidates: Vec<TopCandidate>,
}

/// `analyses` must be ordered by overall score, highest first.
pub fn dashboard_summary(
    resumes: &[Resume],
    jobs: &[JobDescription],
    analyses: &[Analysis],
) -> DashboardSummary {
    let average_score = if analyses.is_empty() {
        0
    } else {
        let total: f64 = analyses.iter().map(|a| a.report.overall_score).sum();
        (total / analyses.len() as f64).round() as i64
    };

    let stats = DashboardStats {
        resumes: resumes.len(),
        active_jobs: jobs.iter().filter(|j| j.is_active).count(),
        analyses: analyses.len(),
        average_score,
    };

    let resumes_by_id: HashMap<Uuid, &Resume> = resumes.iter().map(|r| (r.id, r)).collect();
    let jobs_by_id: HashMap<Uuid, &JobDescription> = jobs.iter().map(|j| (j.id, j)).collect();

    // Slice first, then drop orphans: the table may show fewer than five rows.
    let top_candidates = analyses
        .iter()
        .take(TOP_CANDIDATES)
        .filter_map(|a| {
            let resume = resumes_by_id.get(&a.resume_id)?;
            let job = jobs_by_id.get(&a.job_description_id)?;
            Some(TopCandidate {
                analysis_id: a.id,
                resume_id: resume.id,
                candidate_name: resume.candidate_name.clone(),
                job_id: job.id,
                job_title: job.title.clone(),
                overall: BandedScore::new(a.report.overall_score),
                bias_score: a.report.bias_score,
                bias_band: bias_band(a.report.bias_score),
            })
        })
        .collect();

    DashboardSummary {
        stats,
        top_candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::bands::MatchBand;
    use crate::testing::{analysis, job, resume};

    #[test]
    fn test_empty_dashboard() {
        let summary = dashboard_summary(&[], &[], &[]);
        assert_eq!(summary.stats.average_score, 0);
        assert!(summary.top_candidates.is_empty());
    }

    #[test]
    fn test_stats_and_top_five() {
        let ada = resume("Ada", &["Go"], "ada");
        let mut closed = job("Closed role", &[]);
        closed.is_active = false;
        let open = job("Backend Engineer", &["Go"]);

        let mut analyses: Vec<Analysis> = [95.0, 88.0, 71.0, 64.0, 50.0, 20.0]
            .iter()
            .map(|s| analysis(ada.id, open.id, *s))
            .collect();
        // Orphan in the top five: its resume no longer exists.
        analyses.insert(1, analysis(Uuid::new_v4(), open.id, 90.0));

        let summary = dashboard_summary(&[ada], &[open, closed], &analyses);
        assert_eq!(summary.stats.resumes, 1);
        assert_eq!(summary.stats.active_jobs, 1);
        assert_eq!(summary.stats.analyses, 7);
        // (95+90+88+71+64+50+20) / 7 = 68.28
        assert_eq!(summary.stats.average_score, 68);

        let scores: Vec<f64> = summary
            .top_candidates
            .iter()
            .map(|c| c.overall.score)
            .collect();
        assert_eq!(scores, vec![95.0, 88.0, 71.0, 64.0]);
        assert_eq!(summary.top_candidates[0].overall.band, MatchBand::Good);
        assert_eq!(summary.top_candidates[0].overall.display, "95%");
        assert_eq!(summary.top_candidates[0].bias_band, BiasBand::Low);
        assert_eq!(summary.top_candidates[0].job_title, "Backend Engineer");
    }
}
