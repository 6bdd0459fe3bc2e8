use serde::Serialize;
use uuid::Uuid;

use crate::models::{analysis::BiasFlag, Analysis, JobDescription, Resume};
use crate::presentation::bands::{bias_band, BandedScore, BiasBand};
use crate::presentation::highlight::{highlight, HighlightedText};

const RADAR_FULL_MARK: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownItem {
    pub name: &'static str,
    #[serde(flatten)]
    pub score: BandedScore,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub subject: &'static str,
    pub value: f64,
    pub full_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillsView {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub inferred: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDetails {
    pub analysis_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub overall: BandedScore,
    pub breakdown: Vec<BreakdownItem>,
    pub bias_score: f64,
    pub bias_band: BiasBand,
    pub bias_label: &'static str,
    pub radar: Vec<RadarAxis>,
    pub skills: SkillsView,
    pub bias_flags: Vec<BiasFlag>,
    pub recommendations: Vec<String>,
    pub detailed_analysis: Option<String>,
    pub highlighted_text: HighlightedText,
    pub debiased_text: String,
    pub raw_text: String,
}

pub fn analysis_details(
    analysis: &Analysis,
    resume: &Resume,
    job: &JobDescription,
) -> AnalysisDetails {
    let report = &analysis.report;
    let reasoning = |v: &Option<crate::models::analysis::ScoredReasoning>| {
        v.as_ref()
            .map(|s| s.reasoning.clone())
            .filter(|r| !r.is_empty())
    };

    let breakdown = vec![
        BreakdownItem {
            name: "Hard Skills",
            score: BandedScore::new(report.hard_skills_score),
            reasoning: None,
        },
        BreakdownItem {
            name: "Semantic Fit",
            score: BandedScore::new(report.semantic_fit_score),
            reasoning: None,
        },
        BreakdownItem {
            name: "Experience",
            score: BandedScore::new(report.experience_score()),
            reasoning: reasoning(&report.experience_relevance),
        },
        BreakdownItem {
            name: "Projects",
            score: BandedScore::new(report.projects_score()),
            reasoning: reasoning(&report.projects_impact),
        },
    ];

    let radar = [
        ("Hard Skills", report.hard_skills_score),
        ("Semantic Fit", report.semantic_fit_score),
        ("Experience", report.experience_score()),
        ("Projects", report.projects_score()),
        ("Education", report.education_score()),
    ]
    .into_iter()
    .map(|(subject, value)| RadarAxis {
        subject,
        value,
        full_mark: RADAR_FULL_MARK,
    })
    .collect();

    let band = bias_band(report.bias_score);

    AnalysisDetails {
        analysis_id: analysis.id,
        candidate_name: resume.candidate_name.clone(),
        candidate_email: resume.email.clone(),
        job_id: job.id,
        job_title: job.title.clone(),
        company: job.company.clone(),
        overall: BandedScore::new(report.overall_score),
        breakdown,
        bias_score: report.bias_score,
        bias_band: band,
        bias_label: band.label(),
        radar,
        skills: SkillsView {
            matched: report.matched_skills.clone(),
            missing: report.missing_skills.clone(),
            inferred: report.inferred_skills.clone(),
        },
        bias_flags: report.bias_flags.clone(),
        recommendations: report.recommendations.clone(),
        detailed_analysis: report.detailed_analysis.clone(),
        highlighted_text: highlight(&resume.extracted_text, &report.relevance_heatmap_data),
        debiased_text: report.debiased_text_or_placeholder().to_string(),
        raw_text: resume.extracted_text.clone(),
    }
}
