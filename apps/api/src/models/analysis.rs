//! Analysis records and the structured report returned by the analysis call.
//!
//! `AnalysisReport` is the one place where the shape of the LLM output is pinned
//! down. The six scoring/heatmap fields are required; everything else may be
//! omitted by the model and is defaulted here, so views never have to guess.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasFlag {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
}

/// A sub-score with the model's explanation for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredReasoning {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
}

/// One scored span of the resume text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    pub snippet: String,
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_score: f64,
    pub hard_skills_score: f64,
    pub semantic_fit_score: f64,
    /// Lower is better.
    pub bias_score: f64,
    pub relevance_heatmap_data: Vec<HeatmapEntry>,
    pub debiased_text: String,

    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub inferred_skills: Vec<String>,
    #[serde(default)]
    pub experience_relevance: Option<ScoredReasoning>,
    #[serde(default)]
    pub education_fit: Option<ScoredReasoning>,
    #[serde(default)]
    pub projects_impact: Option<ScoredReasoning>,
    #[serde(default)]
    pub bias_flags: Vec<BiasFlag>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub detailed_analysis: Option<String>,
}

impl AnalysisReport {
    pub fn experience_score(&self) -> f64 {
        sub_score(&self.experience_relevance)
    }

    pub fn education_score(&self) -> f64 {
        sub_score(&self.education_fit)
    }

    pub fn projects_score(&self) -> f64 {
        sub_score(&self.projects_impact)
    }

    /// The de-biased resume text, or a placeholder when the model returned nothing usable.
    pub fn debiased_text_or_placeholder(&self) -> &str {
        if self.debiased_text.trim().is_empty() {
            "De-biased version not available."
        } else {
            &self.debiased_text
        }
    }
}

fn sub_score(value: &Option<ScoredReasoning>) -> f64 {
    value.as_ref().map_or(0.0, |s| s.score)
}

/// Insert payload: the report keyed by the (resume, job) pair it was produced for.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub resume_id: Uuid,
    pub job_description_id: Uuid,
    pub report: AnalysisReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_description_id: Uuid,
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub created_date: DateTime<Utc>,
}

impl Analysis {
    pub fn from_new(id: Uuid, new: NewAnalysis, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            resume_id: new.resume_id,
            job_description_id: new.job_description_id,
            report: new.report,
            created_date,
        }
    }
}
