use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, FAIRNESS_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::{AnalysisReport, JobDescription};
use crate::oracle::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::oracle::AnalysisOracle;

/// Scores one resume against one job with a single structured LLM call.
pub struct LlmAnalysisOracle {
    llm: LlmClient,
}

impl LlmAnalysisOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnalysisOracle for LlmAnalysisOracle {
    async fn analyze(
        &self,
        job: &JobDescription,
        resume_text: &str,
    ) -> Result<AnalysisReport, AppError> {
        let prompt = build_analysis_prompt(job, resume_text)?;
        debug!("Analysis prompt for job {} is {} bytes", job.id, prompt.len());

        self.llm
            .call_json::<AnalysisReport>(&prompt, ANALYSIS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))
    }
}

/// JSON schema sent with every analysis request. Mirrors `AnalysisReport`.
pub fn analysis_schema() -> Value {
    let scored = json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "reasoning": { "type": "string" }
        }
    });
    let strings = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "overall_score": { "type": "number" },
            "hard_skills_score": { "type": "number" },
            "semantic_fit_score": { "type": "number" },
            "bias_score": { "type": "number" },
            "matched_skills": strings,
            "missing_skills": strings,
            "inferred_skills": strings,
            "experience_relevance": scored,
            "education_fit": scored,
            "projects_impact": scored,
            "bias_flags": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string" },
                        "description": { "type": "string" },
                        "severity": { "type": "string", "enum": ["low", "medium", "high"] }
                    }
                }
            },
            "recommendations": strings,
            "detailed_analysis": { "type": "string" },
            "relevance_heatmap_data": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "snippet": { "type": "string" },
                        "score": { "type": "number" },
                        "reasoning": { "type": "string" }
                    }
                }
            },
            "debiased_text": { "type": "string" }
        },
        "required": [
            "overall_score",
            "hard_skills_score",
            "semantic_fit_score",
            "bias_score",
            "relevance_heatmap_data",
            "debiased_text"
        ]
    })
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none listed)".to_string()
    } else {
        items.join(", ")
    }
}

/// Fills the analysis template with job fields and the resume's extracted text.
pub fn build_analysis_prompt(job: &JobDescription, resume_text: &str) -> Result<String, AppError> {
    let schema = serde_json::to_string_pretty(&analysis_schema())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize schema: {e}")))?;

    let required_skills = join_or_none(&job.required_skills);
    let preferred_skills = join_or_none(&job.preferred_skills);
    let experience_level = job.experience_level.map_or("unspecified", |l| l.as_str());

    Ok(fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("title", job.title.as_str()),
            ("company", job.company.as_str()),
            ("experience_level", experience_level),
            ("required_skills", required_skills.as_str()),
            ("preferred_skills", preferred_skills.as_str()),
            ("description", job.description.as_str()),
            ("resume_text", resume_text),
            ("fairness_instruction", FAIRNESS_INSTRUCTION),
            ("schema", schema.as_str()),
        ],
    ))
}
