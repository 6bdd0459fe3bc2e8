//! Fixtures and fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::FileStore;
use crate::models::{
    Analysis, AnalysisReport, ExtractedResume, HeatmapEntry, JobDescription, NewAnalysis,
    NewJobDescription, NewResume, Resume,
};
use crate::oracle::{AnalysisOracle, ExtractionOracle, ExtractionResult, FileKind, UploadedFile};
use crate::store::{AnalysisFilter, AnalysisOrder, EntityStore, MemoryStore};

pub fn report(score: f64) -> AnalysisReport {
    AnalysisReport {
        overall_score: score,
        hard_skills_score: score,
        semantic_fit_score: score,
        bias_score: 10.0,
        relevance_heatmap_data: Vec::new(),
        debiased_text: "[REDACTED] engineer".to_string(),
        matched_skills: Vec::new(),
        missing_skills: Vec::new(),
        inferred_skills: Vec::new(),
        experience_relevance: None,
        education_fit: None,
        projects_impact: None,
        bias_flags: Vec::new(),
        recommendations: Vec::new(),
        detailed_analysis: None,
    }
}

pub fn heatmap(entries: &[(&str, f64)]) -> Vec<HeatmapEntry> {
    entries
        .iter()
        .map(|(snippet, score)| HeatmapEntry {
            snippet: snippet.to_string(),
            score: *score,
            reasoning: format!("scored {score}"),
        })
        .collect()
}

pub fn new_job(title: &str, skills: &[&str]) -> NewJobDescription {
    NewJobDescription {
        title: title.to_string(),
        company: "Acme".to_string(),
        description: format!("{title} at Acme"),
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
        preferred_skills: Vec::new(),
        experience_level: None,
        department: None,
        location: None,
        salary_range: None,
        is_active: true,
    }
}

pub fn job(title: &str, skills: &[&str]) -> JobDescription {
    JobDescription::from_new(Uuid::new_v4(), new_job(title, skills), Utc::now())
}

pub fn new_resume(name: &str, skills: &[&str], text: &str) -> NewResume {
    NewResume {
        candidate_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        extracted_text: text.to_string(),
        extracted_skills: skills.iter().map(|s| s.to_string()).collect(),
        experience_years: 3.0,
        education: Vec::new(),
        work_experience: Vec::new(),
        projects: Vec::new(),
        file_url: format!("http://files/{name}.pdf"),
    }
}

pub fn resume(name: &str, skills: &[&str], text: &str) -> Resume {
    Resume::from_new(Uuid::new_v4(), new_resume(name, skills, text), Utc::now())
}

pub fn analysis(resume_id: Uuid, job_id: Uuid, score: f64) -> Analysis {
    Analysis::from_new(
        Uuid::new_v4(),
        NewAnalysis {
            resume_id,
            job_description_id: job_id,
            report: report(score),
        },
        Utc::now(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Oracles
// ────────────────────────────────────────────────────────────────────────────

/// Analysis oracle that scores by exact resume text and can be told to fail.
pub struct ScriptedOracle {
    default_score: f64,
    scores: HashMap<String, f64>,
    fail_on: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn always(score: f64) -> Self {
        Self {
            default_score: score,
            scores: HashMap::new(),
            fail_on: None,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Each call takes `delay` before answering, like a slow model.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn scoring(mut self, text: &str, score: f64) -> Self {
        self.scores.insert(text.to_string(), score);
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_texts(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisOracle for ScriptedOracle {
    async fn analyze(
        &self,
        _job: &JobDescription,
        resume_text: &str,
    ) -> Result<AnalysisReport, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(resume_text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.as_deref() == Some(resume_text) {
            return Err(AppError::Llm(format!("model rejected resume '{resume_text}'")));
        }
        let score = self
            .scores
            .get(resume_text)
            .copied()
            .unwrap_or(self.default_score);
        Ok(report(score))
    }
}

/// Extraction oracle that names the candidate after the file and can fail per file.
#[derive(Default)]
pub struct FakeExtraction {
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl FakeExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(file_name: &str) -> Self {
        Self {
            fail_on: Some(file_name.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionOracle for FakeExtraction {
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref() == Some(file.file_name.as_str()) {
            return Ok(ExtractionResult::error("unreadable scan"));
        }
        let (name, text) = match file.kind {
            FileKind::Image(_) => (file.file_name.split('.').next().unwrap_or_default(), None),
            FileKind::Pdf | FileKind::PlainText => (
                file.file_name.trim_end_matches(".txt"),
                Some(String::from_utf8_lossy(&file.bytes).into_owned()),
            ),
        };
        let output = ExtractedResume {
            candidate_name: Some(name.to_string()),
            email: Some(format!("{}@example.com", file.file_name)),
            extracted_text: text.is_none().then(|| format!("Transcribed from {}", file.file_name)),
            extracted_skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        Ok(ExtractionResult::success(output, text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Storage
// ────────────────────────────────────────────────────────────────────────────

/// File store that keeps nothing and hands back a predictable URL.
#[derive(Default)]
pub struct FakeFileStore {
    pub keys: Mutex<Vec<String>>,
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn put(&self, key: &str, _bytes: Bytes, _content_type: &str) -> Result<String, AppError> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(format!("http://files/{key}"))
    }
}

/// `MemoryStore` whose analysis writes always fail.
pub struct FlakyStore {
    inner: MemoryStore,
}

impl FlakyStore {
    pub fn failing_creates() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        self.inner.create_resume(resume).await
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        self.inner.get_resume(id).await
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        self.inner.list_resumes().await
    }

    async fn create_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError> {
        self.inner.create_job(job).await
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        self.inner.get_job(id).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError> {
        self.inner.list_jobs().await
    }

    async fn create_analysis(&self, _analysis: NewAnalysis) -> Result<Analysis, AppError> {
        Err(AppError::Storage("disk full".to_string()))
    }

    async fn get_analysis(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        self.inner.get_analysis(id).await
    }

    async fn list_analyses(&self, order: AnalysisOrder) -> Result<Vec<Analysis>, AppError> {
        self.inner.list_analyses(order).await
    }

    async fn find_analyses(&self, filter: AnalysisFilter) -> Result<Vec<Analysis>, AppError> {
        self.inner.find_analyses(filter).await
    }
}
