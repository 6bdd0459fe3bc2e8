//! Entity Store: persistence for resumes, job descriptions and analyses.
//!
//! The rest of the service only sees `EntityStore`. `PgStore` is the production
//! backend; `MemoryStore` backs local runs (`STORE_BACKEND=memory`) and tests.
//! Neither enforces uniqueness of (resume, job) analyses: that is the
//! orchestrator's job.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Analysis, JobDescription, NewAnalysis, NewJobDescription, NewResume, Resume,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Ordering for `list_analyses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOrder {
    NewestFirst,
    HighestScoreFirst,
}

/// Equality filter over analyses. `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisFilter {
    pub resume_id: Option<Uuid>,
    pub job_description_id: Option<Uuid>,
}

impl AnalysisFilter {
    pub fn pair(resume_id: Uuid, job_description_id: Uuid) -> Self {
        Self {
            resume_id: Some(resume_id),
            job_description_id: Some(job_description_id),
        }
    }

    pub fn matches(&self, analysis: &Analysis) -> bool {
        self.resume_id.map_or(true, |id| id == analysis.resume_id)
            && self
                .job_description_id
                .map_or(true, |id| id == analysis.job_description_id)
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError>;
    /// Newest first.
    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError>;

    async fn create_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError>;
    /// Newest first.
    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError>;

    async fn create_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError>;
    async fn get_analysis(&self, id: Uuid) -> Result<Option<Analysis>, AppError>;
    async fn list_analyses(&self, order: AnalysisOrder) -> Result<Vec<Analysis>, AppError>;
    /// Newest first.
    async fn find_analyses(&self, filter: AnalysisFilter) -> Result<Vec<Analysis>, AppError>;
}
