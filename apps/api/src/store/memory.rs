use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Analysis, JobDescription, NewAnalysis, NewJobDescription, NewResume, Resume,
};
use crate::store::{AnalysisFilter, AnalysisOrder, EntityStore};

#[derive(Default)]
struct Tables {
    resumes: Vec<Resume>,
    jobs: Vec<JobDescription>,
    analyses: Vec<Analysis>,
}

/// Process-local store. Records live in insertion order; reads return clones.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; records created in the same instant keep reverse insertion order.
fn newest_first<T: Clone>(rows: &[T], created: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created(b).cmp(&created(a)));
    out
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let row = Resume::from_new(Uuid::new_v4(), resume, Utc::now());
        self.tables.write().await.resumes.push(row.clone());
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.resumes, |r| r.created_date))
    }

    async fn create_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError> {
        let row = JobDescription::from_new(Uuid::new_v4(), job, Utc::now());
        self.tables.write().await.jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.jobs, |j| j.created_date))
    }

    async fn create_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError> {
        let row = Analysis::from_new(Uuid::new_v4(), analysis, Utc::now());
        self.tables.write().await.analyses.push(row.clone());
        Ok(row)
    }

    async fn get_analysis(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn list_analyses(&self, order: AnalysisOrder) -> Result<Vec<Analysis>, AppError> {
        let tables = self.tables.read().await;
        let mut rows = newest_first(&tables.analyses, |a| a.created_date);
        if order == AnalysisOrder::HighestScoreFirst {
            rows.sort_by(|a, b| {
                b.report
                    .overall_score
                    .partial_cmp(&a.report.overall_score)
                    .unwrap_or(Ordering::Equal)
            });
        }
        Ok(rows)
    }

    async fn find_analyses(&self, filter: AnalysisFilter) -> Result<Vec<Analysis>, AppError> {
        let tables = self.tables.read().await;
        let matching: Vec<Analysis> = tables
            .analyses
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |a| a.created_date))
    }
}
