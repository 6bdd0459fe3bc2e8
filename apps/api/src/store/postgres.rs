use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::ExperienceLevel;
use crate::models::resume::{Education, Project, WorkExperience};
use crate::models::{
    Analysis, AnalysisReport, JobDescription, NewAnalysis, NewJobDescription, NewResume, Resume,
};
use crate::store::{AnalysisFilter, AnalysisOrder, EntityStore};

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    candidate_name: String,
    email: String,
    phone: Option<String>,
    extracted_text: String,
    extracted_skills: Vec<String>,
    experience_years: f64,
    education: Json<Vec<Education>>,
    work_experience: Json<Vec<WorkExperience>>,
    projects: Json<Vec<Project>>,
    file_url: String,
    created_date: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            candidate_name: row.candidate_name,
            email: row.email,
            phone: row.phone,
            extracted_text: row.extracted_text,
            extracted_skills: row.extracted_skills,
            experience_years: row.experience_years,
            education: row.education.0,
            work_experience: row.work_experience.0,
            projects: row.projects.0,
            file_url: row.file_url,
            created_date: row.created_date,
        }
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    company: String,
    description: String,
    required_skills: Vec<String>,
    preferred_skills: Vec<String>,
    experience_level: Option<String>,
    department: Option<String>,
    location: Option<String>,
    salary_range: Option<String>,
    is_active: bool,
    created_date: DateTime<Utc>,
}

impl From<JobRow> for JobDescription {
    fn from(row: JobRow) -> Self {
        JobDescription {
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            required_skills: row.required_skills,
            preferred_skills: row.preferred_skills,
            experience_level: row.experience_level.as_deref().and_then(ExperienceLevel::parse),
            department: row.department,
            location: row.location,
            salary_range: row.salary_range,
            is_active: row.is_active,
            created_date: row.created_date,
        }
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: Uuid,
    resume_id: Uuid,
    job_description_id: Uuid,
    report: Json<AnalysisReport>,
    created_date: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Analysis {
            id: row.id,
            resume_id: row.resume_id,
            job_description_id: row.job_description_id,
            report: row.report.0,
            created_date: row.created_date,
        }
    }
}

const ANALYSIS_COLUMNS: &str = "id, resume_id, job_description_id, report, created_date";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, candidate_name, email, phone, extracted_text, extracted_skills,
                 experience_years, education, work_experience, projects, file_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&resume.candidate_name)
        .bind(&resume.email)
        .bind(&resume.phone)
        .bind(&resume.extracted_text)
        .bind(&resume.extracted_skills)
        .bind(resume.experience_years)
        .bind(Json(&resume.education))
        .bind(Json(&resume.work_experience))
        .bind(Json(&resume.projects))
        .bind(&resume.file_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted resume {} ({})", row.id, row.candidate_name);
        Ok(row.into())
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        let rows =
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO job_descriptions
                (id, title, company, description, required_skills, preferred_skills,
                 experience_level, department, location, salary_range, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.preferred_skills)
        .bind(job.experience_level.map(|l| l.as_str()))
        .bind(&job.department)
        .bind(&job.location)
        .bind(&job.salary_range)
        .bind(job.is_active)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job description {} ({})", row.id, row.title);
        Ok(row.into())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM job_descriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM job_descriptions ORDER BY created_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            r#"
            INSERT INTO analyses (id, resume_id, job_description_id, overall_score, report)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ANALYSIS_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(analysis.resume_id)
        .bind(analysis.job_description_id)
        .bind(analysis.report.overall_score)
        .bind(Json(&analysis.report))
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted analysis {} for resume {} / job {}",
            row.id, row.resume_id, row.job_description_id
        );
        Ok(row.into())
    }

    async fn get_analysis(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_analyses(&self, order: AnalysisOrder) -> Result<Vec<Analysis>, AppError> {
        let order_by = match order {
            AnalysisOrder::NewestFirst => "created_date DESC",
            AnalysisOrder::HighestScoreFirst => "overall_score DESC, created_date DESC",
        };
        let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses ORDER BY {order_by}"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_analyses(&self, filter: AnalysisFilter) -> Result<Vec<Analysis>, AppError> {
        let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
            r#"
            SELECT {ANALYSIS_COLUMNS} FROM analyses
            WHERE ($1::uuid IS NULL OR resume_id = $1)
              AND ($2::uuid IS NULL OR job_description_id = $2)
            ORDER BY created_date DESC
            "#
        ))
        .bind(filter.resume_id)
        .bind(filter.job_description_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
