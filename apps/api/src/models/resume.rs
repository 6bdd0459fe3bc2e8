use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub impact: Option<String>,
}

/// Structured fields pulled out of an uploaded resume file.
///
/// Every field is optional on the wire: the extraction call is free to omit
/// whatever it could not find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedResume {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub extracted_skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Insert payload for a resume. Resumes are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResume {
    pub candidate_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub extracted_text: String,
    pub extracted_skills: Vec<String>,
    pub experience_years: f64,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub file_url: String,
}

impl NewResume {
    /// Builds the insert payload from extraction output.
    /// `fallback_text` is used when the extraction did not echo the resume text back.
    pub fn from_extraction(
        extracted: ExtractedResume,
        file_url: String,
        fallback_text: Option<&str>,
    ) -> Self {
        let extracted_text = extracted
            .extracted_text
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                fallback_text
                    .filter(|t| !t.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Text extraction failed".to_string());

        Self {
            candidate_name: extracted
                .candidate_name
                .unwrap_or_else(|| "Unknown candidate".to_string()),
            email: extracted.email.unwrap_or_default(),
            phone: extracted.phone.filter(|p| !p.trim().is_empty()),
            extracted_text,
            extracted_skills: extracted.extracted_skills,
            experience_years: extracted.experience_years.unwrap_or(0.0),
            education: extracted.education,
            work_experience: extracted.work_experience,
            projects: extracted.projects,
            file_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub extracted_text: String,
    pub extracted_skills: Vec<String>,
    pub experience_years: f64,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub file_url: String,
    pub created_date: DateTime<Utc>,
}

impl Resume {
    pub fn from_new(id: Uuid, new: NewResume, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            candidate_name: new.candidate_name,
            email: new.email,
            phone: new.phone,
            extracted_text: new.extracted_text,
            extracted_skills: new.extracted_skills,
            experience_years: new.experience_years,
            education: new.education,
            work_experience: new.work_experience,
            projects: new.projects,
            file_url: new.file_url,
            created_date,
        }
    }
}
