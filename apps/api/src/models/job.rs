use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(ExperienceLevel::Entry),
            "mid" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            "executive" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Job description form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobDescription {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewJobDescription {
    /// Checks required fields and normalizes the free-text parts of the form.
    pub fn validate(mut self) -> Result<Self, AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }

        self.title = self.title.trim().to_string();
        self.company = self.company.trim().to_string();
        self.required_skills = normalize_skills(self.required_skills);
        self.preferred_skills = normalize_skills(self.preferred_skills);
        self.department = blank_to_none(self.department);
        self.location = blank_to_none(self.location);
        self.salary_range = blank_to_none(self.salary_range);
        Ok(self)
    }
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

impl JobDescription {
    pub fn from_new(id: Uuid, new: NewJobDescription, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            company: new.company,
            description: new.description,
            required_skills: new.required_skills,
            preferred_skills: new.preferred_skills,
            experience_level: new.experience_level,
            department: new.department,
            location: new.location,
            salary_range: new.salary_range,
            is_active: new.is_active,
            created_date,
        }
    }
}
