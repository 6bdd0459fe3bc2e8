use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{Analysis, Resume};
use crate::presentation::bands::{format_percent, match_band, MatchBand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CandidateName,
    OverallScore,
    #[default]
    CreatedDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Clicking a column: ascending first, descending on a second click of the same column.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }
}

/// Candidate list view state, passed explicitly on every request.
/// A parameter sent with an empty value (`?job_id=`) counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_from_str")]
    pub job_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<SortKey>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub direction: Option<SortDirection>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            T::deserialize(raw.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

fn blank_as_none_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

impl CandidateQuery {
    pub fn sort_config(&self) -> SortConfig {
        let default = SortConfig::default();
        SortConfig {
            key: self.sort.unwrap_or(default.key),
            direction: self.direction.unwrap_or(default.direction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub resume_id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub extracted_skills: Vec<String>,
    pub experience_years: f64,
    pub created_date: DateTime<Utc>,
    pub latest_analysis_id: Option<Uuid>,
    pub top_score: Option<f64>,
    pub top_score_display: String,
    pub band: MatchBand,
    pub band_label: &'static str,
}

impl CandidateRow {
    fn sort_score(&self) -> f64 {
        self.top_score.unwrap_or(-1.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateList {
    pub total: usize,
    pub sort: SortConfig,
    pub rows: Vec<CandidateRow>,
}

/// Builds the candidate table.
///
/// `analyses` must be ordered newest first: a resume's latest analysis is the first
/// one listed for it, whichever job it belongs to.
pub fn filter_and_sort(
    resumes: &[Resume],
    analyses: &[Analysis],
    query: &CandidateQuery,
) -> CandidateList {
    let mut latest: HashMap<Uuid, &Analysis> = HashMap::new();
    for analysis in analyses {
        latest.entry(analysis.resume_id).or_insert(analysis);
    }

    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let for_job: Option<HashSet<Uuid>> = query.job_id.map(|job_id| {
        analyses
            .iter()
            .filter(|a| a.job_description_id == job_id)
            .map(|a| a.resume_id)
            .collect()
    });

    let mut rows: Vec<CandidateRow> = resumes
        .iter()
        .filter(|r| needle.as_deref().map_or(true, |n| matches_search(r, n)))
        .filter(|r| for_job.as_ref().map_or(true, |ids| ids.contains(&r.id)))
        .map(|r| {
            let analysis = latest.get(&r.id);
            let top_score = analysis.map(|a| a.report.overall_score);
            let band = match_band(top_score);
            CandidateRow {
                resume_id: r.id,
                candidate_name: r.candidate_name.clone(),
                email: r.email.clone(),
                extracted_skills: r.extracted_skills.clone(),
                experience_years: r.experience_years,
                created_date: r.created_date,
                latest_analysis_id: analysis.map(|a| a.id),
                top_score,
                top_score_display: format_percent(top_score),
                band,
                band_label: band.label(),
            }
        })
        .collect();

    let sort = query.sort_config();
    rows.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::CandidateName => a.candidate_name.cmp(&b.candidate_name),
            SortKey::OverallScore => a
                .sort_score()
                .partial_cmp(&b.sort_score())
                .unwrap_or(Ordering::Equal),
            SortKey::CreatedDate => a.created_date.cmp(&b.created_date),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    CandidateList {
        total: resumes.len(),
        sort,
        rows,
    }
}

fn matches_search(resume: &Resume, needle: &str) -> bool {
    resume.candidate_name.to_lowercase().contains(needle)
        || resume.email.to_lowercase().contains(needle)
        || resume
            .extracted_skills
            .iter()
            .any(|s| s.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{analysis, resume};
    use axum::extract::Query;
    use chrono::Duration;

    fn fixture() -> (Vec<Resume>, Vec<Analysis>, Uuid, Uuid) {
        let now = Utc::now();
        let mut ada = resume("Ada", &["Rust", "Go"], "ada");
        ada.created_date = now - Duration::days(2);
        let mut grace = resume("Grace", &["COBOL"], "grace");
        grace.created_date = now - Duration::days(1);
        let mut linus = resume("Linus", &["C"], "linus");
        linus.created_date = now;

        let (backend, compilers) = (Uuid::new_v4(), Uuid::new_v4());
        // Newest first.
        let analyses = vec![
            analysis(grace.id, compilers, 91.0),
            analysis(ada.id, backend, 72.0),
            analysis(grace.id, backend, 40.0),
        ];
        (vec![linus, grace, ada], analyses, backend, compilers)
    }

    fn names(list: &CandidateList) -> Vec<&str> {
        list.rows.iter().map(|r| r.candidate_name.as_str()).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let (resumes, analyses, _, _) = fixture();
        let list = filter_and_sort(&resumes, &analyses, &CandidateQuery::default());
        assert_eq!(names(&list), vec!["Linus", "Grace", "Ada"]);
        assert_eq!(list.total, 3);
    }

    #[test]
    fn test_latest_analysis_is_newest_any_job() {
        let (resumes, analyses, _, _) = fixture();
        let list = filter_and_sort(&resumes, &analyses, &CandidateQuery::default());
        let grace = &list.rows[1];
        assert_eq!(grace.top_score, Some(91.0));
        assert_eq!(grace.top_score_display, "91%");
        assert_eq!(grace.band, MatchBand::Good);
        let linus = &list.rows[0];
        assert_eq!(linus.top_score_display, "N/A");
        assert_eq!(linus.band, MatchBand::Unknown);
        assert_eq!(linus.band_label, "not analyzed");
    }

    fn parse_query(uri: &str) -> Option<CandidateQuery> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        Query::<CandidateQuery>::try_from_uri(&uri).ok().map(|q| q.0)
    }

    #[test]
    fn test_blank_query_parameters_are_absent() {
        let query = parse_query("/candidates?search=&job_id=&sort=&direction=").unwrap();
        assert_eq!(
            query,
            CandidateQuery {
                search: Some(String::new()),
                ..Default::default()
            }
        );
        assert_eq!(query.sort_config(), SortConfig::default());
    }

    #[test]
    fn test_query_parameters_parse() {
        let job_id = Uuid::new_v4();
        let query = parse_query(&format!(
            "/candidates?job_id={job_id}&sort=overall_score&direction=asc"
        ))
        .unwrap();
        assert_eq!(query.job_id, Some(job_id));
        assert_eq!(query.sort, Some(SortKey::OverallScore));
        assert_eq!(query.direction, Some(SortDirection::Asc));

        assert!(parse_query("/candidates?sort=salary").is_none());
        assert!(parse_query("/candidates?job_id=not-a-uuid").is_none());
    }

    #[test]
    fn test_search_matches_name_email_and_skill() {
        let (resumes, analyses, _, _) = fixture();
        let by_skill = CandidateQuery {
            search: Some("cob".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&resumes, &analyses, &by_skill)), vec!["Grace"]);

        let by_email = CandidateQuery {
            search: Some("ADA@EXAMPLE".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&resumes, &analyses, &by_email)), vec!["Ada"]);
    }

    #[test]
    fn test_job_filter_keeps_resumes_analyzed_for_job() {
        let (resumes, analyses, backend, compilers) = fixture();
        let query = CandidateQuery {
            job_id: Some(backend),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&resumes, &analyses, &query)), vec!["Grace", "Ada"]);

        let query = CandidateQuery {
            job_id: Some(compilers),
            ..Default::default()
        };
        let list = filter_and_sort(&resumes, &analyses, &query);
        assert_eq!(names(&list), vec!["Grace"]);
    }

    #[test]
    fn test_score_sort_puts_unscored_last_when_descending() {
        let (resumes, analyses, _, _) = fixture();
        let query = CandidateQuery {
            sort: Some(SortKey::OverallScore),
            direction: Some(SortDirection::Desc),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_and_sort(&resumes, &analyses, &query)),
            vec!["Grace", "Ada", "Linus"]
        );
    }

    #[test]
    fn test_name_sort_ascending() {
        let (resumes, analyses, _, _) = fixture();
        let query = CandidateQuery {
            sort: Some(SortKey::CandidateName),
            direction: Some(SortDirection::Asc),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_and_sort(&resumes, &analyses, &query)),
            vec!["Ada", "Grace", "Linus"]
        );
    }

    #[test]
    fn test_toggle() {
        let config = SortConfig::default().toggle(SortKey::OverallScore);
        assert_eq!(config.direction, SortDirection::Asc);
        let config = config.toggle(SortKey::OverallScore);
        assert_eq!(config.direction, SortDirection::Desc);
        let config = config.toggle(SortKey::OverallScore);
        assert_eq!(config.direction, SortDirection::Asc);
        let config = config.toggle(SortKey::CandidateName);
        assert_eq!(config.key, SortKey::CandidateName);
        assert_eq!(config.direction, SortDirection::Asc);
    }
}
