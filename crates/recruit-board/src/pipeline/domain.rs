use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle status the ATS uses for open job openings.
pub const JOB_STATUS_IN_PROGRESS: &str = "In-progress";

/// Lifecycle status written when a job opening is archived.
pub const JOB_STATUS_ARCHIVED: &str = "Inactive";

/// Identifier wrapper for job openings held by the ATS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

/// Identifier wrapper for candidates held by the ATS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical candidate shape accepted by the classifier and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Full candidate record returned by the detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_employer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<NaiveDateTime>,
}

impl From<Candidate> for CandidateDetail {
    fn from(candidate: Candidate) -> Self {
        Self {
            candidate,
            city: None,
            current_job_title: None,
            current_employer: None,
            experience_years: None,
            skills: Vec::new(),
            highest_qualification: None,
            additional_info: None,
            modified_at: None,
        }
    }
}

/// Job opening as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub status: String,
}

impl JobPosting {
    /// Anything other than the in-progress sentinel counts as archived.
    pub fn is_active(&self) -> bool {
        self.status == JOB_STATUS_IN_PROGRESS
    }
}

fn default_industry() -> String {
    "IT Services".to_string()
}

fn default_job_type() -> String {
    "Full Time".to_string()
}

/// Draft submitted when publishing a new job opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub location: String,
    pub description: String,
    #[serde(default = "default_industry")]
    pub industry: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_required: Option<String>,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

impl NewJobPosting {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            description: description.into(),
            industry: default_industry(),
            job_type: default_job_type(),
            salary_range: None,
            experience_required: None,
            target_date,
            client_name: None,
        }
    }

    /// Reject drafts missing the fields the ATS requires.
    pub fn validate(&self) -> Result<(), JobDraftError> {
        let required = [
            ("title", &self.title),
            ("location", &self.location),
            ("description", &self.description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(JobDraftError::MissingField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobDraftError {
    #[error("job draft is missing required field `{0}`")]
    MissingField(&'static str),
}
