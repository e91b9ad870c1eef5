//! Normalization of ATS payloads into canonical records.
//!
//! Upstream field naming drifts between `First_Name`, `first_name` and
//! friends; ids arrive as strings or numbers. Every payload passes through
//! here before it reaches the classifier or filters.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::pipeline::{
    Candidate, CandidateDetail, CandidateId, JobId, JobPosting, NewJobPosting,
    JOB_STATUS_IN_PROGRESS,
};

/// Status assumed when the ATS omits a candidate's status.
pub const DEFAULT_CANDIDATE_STATUS: &str = "Applied";

const DEFAULT_JOB_DESCRIPTION: &str = "No description";

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("malformed ATS payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("ATS record is missing an id")]
    MissingId,
    #[error("ATS reported failure: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct AtsCandidate {
    #[serde(default, alias = "Id", alias = "ID", deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default, alias = "First_Name", alias = "FirstName", alias = "firstName", deserialize_with = "blank_as_none")]
    first_name: Option<String>,
    #[serde(default, alias = "Last_Name", alias = "LastName", alias = "lastName", deserialize_with = "blank_as_none")]
    last_name: Option<String>,
    #[serde(default, alias = "Email", deserialize_with = "blank_as_none")]
    email: Option<String>,
    #[serde(default, alias = "Phone", deserialize_with = "blank_as_none")]
    phone: Option<String>,
    #[serde(default, alias = "Mobile", deserialize_with = "blank_as_none")]
    mobile: Option<String>,
    #[serde(default, alias = "Status", deserialize_with = "blank_as_none")]
    status: Option<String>,
    #[serde(default, rename = "Application_Status", deserialize_with = "blank_as_none")]
    application_status: Option<String>,
    #[serde(default, rename = "Candidate_Status", deserialize_with = "blank_as_none")]
    candidate_status: Option<String>,
    #[serde(default, rename = "Candidate_Stage", deserialize_with = "blank_as_none")]
    candidate_stage: Option<String>,
    #[serde(default, alias = "Created_Time", alias = "appliedDate", deserialize_with = "blank_as_none")]
    applied_date: Option<String>,
    #[serde(default, alias = "Resume_URL", alias = "resumeUrl", deserialize_with = "blank_as_none")]
    resume_url: Option<String>,
    #[serde(default, alias = "City", deserialize_with = "blank_as_none")]
    city: Option<String>,
    #[serde(default, alias = "Current_Job_Title", deserialize_with = "blank_as_none")]
    current_job_title: Option<String>,
    #[serde(default, alias = "Current_Employer", deserialize_with = "blank_as_none")]
    current_employer: Option<String>,
    #[serde(default, alias = "Experience_in_Years", deserialize_with = "string_or_number")]
    experience_years: Option<String>,
    #[serde(default, alias = "Skill_Set", deserialize_with = "blank_as_none")]
    skill_set: Option<String>,
    #[serde(default, alias = "Highest_Qualification_Held", deserialize_with = "blank_as_none")]
    highest_qualification: Option<String>,
    #[serde(default, alias = "Additional_Info", deserialize_with = "blank_as_none")]
    additional_info: Option<String>,
    #[serde(default, alias = "Modified_Time", deserialize_with = "blank_as_none")]
    modified_at: Option<String>,
}

impl AtsCandidate {
    fn into_candidate(self) -> Result<(Candidate, AtsCandidateExtras), MappingError> {
        let id = self.id.ok_or(MappingError::MissingId)?;
        let candidate = Candidate {
            id: CandidateId(id),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
            phone: self.phone.or(self.mobile),
            status: self
                .status
                .or(self.application_status)
                .or(self.candidate_status)
                .or(self.candidate_stage)
                .unwrap_or_else(|| DEFAULT_CANDIDATE_STATUS.to_string()),
            applied_date: self.applied_date.as_deref().and_then(parse_date),
            resume_url: self.resume_url,
        };
        let extras = AtsCandidateExtras {
            city: self.city,
            current_job_title: self.current_job_title,
            current_employer: self.current_employer,
            experience_years: self
                .experience_years
                .as_deref()
                .and_then(|raw| raw.trim().parse::<f32>().ok()),
            skills: self
                .skill_set
                .as_deref()
                .map(split_skills)
                .unwrap_or_default(),
            highest_qualification: self.highest_qualification,
            additional_info: self.additional_info,
            modified_at: self.modified_at.as_deref().and_then(parse_datetime),
        };
        Ok((candidate, extras))
    }
}

struct AtsCandidateExtras {
    city: Option<String>,
    current_job_title: Option<String>,
    current_employer: Option<String>,
    experience_years: Option<f32>,
    skills: Vec<String>,
    highest_qualification: Option<String>,
    additional_info: Option<String>,
    modified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
struct AtsJob {
    #[serde(default, alias = "Id", alias = "ID", deserialize_with = "string_or_number")]
    id: Option<String>,
    #[serde(default, alias = "Posting_Title", deserialize_with = "blank_as_none")]
    title: Option<String>,
    #[serde(default, rename = "Job_Opening_Name", deserialize_with = "blank_as_none")]
    opening_name: Option<String>,
    #[serde(default, alias = "City", deserialize_with = "blank_as_none")]
    location: Option<String>,
    #[serde(default, alias = "Job_Description", deserialize_with = "blank_as_none")]
    description: Option<String>,
    #[serde(default, alias = "Salary", deserialize_with = "blank_as_none")]
    salary_range: Option<String>,
    #[serde(default, alias = "Work_Experience", deserialize_with = "blank_as_none")]
    experience_required: Option<String>,
    #[serde(default, alias = "Industry", deserialize_with = "blank_as_none")]
    industry: Option<String>,
    #[serde(default, alias = "Job_Type", deserialize_with = "blank_as_none")]
    job_type: Option<String>,
    #[serde(default, alias = "Target_Date", deserialize_with = "blank_as_none")]
    target_date: Option<String>,
    #[serde(default, alias = "Client_Name", deserialize_with = "client_name")]
    client_name: Option<String>,
    #[serde(default, alias = "Job_Opening_Status", deserialize_with = "blank_as_none")]
    status: Option<String>,
}

impl AtsJob {
    fn into_job(self) -> Result<JobPosting, MappingError> {
        let id = self.id.ok_or(MappingError::MissingId)?;
        Ok(JobPosting {
            id: JobId(id),
            title: self.title.or(self.opening_name).unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_JOB_DESCRIPTION.to_string()),
            salary_range: self.salary_range,
            experience_required: self.experience_required,
            industry: self.industry,
            job_type: self.job_type,
            target_date: self.target_date.as_deref().and_then(parse_date),
            client_name: self.client_name,
            status: self
                .status
                .unwrap_or_else(|| JOB_STATUS_IN_PROGRESS.to_string()),
        })
    }
}

pub fn candidate_from_value(value: Value) -> Result<Candidate, MappingError> {
    let raw: AtsCandidate = serde_json::from_value(value)?;
    raw.into_candidate().map(|(candidate, _)| candidate)
}

pub fn candidate_detail_from_value(value: Value) -> Result<CandidateDetail, MappingError> {
    let raw: AtsCandidate = serde_json::from_value(value)?;
    let (candidate, extras) = raw.into_candidate()?;
    Ok(CandidateDetail {
        candidate,
        city: extras.city,
        current_job_title: extras.current_job_title,
        current_employer: extras.current_employer,
        experience_years: extras.experience_years,
        skills: extras.skills,
        highest_qualification: extras.highest_qualification,
        additional_info: extras.additional_info,
        modified_at: extras.modified_at,
    })
}

pub fn job_from_value(value: Value) -> Result<JobPosting, MappingError> {
    let raw: AtsJob = serde_json::from_value(value)?;
    raw.into_job()
}

/// Unwrap `{"data": [...]}` list responses; a bare array is accepted too and
/// an absent `data` key (empty ATS response) yields no records.
pub fn records_from_envelope(value: Value) -> Result<Vec<Value>, MappingError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(MappingError::Payload(serde::de::Error::custom(format!(
                "expected `data` to be an array, found {other}"
            )))),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(MappingError::Payload(serde::de::Error::custom(format!(
            "expected a list envelope, found {other}"
        )))),
    }
}

pub fn candidates_from_envelope(value: Value) -> Result<Vec<Candidate>, MappingError> {
    records_from_envelope(value)?
        .into_iter()
        .map(candidate_from_value)
        .collect()
}

pub fn jobs_from_envelope(value: Value) -> Result<Vec<JobPosting>, MappingError> {
    records_from_envelope(value)?
        .into_iter()
        .map(job_from_value)
        .collect()
}

/// Outbound payload for creating a job opening in the ATS.
pub fn job_creation_payload(job: &NewJobPosting) -> Value {
    json!({
        "data": [{
            "Posting_Title": job.title,
            "Job_Opening_Name": job.title,
            "Client_Name": job.client_name,
            "City": job.location,
            "Salary": job.salary_range,
            "Work_Experience": job.experience_required,
            "Job_Description": job.description,
            "Industry": job.industry,
            "Job_Type": job.job_type,
            "Target_Date": job.target_date.format("%Y-%m-%d").to_string(),
            "Job_Opening_Status": JOB_STATUS_IN_PROGRESS,
        }]
    })
}

/// Outbound payload for a candidate status update.
pub fn status_update_payload(candidate_id: &CandidateId, status: &str) -> Value {
    json!({
        "data": [{
            "id": candidate_id.0,
            "Application_Status": status,
        }]
    })
}

/// Extract the created record id, rejecting anything but a `success` entry.
pub fn created_id_from_response(value: Value) -> Result<JobId, MappingError> {
    let entry = records_from_envelope(value)?
        .into_iter()
        .next()
        .ok_or_else(|| MappingError::Rejected("empty creation response".to_string()))?;

    let status = entry.get("status").and_then(Value::as_str).unwrap_or("");
    if status != "success" {
        let message = entry
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(MappingError::Rejected(message.to_string()));
    }

    match entry.pointer("/details/id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(JobId(id.clone())),
        Some(Value::Number(id)) => Ok(JobId(id.to_string())),
        _ => Err(MappingError::MissingId),
    }
}

pub(crate) fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Client names arrive either as plain strings or as lookup objects
/// (`{"name": "...", "id": "..."}`).
fn client_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let name = match value {
        Some(Value::String(raw)) => Some(raw),
        Some(Value::Object(object)) => object
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    Ok(name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}
