use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::mapping::{parse_date, DEFAULT_CANDIDATE_STATUS};
use crate::pipeline::{Candidate, CandidateId};

#[derive(Debug)]
pub enum CandidateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingId { row: usize },
    DuplicateId(CandidateId),
}

impl std::fmt::Display for CandidateImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateImportError::Io(err) => write!(f, "failed to read candidate export: {}", err),
            CandidateImportError::Csv(err) => write!(f, "invalid candidate CSV data: {}", err),
            CandidateImportError::MissingId { row } => {
                write!(f, "candidate export row {} has no candidate id", row)
            }
            CandidateImportError::DuplicateId(id) => {
                write!(f, "candidate {} appears more than once in the export", id)
            }
        }
    }
}

impl std::error::Error for CandidateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CandidateImportError::Io(err) => Some(err),
            CandidateImportError::Csv(err) => Some(err),
            CandidateImportError::MissingId { .. } | CandidateImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for CandidateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CandidateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads ATS candidate exports into canonical candidates, in file order.
pub struct CandidateCsvImporter;

impl CandidateCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, CandidateImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
            let row = record?;
            // header is line 1
            let candidate = row.into_candidate(index + 2)?;
            if !seen.insert(candidate.id.clone()) {
                return Err(CandidateImportError::DuplicateId(candidate.id));
            }
            candidates.push(candidate);
        }

        tracing::debug!(count = candidates.len(), "imported candidate export");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(
        rename = "Candidate Id",
        alias = "Candidate ID",
        alias = "Id",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    id: Option<String>,
    #[serde(rename = "First Name", default, deserialize_with = "empty_string_as_none")]
    first_name: Option<String>,
    #[serde(rename = "Last Name", default, deserialize_with = "empty_string_as_none")]
    last_name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "Mobile", default, deserialize_with = "empty_string_as_none")]
    mobile: Option<String>,
    #[serde(
        rename = "Candidate Status",
        alias = "Application Status",
        alias = "Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    status: Option<String>,
    #[serde(
        rename = "Created Time",
        alias = "Applied Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    created_time: Option<String>,
    #[serde(rename = "Resume URL", default, deserialize_with = "empty_string_as_none")]
    resume_url: Option<String>,
}

impl CandidateRow {
    fn into_candidate(self, line: usize) -> Result<Candidate, CandidateImportError> {
        let id = self
            .id
            .ok_or(CandidateImportError::MissingId { row: line })?;

        Ok(Candidate {
            id: CandidateId(id),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
            phone: self.phone.or(self.mobile),
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_CANDIDATE_STATUS.to_string()),
            applied_date: self.created_time.as_deref().and_then(parse_date),
            resume_url: self.resume_url,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
