use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{StageCatalog, StageId};
use super::domain::{Candidate, JobPosting};

/// Search box and status chips applied to a job's candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub statuses: BTreeSet<String>,
}

impl CandidateFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses.extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Accept every raw status the stage groups.
    pub fn with_stage(self, catalog: &StageCatalog, stage: StageId) -> Self {
        let members = catalog.member_statuses(stage).iter().copied();
        self.with_statuses(members)
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|query| !query.trim().is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_query(candidate, self.needle().as_deref()) && self.matches_status(candidate)
    }

    fn matches_query(&self, candidate: &Candidate, needle: Option<&str>) -> bool {
        match needle {
            Some(needle) => candidate.full_name().to_lowercase().contains(needle),
            None => true,
        }
    }

    fn matches_status(&self, candidate: &Candidate) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&candidate.status)
    }
}

/// Keep candidates passing both the name query and the status set, in order.
pub fn filter_candidates(candidates: &[Candidate], filter: &CandidateFilter) -> Vec<Candidate> {
    let needle = filter.needle();
    candidates
        .iter()
        .filter(|candidate| {
            filter.matches_query(candidate, needle.as_deref()) && filter.matches_status(candidate)
        })
        .cloned()
        .collect()
}

/// Which dashboard surface is looking at the job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalMode {
    #[default]
    Admin,
    Vendor,
}

/// Binary split of jobs by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleScope {
    #[default]
    Active,
    Archived,
}

impl LifecycleScope {
    pub fn admits(self, job: &JobPosting) -> bool {
        match self {
            Self::Active => job.is_active(),
            Self::Archived => !job.is_active(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub mode: PortalMode,
    #[serde(default)]
    pub selected_company: Option<String>,
    #[serde(default)]
    pub lifecycle: LifecycleScope,
}

impl JobFilter {
    fn admits_company(&self, job: &JobPosting) -> bool {
        let selected = self
            .selected_company
            .as_deref()
            .filter(|company| !company.trim().is_empty());
        match (self.mode, selected) {
            (PortalMode::Admin, _) | (PortalMode::Vendor, None) => true,
            (PortalMode::Vendor, Some(company)) => job.client_name.as_deref() == Some(company),
        }
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        self.admits_company(job) && self.lifecycle.admits(job)
    }
}

pub fn filter_jobs(jobs: &[JobPosting], filter: &JobFilter) -> Vec<JobPosting> {
    jobs.iter().filter(|job| filter.matches(job)).cloned().collect()
}

/// Distinct, non-blank client names in first-seen order.
pub fn company_names(jobs: &[JobPosting]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    jobs.iter()
        .filter_map(|job| job.client_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::{CandidateId, JobId, JOB_STATUS_IN_PROGRESS};

    fn person(id: &str, first: &str, last: &str, status: &str) -> Candidate {
        Candidate {
            id: CandidateId(id.to_string()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}@example.com", first.to_lowercase())),
            phone: None,
            status: status.to_string(),
            applied_date: None,
            resume_url: None,
        }
    }

    fn people() -> Vec<Candidate> {
        vec![
            person("1", "Ana", "Lopez", "Applied"),
            person("2", "Juliana", "Smith", "Hired"),
            person("3", "Brian", "Doe", "Joined"),
        ]
    }

    fn job(id: &str, company: Option<&str>, status: &str) -> JobPosting {
        JobPosting {
            id: JobId(id.to_string()),
            title: format!("Role {id}"),
            location: "Remote".to_string(),
            description: "Build things".to_string(),
            salary_range: None,
            experience_required: None,
            industry: None,
            job_type: None,
            target_date: None,
            client_name: company.map(str::to_string),
            status: status.to_string(),
        }
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.first_name.as_str()).collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let input = people();
        assert_eq!(filter_candidates(&input, &CandidateFilter::default()), input);
        let blank = CandidateFilter::default().with_query("   ");
        assert_eq!(filter_candidates(&input, &blank), input);
    }

    #[test]
    fn query_whitespace_is_part_of_the_needle() {
        let trailing = CandidateFilter::default().with_query("Lopez ");
        assert!(filter_candidates(&people(), &trailing).is_empty());

        let inner = CandidateFilter::default().with_query("ana lopez");
        assert_eq!(names(&filter_candidates(&people(), &inner)), vec!["Ana"]);
    }

    #[test]
    fn blank_vendor_company_leaves_jobs_unscoped() {
        let jobs = vec![
            job("1", Some("Acme"), JOB_STATUS_IN_PROGRESS),
            job("2", Some(""), JOB_STATUS_IN_PROGRESS),
            job("3", None, JOB_STATUS_IN_PROGRESS),
        ];
        for blank in ["", "   "] {
            let filter = JobFilter {
                mode: PortalMode::Vendor,
                selected_company: Some(blank.to_string()),
                lifecycle: LifecycleScope::Active,
            };
            assert_eq!(filter_jobs(&jobs, &filter).len(), 3);
        }
    }

    #[test]
    fn query_matches_anywhere_in_full_name_ignoring_case() {
        let filter = CandidateFilter::default().with_query("ana");
        assert_eq!(names(&filter_candidates(&people(), &filter)), vec!["Ana", "Juliana"]);

        let across = CandidateFilter::default().with_query("A LOP");
        assert_eq!(names(&filter_candidates(&people(), &across)), vec!["Ana"]);
    }

    #[test]
    fn statuses_match_raw_values_not_stages() {
        let filter = CandidateFilter::default().with_statuses(["Hired"]);
        assert_eq!(names(&filter_candidates(&people(), &filter)), vec!["Juliana"]);

        let stage = CandidateFilter::default().with_stage(StageCatalog::shared(), StageId::Hired);
        assert_eq!(
            names(&filter_candidates(&people(), &stage)),
            vec!["Juliana", "Brian"]
        );
    }

    #[test]
    fn query_and_statuses_are_anded() {
        let filter = CandidateFilter::default()
            .with_query("an")
            .with_statuses(["Joined", "Applied"]);
        let matched = filter_candidates(&people(), &filter);
        assert_eq!(names(&matched), vec!["Ana", "Brian"]);
        assert!(matched.iter().all(|c| filter.matches(c)));
    }

    #[test]
    fn archived_scope_is_complement_of_in_progress() {
        let jobs = vec![
            job("1", None, JOB_STATUS_IN_PROGRESS),
            job("2", None, "Filled"),
            job("3", None, ""),
        ];
        let archived = JobFilter {
            lifecycle: LifecycleScope::Archived,
            ..JobFilter::default()
        };
        let ids: Vec<String> = filter_jobs(&jobs, &archived)
            .into_iter()
            .map(|job| job.id.0)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);

        let active = filter_jobs(&jobs, &JobFilter::default());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.0, "1");
    }

    #[test]
    fn vendor_mode_scopes_to_selected_company() {
        let jobs = vec![
            job("1", Some("Acme"), JOB_STATUS_IN_PROGRESS),
            job("2", Some("Globex"), JOB_STATUS_IN_PROGRESS),
            job("3", None, JOB_STATUS_IN_PROGRESS),
        ];

        let vendor = JobFilter {
            mode: PortalMode::Vendor,
            selected_company: Some("Acme".to_string()),
            lifecycle: LifecycleScope::Active,
        };
        assert_eq!(filter_jobs(&jobs, &vendor).len(), 1);

        let unscoped = JobFilter {
            selected_company: None,
            ..vendor.clone()
        };
        assert_eq!(filter_jobs(&jobs, &unscoped).len(), 3);

        let admin = JobFilter {
            mode: PortalMode::Admin,
            ..vendor
        };
        assert_eq!(filter_jobs(&jobs, &admin).len(), 3);
    }

    #[test]
    fn company_names_are_distinct_and_ordered() {
        let jobs = vec![
            job("1", Some("Globex"), JOB_STATUS_IN_PROGRESS),
            job("2", Some("Acme"), "Filled"),
            job("3", Some("Globex"), JOB_STATUS_IN_PROGRESS),
            job("4", Some(" "), JOB_STATUS_IN_PROGRESS),
            job("5", None, JOB_STATUS_IN_PROGRESS),
        ];
        assert_eq!(company_names(&jobs), vec!["Globex", "Acme"]);
    }
}
