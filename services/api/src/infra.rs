use chrono::Local;
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_board::ats::mapping::{candidate_detail_from_value, records_from_envelope};
use recruit_board::ats::{jobs_from_envelope, MappingError, RecruitStore, StoreError};
use recruit_board::error::AppError;
use recruit_board::pipeline::{
    Candidate, CandidateDetail, CandidateId, JobId, JobPosting, NewJobPosting,
    JOB_STATUS_ARCHIVED, JOB_STATUS_IN_PROGRESS,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const DEMO_SEED: &str = include_str!("../fixtures/demo_seed.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// ATS stand-in holding jobs and candidate records in process memory.
#[derive(Default)]
pub(crate) struct InMemoryRecruitStore {
    jobs: Mutex<Vec<JobPosting>>,
    candidates: Mutex<HashMap<JobId, Vec<CandidateDetail>>>,
    sequence: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

impl InMemoryRecruitStore {
    /// Build from a seed document shaped like
    /// `{"jobs": [...], "candidates": {"<job id>": [...]}}`, where records
    /// use ATS field names. Either list may be wrapped in a `data` envelope.
    pub(crate) fn from_seed_value(mut seed: Value) -> Result<Self, MappingError> {
        let jobs = jobs_from_envelope(seed.get_mut("jobs").map(Value::take).unwrap_or_default())?;

        let mut candidates = HashMap::new();
        if let Some(Value::Object(by_job)) = seed.get_mut("candidates").map(Value::take) {
            for (job_id, records) in by_job {
                let details = records_from_envelope(records)?
                    .into_iter()
                    .map(candidate_detail_from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                candidates.insert(JobId(job_id), details);
            }
        }

        Ok(Self {
            jobs: Mutex::new(jobs),
            candidates: Mutex::new(candidates),
            sequence: AtomicU64::new(0),
        })
    }

    pub(crate) fn from_seed_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: Value = serde_json::from_str(&raw).map_err(MappingError::from)?;
        Ok(Self::from_seed_value(seed)?)
    }

    pub(crate) fn demo() -> Result<Self, AppError> {
        let seed: Value = serde_json::from_str(DEMO_SEED).map_err(MappingError::from)?;
        Ok(Self::from_seed_value(seed)?)
    }

    fn candidate_not_found(job_id: &JobId, candidate_id: &CandidateId) -> StoreError {
        StoreError::CandidateNotFound {
            job_id: job_id.clone(),
            candidate_id: candidate_id.clone(),
        }
    }
}

impl RecruitStore for InMemoryRecruitStore {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(lock(&self.jobs)?.clone())
    }

    fn get_job(&self, job_id: &JobId) -> Result<JobPosting, StoreError> {
        lock(&self.jobs)?
            .iter()
            .find(|job| &job.id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound(job_id.clone()))
    }

    // Unknown jobs have no applicants yet; the ATS answers those with an empty list.
    fn list_candidates(&self, job_id: &JobId) -> Result<Vec<Candidate>, StoreError> {
        Ok(lock(&self.candidates)?
            .get(job_id)
            .map(|details| details.iter().map(|d| d.candidate.clone()).collect())
            .unwrap_or_default())
    }

    fn get_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError> {
        lock(&self.candidates)?
            .get(job_id)
            .and_then(|details| details.iter().find(|d| &d.candidate.id == candidate_id))
            .cloned()
            .ok_or_else(|| Self::candidate_not_found(job_id, candidate_id))
    }

    fn set_candidate_status(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        status: &str,
    ) -> Result<(), StoreError> {
        let mut candidates = lock(&self.candidates)?;
        let detail = candidates
            .get_mut(job_id)
            .and_then(|details| details.iter_mut().find(|d| &d.candidate.id == candidate_id))
            .ok_or_else(|| Self::candidate_not_found(job_id, candidate_id))?;
        detail.candidate.status = status.to_string();
        detail.modified_at = Some(Local::now().naive_local());
        Ok(())
    }

    fn create_job(&self, job: NewJobPosting) -> Result<JobId, StoreError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = JobId(format!("job-{next:06}"));
        lock(&self.jobs)?.push(JobPosting {
            id: id.clone(),
            title: job.title,
            location: job.location,
            description: job.description,
            salary_range: job.salary_range,
            experience_required: job.experience_required,
            industry: Some(job.industry),
            job_type: Some(job.job_type),
            target_date: Some(job.target_date),
            client_name: job.client_name,
            status: JOB_STATUS_IN_PROGRESS.to_string(),
        });
        Ok(id)
    }

    fn archive_job(&self, job_id: &JobId) -> Result<(), StoreError> {
        let mut jobs = lock(&self.jobs)?;
        let job = jobs
            .iter_mut()
            .find(|job| &job.id == job_id)
            .ok_or_else(|| StoreError::JobNotFound(job_id.clone()))?;
        job.status = JOB_STATUS_ARCHIVED.to_string();
        Ok(())
    }
}

/// Split a comma separated CLI list, dropping blanks.
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
