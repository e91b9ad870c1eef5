use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::ats::{RecruitStore, StoreError};
use crate::board::{board_router, BoardService, MemoryScopeStore, ViewScope};
use crate::pipeline::{
    Candidate, CandidateDetail, CandidateId, JobId, JobPosting, NewJobPosting,
    JOB_STATUS_ARCHIVED, JOB_STATUS_IN_PROGRESS,
};

pub(super) fn job_id() -> JobId {
    JobId("job-100".to_string())
}

pub(super) fn candidate_id(raw: &str) -> CandidateId {
    CandidateId(raw.to_string())
}

pub(super) fn candidate(id: &str, first: &str, last: &str, status: &str) -> Candidate {
    Candidate {
        id: candidate_id(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!("{}@example.com", first.to_lowercase())),
        phone: None,
        status: status.to_string(),
        applied_date: NaiveDate::from_ymd_opt(2025, 9, 24),
        resume_url: None,
    }
}

pub(super) fn roster() -> Vec<Candidate> {
    vec![
        candidate("c-1", "Ana", "Lopez", "Applied"),
        candidate("c-2", "Juliana", "Smith", "Interview-Scheduled"),
        candidate("c-3", "Brian", "Doe", "Joined"),
        candidate("c-4", "Chen", "Wu", "Unmapped upstream status"),
    ]
}

pub(super) fn job(id: &str, company: &str, status: &str) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        title: format!("Engineer {id}"),
        location: "Remote".to_string(),
        description: "Build the platform".to_string(),
        salary_range: Some("20-30 LPA".to_string()),
        experience_required: Some("3-5 years".to_string()),
        industry: Some("IT Services".to_string()),
        job_type: Some("Full Time".to_string()),
        target_date: NaiveDate::from_ymd_opt(2025, 12, 1),
        client_name: Some(company.to_string()),
        status: status.to_string(),
    }
}

pub(super) fn jobs() -> Vec<JobPosting> {
    vec![
        job("job-100", "Acme", JOB_STATUS_IN_PROGRESS),
        job("job-101", "Globex", JOB_STATUS_IN_PROGRESS),
        job("job-102", "Acme", "Filled"),
    ]
}

pub(super) fn draft() -> NewJobPosting {
    let mut draft = NewJobPosting::new(
        "Staff Engineer",
        "Bangalore",
        "Lead the platform team",
        NaiveDate::from_ymd_opt(2025, 11, 30).expect("valid date"),
    );
    draft.client_name = Some("Initech".to_string());
    draft
}

/// Write gate: the first status write signals `entered` and blocks until
/// `release` fires.
pub(super) struct WriteGate {
    pub(super) entered: Sender<()>,
    pub(super) release: Receiver<()>,
}

#[derive(Default)]
pub(super) struct MemoryStore {
    jobs: Mutex<Vec<JobPosting>>,
    candidates: Mutex<HashMap<JobId, Vec<Candidate>>>,
    writes: Mutex<Vec<(CandidateId, String)>>,
    gate: Mutex<Option<WriteGate>>,
    sequence: Mutex<u32>,
}

impl MemoryStore {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        *store.jobs.lock().expect("jobs mutex poisoned") = jobs();
        store
            .candidates
            .lock()
            .expect("candidates mutex poisoned")
            .insert(job_id(), roster());
        store
    }

    pub(super) fn writes(&self) -> Vec<(CandidateId, String)> {
        self.writes.lock().expect("writes mutex poisoned").clone()
    }

    pub(super) fn status_of(&self, candidate_id: &CandidateId) -> Option<String> {
        self.candidates
            .lock()
            .expect("candidates mutex poisoned")
            .get(&job_id())
            .and_then(|list| list.iter().find(|c| &c.id == candidate_id))
            .map(|c| c.status.clone())
    }

    pub(super) fn arm_gate(&self, gate: WriteGate) {
        *self.gate.lock().expect("gate mutex poisoned") = Some(gate);
    }
}

impl RecruitStore for MemoryStore {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self.jobs.lock().expect("jobs mutex poisoned").clone())
    }

    fn get_job(&self, job_id: &JobId) -> Result<JobPosting, StoreError> {
        self.jobs
            .lock()
            .expect("jobs mutex poisoned")
            .iter()
            .find(|job| &job.id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound(job_id.clone()))
    }

    fn list_candidates(&self, job_id: &JobId) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .expect("candidates mutex poisoned")
            .get(job_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError> {
        self.list_candidates(job_id)?
            .into_iter()
            .find(|c| &c.id == candidate_id)
            .map(|candidate| CandidateDetail {
                skills: vec!["Rust".to_string(), "SQL".to_string()],
                ..CandidateDetail::from(candidate)
            })
            .ok_or_else(|| StoreError::CandidateNotFound {
                job_id: job_id.clone(),
                candidate_id: candidate_id.clone(),
            })
    }

    fn set_candidate_status(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        status: &str,
    ) -> Result<(), StoreError> {
        let gate = self.gate.lock().expect("gate mutex poisoned").take();
        if let Some(gate) = gate {
            gate.entered.send(()).expect("gate observer");
            gate.release.recv().expect("gate release");
        }

        let mut candidates = self.candidates.lock().expect("candidates mutex poisoned");
        let candidate = candidates
            .get_mut(job_id)
            .and_then(|list| list.iter_mut().find(|c| &c.id == candidate_id))
            .ok_or_else(|| StoreError::CandidateNotFound {
                job_id: job_id.clone(),
                candidate_id: candidate_id.clone(),
            })?;
        candidate.status = status.to_string();
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push((candidate_id.clone(), status.to_string()));
        Ok(())
    }

    fn create_job(&self, draft: NewJobPosting) -> Result<JobId, StoreError> {
        let mut sequence = self.sequence.lock().expect("sequence mutex poisoned");
        *sequence += 1;
        let id = JobId(format!("job-new-{}", *sequence));
        self.jobs.lock().expect("jobs mutex poisoned").push(JobPosting {
            id: id.clone(),
            title: draft.title,
            location: draft.location,
            description: draft.description,
            salary_range: draft.salary_range,
            experience_required: draft.experience_required,
            industry: Some(draft.industry),
            job_type: Some(draft.job_type),
            target_date: Some(draft.target_date),
            client_name: draft.client_name,
            status: JOB_STATUS_IN_PROGRESS.to_string(),
        });
        Ok(id)
    }

    fn archive_job(&self, job_id: &JobId) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        let job = jobs
            .iter_mut()
            .find(|job| &job.id == job_id)
            .ok_or_else(|| StoreError::JobNotFound(job_id.clone()))?;
        job.status = JOB_STATUS_ARCHIVED.to_string();
        Ok(())
    }
}

/// Reads succeed but every write is refused upstream.
pub(super) struct RejectingStore(pub(super) MemoryStore);

impl RecruitStore for RejectingStore {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        self.0.list_jobs()
    }

    fn get_job(&self, job_id: &JobId) -> Result<JobPosting, StoreError> {
        self.0.get_job(job_id)
    }

    fn list_candidates(&self, job_id: &JobId) -> Result<Vec<Candidate>, StoreError> {
        self.0.list_candidates(job_id)
    }

    fn get_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError> {
        self.0.get_candidate(job_id, candidate_id)
    }

    fn set_candidate_status(
        &self,
        _job_id: &JobId,
        _candidate_id: &CandidateId,
        _status: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Rejected("record locked by another user".to_string()))
    }

    fn create_job(&self, _draft: NewJobPosting) -> Result<JobId, StoreError> {
        Err(StoreError::Rejected("duplicate posting".to_string()))
    }

    fn archive_job(&self, _job_id: &JobId) -> Result<(), StoreError> {
        Err(StoreError::Rejected("read only".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl RecruitStore for UnavailableStore {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn get_job(&self, _job_id: &JobId) -> Result<JobPosting, StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn list_candidates(&self, _job_id: &JobId) -> Result<Vec<Candidate>, StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn get_candidate(
        &self,
        _job_id: &JobId,
        _candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn set_candidate_status(
        &self,
        _job_id: &JobId,
        _candidate_id: &CandidateId,
        _status: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn create_job(&self, _draft: NewJobPosting) -> Result<JobId, StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }

    fn archive_job(&self, _job_id: &JobId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("ATS offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    BoardService<MemoryStore, MemoryScopeStore>,
    Arc<MemoryStore>,
    Arc<MemoryScopeStore>,
) {
    let store = Arc::new(MemoryStore::seeded());
    let scopes = Arc::new(MemoryScopeStore::default());
    let service = BoardService::new(store.clone(), scopes.clone());
    (service, store, scopes)
}

pub(super) fn service_with<S: RecruitStore + 'static>(
    store: S,
) -> BoardService<S, MemoryScopeStore> {
    BoardService::new(
        Arc::new(store),
        Arc::new(MemoryScopeStore::with_scope(ViewScope::default())),
    )
}

pub(super) fn router_with<S: RecruitStore + 'static>(
    service: BoardService<S, MemoryScopeStore>,
) -> axum::Router {
    board_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
