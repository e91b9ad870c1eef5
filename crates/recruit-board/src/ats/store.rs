use crate::pipeline::{Candidate, CandidateDetail, CandidateId, JobId, JobPosting, NewJobPosting};

/// Remote ATS operations the board depends on. Implementations own
/// persistence; nothing in the pipeline module calls these directly.
pub trait RecruitStore: Send + Sync {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError>;
    fn get_job(&self, job_id: &JobId) -> Result<JobPosting, StoreError>;
    fn list_candidates(&self, job_id: &JobId) -> Result<Vec<Candidate>, StoreError>;
    fn get_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError>;
    fn set_candidate_status(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        status: &str,
    ) -> Result<(), StoreError>;
    fn create_job(&self, job: NewJobPosting) -> Result<JobId, StoreError>;
    fn archive_job(&self, job_id: &JobId) -> Result<(), StoreError>;
}

/// Error enumeration for ATS failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("candidate {candidate_id} not found for job {job_id}")]
    CandidateNotFound {
        job_id: JobId,
        candidate_id: CandidateId,
    },
    #[error("ATS rejected the request: {0}")]
    Rejected(String),
    #[error("ATS unavailable: {0}")]
    Unavailable(String),
}
