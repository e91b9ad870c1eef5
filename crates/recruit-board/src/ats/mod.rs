//! Boundary with the applicant tracking system: the store contract, payload
//! normalization, export import and a read-through cache.

pub mod cache;
pub mod import;
pub mod mapping;
pub mod store;

pub use cache::CachedStore;
pub use import::{CandidateCsvImporter, CandidateImportError};
pub use mapping::{
    candidate_detail_from_value, candidate_from_value, candidates_from_envelope,
    created_id_from_response, job_creation_payload, job_from_value, jobs_from_envelope,
    status_update_payload, MappingError, DEFAULT_CANDIDATE_STATUS,
};
pub use store::{RecruitStore, StoreError};
