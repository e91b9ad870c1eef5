//! Stage classification and board reconciliation for candidate pipelines.
//!
//! Everything here is pure: the ATS owns candidate records, and callers are
//! responsible for writing planned transitions back and refetching.

pub mod board;
pub mod catalog;
pub mod domain;
pub mod filter;

pub use board::{
    group_by_stage, plan_transition, BoardReconciler, BoardView, InvalidTransition, StageColumn,
    StatusTransition,
};
pub use catalog::{
    classify, CatalogError, Stage, StageCatalog, StageColor, StageId, StatusOverlap, UnknownStage,
};
pub use domain::{
    Candidate, CandidateDetail, CandidateId, JobDraftError, JobId, JobPosting, NewJobPosting,
    JOB_STATUS_ARCHIVED, JOB_STATUS_IN_PROGRESS,
};
pub use filter::{
    company_names, filter_candidates, filter_jobs, CandidateFilter, JobFilter, LifecycleScope,
    PortalMode,
};
