use std::sync::Arc;

use serde::Serialize;

use super::ledger::TransitionLedger;
use super::scope::{ScopeError, ScopeStore, ViewScope};
use crate::ats::{RecruitStore, StoreError};
use crate::pipeline::{
    company_names, filter_candidates, filter_jobs, BoardReconciler, BoardView, Candidate,
    CandidateDetail, CandidateFilter, CandidateId, InvalidTransition, JobDraftError, JobId,
    JobPosting, LifecycleScope, NewJobPosting, StageCatalog, StatusTransition,
};

/// Result of a drag onto a board column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The store acknowledged the write; the board was rebuilt from a refetch.
    Applied {
        transition: StatusTransition,
        board: BoardView,
    },
    /// A newer move for the same candidate took over before this one wrote.
    Superseded { transition: StatusTransition },
}

/// Service composing the ATS store, stage catalog and persisted view scope.
pub struct BoardService<S, P> {
    store: Arc<S>,
    scopes: Arc<P>,
    catalog: Arc<StageCatalog>,
    ledger: TransitionLedger,
}

impl<S, P> BoardService<S, P>
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    pub fn new(store: Arc<S>, scopes: Arc<P>) -> Self {
        Self::with_catalog(store, scopes, Arc::new(StageCatalog::standard()))
    }

    pub fn with_catalog(store: Arc<S>, scopes: Arc<P>, catalog: Arc<StageCatalog>) -> Self {
        Self {
            store,
            scopes,
            catalog,
            ledger: TransitionLedger::new(),
        }
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &TransitionLedger {
        &self.ledger
    }

    fn reconciler(&self) -> BoardReconciler<'_> {
        BoardReconciler::new(&self.catalog)
    }

    pub fn scope(&self) -> Result<ViewScope, BoardServiceError> {
        Ok(self.scopes.load()?)
    }

    pub fn set_scope(&self, scope: ViewScope) -> Result<ViewScope, BoardServiceError> {
        let scope = scope.normalized();
        self.scopes.save(&scope)?;
        tracing::info!(
            mode = ?scope.mode,
            company = scope.selected_company.as_deref().unwrap_or("-"),
            "view scope updated"
        );
        Ok(scope)
    }

    /// Jobs visible under the persisted scope for one lifecycle bucket.
    pub fn jobs(&self, lifecycle: LifecycleScope) -> Result<Vec<JobPosting>, BoardServiceError> {
        let scope = self.scopes.load()?;
        let jobs = self.store.list_jobs()?;
        Ok(filter_jobs(&jobs, &scope.job_filter(lifecycle)))
    }

    pub fn companies(&self) -> Result<Vec<String>, BoardServiceError> {
        let jobs = self.store.list_jobs()?;
        Ok(company_names(&jobs))
    }

    pub fn job(&self, job_id: &JobId) -> Result<JobPosting, BoardServiceError> {
        Ok(self.store.get_job(job_id)?)
    }

    pub fn create_job(&self, draft: NewJobPosting) -> Result<JobId, BoardServiceError> {
        draft.validate()?;
        let title = draft.title.clone();
        let job_id = self.store.create_job(draft)?;
        tracing::info!(job_id = %job_id, title = %title, "job opening created");
        Ok(job_id)
    }

    pub fn archive_job(&self, job_id: &JobId) -> Result<(), BoardServiceError> {
        self.store.archive_job(job_id)?;
        tracing::info!(job_id = %job_id, "job opening archived");
        Ok(())
    }

    pub fn candidates(
        &self,
        job_id: &JobId,
        filter: &CandidateFilter,
    ) -> Result<Vec<Candidate>, BoardServiceError> {
        let candidates = self.store.list_candidates(job_id)?;
        Ok(filter_candidates(&candidates, filter))
    }

    pub fn candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, BoardServiceError> {
        Ok(self.store.get_candidate(job_id, candidate_id)?)
    }

    /// Direct status edit from the candidate detail view. Shares the
    /// per-candidate queue with board moves.
    pub fn update_status(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        status: &str,
    ) -> Result<CandidateDetail, BoardServiceError> {
        let status = status.trim();
        if status.is_empty() {
            return Err(BoardServiceError::BlankStatus);
        }

        let ticket = self.ledger.issue(job_id, candidate_id);
        match ticket.commit(|| self.store.set_candidate_status(job_id, candidate_id, status)) {
            None => Err(BoardServiceError::Superseded(candidate_id.clone())),
            Some(result) => {
                result?;
                tracing::info!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    status,
                    "candidate status updated"
                );
                Ok(self.store.get_candidate(job_id, candidate_id)?)
            }
        }
    }

    pub fn board(
        &self,
        job_id: &JobId,
        filter: &CandidateFilter,
    ) -> Result<BoardView, BoardServiceError> {
        let candidates = self.candidates(job_id, filter)?;
        Ok(self.reconciler().group_by_stage(&candidates))
    }

    /// Write the target stage's canonical status, then rebuild the board from
    /// a fresh read. Nothing is regrouped until the store acknowledges.
    pub fn move_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        stage: &str,
        filter: &CandidateFilter,
    ) -> Result<MoveOutcome, BoardServiceError> {
        let candidates = self.store.list_candidates(job_id)?;
        let transition = self
            .reconciler()
            .plan_transition(&candidates, stage, candidate_id)?;

        let ticket = self.ledger.issue(job_id, candidate_id);
        let written = ticket.commit(|| {
            self.store
                .set_candidate_status(job_id, candidate_id, transition.new_status)
        });

        match written {
            None => {
                tracing::info!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    stage = %transition.to_stage,
                    sequence = ticket.sequence(),
                    "move superseded by a newer move"
                );
                Ok(MoveOutcome::Superseded { transition })
            }
            Some(Err(error)) => {
                tracing::warn!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    %error,
                    "status write failed"
                );
                Err(error.into())
            }
            Some(Ok(())) => {
                tracing::info!(
                    job_id = %job_id,
                    candidate_id = %candidate_id,
                    from = %transition.from_stage,
                    to = %transition.to_stage,
                    status = transition.new_status,
                    "candidate moved"
                );
                let board = self.board(job_id, filter)?;
                Ok(MoveOutcome::Applied { transition, board })
            }
        }
    }
}

/// Error raised by the board service.
#[derive(Debug, thiserror::Error)]
pub enum BoardServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Draft(#[from] JobDraftError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("candidate status must not be blank")]
    BlankStatus,
    #[error("a newer update for candidate {0} is in progress")]
    Superseded(CandidateId),
}
