use serde::Serialize;

use super::catalog::{StageCatalog, StageColor, StageId, UnknownStage};
use super::domain::{Candidate, CandidateId};

/// One board column with its members in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageColumn {
    pub stage: StageId,
    pub label: &'static str,
    pub color: StageColor,
    pub count: usize,
    pub candidates: Vec<Candidate>,
}

/// Candidates partitioned into every catalog stage, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub columns: Vec<StageColumn>,
}

impl BoardView {
    pub fn column(&self, stage: StageId) -> Option<&StageColumn> {
        self.columns.iter().find(|column| column.stage == stage)
    }

    /// Members of a stage; empty when the stage is not on this board.
    pub fn candidates_in(&self, stage: StageId) -> &[Candidate] {
        self.column(stage)
            .map(|column| column.candidates.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|column| column.count).sum()
    }

    pub fn stage_of(&self, candidate_id: &CandidateId) -> Option<StageId> {
        self.columns
            .iter()
            .find(|column| column.candidates.iter().any(|c| &c.id == candidate_id))
            .map(|column| column.stage)
    }
}

/// Why a requested drag cannot be turned into a status write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransition {
    #[error(transparent)]
    UnknownStage(#[from] UnknownStage),
    #[error("candidate {0} is not on this board")]
    UnknownCandidate(CandidateId),
}

/// Planned status write for a candidate dropped on a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTransition {
    pub candidate_id: CandidateId,
    pub previous_status: String,
    pub new_status: &'static str,
    pub from_stage: StageId,
    pub to_stage: StageId,
}

impl StatusTransition {
    /// True when the write would not change the stored status.
    pub fn is_noop(&self) -> bool {
        self.previous_status == self.new_status
    }

    /// Optimistic copy of `candidates` with only the moved candidate rewritten.
    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .iter()
            .map(|candidate| {
                if candidate.id == self.candidate_id {
                    Candidate {
                        status: self.new_status.to_string(),
                        ..candidate.clone()
                    }
                } else {
                    candidate.clone()
                }
            })
            .collect()
    }
}

/// Stateless reconciler between the candidate list and the stage catalog.
#[derive(Debug, Clone, Copy)]
pub struct BoardReconciler<'a> {
    catalog: &'a StageCatalog,
}

impl<'a> BoardReconciler<'a> {
    pub fn new(catalog: &'a StageCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a StageCatalog {
        self.catalog
    }

    /// Stable partition: each candidate appears in exactly one column.
    pub fn group_by_stage(&self, candidates: &[Candidate]) -> BoardView {
        let stages = self.catalog.stages();
        let mut buckets: Vec<Vec<Candidate>> = vec![Vec::new(); stages.len()];

        for candidate in candidates {
            let stage = self.catalog.classify(&candidate.status);
            if let Some(index) = stages.iter().position(|s| s.id == stage) {
                buckets[index].push(candidate.clone());
            }
        }

        let columns = stages
            .iter()
            .zip(buckets)
            .map(|(stage, members)| StageColumn {
                stage: stage.id,
                label: stage.label,
                color: stage.color,
                count: members.len(),
                candidates: members,
            })
            .collect();

        BoardView { columns }
    }

    /// Resolve a drop into the stage's canonical status. Pure: the caller owns
    /// the write and must only regroup once the store acknowledges it.
    pub fn plan_transition(
        &self,
        candidates: &[Candidate],
        stage: &str,
        candidate_id: &CandidateId,
    ) -> Result<StatusTransition, InvalidTransition> {
        let target = self.catalog.resolve(stage)?;
        let candidate = candidates
            .iter()
            .find(|candidate| &candidate.id == candidate_id)
            .ok_or_else(|| InvalidTransition::UnknownCandidate(candidate_id.clone()))?;

        Ok(StatusTransition {
            candidate_id: candidate.id.clone(),
            previous_status: candidate.status.clone(),
            new_status: target.canonical_status(),
            from_stage: self.catalog.classify(&candidate.status),
            to_stage: target.id,
        })
    }

    /// Board as it would look once `transition` is acknowledged.
    pub fn preview(&self, candidates: &[Candidate], transition: &StatusTransition) -> BoardView {
        self.group_by_stage(&transition.apply(candidates))
    }
}

/// Group against the shared standard catalog.
pub fn group_by_stage(candidates: &[Candidate]) -> BoardView {
    BoardReconciler::new(StageCatalog::shared()).group_by_stage(candidates)
}

/// Plan against the shared standard catalog.
pub fn plan_transition(
    candidates: &[Candidate],
    stage: &str,
    candidate_id: &CandidateId,
) -> Result<StatusTransition, InvalidTransition> {
    BoardReconciler::new(StageCatalog::shared()).plan_transition(candidates, stage, candidate_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, first: &str, status: &str) -> Candidate {
        Candidate {
            id: CandidateId(id.to_string()),
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email: None,
            phone: None,
            status: status.to_string(),
            applied_date: None,
            resume_url: None,
        }
    }

    fn roster() -> Vec<Candidate> {
        vec![
            candidate("1", "Ana", "Applied"),
            candidate("2", "Brian", "Interview-Scheduled"),
            candidate("3", "Chen", "Something new upstream"),
            candidate("4", "Dara", "Joined"),
            candidate("5", "Eli", "In Review"),
        ]
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.0.as_str()).collect()
    }

    #[test]
    fn grouping_keeps_input_order_within_stage() {
        let board = group_by_stage(&roster());
        assert_eq!(ids(board.candidates_in(StageId::Screening)), vec!["1", "3", "5"]);
        assert_eq!(ids(board.candidates_in(StageId::Interview)), vec!["2"]);
        assert_eq!(ids(board.candidates_in(StageId::Hired)), vec!["4"]);
        assert_eq!(board.columns.len(), 7);
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn empty_input_yields_all_empty_columns() {
        let board = group_by_stage(&[]);
        assert_eq!(board.columns.len(), 7);
        assert!(board.columns.iter().all(|column| column.count == 0));
    }

    #[test]
    fn transition_targets_canonical_status() {
        let candidates = roster();
        let id = CandidateId("1".to_string());
        let hired = plan_transition(&candidates, "Hired", &id).expect("valid move");
        assert_eq!(hired.new_status, "Hired");
        assert_eq!(hired.from_stage, StageId::Screening);
        assert_eq!(hired.to_stage, StageId::Hired);

        let interview = plan_transition(&candidates, "Interview", &id).expect("valid move");
        assert_eq!(interview.new_status, "Interview to be scheduled");
    }

    #[test]
    fn transition_into_current_stage_still_normalizes() {
        let candidates = roster();
        let id = CandidateId("4".to_string());
        let transition = plan_transition(&candidates, "Hired", &id).expect("valid move");
        assert_eq!(transition.previous_status, "Joined");
        assert_eq!(transition.new_status, "Hired");
        assert!(!transition.is_noop());
    }

    #[test]
    fn unresolved_inputs_are_invalid_transitions() {
        let candidates = roster();
        let id = CandidateId("1".to_string());
        assert_eq!(
            plan_transition(&candidates, "Onboarding", &id),
            Err(InvalidTransition::UnknownStage(UnknownStage(
                "Onboarding".to_string()
            )))
        );

        let ghost = CandidateId("404".to_string());
        assert_eq!(
            plan_transition(&candidates, "Hired", &ghost),
            Err(InvalidTransition::UnknownCandidate(ghost.clone()))
        );
    }

    #[test]
    fn preview_moves_only_the_dragged_candidate() {
        let candidates = roster();
        let reconciler = BoardReconciler::new(StageCatalog::shared());
        let id = CandidateId("3".to_string());
        let transition = reconciler
            .plan_transition(&candidates, "offered", &id)
            .expect("valid move");

        let board = reconciler.preview(&candidates, &transition);
        assert_eq!(ids(board.candidates_in(StageId::Offered)), vec!["3"]);
        assert_eq!(ids(board.candidates_in(StageId::Screening)), vec!["1", "5"]);
        assert_eq!(board.stage_of(&id), Some(StageId::Offered));
        assert_eq!(candidates[2].status, "Something new upstream");
    }
}
