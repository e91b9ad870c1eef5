//! Board service: composes the ATS store, the stage catalog and the
//! persisted view scope, and exposes them over HTTP.

pub mod ledger;
pub mod router;
pub mod scope;
pub mod service;

#[cfg(test)]
mod tests;

pub use ledger::{MoveTicket, TransitionLedger};
pub use router::{board_router, MoveRequest, StatusUpdateRequest};
pub use scope::{JsonFileScopeStore, MemoryScopeStore, ScopeError, ScopeStore, ViewScope};
pub use service::{BoardService, BoardServiceError, MoveOutcome};
