use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::{CandidateId, JobId};

type SlotKey = (JobId, CandidateId);

#[derive(Default)]
struct Slot {
    latest: AtomicU64,
    write_lock: Mutex<()>,
}

/// Serializes status writes per candidate. Each move takes a ticket; only
/// the newest ticket for a candidate is allowed to write once it reaches
/// the front of the queue.
#[derive(Default)]
pub struct TransitionLedger {
    sequence: AtomicU64,
    slots: Mutex<HashMap<SlotKey, Arc<Slot>>>,
}

impl TransitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, job_id: &JobId, candidate_id: &CandidateId) -> MoveTicket<'_> {
        let key = (job_id.clone(), candidate_id.clone());
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key.clone()).or_default().clone();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        slot.latest.store(sequence, Ordering::SeqCst);

        MoveTicket {
            ledger: self,
            key,
            slot,
            sequence,
        }
    }

    /// Candidates with a move still in flight.
    pub fn in_flight(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Outstanding tickets for one candidate, including one currently writing.
    pub fn tickets(&self, job_id: &JobId, candidate_id: &CandidateId) -> usize {
        let key = (job_id.clone(), candidate_id.clone());
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .map(|slot| Arc::strong_count(slot) - 1)
            .unwrap_or(0)
    }

    fn release(&self, key: &SlotKey) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // The map's own handle is the only one left once every ticket is gone.
        let idle = slots
            .get(key)
            .map(|slot| Arc::strong_count(slot) == 1)
            .unwrap_or(false);
        if idle {
            slots.remove(key);
        }
    }
}

/// Claim on the next write for one candidate.
pub struct MoveTicket<'a> {
    ledger: &'a TransitionLedger,
    key: SlotKey,
    slot: Arc<Slot>,
    sequence: u64,
}

impl MoveTicket<'_> {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_superseded(&self) -> bool {
        self.slot.latest.load(Ordering::SeqCst) != self.sequence
    }

    /// Run `write` while holding the candidate's write lock. Returns `None`
    /// without running it when a newer ticket was issued in the meantime.
    pub fn commit<T, E>(&self, write: impl FnOnce() -> Result<T, E>) -> Option<Result<T, E>> {
        let _guard = self
            .slot
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_superseded() {
            return None;
        }
        Some(write())
    }
}

impl Drop for MoveTicket<'_> {
    fn drop(&mut self) {
        let key = self.key.clone();
        let ledger = self.ledger;
        // Release our handle before checking whether the slot is idle.
        self.slot = Arc::new(Slot::default());
        ledger.release(&key);
    }
}
