use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::store::{RecruitStore, StoreError};
use crate::config::BoardConfig;
use crate::pipeline::{Candidate, CandidateDetail, CandidateId, JobId, JobPosting, NewJobPosting};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

struct Slots<K, V> {
    entries: HashMap<K, Entry<V>>,
    generation: u64,
}

/// Entries expire after `ttl`. Every invalidation bumps the generation, and a
/// fill only lands if no invalidation happened since its read started.
struct TtlMap<K, V> {
    ttl: Duration,
    slots: Mutex<Slots<K, V>>,
}

impl<K: Eq + Hash, V: Clone> TtlMap<K, V> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<K, V>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value, or the generation a fill for this miss must carry.
    fn get(&self, key: &K) -> Result<V, u64> {
        let mut guard = self.lock();
        let slots = &mut *guard;
        match slots.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Ok(entry.value.clone()),
            Some(_) => {
                slots.entries.remove(key);
                Err(slots.generation)
            }
            None => Err(slots.generation),
        }
    }

    fn put(&self, key: K, value: V, generation: u64) {
        let mut slots = self.lock();
        if slots.generation != generation {
            return;
        }
        let ttl = self.ttl;
        slots.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        slots.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, key: &K) {
        let mut slots = self.lock();
        slots.generation += 1;
        slots.entries.remove(key);
    }

    fn invalidate_where(&self, predicate: impl Fn(&K) -> bool) {
        let mut slots = self.lock();
        slots.generation += 1;
        slots.entries.retain(|key, _| !predicate(key));
    }
}

/// Read-through cache in front of any [`RecruitStore`]. Writes always go to
/// the inner store first and invalidate the entries they affect.
pub struct CachedStore<S> {
    inner: S,
    jobs: TtlMap<(), Vec<JobPosting>>,
    candidates: TtlMap<JobId, Vec<Candidate>>,
    details: TtlMap<(JobId, CandidateId), CandidateDetail>,
}

impl<S: RecruitStore> CachedStore<S> {
    pub fn new(inner: S, jobs_ttl: Duration, candidates_ttl: Duration) -> Self {
        Self {
            inner,
            jobs: TtlMap::new(jobs_ttl),
            candidates: TtlMap::new(candidates_ttl),
            details: TtlMap::new(candidates_ttl),
        }
    }

    pub fn from_config(inner: S, config: &BoardConfig) -> Self {
        Self::new(inner, config.jobs_ttl, config.candidates_ttl)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop everything cached for a job's candidates.
    pub fn invalidate_job(&self, job_id: &JobId) {
        self.candidates.invalidate(job_id);
        self.details.invalidate_where(|(job, _)| job == job_id);
        tracing::debug!(job_id = %job_id, "candidate cache invalidated");
    }

    fn invalidate_jobs(&self) {
        self.jobs.invalidate(&());
        tracing::debug!("job list cache invalidated");
    }
}

impl<S: RecruitStore> RecruitStore for CachedStore<S> {
    fn list_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        let generation = match self.jobs.get(&()) {
            Ok(jobs) => return Ok(jobs),
            Err(generation) => generation,
        };
        let jobs = self.inner.list_jobs()?;
        self.jobs.put((), jobs.clone(), generation);
        Ok(jobs)
    }

    // Served from the job list when it is warm.
    fn get_job(&self, job_id: &JobId) -> Result<JobPosting, StoreError> {
        if let Some(job) = self
            .jobs
            .get(&())
            .ok()
            .and_then(|jobs| jobs.into_iter().find(|job| &job.id == job_id))
        {
            return Ok(job);
        }
        self.inner.get_job(job_id)
    }

    fn list_candidates(&self, job_id: &JobId) -> Result<Vec<Candidate>, StoreError> {
        let generation = match self.candidates.get(job_id) {
            Ok(candidates) => return Ok(candidates),
            Err(generation) => generation,
        };
        let candidates = self.inner.list_candidates(job_id)?;
        self.candidates
            .put(job_id.clone(), candidates.clone(), generation);
        Ok(candidates)
    }

    fn get_candidate(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<CandidateDetail, StoreError> {
        let key = (job_id.clone(), candidate_id.clone());
        let generation = match self.details.get(&key) {
            Ok(detail) => return Ok(detail),
            Err(generation) => generation,
        };
        let detail = self.inner.get_candidate(job_id, candidate_id)?;
        self.details.put(key, detail.clone(), generation);
        Ok(detail)
    }

    fn set_candidate_status(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        status: &str,
    ) -> Result<(), StoreError> {
        let result = self.inner.set_candidate_status(job_id, candidate_id, status);
        // A failed write may still have landed upstream.
        self.candidates.invalidate(job_id);
        self.details
            .invalidate(&(job_id.clone(), candidate_id.clone()));
        tracing::debug!(
            job_id = %job_id,
            candidate_id = %candidate_id,
            "candidate cache invalidated"
        );
        result
    }

    fn create_job(&self, job: NewJobPosting) -> Result<JobId, StoreError> {
        let id = self.inner.create_job(job)?;
        self.invalidate_jobs();
        Ok(id)
    }

    fn archive_job(&self, job_id: &JobId) -> Result<(), StoreError> {
        self.inner.archive_job(job_id)?;
        self.invalidate_jobs();
        Ok(())
    }
}
