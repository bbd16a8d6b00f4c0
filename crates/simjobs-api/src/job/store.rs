//! In-memory job store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::definition::{Job, JobUpdate};
use crate::error::InterfaceError;

/// Job store trait.
///
/// Every operation is atomic with respect to the others; handlers and the
/// executor share one store and never keep references to records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Add a new job. Fails with `DuplicateKey` if the id is taken.
    async fn insert(&self, job: Job) -> Result<(), InterfaceError>;

    /// Load a job by ID.
    async fn get(&self, id: &Uuid) -> Result<Job, InterfaceError>;

    /// Apply a terminal update and return the updated job.
    async fn update(&self, id: &Uuid, update: JobUpdate) -> Result<Job, InterfaceError>;

    /// Snapshot of all jobs, oldest first.
    async fn list(&self) -> Result<Vec<Job>, InterfaceError>;

    /// Remove a job and return it.
    async fn delete(&self, id: &Uuid) -> Result<Job, InterfaceError>;

    /// Number of live jobs.
    async fn len(&self) -> usize;
}

/// Job store backed by a map behind an async read-write lock.
///
/// Contents are lost when the process exits.
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: Job) -> Result<(), InterfaceError> {
        let mut jobs = self.jobs.write().await;
        match jobs.entry(job.id) {
            Entry::Occupied(_) => Err(InterfaceError::DuplicateKey(job.id)),
            Entry::Vacant(slot) => {
                debug!("Stored job {}", job.id);
                slot.insert(job);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &Uuid) -> Result<Job, InterfaceError> {
        let jobs = self.jobs.read().await;
        jobs.get(id).cloned().ok_or(InterfaceError::NotFound(*id))
    }

    async fn update(&self, id: &Uuid, update: JobUpdate) -> Result<Job, InterfaceError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id).ok_or(InterfaceError::NotFound(*id))?;
        job.apply(update)?;
        Ok(job.clone())
    }

    async fn list(&self) -> Result<Vec<Job>, InterfaceError> {
        let jobs = self.jobs.read().await;
        let mut snapshot: Vec<Job> = jobs.values().cloned().collect();
        snapshot.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(snapshot)
    }

    async fn delete(&self, id: &Uuid) -> Result<Job, InterfaceError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.remove(id).ok_or(InterfaceError::NotFound(*id))?;
        debug!("Removed job {}", id);
        Ok(job)
    }

    async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
