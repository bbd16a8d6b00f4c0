//! Application state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use simjobs_workqueue::{TaskQueue, WorkerPool};

use crate::job::JobStore;

/// Application state shared across handlers.
///
/// Constructed once at start-up and injected into the router.
pub struct AppState {
    pub job_store: Arc<dyn JobStore>,
    pub queue: Arc<TaskQueue>,
    pub pool: Arc<WorkerPool>,
    start_time: Instant,
}

impl AppState {
    pub fn new(job_store: Arc<dyn JobStore>, queue: Arc<TaskQueue>, pool: Arc<WorkerPool>) -> Self {
        Self {
            job_store,
            queue,
            pool,
            start_time: Instant::now(),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
