//! Background job executor.
//!
//! Runs when a job's delay has elapsed: loads the job, calls the simulator
//! and applies the terminal update through the store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use simjobs_workqueue::{QueueError, Task, TaskHandler};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::definition::{JobResults, JobUpdate};
use super::simulator::Simulator;
use super::store::JobStore;
use crate::error::InterfaceError;

/// Executes due simulation tasks.
pub struct SimulationExecutor {
    job_store: Arc<dyn JobStore>,
    simulator: Arc<dyn Simulator>,
    mark_failed: bool,
}

impl SimulationExecutor {
    /// Create an executor that leaves jobs pending when the simulator fails.
    pub fn new(job_store: Arc<dyn JobStore>, simulator: Arc<dyn Simulator>) -> Self {
        Self {
            job_store,
            simulator,
            mark_failed: false,
        }
    }

    /// Record simulator failures as the `failed` status.
    pub fn with_mark_failed(mut self, mark_failed: bool) -> Self {
        self.mark_failed = mark_failed;
        self
    }

    /// Apply a terminal update. A job deleted in the meantime is not an error.
    async fn apply(&self, id: Uuid, update: JobUpdate) -> Result<(), QueueError> {
        match self.job_store.update(&id, update).await {
            Ok(job) => {
                info!("Simulation {} is now {}", id, job.status());
                Ok(())
            }
            Err(InterfaceError::NotFound(_)) => {
                debug!("Simulation {} was deleted while running, dropping result", id);
                Ok(())
            }
            Err(e) => Err(QueueError::ExecutionFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl TaskHandler for SimulationExecutor {
    async fn handle(&self, task: &Task) -> Result<(), QueueError> {
        let job = match self.job_store.get(&task.job_id).await {
            Ok(job) => job,
            Err(InterfaceError::NotFound(_)) => {
                debug!("Simulation {} was deleted before it ran, skipping", task.job_id);
                return Ok(());
            }
            Err(e) => return Err(QueueError::ExecutionFailed(e.to_string())),
        };

        match self.simulator.run(&job.scenario).await {
            Ok(data) => {
                let results = JobResults::new(job.id, task.delay.as_secs(), data);
                self.apply(
                    job.id,
                    JobUpdate::Complete {
                        completed_at: Utc::now(),
                        results,
                    },
                )
                .await
            }
            Err(e) => {
                error!("Simulation {} failed: {}", job.id, e);
                if self.mark_failed {
                    self.apply(
                        job.id,
                        JobUpdate::Fail {
                            failed_at: Utc::now(),
                            error: e.to_string(),
                        },
                    )
                    .await?;
                }
                Err(QueueError::ExecutionFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
