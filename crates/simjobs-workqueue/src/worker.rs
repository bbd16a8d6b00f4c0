//! Worker pool for task execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Semaphore, broadcast};
use tracing::{debug, error, info, warn};

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::queue::TaskQueue;
use crate::task::Task;

/// Task handler trait.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Execute a due task.
    async fn handle(&self, task: &Task) -> Result<(), QueueError>;
}

/// Execution counters shared by every task the pool spawns.
#[derive(Debug, Default)]
pub struct PoolStats {
    active: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
}

impl PoolStats {
    /// Tasks currently executing.
    pub fn active(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Tasks whose handler returned `Ok`.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    /// Tasks whose handler returned an error.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Worker pool for concurrent task execution.
pub struct WorkerPool {
    config: QueueConfig,
    semaphore: Arc<Semaphore>,
    running: AtomicBool,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Create a new worker pool.
    pub fn new(config: QueueConfig) -> Self {
        let permits = config.max_workers.max(1) as usize;
        Self {
            config,
            semaphore: Arc::new(Semaphore::new(permits)),
            running: AtomicBool::new(false),
            stats: Arc::new(PoolStats::default()),
        }
    }

    /// Check if the dispatch loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get execution counters.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Get number of idle worker slots.
    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Spawn a task onto its own tokio task, waiting there for a free worker
    /// slot. Failures are logged and counted; tasks are never retried.
    fn dispatch<H: TaskHandler + ?Sized + 'static>(&self, task: Task, handler: Arc<H>) {
        let semaphore = self.semaphore.clone();
        let stats = self.stats.clone();

        tokio::spawn(async move {
            // Errors are already logged and counted by run_task
            let _ = run_task(&semaphore, &stats, &task, handler.as_ref()).await;
        });
    }

    /// Run the dispatch loop until a shutdown signal arrives.
    ///
    /// On shutdown the queue is closed and tasks that never fired are dropped.
    pub async fn run_loop<H: TaskHandler + ?Sized + 'static>(
        self: Arc<Self>,
        queue: Arc<TaskQueue>,
        handler: Arc<H>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        self.running.store(true, Ordering::SeqCst);
        info!(
            "Worker pool started with {} workers",
            self.config.max_workers
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Worker pool shutting down");
                    break;
                }
                _ = queue.wait_for_ready() => {
                    while let Some(task) = queue.dequeue_ready().await {
                        self.dispatch(task, handler.clone());
                    }
                }
            }
        }

        queue.close();
        let dropped = queue.drain().await;
        if !dropped.is_empty() {
            warn!("Dropped {} scheduled tasks on shutdown", dropped.len());
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Worker pool stopped");
    }
}

async fn run_task<H: TaskHandler + ?Sized>(
    semaphore: &Semaphore,
    stats: &PoolStats,
    task: &Task,
    handler: &H,
) -> Result<(), QueueError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| QueueError::ShuttingDown)?;

    stats.active.fetch_add(1, Ordering::SeqCst);
    debug!("Executing task {} for job {}", task.id, task.job_id);

    let result = handler.handle(task).await;
    stats.active.fetch_sub(1, Ordering::SeqCst);

    match &result {
        Ok(()) => {
            stats.processed.fetch_add(1, Ordering::SeqCst);
            debug!("Task {} for job {} finished", task.id, task.job_id);
        }
        Err(e) => {
            stats.failed.fetch_add(1, Ordering::SeqCst);
            error!("Task {} for job {} failed: {}", task.id, task.job_id, e);
        }
    }

    result
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
