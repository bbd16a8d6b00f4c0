//! Due-time ordered task queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::{Mutex, Notify};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::task::Task;

/// Wrapper ordering tasks so the earliest due time is popped first.
struct ScheduledTask {
    task: Task,
    seq: u64,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: earlier due time, then earlier enqueue, wins
        other
            .task
            .due_at
            .cmp(&self.task.due_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// In-memory queue of delayed tasks.
pub struct TaskQueue {
    config: QueueConfig,
    heap: Mutex<BinaryHeap<ScheduledTask>>,
    next_seq: AtomicU64,
    closed: AtomicBool,
    notify: Notify,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            heap: Mutex::new(BinaryHeap::new()),
            next_seq: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Enqueue a task.
    pub async fn enqueue(&self, task: Task) -> Result<(), QueueError> {
        if self.is_closed() {
            return Err(QueueError::ShuttingDown);
        }

        let mut heap = self.heap.lock().await;
        if self.config.max_queue_size > 0 && heap.len() as u64 >= self.config.max_queue_size {
            return Err(QueueError::QueueFull);
        }

        debug!(
            "Enqueueing task {} for job {} (delay: {:?})",
            task.id, task.job_id, task.delay
        );
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
        heap.push(ScheduledTask { task, seq });
        drop(heap);

        // Wake the dispatcher so it can re-arm for a possibly earlier due time
        self.notify.notify_one();
        Ok(())
    }

    /// Pop the earliest task whose delay has elapsed.
    pub async fn dequeue_ready(&self) -> Option<Task> {
        let mut heap = self.heap.lock().await;
        if heap.peek().is_some_and(|s| s.task.is_ready()) {
            let task = heap.pop().map(|s| s.task);
            if let Some(ref task) = task {
                debug!("Dequeued task {} for job {}", task.id, task.job_id);
            }
            task
        } else {
            None
        }
    }

    /// Due time of the earliest task, if any.
    pub async fn next_due(&self) -> Option<Instant> {
        self.heap.lock().await.peek().map(|s| s.task.due_at)
    }

    /// Wait until the earliest task is due or a new task is enqueued.
    pub async fn wait_for_ready(&self) {
        let notified = self.notify.notified();

        match self.next_due().await {
            Some(due) => {
                tokio::select! {
                    _ = time::sleep_until(due) => {}
                    _ = notified => {}
                }
            }
            None => notified.await,
        }
    }

    /// Get queue length.
    pub async fn len(&self) -> usize {
        self.heap.lock().await.len()
    }

    /// Check if queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.heap.lock().await.is_empty()
    }

    /// Stop accepting new tasks.
    pub fn close(&self) {
        self.closed.store(true, AtomicOrdering::SeqCst);
        self.notify.notify_one();
    }

    /// Whether the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(AtomicOrdering::SeqCst)
    }

    /// Remove and return every queued task, earliest due first.
    pub async fn drain(&self) -> Vec<Task> {
        let mut heap = self.heap.lock().await;
        let mut tasks = Vec::with_capacity(heap.len());
        while let Some(scheduled) = heap.pop() {
            tasks.push(scheduled.task);
        }
        tasks
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
