//! Delayed task definition.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Upper bound for a due time, far beyond any realistic delay.
const MAX_DELAY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A unit of deferred work for one job.
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique task ID.
    pub id: Uuid,
    /// Job the task executes.
    pub job_id: Uuid,
    /// Delay requested at submission.
    pub delay: Duration,
    /// Monotonic time at which the task becomes ready.
    pub due_at: Instant,
}

impl Task {
    /// Create a task that becomes ready `delay` from now.
    pub fn new(job_id: Uuid, delay: Duration) -> Self {
        let due_at = Instant::now() + delay.min(MAX_DELAY);

        Self {
            id: Uuid::new_v4(),
            job_id,
            delay,
            due_at,
        }
    }

    /// Check if the task's delay has elapsed.
    pub fn is_ready(&self) -> bool {
        self.due_at <= Instant::now()
    }

    /// Time left until the task is ready.
    pub fn remaining(&self) -> Duration {
        self.due_at.saturating_duration_since(Instant::now())
    }
}
