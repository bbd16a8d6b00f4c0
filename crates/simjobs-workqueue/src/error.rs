//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue is full.
    #[error("Queue is full")]
    QueueFull,

    /// Queue no longer accepts tasks.
    #[error("Queue is shutting down")]
    ShuttingDown,

    /// Task execution failed.
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),
}
