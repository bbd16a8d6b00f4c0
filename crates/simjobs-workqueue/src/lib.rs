//! # simjobs Queue
//!
//! Delayed task queue for background simulation jobs.
//!
//! ## Features
//!
//! - Tasks become due after a per-task delay
//! - Earliest-due-first dequeue, independent of submission order
//! - Worker pool with bounded concurrent execution
//! - No retries and no persistence: unfired tasks are dropped on shutdown

pub mod config;
pub mod error;
pub mod queue;
pub mod task;
pub mod worker;

pub use config::QueueConfig;
pub use error::QueueError;
pub use queue::TaskQueue;
pub use task::Task;
pub use worker::{PoolStats, TaskHandler, WorkerPool};
