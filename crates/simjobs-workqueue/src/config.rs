//! Queue configuration.

use serde::{Deserialize, Serialize};

/// Queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of tasks executing concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: u32,

    /// Maximum queue size (0 = unlimited).
    #[serde(default)]
    pub max_queue_size: u64,
}

fn default_max_workers() -> u32 {
    4
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            max_queue_size: 0,
        }
    }
}
