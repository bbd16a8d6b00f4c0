//! Welcome, liveness and health handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::job::JobStatus;
use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy.
    Healthy,
    /// Dispatch loop is not running; submitted jobs will not complete.
    Degraded,
}

/// Job counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Task queue counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueCounts {
    /// Tasks waiting for their delay to elapse.
    pub queued: usize,
    /// Simulations currently running.
    pub active: u64,
    /// Free worker slots.
    pub idle_workers: usize,
    pub processed: u64,
    pub failed: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub jobs: JobCounts,
    pub queue: QueueCounts,
}

/// Welcome endpoint.
///
/// GET /
pub async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "simjobs",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Simulation job service is running",
    }))
}

/// Liveness probe.
///
/// GET /livez
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}

/// Health check with job and queue counters.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut jobs = JobCounts::default();
    if let Ok(all) = state.job_store.list().await {
        jobs.total = all.len();
        for job in &all {
            match job.status() {
                JobStatus::Pending => jobs.pending += 1,
                JobStatus::Completed => jobs.completed += 1,
                JobStatus::Failed => jobs.failed += 1,
            }
        }
    }

    let stats = state.pool.stats();
    let queue = QueueCounts {
        queued: state.queue.len().await,
        active: stats.active(),
        idle_workers: state.pool.available_workers(),
        processed: stats.processed(),
        failed: stats.failed(),
    };

    let status = if state.pool.is_running() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        jobs,
        queue,
    })
}
