//! Simulation HTTP route handlers.
//!
//! - POST   /start-simulation   - Submit a simulation
//! - GET    /simulations        - List simulations
//! - GET    /simulations/{id}   - Get simulation
//! - DELETE /simulations/{id}   - Delete simulation
//!
//! Unknown ids are reported with a `200` and an `error` body rather than a
//! dedicated status code.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;
use simjobs_workqueue::Task;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::definition::Job;
use super::request::{SimulationRequest, SimulationResponse};
use crate::error::InterfaceError;
use crate::state::AppState;

/// Response for listing simulations.
#[derive(Debug, Serialize)]
pub struct SimulationListResponse {
    pub simulations: Vec<Job>,
}

/// Response for a single simulation.
#[derive(Debug, Serialize)]
pub struct SimulationRecordResponse {
    pub simulation: Job,
}

/// Response for a deleted simulation.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

fn parse_id(raw: &str) -> Result<Uuid, InterfaceError> {
    Uuid::parse_str(raw).map_err(|_| InterfaceError::InvalidId(raw.to_string()))
}

/// Submit a simulation.
///
/// POST /start-simulation
pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, InterfaceError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected malformed simulation request: {}", rejection);
        InterfaceError::MalformedBody(rejection.body_text())
    })?;

    let submission = request.validate().inspect_err(|e| {
        info!("Rejected simulation request: {}", e);
    })?;

    let job = Job::new(submission.name.clone(), submission.scenario.clone());
    let id = job.id;
    let response = SimulationResponse::new(&job, submission.duration);

    state.job_store.insert(job).await?;

    if let Err(e) = state.queue.enqueue(Task::new(id, submission.duration)).await {
        // Roll back so a refused submission leaves no record behind
        if let Err(rollback) = state.job_store.delete(&id).await {
            error!("Failed to roll back simulation {}: {}", id, rollback);
        }
        warn!("Could not schedule simulation {}: {}", id, e);
        return Err(e.into());
    }

    info!(
        "Started simulation {} '{}' ({} x {}, runs in {}s)",
        id,
        submission.name,
        submission.scenario.num_scenarios,
        submission.scenario.scenario_type,
        submission.duration.as_secs()
    );

    Ok(Json(response))
}

/// List all simulations.
///
/// GET /simulations
pub async fn list_simulations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SimulationListResponse>, InterfaceError> {
    let simulations = state.job_store.list().await?;
    Ok(Json(SimulationListResponse { simulations }))
}

/// Get a simulation by ID.
///
/// GET /simulations/{id}
pub async fn get_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SimulationRecordResponse>, InterfaceError> {
    let id = parse_id(&id)?;
    let simulation = state.job_store.get(&id).await?;
    Ok(Json(SimulationRecordResponse { simulation }))
}

/// Delete a simulation.
///
/// DELETE /simulations/{id}
///
/// A task already scheduled for the job still fires, and then finds nothing
/// to update.
pub async fn delete_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, InterfaceError> {
    let id = parse_id(&id)?;
    state.job_store.delete(&id).await?;
    info!("Deleted simulation {}", id);

    Ok(Json(DeleteResponse {
        message: "Simulation deleted successfully".to_string(),
    }))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
