//! Simulator seam.
//!
//! The simulation itself is an external collaborator. The executor only
//! depends on the [`Simulator`] trait; [`SyntheticSimulator`] is a
//! deterministic stand-in used by default.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use super::definition::ScenarioParams;

/// Largest number of per-scenario entries listed in synthetic output.
const MAX_LISTED_SCENARIOS: u32 = 100;

/// Simulator errors.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid scenario parameters: {0}")]
    InvalidParameters(String),

    #[error("Simulation failed: {0}")]
    Failed(String),
}

/// Turns scenario parameters into a result payload.
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn run(&self, params: &ScenarioParams) -> Result<serde_json::Value, SimulationError>;
}

/// Deterministic simulator that describes the requested scenarios without
/// modelling anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticSimulator;

#[async_trait]
impl Simulator for SyntheticSimulator {
    async fn run(&self, params: &ScenarioParams) -> Result<serde_json::Value, SimulationError> {
        if params.end_date <= params.start_date {
            return Err(SimulationError::InvalidParameters(
                "end date must be after start date".to_string(),
            ));
        }

        let period_days = (params.end_date - params.start_date).num_days();
        let listed = params.num_scenarios.min(MAX_LISTED_SCENARIOS);
        let scenarios: Vec<serde_json::Value> = (0..listed)
            .map(|index| {
                json!({
                    "index": index,
                    "label": format!("{}-{}", params.scenario_type, index + 1),
                    "start": params.start_date,
                    "end": params.end_date,
                })
            })
            .collect();

        Ok(json!({
            "scenario_type": params.scenario_type,
            "num_scenarios": params.num_scenarios,
            "period_days": period_days,
            "scenarios": scenarios,
            "truncated": listed < params.num_scenarios,
        }))
    }
}
