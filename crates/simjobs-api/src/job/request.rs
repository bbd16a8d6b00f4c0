//! Submission request, validation and acknowledgement.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::definition::{Job, JobStatus, ScenarioParams};

/// Largest accepted delay: ten years.
pub const MAX_DURATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Body of `POST /start-simulation`.
///
/// Every field is optional at the parsing stage so that missing values are
/// reported by [`SimulationRequest::validate`] in rule order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationRequest {
    /// Delay in seconds before the simulation runs.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub num_scenarios: Option<i64>,
    #[serde(default)]
    pub scenario_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Submission validation failures, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Number of scenarios is required")]
    NumScenariosRequired,

    #[error("Scenario type is required")]
    ScenarioTypeRequired,

    #[error("Start date is required")]
    StartDateRequired,

    #[error("End date is required")]
    EndDateRequired,

    #[error("Duration must be a positive integer")]
    NonPositiveDuration,

    #[error("Duration must not exceed {} seconds", MAX_DURATION_SECS)]
    DurationTooLarge,

    #[error("End date must be after start date")]
    EndNotAfterStart,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub scenario: ScenarioParams,
    pub duration: Duration,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SimulationRequest {
    /// Check the request; the first failing rule wins.
    pub fn validate(self) -> Result<ValidatedSubmission, ValidationError> {
        let name = non_blank(self.name).ok_or(ValidationError::NameRequired)?;

        let num_scenarios = self
            .num_scenarios
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ValidationError::NumScenariosRequired)?;

        let scenario_type =
            non_blank(self.scenario_type).ok_or(ValidationError::ScenarioTypeRequired)?;

        let start_date = self.start_date.ok_or(ValidationError::StartDateRequired)?;
        let end_date = self.end_date.ok_or(ValidationError::EndDateRequired)?;

        let duration = match self.duration {
            Some(d) if d > MAX_DURATION_SECS => return Err(ValidationError::DurationTooLarge),
            Some(d) if d > 0 => Duration::from_secs(d as u64),
            _ => return Err(ValidationError::NonPositiveDuration),
        };

        if end_date <= start_date {
            return Err(ValidationError::EndNotAfterStart);
        }

        Ok(ValidatedSubmission {
            name,
            scenario: ScenarioParams {
                num_scenarios,
                scenario_type,
                start_date,
                end_date,
            },
            duration,
        })
    }
}

/// Acknowledgement returned for an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Informational: `created_at + duration`. The executor's real completion
    /// time also includes queueing and simulation time.
    pub estimated_completion_time: DateTime<Utc>,
    pub num_scenarios: u32,
    pub scenario_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl SimulationResponse {
    pub fn new(job: &Job, duration: Duration) -> Self {
        // Validation bounds the duration, so the addition cannot overflow
        let delay = TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX);
        let estimated_completion_time = job
            .created_at
            .checked_add_signed(delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id: job.id,
            status: job.status(),
            created_at: job.created_at,
            estimated_completion_time,
            num_scenarios: job.scenario.num_scenarios,
            scenario_type: job.scenario.scenario_type.clone(),
            start_date: job.scenario.start_date,
            end_date: job.scenario.end_date,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
