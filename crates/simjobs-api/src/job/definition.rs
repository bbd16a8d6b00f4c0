//! Job definition and status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InterfaceError;

/// Job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for the background executor.
    Pending,
    /// Results attached.
    Completed,
    /// The simulator failed (only when failures are recorded).
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scenario parameters handed to the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub num_scenarios: u32,
    pub scenario_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Results attached to a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResults {
    pub message: String,
    /// Delay the job waited before running, in seconds.
    pub processed_duration: u64,
    /// Simulator output.
    pub data: serde_json::Value,
}

impl JobResults {
    pub fn new(job_id: Uuid, processed_duration: u64, data: serde_json::Value) -> Self {
        Self {
            message: format!("Simulation {} completed successfully", job_id),
            processed_duration,
            data,
        }
    }
}

/// Lifecycle state. Fields that only exist after completion live in the
/// variant, so a pending job cannot carry results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Completed {
        completed_at: DateTime<Utc>,
        results: JobResults,
    },
    Failed {
        failed_at: DateTime<Utc>,
        error: String,
    },
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Pending => JobStatus::Pending,
            JobState::Completed { .. } => JobStatus::Completed,
            JobState::Failed { .. } => JobStatus::Failed,
        }
    }
}

/// Terminal update applied by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdate {
    Complete {
        completed_at: DateTime<Utc>,
        results: JobResults,
    },
    Fail {
        failed_at: DateTime<Utc>,
        error: String,
    },
}

/// A simulation job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID.
    pub id: Uuid,
    /// Free-text label.
    pub name: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub scenario: ScenarioParams,
    #[serde(flatten)]
    pub state: JobState,
}

impl Job {
    /// Create a pending job with a fresh id.
    pub fn new(name: impl Into<String>, scenario: ScenarioParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            scenario,
            state: JobState::Pending,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, JobState::Pending)
    }

    /// Completion time, once completed.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            JobState::Completed { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }

    /// Results, once completed.
    pub fn results(&self) -> Option<&JobResults> {
        match &self.state {
            JobState::Completed { results, .. } => Some(results),
            _ => None,
        }
    }

    /// Apply a terminal update. Only a pending job can be updated.
    pub fn apply(&mut self, update: JobUpdate) -> Result<(), InterfaceError> {
        if !self.is_pending() {
            return Err(InterfaceError::InvalidTransition {
                id: self.id,
                status: self.status(),
            });
        }

        self.state = match update {
            JobUpdate::Complete {
                completed_at,
                results,
            } => JobState::Completed {
                completed_at,
                results,
            },
            JobUpdate::Fail { failed_at, error } => JobState::Failed { failed_at, error },
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scenario() -> ScenarioParams {
        ScenarioParams {
            num_scenarios: 5,
            scenario_type: "x".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    fn complete_update(job: &Job) -> JobUpdate {
        JobUpdate::Complete {
            completed_at: Utc::now(),
            results: JobResults::new(job.id, 1, serde_json::json!({"ok": true})),
        }
    }

    #[test]
    fn test_job_new_is_pending() {
        let job = Job::new("t", scenario());
        assert_eq!(job.status(), JobStatus::Pending);
        assert!(job.is_pending());
        assert!(job.completed_at().is_none());
        assert!(job.results().is_none());
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = Job::new("a", scenario());
        let b = Job::new("b", scenario());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_job_complete() {
        let mut job = Job::new("t", scenario());
        job.apply(complete_update(&job)).unwrap();

        assert_eq!(job.status(), JobStatus::Completed);
        assert!(job.completed_at().is_some());
        let results = job.results().unwrap();
        assert_eq!(results.processed_duration, 1);
        assert_eq!(
            results.message,
            format!("Simulation {} completed successfully", job.id)
        );
    }

    #[test]
    fn test_job_completes_only_once() {
        let mut job = Job::new("t", scenario());
        job.apply(complete_update(&job)).unwrap();
        let first = job.clone();

        let err = job.apply(complete_update(&job)).unwrap_err();
        assert!(matches!(
            err,
            InterfaceError::InvalidTransition {
                status: JobStatus::Completed,
                ..
            }
        ));
        assert_eq!(job, first);
    }

    #[test]
    fn test_failed_job_cannot_complete() {
        let mut job = Job::new("t", scenario());
        job.apply(JobUpdate::Fail {
            failed_at: Utc::now(),
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(job.status(), JobStatus::Failed);

        assert!(job.apply(complete_update(&job)).is_err());
        assert_eq!(job.status(), JobStatus::Failed);
    }

    #[test]
    fn test_pending_job_serialization() {
        let job = Job::new("t", scenario());
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["name"], "t");
        assert_eq!(json["num_scenarios"], 5);
        assert_eq!(json["scenario_type"], "x");
        assert_eq!(json["start_date"], "2024-01-01T00:00:00Z");
        assert!(json.get("results").is_none());
        assert!(json.get("completed_at").is_none());
    }

    #[test]
    fn test_completed_job_serialization() {
        let mut job = Job::new("t", scenario());
        job.apply(complete_update(&job)).unwrap();
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(json["status"], "completed");
        assert!(json["completed_at"].is_string());
        assert_eq!(json["results"]["processed_duration"], 1);
        assert_eq!(json["results"]["data"]["ok"], true);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Pending.to_string(), "pending");
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
