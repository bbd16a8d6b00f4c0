//! Simulation jobs.
//!
//! Data model, store, submission validation, background executor and the
//! HTTP handlers for the job lifecycle.

mod definition;
mod executor;
mod request;
pub mod routes;
mod simulator;
mod store;

pub use definition::{Job, JobResults, JobState, JobStatus, JobUpdate, ScenarioParams};
pub use executor::SimulationExecutor;
pub use request::{
    MAX_DURATION_SECS, SimulationRequest, SimulationResponse, ValidatedSubmission,
    ValidationError,
};
pub use simulator::{SimulationError, Simulator, SyntheticSimulator};
pub use store::{JobStore, MemoryJobStore};
