//! # simjobs API
//!
//! HTTP interface and job lifecycle for the simulation job service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     HTTP (axum + CORS)                       │
//! │   POST /start-simulation   GET/DELETE /simulations[/{id}]    │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │ insert / enqueue             │ list / get / delete
//!                 ▼                              ▼
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │  TaskQueue (due-time     │        │        JobStore          │
//! │  ordered, in memory)     │        │  (pending → completed)   │
//! └───────────────┬──────────┘        └──────────────▲───────────┘
//!                 │ due tasks                        │ update
//!                 ▼                                  │
//! ┌──────────────────────────┐        ┌──────────────┴───────────┐
//! │       WorkerPool         │───────▶│   SimulationExecutor     │
//! └──────────────────────────┘        │   (calls Simulator)      │
//!                                     └──────────────────────────┘
//! ```
//!
//! A job whose record is deleted before its task fires is skipped; the
//! executor never recreates a record.

pub mod error;
pub mod http;
pub mod job;
pub mod server;
pub mod state;

pub use error::InterfaceError;
pub use http::routes::{create_app, create_router};
pub use job::{
    Job, JobResults, JobState, JobStatus, JobStore, JobUpdate, MemoryJobStore, ScenarioParams,
    SimulationError, SimulationExecutor, SimulationRequest, SimulationResponse, Simulator,
    SyntheticSimulator, ValidatedSubmission, ValidationError,
};
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
