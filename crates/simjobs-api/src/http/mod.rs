//! HTTP interface module.
//!
//! Provides the REST endpoints for:
//! - Simulation submission, listing, lookup and deletion
//! - Welcome, liveness and health checks

pub mod cors;
pub mod routes;

pub(crate) mod monitoring;
