//! Pure domain logic for the CIVIQ complaint triage engine.
//!
//! This crate has zero internal dependencies so the model, db, and service
//! crates can all build on it. Everything here is synchronous and
//! deterministic: geospatial math, worker scoring, the complaint status
//! state machine, classifier time features, and triage-queue ordering.

pub mod complaint;
pub mod error;
pub mod features;
pub mod geo;
pub mod lifecycle;
pub mod queue;
pub mod roles;
pub mod scoring;
pub mod types;
