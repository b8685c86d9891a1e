//! Service layer for citizen complaint triage.
//!
//! Ties the pure domain logic in `civiq-core`, the frozen classifier in
//! `civiq-model`, and the persistence layer in `civiq-db` into the
//! operations an outer transport (HTTP, CLI, queue consumer) exposes:
//! intake, role-scoped listings, lifecycle updates, and analytics.

pub mod config;
pub mod error;
pub mod service;

pub use config::TriageConfig;
pub use error::TriageError;
pub use service::{Actor, ActorRole, TriageService, UpdateComplaintRequest};
