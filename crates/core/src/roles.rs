//! Well-known role name constants.
//!
//! These must match the seed data written by the `civiq-migrate` binary.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_WORKER: &str = "worker";
pub const ROLE_CITIZEN: &str = "user";
