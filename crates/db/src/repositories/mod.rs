//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod complaint_repo;
pub mod complaint_update_repo;
pub mod lifecycle_repo;
pub mod user_repo;

pub use complaint_repo::ComplaintRepo;
pub use complaint_update_repo::ComplaintUpdateRepo;
pub use lifecycle_repo::{LifecycleRepo, StatusTransition};
pub use user_repo::UserRepo;
