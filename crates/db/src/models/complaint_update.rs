//! Complaint status audit-trail model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use civiq_core::types::{DbId, Timestamp};

/// A row from the `complaint_updates` table: one status change.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComplaintUpdate {
    pub id: DbId,
    pub complaint_id: DbId,
    /// Worker who made the change, if any.
    pub worker_id: Option<DbId>,
    pub old_status: Option<String>,
    pub new_status: String,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComplaintUpdate {
    pub complaint_id: DbId,
    pub worker_id: Option<DbId>,
    pub old_status: Option<String>,
    pub new_status: String,
    pub note: Option<String>,
}
