//! Complaint entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use civiq_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (match database tables)
// ---------------------------------------------------------------------------

/// A complaint row from the `complaints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    /// Submitting citizen.
    pub user_id: DbId,
    /// Assigned worker, if any.
    pub worker_id: Option<DbId>,
    pub title: String,
    pub category: String,
    pub description: String,
    /// `"lat,lon"` pair as submitted.
    pub location: String,
    pub image_url: Option<String>,
    pub image_severity: f64,
    pub status: String,
    /// Classifier output: `"Critical"` | `"High"` | `"Medium"` | `"Low"`.
    pub priority: Option<String>,
    pub priority_confidence: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Complaint listing row: complaint fields joined with the submitter and
/// assigned-worker names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComplaintSummary {
    pub id: DbId,
    pub user_id: DbId,
    pub worker_id: Option<DbId>,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub image_url: Option<String>,
    pub image_severity: f64,
    pub status: String,
    pub priority: Option<String>,
    pub priority_confidence: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_name: String,
    pub worker_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Create / Update DTOs
// ---------------------------------------------------------------------------

/// DTO for submitting a new complaint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComplaint {
    pub user_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 3, max = 64))]
    pub location: String,
    pub image_url: Option<String>,
    /// Severity estimate in [0, 1] from the external image service.
    #[validate(range(min = 0.0, max = 1.0))]
    pub image_severity: f64,
}

/// DTO for editing complaint details. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateComplaintDetails {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 3, max = 64))]
    pub location: Option<String>,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregate DTOs
// ---------------------------------------------------------------------------

/// One bucket of the status histogram.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// One bucket of the category histogram.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// One bucket of the priority histogram.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriorityCount {
    pub priority: Option<String>,
    pub count: i64,
}
