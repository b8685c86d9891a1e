//! Repository for the `complaint_updates` audit-trail table.

use sqlx::PgPool;

use civiq_core::types::DbId;

use crate::models::complaint_update::{ComplaintUpdate, CreateComplaintUpdate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, complaint_id, worker_id, old_status, new_status, note, created_at";

/// Read access to the complaint status history.
///
/// Inserts normally happen inside [`LifecycleRepo`] transactions so the
/// audit row commits atomically with the status change.
///
/// [`LifecycleRepo`]: crate::repositories::LifecycleRepo
pub struct ComplaintUpdateRepo;

impl ComplaintUpdateRepo {
    /// Insert an audit row outside a lifecycle transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComplaintUpdate,
    ) -> Result<ComplaintUpdate, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaint_updates (complaint_id, worker_id, old_status, new_status, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ComplaintUpdate>(&query)
            .bind(input.complaint_id)
            .bind(input.worker_id)
            .bind(&input.old_status)
            .bind(&input.new_status)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// Full status history for a complaint, oldest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<ComplaintUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaint_updates \
             WHERE complaint_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ComplaintUpdate>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }
}
