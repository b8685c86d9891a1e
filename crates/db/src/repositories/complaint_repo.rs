//! Repository for the `complaints` table.

use sqlx::PgPool;

use civiq_core::types::DbId;

use crate::models::complaint::{
    CategoryCount, Complaint, ComplaintSummary, CreateComplaint, PriorityCount, StatusCount,
    UpdateComplaintDetails,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, worker_id, title, category, description, location, \
                        image_url, image_severity, status, priority, priority_confidence, \
                        created_at, updated_at";

/// Column list for listing queries joined with submitter/worker names.
const SUMMARY_COLUMNS: &str = "\
    c.id, c.user_id, c.worker_id, c.title, c.category, c.description, c.location, \
    c.image_url, c.image_severity, c.status, c.priority, c.priority_confidence, \
    c.created_at, c.updated_at, u.name AS user_name, w.name AS worker_name";

const SUMMARY_JOINS: &str = "\
    FROM complaints c \
    JOIN users u ON u.id = c.user_id \
    LEFT JOIN users w ON w.id = c.worker_id";

/// Triage ordering: actionable statuses first, higher priority first,
/// newest first. Must stay in sync with the ranks in `civiq_core::queue`.
const TRIAGE_ORDER: &str = "\
    CASE c.status \
        WHEN 'pending' THEN 1 \
        WHEN 'assigned' THEN 2 \
        WHEN 'completed' THEN 3 \
        ELSE 4 \
    END, \
    CASE c.priority \
        WHEN 'Critical' THEN 1 \
        WHEN 'High' THEN 2 \
        WHEN 'Medium' THEN 3 \
        WHEN 'Low' THEN 4 \
        ELSE 5 \
    END, \
    c.created_at DESC";

/// Provides CRUD and triage-queue operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    // ── Mutations ────────────────────────────────────────────────────────

    /// Insert a new complaint in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComplaint) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints (user_id, title, category, description, location, \
                image_url, image_severity)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.image_url)
            .bind(input.image_severity)
            .fetch_one(pool)
            .await
    }

    /// Insert a new complaint together with its classifier output.
    ///
    /// One statement, so a crash can never leave a committed complaint
    /// without its priority.
    pub async fn create_classified(
        pool: &PgPool,
        input: &CreateComplaint,
        priority: &str,
        confidence: f64,
    ) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints (user_id, title, category, description, location, \
                image_url, image_severity, priority, priority_confidence)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.image_url)
            .bind(input.image_severity)
            .bind(priority)
            .bind(confidence)
            .fetch_one(pool)
            .await
    }

    /// Replace the priority by hand (admin override). Clears the stored
    /// confidence since it no longer reflects classifier output.
    pub async fn override_priority(
        pool: &PgPool,
        id: DbId,
        priority: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET priority = $2, priority_confidence = NULL, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(priority)
            .fetch_optional(pool)
            .await
    }

    /// Assign a worker to a pending complaint, moving it to `assigned`.
    pub async fn assign_worker(
        pool: &PgPool,
        id: DbId,
        worker_id: DbId,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET worker_id = $2, status = 'assigned', updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(worker_id)
            .fetch_optional(pool)
            .await
    }

    /// Edit complaint details. Only non-`None` fields in `input` are applied.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComplaintDetails,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a complaint (its audit trail cascades).
    ///
    /// Returns `true` if the row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Find a complaint by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of the full triage queue (admin view).
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ComplaintSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_JOINS} \
             ORDER BY {TRIAGE_ORDER} LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ComplaintSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total complaint count (admin view).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM complaints")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// One page of the complaints assigned to a worker, newest first.
    ///
    /// Personal views skip the triage ranking; only the admin queue uses it.
    pub async fn list_for_worker_page(
        pool: &PgPool,
        worker_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ComplaintSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_JOINS} WHERE c.worker_id = $1 \
             ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ComplaintSummary>(&query)
            .bind(worker_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count of complaints assigned to a worker.
    pub async fn count_for_worker(pool: &PgPool, worker_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM complaints WHERE worker_id = $1")
            .bind(worker_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// One page of a citizen's own complaints, newest first.
    pub async fn list_for_submitter_page(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ComplaintSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_JOINS} WHERE c.user_id = $1 \
             ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ComplaintSummary>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count of a citizen's own complaints.
    pub async fn count_for_submitter(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM complaints WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    // ── Analytics ────────────────────────────────────────────────────────

    /// Complaint counts per status.
    pub async fn status_counts(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM complaints GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Complaint counts per category.
    pub async fn category_counts(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM complaints \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }

    /// Complaint counts per priority (unclassified rows group under NULL).
    pub async fn priority_counts(pool: &PgPool) -> Result<Vec<PriorityCount>, sqlx::Error> {
        sqlx::query_as::<_, PriorityCount>(
            "SELECT priority, COUNT(*) AS count FROM complaints \
             GROUP BY priority ORDER BY priority",
        )
        .fetch_all(pool)
        .await
    }

    /// The most recently submitted complaints.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Complaint>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM complaints ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
