//! Repository for the `users` table.

use sqlx::PgPool;

use civiq_core::roles::ROLE_WORKER;
use civiq_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, WorkerSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, role, latitude, longitude, \
                        workload, active_tasks, created_at, updated_at";

/// Provides CRUD operations for users and worker listings.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role, latitude, longitude)
             VALUES ($1, $2, COALESCE($3, 'user'), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.latitude)
            .bind(&input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a worker by ID. Returns `None` for non-worker users too.
    pub async fn find_worker(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND role = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(ROLE_WORKER)
            .fetch_optional(pool)
            .await
    }

    /// List all workers ordered by name (assignment candidate pool).
    pub async fn list_workers(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE role = $1 ORDER BY name ASC");
        sqlx::query_as::<_, User>(&query)
            .bind(ROLE_WORKER)
            .fetch_all(pool)
            .await
    }

    /// One page of workers with their open-complaint counts (admin view).
    ///
    /// Free workers sort before busy ones so the dispatcher sees available
    /// capacity first.
    pub async fn list_worker_summaries_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let query = "\
            SELECT u.id, u.name, u.email, u.latitude, u.longitude, \
                   u.workload, u.active_tasks, \
                   COUNT(c.id) FILTER (WHERE c.status IN ('assigned', 'in_progress')) \
                       AS open_complaints \
            FROM users u \
            LEFT JOIN complaints c ON c.worker_id = u.id \
            WHERE u.role = $1 \
            GROUP BY u.id \
            ORDER BY u.workload DESC, u.name ASC \
            LIMIT $2 OFFSET $3";
        sqlx::query_as::<_, WorkerSummary>(query)
            .bind(ROLE_WORKER)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count of users with the given role.
    pub async fn count_by_role(pool: &PgPool, role: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// One page of non-admin accounts (citizens and workers, admin view).
    pub async fn list_members_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE role IN ('user', 'worker') \
             ORDER BY workload DESC, name ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count of non-admin accounts.
    pub async fn count_members(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role IN ('user', 'worker')")
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.latitude)
            .bind(&input.longitude)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Returns `true` if the row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
