//! Transactional complaint status transitions.
//!
//! A transition touches up to three tables: the complaint's status, the
//! assigned worker's task counter and workload, and the audit trail. All
//! writes commit atomically or not at all.

use sqlx::{PgPool, Postgres, Transaction};

use civiq_core::complaint::{ComplaintStatus, Workload};
use civiq_core::lifecycle::{workload_effect, WorkloadEffect};
use civiq_core::types::DbId;

use crate::models::complaint::Complaint;

/// One validated status change, ready to apply.
///
/// Callers are responsible for checking the transition against
/// `civiq_core::lifecycle::validate_transition` first; this repo only
/// executes the writes.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub complaint_id: DbId,
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
    /// Worker whose counter the transition affects, and who is recorded
    /// in the audit trail.
    pub worker_id: Option<DbId>,
    pub note: Option<String>,
}

/// Applies status transitions in a single database transaction.
pub struct LifecycleRepo;

impl LifecycleRepo {
    /// Apply a status transition: complaint status, worker counter, and
    /// audit row in one transaction.
    ///
    /// Returns the updated complaint. Fails with `RowNotFound` if the
    /// complaint disappeared between validation and execution.
    pub async fn apply_status_transition(
        pool: &PgPool,
        transition: &StatusTransition,
    ) -> Result<Complaint, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let complaint = sqlx::query_as::<_, Complaint>(
            "UPDATE complaints SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING id, user_id, worker_id, title, category, description, location, \
                       image_url, image_severity, status, priority, priority_confidence, \
                       created_at, updated_at",
        )
        .bind(transition.complaint_id)
        .bind(transition.to.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if let (Some(effect), Some(worker_id)) =
            (workload_effect(transition.to), transition.worker_id)
        {
            Self::apply_worker_effect(&mut tx, worker_id, effect).await?;
        }

        sqlx::query(
            "INSERT INTO complaint_updates (complaint_id, worker_id, old_status, new_status, note)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(transition.complaint_id)
        .bind(transition.worker_id)
        .bind(transition.from.as_str())
        .bind(transition.to.as_str())
        .bind(&transition.note)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            complaint_id = transition.complaint_id,
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            "Applied status transition"
        );

        Ok(complaint)
    }

    /// Adjust a worker's task counter and re-derive the workload flag.
    ///
    /// The decrement clamps at zero so duplicate completions never drive
    /// the counter negative.
    async fn apply_worker_effect(
        tx: &mut Transaction<'_, Postgres>,
        worker_id: DbId,
        effect: WorkloadEffect,
    ) -> Result<(), sqlx::Error> {
        let counter_sql = match effect {
            WorkloadEffect::Increment => {
                "UPDATE users SET active_tasks = active_tasks + 1, updated_at = NOW()
                 WHERE id = $1 RETURNING active_tasks"
            }
            WorkloadEffect::Decrement => {
                "UPDATE users SET active_tasks = GREATEST(active_tasks - 1, 0), updated_at = NOW()
                 WHERE id = $1 RETURNING active_tasks"
            }
        };

        let (active_tasks,): (i32,) = sqlx::query_as(counter_sql)
            .bind(worker_id)
            .fetch_one(&mut **tx)
            .await?;

        sqlx::query("UPDATE users SET workload = $2 WHERE id = $1")
            .bind(worker_id)
            .bind(Workload::from_active_tasks(active_tasks).as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
