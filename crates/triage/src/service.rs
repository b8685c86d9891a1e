//! The triage service: complaint intake and classification, role-scoped
//! queue listings with assignment suggestions, lifecycle enforcement, and
//! admin analytics.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use civiq_core::complaint::{ComplaintStatus, Priority, Workload};
use civiq_core::error::CoreError;
use civiq_core::features::validate_severity;
use civiq_core::geo::parse_location;
use civiq_core::lifecycle::{validate_transition, workload_effect};
use civiq_core::queue::{page_offset, Page};
use civiq_core::roles::{ROLE_ADMIN, ROLE_CITIZEN, ROLE_WORKER};
use civiq_core::scoring::{select_best, Candidate, Suggestion};
use civiq_core::types::DbId;
use civiq_db::models::complaint::{
    CategoryCount, Complaint, ComplaintSummary, CreateComplaint, PriorityCount, StatusCount,
    UpdateComplaintDetails,
};
use civiq_db::models::complaint_update::{ComplaintUpdate, CreateComplaintUpdate};
use civiq_db::models::user::{User, WorkerSummary};
use civiq_db::repositories::{
    ComplaintRepo, ComplaintUpdateRepo, LifecycleRepo, StatusTransition, UserRepo,
};
use civiq_db::DbPool;
use civiq_model::{ComplaintFeatures, PriorityClassifier, PriorityModel};

use crate::config::TriageConfig;
use crate::error::TriageError;

// ---------------------------------------------------------------------------
// Callers
// ---------------------------------------------------------------------------

/// Role of the authenticated caller, resolved by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Admin,
    Worker,
    Citizen,
}

impl ActorRole {
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_WORKER => Some(Self::Worker),
            ROLE_CITIZEN => Some(Self::Citizen),
            _ => None,
        }
    }
}

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: DbId,
    pub role: ActorRole,
}

// ---------------------------------------------------------------------------
// Views and requests
// ---------------------------------------------------------------------------

/// One complaint in a queue listing, with the assignment suggestion the
/// admin view shows alongside every complaint.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: ComplaintSummary,
    /// Recomputed on every fetch; never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

/// Full single-complaint view with submitter contact and status history.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub user_name: String,
    pub user_email: String,
    pub worker_name: Option<String>,
    pub history: Vec<ComplaintUpdate>,
}

/// An update request against one complaint. Every field is optional; role
/// checks decide which of the present fields the caller may apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComplaintRequest {
    /// Target lifecycle status (admin or the assigned worker).
    pub status: Option<String>,
    /// Manual priority override (admin only).
    pub priority: Option<String>,
    /// Worker to assign (admin only); moves the complaint to `assigned`.
    pub worker_id: Option<DbId>,
    /// Field edits (admin only).
    pub details: Option<UpdateComplaintDetails>,
    /// Free-text note recorded in the audit trail alongside a status change.
    pub note: Option<String>,
}

/// Admin dashboard aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_complaints: i64,
    pub total_citizens: i64,
    pub total_workers: i64,
    pub status_breakdown: Vec<StatusCount>,
    pub category_breakdown: Vec<CategoryCount>,
    pub priority_breakdown: Vec<PriorityCount>,
    pub recent_complaints: Vec<Complaint>,
}

/// Number of rows in the analytics recent-complaints strip.
const RECENT_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Owns the pool, the frozen priority model, and the paging configuration.
///
/// The model is injected behind [`PriorityModel`] so tests can substitute
/// a deterministic stub for the artifact bundle.
pub struct TriageService {
    pool: DbPool,
    model: Arc<dyn PriorityModel>,
    config: TriageConfig,
}

impl TriageService {
    pub fn new(pool: DbPool, model: Arc<dyn PriorityModel>, config: TriageConfig) -> Self {
        Self {
            pool,
            model,
            config,
        }
    }

    /// Build a service backed by the frozen artifact bundle in
    /// `config.model_dir`. Fails fast if the bundle cannot be loaded.
    pub fn from_config(pool: DbPool, config: TriageConfig) -> Result<Self, TriageError> {
        let model = PriorityClassifier::load(&config.model_dir)?;
        Ok(Self::new(pool, Arc::new(model), config))
    }

    // ── Intake ───────────────────────────────────────────────────────────

    /// Submit a new complaint: validate, classify, persist.
    ///
    /// Classification runs before the insert so a failed inference leaves
    /// no half-classified row behind.
    pub async fn create_complaint(
        &self,
        input: &CreateComplaint,
    ) -> Result<Complaint, TriageError> {
        input.validate()?;
        parse_location(&input.location)?;
        validate_severity(input.image_severity)?;

        let submitter = UserRepo::find_by_id(&self.pool, input.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: input.user_id,
            })?;

        let submitted_at = Utc::now();
        let inference = self.model.infer(ComplaintFeatures {
            category: &input.category,
            description: &input.description,
            image_severity: input.image_severity,
            submitted_at,
        })?;

        // Row and classification land in one INSERT; a failure on either
        // side leaves nothing behind.
        let complaint = ComplaintRepo::create_classified(
            &self.pool,
            input,
            inference.priority.as_str(),
            inference.confidence,
        )
        .await?;

        tracing::info!(
            complaint_id = complaint.id,
            submitter = %submitter.email,
            priority = inference.priority.as_str(),
            confidence = inference.confidence,
            "Complaint created and classified"
        );
        Ok(complaint)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Fetch one complaint with submitter contact and its status history.
    pub async fn get_complaint(&self, id: DbId) -> Result<ComplaintDetail, TriageError> {
        let complaint = ComplaintRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "complaint",
                id,
            })?;

        let submitter = UserRepo::find_by_id(&self.pool, complaint.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: complaint.user_id,
            })?;

        let worker_name = match complaint.worker_id {
            Some(worker_id) => UserRepo::find_by_id(&self.pool, worker_id)
                .await?
                .map(|w| w.name),
            None => None,
        };

        let history = ComplaintUpdateRepo::list_for_complaint(&self.pool, id).await?;

        Ok(ComplaintDetail {
            complaint,
            user_name: submitter.name,
            user_email: submitter.email,
            worker_name,
            history,
        })
    }

    /// One page of the triage queue, scoped to the caller's role.
    ///
    /// Admins see everything plus an assignment suggestion per complaint;
    /// workers see their assignments; citizens see their own submissions.
    pub async fn list_complaints(
        &self,
        actor: &Actor,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<ComplaintView>, TriageError> {
        let page = resolve_page(page)?;
        let size = self.config.resolve_page_size(page_size);
        let offset = page_offset(page, size);

        let (rows, total) = match actor.role {
            ActorRole::Admin => (
                ComplaintRepo::list_page(&self.pool, size, offset).await?,
                ComplaintRepo::count(&self.pool).await?,
            ),
            ActorRole::Worker => (
                ComplaintRepo::list_for_worker_page(&self.pool, actor.id, size, offset).await?,
                ComplaintRepo::count_for_worker(&self.pool, actor.id).await?,
            ),
            ActorRole::Citizen => (
                ComplaintRepo::list_for_submitter_page(&self.pool, actor.id, size, offset).await?,
                ComplaintRepo::count_for_submitter(&self.pool, actor.id).await?,
            ),
        };

        // Suggestions are an admin-only decoration. One roster fetch
        // covers the whole page.
        let candidates = if actor.role == ActorRole::Admin && !rows.is_empty() {
            self.assignment_candidates().await?
        } else {
            Vec::new()
        };

        let data = rows
            .into_iter()
            .map(|complaint| {
                let suggestion = if actor.role == ActorRole::Admin {
                    self.suggest_worker(&candidates, &complaint)
                } else {
                    None
                };
                ComplaintView {
                    complaint,
                    suggestion,
                }
            })
            .collect();

        Ok(Page::new(data, page, size, total))
    }

    /// One page of workers with open-complaint counts (admin only).
    pub async fn list_workers(
        &self,
        actor: &Actor,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<WorkerSummary>, TriageError> {
        require_admin(actor)?;
        let page = resolve_page(page)?;
        let size = self.config.resolve_page_size(page_size);

        let rows =
            UserRepo::list_worker_summaries_page(&self.pool, size, page_offset(page, size))
                .await?;
        let total = UserRepo::count_by_role(&self.pool, ROLE_WORKER).await?;
        Ok(Page::new(rows, page, size, total))
    }

    /// One page of non-admin accounts (admin only).
    pub async fn list_members(
        &self,
        actor: &Actor,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<User>, TriageError> {
        require_admin(actor)?;
        let page = resolve_page(page)?;
        let size = self.config.resolve_page_size(page_size);

        let rows = UserRepo::list_members_page(&self.pool, size, page_offset(page, size)).await?;
        let total = UserRepo::count_members(&self.pool).await?;
        Ok(Page::new(rows, page, size, total))
    }

    /// Dashboard aggregates (admin only).
    pub async fn analytics(&self, actor: &Actor) -> Result<AnalyticsReport, TriageError> {
        require_admin(actor)?;

        Ok(AnalyticsReport {
            total_complaints: ComplaintRepo::count(&self.pool).await?,
            total_citizens: UserRepo::count_by_role(&self.pool, ROLE_CITIZEN).await?,
            total_workers: UserRepo::count_by_role(&self.pool, ROLE_WORKER).await?,
            status_breakdown: ComplaintRepo::status_counts(&self.pool).await?,
            category_breakdown: ComplaintRepo::category_counts(&self.pool).await?,
            priority_breakdown: ComplaintRepo::priority_counts(&self.pool).await?,
            recent_complaints: ComplaintRepo::recent(&self.pool, RECENT_LIMIT).await?,
        })
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Apply an update request: status change, priority override, worker
    /// assignment, and/or detail edits, gated by the caller's role.
    pub async fn update_complaint(
        &self,
        actor: &Actor,
        id: DbId,
        request: &UpdateComplaintRequest,
    ) -> Result<Complaint, TriageError> {
        let mut complaint = ComplaintRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "complaint",
                id,
            })?;

        match actor.role {
            ActorRole::Admin => {}
            ActorRole::Worker => {
                // Workers may only progress their own assignments.
                if complaint.worker_id != Some(actor.id) {
                    return Err(CoreError::Unauthorized(
                        "complaint is not assigned to this worker".into(),
                    )
                    .into());
                }
                if request.priority.is_some()
                    || request.worker_id.is_some()
                    || request.details.is_some()
                {
                    return Err(CoreError::Unauthorized(
                        "workers may only change complaint status".into(),
                    )
                    .into());
                }
            }
            ActorRole::Citizen => {
                return Err(
                    CoreError::Unauthorized("citizens cannot update complaints".into()).into(),
                );
            }
        }

        if let Some(status) = &request.status {
            complaint = self
                .apply_status_change(actor, &complaint, status, request.note.clone())
                .await?;
        }

        if let Some(priority) = &request.priority {
            let priority = Priority::parse(priority).ok_or_else(|| {
                CoreError::Validation(format!("unknown priority {priority:?}"))
            })?;
            complaint = ComplaintRepo::override_priority(&self.pool, id, priority.as_str())
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "complaint",
                    id,
                })?;
        }

        if let Some(worker_id) = request.worker_id {
            complaint = self
                .assign_worker(&complaint, worker_id, request.note.clone())
                .await?;
        }

        if let Some(details) = &request.details {
            details.validate()?;
            if let Some(location) = &details.location {
                parse_location(location)?;
            }
            complaint = ComplaintRepo::update_details(&self.pool, id, details)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "complaint",
                    id,
                })?;
        }

        Ok(complaint)
    }

    /// Remove a complaint and its audit trail (admin only).
    pub async fn delete_complaint(&self, actor: &Actor, id: DbId) -> Result<(), TriageError> {
        require_admin(actor)?;
        if !ComplaintRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "complaint",
                id,
            }
            .into());
        }
        tracing::info!(complaint_id = id, "Complaint deleted");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────

    async fn apply_status_change(
        &self,
        actor: &Actor,
        complaint: &Complaint,
        status: &str,
        note: Option<String>,
    ) -> Result<Complaint, TriageError> {
        let to = ComplaintStatus::parse(status)
            .ok_or_else(|| CoreError::Validation(format!("unknown status {status:?}")))?;
        let from = ComplaintStatus::parse(&complaint.status).ok_or_else(|| {
            CoreError::Internal(format!("complaint {} has corrupt status", complaint.id))
        })?;

        validate_transition(from, to)?;

        // Transitions that move the worker counter need a worker to move
        // it on; without one the transition must not start.
        if workload_effect(to).is_some() && complaint.worker_id.is_none() {
            return Err(CoreError::Validation(format!(
                "cannot move complaint {} to {} with no worker assigned",
                complaint.id,
                to.as_str()
            ))
            .into());
        }

        let updated = LifecycleRepo::apply_status_transition(
            &self.pool,
            &StatusTransition {
                complaint_id: complaint.id,
                from,
                to,
                worker_id: complaint.worker_id,
                note,
            },
        )
        .await?;

        tracing::info!(
            complaint_id = complaint.id,
            actor_id = actor.id,
            from = from.as_str(),
            to = to.as_str(),
            "Complaint status changed"
        );
        Ok(updated)
    }

    async fn assign_worker(
        &self,
        complaint: &Complaint,
        worker_id: DbId,
        note: Option<String>,
    ) -> Result<Complaint, TriageError> {
        UserRepo::find_worker(&self.pool, worker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "worker",
                id: worker_id,
            })?;

        let from = ComplaintStatus::parse(&complaint.status).ok_or_else(|| {
            CoreError::Internal(format!("complaint {} has corrupt status", complaint.id))
        })?;
        validate_transition(from, ComplaintStatus::Assigned)?;

        let updated = ComplaintRepo::assign_worker(&self.pool, complaint.id, worker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "complaint",
                id: complaint.id,
            })?;

        ComplaintUpdateRepo::create(
            &self.pool,
            &CreateComplaintUpdate {
                complaint_id: complaint.id,
                worker_id: Some(worker_id),
                old_status: Some(from.as_str().to_string()),
                new_status: ComplaintStatus::Assigned.as_str().to_string(),
                note,
            },
        )
        .await?;

        tracing::info!(
            complaint_id = complaint.id,
            worker_id,
            "Complaint assigned to worker"
        );
        Ok(updated)
    }

    /// Load the worker roster as scoring candidates. Workers without
    /// stored coordinates cannot be scored and are left out.
    async fn assignment_candidates(&self) -> Result<Vec<Candidate>, TriageError> {
        let workers = UserRepo::list_workers(&self.pool).await?;
        Ok(workers
            .into_iter()
            .filter_map(|w| {
                let (latitude, longitude) = match (w.latitude, w.longitude) {
                    (Some(lat), Some(lon)) => (lat, lon),
                    _ => return None,
                };
                Some(Candidate {
                    worker_id: w.id,
                    name: w.name,
                    latitude,
                    longitude,
                    workload: Workload::parse(&w.workload)
                        .unwrap_or_else(|| Workload::from_active_tasks(w.active_tasks)),
                    active_tasks: w.active_tasks,
                })
            })
            .collect())
    }

    /// Best worker for one pending complaint. A scoring failure (for
    /// example a malformed stored location) degrades to no suggestion
    /// rather than failing the listing.
    fn suggest_worker(
        &self,
        candidates: &[Candidate],
        complaint: &ComplaintSummary,
    ) -> Option<Suggestion> {
        match select_best(candidates, &complaint.location) {
            Ok(suggestion) => suggestion,
            Err(err) => {
                tracing::warn!(
                    complaint_id = complaint.id,
                    error = %err,
                    "Skipping assignment suggestion"
                );
                None
            }
        }
    }
}

fn require_admin(actor: &Actor) -> Result<(), TriageError> {
    match actor.role {
        ActorRole::Admin => Ok(()),
        _ => Err(CoreError::Unauthorized("admin role required".into()).into()),
    }
}

fn resolve_page(page: Option<i64>) -> Result<i64, TriageError> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(CoreError::Validation(format!("page must be >= 1, got {page}")).into());
    }
    Ok(page)
}
