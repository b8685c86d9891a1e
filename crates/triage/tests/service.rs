//! Integration tests for the triage service layer.
//!
//! Uses a deterministic stub in place of the frozen classifier so
//! intake behavior is fully predictable.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use civiq_core::complaint::Priority;
use civiq_core::error::CoreError;
use civiq_db::models::complaint::CreateComplaint;
use civiq_db::models::user::CreateUser;
use civiq_db::repositories::UserRepo;
use civiq_model::{ComplaintFeatures, Inference, ModelError, PriorityModel};
use civiq_triage::{Actor, ActorRole, TriageConfig, TriageError, TriageService, UpdateComplaintRequest};

// ---------------------------------------------------------------------------
// Stub model
// ---------------------------------------------------------------------------

/// Classifies by category alone: accidents are critical, everything else
/// is low priority.
struct StubModel;

impl PriorityModel for StubModel {
    fn infer(&self, input: ComplaintFeatures<'_>) -> Result<Inference, ModelError> {
        let priority = if input.category == "accident" {
            Priority::Critical
        } else {
            Priority::Low
        };
        Ok(Inference {
            priority,
            confidence: 0.75,
        })
    }
}

fn service(pool: PgPool) -> TriageService {
    TriageService::new(pool, Arc::new(StubModel), TriageConfig::default())
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str, role: Option<&str>) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            role: role.map(str::to_string),
            latitude: None,
            longitude: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_worker(pool: &PgPool, email: &str, lat: &str, lon: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            role: Some("worker".to_string()),
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_complaint(user_id: i64, category: &str, location: &str) -> CreateComplaint {
    CreateComplaint {
        user_id,
        title: "Test complaint".to_string(),
        category: category.to_string(),
        description: "something is broken".to_string(),
        location: location.to_string(),
        image_url: None,
        image_severity: 0.5,
    }
}

fn admin(id: i64) -> Actor {
    Actor {
        id,
        role: ActorRole::Admin,
    }
}

fn worker(id: i64) -> Actor {
    Actor {
        id,
        role: ActorRole::Worker,
    }
}

fn citizen(id: i64) -> Actor {
    Actor {
        id,
        role: ActorRole::Citizen,
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_classifies_and_persists(pool: PgPool) {
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "accident", "12.97,77.59"))
        .await
        .unwrap();

    assert_eq!(complaint.status, "pending");
    assert_eq!(complaint.priority.as_deref(), Some("Critical"));
    assert_eq!(complaint.priority_confidence, Some(0.75));
    assert!(complaint.worker_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_malformed_location(pool: PgPool) {
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let result = svc
        .create_complaint(&new_complaint(user_id, "water", "downtown"))
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Validation(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_unknown_submitter(pool: PgPool) {
    let svc = service(pool);
    let result = svc
        .create_complaint(&new_complaint(9999, "water", "12.97,77.59"))
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::NotFound { .. }))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_out_of_range_severity(pool: PgPool) {
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let mut input = new_complaint(user_id, "water", "12.97,77.59");
    input.image_severity = 1.5;
    assert!(svc.create_complaint(&input).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_from_config_loads_artifact_bundle(pool: PgPool) {
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let config = TriageConfig {
        model_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts")),
        ..TriageConfig::default()
    };
    let svc = TriageService::from_config(pool, config).unwrap();

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "accident", "12.97,77.59"))
        .await
        .unwrap();

    // The frozen classifier assigned one of its known labels.
    let priority = complaint.priority.expect("classified on intake");
    assert!(["Critical", "High", "Medium", "Low"].contains(&priority.as_str()));
    let confidence = complaint.priority_confidence.unwrap();
    assert!(confidence > 0.0 && confidence <= 1.0);
}

// ---------------------------------------------------------------------------
// Listings and suggestions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_listing_suggests_nearest_worker(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let near = seed_worker(&pool, "near@example.com", "12.97", "77.59").await;
    seed_worker(&pool, "far@example.com", "28.61", "77.20").await;
    let svc = service(pool);

    svc.create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();

    let page = svc
        .list_complaints(&admin(admin_id), None, None)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);

    let suggestion = page.data[0].suggestion.as_ref().expect("admin row gets a suggestion");
    assert_eq!(suggestion.worker_id, near);
    assert!(suggestion.score < 1.0, "colocated idle worker scores near zero");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_suggestions_survive_assignment(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let worker_id = seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    svc.update_complaint(
        &admin(admin_id),
        complaint.id,
        &UpdateComplaintRequest {
            worker_id: Some(worker_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Every admin row carries a suggestion, not just pending ones.
    let page = svc
        .list_complaints(&admin(admin_id), None, None)
        .await
        .unwrap();
    assert_eq!(page.data[0].complaint.status, "assigned");
    assert!(page.data[0].suggestion.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_citizen_listing_is_scoped_and_undecorated(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com", None).await;
    let bob = seed_user(&pool, "bob@example.com", None).await;
    seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool);

    svc.create_complaint(&new_complaint(alice, "water", "12.97,77.59"))
        .await
        .unwrap();
    svc.create_complaint(&new_complaint(bob, "tree", "12.97,77.59"))
        .await
        .unwrap();

    let page = svc
        .list_complaints(&citizen(alice), None, None)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.data[0].complaint.user_id, alice);
    assert!(page.data[0].suggestion.is_none(), "no suggestions outside admin view");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_uses_default_page_size(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    for _ in 0..7 {
        svc.create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
            .await
            .unwrap();
    }

    let page = svc
        .list_complaints(&admin(admin_id), None, None)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.page_size, 5);
    assert_eq!(page.total_items, 7);
    assert_eq!(page.total_pages, 2);

    let last = svc
        .list_complaints(&admin(admin_id), Some(2), None)
        .await
        .unwrap();
    assert_eq!(last.data.len(), 2);
}

// ---------------------------------------------------------------------------
// Lifecycle updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_lifecycle_through_the_service(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let worker_id = seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool.clone());

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();

    // Admin assigns.
    let assigned = svc
        .update_complaint(
            &admin(admin_id),
            complaint.id,
            &UpdateComplaintRequest {
                worker_id: Some(worker_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(assigned.status, "assigned");
    assert_eq!(assigned.worker_id, Some(worker_id));

    // Worker starts.
    let started = svc
        .update_complaint(
            &worker(worker_id),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("in_progress".to_string()),
                note: Some("on site".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(started.status, "in_progress");

    let (tasks,): (i32,) = sqlx::query_as("SELECT active_tasks FROM users WHERE id = $1")
        .bind(worker_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tasks, 1);

    // Worker completes.
    let done = svc
        .update_complaint(
            &worker(worker_id),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, "completed");

    let (tasks,): (i32,) = sqlx::query_as("SELECT active_tasks FROM users WHERE id = $1")
        .bind(worker_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tasks, 0);

    // Two status changes plus the assignment all left audit rows.
    let detail = svc.get_complaint(complaint.id).await.unwrap();
    assert_eq!(detail.history.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_transition_is_rejected(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();

    // pending → completed skips assignment and work.
    let result = svc
        .update_complaint(
            &admin(admin_id),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Validation(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_workload_transition_requires_worker(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool.clone());

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    // Force an assigned row with no worker (legacy-data shape).
    sqlx::query("UPDATE complaints SET status = 'assigned', worker_id = NULL WHERE id = $1")
        .bind(complaint.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = svc
        .update_complaint(
            &admin(admin_id),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("in_progress".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Validation(_)))
    ));

    // The status must be untouched.
    let (status,): (String,) = sqlx::query_as("SELECT status FROM complaints WHERE id = $1")
        .bind(complaint.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "assigned");
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_citizens_cannot_update(pool: PgPool) {
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();

    let result = svc
        .update_complaint(
            &citizen(user_id),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("rejected".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worker_cannot_touch_unassigned_complaint(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let assigned = seed_worker(&pool, "w1@example.com", "12.97", "77.59").await;
    let other = seed_worker(&pool, "w2@example.com", "12.98", "77.60").await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    svc.update_complaint(
        &admin(admin_id),
        complaint.id,
        &UpdateComplaintRequest {
            worker_id: Some(assigned),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = svc
        .update_complaint(
            &worker(other),
            complaint.id,
            &UpdateComplaintRequest {
                status: Some("in_progress".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worker_cannot_override_priority(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let worker_id = seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    svc.update_complaint(
        &admin(admin_id),
        complaint.id,
        &UpdateComplaintRequest {
            worker_id: Some(worker_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = svc
        .update_complaint(
            &worker(worker_id),
            complaint.id,
            &UpdateComplaintRequest {
                priority: Some("Low".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_priority_override_clears_confidence(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    assert_eq!(complaint.priority.as_deref(), Some("Low"));

    let updated = svc
        .update_complaint(
            &admin(admin_id),
            complaint.id,
            &UpdateComplaintRequest {
                priority: Some("Critical".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.priority.as_deref(), Some("Critical"));
    assert!(updated.priority_confidence.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_admin_only(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    let svc = service(pool);

    let complaint = svc
        .create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();

    assert!(matches!(
        svc.delete_complaint(&citizen(user_id), complaint.id).await,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));

    svc.delete_complaint(&admin(admin_id), complaint.id)
        .await
        .unwrap();

    assert!(matches!(
        svc.delete_complaint(&admin(admin_id), complaint.id).await,
        Err(TriageError::Core(CoreError::NotFound { .. }))
    ));
}

// ---------------------------------------------------------------------------
// Admin reporting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_analytics_counts(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool);

    svc.create_complaint(&new_complaint(user_id, "water", "12.97,77.59"))
        .await
        .unwrap();
    svc.create_complaint(&new_complaint(user_id, "accident", "12.97,77.59"))
        .await
        .unwrap();

    let report = svc.analytics(&admin(admin_id)).await.unwrap();
    assert_eq!(report.total_complaints, 2);
    assert_eq!(report.total_citizens, 1);
    assert_eq!(report.total_workers, 1);
    assert_eq!(report.recent_complaints.len(), 2);
    assert_eq!(report.status_breakdown.len(), 1);
    assert_eq!(report.category_breakdown.len(), 2);

    assert!(matches!(
        svc.analytics(&citizen(user_id)).await,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worker_roster_is_admin_only(pool: PgPool) {
    let admin_id = seed_user(&pool, "admin@example.com", Some("admin")).await;
    let user_id = seed_user(&pool, "cora@example.com", None).await;
    seed_worker(&pool, "w@example.com", "12.97", "77.59").await;
    let svc = service(pool);

    let page = svc
        .list_workers(&admin(admin_id), None, None)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.data[0].open_complaints, 0);

    assert!(matches!(
        svc.list_workers(&worker(user_id), None, None).await,
        Err(TriageError::Core(CoreError::Unauthorized(_)))
    ));
}
