//! Worker fitness scoring and best-candidate selection.
//!
//! Each candidate worker gets a composite score where **lower is better**:
//! distance to the complaint dominates, current load is secondary, and the
//! binary busy/free flag acts as a tie-breaker. The admin triage view runs
//! [`select_best`] over the full worker pool for every listed complaint.

use serde::Serialize;

use crate::complaint::Workload;
use crate::error::CoreError;
use crate::geo::{haversine, parse_coordinate, parse_location};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Weight for the worker-to-complaint distance (km).
pub const WEIGHT_DISTANCE: f64 = 0.6;

/// Weight for the worker's active-task count.
pub const WEIGHT_ACTIVE_TASKS: f64 = 0.3;

/// Weight for the binary busy penalty.
pub const WEIGHT_BUSY: f64 = 0.1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A worker under consideration for assignment.
///
/// Coordinates stay as the decimal strings the `users` table stores; parsing
/// happens at scoring time so one worker's bad row never poisons the pool.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub worker_id: DbId,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub workload: Workload,
    pub active_tasks: i32,
}

/// The recommended worker for a complaint, with the winning score.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub worker_id: DbId,
    pub worker_name: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Composite fitness score for one candidate against a complaint location.
///
/// `score = 0.6 * distance_km + 0.3 * active_tasks + 0.1 * busy_penalty`
/// where the penalty is 0 for Free workers and 1 for Busy ones. Malformed
/// candidate coordinates are a validation error.
pub fn fitness_score(candidate: &Candidate, complaint: (f64, f64)) -> Result<f64, CoreError> {
    let lat = parse_coordinate(&candidate.latitude, "worker latitude")?;
    let lon = parse_coordinate(&candidate.longitude, "worker longitude")?;
    let distance = haversine(lat, lon, complaint.0, complaint.1);

    let busy_penalty = match candidate.workload {
        Workload::Free => 0.0,
        Workload::Busy => 1.0,
    };

    Ok(WEIGHT_DISTANCE * distance
        + WEIGHT_ACTIVE_TASKS * f64::from(candidate.active_tasks)
        + WEIGHT_BUSY * busy_penalty)
}

/// Pick the minimum-score candidate for a complaint location string.
///
/// Returns `Ok(None)` for an empty pool. A malformed complaint location is
/// an error (the caller excludes that complaint from scoring); a candidate
/// with malformed coordinates is skipped. Ties break toward the lowest
/// `worker_id` so repeated fetches always suggest the same worker.
pub fn select_best(candidates: &[Candidate], location: &str) -> Result<Option<Suggestion>, CoreError> {
    let complaint = parse_location(location)?;

    let mut best: Option<(f64, &Candidate)> = None;
    for candidate in candidates {
        let Ok(score) = fitness_score(candidate, complaint) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_score, best_candidate)) => {
                score < best_score
                    || (score == best_score && candidate.worker_id < best_candidate.worker_id)
            }
        };
        if better {
            best = Some((score, candidate));
        }
    }

    Ok(best.map(|(score, candidate)| Suggestion {
        worker_id: candidate.worker_id,
        worker_name: candidate.name.clone(),
        score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(id: DbId, lat: &str, lon: &str, workload: Workload, tasks: i32) -> Candidate {
        Candidate {
            worker_id: id,
            name: format!("worker-{id}"),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            workload,
            active_tasks: tasks,
        }
    }

    // -- fitness_score --

    #[test]
    fn free_idle_worker_scores_pure_distance() {
        let w = worker(1, "0", "1.0", Workload::Free, 0);
        let score = fitness_score(&w, (0.0, 0.0)).unwrap();
        let distance = haversine(0.0, 1.0, 0.0, 0.0);
        assert_eq!(score, WEIGHT_DISTANCE * distance);
    }

    #[test]
    fn colocated_free_idle_worker_scores_zero() {
        let w = worker(1, "12.97", "77.59", Workload::Free, 0);
        assert_eq!(fitness_score(&w, (12.97, 77.59)).unwrap(), 0.0);
    }

    #[test]
    fn active_tasks_add_point_three_each() {
        let w = worker(1, "0", "0", Workload::Free, 4);
        let score = fitness_score(&w, (0.0, 0.0)).unwrap();
        assert!((score - 1.2).abs() < 1e-12);
    }

    #[test]
    fn busy_flag_adds_point_one() {
        let free = worker(1, "0", "0", Workload::Free, 0);
        let busy = worker(2, "0", "0", Workload::Busy, 0);
        let delta =
            fitness_score(&busy, (0.0, 0.0)).unwrap() - fitness_score(&free, (0.0, 0.0)).unwrap();
        assert!((delta - WEIGHT_BUSY).abs() < 1e-12);
    }

    #[test]
    fn malformed_worker_coordinates_error() {
        let w = worker(1, "unknown", "0", Workload::Free, 0);
        assert!(fitness_score(&w, (0.0, 0.0)).is_err());
    }

    // -- select_best --

    #[test]
    fn nearer_and_less_loaded_worker_wins() {
        // A at the complaint, idle; B 0.1° away with 2 active tasks.
        let a = worker(1, "0", "0", Workload::Free, 0);
        let b = worker(2, "0", "0.1", Workload::Free, 2);
        let best = select_best(&[b, a], "0, 0").unwrap().unwrap();
        assert_eq!(best.worker_id, 1);
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn empty_pool_yields_no_suggestion() {
        assert!(select_best(&[], "0, 0").unwrap().is_none());
    }

    #[test]
    fn malformed_complaint_location_is_an_error() {
        let a = worker(1, "0", "0", Workload::Free, 0);
        assert!(select_best(&[a], "downtown").is_err());
    }

    #[test]
    fn candidate_with_bad_coordinates_is_skipped() {
        let bad = worker(1, "n/a", "0", Workload::Free, 0);
        let good = worker(2, "0", "0.5", Workload::Busy, 3);
        let best = select_best(&[bad, good], "0, 0").unwrap().unwrap();
        assert_eq!(best.worker_id, 2);
    }

    #[test]
    fn all_candidates_unscorable_yields_none() {
        let bad = worker(1, "n/a", "0", Workload::Free, 0);
        assert!(select_best(&[bad], "0, 0").unwrap().is_none());
    }

    #[test]
    fn tie_breaks_to_lowest_worker_id() {
        let a = worker(9, "0", "0", Workload::Free, 0);
        let b = worker(3, "0", "0", Workload::Free, 0);
        let best = select_best(&[a, b], "0, 0").unwrap().unwrap();
        assert_eq!(best.worker_id, 3);
    }

    #[test]
    fn distance_dominates_load() {
        // B is 1° (~111 km) away but idle; A is colocated with 8 tasks.
        // 0.3 * 8 = 2.4 < 0.6 * 111, so A still wins.
        let a = worker(1, "0", "0", Workload::Busy, 8);
        let b = worker(2, "1", "0", Workload::Free, 0);
        let best = select_best(&[a, b], "0, 0").unwrap().unwrap();
        assert_eq!(best.worker_id, 1);
    }
}
