//! Complaint status state machine and its effect on worker workload.
//!
//! Lives in `core` (zero internal deps) so both the repository layer and the
//! triage service validate transitions against the same table.

use crate::complaint::ComplaintStatus;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
///
/// The happy path is strictly monotonic (pending → assigned → in_progress →
/// completed); `rejected` is an admin-only side exit from any non-terminal
/// state. Terminal states return an empty slice.
pub fn valid_transitions(from: ComplaintStatus) -> &'static [ComplaintStatus] {
    use ComplaintStatus::*;
    match from {
        Pending => &[Assigned, Rejected],
        Assigned => &[InProgress, Rejected],
        InProgress => &[Completed, Rejected],
        Completed | Rejected => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, returning a descriptive validation error otherwise.
pub fn validate_transition(from: ComplaintStatus, to: ComplaintStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Workload effects
// ---------------------------------------------------------------------------

/// How a status transition changes the assigned worker's active-task counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadEffect {
    /// Worker picks the task up: counter + 1, workload becomes Busy.
    Increment,
    /// Worker finishes the task: counter - 1 (clamped at 0), workload
    /// becomes Free when the counter reaches 0.
    Decrement,
}

/// The workload effect of entering `to`, if any.
///
/// Only `in_progress` and `completed` touch the counter; assignment and
/// rejection leave it alone.
pub fn workload_effect(to: ComplaintStatus) -> Option<WorkloadEffect> {
    match to {
        ComplaintStatus::InProgress => Some(WorkloadEffect::Increment),
        ComplaintStatus::Completed => Some(WorkloadEffect::Decrement),
        _ => None,
    }
}

/// Apply a workload effect to a counter value, clamping at zero.
pub fn apply_effect(active_tasks: i32, effect: WorkloadEffect) -> i32 {
    match effect {
        WorkloadEffect::Increment => active_tasks + 1,
        WorkloadEffect::Decrement => (active_tasks - 1).max(0),
    }
}
