//! Complaint domain enums: category, priority, status, and worker workload.
//!
//! The database stores all of these as text in the exact string forms the
//! original intake forms and the frozen model artifacts use, so every enum
//! here carries an `as_str`/`parse` pair rather than relying on serde alone.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Incident category selected (or pre-filled) at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Accident,
    Water,
    Tree,
    Electrical,
    Infrastructure,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Water => "water",
            Self::Tree => "tree",
            Self::Electrical => "electrical",
            Self::Infrastructure => "infrastructure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accident" => Some(Self::Accident),
            "water" => Some(Self::Water),
            "tree" => Some(Self::Tree),
            "electrical" => Some(Self::Electrical),
            "infrastructure" => Some(Self::Infrastructure),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Ordinal urgency label assigned by the classifier, admin-overridable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Display form stored in the database and shown to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Critical" => Some(Self::Critical),
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Map a raw classifier output label to a priority.
    ///
    /// The frozen model emits P1..P4; the table P1→Critical, P2→High,
    /// P3→Medium, P4→Low is a fixed contract with the training pipeline.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label {
            "P1" => Some(Self::Critical),
            "P2" => Some(Self::High),
            "P3" => Some(Self::Medium),
            "P4" => Some(Self::Low),
            _ => None,
        }
    }

    /// Ordering rank for the admin triage queue: Critical=1 .. Low=4.
    pub fn rank(self) -> i16 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Complaint lifecycle status.
///
/// Transitions are governed by [`crate::lifecycle`]; the happy path is
/// pending → assigned → in_progress → completed, with rejected as an
/// admin-only exit from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

// ---------------------------------------------------------------------------
// Workload
// ---------------------------------------------------------------------------

/// Binary busy/free flag for a field worker.
///
/// Derived from the active-task counter: Free iff the counter is 0. The
/// stored column exists for roster ordering but is always written from the
/// counter, never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Workload {
    Free,
    Busy,
}

impl Workload {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Busy => "Busy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Free" => Some(Self::Free),
            "Busy" => Some(Self::Busy),
            _ => None,
        }
    }

    /// Single source of truth for the flag/counter invariant.
    pub fn from_active_tasks(active_tasks: i32) -> Self {
        if active_tasks <= 0 {
            Self::Free
        } else {
            Self::Busy
        }
    }
}
