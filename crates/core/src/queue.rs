//! Triage-queue ordering ranks and pagination types.
//!
//! The admin listing orders by status rank, then priority rank, then
//! creation time descending. The rank functions take raw column text so
//! legacy rows with unrecognized values sort last instead of erroring; the
//! SQL CASE expressions in `civiq-db` mirror these tables and a repository
//! test keeps them in sync.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Ordering ranks
// ---------------------------------------------------------------------------

/// Admin-queue status rank: pending=1, assigned=2, completed=3, all else=4.
pub fn status_rank(status: &str) -> i16 {
    match status {
        "pending" => 1,
        "assigned" => 2,
        "completed" => 3,
        _ => 4,
    }
}

/// Admin-queue priority rank: Critical=1 .. Low=4, unrecognized=5.
pub fn priority_rank(priority: &str) -> i16 {
    match priority {
        "Critical" => 1,
        "High" => 2,
        "Medium" => 3,
        "Low" => 4,
        _ => 5,
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Number of pages needed for `total_items` at `page_size` per page.
///
/// Page size is clamped to at least 1 to keep the division defined.
pub fn page_count(total_items: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    (total_items + page_size - 1) / page_size
}

/// Offset of a 1-indexed page.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size.max(1)
}

/// One page of results with the pagination metadata callers echo back.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total_items: i64) -> Self {
        Self {
            data,
            page,
            page_size,
            total_items,
            total_pages: page_count(total_items, page_size),
        }
    }
}
