//! Check-result history storage.
//!
//! # Data Flow
//! ```text
//! Cycle → save(result)                 (append-only history)
//! Startup → latest_per_service()      (seed the state tracker)
//! Cleanup → prune_older_than(cutoff)  (retention enforcement)
//! ```
//!
//! # Design Decisions
//! - History is an append-only log of results keyed by service name
//! - The store trait is the seam for swapping a real database in later;
//!   the monitor core only needs save/latest/prune
//! - Ties on `checked_at` resolve to the later-written row

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::checker::CheckResult;

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Append-only check-result history.
pub trait CheckStore: Send + Sync {
    /// Append one result row.
    fn save(&self, result: &CheckResult) -> Result<(), StoreError>;

    /// The most recent result for one service.
    fn latest(&self, service_name: &str) -> Result<Option<CheckResult>, StoreError>;

    /// The most recent result for every known service.
    fn latest_per_service(&self) -> Result<HashMap<String, CheckResult>, StoreError>;

    /// Number of rows strictly older than the cutoff.
    fn count_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Delete rows strictly older than the cutoff, returning how many.
    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Latest-row-per-service projection over an ordered slice of rows.
///
/// Shared by the in-memory and file-backed stores, which both keep rows in
/// insertion order.
pub(crate) fn latest_per_service_of(rows: &[CheckResult]) -> HashMap<String, CheckResult> {
    let mut latest: HashMap<String, CheckResult> = HashMap::new();
    for row in rows {
        match latest.get(&row.service_name) {
            Some(existing) if existing.checked_at > row.checked_at => {}
            _ => {
                latest.insert(row.service_name.clone(), row.clone());
            }
        }
    }
    latest
}
