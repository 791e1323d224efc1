//! In-memory check-result store.
//!
//! Used for ephemeral runs and tests; history does not survive a restart.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::checker::CheckResult;
use crate::store::{latest_per_service_of, CheckStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<CheckResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<CheckResult>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CheckStore for MemoryStore {
    fn save(&self, result: &CheckResult) -> Result<(), StoreError> {
        self.rows().push(result.clone());
        Ok(())
    }

    fn latest(&self, service_name: &str) -> Result<Option<CheckResult>, StoreError> {
        let rows = self.rows();
        let mut latest: Option<&CheckResult> = None;
        for row in rows.iter().filter(|r| r.service_name == service_name) {
            match latest {
                Some(existing) if existing.checked_at > row.checked_at => {}
                _ => latest = Some(row),
            }
        }
        Ok(latest.cloned())
    }

    fn latest_per_service(&self) -> Result<HashMap<String, CheckResult>, StoreError> {
        Ok(latest_per_service_of(&self.rows()))
    }

    fn count_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        Ok(self.rows().iter().filter(|r| r.checked_at < cutoff).count())
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|r| r.checked_at >= cutoff);
        Ok(before - rows.len())
    }
}
