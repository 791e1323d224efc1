//! JSONL-backed check-result store.
//!
//! One JSON document per line, appended on save. The full history is loaded
//! at open and kept in memory for reads; pruning rewrites the file. Suits the
//! small, statically configured service list this monitor targets.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::checker::CheckResult;
use crate::store::{latest_per_service_of, CheckStore, StoreError};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    rows: Mutex<Vec<CheckResult>>,
}

impl FileStore {
    /// Open a history file, creating it if absent, and load existing rows.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut rows = Vec::new();

        if path.exists() {
            let file = File::open(path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                rows.push(serde_json::from_str(&line)?);
            }
        } else {
            File::create(path)?;
        }

        tracing::info!(path = %path.display(), rows = rows.len(), "History store opened");

        Ok(Self {
            path: path.to_path_buf(),
            rows: Mutex::new(rows),
        })
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<CheckResult>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn rewrite(&self, rows: &[CheckResult]) -> Result<(), StoreError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        for row in rows {
            serde_json::to_writer(&mut writer, row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl CheckStore for FileStore {
    fn save(&self, result: &CheckResult) -> Result<(), StoreError> {
        let mut rows = self.rows();

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        rows.push(result.clone());
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
        let kept: Vec<CheckResult> = rows
            .iter()
            .filter(|r| r.checked_at >= cutoff)
            .cloned()
            .collect();
        let removed = rows.len() - kept.len();

        if removed > 0 {
            self.rewrite(&kept)?;
            *rows = kept;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Status;
    use chrono::Duration;

    #[test]
    fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        {
            let store = FileStore::open(&path).unwrap();
            store.save(&CheckResult::up("api", 25, 200)).unwrap();
            store
                .save(&CheckResult::down("web", None, None, "Request timed out: deadline"))
                .unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let latest = store.latest_per_service().unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["api"].status, Status::Up);
        assert_eq!(latest["web"].error_message, "Request timed out: deadline");
    }

    #[test]
    fn prune_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let cutoff = Utc::now() - Duration::days(30);

        let store = FileStore::open(&path).unwrap();
        let mut old = CheckResult::up("api", 10, 200);
        old.checked_at = cutoff - Duration::days(5);
        store.save(&old).unwrap();
        store.save(&CheckResult::up("api", 12, 200)).unwrap();

        assert_eq!(store.prune_older_than(cutoff).unwrap(), 1);

        // Pruned rows are gone after reload too.
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.count_older_than(cutoff).unwrap(), 0);
        assert!(reopened.latest("api").unwrap().is_some());
    }

    #[test]
    fn blank_lines_ignored_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        let store = FileStore::open(&path).unwrap();
        store.save(&CheckResult::up("api", 10, 200)).unwrap();
        drop(store);

        std::fs::write(
            &path,
            format!("{}\n\n", std::fs::read_to_string(&path).unwrap().trim_end()),
        )
        .unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.latest("api").unwrap().is_some());
    }
}
