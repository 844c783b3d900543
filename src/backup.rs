//! Rolling file backups of the live SQLite store. A snapshot is a plain copy
//! of the database file under `backups/`, named so that lexical order equals
//! creation order; retention pruning keeps only the newest few.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::StoreResult;
use crate::paths::LibraryPaths;

/// How many snapshots survive pruning unless the caller overrides it.
pub const DEFAULT_RETENTION: usize = 5;

/// Fixed prefix shared by every snapshot file.
const SNAPSHOT_PREFIX: &str = "backup_livraria_";
const SNAPSHOT_EXT: &str = "db";

/// Copies the live store aside before mutations and enforces the retention
/// policy. Owns the `backups/` directory; nothing else writes there.
#[derive(Debug, Clone)]
pub struct BackupManager {
    db_path: PathBuf,
    backup_dir: PathBuf,
    retention: usize,
}

impl BackupManager {
    pub fn new(paths: &LibraryPaths, retention: usize) -> Self {
        Self {
            db_path: paths.db_path(),
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Copy the live store to a fresh snapshot file and return its path.
    ///
    /// When the live store file does not exist yet there is nothing worth
    /// copying, so this is a no-op returning `None`. Snapshot names embed a
    /// second-resolution timestamp, milliseconds, and a collision counter, so
    /// repeated triggers within the same instant still get unique,
    /// lexically-ordered names.
    pub fn snapshot(&self) -> StoreResult<Option<PathBuf>> {
        if !self.db_path.exists() {
            return Ok(None);
        }
        fs::create_dir_all(&self.backup_dir)?;

        let now = Local::now();
        let stamp = format!(
            "{}-{:03}",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );

        let mut counter = 0u32;
        let target = loop {
            let candidate = self.backup_dir.join(format!(
                "{SNAPSHOT_PREFIX}{stamp}-{counter:02}.{SNAPSHOT_EXT}"
            ));
            if !candidate.exists() {
                break candidate;
            }
            counter += 1;
        };

        fs::copy(&self.db_path, &target)?;
        Ok(Some(target))
    }

    /// Every snapshot on disk, newest first. Snapshot names sort lexically in
    /// creation order by construction, so ordering by file name descending is
    /// enough.
    pub fn list_snapshots(&self) -> StoreResult<Vec<PathBuf>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            if is_snapshot(&path) {
                snapshots.push(path);
            }
        }

        snapshots.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(snapshots)
    }

    /// Delete every snapshot beyond the `retention` newest. Calling it again
    /// without new snapshots in between deletes nothing.
    pub fn prune(&self) -> StoreResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();
        for stale in self.list_snapshots()?.into_iter().skip(self.retention) {
            fs::remove_file(&stale)?;
            deleted.push(stale);
        }
        Ok(deleted)
    }

    /// Take a snapshot and immediately enforce retention. This is the path
    /// both the store's pre-write hook and the manual backup menu entry use.
    pub fn snapshot_and_prune(&self) -> StoreResult<Option<PathBuf>> {
        let created = self.snapshot()?;
        self.prune()?;
        Ok(created)
    }
}

/// A file counts as one of ours only with the fixed prefix and extension;
/// anything else in the directory is left alone.
fn is_snapshot(path: &Path) -> bool {
    let named_like_snapshot = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(SNAPSHOT_PREFIX));
    named_like_snapshot && path.extension().is_some_and(|ext| ext == SNAPSHOT_EXT)
}
