//! # Persistence Guard
//!
//! Backup rotation + atomic write-replace around every document write.
//!
//! ## Write Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Crash-Safe Write Sequence                            │
//! │                                                                         │
//! │  1. BACKUP   copy ledger.xlsx → ledger.<stamp>.bak.xlsx                │
//! │              (skipped on the first-ever write: nothing to back up)     │
//! │  2. PRUNE    delete backups beyond retention, oldest first by mtime    │
//! │  3. WRITE    serialize to sibling ledger.xlsx.tmp                      │
//! │  4. RENAME   atomically rename ledger.xlsx.tmp → ledger.xlsx           │
//! │                                                                         │
//! │  Failure at 3: canonical file untouched, caller sees the error.        │
//! │  Failure at 4: canonical file untouched, valid temp file remains -     │
//! │                surfaced as ReplaceFailed, operator intervention,       │
//! │                never auto-retried.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backup stamps are the ISO-8601 UTC instant with `:` and `.` replaced by
//! `-` (millisecond precision), e.g. `ledger.2026-08-23T10-11-12-345Z.bak.xlsx`.
//!
//! Nothing here locks the file against OTHER processes: a second instance
//! writing the same path during this window can race. Known gap.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Default number of backups kept per workbook.
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Wraps every workbook write in backup-then-atomic-replace.
#[derive(Debug, Clone)]
pub struct PersistenceGuard {
    path: PathBuf,
    retention: usize,
}

impl PersistenceGuard {
    /// Creates a guard for one canonical workbook path.
    pub fn new(path: impl Into<PathBuf>, retention: usize) -> Self {
        PersistenceGuard {
            path: path.into(),
            retention,
        }
    }

    /// The canonical workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commits serialized workbook bytes: backup, prune, temp write, rename.
    pub async fn commit(&self, bytes: &[u8]) -> StoreResult<()> {
        if fs::try_exists(&self.path).await? {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).await?;
            debug!(backup = %backup.display(), "pre-mutation backup written");
            self.prune_backups().await?;
        }

        let temp = self.temp_path();
        fs::write(&temp, bytes).await?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|source| StoreError::ReplaceFailed { temp, source })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "workbook replaced");
        Ok(())
    }

    /// All existing backups for this workbook, newest first by mtime.
    pub async fn list_backups(&self) -> StoreResult<Vec<PathBuf>> {
        let parent = self.parent_dir();
        let prefix = format!("{}.", self.stem());
        let suffix = format!(".bak.{}", self.extension());

        let mut backups: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        let mut entries = fs::read_dir(parent).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) || !name.ends_with(&suffix) {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            backups.push((modified, entry.path()));
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Deletes backups beyond the retention count, oldest first.
    async fn prune_backups(&self) -> StoreResult<()> {
        let backups = self.list_backups().await?;
        for stale in backups.iter().skip(self.retention) {
            // Best-effort: a vanished backup is not a mutation failure
            if let Err(err) = fs::remove_file(stale).await {
                warn!(path = %stale.display(), error = %err, "failed to prune backup");
            } else {
                debug!(path = %stale.display(), "pruned backup");
            }
        }
        Ok(())
    }

    /// Timestamped sibling path: `<basename>.<stamp>.bak.<ext>`.
    fn backup_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
        self.parent_dir().join(format!(
            "{}.{}.bak.{}",
            self.stem(),
            stamp,
            self.extension()
        ))
    }

    /// Sibling temp path the serialized bytes land on before the rename.
    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("workbook")
    }

    fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("xlsx")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_first_write_creates_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let guard = PersistenceGuard::new(dir.path().join("ledger.xlsx"), 5);

        guard.commit(b"v1").await.unwrap();

        assert_eq!(fs::read(guard.path()).await.unwrap(), b"v1");
        assert!(guard.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backup_then_replace() {
        let dir = tempfile::tempdir().unwrap();
        let guard = PersistenceGuard::new(dir.path().join("ledger.xlsx"), 5);

        guard.commit(b"v1").await.unwrap();
        guard.commit(b"v2").await.unwrap();

        assert_eq!(fs::read(guard.path()).await.unwrap(), b"v2");
        let backups = guard.list_backups().await.unwrap();
        assert_eq!(backups.len(), 1);
        // The backup holds the pre-mutation content
        assert_eq!(fs::read(&backups[0]).await.unwrap(), b"v1");

        let name = backups[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ledger."));
        assert!(name.ends_with(".bak.xlsx"));
    }

    #[tokio::test]
    async fn test_retention_prunes_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let retention = 3;
        let guard = PersistenceGuard::new(dir.path().join("ledger.xlsx"), retention);

        for i in 0..=(retention + 3) {
            guard.commit(format!("v{i}").as_bytes()).await.unwrap();
            // Keep mtimes (and millisecond stamps) distinct
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let backups = guard.list_backups().await.unwrap();
        assert_eq!(backups.len(), retention);
        // Newest first: the most recent backup holds the second-newest content
        let newest = fs::read(&backups[0]).await.unwrap();
        assert_eq!(newest, format!("v{}", retention + 2).as_bytes());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let guard = PersistenceGuard::new(dir.path().join("ledger.xlsx"), 5);
        guard.commit(b"v1").await.unwrap();

        assert!(!fs::try_exists(dir.path().join("ledger.xlsx.tmp"))
            .await
            .unwrap());
    }
}
