//! Backup manager for config-vault
//!
//! Takes point-in-time snapshots of the canonical document and enumerates
//! them. Snapshots are dated JSON files that are never modified after they
//! are written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VaultError, VaultResult};
use crate::storage::config_store::ConfigStore;
use crate::storage::file_io::write_json_new;

/// Every snapshot file name starts with this
pub const BACKUP_PREFIX: &str = "config-backup-";

/// Every snapshot file name ends with this
pub const BACKUP_SUFFIX: &str = ".json";

/// Metadata about a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    #[serde(skip)]
    pub path: PathBuf,
    /// Modification time reported by the filesystem
    pub created: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages snapshot creation and enumeration
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// Path to backup directory
    pub(super) backup_dir: PathBuf,
    /// Store the snapshots are taken from and restored into
    pub(super) store: ConfigStore,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(backup_dir: PathBuf, store: ConfigStore) -> Self {
        Self { backup_dir, store }
    }

    /// Snapshot the current document
    ///
    /// Returns the generated filename. Fails with
    /// [`VaultError::StorageRead`] if the document cannot be read and with
    /// [`VaultError::BackupConflict`] if the name is already taken.
    pub fn snapshot(&self) -> VaultResult<String> {
        self.snapshot_at(Utc::now())
    }

    pub(crate) fn snapshot_at(&self, now: DateTime<Utc>) -> VaultResult<String> {
        let doc = self.store.read()?;

        let filename = backup_filename(now);
        let backup_path = self.backup_dir.join(&filename);

        write_json_new(&backup_path, &doc)?;
        info!(backup = %filename, sections = doc.len(), "backup created");

        Ok(filename)
    }

    /// List all available backups, newest first
    ///
    /// Entries with equal modification times are ordered by filename,
    /// descending. A missing backup directory yields an empty list.
    pub fn list(&self) -> VaultResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| VaultError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| VaultError::Io(format!("Failed to read directory entry: {}", e)))?;

            let filename = entry.file_name().to_string_lossy().into_owned();
            if !is_backup_filename(&filename) {
                continue;
            }

            if let Some(info) = backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        sort_newest_first(&mut backups);
        debug!(count = backups.len(), "listed backups");

        Ok(backups)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> VaultResult<Option<BackupInfo>> {
        if !is_backup_filename(filename) {
            return Ok(None);
        }
        let path = self.backup_dir.join(filename);
        if path.is_file() {
            Ok(backup_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent backup
    pub fn latest(&self) -> VaultResult<Option<BackupInfo>> {
        let backups = self.list()?;
        Ok(backups.into_iter().next())
    }
}

/// Build the snapshot name for an instant
///
/// ISO 8601 with `:` and `.` turned into `-`, millisecond precision, so the
/// names sort lexically in time order:
/// `config-backup-2026-10-19T08-15-30-123Z.json`.
pub fn backup_filename(at: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        BACKUP_PREFIX,
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        BACKUP_SUFFIX
    )
}

/// Whether a bare file name follows the snapshot naming convention
pub fn is_backup_filename(name: &str) -> bool {
    name.len() > BACKUP_PREFIX.len() + BACKUP_SUFFIX.len()
        && name.starts_with(BACKUP_PREFIX)
        && name.ends_with(BACKUP_SUFFIX)
        && !name.contains(['/', '\\'])
}

/// Read metadata for a backup file; `None` if it vanished or is not a file
fn backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let created: DateTime<Utc> = metadata.modified().ok()?.into();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created,
        size_bytes: metadata.len(),
    })
}

fn sort_newest_first(backups: &mut [BackupInfo]) {
    backups.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| b.filename.cmp(&a.filename))
    });
}
