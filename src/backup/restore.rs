//! Backup restoration for config-vault
//!
//! Resolves a backup name inside the backup directory and writes its content
//! back as the canonical document.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{VaultError, VaultResult};
use crate::storage::config_store::{json_kind, ConfigDocument};
use crate::storage::file_io::read_json_value;

use super::manager::{is_backup_filename, BackupManager};

impl BackupManager {
    /// Restore the canonical document from a backup
    ///
    /// This overwrites the current document. Fails with
    /// [`VaultError::BackupNotFound`] if `filename` does not name a backup
    /// inside the backup directory, [`VaultError::BackupCorrupt`] if the file
    /// is not JSON, and [`VaultError::InvalidDocument`] if it is JSON but not
    /// an object.
    pub fn restore(&self, filename: &str) -> VaultResult<ConfigDocument> {
        let value = self.read_backup(filename)?;
        let doc = self.store.replace(value)?;

        info!(backup = filename, sections = doc.len(), "config restored from backup");
        Ok(doc)
    }

    /// Validate a backup without restoring it
    pub fn validate(&self, filename: &str) -> VaultResult<ValidationResult> {
        let path = self.resolve(filename)?;
        let value = self.read_backup(filename)?;
        let metadata = std::fs::metadata(&path)?;

        let (is_object, sections) = match &value {
            Value::Object(doc) => (true, doc.keys().cloned().collect()),
            _ => (false, Vec::new()),
        };

        Ok(ValidationResult {
            filename: filename.to_string(),
            created: metadata.modified()?.into(),
            size_bytes: metadata.len(),
            kind: json_kind(&value),
            is_object,
            sections,
        })
    }

    fn read_backup(&self, filename: &str) -> VaultResult<Value> {
        let path = self.resolve(filename)?;

        read_json_value(&path).map_err(|e| match e {
            VaultError::Json(msg) => VaultError::backup_corrupt(filename, msg),
            other => other,
        })
    }

    /// Map a backup name to a path that is guaranteed to be inside the
    /// backup directory
    fn resolve(&self, filename: &str) -> VaultResult<PathBuf> {
        let not_found = || VaultError::BackupNotFound(filename.to_string());

        if !is_backup_filename(filename) || !is_single_component(filename) {
            warn!(backup = filename, "rejected backup name");
            return Err(not_found());
        }

        let path = self.backup_dir.join(filename);
        if !path.is_file() {
            return Err(not_found());
        }

        // Symlinks could still point elsewhere
        let dir = self.backup_dir.canonicalize().map_err(|_| not_found())?;
        let resolved = path.canonicalize().map_err(|_| not_found())?;
        if !resolved.starts_with(&dir) {
            warn!(backup = filename, "backup resolves outside the backup directory");
            return Err(not_found());
        }

        Ok(resolved)
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Backup filename
    pub filename: String,
    /// Modification time of the backup file
    pub created: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
    /// JSON type of the top-level value
    pub kind: &'static str,
    /// Whether the content can be restored as a document
    pub is_object: bool,
    /// Top-level section names, in file order
    pub sections: Vec<String>,
}

impl ValidationResult {
    /// Get a summary of the backup content
    pub fn summary(&self) -> String {
        if !self.is_object {
            return format!("Not restorable: top-level value is {}", self.kind);
        }

        match self.sections.len() {
            0 => "Restorable (empty document)".to_string(),
            n => format!(
                "Restorable: {} section(s): {}",
                n,
                self.sections.join(", ")
            ),
        }
    }
}
