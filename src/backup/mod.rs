//! Backup system for config-vault
//!
//! Snapshots the canonical document into timestamp-named files and restores
//! it from them.
//!
//! # Backup Format
//!
//! Each backup is the document itself, pretty-printed with a four-space
//! indent, stored as `backups/config-backup-<timestamp>.json` where the
//! timestamp is ISO 8601 UTC with `:` and `.` replaced by `-`. Names sort
//! lexically in capture order. Backups are never modified or pruned by the
//! store.
//!
//! # Example
//!
//! ```rust,ignore
//! use config_vault::backup::BackupManager;
//! use config_vault::storage::ConfigStore;
//!
//! let store = ConfigStore::new("config.json".into());
//! let backups = BackupManager::new("backups".into(), store.clone());
//!
//! let filename = backups.snapshot()?;
//! store.replace(serde_json::json!({"a": 1}))?;
//! let restored = backups.restore(&filename)?;
//! ```

mod manager;
mod restore;

pub use manager::{
    backup_filename, is_backup_filename, BackupInfo, BackupManager, BACKUP_PREFIX, BACKUP_SUFFIX,
};
pub use restore::ValidationResult;
