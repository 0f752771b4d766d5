//! Path management for config-vault
//!
//! Resolves where the canonical document and the backup directory live.
//!
//! ## Path Resolution Order
//!
//! 1. An explicit directory (the `--data-dir` flag)
//! 2. `CONFIG_VAULT_DIR` environment variable (if set)
//! 3. The current working directory

use std::path::PathBuf;

use crate::error::VaultError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "CONFIG_VAULT_DIR";

/// File name of the canonical document
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name holding snapshots
pub const BACKUP_DIR_NAME: &str = "backups";

/// Manages all paths used by config-vault
#[derive(Debug, Clone)]
pub struct StorePaths {
    /// Base directory holding the document and the backup directory
    base_dir: PathBuf,
}

impl StorePaths {
    /// Create a new StorePaths instance
    ///
    /// Path resolution:
    /// 1. `CONFIG_VAULT_DIR` env var (explicit override)
    /// 2. current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => std::env::current_dir().map_err(|e| {
                VaultError::Config(format!("Could not determine working directory: {}", e))
            })?,
        };

        Ok(Self { base_dir })
    }

    /// Create StorePaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve from an optional explicit directory, falling back to [`StorePaths::new`]
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, VaultError> {
        match explicit {
            Some(dir) => Ok(Self::with_base_dir(dir)),
            None => Self::new(),
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the canonical document (config.json)
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Get the backup directory (backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join(BACKUP_DIR_NAME)
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if a document has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file().exists()
    }
}
