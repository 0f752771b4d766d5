//! Storage layer for config-vault
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod config_store;
pub mod file_io;
pub mod init;

pub use config_store::{ConfigDocument, ConfigStore};
pub use file_io::{read_json_value, write_json_atomic, write_json_new};
pub use init::{initialize_storage, needs_initialization};

use crate::backup::BackupManager;
use crate::config::paths::StorePaths;
use crate::error::VaultError;

/// Storage coordinator wiring the document store to its backup manager
#[derive(Debug, Clone)]
pub struct Storage {
    paths: StorePaths,
    pub config: ConfigStore,
    pub backups: BackupManager,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: StorePaths) -> Result<Self, VaultError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        let config = ConfigStore::new(paths.config_file());
        let backups = BackupManager::new(paths.backup_dir(), config.clone());

        Ok(Self {
            paths,
            config,
            backups,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }
}
