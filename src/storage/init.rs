//! Storage initialization
//!
//! Handles first-run setup: directories plus an empty document.

use crate::config::paths::StorePaths;
use crate::error::VaultError;

use super::config_store::ConfigStore;

/// Initialize storage for a fresh installation
///
/// Creates the data and backup directories and writes `{}` as the document
/// if none exists. Returns whether a new document was written.
pub fn initialize_storage(paths: &StorePaths) -> Result<bool, VaultError> {
    paths.ensure_directories()?;
    ConfigStore::new(paths.config_file()).initialize()
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &StorePaths) -> bool {
    !paths.is_initialized()
}
