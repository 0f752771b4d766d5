//! Custom error types for config-vault
//!
//! This module defines the error hierarchy for the store using thiserror
//! for ergonomic error definitions. Every variant carries the message that
//! is echoed back to HTTP and CLI callers.

use thiserror::Error;

/// The main error type for config-vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// The backing document is missing, unreadable, or malformed
    #[error("Failed to read config file: {0}")]
    StorageRead(String),

    /// The backing document could not be written
    #[error("Failed to write config file: {0}")]
    StorageWrite(String),

    /// A replacement document was not a JSON object
    #[error("Invalid config data: {0}")]
    InvalidDocument(String),

    /// A request body could not be parsed as JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A top-level section is absent from the document
    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    /// A restore target does not name a backup inside the backup directory
    #[error("Backup file not found: {0}")]
    BackupNotFound(String),

    /// A backup file exists but is not valid JSON
    #[error("Backup file is corrupt: {filename}: {reason}")]
    BackupCorrupt { filename: String, reason: String },

    /// A snapshot name is already taken
    #[error("Backup already exists: {0}")]
    BackupConflict(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl VaultError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SectionNotFound(_) | Self::BackupNotFound(_))
    }

    /// Check if the caller sent something the store refuses to accept
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDocument(_) | Self::InvalidBody(_))
    }

    /// Create a corrupt-backup error
    pub fn backup_corrupt(filename: impl Into<String>, reason: impl ToString) -> Self {
        Self::BackupCorrupt {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for config-vault operations
pub type VaultResult<T> = Result<T, VaultError>;
