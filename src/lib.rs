//! config-vault - File-backed JSON configuration store
//!
//! This library keeps one JSON configuration document on disk, lets callers
//! read, replace, or patch it section by section, and snapshots it into
//! timestamped backups that can later be restored.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and server settings
//! - `error`: Custom error types
//! - `storage`: The canonical document store and atomic JSON file I/O
//! - `backup`: Snapshot, listing, and restore
//! - `api`: HTTP routes (axum)
//! - `cli`: Command-line handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use config_vault::config::StorePaths;
//! use config_vault::storage::Storage;
//!
//! let storage = Storage::new(StorePaths::new()?)?;
//! let limits = storage.config.read_section("limits")?;
//! let backup = storage.backups.snapshot()?;
//! ```

pub mod api;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;

pub use error::{VaultError, VaultResult};
