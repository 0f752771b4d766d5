//! Configuration module for config-vault
//!
//! This module provides:
//! - data directory resolution (document and backup locations)
//! - listener settings for the HTTP server

pub mod paths;
pub mod settings;

pub use paths::StorePaths;
pub use settings::ServerSettings;
