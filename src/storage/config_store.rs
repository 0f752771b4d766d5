//! Canonical document store
//!
//! Reads and writes the single configuration document. Nothing is cached:
//! every operation goes back to disk, and every mutation is persisted before
//! it returns.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{VaultError, VaultResult};

use super::file_io::{read_json_value, write_json_atomic};

/// The configuration document: top-level section names to arbitrary JSON
pub type ConfigDocument = Map<String, Value>;

/// Store for the canonical configuration document
///
/// Clones share one write lock, so read-modify-write cycles issued through
/// the same store never interleave.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ConfigStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and parse the whole document
    ///
    /// Fails with [`VaultError::StorageRead`] when the file is missing,
    /// unreadable, not JSON, or not a JSON object.
    pub fn read(&self) -> VaultResult<ConfigDocument> {
        debug!(path = %self.path.display(), "reading config document");

        let value = read_json_value(&self.path).map_err(|e| match e {
            VaultError::Io(msg) | VaultError::Json(msg) => VaultError::StorageRead(msg),
            other => other,
        })?;

        match value {
            Value::Object(doc) => Ok(doc),
            other => Err(VaultError::StorageRead(format!(
                "{}: top-level value is {}, expected an object",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Read a single top-level section
    pub fn read_section(&self, name: &str) -> VaultResult<Value> {
        let mut doc = self.read()?;
        doc.remove(name)
            .ok_or_else(|| VaultError::SectionNotFound(name.to_string()))
    }

    /// Replace the whole document
    ///
    /// `doc` must be a JSON object; anything else fails with
    /// [`VaultError::InvalidDocument`] and leaves storage untouched.
    pub fn replace(&self, doc: Value) -> VaultResult<ConfigDocument> {
        let doc = into_document(doc)?;

        let _guard = self.lock()?;
        self.persist(&doc)?;
        info!(path = %self.path.display(), sections = doc.len(), "config document replaced");

        Ok(doc)
    }

    /// Replace the value of an existing top-level section
    ///
    /// The new value supersedes the old one entirely; no merging happens and
    /// the JSON type may change. Returns the updated document.
    pub fn patch_section(&self, name: &str, value: Value) -> VaultResult<ConfigDocument> {
        let _guard = self.lock()?;

        let mut doc = self.read()?;
        match doc.get_mut(name) {
            Some(slot) => *slot = value,
            None => return Err(VaultError::SectionNotFound(name.to_string())),
        }

        self.persist(&doc)?;
        info!(path = %self.path.display(), section = name, "config section replaced");

        Ok(doc)
    }

    /// Create the backing file with an empty document if it is missing
    ///
    /// Returns `true` when a file was created. An existing file is never
    /// touched.
    pub fn initialize(&self) -> VaultResult<bool> {
        let _guard = self.lock()?;

        if self.exists() {
            return Ok(false);
        }

        self.persist(&ConfigDocument::new())?;
        info!(path = %self.path.display(), "initialized empty config document");
        Ok(true)
    }

    fn persist(&self, doc: &ConfigDocument) -> VaultResult<()> {
        write_json_atomic(&self.path, doc).map_err(|e| match e {
            VaultError::Io(msg) | VaultError::Json(msg) => VaultError::StorageWrite(msg),
            other => other,
        })
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| VaultError::StorageWrite(format!("Failed to acquire write lock: {}", e)))
    }
}

/// Accept only JSON objects as whole documents
fn into_document(value: Value) -> VaultResult<ConfigDocument> {
    match value {
        Value::Object(doc) => Ok(doc),
        other => Err(VaultError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Human-readable name of a JSON value's type
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
