//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. All
//! JSON is written pretty-printed with a fixed four-space indent so stored
//! documents stay diffable by hand.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::VaultError;

const INDENT: &[u8] = b"    ";

/// Serialize a value as four-space indented JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    write_pretty(&mut buf, data)?;
    Ok(buf)
}

fn write_pretty<W: Write, T: Serialize + ?Sized>(
    writer: W,
    data: &T,
) -> Result<(), serde_json::Error> {
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    data.serialize(&mut ser)
}

/// Read a file as a generic JSON value
///
/// Open failures come back as [`VaultError::Io`], parse failures as
/// [`VaultError::Json`]; both messages name the file.
pub fn read_json_value<P: AsRef<Path>>(path: P) -> Result<Value, VaultError> {
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| VaultError::Io(format!("{}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| VaultError::Json(format!("{}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The target is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), VaultError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp = write_temp(path, data)?;

    temp.persist(path)
        .map_err(|e| VaultError::Io(format!("Failed to rename temp file: {}", e.error)))?;

    Ok(())
}

/// Write JSON to a file that must not exist yet
///
/// The content is staged in a temp file and published without replacing an
/// existing target. An existing target yields [`VaultError::BackupConflict`].
pub fn write_json_new<T, P>(path: P, data: &T) -> Result<(), VaultError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp = write_temp(path, data)?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Err(VaultError::BackupConflict(file_name_lossy(path)))
        }
        Err(e) => Err(VaultError::Io(format!(
            "Failed to publish {}: {}",
            path.display(),
            e.error
        ))),
    }
}

/// Stage serialized data in a fresh temp file next to `path`, synced to disk
///
/// Each call gets its own temp file, removed on drop unless persisted.
fn write_temp<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<NamedTempFile, VaultError> {
    // Same directory as the target, so the final rename/link stays on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        VaultError::Io(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name_lossy(path)))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| VaultError::Io(format!("Failed to create temp file: {}", e)))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_pretty(&mut writer, data)
            .map_err(|e| VaultError::Json(format!("Failed to serialize data: {}", e)))?;
        writer
            .flush()
            .map_err(|e| VaultError::Io(format!("Failed to flush data: {}", e)))?;
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| VaultError::Io(format!("Failed to sync data: {}", e)))?;

    Ok(temp)
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
