//! Request handlers
//!
//! Handlers run the blocking store operations on Tokio's blocking pool and
//! translate results into [`ApiResponse`]/[`ApiError`]. Request bodies are
//! taken as raw bytes and parsed here so malformed JSON still gets a JSON
//! error body.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::backup::BackupInfo;
use crate::error::{VaultError, VaultResult};
use crate::storage::{ConfigDocument, Storage};

use super::response::{ApiError, ApiResponse};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Run a blocking store operation off the async workers
async fn blocking<T>(
    label: &'static str,
    f: impl FnOnce() -> VaultResult<T> + Send + 'static,
) -> VaultResult<T>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| VaultError::Io(format!("{label}: task failed: {e}")))?
}

fn parse_body(body: &[u8]) -> VaultResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(VaultError::InvalidBody("request body is empty".into()));
    }
    serde_json::from_slice(body).map_err(|e| VaultError::InvalidBody(e.to_string()))
}

#[derive(Debug, Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(super) async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

pub(super) async fn get_config(State(storage): State<Storage>) -> ApiResult<ConfigDocument> {
    let store = storage.config;
    let doc = blocking("read config", move || store.read()).await?;
    Ok(ApiResponse::data(doc))
}

pub(super) async fn get_section(
    State(storage): State<Storage>,
    Path(section): Path<String>,
) -> ApiResult<Value> {
    read_section(storage, section).await
}

pub(super) async fn put_config(State(storage): State<Storage>, body: Bytes) -> ApiResult<ConfigDocument> {
    let doc = parse_body(&body)?;
    let store = storage.config;
    let doc = blocking("replace config", move || store.replace(doc)).await?;
    Ok(ApiResponse::data(doc).with_message("Config updated successfully"))
}

pub(super) async fn patch_section(
    State(storage): State<Storage>,
    Path(section): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    write_section(storage, section, &body).await
}

pub(super) async fn create_backup(State(storage): State<Storage>) -> ApiResult<()> {
    let backups = storage.backups;
    let filename = blocking("create backup", move || backups.snapshot()).await?;
    Ok(ApiResponse::filename("Backup created successfully", filename))
}

pub(super) async fn list_backups(State(storage): State<Storage>) -> ApiResult<Vec<BackupInfo>> {
    let backups = storage.backups;
    let list = blocking("list backups", move || backups.list()).await?;
    Ok(ApiResponse::data(list))
}

pub(super) async fn restore_backup(
    State(storage): State<Storage>,
    Path(filename): Path<String>,
) -> ApiResult<ConfigDocument> {
    let backups = storage.backups;
    let doc = blocking("restore backup", move || backups.restore(&filename)).await?;
    Ok(ApiResponse::data(doc).with_message("Config restored from backup successfully"))
}

// `/api/config/backup` is a static route, so a section literally named
// "backup" is served through these two.

pub(super) async fn get_backup_section(State(storage): State<Storage>) -> ApiResult<Value> {
    read_section(storage, "backup".to_string()).await
}

pub(super) async fn patch_backup_section(State(storage): State<Storage>, body: Bytes) -> ApiResult<Value> {
    write_section(storage, "backup".to_string(), &body).await
}

async fn read_section(storage: Storage, section: String) -> ApiResult<Value> {
    let store = storage.config;
    let value = blocking("read section", move || store.read_section(&section)).await?;
    Ok(ApiResponse::data(value))
}

async fn write_section(storage: Storage, section: String, body: &[u8]) -> ApiResult<Value> {
    let value = parse_body(body)?;
    let store = storage.config;
    let name = section.clone();
    let mut doc = blocking("patch section", move || store.patch_section(&name, value)).await?;

    let updated = doc.remove(&section).unwrap_or(Value::Null);
    Ok(ApiResponse::data(updated).with_message(format!("Section '{}' updated successfully", section)))
}
