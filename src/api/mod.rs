//! HTTP surface for config-vault
//!
//! An axum router over [`Storage`]. The handlers hold no state of their own;
//! every request goes straight to the document store or the backup manager.

mod handlers;
pub mod response;

use std::future::Future;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::settings::ServerSettings;
use crate::error::{VaultError, VaultResult};
use crate::storage::Storage;

pub use response::{status_for, ApiError, ApiResponse};

/// Routes exposed by [`router`], as `(method, path)`
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/api/config"),
    ("GET", "/api/config/:section"),
    ("PUT", "/api/config"),
    ("PATCH", "/api/config/:section"),
    ("POST", "/api/config/backup"),
    ("GET", "/api/backups"),
    ("POST", "/api/config/restore/:filename"),
];

/// Build the application router
///
/// Cross-origin requests are allowed from any origin so a browser admin
/// panel served elsewhere can call the API.
pub fn router(storage: Storage) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route(
            "/api/config/backup",
            post(handlers::create_backup)
                .get(handlers::get_backup_section)
                .patch(handlers::patch_backup_section),
        )
        .route(
            "/api/config/:section",
            get(handlers::get_section).patch(handlers::patch_section),
        )
        .route(
            "/api/config/restore/:filename",
            post(handlers::restore_backup),
        )
        .route("/api/backups", get(handlers::list_backups))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(storage)
}

/// Bind the configured address
pub async fn bind(settings: &ServerSettings) -> VaultResult<TcpListener> {
    let addr = settings.socket_addr()?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| VaultError::Io(format!("Failed to bind {}: {}", addr, e)))
}

/// Serve requests on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, storage: Storage, shutdown: F) -> VaultResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| VaultError::Io(format!("Failed to read local address: {}", e)))?;

    info!(
        addr = %local,
        config = %storage.config.path().display(),
        backups = %storage.backups.backup_dir().display(),
        "config API server listening"
    );
    for (method, path) in ENDPOINTS {
        info!("  {:<6} {}", method, path);
    }

    axum::serve(listener, router(storage))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| VaultError::Io(format!("Server error: {}", e)))
}
