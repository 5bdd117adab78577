//! Shared error types for the services crate.
//!
//! Walkthrough and panel-state operations degrade instead of failing, so only
//! bootstrap has an error type.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
