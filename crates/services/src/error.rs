//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SessionService`.
///
/// Calling a signed-in-only operation while anonymous is not an error; those
/// calls report a no-op outcome instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ContactService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContactError {
    #[error("contact field `{0}` cannot be empty")]
    EmptyField(&'static str),
    #[error("unknown inquiry type: {0}")]
    UnknownKind(String),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {var} value: {raw}")]
    InvalidValue { var: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
