//! Catalog error taxonomy.
//!
//! Structural failures (cursor shape, positioning, release) are strict
//! errors. Locator parsing is not represented here: bad locator text is
//! always `None`.

use crate::db::DbError;
use crate::model::theme::KeyValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error returned by catalog, cursor and dispatch operations.
#[derive(Debug)]
pub enum CatalogError {
    /// Empty result set at cursor construction, malformed key or projection.
    InvalidArgument(String),
    /// A column needed by the cursor is absent from the result set.
    SchemaMismatch { column: &'static str },
    /// Read without a current row, or positioning outside `[0, count)`.
    NoCurrentRow { position: Option<usize> },
    /// Use after `release()`.
    Released,
    /// Underlying store could not serve the request.
    StoreUnavailable(DbError),
    /// Sender lacks the named permission.
    PermissionDenied { permission: &'static str },
    /// Notification system is shut down.
    ChannelUnavailable,
    /// Stored value has the wrong storage type.
    InvalidData(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::SchemaMismatch { column } => {
                write!(f, "result set is missing required column `{column}`")
            }
            Self::NoCurrentRow { position: Some(position) } => {
                write!(f, "no row at position {position}")
            }
            Self::NoCurrentRow { position: None } => write!(f, "cursor is not positioned on a row"),
            Self::Released => write!(f, "result set already released"),
            Self::StoreUnavailable(err) => write!(f, "catalog store unavailable: {err}"),
            Self::PermissionDenied { permission } => {
                write!(f, "sender does not hold permission {permission}")
            }
            Self::ChannelUnavailable => write!(f, "notification channel is unavailable"),
            Self::InvalidData(message) => write!(f, "invalid stored theme data: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StoreUnavailable(DbError::Sqlite(value))
    }
}

impl From<KeyValidationError> for CatalogError {
    fn from(value: KeyValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
