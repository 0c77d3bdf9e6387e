//! Error types for SQLite registry operations.

use std::collections::BTreeMap;

use cadastro_core::Person;
use thiserror::Error;

/// Errors that can occur during SQLite registry operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// A stored row could not be mapped to a person.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Migration lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;

/// A listing that failed partway.
///
/// Carries the rows that were read successfully before `source` occurred.
#[derive(Debug, Error)]
#[error("listing stopped after {} row(s): {source}", .records.len())]
pub struct PartialListing {
    /// Rows mapped before the failure, keyed by storage id.
    pub records: BTreeMap<i64, Person>,
    /// The failure that ended the listing.
    #[source]
    pub source: SqliteError,
}

impl PartialListing {
    pub(crate) fn new(records: BTreeMap<i64, Person>, source: impl Into<SqliteError>) -> Self {
        Self {
            records,
            source: source.into(),
        }
    }

    /// Discards the partial rows and keeps the failure.
    pub fn into_source(self) -> SqliteError {
        self.source
    }
}
