//! Migration lifecycle operations for the registry table.
//!
//! Provides [`Migration`] for creating, dropping, and inspecting the
//! `{prefix}people` table. Mutations run inside transactions.
//!
//! # Example
//!
//! ```no_run
//! use cadastro_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("cadastro.db").unwrap();
//! let mut migration = Migration::new(conn, "cad_").unwrap();
//!
//! migration.up().unwrap();
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! ```

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, SqliteError};
use crate::schema::{generate_drop_sql, generate_schema_sql, table_name};

/// Manages the lifecycle of the registry table.
///
/// Owns the connection for the lifetime of the program; hand out borrows
/// through [`connection`](Self::connection) to build a
/// [`PersonStore`](crate::PersonStore).
pub struct Migration {
    conn: Connection,
    prefix: String,
}

impl Migration {
    /// Creates a new migration manager for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        table_name(&prefix)?;
        Ok(Self { conn, prefix })
    }

    /// Creates the registry table.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to call multiple times.
    pub fn up(&mut self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        debug!(prefix = %self.prefix, "registry table ready");
        Ok(())
    }

    /// Drops the registry table and every record in it.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe to call even if the table
    /// does not exist.
    pub fn down(&mut self) -> Result<()> {
        let sql = generate_drop_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to drop tables: {e}")))?;
        tx.commit()?;
        debug!(prefix = %self.prefix, "registry table dropped");
        Ok(())
    }

    /// Returns whether the table exists and how many records it holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        let table = table_name(&self.prefix)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [&table],
            |row| row.get(0),
        )?;

        if count == 0 {
            return Ok(MigrationStatus {
                tables_exist: false,
                record_count: 0,
            });
        }

        let records: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;

        Ok(MigrationStatus {
            tables_exist: true,
            record_count: records as usize,
        })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Snapshot returned by [`Migration::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether the registry table exists.
    pub tables_exist: bool,
    /// Number of stored people.
    pub record_count: usize,
}
