//! SQL schema generation with customizable table prefixes.
//!
//! The registry uses a single table, `{prefix}people`:
//!
//! - `id` — primary key assigned by SQLite
//! - `name` — non-empty display name
//! - `age` — whole years
//! - `national_id` — canonical CPF, unique
//!
//! # Custom prefix
//!
//! Prefixes must contain only alphanumeric characters and underscores.
//! They are interpolated into SQL text, so validation is mandatory before
//! any statement is built.

use crate::error::{Result, SqliteError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Returns the people table name for `prefix`.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
pub fn table_name(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;
    Ok(format!("{prefix}people"))
}

/// Generates the `CREATE TABLE` statement for the given prefix.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix contains characters
/// other than alphanumerics and underscores, or if it is empty.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}people (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    age INTEGER NOT NULL CHECK (age >= 0),
    national_id TEXT NOT NULL UNIQUE
);
"#,
        prefix = prefix
    );

    Ok(sql)
}

/// Generates SQL to drop the registry table.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;
    Ok(format!("DROP TABLE IF EXISTS {prefix}people;\n"))
}
