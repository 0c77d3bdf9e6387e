//! Conversion between [`Person`] and SQLite rows.
//!
//! Rows are read positionally. Every query that feeds [`entry_from_row`]
//! must select `(name, age, national_id, id)` in that order.

use cadastro_core::Person;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Result, SqliteError};

/// Inserts a person and returns the assigned primary key.
pub(crate) fn insert_person(conn: &Connection, table: &str, person: &Person) -> Result<i64> {
    let mut stmt = conn.prepare_cached(&format!(
        "INSERT INTO {table} (name, age, national_id) VALUES (?1, ?2, ?3)"
    ))?;
    stmt.execute(params![person.name, i64::from(person.age), person.national_id])?;
    Ok(conn.last_insert_rowid())
}

/// Returns the id of the row holding `national_id`, if any.
pub(crate) fn find_id_by_national_id(
    conn: &Connection,
    table: &str,
    national_id: &str,
) -> Result<Option<i64>> {
    let id = conn
        .prepare_cached(&format!("SELECT id FROM {table} WHERE national_id = ?1"))?
        .query_row(params![national_id], |row| row.get::<_, i64>(0))
        .optional()?;
    Ok(id)
}

/// Maps a `(name, age, national_id, id)` row to its id and person.
pub(crate) fn entry_from_row(row: &Row<'_>) -> Result<(i64, Person)> {
    let name: String = row.get(0)?;
    let age: i64 = row.get(1)?;
    let national_id: String = row.get(2)?;
    let id: i64 = row.get(3)?;

    let age = u32::try_from(age).map_err(|_| {
        SqliteError::ConversionError(format!("age {age} out of range for record {id}"))
    })?;

    Ok((
        id,
        Person {
            name,
            age,
            national_id,
        },
    ))
}
