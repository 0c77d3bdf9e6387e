//! Runtime registry access via SQLite queries.
//!
//! [`PersonStore`] implements the three storage-facing operations of the
//! registry: the duplicate check, registration, and listing. It borrows a
//! connection owned elsewhere (typically by a [`Migration`](crate::Migration))
//! so one handle is shared by every component.
//!
//! # Example
//!
//! ```
//! use cadastro_core::Person;
//! use cadastro_sqlite::{Migration, PersonStore};
//! use rusqlite::Connection;
//!
//! let mut migration = Migration::new(Connection::open_in_memory().unwrap(), "cad_").unwrap();
//! migration.up().unwrap();
//! let store = PersonStore::new(migration.connection(), "cad_").unwrap();
//!
//! let bob = Person::new("Bob", 25, "22222222222");
//! let id = store.register(&bob).unwrap();
//! assert!(store.exists("22222222222"));
//!
//! let all = store.list_all().unwrap();
//! assert_eq!(all.get(&id), Some(&bob));
//! ```

use std::collections::BTreeMap;

use cadastro_core::{DuplicateCheck, Person, StoredRecord};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::{PartialListing, Result, SqliteError};
use crate::schema::table_name;

/// Read/write interface to the people table.
pub struct PersonStore<'a> {
    conn: &'a Connection,
    table: String,
}

impl<'a> PersonStore<'a> {
    /// Creates a store for the given connection and table prefix.
    ///
    /// The table itself is not created here; run
    /// [`Migration::up`](crate::Migration::up) first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
    pub fn new(conn: &'a Connection, prefix: &str) -> Result<Self> {
        let table = table_name(prefix)?;
        Ok(Self { conn, table })
    }

    /// Returns `true` if a record with `national_id` is stored.
    ///
    /// A failed lookup also returns `false`, so "not found" and "could not
    /// look" are indistinguishable here. The failure is logged. Use
    /// [`lookup`](Self::lookup) when the two must be told apart.
    pub fn exists(&self, national_id: &str) -> bool {
        match self.lookup(national_id) {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(%national_id, error = %err, "CPF lookup failed; treating as not registered");
                false
            }
        }
    }

    /// Returns the id of the record holding `national_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::DatabaseError`] if the query fails, e.g. when
    /// the table does not exist.
    pub fn lookup(&self, national_id: &str) -> Result<Option<i64>> {
        debug!(table = %self.table, %national_id, "looking up CPF");
        convert::find_id_by_national_id(self.conn, &self.table, national_id)
    }

    /// Inserts `person` and returns its assigned id.
    ///
    /// There is no check-and-insert transaction: a CPF registered after the
    /// last [`lookup`](Self::lookup) is rejected here by the table's
    /// uniqueness constraint.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::DatabaseError`] if the insert fails, including
    /// uniqueness and check-constraint violations.
    pub fn register(&self, person: &Person) -> Result<i64> {
        let id = convert::insert_person(self.conn, &self.table, person)?;
        info!(id, national_id = %person.national_id, "registered person");
        Ok(id)
    }

    /// Returns the query used by [`list_all`](Self::list_all).
    pub fn list_query(&self) -> String {
        format!(
            "SELECT name, age, national_id, id FROM {} ORDER BY id",
            self.table
        )
    }

    /// Lists every stored person keyed by id, in ascending id order.
    ///
    /// # Errors
    ///
    /// See [`list_with`](Self::list_with).
    pub fn list_all(&self) -> std::result::Result<BTreeMap<i64, Person>, PartialListing> {
        self.list_with(&self.list_query())
    }

    /// Runs `query` and maps each row into the result.
    ///
    /// The query must select `(name, age, national_id, id)` in that order.
    /// Statement and cursor are released on every path.
    ///
    /// # Errors
    ///
    /// Returns a [`PartialListing`] holding the rows read before the query
    /// or a row read failed.
    pub fn list_with(&self, query: &str) -> std::result::Result<BTreeMap<i64, Person>, PartialListing> {
        debug!(%query, "listing people");
        let mut records = BTreeMap::new();

        let mut stmt = match self.conn.prepare(query) {
            Ok(stmt) => stmt,
            Err(err) => return Err(PartialListing::new(records, err)),
        };
        let mut rows = match stmt.query([]) {
            Ok(rows) => rows,
            Err(err) => return Err(PartialListing::new(records, err)),
        };

        loop {
            match rows.next() {
                Ok(Some(row)) => match convert::entry_from_row(row) {
                    Ok((id, person)) => {
                        records.insert(id, person);
                    }
                    Err(err) => return Err(PartialListing::new(records, err)),
                },
                Ok(None) => break,
                Err(err) => return Err(PartialListing::new(records, err)),
            }
        }

        Ok(records)
    }

    /// Loads a single record by its storage id.
    pub fn find(&self, id: i64) -> Result<Option<StoredRecord>> {
        let found = self
            .conn
            .query_row(
                &format!(
                    "SELECT name, age, national_id, id FROM {} WHERE id = ?1",
                    self.table
                ),
                params![id],
                |row| Ok(convert::entry_from_row(row)),
            )
            .optional()?;

        found
            .transpose()
            .map(|entry| entry.map(|(id, person)| StoredRecord::new(id, person)))
    }
}

impl DuplicateCheck for PersonStore<'_> {
    type Error = SqliteError;

    fn is_registered(&self, national_id: &str) -> Result<bool> {
        Ok(self.lookup(national_id)?.is_some())
    }
}
