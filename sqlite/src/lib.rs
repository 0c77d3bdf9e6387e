//! SQLite storage backend for the person registry.
//!
//! This crate stores [`Person`](cadastro_core::Person) records in a single
//! prefixed table and implements the storage side of the registry: the
//! duplicate check, registration, and listing.
//!
//! # Architecture
//!
//! - **`schema`** — SQL generation with customizable table prefixes
//! - **`migration`** — Lifecycle operations (up/down/status)
//! - **`convert`** — Row ↔ [`Person`](cadastro_core::Person) mapping
//! - **`query`** — [`PersonStore`], the runtime read/write interface
//!
//! # Quick start
//!
//! ```no_run
//! use cadastro_core::Person;
//! use cadastro_sqlite::{Migration, PersonStore};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("cadastro.db").unwrap();
//! let mut migration = Migration::new(conn, "cad_").unwrap();
//! migration.up().unwrap();
//!
//! let store = PersonStore::new(migration.connection(), "cad_").unwrap();
//! store.register(&Person::new("Bob", 25, "22222222222")).unwrap();
//!
//! for (id, person) in store.list_all().unwrap() {
//!     println!("{id} = {}", person.name);
//! }
//! ```
//!
//! # Table prefix customization
//!
//! The table name is prefixed with a configurable string, allowing several
//! isolated registries in the same SQLite database. Prefixes must contain
//! only alphanumeric characters and underscores.

mod convert;
mod error;
mod migration;
mod query;
mod schema;

pub use error::{PartialListing, Result, SqliteError};
pub use migration::{Migration, MigrationStatus};
pub use query::PersonStore;
pub use schema::{generate_drop_sql, generate_schema_sql, table_name};
