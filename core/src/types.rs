//! Registrant data model.
//!
//! A [`Person`] is assembled in memory by the [`Collector`](crate::Collector)
//! and persisted once by a storage backend. When read back, the backend pairs
//! it with its storage-assigned primary key as a [`StoredRecord`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One registrant.
///
/// `national_id` holds the canonical (digit-only) CPF. The
/// [`Collector`](crate::Collector) only yields a `Person` whose name is
/// non-empty and whose identifier was not already present in storage;
/// code that builds one by hand is responsible for the same guarantees.
///
/// # Examples
///
/// ```
/// use cadastro_core::Person;
///
/// let bob = Person::new("Bob", 25, "22222222222");
/// assert_eq!(bob.name, "Bob");
/// assert_eq!(bob.age, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Display name, never empty.
    pub name: String,
    /// Age in whole years.
    pub age: u32,
    /// Canonical CPF, unique across all stored people.
    pub national_id: String,
}

impl Person {
    /// Creates a person from already validated parts.
    pub fn new(name: impl Into<String>, age: u32, national_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            national_id: national_id.into(),
        }
    }
}

/// A [`Person`] together with the primary key assigned by storage.
///
/// Read-only from the application's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub person: Person,
}

impl StoredRecord {
    pub fn new(id: i64, person: Person) -> Self {
        Self { id, person }
    }
}

impl fmt::Display for StoredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}. {} years old. CPF {}",
            self.id, self.person.name, self.person.age, self.person.national_id
        )
    }
}
