//! Core types and input handling for the person registry.
//!
//! This crate defines the pieces of the registry that do not depend on a
//! particular storage engine:
//!
//! - [`Person`] and [`StoredRecord`] — the registrant data model.
//! - [`normalize_cpf`] — reduces a raw CPF entry to its canonical,
//!   digit-only form.
//! - [`validate_name`] / [`parse_age`] — per-field validation rules.
//! - [`Collector`] — the interactive prompt loop that assembles a valid
//!   [`Person`], consulting a [`DuplicateCheck`] for identifier uniqueness.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use std::io::Cursor;
//! use cadastro_core::*;
//!
//! let taken: HashSet<String> = HashSet::new();
//! let input = Cursor::new("Alice\n30\n111.111.111-11\n");
//! let mut output = Vec::new();
//!
//! let person = Collector::new(input, &mut output, &taken).collect().unwrap();
//! assert_eq!(person, Person::new("Alice", 30, "11111111111"));
//! ```

mod collect;
mod normalize;
mod types;
mod validate;

pub use collect::{CollectError, Collector, DuplicateCheck, Field, Prompts, RetryPolicy};
pub use normalize::{is_canonical, normalize_cpf};
pub use types::{Person, StoredRecord};
pub use validate::{ValidationError, parse_age, validate_name};

/// Convenience alias for results with [`CollectError`].
pub type Result<T> = std::result::Result<T, CollectError>;
