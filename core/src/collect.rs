//! Interactive collection of a [`Person`].
//!
//! [`Collector`] runs three independent prompt loops (name, age, CPF). Each
//! loop writes a prompt, reads one line, validates it and, on a
//! [`ValidationError`], prints the error and asks again. Retries are
//! unbounded unless a [`RetryPolicy`] caps them.
//!
//! Uniqueness of the CPF is checked through the [`DuplicateCheck`]
//! capability, so the loop can be driven by any storage backend or by an
//! in-memory set in tests.
//!
//! The check and the later insert are not atomic. A record registered by
//! someone else in between is only caught by the storage uniqueness
//! constraint at insert time.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::normalize::normalize_cpf;
use crate::types::Person;
use crate::validate::{ValidationError, parse_age, validate_name};

/// Answers whether a canonical CPF is already registered.
///
/// Implementations report lookup failures through `Err` instead of folding
/// them into `Ok(false)`; the [`Collector`] aborts on such an error.
pub trait DuplicateCheck {
    /// Lookup failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `Ok(true)` if a record with `national_id` exists.
    fn is_registered(&self, national_id: &str) -> std::result::Result<bool, Self::Error>;
}

impl<T: DuplicateCheck + ?Sized> DuplicateCheck for &T {
    type Error = T::Error;

    fn is_registered(&self, national_id: &str) -> std::result::Result<bool, Self::Error> {
        (**self).is_registered(national_id)
    }
}

impl DuplicateCheck for HashSet<String> {
    type Error = Infallible;

    fn is_registered(&self, national_id: &str) -> std::result::Result<bool, Infallible> {
        Ok(self.contains(national_id))
    }
}

/// The field a prompt loop is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    NationalId,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::NationalId => "CPF",
        })
    }
}

/// How many invalid entries a single field may receive.
///
/// # Examples
///
/// ```
/// use cadastro_core::RetryPolicy;
///
/// assert_eq!(RetryPolicy::default(), RetryPolicy::unbounded());
/// assert!(RetryPolicy::at_most(2).is_exhausted(2));
/// assert!(!RetryPolicy::unbounded().is_exhausted(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Maximum invalid entries per field, `None` for no limit.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Keeps asking until a valid entry arrives.
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Gives up after `max` invalid entries. A limit of zero is treated as one.
    pub fn at_most(max: u32) -> Self {
        Self {
            max_attempts: Some(max),
        }
    }

    /// Returns `true` once `failures` invalid entries use up the budget.
    pub fn is_exhausted(&self, failures: u32) -> bool {
        self.max_attempts
            .is_some_and(|max| failures >= max.max(1))
    }
}

/// Prompt texts written before each read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub name: String,
    pub age: String,
    pub national_id: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            name: "Enter your name: ".to_string(),
            age: "Enter your age: ".to_string(),
            national_id: "Enter your CPF: ".to_string(),
        }
    }
}

impl Prompts {
    fn for_field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::NationalId => &self.national_id,
        }
    }
}

/// Unrecoverable collection failures.
///
/// Invalid entries are not errors here; they are retried inside the loop.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Reading the input or writing a prompt failed.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The input stream ended before the field was answered.
    #[error("input closed while reading {0}")]
    InputClosed(Field),

    /// The [`RetryPolicy`] budget for a field ran out.
    #[error("gave up reading {field} after {attempts} invalid entries")]
    TooManyAttempts { field: Field, attempts: u32 },

    /// The duplicate check could not be answered.
    #[error("CPF lookup failed: {0}")]
    Lookup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Prompt loop that assembles a valid [`Person`].
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use std::io::Cursor;
/// use cadastro_core::{Collector, Person};
///
/// let taken: HashSet<String> = ["11111111111".to_string()].into();
/// // First CPF is taken, second one is free.
/// let input = Cursor::new("Bob\n25\n111.111.111-11\n22222222222\n");
/// let mut output = Vec::new();
///
/// let person = Collector::new(input, &mut output, &taken).collect().unwrap();
/// assert_eq!(person, Person::new("Bob", 25, "22222222222"));
/// assert!(String::from_utf8(output).unwrap().contains("already registered"));
/// ```
pub struct Collector<R, W, D> {
    input: R,
    output: W,
    lookup: D,
    policy: RetryPolicy,
    prompts: Prompts,
}

impl<R, W, D> Collector<R, W, D>
where
    R: BufRead,
    W: Write,
    D: DuplicateCheck,
{
    /// Creates a collector with unbounded retries and the default prompts.
    pub fn new(input: R, output: W, lookup: D) -> Self {
        Self {
            input,
            output,
            lookup,
            policy: RetryPolicy::default(),
            prompts: Prompts::default(),
        }
    }

    /// Replaces the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the prompt texts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Runs the name, age and CPF loops in order and returns the result.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, end of input, an exhausted [`RetryPolicy`], or a
    /// failed duplicate lookup. Invalid entries never surface here.
    pub fn collect(&mut self) -> crate::Result<Person> {
        let name = self.read_name()?;
        let age = self.read_age()?;
        let national_id = self.read_national_id()?;
        Ok(Person {
            name,
            age,
            national_id,
        })
    }

    /// Asks until a non-blank name is entered; returns it trimmed.
    pub fn read_name(&mut self) -> crate::Result<String> {
        self.prompt_until(Field::Name, |_, line| Ok(validate_name(line)))
    }

    /// Asks until a base-10 unsigned integer is entered.
    pub fn read_age(&mut self) -> crate::Result<u32> {
        self.prompt_until(Field::Age, |_, line| Ok(parse_age(line)))
    }

    /// Asks until an unregistered CPF is entered; returns it normalized.
    pub fn read_national_id(&mut self) -> crate::Result<String> {
        self.prompt_until(Field::NationalId, |lookup, line| {
            let national_id = normalize_cpf(line);
            if national_id.is_empty() {
                return Ok(Err(ValidationError::EmptyNationalId));
            }
            let taken = lookup
                .is_registered(&national_id)
                .map_err(|e| CollectError::Lookup(Box::new(e)))?;
            if taken {
                Ok(Err(ValidationError::DuplicateNationalId(national_id)))
            } else {
                Ok(Ok(national_id))
            }
        })
    }

    fn prompt_until<T, F>(&mut self, field: Field, mut check: F) -> crate::Result<T>
    where
        F: FnMut(&D, &str) -> crate::Result<std::result::Result<T, ValidationError>>,
    {
        let mut failures = 0u32;
        loop {
            write!(self.output, "{}", self.prompts.for_field(field))?;
            self.output.flush()?;

            let Some(raw) = self.read_line()? else {
                return Err(CollectError::InputClosed(field));
            };

            let verdict = match String::from_utf8(raw) {
                Ok(line) => check(&self.lookup, &line)?,
                Err(_) => Err(ValidationError::InvalidEncoding),
            };

            match verdict {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(%field, %err, "rejected entry");
                    writeln!(self.output, "{err}")?;
                    failures = failures.saturating_add(1);
                    if self.policy.is_exhausted(failures) {
                        return Err(CollectError::TooManyAttempts {
                            field,
                            attempts: failures,
                        });
                    }
                }
            }
        }
    }

    /// Reads one line without its terminator, `None` at end of input.
    ///
    /// Bytes are returned undecoded so a line that is not UTF-8 can be
    /// rejected and asked again like any other invalid entry.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}
