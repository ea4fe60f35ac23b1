//! Tag-driven field validation for request records
//!
//! A record declares rules on its fields as small metadata strings of the
//! form `argument:message`. [`verify`] walks the fields in declaration
//! order and reports the first violated rule, using the message from the
//! metadata itself as the error text.
//!
//! # Rule tags
//!
//! | Tag        | Fields          | Metadata                          |
//! |------------|-----------------|-----------------------------------|
//! | `required` | all             | `message`                         |
//! | `regx`     | strings         | `pattern\:message`                |
//! | `minLen`   | strings         | `length:message` (bytes)          |
//! | `maxLen`   | strings         | `length:message` (bytes)          |
//! | `lt`/`lte` | numbers         | `bound:message`                   |
//! | `gt`/`gte` | numbers         | `bound:message`                   |
//!
//! Pattern and bound rules on a field that is empty and not `required` are
//! skipped. Strings are empty when zero-length, numbers when zero, `bool`
//! when `false`, and `Option` fields when `None`.
//!
//! # Examples
//!
//! Records normally derive their descriptor table with `#[derive(Verify)]`
//! from the `fieldrule` crate. The table can also be written out:
//!
//! ```
//! use fieldrule_core::{FieldDescriptor, FieldValue, IntoFieldValue, Rule, RuleKind, Verify};
//!
//! struct Person {
//!     age: i64,
//! }
//!
//! fn age(p: &Person) -> FieldValue<'_> {
//!     p.age.field_value()
//! }
//!
//! static FIELDS: [FieldDescriptor<Person>; 1] = [FieldDescriptor {
//!     name: "age",
//!     kind: <i64 as IntoFieldValue>::KIND,
//!     rules: &[
//!         Rule::new(RuleKind::Required, "age is required"),
//!         Rule::new(RuleKind::GreaterOrEqual, "18:must be an adult"),
//!     ],
//!     value: age,
//! }];
//!
//! impl Verify for Person {
//!     fn fields() -> &'static [FieldDescriptor<Self>] {
//!         &FIELDS
//!     }
//! }
//!
//! assert!(Person { age: 30 }.verify().is_ok());
//! assert_eq!(Person { age: 0 }.verify().unwrap_err().to_string(), "age is required");
//! assert_eq!(Person { age: 12 }.verify().unwrap_err().to_string(), "must be an adult");
//! ```

mod audit;
mod compare;
mod errors;
mod kind;
mod pipe;
mod rules;
mod tag;
mod traits;
mod value;

pub use audit::*;
pub use compare::{PatternCache, compare, matches_pattern};
pub use errors::*;
pub use kind::*;
pub use pipe::*;
pub use rules::*;
pub use tag::*;
pub use traits::*;
pub use value::*;
