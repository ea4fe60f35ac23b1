// Record descriptors and the Verify trait

use crate::{FieldKind, FieldValue, PatternCache, RuleKind, VerifyError};
use std::fmt;

/// One rule attached to a field: its kind and its raw metadata.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: RuleKind,
    pub raw: &'static str,

    /// Where a `regx` rule keeps its compiled expression
    pub pattern: Option<&'static PatternCache>,
}

impl Rule {
    /// A rule with no compiled state. A `regx` rule built this way
    /// compiles its expression on every check.
    pub const fn new(kind: RuleKind, raw: &'static str) -> Self {
        Self {
            kind,
            raw,
            pattern: None,
        }
    }

    /// A `regx` rule that compiles its expression once into `cache`.
    pub const fn pattern(raw: &'static str, cache: &'static PatternCache) -> Self {
        Self {
            kind: RuleKind::Pattern,
            raw,
            pattern: Some(cache),
        }
    }
}

/// Static description of one field of a record type.
pub struct FieldDescriptor<R> {
    /// Field name, used in error reports
    pub name: &'static str,

    /// Declared kind of the field
    pub kind: FieldKind,

    /// Rules declared on the field, at most one per kind
    pub rules: &'static [Rule],

    /// Reads the field's current value from a record
    pub value: fn(&R) -> FieldValue<'_>,
}

impl<R> FieldDescriptor<R> {
    /// The first declared rule of the given kind.
    pub fn entry(&self, kind: RuleKind) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| rule.kind == kind)
    }

    /// Raw metadata of the rule of the given kind, if declared.
    pub fn rule(&self, kind: RuleKind) -> Option<&'static str> {
        self.entry(kind).map(|rule| rule.raw)
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// A record type whose fields carry validation rules.
///
/// Usually derived with `#[derive(Verify)]`, which builds the descriptor
/// table once at compile time. It can also be written by hand:
///
/// ```
/// use fieldrule_core::{FieldDescriptor, IntoFieldValue, Rule, RuleKind, Verify};
///
/// struct Signup {
///     name: String,
/// }
///
/// impl Verify for Signup {
///     fn fields() -> &'static [FieldDescriptor<Self>] {
///         fn name(record: &Signup) -> fieldrule_core::FieldValue<'_> {
///             record.name.field_value()
///         }
///
///         static FIELDS: [FieldDescriptor<Signup>; 1] = [FieldDescriptor {
///             name: "name",
///             kind: <String as IntoFieldValue>::KIND,
///             rules: &[Rule::new(RuleKind::Required, "name is required")],
///             value: name,
///         }];
///         &FIELDS
///     }
/// }
///
/// let error = Signup { name: String::new() }.verify().unwrap_err();
/// assert_eq!(error.to_string(), "name is required");
/// ```
pub trait Verify: Sized + 'static {
    /// Fields with rules, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Check every rule, stopping at the first failure.
    fn verify(&self) -> Result<(), VerifyError> {
        crate::verify(self)
    }
}
