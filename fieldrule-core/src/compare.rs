// Bound comparison and pattern matching

use crate::{
    FieldKind, ParsedRule, RuleDefinitionError, RuleKind, Scalar, ScalarKind, ValidationError,
    VerifyError,
};
use once_cell::sync::OnceCell;
use regex::Regex;

/// A rule argument parsed for the kind of value it is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    Int(i64),
    Uint(u64),
    Float(f64),
    Len(usize),
}

/// Parse `argument` as the bound type `kind` calls for.
///
/// Fails if `rule` is not a bound rule for `kind`, or if the argument does
/// not parse: signed integers as `i64`, unsigned integers as `u64`, floats
/// as `f64`, string lengths as `usize`.
pub(crate) fn parse_bound(
    field: &'static str,
    kind: ScalarKind,
    rule: RuleKind,
    argument: &str,
) -> Result<Bound, RuleDefinitionError> {
    if !rule.is_bound() || !FieldKind::Scalar(kind).supports(rule) {
        return Err(RuleDefinitionError::Unsupported { field, rule, kind });
    }

    let invalid = |expected: &'static str| RuleDefinitionError::Argument {
        field,
        rule,
        argument: argument.to_string(),
        expected,
    };

    match kind {
        ScalarKind::Int => argument
            .parse()
            .map(Bound::Int)
            .map_err(|_| invalid("signed 64-bit integer")),
        ScalarKind::Uint => argument
            .parse()
            .map(Bound::Uint)
            .map_err(|_| invalid("unsigned 64-bit integer")),
        ScalarKind::Float => argument
            .parse()
            .map(Bound::Float)
            .map_err(|_| invalid("64-bit float")),
        ScalarKind::Str => argument
            .parse()
            .map(Bound::Len)
            .map_err(|_| invalid("length")),
        ScalarKind::Bool => Err(RuleDefinitionError::Unsupported { field, rule, kind }),
    }
}

/// Check `value` against a bound rule of a field declared as `kind`.
///
/// The bound is parsed for the declared kind; a value of any other kind is
/// a [`RuleDefinitionError::KindMismatch`]. Numbers are ordered against the
/// bound with `<`, `<=`, `>` or `>=`. Strings compare their length in bytes
/// against `minLen`/`maxLen`, so `"é"` has length 2.
pub fn compare(
    field: &'static str,
    kind: ScalarKind,
    value: Scalar<'_>,
    rule: RuleKind,
    parsed: &ParsedRule<'_>,
) -> Result<(), VerifyError> {
    let bound = parse_bound(field, kind, rule, parsed.argument)?;

    let satisfied = match (value, bound) {
        (Scalar::Int(v), Bound::Int(b)) => holds(rule, v, b),
        (Scalar::Uint(v), Bound::Uint(b)) => holds(rule, v, b),
        (Scalar::Float(v), Bound::Float(b)) => holds(rule, v, b),
        (Scalar::Str(s), Bound::Len(b)) => holds(rule, s.len(), b),
        _ => {
            return Err(RuleDefinitionError::KindMismatch {
                field,
                declared: FieldKind::Scalar(kind),
            }
            .into());
        }
    };

    if satisfied {
        Ok(())
    } else {
        Err(ValidationError::new(field, rule, parsed.message).into())
    }
}

fn holds<T: PartialOrd>(rule: RuleKind, value: T, bound: T) -> bool {
    match rule {
        RuleKind::LessThan => value < bound,
        RuleKind::LessOrEqual | RuleKind::MaxLength => value <= bound,
        RuleKind::GreaterThan => value > bound,
        RuleKind::GreaterOrEqual | RuleKind::MinLength => value >= bound,
        RuleKind::Required | RuleKind::Pattern => true,
    }
}

/// Compile a rule pattern so that it must match the whole value.
pub(crate) fn compile_pattern(
    field: &'static str,
    pattern: &str,
) -> Result<Regex, RuleDefinitionError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| RuleDefinitionError::Pattern {
        field,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled expression of one `regx` rule.
///
/// Built by the first check that needs it and shared by every later check
/// of the same rule. A pattern that fails to compile is not stored, so it
/// keeps reporting its error.
#[derive(Debug, Default)]
pub struct PatternCache(OnceCell<Regex>);

impl PatternCache {
    pub const fn new() -> Self {
        Self(OnceCell::new())
    }

    /// The compiled expression, once a check has built it.
    pub fn compiled(&self) -> Option<&Regex> {
        self.0.get()
    }

    pub(crate) fn get_or_compile(
        &self,
        field: &'static str,
        pattern: &str,
    ) -> Result<&Regex, RuleDefinitionError> {
        self.0.get_or_try_init(|| compile_pattern(field, pattern))
    }
}

/// Check `text` against a `regx` rule.
///
/// With a `cache` the expression is compiled once; without one it is
/// compiled on every call.
pub fn matches_pattern(
    field: &'static str,
    text: &str,
    parsed: &ParsedRule<'_>,
    cache: Option<&PatternCache>,
) -> Result<(), VerifyError> {
    let matched = match cache {
        Some(cache) => cache.get_or_compile(field, parsed.argument)?.is_match(text),
        None => compile_pattern(field, parsed.argument)?.is_match(text),
    };
    if matched {
        Ok(())
    } else {
        Err(ValidationError::new(field, RuleKind::Pattern, parsed.message).into())
    }
}
