// Up-front checking of rule definitions

use crate::compare::{compile_pattern, parse_bound};
use crate::{RuleDefinitionError, RuleKind, Verify, split};

/// Check every rule declared on `R` without needing an instance.
///
/// [`verify`](crate::verify) only reports a broken rule when it reaches it,
/// and bound arguments are only parsed for non-empty values. `audit` splits
/// every rule's metadata, parses every bound for its field's kind, compiles
/// every pattern and rejects unsupported kind/rule pairs and repeated rule
/// kinds, collecting all problems. Call it from a test for each record type.
///
/// Accessors are never called, so a hand-written accessor that returns a
/// different kind than its field declares is only caught by `verify`.
/// Patterns compiled here are kept in the rule's [`PatternCache`](crate::PatternCache).
///
/// ```
/// use fieldrule_core::{FieldDescriptor, FieldValue, IntoFieldValue, Rule, RuleKind, Verify, audit};
///
/// struct Query {
///     limit: u32,
/// }
///
/// fn limit(q: &Query) -> FieldValue<'_> {
///     q.limit.field_value()
/// }
///
/// static FIELDS: [FieldDescriptor<Query>; 1] = [FieldDescriptor {
///     name: "limit",
///     kind: <u32 as IntoFieldValue>::KIND,
///     rules: &[Rule::new(RuleKind::LessOrEqual, "one hundred:limit too large")],
///     value: limit,
/// }];
///
/// impl Verify for Query {
///     fn fields() -> &'static [FieldDescriptor<Self>] {
///         &FIELDS
///     }
/// }
///
/// let errors = audit::<Query>().unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
pub fn audit<R: Verify>() -> Result<(), Vec<RuleDefinitionError>> {
    let mut errors = Vec::new();

    for field in R::fields() {
        for (index, rule) in field.rules.iter().enumerate() {
            let kind = field.kind.scalar();
            if field.rules[..index].iter().any(|earlier| earlier.kind == rule.kind) {
                errors.push(RuleDefinitionError::Duplicate {
                    field: field.name,
                    rule: rule.kind,
                });
                continue;
            }
            if !field.kind.supports(rule.kind) {
                errors.push(RuleDefinitionError::Unsupported {
                    field: field.name,
                    rule: rule.kind,
                    kind,
                });
                continue;
            }
            if rule.kind == RuleKind::Required {
                continue;
            }

            let parsed = match split(rule.raw) {
                Ok(parsed) => parsed,
                Err(error) => {
                    errors.push(error);
                    continue;
                }
            };

            let checked = if rule.kind == RuleKind::Pattern {
                match rule.pattern {
                    Some(cache) => cache.get_or_compile(field.name, parsed.argument).map(|_| ()),
                    None => compile_pattern(field.name, parsed.argument).map(|_| ()),
                }
            } else {
                parse_bound(field.name, kind, rule.kind, parsed.argument).map(|_| ())
            };
            if let Err(error) = checked {
                errors.push(error);
            }
        }
    }

    if errors.is_empty() {
        tracing::trace!(fields = R::fields().len(), "rule definitions audited");
        Ok(())
    } else {
        Err(errors)
    }
}
