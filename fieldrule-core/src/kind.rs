// Rule and field kinds

use std::fmt;

/// Tag marking a field as mandatory. Its metadata is the message itself.
pub const TAG_REQUIRED: &str = "required";
/// Tag for a regular-expression rule.
pub const TAG_PATTERN: &str = "regx";
/// Tag for a maximum string length rule.
pub const TAG_MAX_LEN: &str = "maxLen";
/// Tag for a minimum string length rule.
pub const TAG_MIN_LEN: &str = "minLen";
/// Tag for a strict upper bound.
pub const TAG_LT: &str = "lt";
/// Tag for an inclusive upper bound.
pub const TAG_LTE: &str = "lte";
/// Tag for a strict lower bound.
pub const TAG_GT: &str = "gt";
/// Tag for an inclusive lower bound.
pub const TAG_GTE: &str = "gte";

/// The kinds of rule a field may declare, at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    Pattern,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    MinLength,
    MaxLength,
}

impl RuleKind {
    /// Every rule kind, in evaluation order.
    pub const ALL: [RuleKind; 8] = [
        RuleKind::Required,
        RuleKind::Pattern,
        RuleKind::LessThan,
        RuleKind::LessOrEqual,
        RuleKind::GreaterThan,
        RuleKind::GreaterOrEqual,
        RuleKind::MinLength,
        RuleKind::MaxLength,
    ];

    /// Bound rules, in the order the engine applies them after `Pattern`.
    pub const BOUNDS: [RuleKind; 6] = [
        RuleKind::LessThan,
        RuleKind::LessOrEqual,
        RuleKind::GreaterThan,
        RuleKind::GreaterOrEqual,
        RuleKind::MinLength,
        RuleKind::MaxLength,
    ];

    /// Metadata tag used to declare this rule.
    pub const fn tag(self) -> &'static str {
        match self {
            RuleKind::Required => TAG_REQUIRED,
            RuleKind::Pattern => TAG_PATTERN,
            RuleKind::LessThan => TAG_LT,
            RuleKind::LessOrEqual => TAG_LTE,
            RuleKind::GreaterThan => TAG_GT,
            RuleKind::GreaterOrEqual => TAG_GTE,
            RuleKind::MinLength => TAG_MIN_LEN,
            RuleKind::MaxLength => TAG_MAX_LEN,
        }
    }

    /// Look up a rule kind by its metadata tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether the rule carries a bound argument compared against the value.
    pub const fn is_bound(self) -> bool {
        !matches!(self, RuleKind::Required | RuleKind::Pattern)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind of a plain (non-optional) field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Str,
    Bool,
    Int,
    Uint,
    Float,
}

impl ScalarKind {
    pub const fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Uint | ScalarKind::Float)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Str => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "signed integer",
            ScalarKind::Uint => "unsigned integer",
            ScalarKind::Float => "float",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared kind of a record field.
///
/// `Optional` distinguishes "absent" from "present but zero", which matters
/// for types such as tri-state flags where `false` or `0` is a legitimate
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Optional(ScalarKind),
}

impl FieldKind {
    /// The kind of the value once any optional wrapper is looked through.
    pub const fn scalar(self) -> ScalarKind {
        match self {
            FieldKind::Scalar(kind) | FieldKind::Optional(kind) => kind,
        }
    }

    pub const fn is_optional(self) -> bool {
        matches!(self, FieldKind::Optional(_))
    }

    /// Whether `rule` may be attached to a field of this kind.
    ///
    /// Patterns and length bounds apply to strings, ordering bounds to
    /// numbers, and `Required` to everything.
    pub const fn supports(self, rule: RuleKind) -> bool {
        let scalar = self.scalar();
        match rule {
            RuleKind::Required => true,
            RuleKind::Pattern | RuleKind::MinLength | RuleKind::MaxLength => {
                matches!(scalar, ScalarKind::Str)
            }
            RuleKind::LessThan
            | RuleKind::LessOrEqual
            | RuleKind::GreaterThan
            | RuleKind::GreaterOrEqual => scalar.is_numeric(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => write!(f, "{}", kind),
            FieldKind::Optional(kind) => write!(f, "optional {}", kind),
        }
    }
}
