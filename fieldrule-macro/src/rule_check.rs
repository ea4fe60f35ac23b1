//! Compile-time rule metadata checks
//!
//! Catches metadata that can never split into an argument and a message:
//! - No `:` and no `\:` at all
//! - Several `:` without exactly one `\:` to fall back on
//! - Several `\:`

use proc_macro2::Span;
use syn::Error;

/// Rule names accepted in `#[rule(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleName {
    Required,
    Pattern,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    MinLength,
    MaxLength,
}

impl RuleName {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "required" => Some(RuleName::Required),
            "regx" => Some(RuleName::Pattern),
            "lt" => Some(RuleName::LessThan),
            "lte" => Some(RuleName::LessOrEqual),
            "gt" => Some(RuleName::GreaterThan),
            "gte" => Some(RuleName::GreaterOrEqual),
            "min_len" | "minLen" => Some(RuleName::MinLength),
            "max_len" | "maxLen" => Some(RuleName::MaxLength),
            _ => None,
        }
    }

    /// Name of the matching `RuleKind` variant.
    pub fn variant(self) -> &'static str {
        match self {
            RuleName::Required => "Required",
            RuleName::Pattern => "Pattern",
            RuleName::LessThan => "LessThan",
            RuleName::LessOrEqual => "LessOrEqual",
            RuleName::GreaterThan => "GreaterThan",
            RuleName::GreaterOrEqual => "GreaterOrEqual",
            RuleName::MinLength => "MinLength",
            RuleName::MaxLength => "MaxLength",
        }
    }

    /// Tag as written in rule metadata and error messages.
    pub fn tag(self) -> &'static str {
        match self {
            RuleName::Required => "required",
            RuleName::Pattern => "regx",
            RuleName::LessThan => "lt",
            RuleName::LessOrEqual => "lte",
            RuleName::GreaterThan => "gt",
            RuleName::GreaterOrEqual => "gte",
            RuleName::MinLength => "minLen",
            RuleName::MaxLength => "maxLen",
        }
    }
}

pub const EXPECTED_KEYS: &str = "required, regx, min_len, max_len, lt, lte, gt, gte";

/// Validate a rule's metadata at compile time.
///
/// `required` takes the message verbatim, so any text is accepted.
pub fn check_metadata(rule: RuleName, raw: &str, span: Span) -> Result<(), Error> {
    if rule == RuleName::Required || splits(raw) {
        return Ok(());
    }

    let hint = if rule == RuleName::Pattern {
        "hint: separate a pattern from its message with `\\\\:`, e.g. \"^a:b$\\\\:message\""
    } else {
        "hint: write the argument and the message as \"argument:message\""
    };

    Err(Error::new(
        span,
        format!(
            "`{}` metadata \"{}\" needs exactly one `:` or exactly one `\\:` separator\n{}",
            rule.tag(),
            raw,
            hint
        ),
    ))
}

fn splits(raw: &str) -> bool {
    raw.matches(':').count() == 1 || raw.matches("\\:").count() == 1
}
