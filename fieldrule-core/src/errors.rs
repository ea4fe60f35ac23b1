// Validation and rule definition errors

use crate::{FieldKind, RuleKind, ScalarKind};
use thiserror::Error;

/// A rule was declared incorrectly.
///
/// These are programming errors in the record's metadata, not bad input.
/// They surface the first time the broken rule is evaluated, or up front
/// through [`audit`](crate::audit).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleDefinitionError {
    #[error("malformed rule metadata `{raw}`: expected exactly one `:` or `\\:` separator")]
    Format { raw: String },

    #[error("field `{field}`: `{rule}` argument `{argument}` is not a valid {expected}")]
    Argument {
        field: &'static str,
        rule: RuleKind,
        argument: String,
        expected: &'static str,
    },

    #[error("field `{field}`: invalid pattern `{pattern}`: {reason}")]
    Pattern {
        field: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("field `{field}`: rule `{rule}` is not supported on {kind} fields")]
    Unsupported {
        field: &'static str,
        rule: RuleKind,
        kind: ScalarKind,
    },

    #[error("field `{field}`: declares `{rule}` more than once")]
    Duplicate { field: &'static str, rule: RuleKind },

    #[error("field `{field}`: value read from the record does not match its declared kind ({declared})")]
    KindMismatch {
        field: &'static str,
        declared: FieldKind,
    },
}

impl RuleDefinitionError {
    /// Field the broken rule belongs to, when known.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RuleDefinitionError::Format { .. } => None,
            RuleDefinitionError::Argument { field, .. }
            | RuleDefinitionError::Pattern { field, .. }
            | RuleDefinitionError::Unsupported { field, .. }
            | RuleDefinitionError::Duplicate { field, .. }
            | RuleDefinitionError::KindMismatch { field, .. } => Some(*field),
        }
    }
}

/// A field value failed one of its rules.
///
/// Displays as exactly the message authored in the rule's metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Field that failed validation
    pub field: &'static str,

    /// Rule that was violated
    pub rule: RuleKind,

    /// Message taken from the rule metadata
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// Outcome of a failed [`verify`](crate::verify) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Definition(#[from] RuleDefinitionError),
}

impl VerifyError {
    /// Whether this is a metadata mistake rather than a data failure.
    pub fn is_definition(&self) -> bool {
        matches!(self, VerifyError::Definition(_))
    }

    /// The violation, if the data failed a rule.
    pub fn violation(&self) -> Option<&ValidationError> {
        match self {
            VerifyError::Invalid(error) => Some(error),
            VerifyError::Definition(_) => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            VerifyError::Invalid(error) => Some(error.field),
            VerifyError::Definition(error) => error.field(),
        }
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            VerifyError::Invalid(error) => serde_json::json!({
                "field": error.field,
                "rule": error.rule.tag(),
                "message": error.message,
            }),
            VerifyError::Definition(error) => serde_json::json!({
                "field": error.field(),
                "rule": null,
                "message": error.to_string(),
            }),
        }
    }
}
