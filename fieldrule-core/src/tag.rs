// Rule metadata splitting

use crate::RuleDefinitionError;

/// Separator between a rule's argument and its message.
pub const DELIMITER: &str = ":";

/// Separator used when the argument itself contains `:`, e.g. in a pattern.
pub const ESCAPED_DELIMITER: &str = "\\:";

/// A rule's metadata split into its argument and its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRule<'a> {
    pub argument: &'a str,
    pub message: &'a str,
}

/// Split raw rule metadata into `(argument, message)`.
///
/// The metadata must contain exactly one `:`. If it does not, it must
/// contain exactly one `\:` instead, which lets patterns carry their own
/// colons:
///
/// ```
/// use fieldrule_core::split;
///
/// let rule = split("5:name is too short").unwrap();
/// assert_eq!(rule.argument, "5");
/// assert_eq!(rule.message, "name is too short");
///
/// let rule = split(r"^hello:\d{3,5}$\:bad greeting").unwrap();
/// assert_eq!(rule.argument, r"^hello:\d{3,5}$");
/// assert_eq!(rule.message, "bad greeting");
/// ```
pub fn split(raw: &str) -> Result<ParsedRule<'_>, RuleDefinitionError> {
    split_exactly_once(raw, DELIMITER)
        .or_else(|| split_exactly_once(raw, ESCAPED_DELIMITER))
        .ok_or_else(|| RuleDefinitionError::Format {
            raw: raw.to_string(),
        })
}

fn split_exactly_once<'a>(raw: &'a str, delimiter: &str) -> Option<ParsedRule<'a>> {
    let (argument, message) = raw.split_once(delimiter)?;
    if message.contains(delimiter) {
        return None;
    }
    Some(ParsedRule { argument, message })
}
