//! Type cell classification.
//!
//! A type cell is tested against an ordered list of prefix patterns and the
//! first match wins. The order is part of the contract: `TIMESTAMP` must be
//! tried before `TIME`, `DATE` before `TIME`, and so on.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::schema::TypeTag;

/// A classification rule: the tag it yields and the pattern recognising it.
///
/// When the pattern has a capture group, the group holds the column length.
struct TypeRule {
    tag: TypeTag,
    pattern: Regex,
}

static TYPE_RULES: LazyLock<Vec<TypeRule>> = LazyLock::new(|| {
    [
        (TypeTag::Char, r"^CHAR\((.+?)\)"),
        (TypeTag::Varchar, r"^VARCHAR\((.+?)\)"),
        (TypeTag::Timestamp, r"^TIMESTAMP"),
        (TypeTag::Int, r"^INT"),
        (TypeTag::Real, r"^REAL"),
        (TypeTag::Date, r"^DATE"),
        (TypeTag::Time, r"^TIME"),
        // Size qualifiers are ignored; CLOB is emitted at the dialect default.
        (TypeTag::Clob, r"^CLOB"),
        (TypeTag::Blob, r"^BLOB"),
    ]
    .into_iter()
    .map(|(tag, pattern)| TypeRule {
        tag,
        pattern: Regex::new(pattern).expect("Hardcode type pattern"),
    })
    .collect()
});

/// Returns the tags in the order their patterns are tried.
pub fn rule_order() -> impl Iterator<Item = TypeTag> {
    TYPE_RULES.iter().map(|rule| rule.tag)
}

/// Classifies a type cell into a tag and length.
///
/// Returns `None` when no pattern matches, or when the first matching pattern
/// captures a length that is not a non-negative integer. Lengths too large
/// for `u64` saturate, so they still promote to text.
#[must_use]
pub fn classify_type(value: &str) -> Option<(TypeTag, u64)> {
    let rule = TYPE_RULES.iter().find(|rule| rule.pattern.is_match(value))?;
    let length = match rule.pattern.captures(value)?.get(1) {
        Some(group) => parse_length(group.as_str().trim())?,
        None => 0,
    };
    Some((rule.tag, length))
}

fn parse_length(digits: &str) -> Option<u64> {
    match digits.parse::<u64>() {
        Ok(length) => Some(length),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// Classifies the type cell of a row, naming the row on failure.
///
/// # Errors
///
/// Returns [`SchemaError::UnclassifiableType`] when [`classify_type`] fails.
pub fn classify(sheet: &str, column: &str, value: &str) -> Result<(TypeTag, u64)> {
    classify_type(value).ok_or_else(|| SchemaError::UnclassifiableType {
        sheet: sheet.to_string(),
        column: column.to_string(),
        value: value.to_string(),
    })
}
