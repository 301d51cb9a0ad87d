use std::borrow::Cow;

use crate::Value;
use crate::parse::{has_date_prefix, parse_number, parse_timestamp};

/// Interpret a rule literal according to the value it will be compared with.
///
/// Rule authors write literals untyped; the record's actual value decides
/// whether the text is read as a number, a timestamp, or a plain string.
/// Quoted literals (`'NDA'`, `"42"`) are always strings. Anything that fails
/// to parse falls back to the raw text.
#[must_use]
pub fn coerce(lhs: &Value, literal: &str) -> Value {
    coerce_pair(lhs, literal).1
}

/// Like [`coerce`], but also returns the left-hand value to compare.
///
/// Numeric text on the left is promoted to its number only when the literal
/// is numeric too, and date text is promoted to a timestamp only when the
/// literal is a timestamp. Otherwise both sides stay text.
#[must_use]
pub fn coerce_pair<'a>(lhs: &'a Value, literal: &str) -> (Cow<'a, Value>, Value) {
    if let Some(inner) = unquote(literal) {
        return (Cow::Borrowed(lhs), Value::from(inner));
    }
    match lhs {
        Value::Int(_) | Value::Float(_) => (Cow::Borrowed(lhs), number_or_text(literal)),
        Value::Timestamp(_) => (Cow::Borrowed(lhs), timestamp_or_text(literal)),
        Value::Text(text) => {
            if let Some(number) = parse_number(text.trim())
                && let Some(rhs) = parse_number(literal)
            {
                return (Cow::Owned(number), rhs);
            }
            if has_date_prefix(literal) {
                let rhs = timestamp_or_text(literal);
                let lhs = match (&rhs, parse_timestamp(text.trim())) {
                    (Value::Timestamp(_), Some(ts)) => Cow::Owned(Value::Timestamp(ts)),
                    _ => Cow::Borrowed(lhs),
                };
                return (lhs, rhs);
            }
            (Cow::Borrowed(lhs), Value::from(literal))
        }
        _ => (Cow::Borrowed(lhs), Value::from(literal)),
    }
}

fn unquote(literal: &str) -> Option<&str> {
    let first = literal.chars().next()?;
    if literal.len() >= 2 && (first == '\'' || first == '"') && literal.ends_with(first) {
        Some(&literal[1..literal.len() - 1])
    } else {
        None
    }
}

fn number_or_text(literal: &str) -> Value {
    parse_number(literal).unwrap_or_else(|| Value::from(literal))
}

fn timestamp_or_text(literal: &str) -> Value {
    parse_timestamp(literal).map_or_else(|| Value::from(literal), Value::Timestamp)
}
