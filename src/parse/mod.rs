mod grammar;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use winnow::Parser;

use crate::{CompareOp, Value};

/// Split a rule literal of the form `<op> <remainder>` into its operator and
/// trimmed remainder. Returns `None` for anything else, including an operator
/// with nothing after it.
#[must_use]
pub fn operator_literal(input: &str) -> Option<(CompareOp, &str)> {
    grammar::operator_literal.parse(input).ok()
}

/// Whether `input` starts with a `YYYY-MM-DD` shaped prefix.
#[must_use]
pub fn has_date_prefix(input: &str) -> bool {
    let mut rest = input;
    grammar::date_shape(&mut rest).is_ok()
}

/// Parse an ISO-8601 date or date-time. Offsets are applied so the result is
/// in UTC; a missing offset is taken as already UTC.
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let parts = grammar::timestamp.parse(input).ok()?;
    let (year, month, day) = parts.date;
    let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(
        parts.time.hour,
        parts.time.minute,
        parts.time.second,
        parts.time.nano,
    )?;
    match parts.offset {
        None | Some(0) => Some(local),
        Some(offset) => local.checked_sub_signed(TimeDelta::try_seconds(i64::from(offset))?),
    }
}

/// Parse rule text as an integer, falling back to a float.
#[must_use]
pub fn parse_number(input: &str) -> Option<Value> {
    if let Ok(i) = input.parse::<i64>() {
        return Some(Value::Int(i));
    }
    input.parse::<f64>().ok().map(Value::Float)
}
