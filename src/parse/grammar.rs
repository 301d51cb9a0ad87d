use winnow::combinator::{alt, opt, preceded};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, rest, take_while};

use crate::CompareOp;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

// -- Operator literals ------------------------------------------------------

pub(super) fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        "<=".value(CompareOp::Lte),
        ">=".value(CompareOp::Gte),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
        "<".value(CompareOp::Lt),
        ">".value(CompareOp::Gt),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "comparison operator",
    )))
    .parse_next(input)
}

/// `<ws>? <op> <ws>? <remainder>` where the trimmed remainder is non-empty and
/// stays on one line.
pub(super) fn operator_literal<'i>(input: &mut &'i str) -> ModalResult<(CompareOp, &'i str)> {
    preceded(ws, (compare_op, preceded(ws, rest)))
        .verify_map(|(op, remainder): (CompareOp, &'i str)| {
            let remainder = remainder.trim();
            (!remainder.is_empty() && !remainder.contains('\n')).then_some((op, remainder))
        })
        .parse_next(input)
}

// -- Dates and times --------------------------------------------------------

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn year(input: &mut &str) -> ModalResult<i32> {
    take_while(4, is_digit)
        .try_map(|s: &str| s.parse::<i32>())
        .parse_next(input)
}

fn two_digits(input: &mut &str) -> ModalResult<u32> {
    take_while(2, is_digit)
        .try_map(|s: &str| s.parse::<u32>())
        .parse_next(input)
}

/// Just the `YYYY-MM-DD` shape, without checking the calendar.
pub(super) fn date_shape(input: &mut &str) -> ModalResult<()> {
    (
        take_while(4, is_digit),
        '-',
        take_while(2, is_digit),
        '-',
        take_while(2, is_digit),
    )
        .void()
        .parse_next(input)
}

/// Fractional seconds, scaled to nanoseconds.
fn fraction(input: &mut &str) -> ModalResult<u32> {
    take_while(1..=9, is_digit)
        .try_map(|s: &str| format!("{s:0<9}").parse::<u32>())
        .parse_next(input)
}

/// Offset from UTC in seconds.
fn utc_offset(input: &mut &str) -> ModalResult<i32> {
    alt((
        'Z'.value(0),
        (one_of(['+', '-']), two_digits, opt(':'), two_digits).map(
            |(sign, hours, _, minutes): (char, u32, Option<char>, u32)| {
                let seconds = i32::try_from(hours * 3600 + minutes * 60).unwrap_or(i32::MAX);
                if sign == '-' { -seconds } else { seconds }
            },
        ),
    ))
    .parse_next(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct TimeParts {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nano: u32,
}

fn time(input: &mut &str) -> ModalResult<TimeParts> {
    let (hour, _, minute) = (two_digits, ':', two_digits).parse_next(input)?;
    let seconds = opt(preceded(
        ':',
        (two_digits, opt(preceded(one_of(['.', ',']), fraction))),
    ))
    .parse_next(input)?;
    let (second, nano) = seconds.map_or((0, 0), |(s, n)| (s, n.unwrap_or(0)));
    Ok(TimeParts {
        hour,
        minute,
        second,
        nano,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TimestampParts {
    pub date: (i32, u32, u32),
    pub time: TimeParts,
    pub offset: Option<i32>,
}

/// `YYYY-MM-DD[(T| )HH:MM[:SS[.frac]][Z|±HH[:]MM]]`
pub(super) fn timestamp(input: &mut &str) -> ModalResult<TimestampParts> {
    let (y, _, m, _, d) = (year, '-', two_digits, '-', two_digits).parse_next(input)?;
    let clock = opt(preceded(one_of(['T', ' ']), (time, opt(utc_offset)))).parse_next(input)?;
    let (time, offset) = clock.unwrap_or_default();
    Ok(TimestampParts {
        date: (y, m, d),
        time,
        offset,
    })
}
