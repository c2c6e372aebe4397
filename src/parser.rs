//! Tokenizer and classifier for event log text.
//!
//! Log lines follow this general format:
//! ```text
//! TIMESTAMP TYPE DETAIL DETAIL ...
//! ```
//!
//! Example:
//! ```text
//! 10:00 DAMAGE player1 50
//! ```
//!
//! Parsing is total: every non-blank line becomes an [`Event`], however
//! malformed. Fields are separated by the single space character only, so
//! runs of spaces yield empty fields and tabs stay inside a field.

use nom::{
    IResult, Parser,
    character::complete::{digit1, multispace0, one_of},
    combinator::{map_res, opt, recognize},
    sequence::preceded,
};
use serde::Serialize;
use tracing::debug;

use crate::event::Event;

/// Counters describing one pass over raw log text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// Lines seen, blank or not.
    pub lines: usize,

    /// Lines dropped because they were empty after trimming.
    pub blank_lines: usize,

    /// Events produced (one per non-blank line).
    pub events: usize,

    /// Bytes of raw input processed.
    pub bytes_processed: usize,
}

/// Check if a line carries no event.
#[inline]
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a line into fields on the space character.
///
/// Runs of spaces are not merged: `"a  b"` yields `["a", "", "b"]`.
/// Always yields at least one field.
#[inline]
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

/// Split raw text into the field lists of its non-blank lines.
///
/// Line breaks are `\n` or `\r\n`. The split is applied to the line as
/// given; trimming is only used to recognize blank lines.
pub fn tokenize(raw: &str) -> Vec<Vec<&str>> {
    raw.lines()
        .filter(|line| !is_blank_line(line))
        .map(split_fields)
        .collect()
}

/// Build an event from the fields of one line.
///
/// Missing timestamp or type fields become empty strings.
pub fn classify(tokens: &[&str]) -> Event {
    let mut fields = tokens.iter();
    let timestamp = fields.next().copied().unwrap_or_default();
    let event_type = fields.next().copied().unwrap_or_default();

    Event {
        timestamp: timestamp.to_string(),
        event_type: event_type.to_string(),
        details: fields.map(|s| s.to_string()).collect(),
    }
}

/// Parse a single line, returning `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Event> {
    if is_blank_line(line) {
        return None;
    }
    Some(classify(&split_fields(line)))
}

/// Parse raw log text into events, in input order.
///
/// # Example
///
/// ```
/// use event_log_parser::parser::parse_log;
///
/// let events = parse_log("10:00 DAMAGE player1 50\n\n10:01 HEAL player1 20");
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[1].event_type, "HEAL");
/// ```
pub fn parse_log(raw: &str) -> Vec<Event> {
    tokenize(raw).iter().map(|tokens| classify(tokens)).collect()
}

/// Parse raw log text, also reporting line and byte counters.
pub fn parse_log_with_report(raw: &str) -> (Vec<Event>, ParseReport) {
    let mut report = ParseReport {
        bytes_processed: raw.len(),
        ..Default::default()
    };
    let mut events = Vec::new();

    for line in raw.lines() {
        report.lines += 1;
        match parse_line(line) {
            Some(event) => events.push(event),
            None => report.blank_lines += 1,
        }
    }
    report.events = events.len();

    debug!(
        "Parsed {} events from {} lines ({} blank, {} bytes)",
        report.events, report.lines, report.blank_lines, report.bytes_processed
    );

    (events, report)
}

/// Parse a base-10 integer with an optional leading sign.
fn parse_signed_integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize((opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>()
    })
    .parse(input)
}

/// Parse the leading integer of a token as a damage amount.
///
/// Leading whitespace is skipped and the longest `[+-]?[0-9]+` prefix is
/// read, so `"50hp"` yields 50 and `"12.5"` yields 12. Tokens without a
/// leading integer, or whose integer does not fit in an `i64`, yield `None`.
pub fn parse_damage_amount(token: &str) -> Option<i64> {
    preceded(multispace0, parse_signed_integer)
        .parse(token)
        .ok()
        .map(|(_, amount)| amount)
}
