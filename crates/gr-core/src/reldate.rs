//! Relative date expressions.
//!
//! A lower time bound can be given as a calendar date (`2024-06-01`), a full
//! RFC 3339 timestamp, or a compact offset from now (`3d`, `2w`, `1y2w3d4h`).
//! Offsets are ordered: years, then weeks, then days, then a trailing flat
//! duration (`h`/`m`/`s`/`ms` segments).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, DurationRound, Months, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::timeago;

/// Errors from parsing a date/offset expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// The expression matched none of the supported formats.
    #[error("unsupported date format: {input:?}")]
    UnsupportedFormat { input: String },
}

impl DateParseError {
    fn unsupported(input: &str) -> Self {
        Self::UnsupportedFormat {
            input: input.to_string(),
        }
    }
}

/// A lower time bound, possibly unset.
///
/// Unset means "no bound at all" and is distinguishable from every real
/// instant, including the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeDate(Option<DateTime<Utc>>);

impl RelativeDate {
    /// The "no lower bound" sentinel.
    pub const UNSET: Self = Self(None);

    /// Wraps a concrete instant.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    /// Returns true when no bound is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the bound, if set.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Parses an expression against the current instant.
    pub fn parse(expression: &str) -> Result<Self, DateParseError> {
        Self::parse_at(expression, Utc::now())
    }

    /// Parses an expression, resolving relative offsets against `now`.
    pub fn parse_at(expression: &str, now: DateTime<Utc>) -> Result<Self, DateParseError> {
        parse_expression(expression, now).map(Self::new)
    }

    /// Returns the bound truncated down to the whole hour (UTC).
    ///
    /// Unset stays unset.
    #[must_use]
    pub fn truncated_to_hour(self) -> Self {
        Self(
            self.0
                .map(|t| t.duration_trunc(Duration::hours(1)).unwrap_or(t)),
        )
    }
}

impl fmt::Display for RelativeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "forever"),
            Some(t) => write!(f, "{} ({})", t.to_rfc3339(), timeago::since(t)),
        }
    }
}

impl FromStr for RelativeDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_expression(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateParseError> {
    // Calendar date only, interpreted at UTC midnight.
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    // Full timestamp with offset.
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    // Composite offset: optional y, w, d segments in that order, then an
    // optional flat duration.
    let (years, rest) = take_segment(input, 'y')?;
    let (weeks, rest) = take_segment(rest, 'w')?;
    let (days, rest) = take_segment(rest, 'd')?;

    let mut resolved = now;
    if let Some(years) = years {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| DateParseError::unsupported(input))?;
        resolved = resolved
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| DateParseError::unsupported(input))?;
    }

    let day_offset = i64::from(weeks.unwrap_or(0)) * 7 + i64::from(days.unwrap_or(0));
    resolved = resolved - Duration::days(day_offset);

    if rest.is_empty() {
        return Ok(resolved);
    }

    let delta = parse_flat_duration(rest).ok_or_else(|| DateParseError::unsupported(input))?;
    Ok(resolved - delta)
}

/// Extracts a leading `<int><unit>` calendar segment.
///
/// Returns `(None, input)` when the unit character does not occur at all.
/// A unit that occurs without a pure integer prefix, or occurs again in the
/// remainder, is a format error.
fn take_segment(input: &str, unit: char) -> Result<(Option<u32>, &str), DateParseError> {
    let Some(position) = input.find(unit) else {
        return Ok((None, input));
    };

    let digits = &input[..position];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateParseError::unsupported(input));
    }
    let value: u32 = digits
        .parse()
        .map_err(|_| DateParseError::unsupported(input))?;

    let rest = &input[position + unit.len_utf8()..];
    if rest.contains(unit) {
        return Err(DateParseError::unsupported(input));
    }

    Ok((Some(value), rest))
}

/// Parses a flat duration of repeated `<int><unit>` segments.
///
/// Units: `h`, `m`, `s`, `ms`. Returns `None` on any malformed or leftover
/// text.
fn parse_flat_duration(input: &str) -> Option<Duration> {
    let mut rest = input;
    let mut total = Duration::zero();

    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
        if digits_end == 0 {
            return None;
        }
        let value: i64 = rest[..digits_end].parse().ok()?;

        let unit_rest = &rest[digits_end..];
        let (consumed, delta) = if let Some(after) = unit_rest.strip_prefix("ms") {
            (after, Duration::milliseconds(value))
        } else if let Some(after) = unit_rest.strip_prefix('h') {
            (after, Duration::hours(value))
        } else if let Some(after) = unit_rest.strip_prefix('m') {
            (after, Duration::minutes(value))
        } else if let Some(after) = unit_rest.strip_prefix('s') {
            (after, Duration::seconds(value))
        } else {
            return None;
        };

        total = total + delta;
        rest = consumed;
    }

    Some(total)
}
