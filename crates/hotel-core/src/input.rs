//! Normalisation of raw caller input.
//!
//! The browser form submits every field as a string, often empty. A value
//! that is absent or blank after trimming counts as missing.

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{Error, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
];

/// Trimmed value, or `None` when absent or blank.
pub fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

pub fn required(field: &'static str, value: Option<String>) -> Result<String> {
  optional(value).ok_or(Error::MissingField(field))
}

/// Years with exactly four digits. Anything outside has no RFC 3339 form.
const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

fn invalid(field: &'static str, value: &str) -> Error {
  Error::InvalidDate { field, value: value.to_owned() }
}

/// Parse a calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .ok()
    .filter(|d| YEARS.contains(&d.year()))
    .ok_or_else(|| invalid(field, value))
}

/// Parse a point in time.
///
/// Accepts RFC 3339, a naive date-time (read as UTC) or a bare date (midnight
/// UTC).
pub fn parse_timestamp(
  field: &'static str,
  value: &str,
) -> Result<DateTime<Utc>> {
  let parsed = DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
    .or_else(|| {
      NAIVE_DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
          .ok()
          .map(|naive| naive.and_utc())
      })
    });
  match parsed {
    // Checked after the shift to UTC, which can cross a year boundary.
    Some(dt) if YEARS.contains(&dt.year()) => Ok(dt),
    Some(_) => Err(invalid(field, value)),
    None => {
      parse_date(field, value).map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }
  }
}
