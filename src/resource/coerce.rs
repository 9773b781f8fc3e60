//! Field Coercion
//!
//! Turns the textual timestamps of the API into typed values.

use crate::error::{ReadError, ReadResult};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Parse an API timestamp
///
/// Accepts RFC 3339 (`2023-01-15T10:30:00.000Z`) and offset-less ISO 8601,
/// which vRA emits for some resources and which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Coerce an optional timestamp field
///
/// Absent or blank stays `None`; present but unparsable is malformed data.
pub fn optional_timestamp(
    resource: &str,
    field: &str,
    raw: Option<&str>,
) -> ReadResult<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(s).map(Some).ok_or_else(|| {
            ReadError::malformed(resource, format!("{field} is not a timestamp: {s:?}"))
        }),
    }
}

/// Coerce a timestamp field that must be present
pub fn required_timestamp(
    resource: &str,
    field: &str,
    raw: Option<&str>,
) -> ReadResult<DateTime<Utc>> {
    optional_timestamp(resource, field, raw)?
        .ok_or_else(|| ReadError::malformed(resource, format!("{field} is missing")))
}

/// Current time at RFC 3339 precision (whole seconds)
pub fn now_rfc3339() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
