//! Lease Calculator
//!
//! The resource-view API returns the lease window but not the days left on it.

use super::coerce::{optional_timestamp, required_timestamp};
use super::node::LeaseWindow;
use crate::error::ReadResult;
use chrono::{DateTime, SubsecRound, Utc};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Lease of a deployment
///
/// `end` is `None` for a perpetual lease, and so is `days_remaining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lease {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub days_remaining: Option<i64>,
}

impl Lease {
    /// Build the lease of `resource` from its raw window
    pub fn from_window(
        resource: &str,
        window: Option<&LeaseWindow>,
        now: DateTime<Utc>,
    ) -> ReadResult<Self> {
        let start = required_timestamp(
            resource,
            "lease.start",
            window.and_then(|w| w.start.as_deref()),
        )?;
        let end = optional_timestamp(resource, "lease.end", window.and_then(|w| w.end.as_deref()))?;

        Ok(Self {
            start,
            end,
            days_remaining: end.map(|end| days_until(end, now)),
        })
    }

    pub fn is_perpetual(&self) -> bool {
        self.end.is_none()
    }
}

/// Whole days from `now` (at second precision) to `end`, rounded down
///
/// Negative once the lease has expired.
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = end - now.trunc_subsecs(0);
    diff.num_seconds().div_euclid(SECONDS_PER_DAY)
}
