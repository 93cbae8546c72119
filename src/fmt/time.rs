//! ISO-8601 timestamps with millisecond precision.

use chrono::{DateTime, Offset, TimeZone};

/// `2024-05-01T13:04:05.123+0200`, or a trailing `Z` when the offset is zero.
#[must_use]
pub fn iso8601<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let base = time.format("%Y-%m-%dT%H:%M:%S%.3f");
    if time.offset().fix().local_minus_utc() == 0 {
        format!("{base}Z")
    } else {
        format!("{base}{}", time.format("%z"))
    }
}
