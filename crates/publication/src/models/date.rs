//! Publication date normalization.
//!
//! Manifests carry dates in whatever precision the publisher had to hand:
//! a full RFC 3339 timestamp, a calendar date, a year and month, or just a
//! year. Views want one shape, so everything is resolved to a UTC instant
//! (missing parts default to the start of the period).

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parses a manifest date into a UTC instant.
pub(crate) fn parse(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(instant.to_offset(UtcOffset::UTC));
    }
    if let Ok(local) = PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")) {
        return Some(local.assume_utc());
    }
    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }
    let mut parts = value.splitn(2, '-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(month) if month.len() == 2 => Month::try_from(month.parse::<u8>().ok()?).ok()?,
        Some(_) => return None,
        None => Month::January,
    };
    Some(Date::from_calendar_date(year, month, 1).ok()?.midnight().assume_utc())
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub(crate) fn format(instant: OffsetDateTime) -> Option<String> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"))
        .ok()
}
