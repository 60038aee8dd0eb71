//! Parsing of the date strings found in event records
//!
//! The webhook hands out loosely formatted ISO-8601 strings. Rather than failing, parsing produces an [`EventDate`]
//! that every formatter matches on to pick either a rendering or its literal fallback.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Date-time layouts without a UTC offset. These are wall-clock times in the display zone.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-time layouts with an explicit offset, besides RFC 3339
const OFFSET_FORMATS: [&str; 2] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// The outcome of parsing a date field
#[derive(Clone, Debug, PartialEq)]
pub enum EventDate<'a> {
    /// The field is absent or empty
    Missing,
    /// The field is present but is not a date we understand. The raw text is kept for fallbacks.
    Unparsable(&'a str),
    /// A valid date, expressed in the display zone
    At(DateTime<Tz>),
}

impl<'a> EventDate<'a> {
    pub fn parse(raw: Option<&'a str>, zone: Tz) -> Self {
        match raw {
            None => EventDate::Missing,
            Some(s) if s.trim().is_empty() => EventDate::Missing,
            Some(s) => match parse_event_date(s, zone) {
                Some(dt) => EventDate::At(dt),
                None => EventDate::Unparsable(s),
            },
        }
    }

    pub fn instant(&self) -> Option<DateTime<Tz>> {
        match self {
            EventDate::At(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// Parse a date-time string, and express it in `zone`.
///
/// * RFC 3339 strings (with `Z` or an offset) denote an instant
/// * date-times without offset are wall-clock times in `zone`
/// * bare dates (`2024-06-01`) denote midnight UTC
///
/// Returns `None` for anything else, and for local times that do not exist in `zone` (DST gaps).
pub fn parse_event_date(raw: &str, zone: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&zone));
    }
    for format in OFFSET_FORMATS.iter() {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&zone));
        }
    }

    for format in LOCAL_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return zone.from_local_datetime(&naive).earliest();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(&zone));
    }

    None
}
