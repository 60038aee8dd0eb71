//! Display strings derived from event records
//!
//! Every function here is total: bad or missing input yields a literal fallback string, never an error or a panic.
//! Output is always US English, rendered on the wall clock of the display zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AttributionPolicy;
use crate::event::{EventRecord, FULL_DAY_MARKER};

pub mod date;
pub use date::EventDate;
mod detail;
pub use detail::{EventDetail, EventRow};

pub const UNTITLED_EVENT: &str = "Untitled Event";
pub const NO_DESCRIPTION: &str = "No description available";
pub const DEFAULT_CATEGORY: &str = "Event";
pub const NO_LOCATION: &str = "Location not specified";
pub const NO_DATE: &str = "No date";
pub const NO_DATE_RANGE: &str = "Date not available";
pub const NO_DATE_BOX: &str = "N/A";
pub const UNKNOWN_PERSON: &str = "Unknown";

const MAPS_SEARCH_URL: &str = "https://maps.google.com/maps?q=";

/// `Saturday, June 1, 2024`
const LONG_DATE: &str = "%A, %B %-d, %Y";
/// `Saturday, June 1, 2024 at 9:00 AM`
const LONG_DATE_TIME: &str = "%A, %B %-d, %Y at %-I:%M %p";
/// `11:00 AM`
const TIME_ONLY: &str = "%-I:%M %p";
/// `Jun 1, 2024, 9:00 AM`
const SHORT_TIMESTAMP: &str = "%b %-d, %Y, %-I:%M %p";

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));


/// The title, or `"Untitled Event"`
pub fn event_title(event: &EventRecord) -> &str {
    event.title().unwrap_or(UNTITLED_EVENT)
}

/// The category, or `"Event"`
pub fn event_category(event: &EventRecord) -> &str {
    event.category().unwrap_or(DEFAULT_CATEGORY)
}

/// A short label for list views: `in 3 hours`, `in 2 days`, or `DD/MM/YYYY` for events that are past or more than a week away
pub fn relative_event_label(start: Option<&str>, zone: Tz, now: DateTime<Utc>) -> String {
    let start = match EventDate::parse(start, zone) {
        EventDate::Missing => return NO_DATE.to_string(),
        EventDate::Unparsable(raw) => return raw.to_string(),
        EventDate::At(dt) => dt,
    };

    let diff_ms = start.timestamp_millis() - now.timestamp_millis();
    let diff_hours = diff_ms.div_euclid(MS_PER_HOUR);
    let diff_days = diff_ms.div_euclid(MS_PER_DAY);

    if diff_ms > 0 && diff_days < 7 {
        if diff_hours < 24 {
            return match diff_hours {
                1 => "in 1 hour".to_string(),
                n => format!("in {} hours", n),
            };
        }
        return match diff_days {
            1 => "in 1 day".to_string(),
            n => format!("in {} days", n),
        };
    }

    start.format("%d/%m/%Y").to_string()
}

/// [`relative_event_label`] against the current time
pub fn relative_event_label_now(start: Option<&str>, zone: Tz) -> String {
    relative_event_label(start, zone, Utc::now())
}

/// The content of the small calendar-page box: `JUN 01`
pub fn date_box_label(start: Option<&str>, zone: Tz) -> String {
    match EventDate::parse(start, zone) {
        EventDate::At(dt) => dt.format("%b %d").to_string().to_uppercase(),
        _ => NO_DATE_BOX.to_string(),
    }
}

/// The complete date (and time, unless this is a full-day event) of an event.
///
/// `full_day` is the raw `FullDayEvent` field: only the exact string `"TRUE"` marks a full-day event.
pub fn full_date_time_label(start: Option<&str>, end: Option<&str>, full_day: Option<&str>, zone: Tz) -> String {
    let (raw_start, raw_end) = (start, end);
    let (start, end) = match (EventDate::parse(start, zone), EventDate::parse(end, zone)) {
        (EventDate::Missing, _) | (_, EventDate::Missing) => return NO_DATE_RANGE.to_string(),
        (EventDate::At(start), EventDate::At(end)) => (start, end),
        _ => return format!("{} to {}", raw_start.unwrap_or_default(), raw_end.unwrap_or_default()),
    };

    if full_day == Some(FULL_DAY_MARKER) {
        return start.format(LONG_DATE).to_string();
    }

    let start_label = start.format(LONG_DATE_TIME);
    if start.date_naive() == end.date_naive() {
        format!("{} - {}", start_label, end.format(TIME_ONLY))
    } else {
        format!("{} to {}", start_label, end.format(LONG_DATE_TIME))
    }
}

/// The non-empty address components, joined with `", "`, or `"Location not specified"`
pub fn location_label(event: &EventRecord) -> String {
    let parts = event.address_parts();
    if parts.is_empty() {
        NO_LOCATION.to_string()
    } else {
        parts.join(", ")
    }
}

/// Whether the event has at least one address component. Location-dependent actions (such as a map link) require this.
pub fn has_valid_location(event: &EventRecord) -> bool {
    !event.address_parts().is_empty()
}

/// A map search URL for the event location, if it has one
pub fn map_link(event: &EventRecord) -> Option<String> {
    if !has_valid_location(event) {
        return None;
    }
    let location = location_label(event);
    Some(format!("{}{}", MAPS_SEARCH_URL, urlencoding::encode(&location)))
}

/// Whether the event started strictly before `now`. Events without a valid start date are never past.
pub fn is_past_event(event: &EventRecord, zone: Tz, now: DateTime<Utc>) -> bool {
    match EventDate::parse(event.event_start_date(), zone) {
        EventDate::At(start) => start.timestamp_millis() < now.timestamp_millis(),
        _ => false,
    }
}

/// Remove every `<...>` tag. Entities are left as they are.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// "Created by" and "Last modified by" lines
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribution {
    pub created: String,
    /// `None` when the policy hides it
    pub modified: Option<String>,
}

pub fn attribution_labels(
    author: Option<&str>, created: Option<&str>,
    editor: Option<&str>, modified: Option<&str>,
    zone: Tz, policy: AttributionPolicy,
) -> Attribution {
    let created_label = format!("Created by {} at {}", author.unwrap_or(UNKNOWN_PERSON), timestamp_label(created, zone));

    let show_modified = match policy {
        AttributionPolicy::AlwaysShowModified => true,
        AttributionPolicy::OnlyWhenEditorDiffers => author != editor,
    };
    let modified_label = if show_modified {
        Some(format!("Last modified by {} at {}", editor.unwrap_or(UNKNOWN_PERSON), timestamp_label(modified, zone)))
    } else {
        None
    };

    Attribution { created: created_label, modified: modified_label }
}

fn timestamp_label(timestamp: Option<&str>, zone: Tz) -> String {
    match EventDate::parse(timestamp, zone) {
        EventDate::At(dt) => dt.format(SHORT_TIMESTAMP).to_string(),
        EventDate::Unparsable(raw) => raw.to_string(),
        EventDate::Missing => UNKNOWN_PERSON.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event(value: serde_json::Value) -> EventRecord {
        serde_json::from_value(value).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_relative_label() {
        let now = utc(2024, 6, 1, 0, 0);
        let zone = Tz::UTC;

        assert_eq!(relative_event_label(Some("2024-06-01T01:00:00"), zone, now), "in 1 hour");
        assert_eq!(relative_event_label(Some("2024-06-01T05:30:00"), zone, now), "in 5 hours");
        assert_eq!(relative_event_label(Some("2024-06-01T00:30:00"), zone, now), "in 0 hours");
        assert_eq!(relative_event_label(Some("2024-06-02T00:00:00"), zone, now), "in 1 day");
        assert_eq!(relative_event_label(Some("2024-06-04T12:00:00"), zone, now), "in 3 days");
        assert_eq!(relative_event_label(Some("2024-06-07T23:00:00"), zone, now), "in 6 days");
        assert_eq!(relative_event_label(Some("2024-06-08T00:00:00"), zone, now), "08/06/2024");
        assert_eq!(relative_event_label(Some("2024-05-20T10:00:00"), zone, now), "20/05/2024");
        assert_eq!(relative_event_label(Some("2024-06-01T00:00:00"), zone, now), "01/06/2024");
    }

    #[test]
    fn test_relative_label_fallbacks() {
        let now = utc(2024, 6, 1, 0, 0);
        assert_eq!(relative_event_label(Some("whenever"), Tz::UTC, now), "whenever");
        assert_eq!(relative_event_label(None, Tz::UTC, now), "No date");
        assert_eq!(relative_event_label(Some(""), Tz::UTC, now), "No date");
    }

    #[test]
    fn test_relative_label_uses_display_zone_for_dates() {
        let now = utc(2024, 6, 1, 0, 0);
        // 23:00 UTC on May 31st is already June 1st in Paris
        assert_eq!(relative_event_label(Some("2024-05-31T23:00:00Z"), chrono_tz::Europe::Paris, now), "01/06/2024");
    }

    #[test]
    fn test_date_box() {
        assert_eq!(date_box_label(Some("2024-06-01T09:00:00Z"), Tz::UTC), "JUN 01");
        assert_eq!(date_box_label(Some("2024-12-25"), Tz::UTC), "DEC 25");
        assert_eq!(date_box_label(Some("garbage"), Tz::UTC), "N/A");
        assert_eq!(date_box_label(None, Tz::UTC), "N/A");
    }

    #[test]
    fn test_full_day_range() {
        let label = full_date_time_label(Some("2024-06-01T00:00:00Z"), Some("2024-06-01T00:00:00Z"), Some("TRUE"), Tz::UTC);
        assert_eq!(label, "Saturday, June 1, 2024");
    }

    #[test]
    fn test_same_day_range() {
        let label = full_date_time_label(Some("2024-06-01T09:00:00"), Some("2024-06-01T11:00:00"), Some("FALSE"), Tz::UTC);
        assert_eq!(label, "Saturday, June 1, 2024 at 9:00 AM - 11:00 AM");
    }

    #[test]
    fn test_multi_day_range() {
        let label = full_date_time_label(Some("2024-06-01T21:15:00"), Some("2024-06-03T13:00:00"), None, Tz::UTC);
        assert_eq!(label, "Saturday, June 1, 2024 at 9:15 PM to Monday, June 3, 2024 at 1:00 PM");
    }

    #[test]
    fn test_range_lowercase_true_is_not_full_day() {
        let label = full_date_time_label(Some("2024-06-01T09:00:00"), Some("2024-06-01T11:00:00"), Some("true"), Tz::UTC);
        assert_eq!(label, "Saturday, June 1, 2024 at 9:00 AM - 11:00 AM");
    }

    #[test]
    fn test_range_fallbacks() {
        assert_eq!(full_date_time_label(None, Some("2024-06-01"), None, Tz::UTC), "Date not available");
        assert_eq!(full_date_time_label(Some("2024-06-01"), Some(""), None, Tz::UTC), "Date not available");
        assert_eq!(full_date_time_label(Some("soon"), Some("later"), Some("TRUE"), Tz::UTC), "soon to later");
        assert_eq!(full_date_time_label(Some("soon"), Some("2024-06-01"), None, Tz::UTC), "soon to 2024-06-01");
    }

    #[test]
    fn test_location() {
        let full = event(json!({
            "AddressLine1": "10 Downing Street",
            "AddressLine2": "",
            "City": "London",
            "PostCode": "SW1A 2AA",
            "Country": "United Kingdom"
        }));
        assert_eq!(location_label(&full), "10 Downing Street, London, SW1A 2AA, United Kingdom");
        assert!(has_valid_location(&full));
        assert_eq!(
            map_link(&full).unwrap(),
            "https://maps.google.com/maps?q=10%20Downing%20Street%2C%20London%2C%20SW1A%202AA%2C%20United%20Kingdom"
        );

        let empty = event(json!({}));
        assert_eq!(location_label(&empty), "Location not specified");
        assert!(!has_valid_location(&empty));
        assert_eq!(map_link(&empty), None);

        let numeric = event(json!({ "PostCode": 75001 }));
        assert_eq!(location_label(&numeric), "75001");
    }

    #[test]
    fn test_past_event() {
        let now = utc(2024, 6, 1, 12, 0);
        assert!(is_past_event(&event(json!({ "EventStartDate": "2024-06-01T11:59:00Z" })), Tz::UTC, now));
        assert!(!is_past_event(&event(json!({ "EventStartDate": "2024-06-01T12:00:00Z" })), Tz::UTC, now));
        assert!(!is_past_event(&event(json!({ "EventStartDate": "yesterday" })), Tz::UTC, now));
        assert!(!is_past_event(&event(json!({})), Tz::UTC, now));
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<p>Hello <a href=\"x\">there</a></p>"), "Hello there");
        assert_eq!(strip_markup("Fish &amp; chips"), "Fish &amp; chips");
        assert_eq!(strip_markup("no tags"), "no tags");
    }

    #[test]
    fn test_attribution_always() {
        let attribution = attribution_labels(
            Some("Ada"), Some("2024-05-01T14:05:00Z"),
            Some("Ada"), Some("2024-05-02T09:00:00Z"),
            Tz::UTC, AttributionPolicy::AlwaysShowModified,
        );
        assert_eq!(attribution.created, "Created by Ada at May 1, 2024, 2:05 PM");
        assert_eq!(attribution.modified.unwrap(), "Last modified by Ada at May 2, 2024, 9:00 AM");
    }

    #[test]
    fn test_attribution_gated() {
        let same = attribution_labels(
            Some("Ada"), Some("2024-05-01T14:05:00Z"),
            Some("Ada"), Some("2024-05-02T09:00:00Z"),
            Tz::UTC, AttributionPolicy::OnlyWhenEditorDiffers,
        );
        assert_eq!(same.modified, None);

        let different = attribution_labels(
            None, Some("not a date"),
            Some("Grace"), None,
            Tz::UTC, AttributionPolicy::OnlyWhenEditorDiffers,
        );
        assert_eq!(different.created, "Created by Unknown at not a date");
        assert_eq!(different.modified.unwrap(), "Last modified by Grace at Unknown");
    }
}
