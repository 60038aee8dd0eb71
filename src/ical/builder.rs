//! A module to build ICal files

use chrono_tz::Tz;

use crate::config::CalendarIdentity;
use crate::event::EventRecord;
use crate::format::{event_title, location_label, strip_markup, EventDate, NO_DESCRIPTION};

/// RFC5545 content lines should not be longer than this (line break excluded)
const MAX_LINE_OCTETS: usize = 75;

/// Create an iCal file that contains a single `VEVENT`, from a `crate::EventRecord`
///
/// This never fails: missing or invalid fields get a fallback value (an empty value for dates).
pub fn build_from(event: &EventRecord, identity: &CalendarIdentity, zone: Tz) -> String {
    let full_day = event.is_full_day();
    let date_param = if full_day { ";VALUE=DATE" } else { "" };

    let uid = match event.id() {
        Some(id) => format!("event-{}@{}", id, identity.uid_domain),
        None => format!("event-unknown@{}", identity.uid_domain),
    };
    let description = event.description()
        .map(strip_markup)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", identity.prod_id()),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("SUMMARY:{}", text_value(event_title(event))),
        format!("DESCRIPTION:{}", text_value(&description)),
        format!("LOCATION:{}", text_value(&location_label(event))),
        format!("DTSTART{}:{}", date_param, format_date_token(event.event_start_date(), full_day, zone)),
        format!("DTEND{}:{}", date_param, format_date_token(event.event_end_date(), full_day, zone)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    lines.iter()
        .map(|line| fold_line(line))
        .collect::<Vec<_>>()
        .join("\r\n")
        .trim()
        .to_string()
}

/// `20240601` for full-day events, `20240601T090000` (wall clock of `zone`, no zone suffix) otherwise
fn format_date_token(raw: Option<&str>, full_day: bool, zone: Tz) -> String {
    match EventDate::parse(raw, zone) {
        EventDate::At(dt) if full_day => dt.format("%Y%m%d").to_string(),
        EventDate::At(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
        _ => String::new(),
    }
}

/// Backslashes are escaped, and line breaks are not allowed inside a TEXT value
fn text_value(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\r', "\\n")
        .replace('\n', "\\n")
}

/// Split a content line into chunks of at most 75 octets, continuation lines starting with a space
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + 3 * (line.len() / MAX_LINE_OCTETS));
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            width = 1;
        }
        folded.push(c);
        width += len;
    }
    folded
}
