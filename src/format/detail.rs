//! View models for the list and the detail view

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::event::EventRecord;
use super::{
    Attribution, attribution_labels, date_box_label, event_category, event_title, full_date_time_label,
    is_past_event, location_label, map_link, relative_event_label,
};

/// One line of the event list, e.g. `Offsite - in 2 days`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRow {
    pub key: i64,
    pub title: String,
    pub when: String,
    /// Past events are greyed out
    pub past: bool,
}

impl EventRow {
    pub fn new(event: &EventRecord, position: usize, settings: &Settings, now: DateTime<Utc>) -> Self {
        Self {
            key: event.list_key(position),
            title: event_title(event).to_string(),
            when: relative_event_label(event.event_start_date(), settings.zone(), now),
            past: is_past_event(event, settings.zone(), now),
        }
    }
}

impl Display for EventRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.when)
    }
}

/// Everything the detail view displays about an event.
///
/// This is computed on demand, from the currently selected record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDetail {
    pub title: String,
    pub category: String,
    pub date_box: String,
    pub date_time: String,
    pub location: String,
    /// Only set when the event has an address
    pub map_link: Option<String>,
    /// Only set when the event has a non-blank banner
    pub banner_url: Option<String>,
    /// Markup or plain text, depending on the description policy
    pub description: Option<String>,
    pub attribution: Attribution,
    pub past: bool,
}

impl EventDetail {
    pub const NO_BANNER: &'static str = "No banner image available";

    pub fn new(event: &EventRecord, settings: &Settings, now: DateTime<Utc>) -> Self {
        let zone = settings.zone();
        Self {
            title: event_title(event).to_string(),
            category: event_category(event).to_string(),
            date_box: date_box_label(event.event_start_date(), zone),
            date_time: full_date_time_label(event.event_start_date(), event.event_end_date(), event.full_day_event(), zone),
            location: location_label(event),
            map_link: map_link(event),
            banner_url: if event.has_banner() { event.banner_url().map(String::from) } else { None },
            description: event.description_for_display(settings.description()),
            attribution: attribution_labels(
                event.author(), event.created(),
                event.editor(), event.modified(),
                zone, settings.attribution(),
            ),
            past: is_past_event(event, zone, now),
        }
    }
}
