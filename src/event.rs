//! Calendar events, as served by the events webhook

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::DescriptionPolicy;
use crate::format::strip_markup;

/// The value of `FullDayEvent` that marks a full-day event. Anything else (including `"true"`) means "not full day".
pub const FULL_DAY_MARKER: &str = "TRUE";

/// One calendar event.
///
/// Instances are only built by deserializing the webhook payload, and are never mutated afterwards.
/// Every field is optional: empty strings are reported as `None` by the getters.
/// Fields are read leniently, so that a value of an unexpected JSON type never discards the whole event.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    #[serde(rename = "ID", default, deserialize_with = "deserialize_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    banner_url: Option<String>,
    /// Contains markup
    #[serde(default, deserialize_with = "deserialize_text")]
    description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    address_line1: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    address_line2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    city: Option<String>,
    /// Some sources send this as a number
    #[serde(default, deserialize_with = "deserialize_text")]
    post_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    country: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    event_start_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    event_end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    full_day_event: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    author: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    editor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    created: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    modified: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl EventRecord {
    pub fn id(&self) -> Option<i64>                  { self.id }
    pub fn title(&self) -> Option<&str>              { non_empty(&self.title) }
    pub fn category(&self) -> Option<&str>           { non_empty(&self.category) }
    pub fn banner_url(&self) -> Option<&str>         { non_empty(&self.banner_url) }
    pub fn description(&self) -> Option<&str>       { non_empty(&self.description) }
    pub fn address_line1(&self) -> Option<&str>      { non_empty(&self.address_line1) }
    pub fn address_line2(&self) -> Option<&str>      { non_empty(&self.address_line2) }
    pub fn city(&self) -> Option<&str>               { non_empty(&self.city) }
    pub fn post_code(&self) -> Option<&str>          { non_empty(&self.post_code) }
    pub fn country(&self) -> Option<&str>            { non_empty(&self.country) }
    pub fn event_start_date(&self) -> Option<&str>   { non_empty(&self.event_start_date) }
    pub fn event_end_date(&self) -> Option<&str>     { non_empty(&self.event_end_date) }
    pub fn full_day_event(&self) -> Option<&str>     { non_empty(&self.full_day_event) }
    pub fn author(&self) -> Option<&str>             { non_empty(&self.author) }
    pub fn editor(&self) -> Option<&str>             { non_empty(&self.editor) }
    pub fn created(&self) -> Option<&str>            { non_empty(&self.created) }
    pub fn modified(&self) -> Option<&str>           { non_empty(&self.modified) }

    /// Whether `FullDayEvent` is exactly `"TRUE"`
    pub fn is_full_day(&self) -> bool {
        self.full_day_event.as_deref() == Some(FULL_DAY_MARKER)
    }

    /// Whether the detail view can show a banner image
    pub fn has_banner(&self) -> bool {
        self.banner_url().map(|url| !url.trim().is_empty()).unwrap_or(false)
    }

    /// The key to use in a list view: the event ID, or its position in the list when it has none
    pub fn list_key(&self, position: usize) -> i64 {
        self.id.unwrap_or(position as i64)
    }

    /// The address components, in display order, without the empty ones
    pub fn address_parts(&self) -> Vec<&str> {
        [
            self.address_line1(),
            self.address_line2(),
            self.city(),
            self.post_code(),
            self.country(),
        ]
        .iter()
        .flatten()
        .copied()
        .collect()
    }

    /// The description as the presentation layer should render it
    pub fn description_for_display(&self, policy: DescriptionPolicy) -> Option<String> {
        let description = self.description()?;
        match policy {
            DescriptionPolicy::Trusted => Some(description.to_string()),
            DescriptionPolicy::PlainText => Some(strip_markup(description)),
        }
    }
}

/// Text fields: numbers and booleans are kept as their JSON text, arrays and objects are dropped
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            log::debug!("Ignoring a text field of unexpected type: {}", other);
            None
        },
        None => None,
    })
}

/// `ID` is an integer, but may be sent as an integral float or a numeric string. Anything else counts as missing.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| integral(n.as_f64()?)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(other) => {
            log::debug!("Ignoring an ID of unexpected type: {}", other);
            None
        },
        None => None,
    })
}

fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
