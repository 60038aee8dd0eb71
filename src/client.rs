//! This module provides a client to fetch events from the events webhook

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::Settings;
use crate::error::FetchError;
use crate::event::EventRecord;
use crate::format::date::parse_event_date;
use crate::traits::EventSource;


/// A source that fetches its events from the (pre-signed) webhook URL of the settings
pub struct Client {
    settings: Settings,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// POST `body` to the endpoint, and return the JSON it answers
    async fn sub_request(&self, body: &Value) -> Result<Value, FetchError> {
        let endpoint = self.settings.endpoint();
        log::debug!("POST to {}", endpoint.host_str().unwrap_or("<no host>"));

        let res = self.http
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            log::warn!("Events endpoint answered with status {}", status);
            return Err(FetchError::HttpStatus { status: status.as_u16() });
        }

        let text = res.text().await?;
        let value = serde_json::from_str(&text)?;
        Ok(value)
    }

    /// Send an arbitrary JSON body to the endpoint and return the raw answer.
    ///
    /// This is mostly useful to inspect what the endpoint serves (the events request itself always sends `{}`).
    pub async fn probe(&self, body: Value) -> Result<Value, FetchError> {
        self.sub_request(&body).await
    }
}

#[async_trait]
impl EventSource for Client {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        // The body is reserved for filters, that the endpoint does not support yet
        let payload = self.sub_request(&serde_json::json!({})).await?;
        let events = normalize_payload(payload, self.settings.zone())?;
        log::info!("Fetched {} events", events.len());
        Ok(events)
    }
}


/// Turn the `{"value": [...]}` answer of the endpoint into sorted events.
///
/// A missing (or `null`) `value` means there are no events. Entries that are not JSON objects are skipped.
pub fn normalize_payload(payload: Value, zone: Tz) -> Result<Vec<EventRecord>, FetchError> {
    let mut object = match payload {
        Value::Object(object) => object,
        other => return Err(FetchError::network(format!("expected a JSON object, got {}", json_type(&other)))),
    };

    let entries = match object.remove("value") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(FetchError::network(format!("expected an array of events, got {}", json_type(&other)))),
    };

    let mut events = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<EventRecord>(entry) {
            Ok(event) => events.push(event),
            Err(err) => {
                log::warn!("Event #{} is invalid ({}). Ignoring it.", index, err);
                continue;
            },
        }
    }

    sort_by_start(&mut events, zone);
    Ok(events)
}

/// Sort by ascending start date.
///
/// Events whose start date cannot be parsed go last, in their original order.
pub fn sort_by_start(events: &mut [EventRecord], zone: Tz) {
    events.sort_by_cached_key(|event| {
        match event.event_start_date().and_then(|raw| parse_event_date(raw, zone)) {
            Some(start) => (false, start.timestamp_millis()),
            None => (true, 0),
        }
    });
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
