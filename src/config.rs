//! Support for library configuration options

use std::time::Duration;

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use url::Url;

use crate::error::ConfigError;

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub static ORG_NAME: Lazy<String> = Lazy::new(|| "BSM Task".to_string());

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub static PRODUCT_NAME: Lazy<String> = Lazy::new(|| "Calendar Event".to_string());

/// Domain part of the generated event UIDs (`event-42@bsm-task`)
pub static UID_DOMAIN: Lazy<String> = Lazy::new(|| "bsm-task".to_string());

/// How long a single request to the events endpoint may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Whether the "Last modified by" line is shown for every event.
///
/// Revisions of the widget disagreed on this, so hosts have to pick one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributionPolicy {
    /// Always emit the modified label
    AlwaysShowModified,
    /// Only emit the modified label when the editor is not the author
    OnlyWhenEditorDiffers,
}

impl Default for AttributionPolicy {
    fn default() -> Self {
        Self::AlwaysShowModified
    }
}

/// How event descriptions (which contain markup) are handed to the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptionPolicy {
    /// The upstream source is trusted, markup is passed through as-is
    Trusted,
    /// Markup is stripped, only text is rendered
    PlainText,
}

impl Default for DescriptionPolicy {
    fn default() -> Self {
        Self::Trusted
    }
}

/// Identity written into generated calendar files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarIdentity {
    pub organization: String,
    pub product: String,
    pub uid_domain: String,
}

impl CalendarIdentity {
    pub fn prod_id(&self) -> String {
        format!("-//{}//{}//EN", self.organization, self.product)
    }
}

impl Default for CalendarIdentity {
    fn default() -> Self {
        Self {
            organization: ORG_NAME.to_string(),
            product: PRODUCT_NAME.to_string(),
            uid_domain: UID_DOMAIN.to_string(),
        }
    }
}

/// Everything a widget instance needs to know about its environment
#[derive(Clone, Debug)]
pub struct Settings {
    endpoint: Url,
    timeout: Duration,
    zone: Tz,
    attribution: AttributionPolicy,
    description: DescriptionPolicy,
    identity: CalendarIdentity,
}

impl Settings {
    /// Create settings for a (pre-signed) endpoint URL. Every other option gets its default value.
    pub fn new<S: AsRef<str>>(endpoint: S) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|err| ConfigError::InvalidEndpoint(err.to_string()))?;

        match endpoint.scheme() {
            "http" | "https" => (),
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
            zone: Tz::UTC,
            attribution: AttributionPolicy::default(),
            description: DescriptionPolicy::default(),
            identity: CalendarIdentity::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the time zone whose wall clock is used to render every date
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_attribution(mut self, attribution: AttributionPolicy) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn with_description(mut self, description: DescriptionPolicy) -> Self {
        self.description = description;
        self
    }

    pub fn with_identity(mut self, identity: CalendarIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn endpoint(&self) -> &Url                   { &self.endpoint }
    pub fn timeout(&self) -> Duration                { self.timeout }
    pub fn zone(&self) -> Tz                         { self.zone }
    pub fn attribution(&self) -> AttributionPolicy   { self.attribution }
    pub fn description(&self) -> DescriptionPolicy   { self.description }
    pub fn identity(&self) -> &CalendarIdentity      { &self.identity }
}
