use async_trait::async_trait;

use crate::error::FetchError;
use crate::event::EventRecord;

/// Anything that can produce the current list of events
///
/// The main implementation is [`Client`](crate::client::Client), which fetches them from the events webhook.
#[async_trait]
pub trait EventSource {
    /// Returns the events, sorted by ascending start date.
    /// This performs a (possibly slow) network request every time it is called.
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError>;
}
