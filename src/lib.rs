//! This crate is the core of an "upcoming events" widget.
//!
//! It fetches events from a webhook with the [`Client`](client::Client) in the [`client`] module, and keeps them in an [`EventBoard`], which also tracks which event is shown in a detail view.
//!
//! Everything a widget displays is derived on demand from the [`EventRecord`]s: the [`format`] module turns them into display strings (dates, locations, attribution lines...), and the [`ical`] module exports them as iCal files that calendar apps can import. \
//! Formatting never fails: malformed data from upstream degrades into fallback strings.

pub mod traits;

mod event;
pub use event::EventRecord;
pub mod board;
pub use board::EventBoard;

pub mod client;
pub mod format;
pub mod ical;

pub mod config;
pub use config::Settings;
pub mod error;
pub use error::FetchError;

#[cfg(any(test, feature = "mock_source"))]
pub mod mock_source;
