//! Utilities to track and publish the state of an event board

use std::fmt::{Display, Error, Formatter};

use crate::error::FetchError;
use crate::event::EventRecord;

/// Where the board is in its fetch cycle
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    /// Nothing has been fetched yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded. Events are sorted by start date
    Loaded(Vec<EventRecord>),
    /// The last fetch failed. It can be retried
    Failed(FetchError),
}

impl Default for LoadState {
    fn default() -> Self {
        Self::Idle
    }
}


/// A change of the board, published to listeners
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// The board has not been activated
    NotStarted,
    Loading,
    Loaded { count: usize },
    Failed { message: String },
    /// The detail view was opened on this event
    Selected { key: i64 },
    /// The detail view was closed
    Dismissed,
}

impl Display for BoardEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            BoardEvent::NotStarted => write!(f, "Not started"),
            BoardEvent::Loading => write!(f, "Loading events..."),
            BoardEvent::Loaded{count} => match count {
                0 => write!(f, "No upcoming events found."),
                1 => write!(f, "1 event"),
                n => write!(f, "{} events", n),
            },
            BoardEvent::Failed{message} => write!(f, "Error: {}", message),
            BoardEvent::Selected{key} => write!(f, "Showing event {}", key),
            BoardEvent::Dismissed => write!(f, "Closed event details"),
        }
    }
}

impl Default for BoardEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<BoardEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<BoardEvent>;

/// Create a feeback channel, that can be used to follow the changes of a board (e.g. to know when to redraw)
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(BoardEvent::default())
}
