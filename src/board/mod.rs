//! This module holds the state of an events widget: the fetched list, and which event (if any) is shown in the detail view
//!
//! A board goes through `Idle → Loading → Loaded | Failed`, and can go back to `Loading` from both `Loaded` and `Failed`.
//! Fetch results are accepted only if no newer fetch has been started in the meantime ("last request wins").

use crate::error::FetchError;
use crate::event::EventRecord;
use crate::traits::EventSource;

pub mod state;
pub use state::{BoardEvent, LoadState};
use state::{feedback_channel, FeedbackReceiver, FeedbackSender};

/// Identifies a fetch started by [`EventBoard::begin_fetch`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// The state of one widget instance.
///
/// It owns its source, and is owned by a single widget, so that no locking is needed.
pub struct EventBoard<S: EventSource> {
    source: S,
    state: LoadState,
    /// Index (in the loaded list) of the event shown in the detail view.
    /// The detail view is open if and only if this is set
    selected: Option<usize>,
    /// Generation of the latest started fetch
    generation: u64,
    feedback: FeedbackSender,
}

impl<S: EventSource> EventBoard<S> {
    /// Create a board. Nothing is fetched until [`Self::activate`] is called
    pub fn new(source: S) -> Self {
        let (feedback, _) = feedback_channel();
        Self {
            source,
            state: LoadState::Idle,
            selected: None,
            generation: 0,
            feedback,
        }
    }

    pub fn source(&self) -> &S { &self.source }
    pub fn state(&self) -> &LoadState { &self.state }

    /// Follow the changes of this board
    pub fn subscribe(&self) -> FeedbackReceiver {
        self.feedback.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// The loaded events (empty unless the board is `Loaded`)
    pub fn events(&self) -> &[EventRecord] {
        match &self.state {
            LoadState::Loaded(events) => events,
            _ => &[],
        }
    }

    /// The error of the last fetch, if it failed
    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Start the board, as a widget does when it is mounted
    pub async fn activate(&mut self) {
        self.refresh().await
    }

    /// Fetch the events again. This is what the "Retry" button does when the board has `Failed`, but this is also allowed when it is `Loaded`.
    pub async fn retry(&mut self) {
        self.refresh().await
    }

    /// Start a fetch, then apply its result
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.source.fetch_events().await;
        self.complete_fetch(ticket, result);
    }

    /// Enter the `Loading` state.
    ///
    /// Any fetch started before this one is superseded: its result will be discarded by [`Self::complete_fetch`].
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        if self.selected.take().is_some() {
            self.publish(BoardEvent::Dismissed);
        }
        self.state = LoadState::Loading;
        self.publish(BoardEvent::Loading);
        log::debug!("Starting fetch #{}", self.generation);
        FetchTicket { generation: self.generation }
    }

    /// Apply the result of a fetch.
    ///
    /// Returns `false` (and leaves the board untouched) in case a newer fetch has started since `ticket` was issued.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<EventRecord>, FetchError>) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Discarding the result of fetch #{}, fetch #{} is more recent", ticket.generation, self.generation);
            return false;
        }

        self.selected = None;
        match result {
            Ok(events) => {
                log::info!("Loaded {} events", events.len());
                self.publish(BoardEvent::Loaded { count: events.len() });
                self.state = LoadState::Loaded(events);
            },
            Err(err) => {
                log::warn!("Unable to fetch events: {}", err);
                self.publish(BoardEvent::Failed { message: err.to_string() });
                self.state = LoadState::Failed(err);
            },
        }
        true
    }

    /// Open the detail view on the event at `index` in [`Self::events`].
    ///
    /// Returns `None` (and changes nothing) if the board is not `Loaded` or `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<&EventRecord> {
        let key = self.events().get(index)?.list_key(index);
        self.selected = Some(index);
        self.publish(BoardEvent::Selected { key });
        self.events().get(index)
    }

    /// Open the detail view on the event that has this list key (see [`EventRecord::list_key`])
    pub fn select_by_key(&mut self, key: i64) -> Option<&EventRecord> {
        let index = self.events()
            .iter()
            .enumerate()
            .position(|(position, event)| event.list_key(position) == key)?;
        self.select(index)
    }

    /// The event shown in the detail view
    pub fn selected(&self) -> Option<&EventRecord> {
        self.selected.and_then(|index| self.events().get(index))
    }

    pub fn detail_open(&self) -> bool {
        self.selected().is_some()
    }

    /// Close the detail view
    pub fn dismiss(&mut self) {
        if self.selected.take().is_some() {
            self.publish(BoardEvent::Dismissed);
        }
    }

    fn publish(&self, event: BoardEvent) {
        self.feedback.send_replace(event);
    }
}
