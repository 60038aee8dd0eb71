//! This module provides an event source whose answers are scripted, so that tests can make fetches fail on demand
#![cfg(any(test, feature = "mock_source"))]

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::event::EventRecord;
use crate::traits::EventSource;

/// This stores some behaviour tweaks, that describe how a mocked source will behave during a given test
///
/// So that fetches fail _n_ times after _m_ initial successes, set `(m, n)` as `fetch_behaviour`
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every fetch will be allowed
    pub is_suspended: bool,

    pub fetch_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            fetch_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_fetch(&mut self) -> Result<(), String> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.fetch_behaviour, "fetch")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), String> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}


/// An [`EventSource`] that serves a fixed list of events, and fails according to its [`MockBehaviour`]
#[derive(Debug)]
pub struct MockSource {
    events: Vec<EventRecord>,
    error: Option<FetchError>,
    behaviour: Mutex<MockBehaviour>,
    fetch_count: Mutex<usize>,
}

impl MockSource {
    /// A source that always succeeds. Events are served as given (they are not sorted)
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self::with_behaviour(events, MockBehaviour::new())
    }

    pub fn with_behaviour(events: Vec<EventRecord>, behaviour: MockBehaviour) -> Self {
        Self {
            events,
            error: None,
            behaviour: Mutex::new(behaviour),
            fetch_count: Mutex::new(0),
        }
    }

    /// The error returned by failing fetches. Defaults to a `FetchError::Network` describing the mock
    pub fn failing_with(mut self, error: FetchError) -> Self {
        self.error = Some(error);
        self
    }

    /// How many times `fetch_events` has been called
    pub fn fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        *self.fetch_count.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;

        let allowed = self.behaviour.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).can_fetch();
        match allowed {
            Ok(()) => Ok(self.events.clone()),
            Err(message) => Err(self.error.clone().unwrap_or(FetchError::Network { message })),
        }
    }
}
