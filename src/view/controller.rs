use std::future::Future;

use crate::error::ClientError;
use crate::view::state::{Phase, ViewState};

/// Handle for one issued read. Only the latest ticket can settle the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer read was issued (or this one already settled); result dropped
    Stale,
    /// The view was unmounted; result dropped
    Unmounted,
}

/// Drives one fetch-bound view through Idle → Loading → Ready | Failed.
///
/// Requests are never cancelled. Instead every read carries a generation
/// number, and a response that arrives after the key changed or the view
/// went away is discarded.
#[derive(Debug)]
pub struct ViewController<T> {
    state: ViewState<T>,
    key: Option<String>,
    generation: u64,
    mounted: bool,
    history: Vec<Phase>,
}

impl<T> Default for ViewController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewController<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            key: None,
            generation: 0,
            mounted: false,
            history: vec![Phase::Idle],
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Phases visited since the last mount, starting with `Idle`
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Mount the view for `key` and issue its read.
    ///
    /// Mounting again (a remount) starts over from Idle.
    pub fn mount(&mut self, key: impl Into<String>) -> FetchTicket {
        self.mounted = true;
        self.key = Some(key.into());
        self.state = ViewState::Idle;
        self.history = vec![Phase::Idle];
        self.begin()
    }

    /// Update the identifying key; a different key restarts at Loading.
    ///
    /// Returns `None` when the key is unchanged and no read is needed.
    pub fn change_key(&mut self, key: impl Into<String>) -> Option<FetchTicket> {
        let key = key.into();
        if !self.mounted {
            return Some(self.mount(key));
        }
        if self.key.as_deref() == Some(key.as_str()) {
            return None;
        }

        tracing::debug!(from = ?self.key, to = %key, "view key changed, refetching");
        self.key = Some(key);
        Some(self.begin())
    }

    /// Settle the read identified by `ticket`
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<T, ClientError>) -> Completion {
        if !self.mounted {
            tracing::debug!(generation = ticket.generation, "dropping response for unmounted view");
            return Completion::Unmounted;
        }
        if ticket.generation != self.generation || !self.state.is_loading() {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping stale response"
            );
            return Completion::Stale;
        }

        let next = match result {
            Ok(data) => ViewState::Ready(data),
            Err(err) => ViewState::Failed(err),
        };
        self.transition(next);
        Completion::Applied
    }

    /// Discard the view; in-flight reads settle into nothing
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.key = None;
        self.state = ViewState::Idle;
    }

    /// Mount for `key`, run `fetch`, and settle with its result
    pub async fn load<F, Fut>(&mut self, key: impl Into<String>, fetch: F) -> &ViewState<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let key = key.into();
        let ticket = self.mount(key.clone());
        let result = fetch(key).await;
        self.complete(ticket, result);
        &self.state
    }

    /// Like [`load`](Self::load) for a dependency change: skips the read when
    /// the key is unchanged
    pub async fn reload<F, Fut>(&mut self, key: impl Into<String>, fetch: F) -> &ViewState<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let key = key.into();
        if let Some(ticket) = self.change_key(key.clone()) {
            let result = fetch(key).await;
            self.complete(ticket, result);
        }
        &self.state
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }

    fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.transition(ViewState::Loading);
        FetchTicket {
            generation: self.generation,
        }
    }

    fn transition(&mut self, next: ViewState<T>) {
        self.history.push(next.phase());
        self.state = next;
    }
}
