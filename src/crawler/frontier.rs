//! Frontier: the shared blocking FIFO of URLs awaiting fetch
//!
//! The queue and the stop flag live under one mutex so that a consumer's
//! "queue empty and stop set" decision is made on a consistent snapshot.
//! Producers wake one consumer per push; `request_stop` wakes all of them.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// What a consumer gets back from [`Frontier::pop`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// A URL taken from the head of the queue
    Url(String),

    /// Stop was requested and the queue is drained
    Stop,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    stop_requested: bool,
}

/// Thread-safe blocking FIFO queue with a stop signal
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    available: Condvar,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Every operation leaves the state consistent, so a panic in another
    // holder cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a URL to the tail and wakes one blocked consumer
    pub fn push(&self, url: String) {
        let mut state = self.lock();
        state.queue.push_back(url);
        self.available.notify_one();
    }

    /// Blocks until a URL is available or stop has been requested
    ///
    /// Remaining URLs are still handed out after a stop request; `Next::Stop`
    /// is only returned once the queue is empty.
    pub fn pop(&self) -> Next {
        let guard = self.lock();
        let mut state = self
            .available
            .wait_while(guard, |state| state.queue.is_empty() && !state.stop_requested)
            .unwrap_or_else(PoisonError::into_inner);

        match state.queue.pop_front() {
            Some(url) => Next::Url(url),
            None => Next::Stop,
        }
    }

    /// Sets the stop flag and wakes every blocked consumer
    pub fn request_stop(&self) {
        let mut state = self.lock();
        state.stop_requested = true;
        self.available.notify_all();
    }

    /// Snapshot of queue emptiness; may be stale as soon as it returns
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Snapshot of queue length, for progress reporting
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_stop_requested(&self) -> bool {
        self.lock().stop_requested
    }
}
