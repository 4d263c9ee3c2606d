//! Periodic feed polling.
//!
//! A polling cycle fetches every subscribed feed at once and finishes only
//! when every fetch has settled, successfully or not.  The next cycle is
//! scheduled a fixed delay *after* that, never on a fixed wall-clock rate, so
//! cycles cannot overlap and the gap between two cycles is at least the
//! delay plus the slowest feed.
//!
//! ## For contributors
//!
//! * [`poll_cycle`] is the fan-out/join: one future per feed, all driven
//!   concurrently inside a single task, each outcome handed to a callback as
//!   soon as it arrives.  It has no notion of state; the engine decides what
//!   an outcome means.
//! * [`PollScheduler`] is the cancellable timer the engine waits on.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::Sleep;

use crate::error::LoadError;
use crate::source::{FeedLoader, ParsedFeed};

/// Delay between the end of one polling cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// A one-shot timer for the next polling cycle.
///
/// At most one cycle is pending at a time: scheduling again restarts the
/// countdown.
pub struct PollScheduler {
    interval: Duration,
    next: Option<Pin<Box<Sleep>>>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arrange for [`due`](Self::due) to fire one interval from now.
    pub fn schedule(&mut self) {
        self.next = Some(Box::pin(tokio::time::sleep(self.interval)));
    }

    /// Drop the pending cycle, if any.
    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.next.is_some()
    }

    /// Wait until the pending cycle is due, then clear it.
    ///
    /// Never resolves while nothing is scheduled.  Cancel-safe: dropping the
    /// returned future keeps the countdown running.
    pub async fn due(&mut self) {
        match self.next.as_mut() {
            Some(sleep) => {
                sleep.await;
                self.next = None;
            }
            None => future::pending::<()>().await,
        }
    }
}

/// Load every URL concurrently and report each outcome through `on_settled`
/// in completion order (not submission order).  Returns once all loads have
/// settled; one failure never cuts the others short.
pub async fn poll_cycle<F>(urls: Vec<String>, loader: FeedLoader, mut on_settled: F)
where
    F: FnMut(String, Result<ParsedFeed, LoadError>),
{
    let mut in_flight: FuturesUnordered<_> = urls
        .into_iter()
        .map(|url| {
            let loader = loader.clone();
            async move {
                let outcome = loader.load(&url).await;
                (url, outcome)
            }
        })
        .collect();

    while let Some((url, outcome)) = in_flight.next().await {
        on_settled(url, outcome);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
