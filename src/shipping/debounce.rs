//! A single-slot debounce cell.
//!
//! Each push overwrites the pending value and restarts the countdown, so only
//! the last value pushed within a quiet period is ever released. Deadlines use
//! the tokio clock, which tests can pause and advance.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Holds at most one pending value until its deadline passes.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces the pending value and restarts the countdown.
    pub fn push(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Like [`push`](Self::push), but folds the previous pending value into
    /// the new one with `merge(previous, next)`.
    pub fn push_with(&mut self, value: T, merge: impl FnOnce(T, T) -> T) {
        let value = match self.pending.take() {
            Some(previous) => merge(previous.value, value),
            None => value,
        };
        self.push(value);
    }

    /// Returns when the pending value will be released.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Releases the pending value if its deadline has passed.
    pub fn take_due(&mut self) -> Option<T> {
        if self.deadline()? <= Instant::now() {
            self.cancel()
        } else {
            None
        }
    }

    /// Waits for the deadline and releases the pending value.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn wait(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        sleep_until(deadline).await;
        self.cancel()
    }
}
