//! Debounced input values
//!
//! Callers pass `Instant`s explicitly so the frame loop decides what "now" is.

use std::time::{Duration, Instant};

/// Default quiet period for the search box
pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

/// Holds back a rapidly changing value until it has been stable for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    quiet: Duration,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self { settled: initial, pending: None, quiet }
    }

    /// Record a raw value. Restarts the quiet period; earlier pending values are dropped.
    pub fn input(&mut self, value: T, now: Instant) {
        if self.pending.is_none() && value == self.settled {
            return;
        }
        self.pending = Some((value, now + self.quiet));
    }

    /// Emit the pending value once its quiet period has elapsed.
    /// Returns `None` when the value settles back to what was already settled.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        self.commit(value)
    }

    /// Commit the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        self.commit(value)
    }

    /// Replace the settled value and drop anything pending, without emitting
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }

    /// Change the quiet period. A value already pending keeps its deadline.
    pub fn set_quiet(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending value is due
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    fn commit(&mut self, value: T) -> Option<T> {
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }
}
