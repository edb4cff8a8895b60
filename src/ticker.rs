use std::time::{Duration, Instant};

/// A repeating deadline. The loop asks how long it may wait for input, and
/// whether a tick is due; cancelling it stops ticks until it is started again.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval, next: None }
    }

    /// Takes effect from the next reschedule.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Schedules the first tick one full interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next, Some(next) if now >= next)
    }

    /// How long until the next tick, or `None` when cancelled.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }

    /// Marks the current tick as handled. The next one is at least a full
    /// interval away, even if this one fired late.
    pub fn reschedule(&mut self, now: Instant) {
        if self.next.is_some() {
            self.next = Some(now + self.interval);
        }
    }
}
