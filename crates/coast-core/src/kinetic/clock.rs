//! L4 Atomic Layer: Fixed-rate tick source for single-threaded hosts
//!
//! A poll-driven host (a terminal event loop, say) has no timer callbacks.
//! It asks the clock how long it may block and polls it when it wakes up.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    next_tick: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking; the first tick is due immediately
    pub fn start(&mut self, now: Instant) {
        if self.next_tick.is_none() {
            self.next_tick = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Returns true when a tick is due and schedules the next one.
    ///
    /// Missed ticks are skipped rather than delivered in a burst.
    pub fn poll(&mut self, now: Instant, period: Duration) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + period;
        if next <= now {
            next = now + period;
        }
        self.next_tick = Some(next);
        true
    }

    /// Time until the next tick, `None` while stopped
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|due| due.saturating_duration_since(now))
    }
}
