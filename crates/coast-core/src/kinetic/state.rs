//! L4 Atomic Layer: Mutable velocity state of one scrollable view

use std::collections::VecDeque;
use std::time::Instant;

/// FIFO of the most recent instantaneous velocity samples
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    samples: VecDeque<f64>,
}

impl SampleHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest ones so at most `capacity` remain
    pub fn push(&mut self, sample: f64, capacity: usize) {
        self.samples.push_back(sample);
        while self.samples.len() > capacity.max(1) {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean, zero when empty
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }
}

/// Velocity, sample history and timing marks shared by the tracker and the integrator
#[derive(Debug, Clone, Default)]
pub struct ScrollVelocityState {
    /// Signed velocity in position units per millisecond
    pub velocity: f64,
    pub recent_samples: SampleHistory,
    /// Sign of the previous non-zero wheel delta (-1, 0 or +1)
    pub last_wheel_direction_sign: f64,
    /// Wheel input arrived and the settle window has not elapsed yet
    pub is_actively_scrolling: bool,
    /// Previous animation tick, `None` until the first tick after a (re)start
    pub last_tick: Option<Instant>,
    /// Previous accepted wheel event
    pub last_wheel_at: Option<Instant>,
}

impl ScrollVelocityState {
    pub fn new(sample_capacity: usize) -> Self {
        Self {
            recent_samples: SampleHistory::with_capacity(sample_capacity),
            ..Default::default()
        }
    }

    /// Zero the velocity and forget the samples
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.recent_samples.clear();
    }

    /// Settle window elapsed: friction takes over again
    pub fn settle(&mut self) {
        self.is_actively_scrolling = false;
        self.recent_samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = SampleHistory::default();
        for i in 0..5 {
            history.push(i as f64, 3);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert!((history.average() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_history_shrinks_with_capacity() {
        let mut history = SampleHistory::default();
        for i in 0..10 {
            history.push(i as f64, 10);
        }
        history.push(10.0, 4);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(SampleHistory::default().average(), 0.0);
    }

    #[test]
    fn test_settle_keeps_velocity() {
        let mut state = ScrollVelocityState::new(10);
        state.velocity = 0.3;
        state.is_actively_scrolling = true;
        state.recent_samples.push(0.3, 10);

        state.settle();

        assert!(!state.is_actively_scrolling);
        assert!(state.recent_samples.is_empty());
        assert_eq!(state.velocity, 0.3);
    }
}
