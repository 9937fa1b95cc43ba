//! L3 Molecular Layer: Per-view kinetic scroll engine
//!
//! Combines the velocity tracker, the decay integrator, the settle deadline
//! and the animation lifecycle around one scroll surface. The engine does not
//! own any timer: hosts ask it for `settle_deadline()` and the frame interval
//! and call back `on_settle()` / `on_tick()` when those fire.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::KineticConfig;
use crate::settings::ConfigHandle;

use super::decay::{self, TickOutcome};
use super::state::ScrollVelocityState;
use super::surface::ScrollSurface;
use super::velocity::{self, WheelOutcome};

/// Whether the fixed-rate tick source is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating,
}

/// Kinetic scrolling for one view
#[derive(Debug)]
pub struct KineticScroller<S> {
    state: ScrollVelocityState,
    config: ConfigHandle,
    surface: S,
    animation: AnimationState,
    /// Pending settle callback, re-armed by every wheel event
    settle_deadline: Option<Instant>,
}

impl<S: ScrollSurface> KineticScroller<S> {
    pub fn new(config: ConfigHandle, surface: S) -> Self {
        let capacity = config.current().sample_history_capacity;
        Self {
            state: ScrollVelocityState::new(capacity),
            config,
            surface,
            animation: AnimationState::Idle,
            settle_deadline: None,
        }
    }

    /// Feed one wheel-rotation event.
    ///
    /// Non-finite deltas and timestamps older than the previous event are
    /// dropped without touching any state.
    pub fn on_wheel_event(
        &mut self,
        raw_delta: f64,
        scroll_amount_multiplier: f64,
        now: Instant,
    ) -> WheelOutcome {
        if !raw_delta.is_finite() || !scroll_amount_multiplier.is_finite() {
            debug!(raw_delta, scroll_amount_multiplier, "Dropping non-finite wheel event");
            return WheelOutcome::Ignored;
        }
        if self.state.last_wheel_at.is_some_and(|last| now < last) {
            debug!("Dropping wheel event with a timestamp earlier than the previous one");
            return WheelOutcome::Ignored;
        }

        let config = self.config.current();
        self.state.last_wheel_at = Some(now);
        self.state.is_actively_scrolling = true;
        self.settle_deadline = Some(now + config.settle_window());

        let outcome =
            velocity::on_wheel_event(&mut self.state, &config, raw_delta, scroll_amount_multiplier);
        match outcome {
            WheelOutcome::Reversed => debug!("Wheel direction reversed, velocity reset"),
            WheelOutcome::Tracked { velocity } => trace!(raw_delta, velocity, "Wheel event tracked"),
            WheelOutcome::Filtered => trace!(raw_delta, "Wheel event below speed threshold"),
            WheelOutcome::Ignored => {}
        }
        outcome
    }

    /// Settle window elapsed without further wheel input
    pub fn on_settle(&mut self) {
        self.settle_deadline = None;
        self.state.settle();
        trace!(velocity = self.state.velocity, "Wheel input settled");
    }

    /// Fire the settle callback if its deadline has passed
    pub fn poll_settle(&mut self, now: Instant) -> bool {
        match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.on_settle();
                true
            }
            _ => false,
        }
    }

    /// One fixed-rate animation tick; ignored while idle
    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        if self.animation == AnimationState::Idle {
            return TickOutcome::Paused;
        }

        let config = self.config.current();
        let outcome = decay::on_tick(&mut self.state, &config, &mut self.surface, now);
        if outcome == TickOutcome::Stopped {
            debug!(offset = self.surface.offset(), "Kinetic scroll came to rest");
        }
        outcome
    }

    /// Idle -> Animating; no-op when already animating
    pub fn start_animating(&mut self) {
        if self.animation == AnimationState::Animating {
            return;
        }
        self.animation = AnimationState::Animating;
        self.state.last_tick = None;
        debug!("Kinetic animation started");
    }

    /// Animating -> Idle; no-op when already idle
    pub fn stop_animating(&mut self) {
        if self.animation == AnimationState::Idle {
            return;
        }
        self.animation = AnimationState::Idle;
        self.state.last_tick = None;
        debug!("Kinetic animation stopped");
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation == AnimationState::Animating
    }

    #[inline]
    pub fn animation_state(&self) -> AnimationState {
        self.animation
    }

    #[inline]
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    /// Current tick period, re-read from the configuration
    pub fn frame_interval(&self) -> Duration {
        self.config.current().frame_interval()
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    #[inline]
    pub fn state(&self) -> &ScrollVelocityState {
        &self.state
    }

    pub fn config(&self) -> KineticConfig {
        self.config.current()
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Jump to an offset, dropping any momentum
    pub fn set_offset(&mut self, offset: i64) {
        self.state.halt();
        self.surface.set_offset(offset.max(0));
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetic::surface::MemorySurface;
    use crate::settings::ConfigStore;

    fn scenario_engine() -> KineticScroller<MemorySurface> {
        let config = KineticConfig {
            speed_threshold: 0.0005,
            speed_limit: 25.0,
            acceleration_limit: 5.0,
            friction_exponent: 0.005,
            scroll_multiplier: 1.0,
            frame_interval_ms: 50,
            ..Default::default()
        };
        KineticScroller::new(ConfigHandle::fixed(config), MemorySurface::default())
    }

    #[test]
    fn test_scenario_notch_then_decay() {
        let mut engine = scenario_engine();
        engine.start_animating();
        let t0 = Instant::now();

        assert_eq!(engine.on_tick(t0), TickOutcome::Synced);

        engine.on_wheel_event(1.0, 1.0, t0);
        assert!((engine.velocity() - 0.02).abs() < 1e-12);

        engine.on_settle();
        let outcome = engine.on_tick(t0 + Duration::from_millis(50));

        assert!((engine.velocity() - 0.015576).abs() < 1e-5);
        assert_eq!(outcome, TickOutcome::Scrolled { from: 0, to: 1 });
    }

    #[test]
    fn test_scenario_reversal_requests_nothing() {
        let mut engine = scenario_engine();
        let t0 = Instant::now();
        engine.on_wheel_event(1.0, 1.0, t0);

        let outcome = engine.on_wheel_event(-1.0, 1.0, t0 + Duration::from_millis(5));

        assert_eq!(outcome, WheelOutcome::Reversed);
        assert_eq!(engine.velocity(), 0.0);
        assert!(engine.state().recent_samples.is_empty());
        assert_eq!(engine.surface().offset, 0);
    }

    #[test]
    fn test_wheel_arms_settle_window() {
        let mut engine = scenario_engine();
        let t0 = Instant::now();
        let window = engine.config().settle_window();

        engine.on_wheel_event(1.0, 1.0, t0);
        assert!(engine.state().is_actively_scrolling);
        assert_eq!(engine.settle_deadline(), Some(t0 + window));

        // A later event pushes the deadline out
        let t1 = t0 + Duration::from_millis(100);
        engine.on_wheel_event(1.0, 1.0, t1);
        assert!(!engine.poll_settle(t0 + window));
        assert!(engine.state().is_actively_scrolling);

        assert!(engine.poll_settle(t1 + window));
        assert!(!engine.state().is_actively_scrolling);
        assert!(engine.state().recent_samples.is_empty());
        assert_eq!(engine.settle_deadline(), None);
    }

    #[test]
    fn test_invalid_input_ignored() {
        let mut engine = scenario_engine();
        let t0 = Instant::now() + Duration::from_secs(1);
        engine.on_wheel_event(1.0, 1.0, t0);
        let velocity = engine.velocity();

        assert_eq!(engine.on_wheel_event(f64::NAN, 1.0, t0), WheelOutcome::Ignored);
        assert_eq!(engine.on_wheel_event(f64::INFINITY, 1.0, t0), WheelOutcome::Ignored);
        assert_eq!(
            engine.on_wheel_event(1.0, 1.0, t0 - Duration::from_millis(10)),
            WheelOutcome::Ignored
        );
        assert_eq!(engine.velocity(), velocity);
        assert_eq!(engine.state().recent_samples.len(), 1);
    }

    #[test]
    fn test_lifecycle_idempotent() {
        let mut engine = scenario_engine();
        let t0 = Instant::now();
        assert_eq!(engine.animation_state(), AnimationState::Idle);
        assert_eq!(engine.on_tick(t0), TickOutcome::Paused);

        engine.start_animating();
        engine.start_animating();
        assert!(engine.is_animating());
        assert_eq!(engine.on_tick(t0), TickOutcome::Synced);
        assert_eq!(engine.on_tick(t0 + Duration::from_millis(50)), TickOutcome::Idle);

        engine.stop_animating();
        engine.stop_animating();
        assert!(!engine.is_animating());

        // Restart resynchronises
        engine.start_animating();
        assert_eq!(engine.on_tick(t0 + Duration::from_millis(100)), TickOutcome::Synced);
    }

    #[test]
    fn test_no_scroll_after_rest_until_new_input() {
        let mut engine = scenario_engine();
        engine.start_animating();
        let t0 = Instant::now();
        engine.on_tick(t0);
        engine.on_wheel_event(1.0, 5.0, t0);
        engine.on_settle();

        let mut now = t0;
        loop {
            now += Duration::from_millis(50);
            if engine.on_tick(now) == TickOutcome::Stopped {
                break;
            }
        }
        let rest = engine.surface().offset;
        assert!(rest > 0);

        for _ in 0..5 {
            now += Duration::from_millis(50);
            assert_eq!(engine.on_tick(now), TickOutcome::Idle);
        }
        assert_eq!(engine.surface().offset, rest);

        engine.on_wheel_event(1.0, 5.0, now);
        now += Duration::from_millis(50);
        assert!(matches!(engine.on_tick(now), TickOutcome::Scrolled { .. }));
    }

    #[test]
    fn test_config_changes_apply_on_next_event() {
        let store = ConfigStore::default();
        let mut engine = KineticScroller::new(store.handle(), MemorySurface::default());
        let t0 = Instant::now();

        store.update(|c| c.speed_limit = 0.01);
        engine.on_wheel_event(1.0, 10.0, t0);

        assert_eq!(engine.velocity(), 0.01);
    }

    #[test]
    fn test_set_offset_drops_momentum() {
        let mut engine = scenario_engine();
        engine.on_wheel_event(1.0, 1.0, Instant::now());
        engine.set_offset(-4);
        assert_eq!(engine.velocity(), 0.0);
        assert_eq!(engine.surface().offset, 0);
    }
}
