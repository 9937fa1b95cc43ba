//! L4 Atomic Layer: Wheel events to smoothed, clamped velocity
//!
//! The fixed frame interval is the time base for every wheel event, so the
//! contribution of a notch does not depend on how quickly notches arrive.

use crate::config::KineticConfig;

use super::state::ScrollVelocityState;

/// What a wheel event did to the velocity state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Zero, non-finite or out-of-order input; nothing changed
    Ignored,
    /// Direction flipped: velocity and samples were reset
    Reversed,
    /// Contribution below the speed threshold; only the direction sign was recorded
    Filtered,
    /// A sample was recorded and the velocity re-estimated
    Tracked { velocity: f64 },
}

/// Feed one wheel event into the state.
///
/// `raw_delta` must be finite; the engine filters everything else out before
/// calling this.
///
/// The direction sign is recorded for every non-zero event before the
/// threshold check, so a `Filtered` event still sets the sign that the next
/// event's reversal test compares against. Velocity and samples are untouched.
pub fn on_wheel_event(
    state: &mut ScrollVelocityState,
    config: &KineticConfig,
    raw_delta: f64,
    scroll_amount_multiplier: f64,
) -> WheelOutcome {
    if raw_delta == 0.0 {
        return WheelOutcome::Ignored;
    }

    if state.last_wheel_direction_sign * raw_delta < 0.0 {
        state.halt();
        state.last_wheel_direction_sign = raw_delta.signum();
        return WheelOutcome::Reversed;
    }
    state.last_wheel_direction_sign = raw_delta.signum();

    let frame_ms = config.frame_interval_ms as f64;
    let scroll_delta = scroll_amount_multiplier * raw_delta * config.scroll_multiplier;
    let delta_v = scroll_delta / frame_ms;
    if delta_v.abs() < config.speed_threshold {
        return WheelOutcome::Filtered;
    }

    let old_velocity = state.velocity;
    state
        .recent_samples
        .push(old_velocity + delta_v, config.sample_history_capacity);

    let mut velocity = state.recent_samples.average();
    velocity = clamp_acceleration(old_velocity, velocity, config.acceleration_limit, frame_ms);
    velocity = clamp_speed(velocity, config.speed_limit);

    if velocity.abs() < config.speed_threshold {
        state.halt();
    } else {
        state.velocity = velocity;
    }

    WheelOutcome::Tracked {
        velocity: state.velocity,
    }
}

/// Limit the change from `old` to `new` to `limit` per millisecond over one frame
#[inline]
pub fn clamp_acceleration(old: f64, new: f64, limit: f64, frame_ms: f64) -> f64 {
    let acc = (new - old) / frame_ms;
    if acc.abs() > limit {
        old + limit * frame_ms * acc.signum()
    } else {
        new
    }
}

#[inline]
pub fn clamp_speed(velocity: f64, limit: f64) -> f64 {
    if velocity.abs() > limit {
        limit * velocity.signum()
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> KineticConfig {
        KineticConfig {
            speed_threshold: 0.0005,
            speed_limit: 25.0,
            acceleration_limit: 5.0,
            friction_exponent: 0.005,
            scroll_multiplier: 1.0,
            frame_interval_ms: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_notch_sets_velocity() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);

        let outcome = on_wheel_event(&mut state, &config, 1.0, 1.0);

        assert_eq!(outcome, WheelOutcome::Tracked { velocity: 0.02 });
        assert!((state.velocity - 0.02).abs() < 1e-12);
        assert_eq!(state.recent_samples.len(), 1);
    }

    #[test]
    fn test_reversal_resets() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);
        on_wheel_event(&mut state, &config, 1.0, 1.0);

        let outcome = on_wheel_event(&mut state, &config, -1.0, 1.0);

        assert_eq!(outcome, WheelOutcome::Reversed);
        assert_eq!(state.velocity, 0.0);
        assert!(state.recent_samples.is_empty());
        assert_eq!(state.last_wheel_direction_sign, -1.0);
    }

    #[test]
    fn test_alternating_deltas_always_zero() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);
        on_wheel_event(&mut state, &config, 2.0, 1.0);

        for i in 0..8 {
            let delta = if i % 2 == 0 { -2.0 } else { 2.0 };
            on_wheel_event(&mut state, &config, delta, 1.0);
            assert_eq!(state.velocity, 0.0);
            assert!(state.recent_samples.is_empty());
        }
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);
        on_wheel_event(&mut state, &config, 1.0, 1.0);

        assert_eq!(on_wheel_event(&mut state, &config, 0.0, 1.0), WheelOutcome::Ignored);
        assert!((state.velocity - 0.02).abs() < 1e-12);
        assert_eq!(state.last_wheel_direction_sign, 1.0);
    }

    #[test]
    fn test_tiny_delta_filtered() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);
        on_wheel_event(&mut state, &config, 1.0, 1.0);
        let before = state.velocity;

        // 0.01 / 50 = 0.0002 < 0.0005
        let outcome = on_wheel_event(&mut state, &config, 0.01, 1.0);

        assert_eq!(outcome, WheelOutcome::Filtered);
        assert_eq!(state.velocity, before);
        assert_eq!(state.recent_samples.len(), 1);
    }

    #[test]
    fn test_filtered_event_still_records_direction() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);

        assert_eq!(on_wheel_event(&mut state, &config, 0.01, 1.0), WheelOutcome::Filtered);
        assert_eq!(state.last_wheel_direction_sign, 1.0);
        assert_eq!(state.velocity, 0.0);
        assert!(state.recent_samples.is_empty());

        // The next opposite notch counts as a reversal and contributes nothing
        assert_eq!(on_wheel_event(&mut state, &config, -1.0, 1.0), WheelOutcome::Reversed);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_history_bounded() {
        let config = KineticConfig {
            sample_history_capacity: 4,
            ..scenario_config()
        };
        let mut state = ScrollVelocityState::new(4);

        for _ in 0..4 + 6 {
            on_wheel_event(&mut state, &config, 1.0, 1.0);
        }

        assert_eq!(state.recent_samples.len(), 4);
    }

    #[test]
    fn test_smoothing_averages_samples() {
        let config = scenario_config();
        let mut state = ScrollVelocityState::new(10);

        on_wheel_event(&mut state, &config, 1.0, 1.0);
        on_wheel_event(&mut state, &config, 1.0, 1.0);

        // samples: [0.02, 0.04] -> mean 0.03
        assert!((state.velocity - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_acceleration_clamped() {
        let config = KineticConfig {
            acceleration_limit: 0.0001,
            ..scenario_config()
        };
        let mut state = ScrollVelocityState::new(10);

        for _ in 0..20 {
            let before = state.velocity;
            on_wheel_event(&mut state, &config, 3.0, 4.0);
            let acc = (state.velocity - before) / 50.0;
            assert!(acc.abs() <= config.acceleration_limit + 1e-12);
        }
        assert!(state.velocity > 0.0);
    }

    #[test]
    fn test_speed_clamped() {
        let config = KineticConfig {
            speed_limit: 0.5,
            ..scenario_config()
        };
        let mut state = ScrollVelocityState::new(10);

        for _ in 0..30 {
            on_wheel_event(&mut state, &config, -10.0, 10.0);
            assert!(state.velocity.abs() <= 0.5);
        }
        assert_eq!(state.velocity, -0.5);
    }

    #[test]
    fn test_clamp_helpers() {
        assert_eq!(clamp_speed(30.0, 25.0), 25.0);
        assert_eq!(clamp_speed(-30.0, 25.0), -25.0);
        assert_eq!(clamp_speed(3.0, 25.0), 3.0);
        assert!((clamp_acceleration(0.0, 1.0, 0.001, 50.0) - 0.05).abs() < 1e-12);
        assert!((clamp_acceleration(1.0, 0.0, 0.001, 50.0) - 0.95).abs() < 1e-12);
        assert_eq!(clamp_acceleration(0.0, 0.01, 0.001, 50.0), 0.01);
    }
}
