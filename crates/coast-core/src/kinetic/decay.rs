//! L4 Atomic Layer: Friction decay and position integration per tick

use std::time::Instant;

use crate::config::KineticConfig;

use super::state::ScrollVelocityState;
use super::surface::ScrollSurface;

/// What one animation tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First tick after a (re)start: time recorded, nothing integrated
    Synced,
    /// A scroll was requested
    Scrolled { from: i64, to: i64 },
    /// Velocity dropped below the threshold on this tick and was zeroed
    Stopped,
    /// Velocity was already zero
    Idle,
    /// The engine is not animating
    Paused,
}

/// Velocity factor applied by one idle tick
#[inline]
pub fn friction_factor(friction_exponent: f64, frame_ms: f64) -> f64 {
    (-friction_exponent * frame_ms).exp()
}

/// Advance one fixed-rate tick.
///
/// Friction only applies once the settle window has elapsed; integration
/// happens either way.
pub fn on_tick<S: ScrollSurface + ?Sized>(
    state: &mut ScrollVelocityState,
    config: &KineticConfig,
    surface: &mut S,
    now: Instant,
) -> TickOutcome {
    if state.last_tick.replace(now).is_none() {
        return TickOutcome::Synced;
    }

    let frame_ms = config.frame_interval_ms as f64;
    if !state.is_actively_scrolling {
        state.velocity *= friction_factor(config.friction_exponent, frame_ms);
    }

    if state.velocity.abs() >= config.speed_threshold {
        let from = surface.offset();
        let offset_delta = (state.velocity * frame_ms).round() as i64;
        let to = from.saturating_add(offset_delta).max(0);
        surface.set_offset(to);
        TickOutcome::Scrolled { from, to }
    } else {
        let was_moving = state.velocity != 0.0;
        state.halt();
        if was_moving {
            TickOutcome::Stopped
        } else {
            TickOutcome::Idle
        }
    }
}

/// Upper bound on idle ticks needed for `|v0|` to fall below `threshold`
pub fn ticks_to_rest(v0: f64, threshold: f64, friction_exponent: f64, frame_ms: f64) -> u64 {
    if v0.abs() < threshold {
        return 0;
    }
    ((threshold / v0.abs()).ln() / (-friction_exponent * frame_ms)).ceil() as u64
}
