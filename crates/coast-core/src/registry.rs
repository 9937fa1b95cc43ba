//! Per-view engine registry for single-threaded hosts
//!
//! Each open view gets its own `KineticScroller`, created and started on
//! attach and stopped and dropped on detach. Wheel events only reach the
//! focused view. All views share one `FrameClock`, which runs while at least
//! one engine is animating.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::kinetic::{FrameClock, KineticScroller, ScrollSurface, TickOutcome, WheelOutcome};
use crate::settings::ConfigHandle;
use crate::{Error, Result};

/// Identity of one scrollable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct ViewRegistry<S> {
    config: ConfigHandle,
    engines: HashMap<ViewId, KineticScroller<S>>,
    /// Attach order, for hosts that display views as tabs
    order: Vec<ViewId>,
    focused: Option<ViewId>,
    clock: FrameClock,
}

impl<S: ScrollSurface> ViewRegistry<S> {
    pub fn new(config: ConfigHandle) -> Self {
        Self {
            config,
            engines: HashMap::new(),
            order: Vec::new(),
            focused: None,
            clock: FrameClock::new(),
        }
    }

    /// Create an engine for a newly opened view and start animating it.
    ///
    /// The first attached view takes focus.
    pub fn attach(&mut self, surface: S, now: Instant) -> ViewId {
        let id = ViewId::new();
        let mut engine = KineticScroller::new(self.config.clone(), surface);
        engine.start_animating();
        self.engines.insert(id, engine);
        self.order.push(id);
        self.clock.start(now);

        if self.focused.is_none() {
            self.focused = Some(id);
        }

        info!(view = %id, views = self.engines.len(), "View attached");
        id
    }

    /// Stop and discard a view's engine, handing back its surface
    pub fn detach(&mut self, id: ViewId) -> Result<S> {
        let mut engine = self
            .engines
            .remove(&id)
            .ok_or_else(|| Error::ViewNotFound(id.to_string()))?;
        engine.stop_animating();

        let index = self.order.iter().position(|v| *v == id);
        self.order.retain(|v| *v != id);

        if self.focused == Some(id) {
            // Prefer the neighbour that took the closed view's place
            self.focused = index
                .and_then(|i| self.order.get(i.min(self.order.len().saturating_sub(1))))
                .copied();
        }
        if !self.engines.values().any(|e| e.is_animating()) {
            self.clock.stop();
        }

        info!(view = %id, views = self.engines.len(), "View detached");
        Ok(engine.into_surface())
    }

    pub fn focus(&mut self, id: ViewId) -> Result<()> {
        if !self.engines.contains_key(&id) {
            return Err(Error::ViewNotFound(id.to_string()));
        }
        if self.focused != Some(id) {
            debug!(view = %id, "Focus changed");
            self.focused = Some(id);
        }
        Ok(())
    }

    /// Move focus `step` views along the attach order, wrapping around
    pub fn cycle_focus(&mut self, step: isize) -> Option<ViewId> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len() as isize;
        let current = self
            .focused
            .and_then(|id| self.order.iter().position(|v| *v == id))
            .unwrap_or(0) as isize;
        let next = self.order[(current + step).rem_euclid(len) as usize];
        self.focused = Some(next);
        Some(next)
    }

    #[inline]
    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    /// Route a wheel event to the focused view
    pub fn on_wheel_event(
        &mut self,
        raw_delta: f64,
        scroll_amount_multiplier: f64,
        now: Instant,
    ) -> Option<(ViewId, WheelOutcome)> {
        let id = self.focused?;
        let engine = self.engines.get_mut(&id)?;
        Some((id, engine.on_wheel_event(raw_delta, scroll_amount_multiplier, now)))
    }

    /// Fire due settle callbacks, then a tick if one is due.
    ///
    /// Returns the tick outcome of every animating view when a tick fired.
    pub fn poll(&mut self, now: Instant) -> Vec<(ViewId, TickOutcome)> {
        for engine in self.engines.values_mut() {
            engine.poll_settle(now);
        }

        let period = self.config.current().frame_interval();
        if !self.clock.poll(now, period) {
            return Vec::new();
        }

        self.order
            .iter()
            .filter_map(|id| {
                let engine = self.engines.get_mut(id)?;
                engine
                    .is_animating()
                    .then(|| (*id, engine.on_tick(now)))
            })
            .collect()
    }

    /// How long the host may sleep before the next tick or settle deadline
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let settle = self
            .engines
            .values()
            .filter_map(|e| e.settle_deadline())
            .min()
            .map(|deadline| deadline.saturating_duration_since(now));
        match (self.clock.time_until_tick(now), settle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn get(&self, id: ViewId) -> Option<&KineticScroller<S>> {
        self.engines.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut KineticScroller<S>> {
        self.engines.get_mut(&id)
    }

    /// View ids in attach order
    pub fn ids(&self) -> &[ViewId] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
