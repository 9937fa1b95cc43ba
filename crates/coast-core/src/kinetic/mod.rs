//! Kinetic (inertial) scrolling driven by discrete wheel events
//!
//! Wheel notches feed a smoothed, clamped velocity; a fixed-rate tick decays
//! that velocity with exponential friction and integrates it into the scroll
//! offset.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `state` - Velocity state and the bounded sample history
//! - `velocity` - Wheel event to velocity (threshold, smoothing, clamps)
//! - `decay` - Friction decay and offset integration per tick
//! - `surface` - The scroll surface trait
//! - `clock` - Fixed-rate tick source for poll-driven hosts
//!
//! ## L3 Molecular Layer
//! - `engine` - Per-view engine combining atoms with the settle window and
//!   the animation lifecycle
//!
//! # Usage
//!
//! ```ignore
//! use coast_core::kinetic::{KineticScroller, MemorySurface};
//! use coast_core::settings::ConfigStore;
//!
//! let store = ConfigStore::default();
//! let mut engine = KineticScroller::new(store.handle(), MemorySurface::default());
//! engine.start_animating();
//!
//! // On every wheel event
//! engine.on_wheel_event(1.0, 3.0, Instant::now());
//!
//! // When the settle deadline passes, and every frame interval
//! engine.poll_settle(Instant::now());
//! engine.on_tick(Instant::now());
//! ```

// L4 Atomic Layer
pub mod clock;
pub mod decay;
pub mod state;
pub mod surface;
pub mod velocity;

// L3 Molecular Layer
pub mod engine;

// Re-exports for convenient access
pub use clock::FrameClock;
pub use decay::TickOutcome;
pub use engine::{AnimationState, KineticScroller};
pub use state::{SampleHistory, ScrollVelocityState};
pub use surface::{MemorySurface, ScrollSurface};
pub use velocity::WheelOutcome;
