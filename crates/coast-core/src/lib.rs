pub mod config;
pub mod driver;
pub mod error;
pub mod kinetic;
pub mod registry;
pub mod settings;

pub use config::{AppConfig, KineticConfig, Tunable};
pub use driver::{spawn_view, ChannelSurface, ViewHandle};
pub use error::{Error, Result};
pub use kinetic::{KineticScroller, ScrollSurface, TickOutcome, WheelOutcome};
pub use registry::{ViewId, ViewRegistry};
pub use settings::{ConfigHandle, ConfigStore};
