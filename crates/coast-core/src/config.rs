use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub kinetic: KineticConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Physical constants of the kinetic scroll model.
///
/// Velocities are in position units (lines) per millisecond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticConfig {
    /// Speed below which motion counts as stopped
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold: f64,
    /// Maximum absolute velocity
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f64,
    /// Maximum absolute change of velocity per millisecond
    #[serde(default = "default_acceleration_limit")]
    pub acceleration_limit: f64,
    /// Decay rate constant of the exponential friction law
    #[serde(default = "default_friction_exponent")]
    pub friction_exponent: f64,
    /// Scales raw wheel deltas into velocity contributions
    #[serde(default = "default_scroll_multiplier")]
    pub scroll_multiplier: f64,
    /// Number of recent velocity samples averaged together
    #[serde(default = "default_sample_history_capacity")]
    pub sample_history_capacity: usize,
    /// Fixed animation tick period
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Quiet time after the last wheel event before friction resumes
    #[serde(default = "default_settle_window")]
    pub settle_window_ms: u64,
}

impl Default for KineticConfig {
    fn default() -> Self {
        Self {
            speed_threshold: default_speed_threshold(),
            speed_limit: default_speed_limit(),
            acceleration_limit: default_acceleration_limit(),
            friction_exponent: default_friction_exponent(),
            scroll_multiplier: default_scroll_multiplier(),
            sample_history_capacity: default_sample_history_capacity(),
            frame_interval_ms: default_frame_interval(),
            settle_window_ms: default_settle_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Lines scrolled by one wheel notch, before kinetic scaling
    #[serde(default = "default_lines_per_notch")]
    pub lines_per_notch: f64,
    /// Show velocity and offset in the status bar
    #[serde(default = "default_true")]
    pub show_velocity: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            lines_per_notch: default_lines_per_notch(),
            show_velocity: default_true(),
        }
    }
}

fn default_speed_threshold() -> f64 {
    0.0005
}

fn default_speed_limit() -> f64 {
    25.0
}

fn default_acceleration_limit() -> f64 {
    5.0
}

fn default_friction_exponent() -> f64 {
    0.005
}

fn default_scroll_multiplier() -> f64 {
    1.0
}

fn default_sample_history_capacity() -> usize {
    10
}

fn default_frame_interval() -> u64 {
    50 // 20 Hz
}

fn default_settle_window() -> u64 {
    150
}

fn default_lines_per_notch() -> f64 {
    3.0
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coast")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// The floating point constants exposed as sliders in the settings UI.
///
/// A slider position is a percentage of the tunable's maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tunable {
    SpeedThreshold,
    SpeedLimit,
    AccelerationLimit,
    FrictionExponent,
    ScrollMultiplier,
}

impl Tunable {
    pub const ALL: [Tunable; 5] = [
        Tunable::SpeedThreshold,
        Tunable::SpeedLimit,
        Tunable::AccelerationLimit,
        Tunable::FrictionExponent,
        Tunable::ScrollMultiplier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tunable::SpeedThreshold => "speed_threshold",
            Tunable::SpeedLimit => "speed_limit",
            Tunable::AccelerationLimit => "acceleration_limit",
            Tunable::FrictionExponent => "friction_exponent",
            Tunable::ScrollMultiplier => "scroll_multiplier",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn default_value(self) -> f64 {
        match self {
            Tunable::SpeedThreshold => default_speed_threshold(),
            Tunable::SpeedLimit => default_speed_limit(),
            Tunable::AccelerationLimit => default_acceleration_limit(),
            Tunable::FrictionExponent => default_friction_exponent(),
            Tunable::ScrollMultiplier => default_scroll_multiplier(),
        }
    }

    /// Upper end of the slider range
    pub fn max_value(self) -> f64 {
        match self {
            Tunable::SpeedThreshold => 0.001,
            Tunable::SpeedLimit => 100.0,
            Tunable::AccelerationLimit => 10.0,
            Tunable::FrictionExponent => 0.015,
            Tunable::ScrollMultiplier => 100.0,
        }
    }

    /// Slider position (0-100) of a value
    pub fn position(self, value: f64) -> u32 {
        (100.0 * value / self.max_value()).round().max(0.0) as u32
    }

    /// Value at a slider position (0-100)
    pub fn value_at(self, position: u32) -> f64 {
        self.max_value() * position as f64 / 100.0
    }

    pub fn get(self, config: &KineticConfig) -> f64 {
        match self {
            Tunable::SpeedThreshold => config.speed_threshold,
            Tunable::SpeedLimit => config.speed_limit,
            Tunable::AccelerationLimit => config.acceleration_limit,
            Tunable::FrictionExponent => config.friction_exponent,
            Tunable::ScrollMultiplier => config.scroll_multiplier,
        }
    }

    fn slot(self, config: &mut KineticConfig) -> &mut f64 {
        match self {
            Tunable::SpeedThreshold => &mut config.speed_threshold,
            Tunable::SpeedLimit => &mut config.speed_limit,
            Tunable::AccelerationLimit => &mut config.acceleration_limit,
            Tunable::FrictionExponent => &mut config.friction_exponent,
            Tunable::ScrollMultiplier => &mut config.scroll_multiplier,
        }
    }
}

impl KineticConfig {
    /// Fixed tick period as Duration
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    #[inline]
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Replace every out-of-range value with a safe one.
    ///
    /// Non-positive or non-finite constants fall back to their defaults and the
    /// settle window is raised to at least one frame.
    pub fn validated(mut self) -> Self {
        for tunable in Tunable::ALL {
            let slot = tunable.slot(&mut self);
            if !(slot.is_finite() && *slot > 0.0) {
                tracing::warn!(
                    setting = tunable.name(),
                    value = *slot,
                    "Invalid kinetic setting, using default"
                );
                *slot = tunable.default_value();
            }
        }

        if self.sample_history_capacity == 0 {
            tracing::warn!("sample_history_capacity must be at least 1, using default");
            self.sample_history_capacity = default_sample_history_capacity();
        }
        if self.frame_interval_ms == 0 {
            tracing::warn!("frame_interval_ms must be positive, using default");
            self.frame_interval_ms = default_frame_interval();
        }
        if self.settle_window_ms < self.frame_interval_ms {
            tracing::warn!(
                settle_window_ms = self.settle_window_ms,
                frame_interval_ms = self.frame_interval_ms,
                "Settle window shorter than one frame, raising it"
            );
            self.settle_window_ms = self.frame_interval_ms;
        }

        self
    }

    /// Set a value by its setting name.
    ///
    /// Floating point tunables also accept a slider position such as `40%`.
    /// Unlike `validated`, out-of-range values are rejected here.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if let Some(tunable) = Tunable::from_name(key) {
            let parsed = match value.strip_suffix('%') {
                Some(pos) => {
                    let pos: u32 = pos
                        .trim()
                        .parse()
                        .map_err(|_| invalid("slider position must be an integer percentage"))?;
                    if pos > 100 {
                        return Err(invalid("slider position must be between 0% and 100%"));
                    }
                    tunable.value_at(pos)
                }
                None => value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid("expected a number"))?,
            };
            if !(parsed.is_finite() && parsed > 0.0) {
                return Err(invalid("must be a positive number"));
            }
            *tunable.slot(self) = parsed;
            return Ok(());
        }

        let parsed: u64 = value
            .trim()
            .parse()
            .map_err(|_| invalid("expected a positive integer"))?;
        if parsed == 0 {
            return Err(invalid("must be at least 1"));
        }

        match key {
            "sample_history_capacity" => self.sample_history_capacity = parsed as usize,
            "frame_interval_ms" => {
                if parsed > self.settle_window_ms {
                    return Err(invalid("must not exceed settle_window_ms"));
                }
                self.frame_interval_ms = parsed;
            }
            "settle_window_ms" => {
                if parsed < self.frame_interval_ms {
                    return Err(invalid("must be at least frame_interval_ms"));
                }
                self.settle_window_ms = parsed;
            }
            _ => return Err(Error::UnknownKey(key.to_string())),
        }

        Ok(())
    }
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration text, clamping invalid kinetic constants
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.kinetic = config.kinetic.validated();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Reset the kinetic constants to their defaults
    pub fn reset_defaults(&mut self) {
        self.kinetic = KineticConfig::default();
    }

    /// Get the configuration file path
    /// Always uses ~/.config/coast/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("coast")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("coast.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
