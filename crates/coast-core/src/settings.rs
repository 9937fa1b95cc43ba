//! Live, process-wide kinetic configuration
//!
//! One `ConfigStore` owns the current `KineticConfig`; every engine holds a
//! cheap `ConfigHandle` and re-reads it at the start of each wheel event and
//! tick, so edits become visible at the next tick boundary.

use tokio::sync::watch;

use crate::config::KineticConfig;

/// Writer side of the shared configuration
#[derive(Debug)]
pub struct ConfigStore {
    tx: watch::Sender<KineticConfig>,
}

/// Reader side of the shared configuration
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    rx: watch::Receiver<KineticConfig>,
}

impl ConfigStore {
    pub fn new(config: KineticConfig) -> Self {
        let (tx, _rx) = watch::channel(config.validated());
        Self { tx }
    }

    pub fn handle(&self) -> ConfigHandle {
        ConfigHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Replace the configuration, clamping invalid values
    pub fn replace(&self, config: KineticConfig) {
        self.tx.send_replace(config.validated());
        tracing::debug!("Kinetic configuration replaced");
    }

    /// Edit the configuration in place, clamping invalid values afterwards
    pub fn update(&self, edit: impl FnOnce(&mut KineticConfig)) {
        let mut config = self.tx.borrow().clone();
        edit(&mut config);
        self.replace(config);
    }

    pub fn current(&self) -> KineticConfig {
        self.tx.borrow().clone()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(KineticConfig::default())
    }
}

impl ConfigHandle {
    /// Snapshot of the configuration as of now
    #[inline]
    pub fn current(&self) -> KineticConfig {
        self.rx.borrow().clone()
    }

    /// Handle pinned to a fixed configuration, for tests and one-off tools
    pub fn fixed(config: KineticConfig) -> Self {
        ConfigStore::new(config).handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_see_updates() {
        let store = ConfigStore::default();
        let handle = store.handle();
        let other = handle.clone();

        store.update(|c| c.speed_limit = 40.0);

        assert_eq!(handle.current().speed_limit, 40.0);
        assert_eq!(other.current().speed_limit, 40.0);
    }

    #[test]
    fn test_updates_are_validated() {
        let store = ConfigStore::default();
        store.update(|c| c.friction_exponent = -1.0);
        assert_eq!(store.current().friction_exponent, 0.005);
    }

    #[test]
    fn test_fixed_handle_outlives_store() {
        let handle = ConfigHandle::fixed(KineticConfig {
            speed_limit: 9.0,
            ..Default::default()
        });
        assert_eq!(handle.current().speed_limit, 9.0);
    }
}
