use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use coast_core::{
    AppConfig, ConfigStore, KineticConfig, KineticScroller, ScrollSurface, TickOutcome, Tunable,
    ViewId, ViewRegistry,
};

use crate::document::{Document, LineSurface};

/// Longest the event loop blocks when nothing is animating
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Slider positions moved by one tuning key press
const TUNE_STEP: i64 = 5;

/// Application state: open documents and their kinetic engines
pub struct App {
    pub config: Arc<AppConfig>,
    pub views: ViewRegistry<LineSurface>,
    pub documents: HashMap<ViewId, Document>,
    /// Text rows available to a document view
    pub viewport_height: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Kinetic constant the tuning keys act on
    pub selected_tunable: Tunable,
    /// Where tuning changes are saved; `None` keeps them in memory
    pub config_path: Option<PathBuf>,
    store: ConfigStore,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let store = ConfigStore::new(config.kinetic.clone());
        Self {
            views: ViewRegistry::new(store.handle()),
            config,
            documents: HashMap::new(),
            viewport_height: 0,
            should_quit: false,
            status_message: None,
            selected_tunable: Tunable::SpeedLimit,
            config_path: None,
            store,
        }
    }

    /// Open a document in a new view
    pub fn open(&mut self, document: Document, now: Instant) -> ViewId {
        let surface = LineSurface::new(document.line_count(), self.viewport_height);
        let id = self.views.attach(surface, now);
        self.documents.insert(id, document);
        id
    }

    /// Close the focused view; quits when it was the last one
    pub fn close_focused(&mut self) {
        let Some(id) = self.views.focused() else {
            self.should_quit = true;
            return;
        };

        if let Err(e) = self.views.detach(id) {
            tracing::warn!("Failed to close view: {}", e);
        }
        if let Some(doc) = self.documents.remove(&id) {
            self.status_message = Some(format!(" Closed {}", doc.title));
        }
        if self.views.is_empty() {
            self.should_quit = true;
        }
    }

    pub fn focused_document(&self) -> Option<&Document> {
        self.views.focused().and_then(|id| self.documents.get(&id))
    }

    pub fn focused_engine(&self) -> Option<&KineticScroller<LineSurface>> {
        self.views.focused().and_then(|id| self.views.get(id))
    }

    fn focused_engine_mut(&mut self) -> Option<&mut KineticScroller<LineSurface>> {
        let id = self.views.focused()?;
        self.views.get_mut(id)
    }

    /// Route one wheel notch (negative = up) to the focused view
    pub fn on_wheel(&mut self, delta: f64, now: Instant) {
        let amount = self.config.ui.lines_per_notch;
        self.status_message = None;
        self.views.on_wheel_event(delta, amount, now);
    }

    /// Run due settle callbacks and ticks; returns true if anything scrolled
    pub fn pump(&mut self, now: Instant) -> bool {
        self.views
            .poll(now)
            .iter()
            .any(|(_, outcome)| matches!(outcome, TickOutcome::Scrolled { from, to } if from != to))
    }

    /// How long the event loop may block
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        self.views
            .next_wakeup(now)
            .map_or(IDLE_WAIT, |wait| wait.min(IDLE_WAIT))
    }

    /// Update the viewport and every view's scroll limit
    pub fn set_viewport_height(&mut self, height: u16) {
        if height == self.viewport_height {
            return;
        }
        self.viewport_height = height;

        let ids: Vec<ViewId> = self.views.ids().to_vec();
        for id in ids {
            let lines = self.documents.get(&id).map_or(0, Document::line_count);
            if let Some(engine) = self.views.get_mut(id) {
                engine.surface_mut().resize(lines, height);
            }
        }
    }

    pub fn next_view(&mut self) {
        self.views.cycle_focus(1);
        self.status_message = None;
    }

    pub fn prev_view(&mut self) {
        self.views.cycle_focus(-1);
        self.status_message = None;
    }

    /// Select the next (or previous, for negative `step`) tunable
    pub fn select_tunable(&mut self, step: isize) {
        let count = Tunable::ALL.len() as isize;
        let current = Tunable::ALL
            .iter()
            .position(|t| *t == self.selected_tunable)
            .unwrap_or(0) as isize;
        self.selected_tunable = Tunable::ALL[(current + step).rem_euclid(count) as usize];
        self.status_message = Some(format!(" Tuning {}", self.tuning_label()));
    }

    /// Current value and slider position of the selected tunable
    pub fn tuning_label(&self) -> String {
        let tunable = self.selected_tunable;
        let value = tunable.get(&self.store.current());
        format!("{} {} ({}%)", tunable.name(), value, tunable.position(value))
    }

    /// Move the selected tunable's slider by `steps` increments.
    ///
    /// Every open view sees the new value from its next wheel event or tick.
    pub fn adjust_tunable(&mut self, steps: i64) {
        let tunable = self.selected_tunable;
        let mut kinetic = self.store.current();
        let position = tunable.position(tunable.get(&kinetic)) as i64;
        let target = (position + steps * TUNE_STEP).clamp(0, 100);

        if let Err(e) = kinetic.set(tunable.name(), &format!("{}%", target)) {
            tracing::debug!("Rejected tuning change: {}", e);
            self.status_message = Some(format!(" {}", e));
            return;
        }

        self.apply_kinetic(kinetic);
        self.status_message = Some(format!(" Tuning {}", self.tuning_label()));
    }

    /// Restore every kinetic constant to its default
    pub fn reset_tuning(&mut self) {
        self.apply_kinetic(KineticConfig::default());
        self.status_message = Some(" Kinetic constants reset to defaults".to_string());
    }

    fn apply_kinetic(&mut self, kinetic: KineticConfig) {
        self.store.update(|current| *current = kinetic);
        Arc::make_mut(&mut self.config).kinetic = self.store.current();
        tracing::info!(tuning = %self.tuning_label(), "Kinetic constants changed");

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::warn!("Failed to save configuration: {}", e);
                self.status_message = Some(format!(" Failed to save configuration: {}", e));
            }
        }
    }

    /// Move by whole lines without momentum
    pub fn scroll_lines(&mut self, lines: i64) {
        if let Some(engine) = self.focused_engine_mut() {
            let offset = engine.surface().offset();
            engine.set_offset(offset + lines);
        }
    }

    pub fn scroll_page(&mut self, pages: i64) {
        let page = self.viewport_height.max(1) as i64;
        self.scroll_lines(page * pages);
    }

    pub fn jump_to_top(&mut self) {
        if let Some(engine) = self.focused_engine_mut() {
            engine.set_offset(0);
        }
    }

    pub fn jump_to_bottom(&mut self) {
        if let Some(engine) = self.focused_engine_mut() {
            let bottom = engine.surface().max_offset();
            engine.set_offset(bottom);
        }
    }
}
