use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// Event handler for terminal events
///
/// Unlike a fixed tick rate, the wait time is chosen per call so the loop
/// wakes up exactly when the next animation tick or settle deadline is due.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Poll for the next event, waiting at most `timeout`
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(wheel_delta(&mouse).map(AppEvent::Wheel)),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Terminals report one event per notch; down is positive
fn wheel_delta(mouse: &MouseEvent) -> Option<f64> {
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(1.0),
        MouseEventKind::ScrollUp => Some(-1.0),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel notch, signed
    Wheel(f64),
    /// Terminal was resized
    Resize(u16, u16),
    /// Poll timed out; time to advance animations
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(wheel_delta(&mouse(MouseEventKind::ScrollDown)), Some(1.0));
        assert_eq!(wheel_delta(&mouse(MouseEventKind::ScrollUp)), Some(-1.0));
        assert_eq!(wheel_delta(&mouse(MouseEventKind::Moved)), None);
    }
}
