use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    CloseView,
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    NextTunable,
    PrevTunable,
    TuneUp,
    TuneDown,
    ResetTuning,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('f') if ctrl => Action::PageDown,
        KeyCode::Char('b') if ctrl => Action::PageUp,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::Char('l') => Action::NextView,
        KeyCode::BackTab | KeyCode::Char('h') => Action::PrevView,
        KeyCode::Char('x') => Action::CloseView,
        KeyCode::Char('j') | KeyCode::Down => Action::LineDown,
        KeyCode::Char('k') | KeyCode::Up => Action::LineUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::JumpToTop,
        KeyCode::Char('G') | KeyCode::End => Action::JumpToBottom,
        KeyCode::Char('t') => Action::NextTunable,
        KeyCode::Char('T') => Action::PrevTunable,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::TuneUp,
        KeyCode::Char('-') => Action::TuneDown,
        KeyCode::Char('R') => Action::ResetTuning,
        _ => Action::None,
    }
}
