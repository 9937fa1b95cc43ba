use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};

use coast_core::AppConfig;
use coast_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    widgets::{DocumentWidget, StatusBarWidget},
    Document,
};

pub fn run(config: Arc<AppConfig>, files: &[PathBuf]) -> Result<()> {
    // Read everything before touching the terminal so errors print normally
    let documents = files
        .iter()
        .map(|path| Document::open(path))
        .collect::<Result<Vec<_>>>()?;

    let mut app = App::new(config);
    app.config_path = Some(AppConfig::config_path());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("coast"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let screen = Rect::new(0, 0, size.width, size.height);
    app.set_viewport_height(DocumentWidget::viewport_height(layout(screen)[0]));

    let now = Instant::now();
    for doc in documents {
        app.open(doc, now);
    }
    tracing::info!(views = app.views.len(), "Pager started");

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("Pager stopped");
    result
}

fn layout(size: Rect) -> std::rc::Rc<[Rect]> {
    // Document + status bar
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size)
}

fn event_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        // Settle callbacks and animation ticks that came due
        app.pump(Instant::now());

        terminal.draw(|frame| {
            let areas = layout(frame.area());
            app.set_viewport_height(DocumentWidget::viewport_height(areas[0]));
            DocumentWidget::render(frame, areas[0], app);
            StatusBarWidget::render(frame, areas[1], app);
        })?;

        let timeout = app.next_wakeup(Instant::now());
        if let Some(event) = event_handler.next(timeout)? {
            match event {
                AppEvent::Key(key) => handle_action(app, handle_key_event(key)),
                AppEvent::Wheel(delta) => app.on_wheel(delta, Instant::now()),
                AppEvent::Resize(_, _) => {
                    // Viewport height is refreshed on the next draw
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::NextView => app.next_view(),
        Action::PrevView => app.prev_view(),
        Action::CloseView => app.close_focused(),
        Action::LineDown => app.scroll_lines(1),
        Action::LineUp => app.scroll_lines(-1),
        Action::PageDown => app.scroll_page(1),
        Action::PageUp => app.scroll_page(-1),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::NextTunable => app.select_tunable(1),
        Action::PrevTunable => app.select_tunable(-1),
        Action::TuneUp => app.adjust_tunable(1),
        Action::TuneDown => app.adjust_tunable(-1),
        Action::ResetTuning => app.reset_tuning(),
        Action::None => {}
    }
}
