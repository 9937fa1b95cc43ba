use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use coast_core::ScrollSurface;

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else if let (Some(doc), Some(engine)) = (app.focused_document(), app.focused_engine()) {
            let surface = engine.surface();
            let position = if surface.at_edge(-1.0) {
                "TOP".to_string()
            } else if surface.at_edge(1.0) {
                "BOT".to_string()
            } else {
                format!("{}/{}", surface.offset() + 1, doc.line_count())
            };

            if app.config.ui.show_velocity {
                format!(
                    " {} | {} | v={:+.4} l/ms{} | {}",
                    doc.title,
                    position,
                    engine.velocity(),
                    if engine.state().is_actively_scrolling { " *" } else { "" },
                    app.tuning_label()
                )
            } else {
                format!(" {} | {}", doc.title, position)
            }
        } else {
            " No views".to_string()
        };

        let help_hint = " q:quit tab:next x:close j/k:line t:tune +/-:adjust R:reset ";
        let padding_len = area.width.saturating_sub(
            status_text.len() as u16 + help_hint.len() as u16,
        ) as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default()
                    .fg(GruvboxMaterial::FG1)
                    .bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
