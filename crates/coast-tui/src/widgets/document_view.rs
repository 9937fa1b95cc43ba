use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use coast_core::ScrollSurface;

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct DocumentWidget;

impl DocumentWidget {
    /// Rows of text a document block of this size can show
    pub fn viewport_height(area: Rect) -> u16 {
        area.height.saturating_sub(2)
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let block = Block::default()
            .title(Self::tab_titles(app))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(GruvboxMaterial::ACCENT))
            .style(Style::default().bg(GruvboxMaterial::BG0));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let (Some(doc), Some(engine)) = (app.focused_document(), app.focused_engine()) else {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No document open",
                Style::default().fg(GruvboxMaterial::GREY1),
            )));
            frame.render_widget(empty, inner_area);
            return;
        };

        // Slice instead of Paragraph::scroll, which is limited to u16 rows
        let offset = engine.surface().offset().max(0) as usize;
        let lines: Vec<Line> = doc
            .lines
            .iter()
            .skip(offset)
            .take(inner_area.height as usize)
            .map(|l| {
                Line::from(Span::styled(
                    l.as_str(),
                    Style::default().fg(GruvboxMaterial::FG0),
                ))
            })
            .collect();

        frame.render_widget(Paragraph::new(Text::from(lines)), inner_area);
    }

    fn tab_titles(app: &App) -> Line<'static> {
        let focused = app.views.focused();
        let spans: Vec<Span> = app
            .views
            .ids()
            .iter()
            .filter_map(|id| {
                let doc = app.documents.get(id)?;
                let style = if Some(*id) == focused {
                    Style::default()
                        .fg(GruvboxMaterial::BG0)
                        .bg(GruvboxMaterial::ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(GruvboxMaterial::GREY2)
                };
                Some(Span::styled(format!(" {} ", doc.title), style))
            })
            .collect();
        Line::from(spans)
    }
}
