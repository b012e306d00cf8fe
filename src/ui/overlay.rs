use crate::app::state::AppState;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

/// Transient message in the bottom-right corner, above the status bar.
pub fn render_toast(frame: &mut Frame, state: &AppState) {
    let Some(toast) = &state.toast else { return };
    let area = frame.area();

    let width = (toast.message.width() as u16 + 4).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.right().saturating_sub(width + 1);
    let y = area.bottom().saturating_sub(height + 1);
    let rect = Rect::new(x.max(area.x), y.max(area.y), width, height);

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Theme::border_focused())
        .style(Theme::toast());
    let paragraph = Paragraph::new(format!(" {}", toast.message))
        .style(Theme::toast())
        .block(block);
    frame.render_widget(paragraph, rect);
}

/// "Timer is done" dialog; captures input until dismissed.
pub fn render_completion(frame: &mut Frame, state: &AppState) {
    let Some(name) = &state.finished else { return };
    let message = format!("Timer \"{}\" is done!", name);

    let width = (message.width() as u16 + 6).max(24);
    let rect = centered(frame.area(), width, 6);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(" Done ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Theme::modal_border())
        .style(Style::default().bg(Theme::BG_SURFACE));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Theme::title())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Theme::key_hint()),
            Span::styled(" OK", Style::default().fg(Theme::TEXT_SECONDARY)),
        ]),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, rect);
}
