use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

/// The search box across the top of the screen.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.view == View::Search;
    let (border_style, border_type) = if focused {
        (Theme::border_focused(), Theme::border_type_focused())
    } else {
        (Theme::border(), Theme::border_type())
    };

    let block = Block::default()
        .title(" Search ")
        .title_style(if focused {
            Theme::title()
        } else {
            Theme::border()
        })
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = &state.search.text;
    if focused {
        let line = Line::from(vec![
            Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
            Span::styled(text.as_str(), Theme::input_text()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);

        // Chevron "❯ " is two cells wide
        let prompt_offset = 2u16;
        let typed = text[..state.search.cursor].width() as u16;
        let cursor_x = inner.x + prompt_offset + typed;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    } else if text.is_empty() {
        frame.render_widget(Paragraph::new("type to filter timers").style(Theme::muted()), inner);
    } else {
        frame.render_widget(Paragraph::new(text.as_str()).style(Theme::input_text()), inner);
    }
}
