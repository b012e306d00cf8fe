use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    for hint in state.guidance() {
        // "[key] label" renders the key part highlighted
        match hint.split_once(' ') {
            Some((key, label)) => {
                parts.push(Span::styled(format!(" {}", key), Theme::key_hint().bg(Theme::BG_SURFACE)));
                parts.push(Span::styled(format!(" {} ", label), Theme::status_bar()));
            }
            None => parts.push(Span::styled(format!(" {} ", hint), Theme::status_bar())),
        }
    }

    // Timer count on the right
    let view_name = match state.view {
        View::Search => "SEARCH",
        View::List => "LIST",
        View::Options => "OPTIONS",
        View::Create => "CREATE",
        View::Sand => "SAND",
    };
    let right = format!(" {} timers [{}] ", state.timers.len(), view_name);

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + right.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        right,
        Style::default().fg(Theme::ACCENT_TEAL).bg(Theme::BG_SURFACE),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
