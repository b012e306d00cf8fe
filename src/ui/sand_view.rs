use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

/// One hourglass column per timer, side by side.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Sand ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.timers.is_empty() {
        frame.render_widget(
            Paragraph::new("  No timers. Press Esc and create one.").style(Theme::muted()),
            inner,
        );
        return;
    }

    // Grid width plus a border on each side and a gap
    let grid_width = u16::try_from(state.config.sand.width).unwrap_or(u16::MAX);
    let column_width = grid_width.saturating_add(3);
    let sand_style = Theme::sand(&state.config.sand.color);

    let mut x = inner.x;
    for timer in state.timers.iter() {
        if x.saturating_add(column_width) > inner.right() {
            break;
        }
        let column = Rect::new(x, inner.y, column_width - 1, inner.height);
        x = x.saturating_add(column_width);

        let title = truncate(timer.name(), column.width.saturating_sub(2) as usize);
        let border = if timer.is_active() {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let glass = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border);

        let frame_text = state.frames.get(&timer.id()).map(String::as_str).unwrap_or("");
        let paragraph = Paragraph::new(frame_text).style(sand_style).block(glass);
        frame.render_widget(paragraph, column);
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.width() <= max {
        return name.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in name.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}
