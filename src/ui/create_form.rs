use crate::app::state::*;
use crate::timer::Unit;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: u16 = 10;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered(area, 48, 9);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" New timer ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Style::default().fg(Theme::ACCENT_LAVENDER))
        .style(Style::default().bg(Theme::BG_SURFACE));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.height < 5 {
        return;
    }

    let form = &state.form;
    let rows = [
        (FormField::Name, "Name", form.name.text.as_str()),
        (FormField::Length, "Length", form.length.text.as_str()),
    ];
    for (i, (field, label, text)) in rows.iter().enumerate() {
        let row = Rect::new(inner.x, inner.y + 1 + i as u16, inner.width, 1);
        let active = form.field == *field;
        let line = Line::from(vec![
            Span::styled(format!(" {:<w$}", label, w = LABEL_WIDTH as usize - 1), label_style(active)),
            Span::styled(*text, Theme::input_text()),
        ]);
        frame.render_widget(Paragraph::new(line), row);

        if active {
            let input = if *field == FormField::Name { &form.name } else { &form.length };
            let typed = input.text[..input.cursor].width() as u16;
            let x = (row.x + LABEL_WIDTH + typed).min(row.right().saturating_sub(1));
            frame.set_cursor_position((x, row.y));
        }
    }

    // Unit picker
    let unit_row = Rect::new(inner.x, inner.y + 3, inner.width, 1);
    let active = form.field == FormField::Unit;
    let mut spans = vec![Span::styled(
        format!(" {:<w$}", "Unit", w = LABEL_WIDTH as usize - 1),
        label_style(active),
    )];
    for (i, unit) in Unit::ALL.iter().enumerate() {
        let style = if i == form.unit_index {
            if active {
                Theme::selected()
            } else {
                Theme::title()
            }
        } else {
            Theme::muted()
        };
        spans.push(Span::styled(format!(" {} ", unit.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), unit_row);

    let help_row = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    let help = if active {
        " ↑↓ pick unit, Enter to start"
    } else {
        " Tab to continue"
    };
    frame.render_widget(Paragraph::new(help).style(Theme::muted()), help_row);
}

fn label_style(active: bool) -> Style {
    if active {
        Theme::key_hint()
    } else {
        Style::default().fg(Theme::TEXT_SECONDARY)
    }
}
