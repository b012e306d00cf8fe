use crate::app::state::*;
use crate::timer::{format_duration, Remaining, Timer, TimerState};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = matches!(state.view, View::List | View::Options);
    let title = match state.view {
        View::Options => " Timer options ",
        _ => " Timers ",
    };
    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(if focused {
            Theme::border_type_focused()
        } else {
            Theme::border_type()
        })
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    if state.filtered.is_empty() {
        let msg = if state.timers.is_empty() {
            "  No timers yet. Press Enter to create one."
        } else {
            "  No timers match the search."
        };
        frame.render_widget(Paragraph::new(msg).style(Theme::muted()).block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .filtered
        .iter()
        .filter_map(|id| state.timers.get(*id))
        .map(timer_line)
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::selected())
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn timer_line(timer: &Timer) -> Line<'static> {
    let (label, style) = match timer.state() {
        TimerState::Active => ("running", Theme::timer_active()),
        TimerState::Paused => ("paused", Theme::timer_paused()),
        TimerState::Idle => ("idle", Theme::timer_finished()),
        TimerState::Finished => ("done", Theme::timer_finished()),
    };
    let left = match timer.remaining() {
        Remaining::Running(d) | Remaining::Paused(d) => format_duration(d),
        Remaining::Inactive => "-".to_string(),
    };
    Line::from(vec![
        Span::styled(format!("{:<8}", label), style),
        Span::styled(format!("{:>9}  ", left), Theme::input_text()),
        Span::styled(timer.name().to_string(), Theme::title()),
    ])
}
