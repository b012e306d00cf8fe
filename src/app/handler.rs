use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::timer::{TimerError, Unit};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;
use tracing::{debug, warn};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::TimerExpired { id, name } => {
            match state.timers.expire(id) {
                Ok(name) => {
                    state.notify(format!("timer \"{}\" finished", name));
                    state.finished = Some(name);
                    state.pending_bell = true;
                    state.refresh_list();
                }
                Err(e) => warn!(id, name = name.as_str(), error = %e, "expiry for unknown timer"),
            }
            vec![]
        }
        AppEvent::SandFrame { id, frame } => {
            // Loops may still deliver a frame or two after the view closed.
            if state.view == View::Sand {
                state.frames.insert(id, frame);
                state.dirty = true;
            }
            vec![]
        }
        AppEvent::Tick => {
            state.expire_toast(Instant::now());
            // Remaining times in the list count down between key presses
            if state.view != View::Sand && !state.filtered.is_empty() {
                state.dirty = true;
            }
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    // Completion modal captures all input when visible
    if state.finished.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.finished = None;
        }
        return vec![];
    }

    match state.view {
        View::Search => handle_search_key(state, key),
        View::List => handle_list_key(state, key),
        View::Options => handle_options_key(state, key),
        View::Create => handle_create_key(state, key),
        View::Sand => handle_sand_key(state, key),
    }
}

fn handle_search_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Enter => {
            if state.timers.is_empty() {
                open_create(state);
            } else {
                state.view = View::List;
                state.refresh_list();
            }
            vec![]
        }
        KeyCode::Esc => {
            state.frames.clear();
            state.view = View::Sand;
            vec![Action::StartAnimations]
        }
        KeyCode::Backspace => {
            state.search.delete_back();
            state.refresh_list();
            vec![]
        }
        KeyCode::Left => {
            state.search.move_left();
            vec![]
        }
        KeyCode::Right => {
            state.search.move_right();
            vec![]
        }
        KeyCode::Home => {
            state.search.move_home();
            vec![]
        }
        KeyCode::End => {
            state.search.move_end();
            vec![]
        }
        KeyCode::Char(c) => {
            state.search.insert_char(c);
            state.refresh_list();
            vec![]
        }
        _ => vec![],
    }
}

fn handle_list_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Up => {
            state.select_prev();
            vec![]
        }
        KeyCode::Down => {
            state.select_next();
            vec![]
        }
        KeyCode::Enter => {
            if state.selected_id().is_some() {
                state.view = View::Options;
            }
            vec![]
        }
        KeyCode::Esc => {
            state.view = View::Search;
            vec![]
        }
        KeyCode::Char('c') => {
            open_create(state);
            vec![]
        }
        KeyCode::Char('s') => {
            if let (Some(id), Some(name)) = (state.selected_id(), state.selected_name()) {
                let result = state.timers.stop(id);
                report(state, result, format!("timer \"{}\" stopped", name));
            }
            vec![]
        }
        KeyCode::Char('q') => vec![Action::Quit],
        _ => vec![],
    }
}

fn handle_options_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Act on the highlighted row by id; names may repeat.
    let (Some(id), Some(name)) = (state.selected_id(), state.selected_name()) else {
        state.view = View::List;
        return vec![];
    };
    match key.code {
        KeyCode::Char('p') => {
            let result = state.timers.pause(id);
            report(state, result, format!("timer \"{}\" paused", name));
        }
        KeyCode::Char('r') => {
            let result = state.timers.resume(id);
            report(state, result, format!("timer \"{}\" resumed", name));
        }
        KeyCode::Char('s') => {
            let message = match state.timers.query_remaining(id) {
                Ok(remaining) => remaining.message(&name),
                Err(e) => e.to_string(),
            };
            state.notify(message);
        }
        KeyCode::Esc => state.view = View::List,
        _ => {}
    }
    vec![]
}

fn handle_create_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Esc => {
            state.form.reset();
            state.view = if state.timers.is_empty() {
                View::Search
            } else {
                View::List
            };
        }
        KeyCode::Tab => advance_field(state),
        KeyCode::BackTab => {
            state.form.field = match state.form.field {
                FormField::Name => FormField::Name,
                FormField::Length => FormField::Name,
                FormField::Unit => FormField::Length,
            };
        }
        KeyCode::Enter if state.form.field == FormField::Unit => submit_form(state),
        KeyCode::Enter => advance_field(state),
        KeyCode::Up if state.form.field == FormField::Unit => {
            let n = Unit::ALL.len();
            state.form.unit_index = (state.form.unit_index + n - 1) % n;
        }
        KeyCode::Down if state.form.field == FormField::Unit => {
            state.form.unit_index = (state.form.unit_index + 1) % Unit::ALL.len();
        }
        code => {
            if let Some(input) = state.form.active_input() {
                match code {
                    KeyCode::Char(c) => input.insert_char(c),
                    KeyCode::Backspace => input.delete_back(),
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Home => input.move_home(),
                    KeyCode::End => input.move_end(),
                    _ => {}
                }
            }
        }
    }
    vec![]
}

fn handle_sand_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.code == KeyCode::Esc {
        state.view = View::Search;
        state.frames.clear();
        return vec![Action::StopAnimations];
    }
    vec![]
}

fn open_create(state: &mut AppState) {
    state.form.reset();
    state.view = View::Create;
}

/// Move to the next form field if the current one is valid.
fn advance_field(state: &mut AppState) {
    let form = &mut state.form;
    form.field = match form.field {
        FormField::Name if !form.name.text.trim().is_empty() => FormField::Length,
        FormField::Length if form.length.text.trim().parse::<u64>().is_ok() => FormField::Unit,
        FormField::Unit => FormField::Name,
        unchanged => unchanged,
    };
}

fn submit_form(state: &mut AppState) {
    let name = state.form.name.text.trim().to_string();
    let Ok(length) = state.form.length.text.trim().parse::<u64>() else {
        state.form.field = FormField::Length;
        return;
    };
    if name.is_empty() {
        state.form.field = FormField::Name;
        return;
    }
    let unit = state.form.unit();

    match state.timers.create(&name, length, unit) {
        Ok(id) => {
            state.form.reset();
            state.search.clear();
            state.view = View::List;
            state.refresh_list();
            if let Some(pos) = state.filtered.iter().position(|t| *t == id) {
                state.selected = pos;
            }
            state.notify(format!("timer \"{}\" created", name));
        }
        Err(e) => {
            debug!(error = %e, "create rejected");
            state.notify(e.to_string());
        }
    }
}

fn report(state: &mut AppState, result: Result<(), TimerError>, success: String) {
    match result {
        Ok(()) => state.notify(success),
        Err(e) => state.notify(e.to_string()),
    }
    state.refresh_list();
}
