use crate::app::event::{AppEvent, TimerId};
use crate::config::AppConfig;
use crate::timer::{Registry, Unit};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Which screen has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Typing into the search box filters the list.
    Search,
    /// Moving through the (filtered) timer list.
    List,
    /// A timer is selected; pause/resume/show act on it.
    Options,
    Create,
    Sand,
}

#[derive(Debug)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Length,
    Unit,
}

/// The three-step "new timer" form.
#[derive(Debug)]
pub struct CreateForm {
    pub name: InputState,
    pub length: InputState,
    pub unit_index: usize,
    pub field: FormField,
}

impl CreateForm {
    pub fn new() -> Self {
        Self {
            name: InputState::new(),
            length: InputState::new(),
            unit_index: 0,
            field: FormField::Name,
        }
    }

    pub fn unit(&self) -> Unit {
        Unit::ALL.get(self.unit_index).copied().unwrap_or(Unit::Second)
    }

    pub fn active_input(&mut self) -> Option<&mut InputState> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Length => Some(&mut self.length),
            FormField::Unit => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub timers: Registry,
    pub view: View,
    pub search: InputState,
    /// Ids shown in the list, in registry order.
    pub filtered: Vec<TimerId>,
    pub selected: usize,
    pub form: CreateForm,
    pub toast: Option<Toast>,
    /// Name of a timer whose completion modal is open.
    pub finished: Option<String>,
    /// Latest rendered sand frame per timer.
    pub frames: HashMap<TimerId, String>,
    pub pending_bell: bool,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let timers = Registry::new(event_tx, config.sand.clone());
        Self {
            config,
            timers,
            view: View::Search,
            search: InputState::new(),
            filtered: Vec::new(),
            selected: 0,
            form: CreateForm::new(),
            toast: None,
            finished: None,
            frames: HashMap::new(),
            pending_bell: false,
            should_quit: false,
            dirty: true,
        }
    }

    /// Recompute the list from the search box.
    pub fn refresh_list(&mut self) {
        self.filtered = self.timers.search(&self.search.text);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
        self.dirty = true;
    }

    pub fn selected_id(&self) -> Option<TimerId> {
        self.filtered.get(self.selected).copied()
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected_id()
            .and_then(|id| self.timers.get(id))
            .map(|t| t.name().to_string())
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
            self.dirty = true;
        }
    }

    pub fn select_prev(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = if self.selected == 0 {
                self.filtered.len() - 1
            } else {
                self.selected - 1
            };
            self.dirty = true;
        }
    }

    pub fn show_toast(&mut self, message: String, duration: Duration) {
        self.toast = Some(Toast {
            message,
            expires_at: Instant::now() + duration,
        });
        self.dirty = true;
    }

    /// Toast with the configured display duration.
    pub fn notify(&mut self, message: String) {
        let duration = self.config.ui.toast_duration();
        self.show_toast(message, duration);
    }

    /// Drop the toast once its deadline has passed.
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            self.dirty = true;
        }
    }

    /// Key hints for the footer.
    pub fn guidance(&self) -> &'static [&'static str] {
        match self.view {
            View::Search => &["[enter] list/create", "[esc] sand"],
            View::List => &["[c] create", "[s] stop", "[enter] options", "[esc] search", "[q] quit"],
            View::Options => &["[p] pause", "[r] resume", "[s] show", "[esc] list"],
            View::Create => &["[tab] next field", "[enter] create", "[esc] cancel"],
            View::Sand => &["[esc] back"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_editing() {
        let mut input = InputState::new();
        for c in "tée".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.delete_back();
        assert_eq!(input.text, "te");
        input.move_home();
        input.insert_char('s');
        input.move_end();
        input.move_right();
        input.insert_char('!');
        assert_eq!(input.text, "ste!");
        input.clear();
        assert_eq!(input.cursor, 0);
        assert!(input.text.is_empty());
    }

    #[test]
    fn test_form_unit_follows_index() {
        let mut form = CreateForm::new();
        assert_eq!(form.unit(), Unit::Millisecond);
        form.unit_index = 2;
        assert_eq!(form.unit(), Unit::Minute);
        form.field = FormField::Unit;
        assert!(form.active_input().is_none());
        form.reset();
        assert_eq!(form.field, FormField::Name);
    }

    #[tokio::test]
    async fn test_toast_expires_after_deadline() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(AppConfig::default(), tx);
        state.show_toast("hi".into(), Duration::from_secs(2));
        let deadline = state.toast.as_ref().unwrap().expires_at;

        state.expire_toast(deadline - Duration::from_millis(1));
        assert!(state.toast.is_some());
        state.expire_toast(deadline);
        assert!(state.toast.is_none());
    }

    #[tokio::test]
    async fn test_selection_wraps() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(AppConfig::default(), tx);
        for name in ["a", "b", "c"] {
            state.timers.create(name, 1, Unit::Hour).unwrap();
        }
        state.refresh_list();
        state.select_prev();
        assert_eq!(state.selected_name().as_deref(), Some("c"));
        state.select_next();
        assert_eq!(state.selected_name().as_deref(), Some("a"));

        state.search.text = "b".into();
        state.refresh_list();
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.selected_name().as_deref(), Some("b"));
    }
}
