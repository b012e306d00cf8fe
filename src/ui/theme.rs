use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::str::FromStr;

pub struct Theme;

impl Theme {
    pub const BG_DARK: Color = Color::Rgb(22, 22, 30);
    pub const BG_SURFACE: Color = Color::Rgb(36, 36, 48);
    pub const BORDER_DIM: Color = Color::Rgb(70, 70, 90);
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
    pub const TEXT_SECONDARY: Color = Color::Rgb(150, 150, 170);
    pub const TEXT_MUTED: Color = Color::Rgb(100, 100, 120);
    pub const ACCENT_TEAL: Color = Color::Rgb(94, 205, 196);
    pub const ACCENT_AMBER: Color = Color::Rgb(240, 190, 90);
    pub const ACCENT_LAVENDER: Color = Color::Rgb(180, 160, 240);
    pub const ACCENT_RED: Color = Color::Rgb(235, 100, 110);

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn border_type() -> BorderType {
        BorderType::Plain
    }

    pub fn border_type_focused() -> BorderType {
        BorderType::Rounded
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::ACCENT_LAVENDER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_AMBER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY).bg(Self::BG_SURFACE)
    }

    pub fn timer_active() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn timer_paused() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn timer_finished() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn toast() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_SURFACE)
    }

    pub fn modal_border() -> Style {
        Style::default().fg(Self::ACCENT_RED)
    }

    /// Grain colour from a config name like `"blue"` or `"#c2b280"`.
    pub fn sand(name: &str) -> Style {
        let color = Color::from_str(name).unwrap_or(Color::Blue);
        Style::default().fg(color)
    }
}
