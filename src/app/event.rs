use crossterm::event::Event as CrosstermEvent;

pub type TimerId = usize;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A timer's one-shot callback fired
    TimerExpired { id: TimerId, name: String },

    /// New sand frame from a timer's animation loop
    SandFrame { id: TimerId, frame: String },

    /// Tick for UI refresh
    Tick,
}
