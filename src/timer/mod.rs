//! Named countdown timers.
//!
//! A [`Registry`] owns every timer created in the session. Each running
//! timer is backed by a one-shot [`schedule::ExpiryHandle`] that reports
//! back to the event loop with `AppEvent::TimerExpired` when it fires.

pub mod error;
pub mod registry;
pub mod schedule;
pub mod unit;

pub use error::TimerError;
pub use registry::{Registry, Remaining, Timer, TimerState};
pub use unit::{format_duration, Unit};
