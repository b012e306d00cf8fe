//! Timer state machine and the ordered registry that owns every timer.
//!
//! All user-facing operations look a timer up by name (first match wins,
//! names are not unique). Expiry is routed by [`TimerId`] because it comes
//! back through the event loop after the name may have been reused.
//!
//! # Lifecycle
//!
//! ```text
//!   create ──► Active ──pause──► Paused ──resume──► Active
//!                │                  │
//!          expire/stop             stop
//!                ▼                  ▼
//!             Finished ◄────────────┘
//! ```

use crate::app::event::{AppEvent, TimerId};
use crate::config::SandConfig;
use crate::sand::animator::SandAnimator;
use crate::timer::error::TimerError;
use crate::timer::schedule::ExpiryHandle;
use crate::timer::unit::{format_duration, Unit};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never started.
    Idle,
    Active,
    Paused,
    /// Fired or stopped.
    Finished,
}

/// Answer to a "how long is left" query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Running(Duration),
    Paused(Duration),
    Inactive,
}

impl Remaining {
    pub fn message(&self, name: &str) -> String {
        match self {
            Remaining::Paused(d) => {
                format!("timer \"{}\" is paused with {} remaining", name, format_duration(*d))
            }
            Remaining::Running(d) => {
                format!("timer \"{}\" has {} remaining", name, format_duration(*d))
            }
            Remaining::Inactive => format!("timer \"{}\" is not active", name),
        }
    }
}

/// One named countdown.
#[derive(Debug)]
pub struct Timer {
    id: TimerId,
    name: String,
    /// Total length, or what was left at the last pause.
    duration: Duration,
    started_at: Instant,
    paused_at: Option<Instant>,
    active: bool,
    expiry: Option<ExpiryHandle>,
    sand: Arc<Mutex<SandAnimator>>,
}

impl Timer {
    pub fn new(id: TimerId, name: String, duration: Duration, sand: SandAnimator) -> Self {
        Self {
            id,
            name,
            duration,
            started_at: Instant::now(),
            paused_at: None,
            active: false,
            expiry: None,
            sand: Arc::new(Mutex::new(sand)),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sand(&self) -> Arc<Mutex<SandAnimator>> {
        self.sand.clone()
    }

    pub fn state(&self) -> TimerState {
        if self.active {
            TimerState::Active
        } else if self.paused_at.is_some() {
            TimerState::Paused
        } else if self.expiry.is_none() {
            TimerState::Idle
        } else {
            TimerState::Finished
        }
    }

    /// Schedule the expiry callback for the current `duration`.
    fn arm(&mut self, events: &mpsc::UnboundedSender<AppEvent>) {
        let tx = events.clone();
        let id = self.id;
        let name = self.name.clone();
        self.expiry = Some(ExpiryHandle::spawn(self.duration, move || {
            let _ = tx.send(AppEvent::TimerExpired { id, name });
        }));
    }

    pub fn start(&mut self, events: &mpsc::UnboundedSender<AppEvent>) -> Result<(), TimerError> {
        if self.state() != TimerState::Idle {
            return Err(TimerError::invalid(&self.name, "was already started"));
        }
        self.started_at = Instant::now();
        self.arm(events);
        self.active = true;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        match self.state() {
            TimerState::Active => {}
            TimerState::Paused => return Err(TimerError::invalid(&self.name, "is already paused")),
            TimerState::Idle => return Err(TimerError::invalid(&self.name, "was never started")),
            TimerState::Finished => return Err(TimerError::already_fired(&self.name)),
        }
        let cancelled = self.expiry.as_ref().map(ExpiryHandle::stop).unwrap_or(false);
        if !cancelled {
            // The callback got there first; its expiry event is on the way.
            return Err(TimerError::already_fired(&self.name));
        }
        let now = Instant::now();
        self.duration = self
            .duration
            .saturating_sub(now.saturating_duration_since(self.started_at));
        self.paused_at = Some(now);
        self.active = false;
        Ok(())
    }

    pub fn resume(&mut self, events: &mpsc::UnboundedSender<AppEvent>) -> Result<(), TimerError> {
        if self.state() != TimerState::Paused {
            return Err(TimerError::invalid(&self.name, "is not paused"));
        }
        self.started_at = Instant::now();
        self.arm(events);
        self.active = true;
        self.paused_at = None;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), TimerError> {
        let Some(expiry) = self.expiry.as_ref() else {
            return Err(TimerError::invalid(&self.name, "was never started"));
        };
        if !expiry.stop() && self.paused_at.is_none() {
            return Err(TimerError::already_fired(&self.name));
        }
        self.paused_at = None;
        self.active = false;
        Ok(())
    }

    pub fn remaining(&self) -> Remaining {
        match self.state() {
            TimerState::Paused => Remaining::Paused(self.duration),
            TimerState::Active => {
                let deadline = self.started_at + self.duration;
                Remaining::Running(deadline.saturating_duration_since(Instant::now()))
            }
            TimerState::Idle | TimerState::Finished => Remaining::Inactive,
        }
    }

    fn expire(&mut self) {
        if self.expiry.as_ref().is_some_and(ExpiryHandle::has_fired) {
            self.active = false;
        }
    }
}

/// How an operation picks its timer. Names resolve to the first match;
/// ids address one timer exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Name(&'a str),
    Id(TimerId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Name(name)
    }
}

impl From<TimerId> for Target<'_> {
    fn from(id: TimerId) -> Self {
        Target::Id(id)
    }
}

fn missing_id(id: TimerId) -> TimerError {
    TimerError::not_found(&format!("#{}", id))
}

/// Ordered collection of timers, owned by the application state.
pub struct Registry {
    timers: Vec<Timer>,
    next_id: TimerId,
    events: mpsc::UnboundedSender<AppEvent>,
    sand: SandConfig,
}

impl Registry {
    pub fn new(events: mpsc::UnboundedSender<AppEvent>, sand: SandConfig) -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
            events,
            sand,
        }
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn find(&self, name: &str) -> Result<&Timer, TimerError> {
        self.timers
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| TimerError::not_found(name))
    }

    /// Ids of timers whose name contains `filter`, ignoring case.
    pub fn search(&self, filter: &str) -> Vec<TimerId> {
        let needle = filter.to_lowercase();
        self.timers
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .map(|t| t.id)
            .collect()
    }

    /// Create and start a timer of `length` × `unit`.
    pub fn create(&mut self, name: &str, length: u64, unit: Unit) -> Result<TimerId, TimerError> {
        let overflow = || TimerError::DurationOverflow {
            name: name.to_string(),
        };
        let duration = unit.duration(length).ok_or_else(overflow)?;
        Instant::now().checked_add(duration).ok_or_else(overflow)?;

        let id = self.allocate_id();
        let sand = SandAnimator::new(
            self.sand.width,
            self.sand.height,
            Duration::from_millis(self.sand.frame_cap_ms.max(1)),
            duration,
        );
        let mut timer = Timer::new(id, name.to_string(), duration, sand);
        timer.start(&self.events)?;
        self.timers.push(timer);
        info!(timer = name, id, ?duration, "timer created");
        Ok(id)
    }

    fn get_mut(&mut self, id: TimerId) -> Result<&mut Timer, TimerError> {
        self.timers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| missing_id(id))
    }

    fn resolve(&self, target: Target<'_>) -> Result<TimerId, TimerError> {
        match target {
            Target::Name(name) => self.find(name).map(|t| t.id),
            Target::Id(id) => self.get(id).map(|t| t.id).ok_or_else(|| missing_id(id)),
        }
    }

    pub fn pause<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<(), TimerError> {
        let id = self.resolve(target.into())?;
        let timer = self.get_mut(id)?;
        let result = timer.pause();
        log_transition("pause", timer, &result);
        result
    }

    pub fn resume<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<(), TimerError> {
        let id = self.resolve(target.into())?;
        let events = self.events.clone();
        let timer = self.get_mut(id)?;
        let result = timer.resume(&events);
        log_transition("resume", timer, &result);
        result
    }

    pub fn stop<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<(), TimerError> {
        let id = self.resolve(target.into())?;
        let timer = self.get_mut(id)?;
        let result = timer.stop();
        log_transition("stop", timer, &result);
        result
    }

    pub fn query_remaining<'a>(&self, target: impl Into<Target<'a>>) -> Result<Remaining, TimerError> {
        let id = self.resolve(target.into())?;
        self.get(id).map(Timer::remaining).ok_or_else(|| missing_id(id))
    }

    /// Mark a fired timer finished. Returns its name for the notification.
    pub fn expire(&mut self, id: TimerId) -> Result<String, TimerError> {
        let timer = self.get_mut(id)?;
        timer.expire();
        info!(timer = timer.name.as_str(), id, "timer expired");
        Ok(timer.name.clone())
    }
}

fn log_transition(op: &str, timer: &Timer, result: &Result<(), TimerError>) {
    match result {
        Ok(()) => info!(timer = timer.name.as_str(), id = timer.id, op, remaining = ?timer.duration, "timer transition"),
        Err(e) => debug!(timer = timer.name.as_str(), id = timer.id, op, error = %e, "transition rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (Registry, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Registry::new(tx, SandConfig::default()), rx)
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn expired(event: AppEvent) -> (TimerId, String) {
        match event {
            AppEvent::TimerExpired { id, name } => (id, name),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_duration_is_exact() {
        let (mut reg, _rx) = registry();
        for (i, unit) in Unit::ALL.iter().enumerate() {
            let name = format!("t{}", i);
            reg.create(&name, 7, *unit).unwrap();
            let timer = reg.find(&name).unwrap();
            assert_eq!(timer.duration(), Duration::from_millis(7 * unit.millis()));
            assert_eq!(timer.state(), TimerState::Active);
        }
        assert_eq!(reg.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_overflow_is_rejected() {
        let (mut reg, _rx) = registry();
        let err = reg.create("forever", u64::MAX, Unit::Hour).unwrap_err();
        assert!(matches!(err, TimerError::DurationOverflow { .. }));
        assert!(reg.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_name_is_not_found() {
        let (mut reg, _rx) = registry();
        let nf = TimerError::NotFound {
            name: "ghost".into(),
        };
        assert_eq!(reg.pause("ghost"), Err(nf.clone()));
        assert_eq!(reg.resume("ghost"), Err(nf.clone()));
        assert_eq!(reg.stop("ghost"), Err(nf.clone()));
        assert_eq!(reg.query_remaining("ghost"), Err(nf));
        assert!(reg.expire(42).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_names_resolve_to_first() {
        let (mut reg, _rx) = registry();
        let first = reg.create("tea", 1, Unit::Minute).unwrap();
        let second = reg.create("tea", 5, Unit::Minute).unwrap();
        assert_ne!(first, second);

        reg.pause("tea").unwrap();
        assert_eq!(reg.get(first).unwrap().state(), TimerState::Paused);
        assert_eq!(reg.get(second).unwrap().state(), TimerState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_id_operations_reach_duplicate_names() {
        let (mut reg, _rx) = registry();
        let first = reg.create("tea", 1, Unit::Minute).unwrap();
        let second = reg.create("tea", 5, Unit::Minute).unwrap();

        reg.pause(second).unwrap();
        assert_eq!(reg.get(first).unwrap().state(), TimerState::Active);
        assert_eq!(
            reg.query_remaining(second).unwrap(),
            Remaining::Paused(Duration::from_secs(300))
        );

        reg.resume(second).unwrap();
        reg.stop(second).unwrap();
        assert_eq!(reg.get(second).unwrap().state(), TimerState::Finished);
        assert_eq!(reg.get(first).unwrap().state(), TimerState::Active);

        assert!(matches!(reg.pause(99usize), Err(TimerError::NotFound { .. })));
        assert!(reg.query_remaining(99usize).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_preserves_remaining() {
        let (mut reg, _rx) = registry();
        reg.create("eggs", 10, Unit::Minute).unwrap();

        tokio::time::advance(Duration::from_secs(125)).await;
        reg.pause("eggs").unwrap();
        let at_pause = reg.query_remaining("eggs").unwrap();
        assert_eq!(at_pause, Remaining::Paused(Duration::from_secs(475)));

        // Time spent paused doesn't count.
        tokio::time::advance(Duration::from_secs(600)).await;
        assert_eq!(reg.query_remaining("eggs").unwrap(), at_pause);

        reg.resume("eggs").unwrap();
        assert_eq!(
            reg.query_remaining("eggs").unwrap(),
            Remaining::Running(Duration::from_secs(475))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_transitions() {
        let (mut reg, _rx) = registry();
        reg.create("bread", 1, Unit::Hour).unwrap();

        assert!(matches!(
            reg.resume("bread"),
            Err(TimerError::InvalidTransition { reason: "is not paused", .. })
        ));

        reg.pause("bread").unwrap();
        assert!(matches!(
            reg.pause("bread"),
            Err(TimerError::InvalidTransition { reason: "is already paused", .. })
        ));

        reg.stop("bread").unwrap();
        assert_eq!(reg.find("bread").unwrap().state(), TimerState::Finished);
        assert!(matches!(reg.pause("bread"), Err(TimerError::AlreadyFired { .. })));
        assert!(matches!(
            reg.resume("bread"),
            Err(TimerError::InvalidTransition { .. })
        ));
        assert_eq!(reg.query_remaining("bread").unwrap(), Remaining::Inactive);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (mut reg, mut rx) = registry();
        reg.create("pasta", 8, Unit::Minute).unwrap();

        assert_eq!(reg.stop("pasta"), Ok(()));
        assert!(!reg.find("pasta").unwrap().is_active());

        assert!(matches!(reg.stop("pasta"), Err(TimerError::AlreadyFired { .. })));
        assert_eq!(reg.find("pasta").unwrap().state(), TimerState::Finished);

        // Stopped timers never fire.
        tokio::time::advance(Duration::from_secs(3600)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_paused_timer() {
        let (mut reg, _rx) = registry();
        reg.create("rice", 20, Unit::Minute).unwrap();
        reg.pause("rice").unwrap();
        assert_eq!(reg.stop("rice"), Ok(()));
        assert_eq!(reg.find("rice").unwrap().state(), TimerState::Finished);
        assert!(matches!(reg.stop("rice"), Err(TimerError::AlreadyFired { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_rejects_stop_and_pause() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let sand = SandAnimator::new(5, 50, Duration::from_millis(100), Duration::from_secs(60));
        let mut timer = Timer::new(0, "idle".into(), Duration::from_secs(60), sand);

        assert_eq!(timer.state(), TimerState::Idle);
        assert!(matches!(
            timer.stop(),
            Err(TimerError::InvalidTransition { reason: "was never started", .. })
        ));
        assert!(matches!(timer.pause(), Err(TimerError::InvalidTransition { .. })));
        assert_eq!(timer.remaining(), Remaining::Inactive);
        assert_eq!(timer.state(), TimerState::Idle);

        timer.start(&tx).unwrap();
        assert_eq!(timer.state(), TimerState::Active);
        assert!(timer.start(&tx).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_loses_race_to_fired_callback() {
        let (mut reg, mut rx) = registry();
        let id = reg.create("flash", 5, Unit::Millisecond).unwrap();

        tokio::time::advance(Duration::from_millis(10)).await;
        settle().await;

        // Callback claimed the timer, but the event loop hasn't run expire yet.
        assert!(reg.find("flash").unwrap().is_active());
        assert!(matches!(reg.pause("flash"), Err(TimerError::AlreadyFired { .. })));
        assert!(matches!(reg.stop("flash"), Err(TimerError::AlreadyFired { .. })));
        assert!(reg.find("flash").unwrap().is_active());

        let (fired, name) = expired(rx.recv().await.unwrap());
        assert_eq!(fired, id);
        assert_eq!(reg.expire(fired).unwrap(), name);
        assert_eq!(reg.find("flash").unwrap().state(), TimerState::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coffee_end_to_end() {
        let (mut reg, mut rx) = registry();
        let id = reg.create("coffee", 2, Unit::Minute).unwrap();
        assert_eq!(
            reg.query_remaining("coffee").unwrap(),
            Remaining::Running(Duration::from_secs(120))
        );

        tokio::time::advance(Duration::from_secs(30)).await;
        reg.pause("coffee").unwrap();
        let paused = reg.query_remaining("coffee").unwrap();
        assert_eq!(paused, Remaining::Paused(Duration::from_secs(90)));
        assert_eq!(paused.message("coffee"), "timer \"coffee\" is paused with 1m30s remaining");

        reg.resume("coffee").unwrap();
        let running = reg.query_remaining("coffee").unwrap();
        assert_eq!(running, Remaining::Running(Duration::from_secs(90)));
        assert_eq!(running.message("coffee"), "timer \"coffee\" has 1m30s remaining");

        tokio::time::advance(Duration::from_secs(89)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        let (fired, name) = expired(rx.try_recv().unwrap());
        assert_eq!((fired, name.as_str()), (id, "coffee"));
        assert_eq!(reg.expire(fired).unwrap(), "coffee");
        assert_eq!(
            reg.query_remaining("coffee").unwrap().message("coffee"),
            "timer \"coffee\" is not active"
        );

        tokio::time::advance(Duration::from_secs(600)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_case_insensitive_substring() {
        let (mut reg, _rx) = registry();
        let a = reg.create("Morning Coffee", 1, Unit::Minute).unwrap();
        let _b = reg.create("laundry", 1, Unit::Hour).unwrap();
        let c = reg.create("coffee break", 15, Unit::Minute).unwrap();

        assert_eq!(reg.search("COFFEE"), vec![a, c]);
        assert_eq!(reg.search(""), vec![0, 1, 2]);
        assert!(reg.search("tea").is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TimerError::already_fired("x").to_string(),
            "timer \"x\" has already fired or been stopped"
        );
        assert_eq!(
            TimerError::invalid("x", "is not paused").to_string(),
            "timer \"x\" is not paused"
        );
        assert_eq!(TimerError::not_found("x").to_string(), "timer \"x\" not found");
    }
}
