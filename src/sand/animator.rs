//! Per-timer animation state: the sand grid plus its spawn pacing.

use crate::sand::grid::SandGrid;
use std::time::Duration;
use tokio::time::Instant;

/// Something the sand view can drive frame by frame.
pub trait Animator: Send {
    /// Run one frame at `now`.
    fn advance(&mut self, now: Instant);

    /// Current frame as text.
    fn render(&self) -> String;

    /// How long the animation loop waits between frames.
    fn frame_interval(&self) -> Duration;
}

/// Spawn period and frame period derived from a timer's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick: Duration,
    pub frame: Duration,
}

impl Pacing {
    /// Spread `budget` grains over `duration`: `(secs / budget) * 1000` ms
    /// per grain, truncated to whole milliseconds (at least 1).
    ///
    /// Frames are always `frame_cap` apart. Fast timers spawn several grains
    /// per frame instead of drawing more often.
    pub fn derive(duration: Duration, budget: usize, frame_cap: Duration) -> Self {
        let ms_per_tick = (duration.as_secs_f64() / budget.max(1) as f64) * 1000.0;
        let tick = Duration::from_millis((ms_per_tick as u64).max(1));
        let frame = frame_cap.max(Duration::from_millis(1));
        Self { tick, frame }
    }
}

#[derive(Debug, Clone)]
pub struct SandAnimator {
    grid: SandGrid,
    pacing: Pacing,
    frame_cap: Duration,
    next_spawn: Option<Instant>,
}

impl SandAnimator {
    pub fn new(width: usize, height: usize, frame_cap: Duration, duration: Duration) -> Self {
        let grid = SandGrid::new(width, height);
        let pacing = Pacing::derive(duration, grid.budget(), frame_cap);
        Self {
            grid,
            pacing,
            frame_cap,
            next_spawn: None,
        }
    }

    /// Recompute pacing for a (possibly shortened) duration and restart the
    /// spawn clock. The grid keeps its sand.
    pub fn retune(&mut self, duration: Duration) {
        self.pacing = Pacing::derive(duration, self.grid.budget(), self.frame_cap);
        self.next_spawn = None;
    }

    #[cfg(test)]
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    #[cfg(test)]
    pub fn grid(&self) -> &SandGrid {
        &self.grid
    }

    /// Number of spawn ticks that fell due by `now`, capped at one grid's
    /// worth. The first call only starts the spawn clock.
    fn due_ticks(&mut self, now: Instant) -> usize {
        let Some(mut due) = self.next_spawn else {
            self.next_spawn = Some(now + self.pacing.tick);
            return 0;
        };
        let mut count = 0;
        while due <= now && count < self.grid.budget() {
            count += 1;
            due += self.pacing.tick;
        }
        if due <= now {
            due = now + self.pacing.tick;
        }
        self.next_spawn = Some(due);
        count
    }
}

impl Animator for SandAnimator {
    /// One gravity pass per due tick, each followed by a spawn. A frame with
    /// nothing due still gets a gravity pass so falling sand keeps moving.
    fn advance(&mut self, now: Instant) {
        let due = self.due_ticks(now);
        if due == 0 {
            self.grid.settle();
        }
        for _ in 0..due {
            self.grid.settle();
            self.grid.spawn();
        }
    }

    fn render(&self) -> String {
        self.grid.render()
    }

    fn frame_interval(&self) -> Duration {
        self.pacing.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: Duration = Duration::from_millis(100);

    #[test]
    fn test_pacing_slow_timer_uses_frame_cap() {
        // 2 minutes over 250 cells: 480ms per grain.
        let p = Pacing::derive(Duration::from_secs(120), 250, CAP);
        assert_eq!(p.tick, Duration::from_millis(480));
        assert_eq!(p.frame, CAP);
    }

    #[test]
    fn test_pacing_fast_timer_still_frames_at_cap() {
        let p = Pacing::derive(Duration::from_secs(10), 250, CAP);
        assert_eq!(p.tick, Duration::from_millis(40));
        assert_eq!(p.frame, CAP);
    }

    #[test]
    fn test_pacing_sub_millisecond_tick_is_clamped() {
        let p = Pacing::derive(Duration::from_millis(100), 250, CAP);
        assert_eq!(p.tick, Duration::from_millis(1));
        assert_eq!(p.frame, CAP);

        let p = Pacing::derive(Duration::ZERO, 250, CAP);
        assert_eq!(p.tick, Duration::from_millis(1));

        let p = Pacing::derive(Duration::from_secs(1), 250, Duration::ZERO);
        assert_eq!(p.frame, Duration::from_millis(1));
    }

    #[test]
    fn test_first_spawn_after_one_tick() {
        let mut anim = SandAnimator::new(5, 50, CAP, Duration::from_secs(120));
        let t0 = Instant::now();

        anim.advance(t0);
        assert_eq!(anim.grid().spawned(), 0);

        anim.advance(t0 + Duration::from_millis(100));
        assert_eq!(anim.grid().spawned(), 0);

        anim.advance(t0 + Duration::from_millis(480));
        assert_eq!(anim.grid().spawned(), 1);
    }

    #[test]
    fn test_late_frame_catches_up_on_spawns() {
        let mut anim = SandAnimator::new(5, 50, CAP, Duration::from_secs(120));
        let t0 = Instant::now();
        anim.advance(t0);

        // Five ticks elapsed: five grains this frame.
        anim.advance(t0 + Duration::from_millis(480 * 5));
        assert_eq!(anim.grid().spawned(), 5);

        anim.advance(t0 + Duration::from_millis(480 * 5 + 1));
        assert_eq!(anim.grid().spawned(), 5);
    }

    #[test]
    fn test_fast_timer_spawns_many_per_frame() {
        // 10s over 250 cells: 40ms ticks, so 100ms frames carry 2 or 3 grains.
        let mut anim = SandAnimator::new(5, 50, CAP, Duration::from_secs(10));
        let t0 = Instant::now();
        anim.advance(t0);
        for i in 1..=10 {
            anim.advance(t0 + CAP * i);
        }
        assert_eq!(anim.grid().spawned(), 25);
    }

    #[test]
    fn test_catch_up_is_bounded_by_grid() {
        let mut anim = SandAnimator::new(2, 2, CAP, Duration::from_millis(4));
        let t0 = Instant::now();
        anim.advance(t0);
        anim.advance(t0 + Duration::from_secs(3600));
        assert_eq!(anim.grid().spawned(), 4);
    }

    #[test]
    fn test_spawned_grain_falls() {
        let mut anim = SandAnimator::new(3, 4, CAP, Duration::from_secs(12));
        let t0 = Instant::now();
        anim.advance(t0);
        anim.advance(t0 + anim.pacing().tick);
        assert!(anim.render().starts_with("█  \n"));

        anim.advance(t0 + anim.pacing().tick + Duration::from_millis(1));
        assert_eq!(anim.render(), "   \n█  \n   \n   \n");
    }

    #[test]
    fn test_retune_keeps_sand() {
        let mut anim = SandAnimator::new(3, 4, CAP, Duration::from_secs(12));
        let t0 = Instant::now();
        anim.advance(t0);
        anim.advance(t0 + anim.pacing().tick);
        anim.retune(Duration::from_secs(1200));
        assert_eq!(anim.grid().sand_count(), 1);
        assert_eq!(anim.pacing().frame, CAP);
    }
}
