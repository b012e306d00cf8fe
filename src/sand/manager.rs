//! Background animation loops for the sand view.
//!
//! Entering the sand view starts one loop per timer; leaving it cancels
//! them all. Loops never touch UI state directly: each frame is sent to the
//! event loop as [`AppEvent::SandFrame`].

use crate::app::event::{AppEvent, TimerId};
use crate::sand::animator::Animator;
use crate::timer::Registry;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns the cancellation token for the current generation of loops.
pub struct AnimationManager {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    view: Option<CancellationToken>,
}

impl AnimationManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            event_tx,
            view: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.view.is_some()
    }

    /// Start a loop for every timer in `registry`, replacing any running
    /// generation. Returns the number of loops started.
    pub fn start(&mut self, registry: &Registry) -> usize {
        self.stop();
        let view = CancellationToken::new();
        let mut started = 0;
        for timer in registry.iter() {
            let sand = timer.sand();
            if let Ok(mut anim) = sand.lock() {
                anim.retune(timer.duration());
            }
            spawn_loop(timer.id(), sand, view.child_token(), self.event_tx.clone());
            started += 1;
        }
        debug!(loops = started, "sand animation started");
        self.view = Some(view);
        started
    }

    pub fn stop(&mut self) {
        if let Some(view) = self.view.take() {
            view.cancel();
            debug!("sand animation stopped");
        }
    }
}

impl Drop for AnimationManager {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drive `animator` until `cancel` fires or the event loop goes away.
pub fn spawn_loop<A>(
    id: TimerId,
    animator: Arc<Mutex<A>>,
    cancel: CancellationToken,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()>
where
    A: Animator + 'static,
{
    tokio::spawn(async move {
        loop {
            let (frame, interval) = {
                let Ok(mut anim) = animator.lock() else { break };
                anim.advance(Instant::now());
                (anim.render(), anim.frame_interval())
            };
            if event_tx.send(AppEvent::SandFrame { id, frame }).is_err() {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        debug!(timer = id, "sand loop exited");
    })
}
