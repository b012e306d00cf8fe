//! One-shot delayed callbacks.
//!
//! Each active timer owns an [`ExpiryHandle`]: a spawned tokio task that
//! sleeps for the remaining duration and then runs its callback. Firing and
//! cancelling race for a shared claim word, so exactly one of them wins.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Handle to a scheduled one-shot callback.
#[derive(Debug)]
pub struct ExpiryHandle {
    claim: Arc<AtomicU8>,
    cancel: CancellationToken,
}

impl ExpiryHandle {
    /// Schedule `on_fire` to run once after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let claim = Arc::new(AtomicU8::new(PENDING));
        let cancel = CancellationToken::new();

        let deadline = tokio::time::Instant::now() + delay;
        let task_claim = claim.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if task_claim
                        .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        on_fire();
                    }
                }
            }
        });

        Self { claim, cancel }
    }

    /// Cancel the callback. Returns `true` only if this call prevented it
    /// from firing; `false` if it already fired or was already stopped.
    pub fn stop(&self) -> bool {
        let won = self
            .claim
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        self.cancel.cancel();
        won
    }

    pub fn has_fired(&self) -> bool {
        self.claim.load(Ordering::Acquire) == FIRED
    }
}
