//! Pausable waits.
//!
//! Every driver step that changes the working buffer ends in a call to
//! [`Control::suspend`]. That is the only place a run yields to the rest of
//! the runtime, so it is also where pause, cancellation and speed changes
//! are observed.

use crate::error::EngineError;
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Duration,
};

/// How often a paused wait re-checks the pause flag.
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Waits for `delay`, not counting time spent while `is_paused` returns true.
///
/// While paused, the flag is polled every [`PAUSE_POLL_INTERVAL`]. Once it
/// reads false the full delay is waited exactly once, so a pause that starts
/// during that final delay is only seen by the next call.
pub async fn wait(delay: Duration, is_paused: impl Fn() -> bool) {
    while is_paused() {
        tokio::time::sleep(PAUSE_POLL_INTERVAL).await;
    }

    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// Live inputs of a run that may be changed while it is in progress.
#[derive(Debug)]
pub struct Control {
    paused: AtomicBool,
    cancelled: AtomicBool,
    delay_ms: AtomicU64,
}

impl Control {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            delay_ms: AtomicU64::new(delay_ms),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::Relaxed);
    }

    /// Clears pause and cancellation ahead of a new run.
    pub fn reset(&self) {
        self.paused.store(false, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Suspension point of a run.
    ///
    /// Waits for the current delay, honouring pause. Returns
    /// [`EngineError::Cancelled`] if cancellation was requested before or
    /// during the wait; a cancelled run stops polling even while paused.
    pub async fn suspend(&self) -> Result<(), EngineError> {
        self.check()?;
        wait(self.delay(), || self.is_paused() && !self.is_cancelled()).await;
        self.check()
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
