//! Cooperative cancellation for the suspension points of a plan run.
//!
//! Every sleep in the engine (fixed waits, `wait_for` polling, inter-step
//! delays) goes through [`CancellationToken::sleep`], so cancelling the token
//! wakes the sleeper immediately and the run aborts with
//! [`ShotsError::Cancelled`].

use crate::error::ShotsError;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and wake every sleeper.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        *cancelled = true;
        self.inner.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Return `Err(Cancelled)` if the token has been cancelled.
    pub fn check(&self) -> Result<(), ShotsError> {
        if self.is_cancelled() {
            Err(ShotsError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration` unless cancelled first.
    pub fn sleep(&self, duration: Duration) -> Result<(), ShotsError> {
        let deadline = Instant::now().checked_add(duration);
        let mut cancelled = self.inner.cancelled.lock();
        loop {
            if *cancelled {
                return Err(ShotsError::Cancelled);
            }
            match deadline {
                Some(deadline) => {
                    if self
                        .inner
                        .signal
                        .wait_until(&mut cancelled, deadline)
                        .timed_out()
                    {
                        return if *cancelled {
                            Err(ShotsError::Cancelled)
                        } else {
                            Ok(())
                        };
                    }
                }
                None => self.inner.signal.wait(&mut cancelled),
            }
        }
    }
}
