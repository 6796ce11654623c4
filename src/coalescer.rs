//! Generation coalescer: serializes a rebuild and collapses trigger bursts.
//!
//! At most one run is in flight. A trigger arriving during a run guarantees
//! exactly one more run after it finishes, however many triggers arrive.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct GenerationCoalescer<F>
where
    F: Fn() + Send + Sync,
{
    generate: F,
    running: AtomicBool,
    pending: Mutex<bool>,
}

/// Clears the running flag if a run unwinds.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.store(false, Ordering::Release);
        }
    }
}

impl<F> GenerationCoalescer<F>
where
    F: Fn() + Send + Sync,
{
    pub fn new(generate: F) -> Self {
        Self {
            generate,
            running: AtomicBool::new(false),
            pending: Mutex::new(false),
        }
    }

    /// Request a run.
    ///
    /// With no run in flight the caller becomes the owner and runs `generate`
    /// on its own thread until no trigger is pending. Otherwise the request is
    /// recorded and this returns immediately.
    pub fn trigger(&self) {
        {
            let mut pending = self.pending.lock();
            *pending = true;
            if self.running.swap(true, Ordering::AcqRel) {
                return;
            }
        }

        let _guard = RunningGuard(&self.running);
        loop {
            {
                let mut pending = self.pending.lock();
                if !*pending {
                    // Released under the lock so a concurrent trigger either
                    // sees running == false or leaves pending for us.
                    self.running.store(false, Ordering::Release);
                    return;
                }
                *pending = false;
            }
            (self.generate)();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
