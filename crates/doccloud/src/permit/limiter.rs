//! FIFO rate limiter with a single on-demand drain task.

use std::collections::VecDeque;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

struct QueueState {
    waiters: VecDeque<oneshot::Sender<()>>,
    draining: bool,
}

struct Shared {
    requests_per_second: NonZeroU32,
    interval: Duration,
    state: Mutex<QueueState>,
}

impl Shared {
    // The lock is only held for push/pop, never across an await.
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Grants permits in call order, no faster than `requests_per_second`.
///
/// Cloning is cheap and clones share one queue.
#[derive(Clone)]
pub struct RateLimiter {
    shared: Arc<Shared>,
}

impl RateLimiter {
    pub fn new(requests_per_second: NonZeroU32) -> Self {
        Self {
            shared: Arc::new(Shared {
                requests_per_second,
                interval: Duration::from_secs(1) / requests_per_second.get(),
                state: Mutex::new(QueueState {
                    waiters: VecDeque::new(),
                    draining: false,
                }),
            }),
        }
    }

    /// Join the queue and return a future that resolves once the permit is granted.
    ///
    /// The caller is enqueued when this is called, not when the future is
    /// first polled. Must be called from within a Tokio runtime.
    pub fn acquire(&self) -> impl Future<Output = ()> + Send + 'static {
        let (tx, rx) = oneshot::channel();

        let start_drain = {
            let mut state = self.shared.state();
            state.waiters.push_back(tx);
            !std::mem::replace(&mut state.draining, true)
        };

        if start_drain {
            tracing::trace!("Starting permit drain task");
            tokio::spawn(drain(Arc::clone(&self.shared)));
        }

        async move {
            // The drain task never drops a sender without sending.
            let _ = rx.await;
        }
    }

    pub fn requests_per_second(&self) -> u32 {
        self.shared.requests_per_second.get()
    }

    /// Minimum spacing between two grants.
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Number of callers still waiting for a permit.
    pub fn pending(&self) -> usize {
        self.shared.state().waiters.len()
    }

    pub fn is_draining(&self) -> bool {
        self.shared.state().draining
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.requests_per_second())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Clears `draining` if the drain task is dropped before it sees an empty
/// queue, e.g. when its runtime shuts down mid-sleep.
struct DrainGuard {
    shared: Arc<Shared>,
    finished: bool,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::trace!("Permit drain task cancelled");
            self.shared.state().draining = false;
        }
    }
}

async fn drain(shared: Arc<Shared>) {
    let mut guard = DrainGuard {
        shared,
        finished: false,
    };

    loop {
        let next = {
            let mut state = guard.shared.state();
            match state.waiters.pop_front() {
                Some(waiter) => waiter,
                None => {
                    // Cleared under the lock; the guard must not clear it
                    // again once a newer drain task may own the flag.
                    state.draining = false;
                    guard.finished = true;
                    tracing::trace!("Permit queue empty, drain task exiting");
                    return;
                }
            }
        };

        let started = Instant::now();

        // Waiter went away before its turn; the slot goes to the next one.
        if next.send(()).is_err() {
            continue;
        }

        let elapsed = started.elapsed();
        tokio::time::sleep(guard.shared.interval.saturating_sub(elapsed)).await;
    }
}
