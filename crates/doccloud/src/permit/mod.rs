//! Permit queue for pacing outbound API requests.
//!
//! Every request the client sends first waits for a permit from a
//! [`RateLimiter`]. Permits are handed out first-come-first-served by a single
//! drain task, and consecutive grants are at least `1s / requests_per_second`
//! apart:
//! - `acquire()` enqueues the caller synchronously, so call order is grant order
//! - the first caller on an idle limiter spawns the drain task
//! - the drain task exits once the queue is empty; the next caller restarts it

mod limiter;

pub use limiter::RateLimiter;
