// ── Bounded-worker timeout wrapper ──
//
// Probes may block on raw sockets with no deadline of their own. The
// work runs on a worker thread and the caller waits at most `timeout`,
// falling back to `default`. An abandoned worker finishes in the
// background and its result is dropped on the floor.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Run `work` with a hard deadline. Returns the worker's result, or
/// `default` when the deadline passes or the worker dies first.
pub fn run_with_timeout<T, F>(timeout: Duration, default: T, work: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(work());
    });

    match rx.recv_timeout(timeout) {
        Ok(value) => value,
        Err(_) => {
            warn!(?timeout, "worker did not finish before the deadline; using fallback");
            default
        }
    }
}
