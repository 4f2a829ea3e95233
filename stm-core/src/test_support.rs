//! Test-only helpers for bounding how long a test may block.
//!
//! Mirrors the teacher crate's own `#[cfg(test)] mod test` (declared in
//! `fast-stm/src/lib.rs`, used throughout `transaction/control_block.rs`'s
//! tests) — a transaction protocol with retry loops and lock acquisition
//! can deadlock or livelock under a bug, and a hung test is worse than a
//! failing one.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Run `f` on a new thread and report whether it finished within
/// `timeout_ms` milliseconds. Does not kill the thread if it times out —
/// just stops waiting for it.
pub(crate) fn terminates<F>(timeout_ms: u64, f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(Duration::from_millis(timeout_ms)).is_ok()
}

/// Run `f` on a new thread, then run `trigger` on the calling thread, and
/// report whether `f` finished within `timeout_ms` milliseconds of
/// `terminates_async` being called. Useful for the "does a blocked thread
/// wake up once some other thread changes the relevant state" shape of test.
pub(crate) fn terminates_async<F, G>(timeout_ms: u64, f: F, trigger: G) -> bool
where
    F: FnOnce() + Send + 'static,
    G: FnOnce(),
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    trigger();
    rx.recv_timeout(Duration::from_millis(timeout_ms)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminates_reports_completion_within_budget() {
        assert!(terminates(200, || {}));
    }

    #[test]
    fn terminates_reports_timeout() {
        assert!(!terminates(10, || thread::sleep(Duration::from_millis(200))));
    }
}
