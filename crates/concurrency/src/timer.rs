//! Deferred execution
//!
//! `later` is the deferred context producers settle from: a background
//! thread that sleeps for the delay and then runs the task. Two tasks are
//! only ordered by their delays.

use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Run `task` on a background thread after `delay`
pub fn later<F>(delay: Duration, task: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::spawn(move || {
        thread::sleep(delay);
        task();
    })
}
