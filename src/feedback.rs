//! Progress and cancellation hooks the network builder calls out to.

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives progress reports and decides whether a running operation should be abandoned.
/// Cancellation is cooperative: it is polled between units of work, never forced.
pub trait Feedback {
    fn is_cancelled(&self) -> bool {
        false
    }
    /// Progress of the current phase, between 0 and 100.
    fn set_progress(&mut self, _percent: f64) {}
    fn push_info(&mut self, message: &str) {
        info!("{}", message);
    }
}

/// Forwards messages to the `log` facade, ignores progress and is never cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {}

/// A cancellation flag that can be shared with another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl Feedback for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl<F: Feedback + ?Sized> Feedback for &mut F {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
    fn set_progress(&mut self, percent: f64) {
        (**self).set_progress(percent)
    }
    fn push_info(&mut self, message: &str) {
        (**self).push_info(message)
    }
}
