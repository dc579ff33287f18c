//! Cooperative cancellation for in-flight fetches.
//!
//! The blocking HTTP client cannot be aborted mid-request, so each loading
//! screen owns a token that is checked before dispatch and before the result
//! is applied; navigating away cancels it.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
