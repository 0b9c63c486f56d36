//! Scoped control of the loading indicator.
//!
//! Every resolution holds a [`LoadingGuard`]. The indicator is shown when the
//! first guard is taken and hidden when the last one is dropped, so it is
//! released on success, on error, on timeout and when a future is cancelled.

use crate::host::LoadingIndicator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reference-counted front for a [`LoadingIndicator`].
#[derive(Clone)]
pub struct LoadingTracker {
    indicator: Arc<dyn LoadingIndicator>,
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        Self {
            indicator,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Marks one resolution as in flight.
    pub fn begin(&self) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.indicator.show();
        }
        LoadingGuard {
            indicator: Arc::clone(&self.indicator),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Keeps the indicator visible while alive.
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct LoadingGuard {
    indicator: Arc<dyn LoadingIndicator>,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.indicator.hide();
        }
    }
}
