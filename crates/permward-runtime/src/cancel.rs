//! Cooperative cancellation at path granularity.
//!
//! The orchestrator polls [`CancelSignal::is_cancelled`] before each path.
//! A path already in flight always finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancel flag with an optional deadline.
///
/// Clones share the flag, so any clone may trip it from any thread.
///
/// # Example
///
/// ```
/// use permward_runtime::CancelSignal;
///
/// let signal = CancelSignal::new();
/// let handle = signal.clone();
/// assert!(!signal.is_cancelled());
///
/// handle.cancel();
/// assert!(signal.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// Creates a signal that never trips on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal that trips once `timeout` has elapsed from now.
    ///
    /// A timeout too large to represent as an [`Instant`] never trips.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(at) => Self::new().deadline(at),
            None => Self::new(),
        }
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }

    /// Trips the signal for every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancelled or past the deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::SeqCst) {
            return true;
        }
        self.deadline.is_some_and(|at| Instant::now() >= at)
    }
}
