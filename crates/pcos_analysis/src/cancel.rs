//! Cooperative cancellation for long analysis runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pcos_foundation::{Error, Result};

/// A shared flag checked between files.
///
/// Clones share the same flag, so a caller can keep one clone and hand
/// another to the analyzer running on a different thread.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` once cancellation has been requested.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Cancelled`](pcos_foundation::ErrorKind::Cancelled).
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::cancelled())
        } else {
            Ok(())
        }
    }
}
