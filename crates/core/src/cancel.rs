//! Cooperative cancellation.
//!
//! A `CancellationToken` is owned by the caller and passed by reference into
//! every long-running pipeline call. The pipeline only polls it; it never
//! cancels or resets it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Work stops at the next poll point.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Poll point: returns `AppError::Cancelled` once cancellation was requested.
    pub fn check(&self) -> AppResult<()> {
        if self.is_cancelled() {
            tracing::info!("Cancellation requested, stopping at poll point");
            return Err(AppError::Cancelled);
        }
        Ok(())
    }
}
