// src/checker/limiter.rs
// =============================================================================
// Caps how many probes run at the same time.
//
// The limiter is a counting gate around tokio's Semaphore:
// - acquire() waits until a slot is free and hands back a permit
// - dropping the permit frees the slot, whether the probe succeeded, failed,
//   or panicked
//
// Waiters are not served in any particular order; only the ceiling matters.
// =============================================================================

use crate::error::CheckError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Holds one slot until dropped
#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl Limiter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free slots right now
    #[cfg(test)]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub async fn acquire(&self) -> Result<Permit, CheckError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| CheckError::LimiterClosed)?;
        Ok(Permit { _permit: permit })
    }
}
