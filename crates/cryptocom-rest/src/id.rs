//! Request ID generation

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of request IDs
///
/// Called once per authenticated request. IDs only need to be unique among
/// the requests of one client.
pub trait IdGenerator: Send + Sync {
    /// Produce the next request ID
    fn generate(&self) -> i64;
}

/// Monotonic counter, seeded from the wall clock so restarts do not reuse IDs
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    /// Counter starting at the current epoch milliseconds
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    /// Counter starting at a fixed value
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
