//! Per-thread run serialization.
//!
//! Runs against the same thread id take the thread's lock for their whole
//! duration, so two requests never interleave writes to one history. Distinct
//! threads never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async mutex per thread id, created on first use.
#[derive(Default)]
pub struct ThreadLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ThreadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and returns the lock of `thread_id`. Released when the guard drops.
    pub async fn acquire(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
