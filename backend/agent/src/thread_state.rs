//! Per-thread conversation state.

use std::time::Duration;

use moka::sync::Cache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadState {
    /// The bot has not answered in the thread yet, or was thanked.
    #[default]
    Inactive,
    /// The bot answered and keeps following the thread.
    Active,
}

/// Bounded, expiring map from thread key to state. A thread that has been
/// idle longer than the TTL, or was evicted for capacity, reads as
/// `Inactive` again.
pub struct ThreadStates {
    cache: Cache<String, ThreadState>,
}

impl ThreadStates {
    pub fn new(time_to_idle: Duration, max_threads: u64) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_idle(time_to_idle)
                .max_capacity(max_threads)
                .build(),
        }
    }

    pub fn get(&self, thread: &str) -> ThreadState {
        self.cache.get(thread).unwrap_or_default()
    }

    pub fn activate(&self, thread: &str) {
        self.cache.insert(thread.to_string(), ThreadState::Active);
    }

    /// Forget the thread; absent reads as `Inactive`.
    pub fn deactivate(&self, thread: &str) {
        self.cache.invalidate(thread);
    }
}
