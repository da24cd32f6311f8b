use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::models::MessageChannel;

/// Counters for the notification poller
#[derive(Debug, Default, Clone)]
pub struct PollStats {
    /// Completed poll cycles
    pub cycles: u64,
    /// Failed endpoint fetches by channel
    pub failures: HashMap<MessageChannel, u64>,
    /// Notifications handed to the sink by channel
    pub dispatched: HashMap<MessageChannel, u64>,
    /// Group messages skipped because they came from `system` or the user
    pub suppressed: u64,
    /// Sink errors (the message still counts as seen)
    pub dispatch_errors: u64,
    pub last_cycle_at: Option<SystemTime>,
}

impl PollStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&mut self) {
        self.cycles += 1;
        self.last_cycle_at = Some(SystemTime::now());
    }

    pub fn record_failure(&mut self, channel: MessageChannel) {
        *self.failures.entry(channel).or_insert(0) += 1;
    }

    pub fn record_dispatch(&mut self, channel: MessageChannel) {
        *self.dispatched.entry(channel).or_insert(0) += 1;
    }

    pub fn failures_for(&self, channel: MessageChannel) -> u64 {
        self.failures.get(&channel).copied().unwrap_or(0)
    }

    pub fn dispatched_for(&self, channel: MessageChannel) -> u64 {
        self.dispatched.get(&channel).copied().unwrap_or(0)
    }

    pub fn total_dispatched(&self) -> u64 {
        self.dispatched.values().sum()
    }
}

/// Thread-safe wrapper for poll stats
#[derive(Debug, Clone)]
pub struct SharedPollStats {
    inner: Arc<RwLock<PollStats>>,
}

impl Default for SharedPollStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedPollStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PollStats::new())),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut PollStats)) {
        if let Ok(mut stats) = self.inner.write() {
            f(&mut stats);
        }
    }

    pub fn snapshot(&self) -> PollStats {
        self.inner.read().map(|s| s.clone()).unwrap_or_default()
    }
}
