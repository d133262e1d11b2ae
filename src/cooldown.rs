//! Per-user command cooldowns, kept in memory only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current instant, swapped out in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct CooldownTracker {
    clock: Arc<dyn Clock>,
    until: Mutex<HashMap<u64, Instant>>,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        CooldownTracker::with_clock(Arc::new(SystemClock))
    }
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        CooldownTracker { clock, until: Mutex::new(HashMap::new()) }
    }

    // The map stays consistent even if a holder panicked
    fn entries(&self) -> MutexGuard<'_, HashMap<u64, Instant>> {
        self.until.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks `user_id` for `duration` unless it is already blocked, in which case the time
    /// left is returned. Checking and arming happen under one lock.
    pub fn try_arm(&self, user_id: u64, duration: Duration) -> Result<(), Duration> {
        let now = self.clock.now();
        let mut entries = self.entries();
        if let Some(left) = time_left(&entries, user_id, now) {
            return Err(left);
        }
        // Expired entries carry no information, drop them so the map only holds active cooldowns
        entries.retain(|_, until| *until > now);
        entries.insert(user_id, now + duration);
        Ok(())
    }

    /// Lifts the cooldown of `user_id`, for commands that failed after arming it.
    pub fn release(&self, user_id: u64) {
        self.entries().remove(&user_id);
    }

    /// Whether `user_id` may run a gated command now.
    #[cfg(test)]
    pub fn check(&self, user_id: u64) -> bool {
        self.remaining(user_id).is_none()
    }

    /// Time left before `user_id` may run a gated command again, if any.
    #[cfg(test)]
    pub fn remaining(&self, user_id: u64) -> Option<Duration> {
        time_left(&self.entries(), user_id, self.clock.now())
    }

    /// Blocks `user_id` for `duration` from now, whatever its current state.
    #[cfg(test)]
    pub fn arm(&self, user_id: u64, duration: Duration) {
        self.release(user_id);
        let _ = self.try_arm(user_id, duration);
    }

    /// Number of users currently tracked
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().len()
    }
}

fn time_left(entries: &HashMap<u64, Instant>, user_id: u64, now: Instant) -> Option<Duration> {
    entries
        .get(&user_id)
        .and_then(|until| until.checked_duration_since(now))
        .filter(|left| !left.is_zero())
}
