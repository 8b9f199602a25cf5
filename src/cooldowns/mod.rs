//! Named per-entity timers
//!
//! There is no scheduler: each query compares a stored expiry against the
//! monotonic clock on demand. Writers are single-threaded per entity; the
//! combat session enforces that.

use ahash::AHashMap;
use std::time::{Duration, Instant};

/// Compare-on-demand cooldown timers keyed by name ("attack", "combat_move")
#[derive(Debug, Clone, Default)]
pub struct Cooldowns {
    timers: AHashMap<String, Instant>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or replace) a timer lasting `secs` seconds.
    pub fn add(&mut self, key: &str, secs: u32) {
        self.timers
            .insert(key.to_string(), Instant::now() + Duration::from_secs(secs.into()));
    }

    /// Push an existing timer `secs` further out; starts one if absent or
    /// already elapsed.
    pub fn extend(&mut self, key: &str, secs: u32) {
        let now = Instant::now();
        let base = match self.timers.get(key) {
            Some(&expiry) if expiry > now => expiry,
            _ => now,
        };
        self.timers
            .insert(key.to_string(), base + Duration::from_secs(secs.into()));
    }

    /// True when no active timer holds this key.
    pub fn ready(&self, key: &str) -> bool {
        match self.timers.get(key) {
            Some(&expiry) => expiry <= Instant::now(),
            None => true,
        }
    }

    /// Time remaining; zero when ready.
    pub fn time_left(&self, key: &str) -> Duration {
        match self.timers.get(key) {
            Some(&expiry) => expiry.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Remaining whole seconds, rounded up so "1" never reads as "0".
    pub fn time_left_secs(&self, key: &str) -> u64 {
        let left = self.time_left(key);
        if left.is_zero() {
            0
        } else {
            let secs = left.as_secs();
            if left.subsec_nanos() > 0 {
                secs + 1
            } else {
                secs
            }
        }
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
