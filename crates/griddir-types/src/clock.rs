//! Wall-clock abstraction.
//!
//! Liveness derivation compares heartbeat timestamps against "now"; the
//! directory takes its clock by injection so tests can pin time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current unix time in whole seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs() as i64)
    }
}

/// A clock pinned to one instant; test double.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2020() {
        assert!(SystemClock.now_unix() > 1_577_836_800);
    }

    #[test]
    fn test_fixed_clock_returns_pinned_instant() {
        assert_eq!(FixedClock(42).now_unix(), 42);
    }
}
