//! Clock abstraction for mutation timestamps.
//!
//! # Invariants
//! - Each mutating engine call reads the clock exactly once.
//! - `SystemClock` never returns the same value twice, so consecutive
//!   mutations are strictly ordered even within one millisecond.

use crate::model::capability::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of "now" for the engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock in epoch milliseconds, forced to be strictly increasing.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, epoch_millis);
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = wall.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Milliseconds since the epoch, saturating at `i64::MAX`.
fn epoch_millis(elapsed: Duration) -> Timestamp {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{epoch_millis, Clock, SystemClock};
    use std::time::Duration;

    #[test]
    fn system_clock_is_strictly_increasing() {
        let clock = SystemClock::new();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let current = clock.now();
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn system_clock_tracks_wall_time() {
        let clock = SystemClock::new();
        // 2020-01-01T00:00:00Z
        assert!(clock.now() > 1_577_836_800_000);
    }

    #[test]
    fn epoch_millis_saturates_instead_of_wrapping() {
        assert_eq!(epoch_millis(Duration::from_millis(1_500)), 1_500);
        assert_eq!(epoch_millis(Duration::MAX), i64::MAX);
    }
}
