//! Time handling for the cooperative scheduler
//!
//! The scheduler never reads a clock directly; it is handed timestamps (or
//! a [`TimeSource`]) by the platform's main loop. That keeps the core
//! portable across bare metal, RTOS ticks, and hosted test runs, and makes
//! every time-dependent behavior deterministic under test via
//! [`FixedTime`].

/// Timestamp in milliseconds since an arbitrary epoch (typically device boot).
pub type Timestamp = u64;

/// Source of time for the scheduler.
///
/// Implementations might read a hardware timer peripheral, an RTOS tick
/// count, or the host clock. Monotonicity is expected: schedules are armed
/// relative to the latest observed timestamp, so a clock that jumps
/// backwards delays dispatch until it catches up again.
pub trait TimeSource {
    /// Current timestamp in milliseconds.
    fn now(&self) -> Timestamp;

    /// Whether this source tracks wall clock time (vs monotonic-since-boot).
    fn is_wall_clock(&self) -> bool;
}

/// Host clock, milliseconds since the Unix epoch.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Manually-advanced time source for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a fixed source starting at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp.
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(100);
        assert_eq!(time.now(), 100);
    }
}
