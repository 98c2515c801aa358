//! Cooperative scheduler
//!
//! One logical thread of control repeatedly calls [`Scheduler::tick`]
//! (directly with a timestamp, or via [`Scheduler::tick_with`] and a
//! [`TimeSource`]). Each registered pipeline has its own period; on each
//! tick, every due pipeline is polled exactly once and re-armed relative
//! to the current time.
//!
//! Re-arming from `now` rather than from the missed due time means a late
//! tick never triggers a catch-up burst: at most one invocation per
//! pipeline per tick, regardless of how far behind the loop fell. Lateness
//! is absorbed, not queued.
//!
//! Pipelines are mutually independent - no ordering guarantee exists
//! between different pipelines within a tick, only the strict
//! source → stages → observers order inside each one.

use heapless::Vec;

use crate::errors::{ConfigError, ConfigResult};
use crate::pipeline::Pipeline;
use crate::time::{TimeSource, Timestamp};

/// Maximum pipelines one scheduler can drive.
pub const MAX_SCHEDULED_PIPELINES: usize = 8;

/// Sampling period and next due time for one pipeline.
///
/// Unarmed at registration; the first tick arms it one full period out,
/// so no source fires before its period has elapsed.
struct Schedule {
    period_ms: u64,
    next_due: Option<Timestamp>,
}

impl Schedule {
    fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            next_due: None,
        }
    }

    /// Whether the schedule is due at `now`; arms or re-arms as needed.
    fn poll(&mut self, now: Timestamp) -> bool {
        match self.next_due {
            None => {
                self.next_due = Some(now + self.period_ms);
                false
            }
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period_ms);
                true
            }
            Some(_) => false,
        }
    }
}

struct Slot {
    pipeline: Pipeline,
    schedule: Schedule,
}

/// Drives registered pipelines on their configured periods.
pub struct Scheduler {
    slots: Vec<Slot, MAX_SCHEDULED_PIPELINES>,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a pipeline to be polled every `period_ms` milliseconds.
    pub fn add(&mut self, pipeline: Pipeline, period_ms: u64) -> ConfigResult<()> {
        if period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        self.slots
            .push(Slot {
                pipeline,
                schedule: Schedule::new(period_ms),
            })
            .map_err(|_| ConfigError::TooManyPipelines)
    }

    /// Service every due pipeline once and re-arm its schedule for
    /// `now + period`. Returns the number of pipelines serviced.
    pub fn tick(&mut self, now: Timestamp) -> usize {
        let mut serviced = 0;
        for slot in self.slots.iter_mut() {
            if slot.schedule.poll(now) {
                slot.pipeline.poll(now);
                serviced += 1;
            }
        }
        serviced
    }

    /// Read the clock and [`tick`](Self::tick).
    pub fn tick_with<T: TimeSource>(&mut self, clock: &T) -> usize {
        self.tick(clock.now())
    }

    /// Number of registered pipelines.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no pipelines are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Inspect a registered pipeline by registration index.
    pub fn pipeline(&self, index: usize) -> Option<&Pipeline> {
        self.slots.get(index).map(|slot| &slot.pipeline)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
