//! Reactive transform pipeline core for Binnacle
//!
//! Reads slowly-varying physical quantities (resistive sender voltages,
//! digital pulse trains, temperature probes), converts raw samples into
//! calibrated engineering values, and republishes each value only when it
//! changes.
//!
//! Key constraints:
//! - Runs forever on devices with kilobytes of RAM
//! - No heap allocation after pipeline wiring
//! - Every stage returns synchronously; one cooperative control flow
//!
//! ```
//! use binnacle_core::{CurveInterpolator, Pipeline, Sample, Scheduler, Value};
//! use binnacle_core::adapters::{FnObserver, FnSource};
//!
//! let mut curve = CurveInterpolator::new();
//! curve.add_sample(Sample::new(0.0, 0.0)).unwrap();
//! curve.add_sample(Sample::new(4.0, 1.0)).unwrap();
//!
//! let pipeline = Pipeline::builder()
//!     .source(FnSource::new(|| Ok(Value::Float(2.0))))
//!     .stage(curve)
//!     .observer(FnObserver::new(|value| { let _ = value; }))
//!     .build()
//!     .unwrap();
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(pipeline, 500).unwrap();
//!
//! // Cooperative loop: first tick arms the schedule, later ticks fire it.
//! scheduler.tick(0);
//! scheduler.tick(500);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod adapters;
pub mod curve;
pub mod emitter;
pub mod errors;
pub mod pipeline;
pub mod scheduler;
pub mod time;
pub mod traits;
pub mod value;

// Public API
pub use curve::{CurveInterpolator, Sample};
pub use emitter::ChangeGate;
pub use errors::{ConfigError, ConfigResult, SourceError};
pub use pipeline::{Debounce, Frequency, Linear, Pipeline, PipelineBuilder, Stage};
pub use scheduler::Scheduler;
pub use time::{FixedTime, TimeSource, Timestamp};
pub use traits::{Observer, SampleSource};
pub use value::Value;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
