//! Piecewise-Linear Calibration Curves
//!
//! ## Motivation
//!
//! Resistive senders are rarely linear. A fluid level sender in a V-shaped
//! tank, for instance, maps resistance to fill fraction through a curve
//! that depends on both the sender geometry and the tank shape. Rather
//! than model each device analytically, we calibrate: the installer
//! records a handful of (raw, engineering) pairs and the device
//! interpolates linearly between them at runtime.
//!
//! ## Table Design
//!
//! Tables are fixed-capacity ([`MAX_CURVE_SAMPLES`]) and owned exclusively
//! by one [`CurveInterpolator`]. They are populated during setup
//! (`clear_samples`/`add_sample`) and immutable afterwards - no allocation
//! after wiring, no reconfiguration path.
//!
//! Samples must be added in strictly ascending input order.
//! [`CurveInterpolator::validate`] enforces this (plus non-emptiness and
//! finiteness) and is called by the pipeline builder, so a malformed table
//! is a construction failure, never a runtime one.
//!
//! ## Interpolation
//!
//! ```text
//! y = y0 + (x - x0) * (y1 - y0) / (x1 - x0)    for x0 <= x < x1
//! ```
//!
//! Inputs at or beyond the table bounds extrapolate flat: the first
//! sample's output below range, the last sample's output above. A
//! single-sample table therefore returns that sample's output everywhere.
//!
//! The bracket search is a linear scan. Tables hold at most a few dozen
//! samples, where a scan beats binary search on both code size and
//! branch predictability.

use heapless::Vec;

use crate::errors::{ConfigError, ConfigResult};

/// Maximum samples per calibration table.
///
/// 32 samples x 16 bytes = 512 bytes per table, plenty for hand-recorded
/// calibration points.
pub const MAX_CURVE_SAMPLES: usize = 32;

/// One calibration point: raw input to engineering output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Raw measurement (sender volts, ohms, counts)
    pub input: f64,
    /// Calibrated engineering value
    pub output: f64,
}

impl Sample {
    /// Create a calibration point.
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Piecewise-linear mapping from raw measurements to engineering values.
#[derive(Debug, Clone, Default)]
pub struct CurveInterpolator {
    samples: Vec<Sample, MAX_CURVE_SAMPLES>,
}

impl CurveInterpolator {
    /// Create an empty table. Populate with [`add_sample`](Self::add_sample)
    /// before wiring into a pipeline.
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Discard all samples.
    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    /// Append a calibration point.
    ///
    /// Samples must arrive in ascending input order; ordering is checked
    /// once by [`validate`](Self::validate) rather than per call.
    pub fn add_sample(&mut self, sample: Sample) -> ConfigResult<()> {
        self.samples
            .push(sample)
            .map_err(|_| ConfigError::CurveTableFull)
    }

    /// Number of calibration points.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table has no samples yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check the table is usable: non-empty, finite, strictly ascending.
    ///
    /// Called by `PipelineBuilder::build`; a violation prevents the
    /// pipeline from starting.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.samples.is_empty() {
            return Err(ConfigError::EmptyCurveTable);
        }
        for (index, sample) in self.samples.iter().enumerate() {
            if !sample.input.is_finite() || !sample.output.is_finite() {
                return Err(ConfigError::NonFiniteSample { index });
            }
            if index > 0 && sample.input <= self.samples[index - 1].input {
                return Err(ConfigError::NonAscendingCurve { index });
            }
        }
        Ok(())
    }

    /// Map a raw measurement through the curve.
    ///
    /// Flat extrapolation beyond either table bound. An unvalidated empty
    /// table acts as identity rather than panicking; the builder rejects
    /// that configuration before a pipeline can run.
    pub fn interpolate(&self, x: f64) -> f64 {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return x,
        };

        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }

        for pair in self.samples.windows(2) {
            let (s0, s1) = (pair[0], pair[1]);
            if x < s1.input {
                let dx = s1.input - s0.input;
                if dx <= 0.0 {
                    // Duplicate input, undefined slope: earlier sample wins
                    return s0.output;
                }
                return s0.output + (x - s0.input) * (s1.output - s0.output) / dx;
            }
        }

        last.output
    }
}
