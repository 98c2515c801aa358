//! Error types for pipeline construction and sampling
//!
//! Two families, matching the two moments things can go wrong:
//!
//! 1. **Configuration errors** surface from `PipelineBuilder::build` or
//!    `Scheduler::add` and prevent the pipeline from starting. They are
//!    fatal at startup, never raised per-sample.
//! 2. **Source errors** are runtime hardware read failures. The core's
//!    only obligation is to treat them as "no value produced this tick";
//!    propagation is skipped and the scheduler carries on.
//!
//! All error data is inline - no String, only `&'static str` reasons -
//! so errors stay `Copy` and cost nothing to return in hot paths.

use thiserror_no_std::Error;

/// Result type for pipeline construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Static configuration rejected at pipeline construction time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Calibration table has no samples
    #[error("calibration table has no samples")]
    EmptyCurveTable,

    /// Calibration sample out of ascending input order
    #[error("calibration sample {index} is not in ascending input order")]
    NonAscendingCurve {
        /// Index of the offending sample within the table
        index: usize,
    },

    /// Calibration sample input or output is NaN or infinite
    #[error("calibration sample {index} is not a finite number")]
    NonFiniteSample {
        /// Index of the offending sample within the table
        index: usize,
    },

    /// Calibration table capacity exceeded during setup
    #[error("calibration table capacity exceeded")]
    CurveTableFull,

    /// More stages than a pipeline can hold
    #[error("pipeline stage capacity exceeded")]
    TooManyStages,

    /// More observers than an emitter can hold
    #[error("observer capacity exceeded")]
    TooManyObservers,

    /// More pipelines than the scheduler can hold
    #[error("scheduler slot capacity exceeded")]
    TooManyPipelines,

    /// Sampling period of zero would fire the source on every tick
    #[error("sampling period must be non-zero")]
    ZeroPeriod,

    /// Pipeline built without a sample source
    #[error("pipeline has no sample source")]
    MissingSource,
}

/// Hardware read failure reported by a sample source.
///
/// A source that is merely not ready this tick reports
/// `nb::Error::WouldBlock` instead; both outcomes skip propagation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The underlying bus or pin transaction failed
    #[error("sensor read failed: {reason}")]
    ReadFailed {
        /// Driver-supplied description of the failure
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::EmptyCurveTable => defmt::write!(fmt, "empty calibration table"),
            Self::NonAscendingCurve { index } => {
                defmt::write!(fmt, "sample {} not ascending", index)
            }
            Self::NonFiniteSample { index } => {
                defmt::write!(fmt, "sample {} not finite", index)
            }
            Self::CurveTableFull => defmt::write!(fmt, "calibration table full"),
            Self::TooManyStages => defmt::write!(fmt, "too many stages"),
            Self::TooManyObservers => defmt::write!(fmt, "too many observers"),
            Self::TooManyPipelines => defmt::write!(fmt, "too many pipelines"),
            Self::ZeroPeriod => defmt::write!(fmt, "zero sampling period"),
            Self::MissingSource => defmt::write!(fmt, "no sample source"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReadFailed { reason } => defmt::write!(fmt, "read failed: {}", reason),
        }
    }
}
