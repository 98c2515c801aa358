//! Transform pipelines with composable stages
//!
//! ## Overview
//!
//! A pipeline is the static wiring from one sample source, through zero or
//! more transform stages, into a change-gated emitter with its observers:
//!
//! ```text
//! Source → Stage 1 → Stage 2 → ... → Stage N → Emitter → Observers
//!   ↓         ↓                         ↓         ↓          ↓
//! Sample  Calibrate  Debounce ...    Scale    Gate on    Telemetry
//!                                             change
//! ```
//!
//! Values flow strictly downstream. Every stage consumes one value and
//! produces zero or one value, synchronously; absence of a value is the
//! sole "nothing to propagate" signal, never an error.
//!
//! ## Module Organization
//!
//! - `stages` - the closed set of transform stages (curve, debounce,
//!   linear, frequency)
//! - `builder` - pipeline construction and configuration validation
//!
//! Pipelines are built once at startup and never rewired; all capacity is
//! fixed at compile time.

pub mod builder;
pub mod stages;

pub use builder::{Pipeline, PipelineBuilder};
pub use stages::{Debounce, Frequency, Linear, Stage};

/// Maximum number of stages in a pipeline.
///
/// Real installations chain two or three transforms; eight leaves slack
/// without letting a misconfigured builder grow unbounded.
pub const MAX_PIPELINE_STAGES: usize = 8;
