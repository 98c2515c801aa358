//! Pipeline construction and polling
//!
//! The builder is the single place configuration can fail: every
//! capacity overflow and malformed calibration table surfaces from
//! [`PipelineBuilder::build`] as a [`ConfigError`], before the pipeline
//! ever runs. After `build` succeeds, polling cannot error - a failed
//! sample or a suppressing stage simply produces nothing that tick.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::Vec;

use crate::emitter::ChangeGate;
use crate::errors::{ConfigError, ConfigResult};
use crate::time::Timestamp;
use crate::traits::{Observer, SampleSource};
use crate::value::Value;

use super::{Stage, MAX_PIPELINE_STAGES};

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// A fixed chain from one sample source through transform stages into a
/// change-gated emitter.
///
/// Built once by [`PipelineBuilder`]; the stage sequence is fixed for the
/// process lifetime. The scheduler drives it by calling
/// [`poll`](Self::poll) whenever the associated schedule is due.
pub struct Pipeline {
    source: Box<dyn SampleSource>,
    stages: Vec<Stage, MAX_PIPELINE_STAGES>,
    emitter: ChangeGate,
}

impl Pipeline {
    /// Start building a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Sample the source once and push the value through the stage
    /// sequence into the emitter.
    ///
    /// Returns whether a value reached the observers. A source that is
    /// not ready, a failed read, or a stage that suppresses the value all
    /// end propagation for this tick without error.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let mut value = match self.source.sample() {
            Ok(value) => value,
            Err(nb::Error::WouldBlock) => return false,
            Err(nb::Error::Other(_err)) => {
                log_warn!("sample read failed: {}", _err);
                return false;
            }
        };

        for stage in self.stages.iter_mut() {
            value = match stage.consume(value, now) {
                Some(value) => value,
                None => return false,
            };
        }

        self.emitter.offer(value)
    }

    /// Last value forwarded to this pipeline's observers.
    pub fn last_output(&self) -> Option<Value> {
        self.emitter.last()
    }

    /// Number of transform stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for [`Pipeline`].
///
/// Wiring errors (capacity overflows) are recorded as they happen and
/// reported by [`build`](Self::build), so the fluent chain stays
/// ergonomic while construction remains the fatal checkpoint the rest of
/// the system relies on.
pub struct PipelineBuilder {
    source: Option<Box<dyn SampleSource>>,
    stages: Vec<Stage, MAX_PIPELINE_STAGES>,
    emitter: ChangeGate,
    always_emit: bool,
    error: Option<ConfigError>,
}

impl PipelineBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            source: None,
            stages: Vec::new(),
            emitter: ChangeGate::new(),
            always_emit: false,
            error: None,
        }
    }

    /// Set the sample source.
    pub fn source<S: SampleSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Append a transform stage.
    pub fn stage(mut self, stage: impl Into<Stage>) -> Self {
        if self.stages.push(stage.into()).is_err() {
            self.record(ConfigError::TooManyStages);
        }
        self
    }

    /// Attach an observer to the terminal emitter.
    pub fn observer<O: Observer + 'static>(mut self, observer: O) -> Self {
        if let Err(error) = self.emitter.attach(Box::new(observer)) {
            self.record(error);
        }
        self
    }

    /// Forward every value to observers instead of gating on change.
    pub fn always_emit(mut self, always_emit: bool) -> Self {
        self.always_emit = always_emit;
        self
    }

    /// Validate the configuration and produce the pipeline.
    ///
    /// Fails on a missing source, any recorded capacity overflow, or a
    /// malformed calibration table; the pipeline must not start.
    pub fn build(self) -> ConfigResult<Pipeline> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let source = self.source.ok_or(ConfigError::MissingSource)?;
        for stage in &self.stages {
            stage.validate()?;
        }

        Ok(Pipeline {
            source,
            stages: self.stages,
            emitter: self.emitter.with_always_emit(self.always_emit),
        })
    }

    fn record(&mut self, error: ConfigError) {
        // First error wins; later ones are usually cascade
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FnObserver, FnSource};
    use crate::curve::{CurveInterpolator, Sample};
    use crate::errors::SourceError;
    use crate::pipeline::{Debounce, Linear};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn volts_curve() -> CurveInterpolator {
        let mut curve = CurveInterpolator::new();
        curve.add_sample(Sample::new(0.0, 0.0)).unwrap();
        curve.add_sample(Sample::new(4.0, 1.0)).unwrap();
        curve
    }

    #[test]
    fn build_requires_source() {
        let result = Pipeline::builder().stage(Linear::new(1.0, 0.0)).build();
        assert!(matches!(result, Err(ConfigError::MissingSource)));
    }

    #[test]
    fn build_rejects_empty_curve_table() {
        let result = Pipeline::builder()
            .source(FnSource::new(|| Ok(Value::Float(0.0))))
            .stage(CurveInterpolator::new())
            .build();
        assert!(matches!(result, Err(ConfigError::EmptyCurveTable)));
    }

    #[test]
    fn build_rejects_stage_overflow() {
        let mut builder = Pipeline::builder().source(FnSource::new(|| Ok(Value::Float(0.0))));
        for _ in 0..=MAX_PIPELINE_STAGES {
            builder = builder.stage(Linear::new(1.0, 0.0));
        }
        assert!(matches!(builder.build(), Err(ConfigError::TooManyStages)));
    }

    #[test]
    fn poll_runs_stages_in_order() {
        let notified = Arc::new(AtomicU32::new(0));
        let seen = notified.clone();

        let mut pipeline = Pipeline::builder()
            .source(FnSource::new(|| Ok(Value::Float(2.0))))
            .stage(volts_curve())
            .stage(Linear::new(100.0, 0.0))
            .observer(FnObserver::new(move |value| {
                // 2.0 V → 0.5 through the curve → 50.0 after scaling
                assert_eq!(value, Value::Float(50.0));
                seen.fetch_add(1, Ordering::Relaxed);
            }))
            .build()
            .unwrap();

        assert!(pipeline.poll(0));
        assert_eq!(notified.load(Ordering::Relaxed), 1);
        assert_eq!(pipeline.last_output(), Some(Value::Float(50.0)));
    }

    #[test]
    fn poll_gates_on_change() {
        let notified = Arc::new(AtomicU32::new(0));
        let seen = notified.clone();

        let mut pipeline = Pipeline::builder()
            .source(FnSource::new(|| Ok(Value::Float(1.0))))
            .observer(FnObserver::new(move |_| {
                seen.fetch_add(1, Ordering::Relaxed);
            }))
            .build()
            .unwrap();

        assert!(pipeline.poll(0));
        assert!(!pipeline.poll(100));
        assert!(!pipeline.poll(200));
        assert_eq!(notified.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn poll_skips_failed_samples() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let mut pipeline = Pipeline::builder()
            .source(FnSource::new(move || {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                match n {
                    0 => Err(nb::Error::Other(SourceError::ReadFailed {
                        reason: "bus timeout",
                    })),
                    1 => Err(nb::Error::WouldBlock),
                    _ => Ok(Value::Float(1.5)),
                }
            }))
            .build()
            .unwrap();

        assert!(!pipeline.poll(0));
        assert!(!pipeline.poll(100));
        assert!(pipeline.poll(200));
        assert_eq!(pipeline.last_output(), Some(Value::Float(1.5)));
    }

    #[test]
    fn debounce_holds_propagation_until_stable() {
        let mut pipeline = Pipeline::builder()
            .source(FnSource::new(|| Ok(Value::Bool(true))))
            .stage(Debounce::new(100))
            .build()
            .unwrap();

        assert!(!pipeline.poll(0));
        assert!(!pipeline.poll(50));
        assert!(pipeline.poll(100));
        assert_eq!(pipeline.last_output(), Some(Value::Bool(true)));
    }
}
