//! Built-in transform stages
//!
//! The stage set is a closed sum type: each variant owns its own state and
//! is dispatched through a single [`Stage::consume`] operation. On the
//! devices this runs on, that keeps dispatch branch-predictable and
//! ownership trivial - there is exactly one place a value can be, and it
//! moves downstream.
//!
//! Numeric stages ([`Stage::Curve`], [`Stage::Linear`], [`Stage::Frequency`])
//! transform float readings and pass boolean readings through untouched;
//! [`Stage::Debounce`] works uniformly over both (alarm contacts are its
//! main customer).

use crate::curve::CurveInterpolator;
use crate::errors::ConfigResult;
use crate::time::Timestamp;
use crate::value::Value;

/// Suppresses transient flicker: a new value must persist for a minimum
/// stable duration before it propagates.
///
/// Two conceptual states, pending and confirmed, collapsed into three
/// fields: the current candidate, when it became the candidate, and the
/// last value actually emitted. Runs indefinitely; there is no terminal
/// state.
pub struct Debounce {
    stable_ms: u64,
    candidate: Option<Candidate>,
    last_emitted: Option<Value>,
}

struct Candidate {
    value: Value,
    since: Timestamp,
}

impl Debounce {
    /// Require values to hold stable for `stable_ms` before propagating.
    pub fn new(stable_ms: u64) -> Self {
        Self {
            stable_ms,
            candidate: None,
            last_emitted: None,
        }
    }

    fn consume(&mut self, value: Value, now: Timestamp) -> Option<Value> {
        match &self.candidate {
            Some(candidate) if candidate.value == value => {
                let held_long_enough = now.saturating_sub(candidate.since) >= self.stable_ms;
                if held_long_enough && self.last_emitted != Some(value) {
                    self.last_emitted = Some(value);
                    Some(value)
                } else {
                    None
                }
            }
            _ => {
                // New candidate: restart the stability window, emit nothing
                self.candidate = Some(Candidate { value, since: now });
                None
            }
        }
    }
}

/// Affine scaling: `output = value * scale + offset`.
///
/// Pure and total; used for unit conversion (Celsius to Kelvin, volts to
/// ohms through a known divider). `scale = 0` is legal and collapses the
/// output to a constant.
pub struct Linear {
    scale: f64,
    offset: f64,
}

impl Linear {
    /// Create an affine transform with the given scale and offset.
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Float(v) => Value::Float(v * self.scale + self.offset),
            Value::Bool(_) => value,
        }
    }
}

/// Converts a pulse count sampled on a fixed period into a frequency in Hz.
///
/// `output = count * multiplier * 1000 / elapsed_ms`, where elapsed time
/// is measured between consecutive samples. The first sample only
/// establishes the reference instant and produces nothing. `multiplier`
/// corrects for pulses-per-revolution on tacho senders.
pub struct Frequency {
    multiplier: f64,
    last_sample: Option<Timestamp>,
}

impl Frequency {
    /// Create a frequency transform with the given count multiplier.
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            last_sample: None,
        }
    }

    fn consume(&mut self, value: Value, now: Timestamp) -> Option<Value> {
        let count = match value.as_float() {
            Some(count) => count,
            None => return Some(value),
        };

        match self.last_sample.replace(now) {
            None => None,
            Some(previous) => {
                let elapsed_ms = now.saturating_sub(previous);
                if elapsed_ms == 0 {
                    return None;
                }
                Some(Value::Float(
                    count * self.multiplier * 1000.0 / elapsed_ms as f64,
                ))
            }
        }
    }
}

/// The closed set of transform stages a pipeline can chain.
///
/// Each variant owns its internal state (last value, last-change
/// timestamp); stages are never shared between pipelines.
pub enum Stage {
    /// Piecewise-linear calibration through a sample table
    Curve(CurveInterpolator),
    /// Minimum-stable-duration flicker suppression
    Debounce(Debounce),
    /// Affine scale and offset
    Linear(Linear),
    /// Pulse count to Hz conversion
    Frequency(Frequency),
}

impl Stage {
    /// Consume one value, producing zero or one value.
    pub fn consume(&mut self, value: Value, now: Timestamp) -> Option<Value> {
        match self {
            Stage::Curve(curve) => Some(match value {
                Value::Float(v) => Value::Float(curve.interpolate(v)),
                Value::Bool(_) => value,
            }),
            Stage::Debounce(debounce) => debounce.consume(value, now),
            Stage::Linear(linear) => Some(linear.apply(value)),
            Stage::Frequency(frequency) => frequency.consume(value, now),
        }
    }

    /// Stage name for logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Curve(_) => "curve",
            Stage::Debounce(_) => "debounce",
            Stage::Linear(_) => "linear",
            Stage::Frequency(_) => "frequency",
        }
    }

    /// Check this stage's static configuration.
    ///
    /// Called for every stage by `PipelineBuilder::build`.
    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            Stage::Curve(curve) => curve.validate(),
            _ => Ok(()),
        }
    }
}

impl From<CurveInterpolator> for Stage {
    fn from(curve: CurveInterpolator) -> Self {
        Stage::Curve(curve)
    }
}

impl From<Debounce> for Stage {
    fn from(debounce: Debounce) -> Self {
        Stage::Debounce(debounce)
    }
}

impl From<Linear> for Stage {
    fn from(linear: Linear) -> Self {
        Stage::Linear(linear)
    }
}

impl From<Frequency> for Stage {
    fn from(frequency: Frequency) -> Self {
        Stage::Frequency(frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_suppresses_flicker() {
        let mut debounce = Debounce::new(100);

        // Flickering input: every change restarts the window
        assert_eq!(debounce.consume(Value::Float(1.0), 0), None);
        assert_eq!(debounce.consume(Value::Float(2.0), 10), None);
        assert_eq!(debounce.consume(Value::Float(1.0), 20), None);
        assert_eq!(debounce.consume(Value::Float(3.0), 30), None);

        // Held stable past the window: exactly one emission, final value
        assert_eq!(debounce.consume(Value::Float(3.0), 130), Some(Value::Float(3.0)));

        // Already confirmed: no re-emission
        assert_eq!(debounce.consume(Value::Float(3.0), 230), None);
    }

    #[test]
    fn debounce_emits_again_after_change() {
        let mut debounce = Debounce::new(50);

        assert_eq!(debounce.consume(Value::Bool(false), 0), None);
        assert_eq!(debounce.consume(Value::Bool(false), 50), Some(Value::Bool(false)));

        // Alarm trips and holds
        assert_eq!(debounce.consume(Value::Bool(true), 100), None);
        assert_eq!(debounce.consume(Value::Bool(true), 120), None);
        assert_eq!(debounce.consume(Value::Bool(true), 150), Some(Value::Bool(true)));
    }

    #[test]
    fn debounce_window_restarts_on_each_change() {
        let mut debounce = Debounce::new(100);

        assert_eq!(debounce.consume(Value::Float(1.0), 0), None);
        // 90ms in, a blip resets the window
        assert_eq!(debounce.consume(Value::Float(9.0), 90), None);
        // The original value must now hold for a full window again
        assert_eq!(debounce.consume(Value::Float(1.0), 180), None);
        assert_eq!(debounce.consume(Value::Float(1.0), 250), None);
        assert_eq!(debounce.consume(Value::Float(1.0), 280), Some(Value::Float(1.0)));
    }

    #[test]
    fn linear_converts_units() {
        let to_kelvin = Linear::new(1.0, 273.15);
        assert_eq!(to_kelvin.apply(Value::Float(0.0)), Value::Float(273.15));

        let halved = Linear::new(0.5, 0.0);
        assert_eq!(halved.apply(Value::Float(10.0)), Value::Float(5.0));

        // Zero scale is legal: output collapses to the offset
        let constant = Linear::new(0.0, 7.0);
        assert_eq!(constant.apply(Value::Float(123.0)), Value::Float(7.0));
    }

    #[test]
    fn linear_passes_booleans_through() {
        let transform = Linear::new(2.0, 1.0);
        assert_eq!(transform.apply(Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn frequency_needs_two_samples() {
        let mut frequency = Frequency::new(1.0);

        assert_eq!(frequency.consume(Value::Float(10.0), 1000), None);
        // 25 pulses over 500ms = 50 Hz
        assert_eq!(
            frequency.consume(Value::Float(25.0), 1500),
            Some(Value::Float(50.0))
        );
    }

    #[test]
    fn frequency_applies_multiplier() {
        // Two pulses per revolution: halve the count
        let mut frequency = Frequency::new(0.5);

        assert_eq!(frequency.consume(Value::Float(0.0), 0), None);
        assert_eq!(
            frequency.consume(Value::Float(100.0), 1000),
            Some(Value::Float(50.0))
        );
    }

    #[test]
    fn frequency_skips_zero_interval() {
        let mut frequency = Frequency::new(1.0);

        assert_eq!(frequency.consume(Value::Float(5.0), 1000), None);
        assert_eq!(frequency.consume(Value::Float(5.0), 1000), None);
    }

    #[test]
    fn curve_stage_calibrates_floats_only() {
        use crate::curve::Sample;

        let mut curve = CurveInterpolator::new();
        curve.add_sample(Sample::new(0.0, 0.0)).unwrap();
        curve.add_sample(Sample::new(10.0, 100.0)).unwrap();
        let mut stage = Stage::from(curve);

        assert_eq!(stage.consume(Value::Float(5.0), 0), Some(Value::Float(50.0)));
        assert_eq!(stage.consume(Value::Bool(true), 0), Some(Value::Bool(true)));
        assert_eq!(stage.name(), "curve");
    }
}
