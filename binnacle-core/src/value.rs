//! Typed readings flowing through a pipeline
//!
//! A pipeline carries exactly one kind of payload: a [`Value`]. Analog
//! senders and temperature probes produce floats; contact inputs (alarm
//! switches, float switches) produce booleans. Keeping both in one closed
//! variant lets every stage, emitter, and observer share a single
//! `consume`/`notify` signature without trait objects in the hot path.
//!
//! Change detection compares values with exact equality - no epsilon
//! tolerance. Callers that need tolerance compose a quantizing transform
//! upstream of the emitter instead.

/// A typed reading produced by a sample source or transform stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Numeric reading (sender voltage, frequency, temperature, ...)
    Float(f64),
    /// Contact reading (alarm input, switch state)
    Bool(bool),
}

impl Value {
    /// Numeric payload, if this is a float reading.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Bool(_) => None,
        }
    }

    /// Contact payload, if this is a boolean reading.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Float(_) => None,
            Value::Bool(v) => Some(*v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
