//! Boundary traits: sample sources and observers
//!
//! These two traits are the only seams between the pipeline core and the
//! outside world. How a raw hardware transaction happens (bus protocol,
//! pin read) is the source's private concern; how a calibrated value is
//! serialized and transmitted is the observer's. The core sees neither.

use crate::errors::SourceError;
use crate::value::Value;

/// Produces one raw reading per scheduler invocation.
///
/// Sources are polled on a fixed period by the [`Scheduler`](crate::Scheduler).
/// A source that has no reading available this tick returns
/// `Err(nb::Error::WouldBlock)`; a failed hardware transaction returns
/// `Err(nb::Error::Other(..))`. Both skip propagation for the tick -
/// a failed sample is "no value produced", never a pipeline crash.
///
/// ```
/// use binnacle_core::{SampleSource, SourceError, Value};
///
/// struct TankSender {
///     channel: u8,
/// }
///
/// impl SampleSource for TankSender {
///     fn sample(&mut self) -> nb::Result<Value, SourceError> {
///         // Real implementation reads the ADC channel here.
///         let _ = self.channel;
///         Ok(Value::Float(1.51))
///     }
/// }
/// ```
pub trait SampleSource: Send {
    /// Read one raw value from the underlying hardware.
    fn sample(&mut self) -> nb::Result<Value, SourceError>;
}

/// Receives values forwarded by a change-gated emitter.
///
/// Observers are registered at wiring time and invoked synchronously, in
/// registration order, every time the emitter forwards. `notify` must be
/// computationally bounded; long-latency work (network transmission)
/// belongs behind the observer's own deferred mechanism.
pub trait Observer: Send {
    /// Accept a value the emitter decided to forward.
    fn notify(&mut self, value: Value);
}
