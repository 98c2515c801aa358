//! Closure adapters for the source and observer boundaries
//!
//! Most hardware glue is a single read or a single write. Rather than
//! define a named type per sender, wrap the closure:
//!
//! ```
//! use binnacle_core::adapters::{FnObserver, FnSource};
//! use binnacle_core::Value;
//!
//! let source = FnSource::new(|| Ok(Value::Float(12.6)));
//! let observer = FnObserver::new(|value| { let _ = value; });
//! # let _ = (source, observer);
//! ```

use crate::errors::SourceError;
use crate::traits::{Observer, SampleSource};
use crate::value::Value;

/// Wraps a closure as a [`SampleSource`].
pub struct FnSource<F> {
    read: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> nb::Result<Value, SourceError> + Send,
{
    /// Wrap `read` as a sample source.
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> SampleSource for FnSource<F>
where
    F: FnMut() -> nb::Result<Value, SourceError> + Send,
{
    fn sample(&mut self) -> nb::Result<Value, SourceError> {
        (self.read)()
    }
}

/// Wraps a closure as an [`Observer`].
pub struct FnObserver<F> {
    notify: F,
}

impl<F> FnObserver<F>
where
    F: FnMut(Value) + Send,
{
    /// Wrap `notify` as an observer.
    pub fn new(notify: F) -> Self {
        Self { notify }
    }
}

impl<F> Observer for FnObserver<F>
where
    F: FnMut(Value) + Send,
{
    fn notify(&mut self, value: Value) {
        (self.notify)(value)
    }
}

/// Logs each forwarded value under a fixed label.
///
/// Debug aid mirroring a serial console printer: attach next to the real
/// telemetry observer to watch a pipeline's output change.
#[cfg(feature = "log")]
pub struct LogObserver {
    label: &'static str,
}

#[cfg(feature = "log")]
impl LogObserver {
    /// Create an observer logging under `label`.
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

#[cfg(feature = "log")]
impl Observer for LogObserver {
    fn notify(&mut self, value: Value) {
        match value {
            Value::Float(v) => log::debug!("{}: {}", self.label, v),
            Value::Bool(v) => log::debug!("{}: {}", self.label, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_source_passes_through() {
        let mut source = FnSource::new(|| Ok(Value::Float(3.3)));
        assert_eq!(source.sample(), Ok(Value::Float(3.3)));
    }

    #[test]
    fn fn_source_propagates_errors() {
        let mut source = FnSource::new(|| {
            Err(nb::Error::Other(SourceError::ReadFailed {
                reason: "bus timeout",
            }))
        });
        assert!(matches!(source.sample(), Err(nb::Error::Other(_))));
    }

    #[test]
    fn fn_observer_invokes_closure() {
        let mut count = 0;
        {
            let mut observer = FnObserver::new(|_| count += 1);
            observer.notify(Value::Bool(false));
            observer.notify(Value::Bool(true));
        }
        assert_eq!(count, 2);
    }
}
