//! Change-Gated Emitter
//!
//! The propagation primitive shared by every pipeline: holds the last
//! forwarded value and notifies observers only when a new value differs.
//! Downstream telemetry sinks therefore see one message per change, not
//! one per sample - the difference between a chatty device and a quiet
//! one on a slow link.
//!
//! Comparison is exact (`PartialEq` on [`Value`]); there is no epsilon
//! tolerance. Callers that want tolerance compose a quantizing transform
//! upstream. An emitter can also be configured to forward unconditionally
//! for sinks that want every sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::Vec;

use crate::errors::{ConfigError, ConfigResult};
use crate::traits::Observer;
use crate::value::Value;

/// Maximum observers attached to one emitter.
///
/// Wiring is static: the observer list is built once at startup and never
/// grows, so a small fixed capacity suffices.
pub const MAX_OBSERVERS: usize = 4;

/// Terminal stage of a pipeline: gates propagation on value change and
/// fans out to the attached observers.
pub struct ChangeGate {
    last: Option<Value>,
    always_emit: bool,
    observers: Vec<Box<dyn Observer>, MAX_OBSERVERS>,
}

impl ChangeGate {
    /// Create an emitter that forwards only on change.
    pub fn new() -> Self {
        Self {
            last: None,
            always_emit: false,
            observers: Vec::new(),
        }
    }

    /// Forward every offered value, changed or not.
    pub fn with_always_emit(mut self, always_emit: bool) -> Self {
        self.always_emit = always_emit;
        self
    }

    /// Register an observer. Observers are invoked synchronously, in
    /// registration order, each time the emitter forwards.
    pub fn attach(&mut self, observer: Box<dyn Observer>) -> ConfigResult<()> {
        self.observers
            .push(observer)
            .map_err(|_| ConfigError::TooManyObservers)
    }

    /// Offer a value; forward it to observers if it differs from the last
    /// forwarded value (or unconditionally when so configured).
    ///
    /// The first offered value always forwards. Returns whether the value
    /// was forwarded.
    pub fn offer(&mut self, value: Value) -> bool {
        if !self.always_emit && self.last == Some(value) {
            return false;
        }

        self.last = Some(value);
        for observer in self.observers.iter_mut() {
            observer.notify(value);
        }
        true
    }

    /// Last value forwarded to observers, if any.
    pub fn last(&self) -> Option<Value> {
        self.last
    }
}

impl Default for ChangeGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        seen: Arc<Mutex<std::vec::Vec<Value>>>,
    }

    impl Observer for Recorder {
        fn notify(&mut self, value: Value) {
            self.seen.lock().unwrap().push(value);
        }
    }

    fn recording_gate() -> (ChangeGate, Arc<Mutex<std::vec::Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(std::vec::Vec::new()));
        let mut gate = ChangeGate::new();
        gate.attach(Box::new(Recorder { seen: seen.clone() })).unwrap();
        (gate, seen)
    }

    #[test]
    fn first_value_always_forwards() {
        let (mut gate, seen) = recording_gate();
        assert!(gate.offer(Value::Float(1.0)));
        assert_eq!(seen.lock().unwrap().as_slice(), &[Value::Float(1.0)]);
    }

    #[test]
    fn repeated_value_suppressed() {
        let (mut gate, seen) = recording_gate();
        assert!(gate.offer(Value::Float(1.0)));
        assert!(!gate.offer(Value::Float(1.0)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn alternating_values_all_forward() {
        let (mut gate, seen) = recording_gate();
        for value in [1.0, 2.0, 1.0, 2.0] {
            assert!(gate.offer(Value::Float(value)));
        }
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn always_emit_ignores_change_detection() {
        let seen = Arc::new(Mutex::new(std::vec::Vec::new()));
        let mut gate = ChangeGate::new().with_always_emit(true);
        gate.attach(Box::new(Recorder { seen: seen.clone() })).unwrap();

        for _ in 0..3 {
            assert!(gate.offer(Value::Bool(true)));
        }
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn observers_notified_in_registration_order() {
        let seen = Arc::new(Mutex::new(std::vec::Vec::new()));
        let mut gate = ChangeGate::new();
        for tag in [10.0, 20.0] {
            let seen = seen.clone();
            gate.attach(Box::new(crate::adapters::FnObserver::new(move |value| {
                if let Value::Float(v) = value {
                    seen.lock().unwrap().push(Value::Float(v + tag));
                }
            })))
            .unwrap();
        }

        gate.offer(Value::Float(1.0));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Value::Float(11.0), Value::Float(21.0)]
        );
    }

    #[test]
    fn observer_capacity_is_bounded() {
        let mut gate = ChangeGate::new();
        for _ in 0..MAX_OBSERVERS {
            gate.attach(Box::new(crate::adapters::FnObserver::new(|_| {})))
                .unwrap();
        }
        assert_eq!(
            gate.attach(Box::new(crate::adapters::FnObserver::new(|_| {}))),
            Err(ConfigError::TooManyObservers)
        );
    }
}
