//! Engine Monitor Example
//!
//! Wires up the pipelines of a small engine-room monitor with simulated
//! hardware: a fuel tank sender, a tacho pulse counter, a coolant
//! temperature probe, and an oil pressure alarm contact.
//!
//! ## What You'll Learn
//!
//! - Calibrating a non-linear resistive sender with a curve table
//! - Converting pulse counts to engine RPM
//! - Debouncing an alarm contact
//! - Driving everything from the cooperative scheduler
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_engine_monitor
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use binnacle_core::adapters::{FnObserver, FnSource};
use binnacle_core::{
    CurveInterpolator, Debounce, FixedTime, Frequency, Linear, Pipeline, Sample, Scheduler,
    TimeSource, Value,
};

fn main() {
    println!("Binnacle Engine Monitor Example");
    println!("===============================\n");

    let mut scheduler = Scheduler::new();

    // ------------------------------------------------------------------
    // Fuel tank: the sender is anything but linear, so calibrate it with
    // points recorded at known fill levels (volts in, fill fraction out).
    // ------------------------------------------------------------------
    let mut tank_curve = CurveInterpolator::new();
    for (volts, level) in [
        (0.00, 0.00), // assure proper bottom
        (1.02, 0.25),
        (2.00, 0.50),
        (3.00, 0.75),
        (4.00, 1.00), // assure proper top
    ] {
        tank_curve
            .add_sample(Sample::new(volts, level))
            .expect("tank curve fits in table");
    }

    // Simulated sender: the tank drains slowly, in steps the size of ADC
    // noise, so most samples repeat the previous voltage.
    let tank_sample = Arc::new(AtomicU32::new(0));
    let tank_volts = {
        let n = tank_sample.clone();
        move || {
            let step = n.fetch_add(1, Ordering::Relaxed) / 4;
            Ok(Value::Float(3.2 - 0.1 * step as f64))
        }
    };

    let fuel = Pipeline::builder()
        .source(FnSource::new(tank_volts))
        .stage(tank_curve)
        .observer(FnObserver::new(|value| {
            if let Value::Float(level) = value {
                println!("tanks.fuel.0.currentLevel     = {:.3}", level);
            }
        }))
        .build()
        .expect("fuel pipeline config is valid");
    scheduler.add(fuel, 500).expect("scheduler has room");

    // ------------------------------------------------------------------
    // Tacho: the flywheel sensor yields pulse counts per sampling period;
    // the frequency stage turns those into Hz, linear into RPM.
    // ------------------------------------------------------------------
    let tacho_sample = Arc::new(AtomicU32::new(0));
    let tacho_counts = {
        let n = tacho_sample.clone();
        move || {
            // Idle at first, then throttle up
            let count = if n.fetch_add(1, Ordering::Relaxed) < 3 { 13.0 } else { 30.0 };
            Ok(Value::Float(count))
        }
    };

    let tacho = Pipeline::builder()
        .source(FnSource::new(tacho_counts))
        .stage(Frequency::new(1.0))
        .stage(Linear::new(60.0, 0.0)) // Hz to RPM
        .observer(FnObserver::new(|value| {
            if let Value::Float(rpm) = value {
                println!("propulsion.main.revolutions   = {:.0} rpm", rpm);
            }
        }))
        .build()
        .expect("tacho pipeline config is valid");
    scheduler.add(tacho, 1000).expect("scheduler has room");

    // ------------------------------------------------------------------
    // Coolant temperature: probe reads Celsius, telemetry wants Kelvin.
    // ------------------------------------------------------------------
    let coolant_sample = Arc::new(AtomicU32::new(0));
    let coolant_celsius = {
        let n = coolant_sample.clone();
        move || {
            let warmup = n.fetch_add(1, Ordering::Relaxed) as f64;
            Ok(Value::Float((20.0 + 8.0 * warmup).min(84.0)))
        }
    };

    let coolant = Pipeline::builder()
        .source(FnSource::new(coolant_celsius))
        .stage(Linear::new(1.0, 273.15))
        .observer(FnObserver::new(|value| {
            if let Value::Float(kelvin) = value {
                println!("propulsion.main.coolantTemp   = {:.2} K", kelvin);
            }
        }))
        .build()
        .expect("coolant pipeline config is valid");
    scheduler.add(coolant, 1000).expect("scheduler has room");

    // ------------------------------------------------------------------
    // Oil pressure alarm: a bouncy contact that must hold for 600ms
    // before the state change is trusted.
    // ------------------------------------------------------------------
    let alarm_sample = Arc::new(AtomicU32::new(0));
    let alarm_contact = {
        let n = alarm_sample.clone();
        move || {
            let i = n.fetch_add(1, Ordering::Relaxed);
            // Closed from t=3s on, with one noise blip before that
            Ok(Value::Bool(i == 7 || i >= 15))
        }
    };

    let alarm = Pipeline::builder()
        .source(FnSource::new(alarm_contact))
        .stage(Debounce::new(600))
        .observer(FnObserver::new(|value| {
            if let Value::Bool(raised) = value {
                println!("notifications.oilPressureLow  = {}", raised);
            }
        }))
        .build()
        .expect("alarm pipeline config is valid");
    scheduler.add(alarm, 200).expect("scheduler has room");

    // ------------------------------------------------------------------
    // Cooperative loop over five seconds of simulated time. On hardware
    // this is the firmware main loop with a real monotonic clock.
    // ------------------------------------------------------------------
    let mut clock = FixedTime::new(0);
    while clock.now() <= 5000 {
        scheduler.tick_with(&clock);
        clock.advance(100);
    }

    println!("\nDone: each line above is one change-gated telemetry update;");
    println!("repeated samples and the alarm contact blip produced nothing.");
}
