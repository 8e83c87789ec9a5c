//! Control the vibration motor
//!
//! Implementation based upon https://github.com/tstellanova/cst816s/blob/master/examples/touchpad.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::Timer;
use pinetime_watchface::haptics::{Haptics, VibePattern};

/// Controller for the internal vibration motor
pub struct VibrationMotor<'a> {
    /// Pin P0.16: High = off, Low = on
    control_pin: Output<'a, P0_16>,
}

impl<'a> VibrationMotor<'a> {
    /// Initialize vibration controller, the pin must start high
    pub fn init(control_pin: Output<'a, P0_16>) -> Self {
        Self { control_pin }
    }

    /// Play a pattern to the end, the motor is off afterwards
    pub async fn play(&mut self, pattern: VibePattern) {
        defmt::debug!(
            "Vibrating {} times over {} ms",
            pattern.pulses(),
            pattern.duration_ms()
        );
        for (on, duration_ms) in pattern.steps() {
            if on {
                self.control_pin.set_low();
            } else {
                self.control_pin.set_high();
            }
            Timer::after_millis(duration_ms as u64).await;
        }
        self.control_pin.set_high();
    }
}

/// Hands patterns to the task owning the motor. A pattern that was not
/// picked up yet is replaced.
pub struct SignalHaptics {
    signal: &'static Signal<ThreadModeRawMutex, VibePattern>,
}

impl SignalHaptics {
    pub fn new(signal: &'static Signal<ThreadModeRawMutex, VibePattern>) -> Self {
        Self { signal }
    }
}

impl Haptics for SignalHaptics {
    fn double_pulse(&mut self) {
        self.signal.signal(VibePattern::DOUBLE_PULSE);
    }
}
