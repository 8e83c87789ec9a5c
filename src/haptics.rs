//! Vibration alerts
//!
//! The controller only asks for an alert through [`Haptics`]. Playing a
//! [`VibePattern`] takes a few hundred milliseconds, so the firmware hands
//! the pattern to a separate task and returns immediately.

/// Haptic actuator as seen by the watchface
pub trait Haptics {
    /// Fire-and-forget two short pulses
    fn double_pulse(&mut self);
}

impl<T: Haptics + ?Sized> Haptics for &mut T {
    fn double_pulse(&mut self) {
        (**self).double_pulse()
    }
}

/// Alternating on/off durations in milliseconds, starting with "on"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VibePattern {
    durations_ms: &'static [u32],
}

impl VibePattern {
    pub const DOUBLE_PULSE: VibePattern = VibePattern::new(&[150, 120, 150]);

    pub const fn new(durations_ms: &'static [u32]) -> Self {
        Self { durations_ms }
    }

    /// `(motor_on, duration_ms)` steps in playing order
    pub fn steps(&self) -> impl Iterator<Item = (bool, u32)> + 'static {
        self.durations_ms
            .iter()
            .enumerate()
            .map(|(index, duration)| (index % 2 == 0, *duration))
    }

    /// Total playing time
    pub fn duration_ms(&self) -> u32 {
        self.durations_ms.iter().sum()
    }

    /// Number of times the motor turns on
    pub fn pulses(&self) -> usize {
        self.durations_ms.len().div_ceil(2)
    }
}
