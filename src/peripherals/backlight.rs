//! Backlight control
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/backlight.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::{Level, Output},
    peripherals::{P0_14, P0_22, P0_23},
};

/// Three active-low pins, each switching the backlight through a resistor
/// (2.2 kΩ, 100 Ω, 30 Ω). Their combinations give 7 levels plus off.
pub struct Backlight<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
}

impl<'a> Backlight<'a> {
    /// Take the pins, the backlight starts switched off
    pub fn init(low: Output<'a, P0_14>, mid: Output<'a, P0_22>, high: Output<'a, P0_23>) -> Self {
        let mut backlight = Self { low, mid, high };
        backlight.apply(0);
        backlight
    }

    /// Set the brightness level between 0 (off) and 7 (max brightness).
    pub fn set(&mut self, brightness: u8) -> Result<(), Error> {
        if brightness > 7 {
            return Err(Error::OutOfBounds(brightness));
        }
        defmt::debug!("Setting backlight brightness to {}", brightness);
        self.apply(brightness);
        Ok(())
    }

    fn apply(&mut self, brightness: u8) {
        self.low.set_level(active_low(brightness & 0x01 != 0));
        self.mid.set_level(active_low(brightness & 0x02 != 0));
        self.high.set_level(active_low(brightness & 0x04 != 0));
    }
}

fn active_low(on: bool) -> Level {
    if on {
        Level::Low
    } else {
        Level::High
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    OutOfBounds(u8),
}
