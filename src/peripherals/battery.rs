//! Battery status check
//!
//! Samples the battery voltage on P0.31 and feeds it to a [`BatteryMonitor`].

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use pinetime_watchface::battery::{self, BatteryMonitor};

pub struct Battery<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Pin P0.12: high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
    monitor: BatteryMonitor,
}

impl<'a> Battery<'a> {
    /// Configure battery sampling on boot. The ADC must be calibrated.
    pub fn init(adc: Saadc<'a, 1>, pin_charge_indication: Input<'a, P0_12>) -> Self {
        Self {
            adc,
            pin_charge_indication,
            monitor: BatteryMonitor::new(),
        }
    }

    /// Charging state of the battery
    pub fn is_charging(&self) -> bool {
        self.pin_charge_indication.is_low()
    }

    /// Take one sample. Returns the charge in percent if it changed.
    pub async fn sample(&mut self) -> Result<Option<u8>, battery::Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        self.monitor.update(buf[0])
    }
}
