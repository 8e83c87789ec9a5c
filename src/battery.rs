//! Battery charge estimation
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// ADC sample outside the 12 bit range
    InvalidMeasurement(i16),
}

/// Convert a 12 bit SAADC sample into the battery voltage in millivolts.
pub fn millivolts_from_adc(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // Keep as 32 bit for the multiplication. The battery sits behind a
            // 1:2 divider and the ADC spans 3.3 V, hence 2 * 1000 * 3.3 / 4096.
            let adc_val = raw_measurement as u32;
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement(raw_measurement)),
    }
}

/// Battery capacity in percent.
///
/// Fixed data points with linear interpolation in between.
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

/// Tracks the last reported charge so only changes are forwarded
#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryMonitor {
    percent: Option<u8>,
}

impl BatteryMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known charge
    pub fn percent(&self) -> Option<u8> {
        self.percent
    }

    /// Feed a raw ADC sample. Returns the new charge if it changed.
    pub fn update(&mut self, raw_measurement: i16) -> Result<Option<u8>, Error> {
        let percent = percent_from_millivolts(millivolts_from_adc(raw_measurement)?);
        if self.percent == Some(percent) {
            return Ok(None);
        }
        debug!("Battery at {}%", percent);
        self.percent = Some(percent);
        Ok(Some(percent))
    }
}
