//! Watchface configuration
//!
//! Settings that a user or the firmware image decides once at startup:
//! clock style, local time offset, weather refresh cadence and the static
//! screen layout.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
};

/// Pixel color of the PineTime LCD
pub type ColorMode = Rgb565;

pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

/// Central European Time, matches the build-time clock seed
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3_600;

/// Weather is requested whenever the minute is a multiple of this
pub const DEFAULT_WEATHER_REFRESH_MINUTES: u32 = 30;

/// Width of the battery bar at 100 %
pub const BATTERY_TRACK_WIDTH: u32 = 190;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Refresh interval must divide the hour (1, 2, 3, 4, 5, 6, 10, 12, 15,
    /// 20, 30 or 60 minutes)
    InvalidRefreshInterval(u32),
    /// UTC offset must be strictly within ±24h
    InvalidUtcOffset(i32),
}

/// Screen position and colors of every region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub background: ColorMode,
    pub text_color: ColorMode,
    pub bluetooth_icon: Rectangle,
    pub bluetooth_color: ColorMode,
    pub date: Rectangle,
    /// Full battery track, the bar grows from its left edge
    pub battery_track: Rectangle,
    pub battery_track_color: ColorMode,
    pub battery_bar_color: ColorMode,
    pub time: Rectangle,
    pub weather: Rectangle,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            background: ColorMode::BLACK,
            text_color: ColorMode::WHITE,
            bluetooth_icon: Rectangle::new(Point::new(105, 8), Size::new(30, 30)),
            bluetooth_color: ColorMode::new(4, 32, 31),
            date: Rectangle::new(Point::new(0, 46), Size::new(LCD_W, 24)),
            battery_track: Rectangle::new(
                Point::new(((LCD_W - BATTERY_TRACK_WIDTH) / 2) as i32, 76),
                Size::new(BATTERY_TRACK_WIDTH, 4),
            ),
            battery_track_color: ColorMode::new(6, 12, 6),
            battery_bar_color: ColorMode::WHITE,
            time: Rectangle::new(Point::new(0, 96), Size::new(LCD_W, 48)),
            weather: Rectangle::new(Point::new(0, 176), Size::new(LCD_W, 40)),
        }
    }
}

/// Runtime settings of the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchfaceConfig {
    /// `HH:MM` when set, zero padded 12h `hh:MM` otherwise
    pub clock_24h: bool,
    /// Offset added to the synchronised UTC time
    pub utc_offset_secs: i32,
    pub weather_refresh_minutes: u32,
    pub layout: Layout,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            clock_24h: true,
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            weather_refresh_minutes: DEFAULT_WEATHER_REFRESH_MINUTES,
            layout: Layout::default(),
        }
    }
}

impl WatchfaceConfig {
    /// Check settings that would otherwise break tick handling
    pub fn validate(&self) -> Result<(), Error> {
        // Requests must be evenly spaced across the hour boundary
        let minutes = self.weather_refresh_minutes;
        if minutes == 0 || 60 % minutes != 0 {
            return Err(Error::InvalidRefreshInterval(
                self.weather_refresh_minutes,
            ));
        }
        if self.utc_offset_secs.unsigned_abs() >= 86_400 {
            return Err(Error::InvalidUtcOffset(self.utc_offset_secs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(WatchfaceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let config = WatchfaceConfig {
            weather_refresh_minutes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(Error::InvalidRefreshInterval(0)));
    }

    #[test]
    fn refresh_interval_must_divide_the_hour() {
        for minutes in [1, 5, 15, 20, 30, 60] {
            let config = WatchfaceConfig {
                weather_refresh_minutes: minutes,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
        for minutes in [7, 45, 61, 90] {
            let config = WatchfaceConfig {
                weather_refresh_minutes: minutes,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(Error::InvalidRefreshInterval(minutes)));
        }
    }

    #[test]
    fn offset_of_a_full_day_is_rejected() {
        let config = WatchfaceConfig {
            utc_offset_secs: -86_400,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(Error::InvalidUtcOffset(-86_400)));
    }

    #[test]
    fn battery_track_is_centered() {
        let track = Layout::default().battery_track;
        let right = track.top_left.x + track.size.width as i32;
        assert_eq!(track.top_left.x, LCD_W as i32 - right);
    }
}
