//! UI definitions module
//!
//! [`DisplayState`] is what the watchface shows, [`Region`] names the screen
//! areas that can be redrawn independently and [`WatchFace`] turns the state
//! into pixels on any `DrawTarget`.

use core::ops::{BitOr, BitOrAssign};

use embedded_graphics::draw_target::DrawTarget;

use crate::{config::ColorMode, text::TextBuffer};

mod battery_bar;
mod bluetooth_icon;
mod default_watchface;
pub mod format;

pub use battery_bar::{bar_width, BatteryBar};
pub use bluetooth_icon::BluetoothIcon;
pub use default_watchface::DefaultWatchface;

// One byte less than the classic C buffers, which kept room for the NUL
pub type TimeText = TextBuffer<7>;
pub type DateText = TextBuffer<15>;
pub type WeatherText = TextBuffer<31>;
/// Temperature part of the weather text, e.g. `72F`
pub type TemperatureText = TextBuffer<7>;

/// Shown until the first complete weather report arrives
pub const WEATHER_PLACEHOLDER: &str = "Loading...";

/// State for the watch face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub current_time: TimeText,
    pub current_date: DateText,
    pub weather_text: WeatherText,
    /// Always within 0..=100
    pub battery_percent: u8,
    pub bluetooth_connected: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            current_time: TimeText::new(),
            current_date: DateText::new(),
            weather_text: WeatherText::from_str_truncated(WEATHER_PLACEHOLDER),
            battery_percent: 0,
            bluetooth_connected: false,
        }
    }
}

/// Independently redrawn screen area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Time,
    Date,
    Weather,
    Battery,
    Bluetooth,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Time,
        Region::Date,
        Region::Weather,
        Region::Battery,
        Region::Bluetooth,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of regions that need a redraw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Regions(u8);

impl Regions {
    pub const NONE: Regions = Regions(0);
    pub const ALL: Regions = Regions(0b1_1111);

    pub const fn only(region: Region) -> Self {
        Regions(region.bit())
    }

    pub fn insert(&mut self, region: Region) {
        self.0 |= region.bit();
    }

    pub fn contains(&self, region: Region) -> bool {
        self.0 & region.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Regions in drawing order
    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        Region::ALL.into_iter().filter(|region| self.contains(*region))
    }
}

impl From<Region> for Regions {
    fn from(region: Region) -> Self {
        Regions::only(region)
    }
}

impl BitOr<Region> for Region {
    type Output = Regions;

    fn bitor(self, rhs: Region) -> Regions {
        Regions(self.bit() | rhs.bit())
    }
}

impl BitOr for Regions {
    type Output = Regions;

    fn bitor(self, rhs: Regions) -> Regions {
        Regions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Regions {
    fn bitor_assign(&mut self, rhs: Regions) {
        self.0 |= rhs.0;
    }
}

pub trait WatchFace {
    /// Redraw a single region from the state
    fn draw_region<D>(
        &self,
        state: &DisplayState,
        region: Region,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;

    /// Paint the static parts of the face, before any region
    fn draw_background<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;

    /// Redraw every region in `regions`
    fn draw<D>(&self, state: &DisplayState, regions: Regions, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        for region in regions.iter() {
            self.draw_region(state, region, target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_collect_and_iterate_in_drawing_order() {
        let mut regions = Region::Bluetooth | Region::Time;
        regions.insert(Region::Weather);

        let order: Vec<Region> = regions.iter().collect();
        assert_eq!(order, [Region::Time, Region::Weather, Region::Bluetooth]);
        assert!(!regions.contains(Region::Battery));
    }

    #[test]
    fn all_contains_every_region() {
        assert!(Region::ALL.iter().all(|region| Regions::ALL.contains(*region)));
        assert!(Regions::NONE.is_empty());
    }

    #[test]
    fn default_state_shows_placeholder() {
        let state = DisplayState::default();
        assert_eq!(state.weather_text, WEATHER_PLACEHOLDER);
        assert!(state.current_time.is_empty());
    }
}
