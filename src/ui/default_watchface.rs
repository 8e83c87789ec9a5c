//! Default watchface

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{MonoFont, MonoTextStyle},
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    Drawable,
};
use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::{TextBoxStyle, TextBoxStyleBuilder},
    TextBox,
};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

use super::{BatteryBar, BluetoothIcon, DisplayState, Region, WatchFace};
use crate::config::{ColorMode, Layout};

/// Text label with a fixed area and font
struct Label<'a> {
    bounds: Rectangle,
    character_style: MonoTextStyle<'a, ColorMode>,
    textbox_style: TextBoxStyle,
}

impl<'a> Label<'a> {
    fn new(bounds: Rectangle, font: &'a MonoFont<'a>, layout: &Layout) -> Self {
        Self {
            bounds,
            character_style: MonoTextStyle::new(font, layout.text_color),
            textbox_style: TextBoxStyleBuilder::new()
                .alignment(HorizontalAlignment::Center)
                .vertical_alignment(VerticalAlignment::Middle)
                .build(),
        }
    }

    /// Clear the label area and draw `text` centered in it
    fn draw<D>(&self, text: &str, background: ColorMode, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(background))
            .draw(target)?;
        TextBox::with_textbox_style(text, self.bounds, self.character_style, self.textbox_style)
            .draw(target)?;
        Ok(())
    }
}

/// Basic default watchface: date above the battery bar, large time in the
/// center, weather below it and the bluetooth rune on top.
pub struct DefaultWatchface<'a> {
    layout: Layout,
    /// Time label
    time_label: Label<'a>,
    /// Date label
    date_label: Label<'a>,
    /// Weather label
    weather_label: Label<'a>,
}

impl DefaultWatchface<'static> {
    pub fn new(layout: Layout) -> Self {
        Self {
            time_label: Label::new(layout.time, &PROFONT_24_POINT, &layout),
            date_label: Label::new(layout.date, &PROFONT_18_POINT, &layout),
            weather_label: Label::new(layout.weather, &PROFONT_18_POINT, &layout),
            layout,
        }
    }
}

impl<'a> WatchFace for DefaultWatchface<'a> {
    fn draw_background<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        target.clear(self.layout.background)
    }

    fn draw_region<D>(
        &self,
        state: &DisplayState,
        region: Region,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let background = self.layout.background;
        match region {
            Region::Time => self
                .time_label
                .draw(state.current_time.as_str(), background, target),
            Region::Date => self
                .date_label
                .draw(state.current_date.as_str(), background, target),
            Region::Weather => self
                .weather_label
                .draw(state.weather_text.as_str(), background, target),
            Region::Battery => BatteryBar {
                track: self.layout.battery_track,
                track_color: self.layout.battery_track_color,
                bar_color: self.layout.battery_bar_color,
                percent: state.battery_percent,
            }
            .draw(target),
            Region::Bluetooth => BluetoothIcon {
                area: self.layout.bluetooth_icon,
                color: self.layout.bluetooth_color,
                background,
                connected: state.bluetooth_connected,
            }
            .draw(target),
        }
    }
}
