//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, ColorInversion, Orientation};

use pinetime_watchface::{
    config::{LCD_H, LCD_W},
    ui::{DisplayState, Regions, WatchFace},
};

use super::backlight::Backlight;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// ST7789 panel with its backlight
pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
    backlight: Backlight<'a>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Reset and configure the panel. The backlight stays off until the
    /// first frame is drawn.
    pub fn init(
        spim: Spim<'a, SPI>,
        cs_pin: Output<'a, P0_25>,
        dc_pin: Output<'a, P0_18>,
        rst_pin: Output<'a, P0_26>,
        backlight: Backlight<'a>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W as u16, LCD_H as u16)
            .with_orientation(Orientation::Portrait(false))
            .with_invert_colors(ColorInversion::Inverted)
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        Ok(Self { lcd, backlight })
    }

    /// Paint the whole face and switch the backlight on
    pub fn show<F: WatchFace>(
        &mut self,
        face: &F,
        state: &DisplayState,
        brightness: u8,
    ) -> Result<(), Error> {
        face.draw_background(&mut self.lcd).map_err(Error::Draw)?;
        self.render(face, state, Regions::ALL)?;
        self.backlight.set(brightness).map_err(|_| Error::Backlight)
    }

    /// Redraw the given regions only
    pub fn render<F: WatchFace>(
        &mut self,
        face: &F,
        state: &DisplayState,
        regions: Regions,
    ) -> Result<(), Error> {
        face.draw(state, regions, &mut self.lcd).map_err(Error::Draw)
    }
}

#[derive(Debug)]
pub enum Error {
    Init,
    Draw(mipidsi::Error),
    Backlight,
}

impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Init => defmt::write!(f, "display init failed"),
            Error::Draw(e) => defmt::write!(f, "drawing failed: {}", defmt::Debug2Format(e)),
            Error::Backlight => defmt::write!(f, "backlight level out of range"),
        }
    }
}
