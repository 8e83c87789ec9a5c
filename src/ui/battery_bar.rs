//! Battery level bar

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Size,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    Drawable,
};

use crate::config::ColorMode;

/// Bar width in pixels for `percent` of a `track_width` wide track.
///
/// Values above 100 are treated as full.
pub fn bar_width(percent: u8, track_width: u32) -> u32 {
    let fraction = percent.min(100) as f32 / 100.0;
    libm::roundf(fraction * track_width as f32) as u32
}

/// Two rectangles: the full track, then the filled part from its left edge
pub struct BatteryBar {
    pub track: Rectangle,
    pub track_color: ColorMode,
    pub bar_color: ColorMode,
    pub percent: u8,
}

impl BatteryBar {
    /// Area covered by the filled part
    pub fn bar(&self) -> Rectangle {
        Rectangle::new(
            self.track.top_left,
            Size::new(
                bar_width(self.percent, self.track.size.width),
                self.track.size.height,
            ),
        )
    }
}

impl Drawable for BatteryBar {
    type Color = ColorMode;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.track
            .into_styled(PrimitiveStyle::with_fill(self.track_color))
            .draw(target)?;
        self.bar()
            .into_styled(PrimitiveStyle::with_fill(self.bar_color))
            .draw(target)
    }
}
