//! Bluetooth rune, shown while the phone is disconnected

use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::{Point, Size},
    primitives::{Polyline, Primitive, PrimitiveStyle, Rectangle},
    transform::Transform,
    Drawable,
};

use crate::config::ColorMode;

// Rune outline inside a 30x30 box
const RUNE: [Point; 6] = [
    Point::new(9, 9),
    Point::new(21, 20),
    Point::new(15, 26),
    Point::new(15, 4),
    Point::new(21, 10),
    Point::new(9, 21),
];
const RUNE_SIZE: Size = Size::new(30, 30);

pub struct BluetoothIcon {
    pub area: Rectangle,
    pub color: ColorMode,
    pub background: ColorMode,
    /// Icon is hidden while connected
    pub connected: bool,
}

impl BluetoothIcon {
    pub fn is_visible(&self) -> bool {
        !self.connected
    }
}

impl Drawable for BluetoothIcon {
    type Color = ColorMode;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.area
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(target)?;

        if !self.is_visible() {
            return Ok(());
        }

        // Center the rune in the area
        let offset = self.area.center() - Rectangle::new(Point::zero(), RUNE_SIZE).center();
        Polyline::new(&RUNE)
            .translate(offset)
            .into_styled(PrimitiveStyle::with_stroke(self.color, 2))
            .draw(&mut target.clipped(&self.area))
    }
}
