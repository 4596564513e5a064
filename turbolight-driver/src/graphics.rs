//! embedded-graphics support
//!
//! Drawing goes through [`Oled::set_pixel`], so it marks dirty regions and
//! honours the flush mode like any other pixel write. Pixels outside the
//! panel are clipped.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use turbolight_hal::TwoWireBus;

use crate::driver::Oled;
use crate::framebuffer::{HEIGHT, WIDTH};
use crate::tracking::DirtyTracker;

impl<B, T> DrawTarget for Oled<B, T>
where
    B: TwoWireBus,
    T: DirtyTracker,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let _ = self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

impl<B, T> OriginDimensions for Oled<B, T> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
