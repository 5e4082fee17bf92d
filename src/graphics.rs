//! Graphics Support for the grayscale EPD

use crate::color::Shade;
use embedded_graphics_core::pixelcolor::{Gray8, GrayColor};
use embedded_graphics_core::prelude::*;

/// Display rotation, only 90° increments supported
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display buffer used for drawing with embedded graphics.
///
/// One byte per pixel, row major, in the panel's native orientation. The
/// buffer can be handed to
/// [`display_frame`](crate::traits::GrayscaleDisplay::display_frame) as is.
///
/// - WIDTH: width in pixel when display is not rotated
/// - HEIGHT: height in pixel when display is not rotated
/// - BYTECOUNT: This is redundant with WIDTH * HEIGHT and should be removed when
///   const generic expressions are stabilized
pub struct GrayDisplay<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> {
    buffer: [u8; BYTECOUNT],
    rotation: DisplayRotation,
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Default
    for GrayDisplay<WIDTH, HEIGHT, BYTECOUNT>
{
    /// A white canvas
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        Self {
            buffer: [Shade::White.gray_value(); BYTECOUNT],
            rotation: DisplayRotation::default(),
        }
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> DrawTarget
    for GrayDisplay<WIDTH, HEIGHT, BYTECOUNT>
{
    type Color = Gray8;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> OriginDimensions
    for GrayDisplay<WIDTH, HEIGHT, BYTECOUNT>
{
    fn size(&self) -> Size {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(WIDTH, HEIGHT),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(HEIGHT, WIDTH),
        }
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    GrayDisplay<WIDTH, HEIGHT, BYTECOUNT>
{
    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable access to the raw samples, for renderers that don't go through
    /// embedded-graphics
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Paints the whole buffer with one shade
    pub fn fill(&mut self, shade: Shade) {
        self.buffer.fill(shade.gray_value());
    }

    /// Set a specific pixel color on this display
    pub fn set_pixel(&mut self, pixel: Pixel<Gray8>) {
        let Pixel(point, color) = pixel;

        // final coordinates
        let (x, y) = match self.rotation {
            // as i32 = never use more than 2 billion pixel per line or per column
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (WIDTH as i32 - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => {
                (WIDTH as i32 - 1 - point.x, HEIGHT as i32 - 1 - point.y)
            }
            DisplayRotation::Rotate270 => (point.y, HEIGHT as i32 - 1 - point.x),
        };

        // don't do anything in case of out of range
        if x < 0 || x >= WIDTH as i32 || y < 0 || y >= HEIGHT as i32 {
            return;
        }

        let index = y as usize * WIDTH as usize + x as usize;
        if let Some(sample) = self.buffer.get_mut(index) {
            *sample = color.luma();
        }
    }

    /// Shade of the pixel at the given unrotated position, if it is on the panel
    pub fn shade_at(&self, x: u32, y: u32) -> Option<Shade> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        self.buffer
            .get(y as usize * WIDTH as usize + x as usize)
            .map(|&sample| Shade::from_gray(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
    };

    type Small = GrayDisplay<16, 8, { 16 * 8 }>;

    // test buffer length
    #[test]
    fn graphics_size() {
        let display = crate::epd4in2_gray::Display4in2Gray::default();
        assert_eq!(display.buffer().len(), 120_000);
        assert_eq!(display.size(), Size::new(400, 300));
    }

    // test default background color on all bytes
    #[test]
    fn graphics_default_is_white() {
        let display = Small::default();
        assert!(display
            .buffer()
            .iter()
            .all(|&byte| Shade::from_gray(byte) == Shade::White));
    }

    #[test]
    fn graphics_rotation_0() {
        let mut display = Small::default();
        let _ = Line::new(Point::new(0, 0), Point::new(3, 0))
            .into_styled(PrimitiveStyle::with_stroke(Gray8::from(Shade::Black), 1))
            .draw(&mut display);

        for x in 0..4 {
            assert_eq!(display.shade_at(x, 0), Some(Shade::Black));
        }
        assert_eq!(display.shade_at(4, 0), Some(Shade::White));
        assert_eq!(display.buffer().iter().filter(|&&b| b == 0x00).count(), 4);
    }

    #[test]
    fn graphics_rotation_90() {
        let mut display = Small::default();
        display.set_rotation(DisplayRotation::Rotate90);
        assert_eq!(display.size(), Size::new(8, 16));
        let _ = Pixel(Point::new(0, 0), Gray8::from(Shade::Dark)).draw(&mut display);

        assert_eq!(display.shade_at(15, 0), Some(Shade::Dark));
    }

    #[test]
    fn graphics_rotation_180() {
        let mut display = Small::default();
        display.set_rotation(DisplayRotation::Rotate180);
        let _ = Pixel(Point::new(0, 0), Gray8::from(Shade::Light)).draw(&mut display);

        assert_eq!(display.shade_at(15, 7), Some(Shade::Light));
    }

    #[test]
    fn graphics_rotation_270() {
        let mut display = Small::default();
        display.set_rotation(DisplayRotation::Rotate270);
        let _ = Pixel(Point::new(0, 0), Gray8::from(Shade::Black)).draw(&mut display);

        assert_eq!(display.shade_at(0, 7), Some(Shade::Black));
    }

    #[test]
    fn out_of_range_pixels_are_dropped() {
        let mut display = Small::default();
        let _ = Rectangle::new(Point::new(-4, -4), Size::new(40, 40))
            .into_styled(PrimitiveStyle::with_fill(Gray8::BLACK))
            .draw(&mut display);

        assert!(display.buffer().iter().all(|&byte| byte == 0x00));
        assert_eq!(display.shade_at(16, 0), None);
    }

    #[test]
    fn fill_paints_the_representative_value() {
        let mut display = Small::default();
        display.fill(Shade::Dark);
        assert!(display.buffer().iter().all(|&byte| byte == 0x40));
    }
}
