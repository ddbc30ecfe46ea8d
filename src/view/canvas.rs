//! RGB frame canvas
//!
//! Backs the compositor with an `image::RgbImage` and exposes it as an
//! embedded-graphics draw target so text and primitives render with the same
//! stack the panel drivers speak.

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use image::{Rgb, RgbImage, imageops};

pub struct Canvas {
    frame: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// The finished frame, handed to the display driver.
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    pub fn fill(&mut self, color: Rgb888) {
        let pixel = Rgb([color.r(), color.g(), color.b()]);
        for p in self.frame.pixels_mut() {
            *p = pixel;
        }
    }

    /// Copy `img` onto the canvas with its top-left corner at (x, y).
    pub fn paste(&mut self, img: &RgbImage, x: i64, y: i64) {
        imageops::replace(&mut self.frame, img, x, y);
    }

    /// Darken every pixel to half intensity; the translucent scrim under the
    /// pause glyph.
    pub fn dim(&mut self) {
        for p in self.frame.pixels_mut() {
            *p = Rgb([p[0] >> 1, p[1] >> 1, p[2] >> 1]);
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.frame.width(), self.frame.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (self.frame.width() as i32, self.frame.height() as i32);
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.x < width && point.y >= 0 && point.y < height {
                self.frame.put_pixel(
                    point.x as u32,
                    point.y as u32,
                    Rgb([color.r(), color.g(), color.b()]),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn fill_covers_every_pixel() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill(Rgb888::new(10, 20, 30));
        assert!(canvas.frame().pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn draws_clip_to_bounds() {
        let mut canvas = Canvas::new(8, 8);
        Rectangle::new(Point::new(6, 6), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut canvas)
            .ok();
        assert_eq!(canvas.frame().get_pixel(7, 7).0, [255, 255, 255]);
        assert_eq!(canvas.frame().get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn dim_halves_intensity() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Rgb888::new(200, 100, 50));
        canvas.dim();
        assert_eq!(canvas.frame().get_pixel(0, 0).0, [100, 50, 25]);
    }
}
