//! # Pixel Grid
//!
//! The random-access RGB view the codec works on. Decoding and encoding of
//! concrete container formats happens elsewhere; the codec only needs to read
//! and write three 8-bit channels per coordinate.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// A rectangular, zero-based grid of RGB pixels.
///
/// Implementations must treat `(x, y)` with `x < width()` and `y < height()`
/// as valid. The codec never addresses pixels outside those bounds.
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Read the `(r, g, b)` channels of the pixel at `(x, y)`.
    fn get_channels(&self, x: u32, y: u32) -> (u8, u8, u8);

    /// Overwrite the `(r, g, b)` channels of the pixel at `(x, y)`.
    fn set_channels(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8);
}

impl PixelGrid for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_channels(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let Rgb([r, g, b]) = *self.get_pixel(x, y);
        (r, g, b)
    }

    fn set_channels(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        self.put_pixel(x, y, Rgb([r, g, b]));
    }
}

/// Alpha is carried through untouched.
impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_channels(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let Rgba([r, g, b, _]) = *self.get_pixel(x, y);
        (r, g, b)
    }

    fn set_channels(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        let pixel = self.get_pixel_mut(x, y);
        pixel[0] = r;
        pixel[1] = g;
        pixel[2] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_grid_preserves_alpha() {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 77]));
        img.set_channels(2, 1, 1, 2, 3);

        assert_eq!(img.get_channels(2, 1), (1, 2, 3));
        assert_eq!(img.get_pixel(2, 1)[3], 77);
        assert_eq!(PixelGrid::width(&img), 4);
        assert_eq!(PixelGrid::height(&img), 3);
    }

    #[test]
    fn rgb_grid_reads_back_writes() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        img.set_channels(1, 1, 200, 100, 50);

        assert_eq!(img.get_channels(1, 1), (200, 100, 50));
        assert_eq!(img.get_channels(0, 0), (0, 0, 0));
    }
}
