//! Frame buffer and conversion to display bytes.
//!
//! The tracer writes averaged radiance per pixel; whoever shows the image
//! gets a tightly packed RGB8 buffer from `to_rgb8`.

use image::{Rgb, RgbImage};
use lume_math::{Color, Interval};

/// Vertical order of rows in the exported byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First row is the top of the image (image files, most windowing APIs)
    #[default]
    TopDown,
    /// First row is the bottom of the image (OpenGL texture upload)
    BottomUp,
}

/// Convert a color channel triple to bytes: `round(255 * clamp(c, 0, 1))`.
#[inline]
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let byte = |c: f64| (255.0 * Interval::UNIT.clamp(c)).round() as u8;
    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Width x height grid of radiance values, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Source row for output row `row` under `order`.
    #[inline]
    fn source_row(&self, row: u32, order: RowOrder) -> u32 {
        match order {
            RowOrder::TopDown => row,
            RowOrder::BottomUp => self.height - 1 - row,
        }
    }

    /// Interleaved RGB bytes, 3 per pixel, rows in `order`.
    pub fn to_rgb8(&self, order: RowOrder) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for row in 0..self.height {
            let y = self.source_row(row, order);
            let start = self.index(0, y);
            for color in &self.pixels[start..start + self.width as usize] {
                bytes.extend_from_slice(&color_to_rgb8(*color));
            }
        }
        bytes
    }

    /// Convert to an `image` buffer for encoding.
    pub fn to_image(&self, order: RowOrder) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, row| {
            Rgb(color_to_rgb8(self.get(x, self.source_row(row, order))))
        })
    }
}
