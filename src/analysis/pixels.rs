//! Pixel access abstraction
//!
//! The engine never decodes images or talks to cameras. Callers hand it
//! anything implementing [`PixelSource`]: an owned [`RgbaBuffer`], an
//! `image::RgbaImage`, or their own frame type.

use crate::color::RgbColor;
use crate::{EngineError, Result};

/// One 8-bit RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque pixel
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    /// Color channels without alpha
    pub const fn rgb(&self) -> RgbColor {
        RgbColor::new(self.r, self.g, self.b)
    }
}

impl From<RgbColor> for Rgba {
    fn from(color: RgbColor) -> Self {
        Self::opaque(color.r, color.g, color.b)
    }
}

/// Read-only access to a 2D RGBA frame
///
/// Implementations must return a pixel for every `x < width()` and
/// `y < height()`; the engine never reads outside those bounds.
pub trait PixelSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel(&self, x: u32, y: u32) -> Rgba;
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        (**self).pixel(x, y)
    }
}

impl PixelSource for image::RgbaImage {
    fn width(&self) -> u32 {
        image::ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        image::ImageBuffer::height(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Rgba::new(r, g, b, a)
    }
}

/// Owned row-major RGBA byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Wrap a raw RGBA buffer (4 bytes per pixel, row-major)
    ///
    /// # Errors
    ///
    /// Returns `InvalidPixelBuffer` if `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                EngineError::invalid_parameter("dimensions", format!("{}x{}", width, height))
            })?;

        if data.len() != expected {
            return Err(EngineError::InvalidPixelBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    /// Buffer of a single repeated pixel
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Self {
        let count = width as usize * height as usize;
        let data = [pixel.r, pixel.g, pixel.b, pixel.a].repeat(count);
        Self { width, height, data }
    }

    /// Overwrite one pixel
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba) {
        let idx = self.offset(x, y);
        self.data[idx..idx + 4].copy_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl PixelSource for RgbaBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.offset(x, y);
        Rgba::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }
}
