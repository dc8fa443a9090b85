//! Decoded raster frames

use super::color::{Palette, Rgb};

/// A decoded animation frame as packed RGB triples, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    /// `width * height * 3` bytes
    pub pixels: Vec<u8>,
}

impl RgbFrame {
    /// Resolve a buffer of palette indices through `palette`.
    ///
    /// `indices` must hold `width * height` entries.
    pub fn from_indexed(width: usize, height: usize, indices: &[u8], palette: &Palette) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 3);
        for &index in indices.iter().take(width * height) {
            let color = palette.get(index);
            pixels.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Color at (`x`, `y`), or `None` outside the frame
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        self.pixels
            .get(i..i + 3)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
    }
}
