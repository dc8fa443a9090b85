//! Palette colors for indexed raster data

use std::fmt;

/// Number of entries in an 8-bit palette
pub const PALETTE_SIZE: usize = 256;

/// A true color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Create a color from 6-bit VGA DAC channels (0..=63), scaled to 8 bits
    /// as `255 * v / 63`.
    ///
    /// Out-of-range inputs wrap the same way an 8-bit store would.
    pub fn from_vga6(r: u8, g: u8, b: u8) -> Self {
        Rgb {
            r: scale_vga6(r),
            g: scale_vga6(g),
            b: scale_vga6(b),
        }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

#[inline]
fn scale_vga6(v: u8) -> u8 {
    (255 * v as u32 / 63) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A 256-entry colormap, all black until updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [Rgb::BLACK; PALETTE_SIZE],
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color at `index`
    #[inline]
    pub fn get(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    /// Overwrite the entry at `index`
    #[inline]
    pub fn set(&mut self, index: u8, color: Rgb) {
        self.entries[index as usize] = color;
    }

    /// All entries in index order
    pub fn entries(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vga6_scaling() {
        assert_eq!(Rgb::from_vga6(0, 63, 32), Rgb::new(0, 255, 129));
    }

    #[test]
    fn test_vga6_out_of_range_wraps() {
        // 255 * 64 / 63 = 259 -> stored as 3
        assert_eq!(Rgb::from_vga6(64, 0, 0).r, 3);
    }

    #[test]
    fn test_palette_default_is_black() {
        let palette = Palette::new();
        assert!(palette.entries().iter().all(|c| *c == Rgb::BLACK));
    }

    #[test]
    fn test_palette_set_get() {
        let mut palette = Palette::new();
        palette.set(255, Rgb::WHITE);
        assert_eq!(palette.get(255), Rgb::WHITE);
        assert_eq!(palette.get(254), Rgb::BLACK);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "RGB(1, 2, 3)");
    }
}
