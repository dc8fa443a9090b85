//! FLIC frame chunk decoders.
//!
//! Each decoder reads its payload from a cursor and applies it to the
//! persistent pixel-index buffer or palette. Payloads are not bounded by the
//! chunk's declared size; a decoder stops with `UnexpectedEof` when the
//! buffer runs out, leaving whatever it already wrote in place.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};

use crate::types::{Palette, Rgb, PALETTE_SIZE};

/// Chunk types this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ChunkType {
    /// 8-bit palette packets.
    Color256 = 4,
    /// Word-oriented delta against the previous frame (FLC).
    Delta = 7,
    /// 6-bit palette packets.
    Color64 = 11,
    /// Byte-oriented delta against the previous frame (FLI).
    Lc = 12,
    /// Clear the frame to color 0.
    Black = 13,
    /// Byte run-length compressed full frame.
    Brun = 15,
    /// Uncompressed full frame.
    Copy = 16,
}

impl ChunkType {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            4 => Some(ChunkType::Color256),
            7 => Some(ChunkType::Delta),
            11 => Some(ChunkType::Color64),
            12 => Some(ChunkType::Lc),
            13 => Some(ChunkType::Black),
            15 => Some(ChunkType::Brun),
            16 => Some(ChunkType::Copy),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            ChunkType::Color256 => "COLOR_256",
            ChunkType::Delta => "DELTA",
            ChunkType::Color64 => "COLOR_64",
            ChunkType::Lc => "LC",
            ChunkType::Black => "BLACK",
            ChunkType::Brun => "BRUN",
            ChunkType::Copy => "COPY",
        }
    }
}

/// Pixel-index buffer of one decode session.
pub struct Canvas<'a> {
    pub pixels: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl Canvas<'_> {
    #[inline]
    fn put(&mut self, index: usize, value: u8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = value;
        }
    }
}

/// COLOR_256 and COLOR_64: `u16` packet count, each packet a skip count,
/// a color count (0 means 256) and that many RGB triples.
///
/// Entries past index 255 are neither read nor written.
pub fn read_color(reader: &mut Cursor<&[u8]>, palette: &mut Palette, vga6: bool) -> io::Result<()> {
    let packets = reader.read_u16::<LittleEndian>()?;
    let mut index = 0usize;

    for _ in 0..packets {
        index += reader.read_u8()? as usize;
        let count = match reader.read_u8()? {
            0 => PALETTE_SIZE,
            n => n as usize,
        };

        for j in 0..count {
            if index + j >= PALETTE_SIZE {
                break;
            }
            let (r, g, b) = (reader.read_u8()?, reader.read_u8()?, reader.read_u8()?);
            let color = if vga6 {
                Rgb::from_vga6(r, g, b)
            } else {
                Rgb::new(r, g, b)
            };
            palette.set((index + j) as u8, color);
        }
        index += count;
    }

    Ok(())
}

/// DELTA: word-oriented line deltas.
///
/// Each line starts with opcode words. A negative word with bit 14 set skips
/// `-word` lines; any other negative word stores its low byte in the last
/// pixel of the current line and moves to the next. A non-negative word is
/// the packet count for the current line.
pub fn read_delta(reader: &mut Cursor<&[u8]>, canvas: &mut Canvas<'_>) -> io::Result<()> {
    let width = canvas.width;
    let mut lines = reader.read_u16::<LittleEndian>()? as u32;
    let mut y = 0usize;

    while lines != 0 {
        lines -= 1;

        let packets = loop {
            let word = reader.read_i16::<LittleEndian>()?;
            if word >= 0 {
                break word as u16;
            }
            if word as u16 & 0x4000 != 0 {
                y += word.unsigned_abs() as usize;
            } else {
                if width > 0 && y < canvas.height {
                    canvas.put((y + 1) * width - 1, word as u8);
                }
                y += 1;
                if lines == 0 {
                    return Ok(());
                }
                lines -= 1;
            }
        };

        if y >= canvas.height {
            break;
        }

        let mut x = 0usize;
        for _ in 0..packets {
            x += reader.read_u8()? as usize;
            let count = reader.read_i8()?;
            let mut index = y * width + x;

            if count >= 0 {
                for _ in 0..count {
                    if x >= width {
                        break;
                    }
                    let (first, second) = (reader.read_u8()?, reader.read_u8()?);
                    write_pair(canvas, &mut index, &mut x, first, second);
                }
            } else {
                let (first, second) = (reader.read_u8()?, reader.read_u8()?);
                for _ in 0..count.unsigned_abs() {
                    if x >= width {
                        break;
                    }
                    write_pair(canvas, &mut index, &mut x, first, second);
                }
            }
        }
        y += 1;
    }

    Ok(())
}

/// Write a pixel pair; the second pixel is dropped past the row end.
#[inline]
fn write_pair(canvas: &mut Canvas<'_>, index: &mut usize, x: &mut usize, first: u8, second: u8) {
    canvas.put(*index, first);
    *index += 1;
    *x += 1;
    if *x < canvas.width {
        canvas.put(*index, second);
    }
    *index += 1;
    *x += 1;
}

/// LC: `u16` lines to skip, `u16` line count, then per line a packet count
/// and `(skip, count)` packets of literal bytes or a repeated byte.
pub fn read_lc(reader: &mut Cursor<&[u8]>, canvas: &mut Canvas<'_>) -> io::Result<()> {
    let skip_lines = reader.read_u16::<LittleEndian>()? as usize;
    let line_count = reader.read_u16::<LittleEndian>()? as usize;

    for y in skip_lines..skip_lines + line_count {
        if y >= canvas.height {
            break;
        }
        let row = y * canvas.width;
        let mut x = 0usize;
        let packets = reader.read_u8()?;

        for _ in 0..packets {
            if x >= canvas.width {
                break;
            }
            x += reader.read_u8()? as usize;
            let count = reader.read_i8()?;

            if count >= 0 {
                for _ in 0..count {
                    if x >= canvas.width {
                        break;
                    }
                    let value = reader.read_u8()?;
                    canvas.put(row + x, value);
                    x += 1;
                }
            } else {
                let value = reader.read_u8()?;
                for _ in 0..count.unsigned_abs() {
                    if x >= canvas.width {
                        break;
                    }
                    canvas.put(row + x, value);
                    x += 1;
                }
            }
        }
    }

    Ok(())
}

/// BLACK: clear every pixel to index 0.
pub fn read_black(canvas: &mut Canvas<'_>) {
    canvas.pixels.fill(0);
}

/// BRUN: every row starts with a packet count; a positive count repeats the
/// next byte, a negative count copies `-count` literal bytes.
pub fn read_brun(reader: &mut Cursor<&[u8]>, canvas: &mut Canvas<'_>) -> io::Result<()> {
    for y in 0..canvas.height {
        let row = y * canvas.width;
        let mut x = 0usize;
        let packets = reader.read_u8()?;

        for _ in 0..packets {
            if x >= canvas.width {
                break;
            }
            let count = reader.read_i8()?;

            if count >= 0 {
                let value = reader.read_u8()?;
                for _ in 0..count {
                    if x >= canvas.width {
                        break;
                    }
                    canvas.put(row + x, value);
                    x += 1;
                }
            } else {
                for _ in 0..count.unsigned_abs() {
                    if x >= canvas.width {
                        break;
                    }
                    let value = reader.read_u8()?;
                    canvas.put(row + x, value);
                    x += 1;
                }
            }
        }
    }

    Ok(())
}

/// COPY: `width * height` raw pixel indices. A short payload fills what it can.
pub fn read_copy(reader: &mut Cursor<&[u8]>, canvas: &mut Canvas<'_>) -> io::Result<()> {
    let size = (canvas.width * canvas.height).min(canvas.pixels.len());
    let copied = reader.read(&mut canvas.pixels[..size])?;
    if copied < size {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}
