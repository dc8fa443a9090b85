//! FLIC file header.
//!
//! The header is 128 bytes, little-endian:
//!
//! | Offset | Type | Field                         |
//! |--------|------|-------------------------------|
//! | 0      | u32  | file size                     |
//! | 4      | u16  | magic (`0xAF11` / `0xAF12`)   |
//! | 6      | u16  | frame count                   |
//! | 8      | u16  | width                         |
//! | 10     | u16  | height                        |
//! | 12     | u16  | color depth                   |
//! | 14     | u16  | flags                         |
//! | 16     | u32  | speed                         |
//! | 80     | u32  | offset of frame 1 (FLC only)  |
//! | 84     | u32  | offset of frame 2 (FLC only)  |

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Write};

use crate::error::{GrabError, Result};

/// Size of the FLIC file header.
pub const FLIC_HEADER_SIZE: usize = 128;

/// Magic number of Autodesk Animator FLI files.
pub const FLI_MAGIC: u16 = 0xAF11;

/// Magic number of Animator Pro FLC files.
pub const FLC_MAGIC: u16 = 0xAF12;

/// Frame rate used when the header speed is 0.
pub const DEFAULT_FRAME_RATE: u32 = 70;

/// FLI speeds are in 1/70 s ticks.
const FLI_TICKS_PER_SECOND: u64 = 70;

const OFFSET_FRAME1_POS: u64 = 80;

bitflags! {
    /// Header flags written by Animator Pro.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlicFlags: u16 {
        /// File was closed properly after writing.
        const FINISHED = 0x0001;
        /// Ring frame was written.
        const LOOPED = 0x0002;
    }
}

/// FLI or FLC container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlicVariant {
    /// Original Animator format, speed in 1/70 s.
    Fli,
    /// Animator Pro format, speed in milliseconds.
    Flc,
}

impl FlicVariant {
    pub fn from_magic(magic: u16) -> Option<Self> {
        match magic {
            FLI_MAGIC => Some(FlicVariant::Fli),
            FLC_MAGIC => Some(FlicVariant::Flc),
            _ => None,
        }
    }

    pub fn magic(self) -> u16 {
        match self {
            FlicVariant::Fli => FLI_MAGIC,
            FlicVariant::Flc => FLC_MAGIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlicVariant::Fli => "FLI",
            FlicVariant::Flc => "FLC",
        }
    }
}

/// Parsed FLIC file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlicHeader {
    pub file_size: u32,
    pub variant: FlicVariant,
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub flags: FlicFlags,
    pub speed: u32,
    /// Explicit offset of the first frame, 0 when absent. FLC only.
    pub offset_frame1: u32,
    /// Explicit offset of the second frame, 0 when absent. FLC only.
    pub offset_frame2: u32,
}

impl FlicHeader {
    /// Header for a file with no frames yet.
    pub fn new(variant: FlicVariant, width: u16, height: u16, speed: u32) -> Self {
        Self {
            file_size: FLIC_HEADER_SIZE as u32,
            variant,
            frame_count: 0,
            width,
            height,
            depth: 8,
            flags: FlicFlags::empty(),
            speed,
            offset_frame1: 0,
            offset_frame2: 0,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FLIC_HEADER_SIZE {
            log::error!("FLIC data too small: {} bytes", data.len());
            return Err(GrabError::too_short(FLIC_HEADER_SIZE, data.len()));
        }

        let mut cursor = Cursor::new(data);
        let file_size = cursor.read_u32::<LittleEndian>()?;
        let magic = cursor.read_u16::<LittleEndian>()?;
        let variant = FlicVariant::from_magic(magic).ok_or(GrabError::BadMagic {
            expected: FLI_MAGIC as u32,
            found: magic as u32,
        })?;
        let frame_count = cursor.read_u16::<LittleEndian>()?;
        let width = cursor.read_u16::<LittleEndian>()?;
        let height = cursor.read_u16::<LittleEndian>()?;
        let depth = cursor.read_u16::<LittleEndian>()?;
        let flags = FlicFlags::from_bits_retain(cursor.read_u16::<LittleEndian>()?);
        let speed = cursor.read_u32::<LittleEndian>()?;

        let (offset_frame1, offset_frame2) = match variant {
            FlicVariant::Flc => {
                cursor.set_position(OFFSET_FRAME1_POS);
                (
                    cursor.read_u32::<LittleEndian>()?,
                    cursor.read_u32::<LittleEndian>()?,
                )
            }
            FlicVariant::Fli => (0, 0),
        };

        log::debug!(
            "FLIC header: size={}, type={}, frames={}, {}x{}, depth={}, flags={:#06x}, speed={}",
            file_size,
            variant.name(),
            frame_count,
            width,
            height,
            depth,
            flags.bits(),
            speed
        );

        Ok(Self {
            file_size,
            variant,
            frame_count,
            width,
            height,
            depth,
            flags,
            speed,
            offset_frame1,
            offset_frame2,
        })
    }

    /// Frames per second derived from `speed`.
    ///
    /// Large FLC speeds give 0.
    pub fn frame_rate(&self) -> u32 {
        if self.speed == 0 {
            return DEFAULT_FRAME_RATE;
        }
        let rate = match self.variant {
            FlicVariant::Fli => 1000 * self.speed as u64 / FLI_TICKS_PER_SECOND,
            FlicVariant::Flc => 1000 / self.speed as u64,
        };
        rate.min(u32::MAX as u64) as u32
    }

    /// Playback length in milliseconds; 0 when the frame rate is 0.
    pub fn duration_ms(&self) -> u32 {
        match self.frame_rate() {
            0 => 0,
            rate => self.frame_count as u32 * 1000 / rate,
        }
    }

    /// Write the 128-byte header. Unused bytes are zero.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut header = Vec::with_capacity(FLIC_HEADER_SIZE);
        header.write_u32::<LittleEndian>(self.file_size)?;
        header.write_u16::<LittleEndian>(self.variant.magic())?;
        header.write_u16::<LittleEndian>(self.frame_count)?;
        header.write_u16::<LittleEndian>(self.width)?;
        header.write_u16::<LittleEndian>(self.height)?;
        header.write_u16::<LittleEndian>(self.depth)?;
        header.write_u16::<LittleEndian>(self.flags.bits())?;
        header.write_u32::<LittleEndian>(self.speed)?;

        header.resize(OFFSET_FRAME1_POS as usize, 0);
        header.write_u32::<LittleEndian>(self.offset_frame1)?;
        header.write_u32::<LittleEndian>(self.offset_frame2)?;
        header.resize(FLIC_HEADER_SIZE, 0);

        writer.write_all(&header)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(FLIC_HEADER_SIZE);
        self.write(&mut output)?;
        Ok(output)
    }
}
