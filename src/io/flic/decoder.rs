//! Multi-frame FLIC decoding.
//!
//! A [`FrameDecoder`] owns the state shared by all frames of one decode
//! session: the pixel-index buffer that delta chunks build on, the palette
//! that color chunks update, and the notifications recorded along the way.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Cursor};

use super::chunks::{self, Canvas, ChunkType};
use crate::error::{GrabError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::{Palette, RgbFrame};

/// Size of a frame header: u32 size, u16 magic, u16 chunk count, 8 reserved.
pub const FRAME_HEADER_SIZE: usize = 16;

/// Size of a chunk header: u32 size, u16 type.
pub const CHUNK_HEADER_SIZE: usize = 6;

/// Magic number of a frame header.
pub const FRAME_MAGIC: u16 = 0xF1FA;

/// Configuration for decoding FLIC frames.
#[derive(Debug, Clone)]
pub struct FrameDecoderConfiguration {
    /// Number of frames to decode. `None` decodes the header's frame count.
    pub frame_limit: Option<usize>,

    /// When `true`, a missing or malformed frame/chunk header ends decoding
    /// and the frames decoded so far are returned, with the reason recorded
    /// as a notification. When `false` the same conditions are errors.
    ///
    /// Default: `true`.
    pub failsafe: bool,
}

impl Default for FrameDecoderConfiguration {
    fn default() -> Self {
        Self {
            frame_limit: None,
            failsafe: true,
        }
    }
}

/// Header at the start of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Size of the frame including this header; the next frame follows it.
    pub size: u32,
    pub chunk_count: u16,
}

/// Decode context for one multi-frame decode.
#[derive(Debug)]
pub struct FrameDecoder<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    palette: Palette,
    notifications: NotificationCollection,
}

impl<'a> FrameDecoder<'a> {
    /// Create a decoder over a whole FLIC file with a black canvas and palette.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
            pixels: vec![0; width * height],
            palette: Palette::new(),
            notifications: NotificationCollection::new(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Current pixel-index buffer, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    pub fn into_notifications(self) -> NotificationCollection {
        self.notifications
    }

    pub(crate) fn notify(
        &mut self,
        notification_type: NotificationType,
        offset: usize,
        message: impl Into<String>,
    ) {
        self.notifications.notify(notification_type, offset, message);
    }

    /// The current canvas resolved through the current palette.
    pub fn current_frame(&self) -> RgbFrame {
        RgbFrame::from_indexed(self.width, self.height, &self.pixels, &self.palette)
    }

    /// Apply the frame starting at `offset` to the canvas and palette.
    ///
    /// Fails with `TooShort` when the frame header or a chunk header does not
    /// fit in the buffer and with `BadMagic` when the frame magic is wrong.
    /// Chunks already applied stay applied.
    pub fn decode_frame_at(&mut self, offset: usize) -> Result<FrameHeader> {
        let needed = offset.saturating_add(FRAME_HEADER_SIZE);
        if self.data.len() < needed {
            return Err(GrabError::too_short(needed, self.data.len()));
        }

        let frame = &self.data[offset..];
        let size = LittleEndian::read_u32(frame);
        let magic = LittleEndian::read_u16(&frame[4..]);
        if magic != FRAME_MAGIC {
            return Err(GrabError::BadMagic {
                expected: FRAME_MAGIC as u32,
                found: magic as u32,
            });
        }
        let chunk_count = LittleEndian::read_u16(&frame[6..]);

        let mut chunk_offset = offset + FRAME_HEADER_SIZE;
        for _ in 0..chunk_count {
            let chunk_size = self.decode_chunk_at(chunk_offset)?;
            chunk_offset = chunk_offset.saturating_add(chunk_size as usize);
        }

        Ok(FrameHeader { size, chunk_count })
    }

    /// Apply one chunk, returning its declared size.
    fn decode_chunk_at(&mut self, offset: usize) -> Result<u32> {
        let needed = offset.saturating_add(CHUNK_HEADER_SIZE);
        if self.data.len() < needed {
            return Err(GrabError::too_short(needed, self.data.len()));
        }

        let data = self.data;
        let size = LittleEndian::read_u32(&data[offset..]);
        let code = LittleEndian::read_u16(&data[offset + 4..]);

        let Some(chunk_type) = ChunkType::from_code(code) else {
            log::debug!("FLIC: ignoring chunk type {} at {}", code, offset);
            self.notify(
                NotificationType::NotImplemented,
                offset,
                format!("chunk type {}", code),
            );
            return Ok(size);
        };

        let mut reader = Cursor::new(&data[needed..]);
        if let Err(err) = self.apply_chunk(chunk_type, &mut reader) {
            log::warn!(
                "FLIC: {} chunk at {} truncated: {}",
                chunk_type.name(),
                offset,
                err
            );
            self.notify(
                NotificationType::Warning,
                offset,
                format!("{} chunk", chunk_type.name()),
            );
        }

        Ok(size)
    }

    fn apply_chunk(&mut self, chunk_type: ChunkType, reader: &mut Cursor<&[u8]>) -> io::Result<()> {
        let mut canvas = Canvas {
            pixels: &mut self.pixels,
            width: self.width,
            height: self.height,
        };

        match chunk_type {
            ChunkType::Color256 => chunks::read_color(reader, &mut self.palette, false),
            ChunkType::Color64 => chunks::read_color(reader, &mut self.palette, true),
            ChunkType::Delta => chunks::read_delta(reader, &mut canvas),
            ChunkType::Lc => chunks::read_lc(reader, &mut canvas),
            ChunkType::Black => {
                chunks::read_black(&mut canvas);
                Ok(())
            }
            ChunkType::Brun => chunks::read_brun(reader, &mut canvas),
            ChunkType::Copy => chunks::read_copy(reader, &mut canvas),
        }
    }
}
