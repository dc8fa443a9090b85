//! FLIC (FLI/FLC) animations.
//!
//! [`VideoAsset::parse`] reads only the 128-byte header; frames are decoded
//! on demand by [`VideoAsset::frames`] or [`VideoAsset::decode_frames`], each
//! call running its own [`FrameDecoder`] session.
//!
//! # Example
//!
//! ```rust
//! use datgrab::io::flic::VideoAsset;
//!
//! let sample = VideoAsset::sample_fli();
//! let video = VideoAsset::parse(&sample.data)?;
//! assert_eq!((video.width, video.height), (320, 200));
//! assert!(video.frames().is_empty());
//! # Ok::<(), datgrab::GrabError>(())
//! ```

pub mod chunks;
pub mod decoder;
pub mod header;

pub use chunks::ChunkType;
pub use decoder::{FrameDecoder, FrameDecoderConfiguration, FrameHeader, FRAME_MAGIC};
pub use header::{FlicFlags, FlicHeader, FlicVariant, FLC_MAGIC, FLIC_HEADER_SIZE, FLI_MAGIC};

use crate::error::Result;
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::RgbFrame;

/// Frames produced by one decode session.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    pub frames: Vec<RgbFrame>,
    pub notifications: NotificationCollection,
}

/// A FLIC animation object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    pub variant: FlicVariant,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    /// Frames per second.
    pub frame_rate: u32,
    /// Raw header speed.
    pub frame_delay: u32,
    pub duration_ms: u32,
    pub offset_frame1: u32,
    pub offset_frame2: u32,
    pub flags: FlicFlags,
    /// The complete FLIC file, header included.
    pub data: Vec<u8>,
}

impl VideoAsset {
    /// Parse the header of a FLIC file and keep the whole buffer for decoding.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = FlicHeader::parse(data)?;
        Ok(Self::from_header(&header, data.to_vec()))
    }

    fn from_header(header: &FlicHeader, data: Vec<u8>) -> Self {
        Self {
            variant: header.variant,
            width: header.width as u32,
            height: header.height as u32,
            frame_count: header.frame_count as u32,
            frame_rate: header.frame_rate(),
            frame_delay: header.speed,
            duration_ms: header.duration_ms(),
            offset_frame1: header.offset_frame1,
            offset_frame2: header.offset_frame2,
            flags: header.flags,
            data,
        }
    }

    pub fn is_valid_format(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.frame_count > 0
            && self.frame_rate > 0
            && !self.data.is_empty()
    }

    /// The stored file, or an empty buffer for an invalid asset.
    pub fn serialize(&self) -> Vec<u8> {
        if !self.is_valid_format() {
            return Vec::new();
        }
        self.data.clone()
    }

    /// Decode every frame, stopping quietly at the first malformed frame.
    pub fn frames(&self) -> Vec<RgbFrame> {
        self.decode_frames(&FrameDecoderConfiguration::default())
            .map(|sequence| sequence.frames)
            .unwrap_or_default()
    }

    /// The first frame, if it decodes.
    pub fn preview_frame(&self) -> Option<RgbFrame> {
        let config = FrameDecoderConfiguration {
            frame_limit: Some(1),
            ..Default::default()
        };
        self.decode_frames(&config)
            .ok()
            .and_then(|sequence| sequence.frames.into_iter().next())
    }

    /// Decode frames with an explicit configuration.
    ///
    /// Frames 0 and 1 start at `offset_frame1`/`offset_frame2` when those are
    /// non-zero; otherwise the first frame follows the header and each frame
    /// follows the previous one by its declared size.
    pub fn decode_frames(&self, config: &FrameDecoderConfiguration) -> Result<FrameSequence> {
        let count = config.frame_limit.unwrap_or(self.frame_count as usize);
        let mut decoder = FrameDecoder::new(&self.data, self.width as usize, self.height as usize);
        let mut frames = Vec::new();
        let mut offset = FLIC_HEADER_SIZE;

        for index in 0..count {
            if index == 0 && self.offset_frame1 != 0 {
                offset = self.offset_frame1 as usize;
            }
            if index == 1 && self.offset_frame2 != 0 {
                offset = self.offset_frame2 as usize;
            }

            match decoder.decode_frame_at(offset) {
                Ok(header) => {
                    frames.push(decoder.current_frame());
                    offset = offset.saturating_add(header.size as usize);
                }
                Err(err) if config.failsafe => {
                    log::warn!("FLIC: stopped at frame {} (offset {}): {}", index, offset, err);
                    decoder.notify(
                        NotificationType::Error,
                        offset,
                        format!("frame {}: {}", index, err),
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(FrameSequence {
            frames,
            notifications: decoder.into_notifications(),
        })
    }

    /// Empty 320x200 FLI with no frames.
    pub fn sample_fli() -> Self {
        let header = FlicHeader::new(FlicVariant::Fli, 320, 200, 70);
        let data = header.to_bytes().unwrap_or_default();

        Self {
            frame_rate: 18,
            frame_delay: 70,
            duration_ms: 0,
            ..Self::from_header(&header, data)
        }
    }

    /// One-line description for listings.
    pub fn caption(&self) -> String {
        format!(
            "FLIC Animation: {}x{}, {} frames, {:.2} sec",
            self.width,
            self.height,
            self.frame_count,
            self.duration_ms as f64 / 1000.0
        )
    }
}
