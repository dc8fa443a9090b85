//! Shared test utilities for datgrab integration tests.
//!
//! Byte builders live in [`builders`]; this module adds a scripted Vorbis
//! decoder and a few assertions used across test crates.

#![allow(dead_code)]

pub mod builders;

use datgrab::io::audio::{VorbisDecoder, VorbisInfo};
use datgrab::{GrabError, Result, RgbFrame, Rgb};

// ===========================================================================
// Vorbis
// ===========================================================================

/// Vorbis decoder returning canned info and PCM, whatever the input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedVorbis {
    pub info: VorbisInfo,
    pub pcm: Vec<u8>,
}

impl ScriptedVorbis {
    /// 16-bit stereo stream of `frames` sample frames at `sample_rate`.
    pub fn stereo(sample_rate: u32, frames: usize) -> Self {
        let pcm: Vec<u8> = (0..frames * 4).map(|i| (i % 251) as u8).collect();
        Self {
            info: VorbisInfo {
                sample_rate,
                channels: 2,
                duration_ms: (frames as u64 * 1000 / sample_rate as u64) as u32,
                pcm_data_size: pcm.len() as u32,
            },
            pcm,
        }
    }
}

impl VorbisDecoder for ScriptedVorbis {
    fn info(&self, ogg: &[u8]) -> Result<VorbisInfo> {
        if !ogg.starts_with(b"OggS") {
            return Err(GrabError::DecoderFailure("missing OggS capture pattern".into()));
        }
        Ok(self.info)
    }

    fn decode_to_pcm(&self, ogg: &[u8]) -> Result<Vec<u8>> {
        self.info(ogg)?;
        Ok(self.pcm.clone())
    }
}

// ===========================================================================
// Frame assertions
// ===========================================================================

/// Assert every pixel of `frame` has `color`.
pub fn assert_solid(frame: &RgbFrame, color: Rgb) {
    for y in 0..frame.height {
        for x in 0..frame.width {
            assert_eq!(frame.pixel(x, y), Some(color), "pixel ({x}, {y})");
        }
    }
}

/// Little-endian u32 at `offset`.
pub fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Big-endian u16 at `offset`.
pub fn be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}
