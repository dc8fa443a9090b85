//! Seam for the external Ogg Vorbis decoder.
//!
//! The Vorbis bitstream itself is not decoded by this crate. Callers plug in
//! whatever decoder they use through [`VorbisDecoder`]; the audio codec only
//! needs stream info at parse time and PCM at WAV-export time.

use crate::error::{GrabError, Result};

/// Stream properties reported by a Vorbis decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VorbisInfo {
    pub sample_rate: u32,
    pub channels: u32,
    pub duration_ms: u32,
    /// Size of the fully decoded 16-bit PCM stream, in bytes.
    pub pcm_data_size: u32,
}

/// An Ogg Vorbis decoder supplied by the caller.
///
/// Implementations must report failures as [`GrabError::DecoderFailure`].
pub trait VorbisDecoder {
    /// Read stream properties without decoding audio.
    fn info(&self, ogg: &[u8]) -> Result<VorbisInfo>;

    /// Decode the whole stream to interleaved little-endian 16-bit PCM.
    fn decode_to_pcm(&self, ogg: &[u8]) -> Result<Vec<u8>>;
}

/// Placeholder decoder used when none is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVorbisDecoder;

impl VorbisDecoder for NoVorbisDecoder {
    fn info(&self, _ogg: &[u8]) -> Result<VorbisInfo> {
        Err(GrabError::DecoderFailure("no Vorbis decoder configured".into()))
    }

    fn decode_to_pcm(&self, _ogg: &[u8]) -> Result<Vec<u8>> {
        Err(GrabError::DecoderFailure("no Vorbis decoder configured".into()))
    }
}
