//! DAT_SAMP (digital sound sample) reader and writer.
//!
//! Layout, all header fields big-endian:
//!
//! ```text
//! i16  bits     sample bits, negative for stereo
//! u16  freq     sample rate in Hz
//! u32  length   PCM byte count
//! var  data     `length` bytes of PCM
//! ```

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use super::{AudioAsset, AudioFormat};
use crate::error::{GrabError, Result};

/// Size of the fixed DAT_SAMP header.
pub const SAMP_HEADER_SIZE: usize = 8;

/// Parse a DAT_SAMP buffer into a PCM asset.
pub fn read_samp(data: &[u8]) -> Result<AudioAsset> {
    if data.len() < SAMP_HEADER_SIZE {
        return Err(GrabError::too_short(SAMP_HEADER_SIZE, data.len()));
    }

    let mut cursor = Cursor::new(data);
    let bits = cursor.read_i16::<BigEndian>()?;
    let freq = cursor.read_u16::<BigEndian>()?;
    let length = cursor.read_u32::<BigEndian>()?;

    let end = SAMP_HEADER_SIZE as u64 + length as u64;
    if end > data.len() as u64 {
        return Err(GrabError::OutOfRange {
            offset: end,
            length: data.len() as u64,
        });
    }

    log::debug!("DAT_SAMP: bits={}, freq={}, length={}", bits, freq, length);

    let bits_per_sample = bits.unsigned_abs() as u32;
    let channels = if bits < 0 { 2 } else { 1 };
    let sample_rate = freq as u32;
    let duration_ms = pcm_duration_ms(length, sample_rate, channels, bits_per_sample);

    Ok(AudioAsset {
        sample_rate,
        channels,
        bits_per_sample,
        duration_ms,
        pcm_data_size: length,
        data: data[SAMP_HEADER_SIZE..end as usize].to_vec(),
        format: AudioFormat::Pcm,
    })
}

/// Serialize a PCM asset back into DAT_SAMP layout.
///
/// Stereo is encoded by negating `bits` when `channels == 2`. Fails with
/// `UnsupportedSubformat` for formats the header cannot hold: more than two
/// channels, a rate above 65535 Hz or more than 32767 bits per sample.
pub fn write_samp(asset: &AudioAsset) -> Result<Vec<u8>> {
    if !(1..=2).contains(&asset.channels) {
        return Err(GrabError::UnsupportedSubformat(format!(
            "DAT_SAMP with {} channels",
            asset.channels
        )));
    }
    let freq = u16::try_from(asset.sample_rate).map_err(|_| {
        GrabError::UnsupportedSubformat(format!("DAT_SAMP at {} Hz", asset.sample_rate))
    })?;
    let mut bits = i16::try_from(asset.bits_per_sample).map_err(|_| {
        GrabError::UnsupportedSubformat(format!(
            "DAT_SAMP with {} bit samples",
            asset.bits_per_sample
        ))
    })?;
    if asset.channels == 2 {
        bits = -bits;
    }

    let mut output = Vec::with_capacity(SAMP_HEADER_SIZE + asset.data.len());
    output.write_i16::<BigEndian>(bits)?;
    output.write_u16::<BigEndian>(freq)?;
    output.write_u32::<BigEndian>(asset.data.len() as u32)?;
    output.extend_from_slice(&asset.data);

    Ok(output)
}

/// Playback length of `length` PCM bytes, rounded to the nearest millisecond.
///
/// Returns 0 when the format describes zero bytes per second.
pub fn pcm_duration_ms(length: u32, sample_rate: u32, channels: u32, bits_per_sample: u32) -> u32 {
    let bytes_per_second =
        sample_rate as f64 * channels as f64 * (bits_per_sample as f64 / 8.0);
    if bytes_per_second <= 0.0 {
        return 0;
    }
    ((1000.0 * length as f64) / bytes_per_second).round() as u32
}
