//! RIFF/WAVE export and import for PCM audio.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use super::samp::pcm_duration_ms;
use super::{AudioAsset, AudioFormat};
use crate::error::{GrabError, Result};

/// Size of the canonical 44-byte header written by [`WavHeader::write`].
pub const WAV_HEADER_SIZE: usize = 44;

const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_MIN_SIZE: usize = 16;

/// Fields of a canonical PCM WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Size of the `data` chunk payload
    pub data_size: u32,
}

impl WavHeader {
    pub fn block_align(&self) -> u16 {
        (self.channels as u32 * self.bits_per_sample as u32 / 8) as u16
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate
            .wrapping_mul(self.channels as u32)
            .wrapping_mul(self.bits_per_sample as u32)
            / 8
    }

    /// Write the 44-byte RIFF/fmt/data header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(b"RIFF")?;
        writer.write_u32::<LittleEndian>(36u32.wrapping_add(self.data_size))?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_u32::<LittleEndian>(FMT_CHUNK_MIN_SIZE as u32)?;
        writer.write_u16::<LittleEndian>(FORMAT_PCM)?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.byte_rate())?;
        writer.write_u16::<LittleEndian>(self.block_align())?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;

        writer.write_all(b"data")?;
        writer.write_u32::<LittleEndian>(self.data_size)?;
        Ok(())
    }
}

/// Build a complete WAV file around `pcm`.
pub fn build_wav(
    channels: u32,
    sample_rate: u32,
    bits_per_sample: u32,
    pcm: &[u8],
) -> Result<Vec<u8>> {
    let header = WavHeader {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: bits_per_sample as u16,
        data_size: pcm.len() as u32,
    };

    let mut output = Vec::with_capacity(WAV_HEADER_SIZE + pcm.len());
    header.write(&mut output)?;
    output.extend_from_slice(pcm);
    Ok(output)
}

/// Byte offset of `offset_ms` into a PCM stream, rounded up to a whole frame.
///
/// The rounding uses a power-of-two mask, so it is exact only when the frame
/// size (`channels * bytes_per_sample`) is a power of two. The byte count
/// saturates instead of overflowing, which puts it past any real PCM buffer.
pub fn frame_aligned_offset(
    offset_ms: u32,
    sample_rate: u32,
    channels: u32,
    bits_per_sample: u32,
) -> u64 {
    let bytes_per_sample = (bits_per_sample / 8) as u64;
    let frame = channels as u64 * bytes_per_sample;
    let offset = (offset_ms as u64)
        .saturating_mul(sample_rate as u64)
        .saturating_mul(channels as u64)
        .saturating_mul(bytes_per_sample)
        / 1000;

    offset.wrapping_add(frame).wrapping_sub(1) & !frame.wrapping_sub(1)
}

/// Parse a PCM WAV file into a PCM asset.
///
/// Only uncompressed PCM (`format == 1`) is accepted. Chunks before `data`
/// other than `fmt ` are skipped.
pub fn read_wav(data: &[u8]) -> Result<AudioAsset> {
    if data.len() < WAV_HEADER_SIZE {
        return Err(GrabError::too_short(WAV_HEADER_SIZE, data.len()));
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(GrabError::BadSignature("RIFF/WAVE"));
    }

    let mut format = 0u16;
    let mut channels = 0u16;
    let mut sample_rate = 0u32;
    let mut bits_per_sample = 0u16;
    let mut pcm: Option<(usize, usize)> = None;

    let mut pos = 12usize;
    while pos + 8 <= data.len() {
        let id = &data[pos..pos + 4];
        let size = LittleEndian::read_u32(&data[pos + 4..pos + 8]) as usize;

        if id == b"fmt " {
            if size < FMT_CHUNK_MIN_SIZE {
                return Err(GrabError::UnsupportedSubformat(format!(
                    "fmt chunk of {} bytes",
                    size
                )));
            }
            if pos + 8 + size > data.len() {
                return Err(GrabError::out_of_range(pos + 8 + size, data.len()));
            }
            format = LittleEndian::read_u16(&data[pos + 8..]);
            channels = LittleEndian::read_u16(&data[pos + 10..]);
            sample_rate = LittleEndian::read_u32(&data[pos + 12..]);
            bits_per_sample = LittleEndian::read_u16(&data[pos + 22..]);
        } else if id == b"data" {
            pcm = Some((pos + 8, size));
            break;
        }

        pos = pos.saturating_add(8).saturating_add(size);
    }

    if format != FORMAT_PCM || channels == 0 || sample_rate == 0 || bits_per_sample == 0 {
        return Err(GrabError::UnsupportedSubformat(format!(
            "WAV format {}, {} ch, {} Hz, {} bit",
            format, channels, sample_rate, bits_per_sample
        )));
    }

    let (start, size) = pcm.ok_or_else(|| GrabError::InvalidAsset("WAV has no data chunk".into()))?;
    if start + size > data.len() {
        return Err(GrabError::out_of_range(start + size, data.len()));
    }

    log::debug!(
        "WAV: {} Hz, {} ch, {} bit, {} bytes",
        sample_rate,
        channels,
        bits_per_sample,
        size
    );

    let (channels, bits_per_sample) = (channels as u32, bits_per_sample as u32);
    Ok(AudioAsset {
        sample_rate,
        channels,
        bits_per_sample,
        duration_ms: pcm_duration_ms(size as u32, sample_rate, channels, bits_per_sample),
        pcm_data_size: size as u32,
        data: data[start..start + size].to_vec(),
        format: AudioFormat::Pcm,
    })
}
