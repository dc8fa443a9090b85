//! Audio assets: PCM samples, Ogg Vorbis streams and MIDI music.
//!
//! All three datafile sub-formats parse into one [`AudioAsset`]. The shared
//! fields describe the PCM stream (or, for MIDI, only the duration); the
//! MIDI track slots live in [`AudioFormat::Midi`].
//!
//! # Example
//!
//! ```rust
//! use datgrab::io::audio::{AudioAsset, AudioKind};
//!
//! let asset = AudioAsset::sample_pcm();
//! let samp = asset.serialize()?;
//! let parsed = AudioAsset::parse(&samp, AudioKind::Pcm)?;
//! assert_eq!(parsed, asset);
//!
//! let wav = parsed.wav_data(50)?;
//! assert_eq!(&wav[0..4], b"RIFF");
//! # Ok::<(), datgrab::GrabError>(())
//! ```

pub mod midi;
pub mod samp;
pub mod vorbis;
pub mod wav;

pub use midi::{MidiData, TempoChange, DEFAULT_TEMPO, MIDI_TRACK_COUNT};
pub use vorbis::{NoVorbisDecoder, VorbisDecoder, VorbisInfo};
pub use wav::WavHeader;

use std::borrow::Cow;

use crate::error::{GrabError, Result};
use crate::object_type::ObjectType;

/// Which datafile sub-format a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioKind {
    /// DAT_SAMP raw PCM sample
    Pcm,
    /// Ogg Vorbis stream
    Ogg,
    /// DAT_MIDI track set
    Midi,
}

impl AudioKind {
    pub fn from_object_type(object_type: ObjectType) -> Option<Self> {
        object_type.audio_kind()
    }

    pub fn object_type(self) -> ObjectType {
        match self {
            AudioKind::Pcm => ObjectType::Sample,
            AudioKind::Ogg => ObjectType::Ogg,
            AudioKind::Midi => ObjectType::Midi,
        }
    }
}

/// Sub-format specific payload of an [`AudioAsset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioFormat {
    Pcm,
    Ogg,
    Midi(MidiData),
}

impl AudioFormat {
    pub fn kind(&self) -> AudioKind {
        match self {
            AudioFormat::Pcm => AudioKind::Pcm,
            AudioFormat::Ogg => AudioKind::Ogg,
            AudioFormat::Midi(_) => AudioKind::Midi,
        }
    }
}

/// A decoded audio object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub sample_rate: u32,
    pub channels: u32,
    pub bits_per_sample: u32,
    pub duration_ms: u32,
    /// Size of the PCM stream in bytes; for Ogg, the decoded size.
    pub pcm_data_size: u32,
    /// Raw PCM for `Pcm`, the Ogg container for `Ogg`, empty for `Midi`.
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioAsset {
    /// Parse a datafile object of the given kind.
    ///
    /// Ogg streams need a decoder; use [`AudioAsset::parse_with_decoder`].
    pub fn parse(data: &[u8], kind: AudioKind) -> Result<Self> {
        Self::parse_with_decoder(data, kind, &NoVorbisDecoder)
    }

    /// Parse a datafile object, asking `decoder` for Ogg stream properties.
    pub fn parse_with_decoder(
        data: &[u8],
        kind: AudioKind,
        decoder: &dyn VorbisDecoder,
    ) -> Result<Self> {
        match kind {
            AudioKind::Pcm => samp::read_samp(data),
            AudioKind::Ogg => Self::parse_ogg(data, decoder),
            AudioKind::Midi => Ok(Self::from_midi(MidiData::read_dat(data)?)),
        }
    }

    fn parse_ogg(data: &[u8], decoder: &dyn VorbisDecoder) -> Result<Self> {
        let info = decoder.info(data)?;
        log::debug!(
            "OGG: {} Hz, {} ch, {} ms, {} PCM bytes",
            info.sample_rate,
            info.channels,
            info.duration_ms,
            info.pcm_data_size
        );

        Ok(Self {
            sample_rate: info.sample_rate,
            channels: info.channels,
            bits_per_sample: 16,
            duration_ms: info.duration_ms,
            pcm_data_size: info.pcm_data_size,
            data: data.to_vec(),
            format: AudioFormat::Ogg,
        })
    }

    /// Wrap MIDI tracks in an asset, computing the playback length.
    pub fn from_midi(midi: MidiData) -> Self {
        Self {
            sample_rate: 0,
            channels: 0,
            bits_per_sample: 0,
            duration_ms: midi.duration_ms(),
            pcm_data_size: 0,
            data: Vec::new(),
            format: AudioFormat::Midi(midi),
        }
    }

    /// Import an uncompressed PCM WAV file.
    pub fn from_wav(data: &[u8]) -> Result<Self> {
        wav::read_wav(data)
    }

    /// Import a Standard MIDI File.
    pub fn from_smf(data: &[u8]) -> Result<Self> {
        Ok(Self::from_midi(MidiData::from_smf(data)?))
    }

    pub fn kind(&self) -> AudioKind {
        self.format.kind()
    }

    pub fn object_type(&self) -> ObjectType {
        self.kind().object_type()
    }

    /// MIDI tracks, if this is a MIDI asset.
    pub fn midi(&self) -> Option<&MidiData> {
        match &self.format {
            AudioFormat::Midi(midi) => Some(midi),
            _ => None,
        }
    }

    pub fn is_valid_format(&self) -> bool {
        match &self.format {
            AudioFormat::Pcm | AudioFormat::Ogg => {
                self.sample_rate > 0
                    && self.channels > 0
                    && self.bits_per_sample > 0
                    && !self.data.is_empty()
            }
            // 32 slots are guaranteed by the array type
            AudioFormat::Midi(midi) => midi.divisions > 0,
        }
    }

    /// Serialize back into the datafile layout of this asset's kind.
    ///
    /// Ogg streams are returned unchanged. An invalid asset serializes to an
    /// empty buffer.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if !self.is_valid_format() {
            log::warn!("serialize: invalid {:?} asset", self.kind());
            return Ok(Vec::new());
        }

        match &self.format {
            AudioFormat::Pcm => samp::write_samp(self),
            AudioFormat::Ogg => Ok(self.data.clone()),
            AudioFormat::Midi(midi) => midi.write_dat(),
        }
    }

    /// Export PCM from `offset_ms` onwards as a WAV file.
    ///
    /// Ogg assets cannot be decoded without a decoder; use
    /// [`AudioAsset::wav_data_with_decoder`].
    pub fn wav_data(&self, offset_ms: u32) -> Result<Vec<u8>> {
        self.wav_data_with_decoder(offset_ms, &NoVorbisDecoder)
    }

    /// Export PCM from `offset_ms` onwards as a WAV file, decoding Ogg
    /// streams with `decoder`.
    ///
    /// The byte offset is rounded up to a whole sample frame. Fails with
    /// `OutOfRange` when it lands at or past the end of the PCM data.
    pub fn wav_data_with_decoder(
        &self,
        offset_ms: u32,
        decoder: &dyn VorbisDecoder,
    ) -> Result<Vec<u8>> {
        if self.kind() == AudioKind::Midi {
            log::warn!("WAV export requested for MIDI asset");
            return Err(GrabError::UnsupportedSubformat(
                "MIDI cannot be exported as WAV".into(),
            ));
        }
        if !self.is_valid_format() {
            return Err(GrabError::InvalidAsset(format!(
                "{:?} asset with {} Hz, {} ch, {} bit, {} bytes",
                self.kind(),
                self.sample_rate,
                self.channels,
                self.bits_per_sample,
                self.data.len()
            )));
        }

        let pcm: Cow<'_, [u8]> = match self.format {
            AudioFormat::Ogg => Cow::Owned(decoder.decode_to_pcm(&self.data)?),
            _ => Cow::Borrowed(self.data.as_slice()),
        };

        let offset = wav::frame_aligned_offset(
            offset_ms,
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
        );
        if offset >= pcm.len() as u64 {
            log::error!(
                "WAV export: offset {} ms ({} bytes) past end of {} PCM bytes",
                offset_ms,
                offset,
                pcm.len()
            );
            return Err(GrabError::OutOfRange {
                offset,
                length: pcm.len() as u64,
            });
        }

        wav::build_wav(
            self.channels,
            self.sample_rate,
            self.bits_per_sample,
            &pcm[offset as usize..],
        )
    }

    /// Export MIDI tracks as a Standard MIDI File.
    ///
    /// Returns an empty buffer when the asset is invalid or no track holds
    /// data.
    pub fn midi_data(&self) -> Result<Vec<u8>> {
        let midi = self.midi().ok_or_else(|| {
            log::warn!("MIDI export requested for {:?} asset", self.kind());
            GrabError::UnsupportedSubformat(format!("{:?} asset has no MIDI tracks", self.kind()))
        })?;

        if !self.is_valid_format() {
            log::warn!("MIDI export: divisions is 0");
            return Ok(Vec::new());
        }
        midi.to_smf()
    }

    /// 100 ms of mono 16-bit noise at 44.1 kHz.
    pub fn sample_pcm() -> Self {
        const SAMPLE_RATE: u32 = 44_100;
        const SAMPLE_COUNT: usize = 4_410;

        let mut data = Vec::with_capacity(SAMPLE_COUNT * 2);
        let mut seed = 12345u32;
        for _ in 0..SAMPLE_COUNT {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let sample = ((seed >> 16) & 0xFFFF) as u16 as i16 / 4;
            data.extend_from_slice(&sample.to_le_bytes());
        }

        Self {
            sample_rate: SAMPLE_RATE,
            channels: 1,
            bits_per_sample: 16,
            duration_ms: 100,
            pcm_data_size: data.len() as u32,
            data,
            format: AudioFormat::Pcm,
        }
    }

    /// MIDI asset with 96 divisions and all tracks empty.
    pub fn sample_midi() -> Self {
        Self::from_midi(MidiData::new(96))
    }

    /// Ogg asset header fields with no stream data.
    pub fn sample_ogg() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            bits_per_sample: 16,
            duration_ms: 0,
            pcm_data_size: 0,
            data: Vec::new(),
            format: AudioFormat::Ogg,
        }
    }

    /// One-line description for listings.
    ///
    /// MIDI captions count the tracks that hold data, not the 32 fixed slots.
    pub fn caption(&self) -> String {
        let type_name = match &self.format {
            AudioFormat::Midi(midi) => {
                return format!(
                    "MIDI: {} divisions, {} tracks",
                    midi.divisions,
                    midi.track_count()
                );
            }
            AudioFormat::Ogg => "OGG Vorbis",
            AudioFormat::Pcm => "PCM Sample",
        };

        format!(
            "{}: {} Hz, {} ch, {} bit, duration: {}",
            type_name,
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            format_duration(self.duration_ms)
        )
    }
}

fn format_duration(ms: u32) -> String {
    if ms >= 60_000 {
        let seconds = ms / 1000;
        format!("{}:{:02} min", seconds / 60, seconds % 60)
    } else if ms >= 1000 {
        format!("{:.2} s", ms as f64 / 1000.0)
    } else {
        format!("{} ms", ms)
    }
}
