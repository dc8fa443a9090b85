//! DAT_MIDI track storage, Standard MIDI File conversion and playback length.
//!
//! DAT_MIDI layout, all fields big-endian:
//!
//! ```text
//! u16  divisions
//! 32 x { u32 length; length bytes of raw MTrk event data }
//! ```

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::io::Write;

use crate::error::{GrabError, Result};

/// Number of track slots in a DAT_MIDI object.
pub const MIDI_TRACK_COUNT: usize = 32;

/// Tempo assumed until the first Set Tempo event (120 BPM).
pub const DEFAULT_TEMPO: u32 = 500_000;

const SMF_HEADER_SIZE: usize = 14;
const SMF_FORMAT_MULTI_TRACK: u16 = 1;
const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

const SMPTE_DIVISION_FLAG: u16 = 0x8000;
const META_EVENT: u8 = 0xFF;
const META_SET_TEMPO: u8 = 0x51;

/// MIDI music stored as 32 raw track slots plus the timing division.
///
/// A slot holding an empty vector is an unused track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiData {
    /// Ticks per quarter note. The high bit marks SMPTE timing.
    pub divisions: u16,
    pub tracks: [Vec<u8>; MIDI_TRACK_COUNT],
}

impl Default for MidiData {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A tempo change at an absolute tick, in microseconds per quarter note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoChange {
    pub tick: u32,
    pub tempo: u32,
}

impl MidiData {
    /// Create an object with all 32 slots empty.
    pub fn new(divisions: u16) -> Self {
        Self {
            divisions,
            tracks: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Number of slots that hold event data.
    pub fn track_count(&self) -> usize {
        self.tracks.iter().filter(|t| !t.is_empty()).count()
    }

    /// True when timing is SMPTE-based rather than ticks per quarter note.
    pub fn is_smpte(&self) -> bool {
        self.divisions & SMPTE_DIVISION_FLAG != 0
    }

    /// Parse the DAT_MIDI layout.
    pub fn read_dat(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(GrabError::too_short(2, data.len()));
        }

        let mut midi = Self::new(BigEndian::read_u16(data));
        let mut pos = 2usize;

        for (index, track) in midi.tracks.iter_mut().enumerate() {
            if pos + 4 > data.len() {
                log::error!("DAT_MIDI: track {} length missing", index);
                return Err(GrabError::too_short(pos + 4, data.len()));
            }
            let length = BigEndian::read_u32(&data[pos..]) as usize;
            pos += 4;

            if length > data.len() - pos {
                log::error!("DAT_MIDI: track {} of {} bytes overruns buffer", index, length);
                return Err(GrabError::out_of_range(pos + length, data.len()));
            }
            track.extend_from_slice(&data[pos..pos + length]);
            pos += length;
        }

        log::debug!(
            "DAT_MIDI: divisions={}, {} tracks in use",
            midi.divisions,
            midi.track_count()
        );
        Ok(midi)
    }

    /// Serialize into the DAT_MIDI layout; empty slots are written as zero length.
    pub fn write_dat(&self) -> Result<Vec<u8>> {
        let payload: usize = self.tracks.iter().map(|t| t.len()).sum();
        let mut output = Vec::with_capacity(2 + 4 * MIDI_TRACK_COUNT + payload);

        output.write_u16::<BigEndian>(self.divisions)?;
        for track in &self.tracks {
            output.write_u32::<BigEndian>(track.len() as u32)?;
            output.write_all(track)?;
        }
        Ok(output)
    }

    /// Export as a format-1 Standard MIDI File.
    ///
    /// Empty slots are skipped. Each written track is terminated with an End
    /// of Track meta event unless it already ends with one. Returns an empty
    /// buffer when no slot holds data.
    pub fn to_smf(&self) -> Result<Vec<u8>> {
        let track_count = self.track_count();
        if track_count == 0 {
            log::warn!("MIDI export: no tracks with data");
            return Ok(Vec::new());
        }

        let mut output = Vec::new();
        output.write_all(b"MThd")?;
        output.write_u32::<BigEndian>(6)?;
        output.write_u16::<BigEndian>(SMF_FORMAT_MULTI_TRACK)?;
        output.write_u16::<BigEndian>(track_count as u16)?;
        output.write_u16::<BigEndian>(self.divisions)?;

        for track in self.tracks.iter().filter(|t| !t.is_empty()) {
            let terminated = track.ends_with(&END_OF_TRACK);
            let length = track.len() + if terminated { 0 } else { END_OF_TRACK.len() };

            output.write_all(b"MTrk")?;
            output.write_u32::<BigEndian>(length as u32)?;
            output.write_all(track)?;
            if !terminated {
                output.write_all(&END_OF_TRACK)?;
            }
        }

        Ok(output)
    }

    /// Import a Standard MIDI File.
    ///
    /// Up to 32 `MTrk` chunks are read into consecutive slots; any further
    /// chunks are ignored. Track data is stored as-is, including its End of
    /// Track event.
    pub fn from_smf(data: &[u8]) -> Result<Self> {
        if data.len() < SMF_HEADER_SIZE {
            return Err(GrabError::too_short(SMF_HEADER_SIZE, data.len()));
        }
        if &data[0..4] != b"MThd" {
            return Err(GrabError::BadSignature("MThd"));
        }
        let header_length = BigEndian::read_u32(&data[4..]);
        if header_length != 6 {
            return Err(GrabError::UnsupportedSubformat(format!(
                "MThd header length {}",
                header_length
            )));
        }

        let format = BigEndian::read_u16(&data[8..]);
        let declared_tracks = BigEndian::read_u16(&data[10..]);
        let mut midi = Self::new(BigEndian::read_u16(&data[12..]));
        log::debug!(
            "SMF: format {}, {} tracks declared, divisions={}",
            format,
            declared_tracks,
            midi.divisions
        );

        let mut pos = SMF_HEADER_SIZE;
        let mut slot = 0usize;
        while pos + 8 <= data.len() && slot < MIDI_TRACK_COUNT {
            if &data[pos..pos + 4] != b"MTrk" {
                return Err(GrabError::BadSignature("MTrk"));
            }
            let length = BigEndian::read_u32(&data[pos + 4..]) as usize;
            pos += 8;

            if length > data.len() - pos {
                return Err(GrabError::out_of_range(pos + length, data.len()));
            }
            midi.tracks[slot] = data[pos..pos + length].to_vec();
            pos += length;
            slot += 1;
        }

        Ok(midi)
    }

    /// Playback length in milliseconds, honoring Set Tempo events on all tracks.
    ///
    /// SMPTE timing and a zero division are not supported and yield 0.
    pub fn duration_ms(&self) -> u32 {
        if self.is_smpte() {
            log::debug!("MIDI duration: SMPTE timing unsupported");
            return 0;
        }
        let ticks_per_quarter = (self.divisions & !SMPTE_DIVISION_FLAG) as f64;
        if ticks_per_quarter == 0.0 {
            return 0;
        }

        let (tempo_map, max_tick) = self.tempo_map();

        // Each interval is timed at the tempo in force before its breakpoint;
        // the breakpoint's own tempo applies from the next interval on.
        let mut total_ms = 0.0f64;
        let mut current_tempo = DEFAULT_TEMPO;
        for (i, change) in tempo_map.iter().enumerate() {
            let next_tick = tempo_map
                .get(i + 1)
                .map_or(max_tick, |next| next.tick)
                .min(max_tick);
            let delta = next_tick.saturating_sub(change.tick);
            total_ms += delta as f64 * (current_tempo as f64 / 1000.0) / ticks_per_quarter;
            current_tempo = change.tempo;
        }

        total_ms as u32
    }

    /// Tempo breakpoints across all tracks, sorted by tick, plus the last
    /// tick reached by any track.
    ///
    /// The map always starts with the default tempo at tick 0.
    pub fn tempo_map(&self) -> (Vec<TempoChange>, u32) {
        let mut tempo_map = vec![TempoChange {
            tick: 0,
            tempo: DEFAULT_TEMPO,
        }];
        let mut max_tick = 0u32;

        for track in self.tracks.iter().filter(|t| !t.is_empty()) {
            let end_tick = scan_track(track, &mut tempo_map);
            max_tick = max_tick.max(end_tick);
        }

        // Stable, so events at equal ticks keep track order
        tempo_map.sort_by_key(|change| change.tick);
        (tempo_map, max_tick)
    }
}

/// Walk one track's events, collecting Set Tempo events. Returns the
/// absolute tick of the last delta read.
fn scan_track(track: &[u8], tempo_map: &mut Vec<TempoChange>) -> u32 {
    let mut pos = 0usize;
    let mut tick = 0u32;
    let mut running_status = 0u8;

    while pos < track.len() {
        tick = tick.wrapping_add(read_vlq(track, &mut pos));
        if pos >= track.len() {
            break;
        }

        let status = if track[pos] < 0x80 {
            running_status
        } else {
            let status = track[pos];
            pos += 1;
            running_status = status;
            status
        };

        if status == META_EVENT {
            if pos + 1 >= track.len() {
                break;
            }
            let meta_type = track[pos];
            pos += 1;
            let length = read_vlq(track, &mut pos) as usize;

            if meta_type == META_SET_TEMPO && length == 3 && pos + 2 < track.len() {
                let tempo = (track[pos] as u32) << 16
                    | (track[pos + 1] as u32) << 8
                    | track[pos + 2] as u32;
                tempo_map.push(TempoChange { tick, tempo });
            }
            pos = pos.saturating_add(length);
        } else if status & 0xF0 == 0xF0 {
            // SysEx and other system messages carry a length prefix
            let length = read_vlq(track, &mut pos) as usize;
            pos = pos.saturating_add(length);
        } else {
            match status & 0xF0 {
                // Program change and channel pressure take one data byte
                0xC0 | 0xD0 => pos += 1,
                _ => pos += 2,
            }
        }
    }

    tick
}

/// Read a variable-length quantity, stopping early at the end of `data`.
fn read_vlq(data: &[u8], pos: &mut usize) -> u32 {
    let mut value = 0u32;
    while *pos < data.len() {
        let byte = data[*pos];
        *pos += 1;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            break;
        }
    }
    value
}
