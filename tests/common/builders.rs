//! Byte-level builders for synthetic datafile objects.
//!
//! FLIC files are assembled chunk by chunk so tests can exercise each
//! decoder path without shipping binary fixtures.

#![allow(dead_code)]

use datgrab::io::flic::{ChunkType, FlicHeader, FlicVariant, FLIC_HEADER_SIZE, FRAME_MAGIC};

// ===========================================================================
// FLIC
// ===========================================================================

/// A chunk: u32 size (header included), u16 type, payload.
pub fn chunk(chunk_type: ChunkType, payload: &[u8]) -> Vec<u8> {
    raw_chunk(chunk_type.code(), payload)
}

/// A chunk with an arbitrary type code.
pub fn raw_chunk(code: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + payload.len());
    out.extend_from_slice(&((6 + payload.len()) as u32).to_le_bytes());
    out.extend_from_slice(&code.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// COLOR_256 chunk setting entries `0..colors.len()`.
pub fn color256_chunk(colors: &[(u8, u8, u8)]) -> Vec<u8> {
    let mut payload = vec![1, 0, 0, colors.len() as u8];
    for &(r, g, b) in colors {
        payload.extend_from_slice(&[r, g, b]);
    }
    chunk(ChunkType::Color256, &payload)
}

/// COPY chunk with raw pixel indices.
pub fn copy_chunk(pixels: &[u8]) -> Vec<u8> {
    chunk(ChunkType::Copy, pixels)
}

/// BRUN chunk filling each row with one index.
pub fn brun_fill_chunk(width: usize, height: usize, index: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    for _ in 0..height {
        let mut remaining = width;
        let packets = (width + 126) / 127;
        payload.push(packets as u8);
        while remaining > 0 {
            let run = remaining.min(127);
            payload.push(run as u8);
            payload.push(index);
            remaining -= run;
        }
    }
    chunk(ChunkType::Brun, &payload)
}

/// LC chunk writing `values` literally at (`x`, `y`).
pub fn lc_literal_chunk(x: u8, y: u16, values: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&y.to_le_bytes());
    payload.extend_from_slice(&1u16.to_le_bytes());
    payload.push(1);
    payload.push(x);
    payload.push(values.len() as u8);
    payload.extend_from_slice(values);
    chunk(ChunkType::Lc, &payload)
}

/// A frame: 16-byte header followed by its chunks.
pub fn frame(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut out = Vec::with_capacity(16 + body.len());
    out.extend_from_slice(&((16 + body.len()) as u32).to_le_bytes());
    out.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
    out.extend_from_slice(&(chunks.len() as u16).to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&body);
    out
}

/// Assembles a complete FLIC file.
pub struct FlicBuilder {
    pub header: FlicHeader,
    frames: Vec<Vec<u8>>,
}

impl FlicBuilder {
    pub fn new(variant: FlicVariant, width: u16, height: u16, speed: u32) -> Self {
        Self {
            header: FlicHeader::new(variant, width, height, speed),
            frames: Vec::new(),
        }
    }

    pub fn fli(width: u16, height: u16) -> Self {
        Self::new(FlicVariant::Fli, width, height, 5)
    }

    pub fn flc(width: u16, height: u16) -> Self {
        Self::new(FlicVariant::Flc, width, height, 50)
    }

    pub fn frame(mut self, chunks: &[Vec<u8>]) -> Self {
        self.frames.push(frame(chunks));
        self
    }

    /// Offset the next frame will be written at.
    pub fn next_frame_offset(&self) -> usize {
        FLIC_HEADER_SIZE + self.frames.iter().map(Vec::len).sum::<usize>()
    }

    pub fn build(mut self) -> Vec<u8> {
        self.header.frame_count = self.frames.len() as u16;
        self.header.file_size = self.next_frame_offset() as u32;

        let mut out = self.header.to_bytes().unwrap();
        for frame in &self.frames {
            out.extend_from_slice(frame);
        }
        out
    }
}

// ===========================================================================
// Audio
// ===========================================================================

/// DAT_SAMP object bytes.
pub fn samp_bytes(bits: i16, freq: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&bits.to_be_bytes());
    out.extend_from_slice(&freq.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// DAT_MIDI object bytes with the given slots filled.
pub fn dat_midi(divisions: u16, tracks: &[(usize, &[u8])]) -> Vec<u8> {
    let empty: &[u8] = &[];
    let mut slots = vec![empty; 32];
    for &(slot, data) in tracks {
        slots[slot] = data;
    }

    let mut out = divisions.to_be_bytes().to_vec();
    for data in slots {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(data);
    }
    out
}

/// Track data: a Set Tempo meta event at `delta` ticks.
pub fn tempo_event(delta: u8, tempo: u32) -> Vec<u8> {
    let t = tempo.to_be_bytes();
    vec![delta, 0xFF, 0x51, 0x03, t[1], t[2], t[3]]
}

/// Track data: a note-on at `delta` ticks.
pub fn note_on(delta: u8, key: u8) -> Vec<u8> {
    vec![delta, 0x90, key, 0x40]
}

// ===========================================================================
// LZSS
// ===========================================================================

/// Deterministic pseudo-random bytes (xorshift32).
pub fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        out.push(seed as u8);
    }
    out
}

/// Mixed content: text, zero runs, noise and a repeating ramp.
pub fn mixed_buffer(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut block = 0u32;
    while out.len() < len {
        match block % 4 {
            0 => out.extend_from_slice(b"The quick brown fox jumps over the lazy dog. "),
            1 => out.extend(std::iter::repeat(0u8).take(300)),
            2 => out.extend(noise(700, block + 1)),
            _ => out.extend((0..=255u8).cycle().take(1000)),
        }
        block += 1;
    }
    out.truncate(len);
    out
}
