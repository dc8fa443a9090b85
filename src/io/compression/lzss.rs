//! LZSS compression and decompression.
//!
//! Stream layout: a flag byte followed by up to 8 tokens, repeated. Flag bits
//! are consumed low to high, one per token:
//!
//! - bit = 1: one literal byte follows.
//! - bit = 0: a 2-byte match record follows. `byte1` holds the low 8 bits of
//!   a 12-bit ring-buffer position, the high nibble of `byte2` holds its top
//!   4 bits and the low nibble holds `length - 3`.
//!
//! The ring buffer is 4096 bytes, zero-filled, with the write cursor starting
//! at `4096 - 18`. The zeros in front of the cursor act as an implicit run of
//! zero bytes preceding the stream, which the compressor is allowed to match.

use ahash::AHashMap;

use super::{Compressor, Decompressor};

/// Size of the ring buffer (N).
pub const RING_BUFFER_SIZE: usize = 0x1000;

/// Shortest back-reference worth encoding.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Longest back-reference a match record can describe (`0xF + 3`).
pub const MATCH_LENGTH_LIMIT: usize = 0x0F + MIN_MATCH_LENGTH;

/// Initial write cursor inside the ring buffer.
pub const INITIAL_POSITION: usize = RING_BUFFER_SIZE - MATCH_LENGTH_LIMIT;

const FLAG_BYTE_BITS: u8 = 8;

/// Compress a buffer into an LZSS token stream.
///
/// Empty input yields empty output.
pub fn compress(source: &[u8]) -> Vec<u8> {
    LzssCompressor.compress(source)
}

/// Decompress an LZSS token stream.
///
/// Truncated input is not an error: decoding stops at the first incomplete
/// token and whatever was produced so far is returned.
pub fn decompress(source: &[u8]) -> Vec<u8> {
    LzssDecompressor.decompress(source)
}

// ---------------------------------------------------------------------------
// Decompressor
// ---------------------------------------------------------------------------

/// Decompressor for LZSS token streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssDecompressor;

impl Decompressor for LzssDecompressor {
    fn decompress(&self, source: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(source.len() * 2);
        let mut window = RingWindow::new();
        let mut pos = 0usize;

        while pos < source.len() {
            let flags = source[pos];
            pos += 1;

            for bit in 0..FLAG_BYTE_BITS {
                if pos >= source.len() {
                    break;
                }

                if flags & (1 << bit) != 0 {
                    let byte = source[pos];
                    pos += 1;
                    output.push(byte);
                    window.push(byte);
                } else {
                    // Match record needs two bytes
                    if pos + 1 >= source.len() {
                        return output;
                    }
                    let byte1 = source[pos] as usize;
                    let byte2 = source[pos + 1] as usize;
                    pos += 2;

                    let offset = byte1 | ((byte2 & 0xF0) << 4);
                    let length = (byte2 & 0x0F) + MIN_MATCH_LENGTH;

                    // Source and destination may overlap, copy one byte at a time
                    for i in 0..length {
                        let byte = window.get(offset + i);
                        output.push(byte);
                        window.push(byte);
                    }
                }
            }
        }

        output
    }
}

/// Ring buffer replayed by the decompressor.
struct RingWindow {
    buffer: Vec<u8>,
    cursor: usize,
}

impl RingWindow {
    fn new() -> Self {
        Self {
            buffer: vec![0; RING_BUFFER_SIZE],
            cursor: INITIAL_POSITION,
        }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.buffer[index % RING_BUFFER_SIZE]
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        self.buffer[self.cursor] = byte;
        self.cursor = (self.cursor + 1) % RING_BUFFER_SIZE;
    }
}

// ---------------------------------------------------------------------------
// Compressor
// ---------------------------------------------------------------------------

/// Compressor for LZSS token streams.
///
/// Matches are found through a dictionary keyed by the 3-byte prefix at each
/// position. Every bucket keeps positions in insertion order; the first
/// candidate reaching the longest length wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssCompressor;

impl Compressor for LzssCompressor {
    fn compress(&self, source: &[u8]) -> Vec<u8> {
        if source.is_empty() {
            return Vec::new();
        }
        MatchFinder::new(source).encode()
    }
}

/// Per-call compression state.
struct MatchFinder<'a> {
    source: &'a [u8],
    /// 3-byte prefix -> positions sharing it. Negative positions refer to the
    /// implicit zero run in front of the stream.
    dictionary: AHashMap<u32, Vec<i64>>,
}

impl<'a> MatchFinder<'a> {
    fn new(source: &'a [u8]) -> Self {
        let mut finder = Self {
            source,
            dictionary: AHashMap::new(),
        };
        for i in 1..=MATCH_LENGTH_LIMIT as i64 {
            finder.insert(-i);
        }
        finder
    }

    fn encode(mut self) -> Vec<u8> {
        let source = self.source;
        let mut output = Vec::with_capacity(source.len() + source.len() / 8 + 1);

        let mut flags = 0u8;
        let mut flag_bit = 0u8;
        let mut flags_index = 0usize;
        output.push(0);

        let mut pos = 0usize;
        while pos < source.len() {
            match self.find_match(pos as i64) {
                Some((offset, length)) => {
                    let window_pos = (INITIAL_POSITION as i64 + offset)
                        .rem_euclid(RING_BUFFER_SIZE as i64) as usize;
                    output.push((window_pos & 0xFF) as u8);
                    output.push(
                        ((window_pos >> 4) & 0xF0) as u8 | ((length - MIN_MATCH_LENGTH) as u8 & 0x0F),
                    );

                    // Positions inside the match become candidates too
                    for i in 0..length {
                        self.insert((pos + i) as i64);
                    }
                    pos += length;
                }
                None => {
                    flags |= 1 << flag_bit;
                    output.push(source[pos]);
                    self.insert(pos as i64);
                    pos += 1;
                }
            }

            flag_bit += 1;
            if flag_bit == FLAG_BYTE_BITS {
                output[flags_index] = flags;
                flags = 0;
                flag_bit = 0;

                if pos < source.len() {
                    flags_index = output.len();
                    output.push(0);
                }
            }
        }

        if flag_bit > 0 {
            output[flags_index] = flags;
        }

        output
    }

    /// Find the longest match for `pos`, returning `(offset, length)`.
    fn find_match(&mut self, pos: i64) -> Option<(i64, usize)> {
        let key = prefix_key(self.source, pos)?;
        let source = self.source;
        let window_start = pos - RING_BUFFER_SIZE as i64;
        let bucket = self.dictionary.get_mut(&key)?;

        let mut best: Option<(i64, usize)> = None;
        let mut has_stale = false;

        for &offset in bucket.iter() {
            if offset < window_start {
                has_stale = true;
                continue;
            }

            let mut length = MIN_MATCH_LENGTH;
            while (pos as usize) + length < source.len()
                && length < MATCH_LENGTH_LIMIT
                && source[pos as usize + length] == byte_at(source, offset + length as i64)
            {
                length += 1;
            }

            if best.map_or(true, |(_, best_length)| length > best_length) {
                best = Some((offset, length));
            }
            // Nothing later in the bucket can beat a full-length match
            if length == MATCH_LENGTH_LIMIT {
                break;
            }
        }

        if has_stale {
            bucket.retain(|&offset| offset >= window_start);
        }

        best
    }

    fn insert(&mut self, pos: i64) {
        if let Some(key) = prefix_key(self.source, pos) {
            self.dictionary.entry(key).or_default().push(pos);
        }
    }
}

/// Byte at `pos`, with the implicit zero run for negative positions.
#[inline]
fn byte_at(source: &[u8], pos: i64) -> u8 {
    if pos < 0 {
        0
    } else {
        source[pos as usize]
    }
}

/// Dictionary key for the 3 bytes starting at `pos`, if they all exist.
#[inline]
fn prefix_key(source: &[u8], pos: i64) -> Option<u32> {
    if pos + MIN_MATCH_LENGTH as i64 > source.len() as i64 {
        return None;
    }
    let mut key = 0u32;
    for i in 0..MIN_MATCH_LENGTH {
        key |= (byte_at(source, pos + i as i64) as u32) << (i * 8);
    }
    Some(key)
}
