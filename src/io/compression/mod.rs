//! LZSS compression and decompression for datafile records.
//!
//! Packed datafile records use a classic LZSS token stream: a 4096-byte ring
//! buffer, matches of 3..=18 bytes and one flag byte per group of 8 tokens.
//! See [`lzss`] for the wire layout.

pub mod lzss;

pub use lzss::{LzssCompressor, LzssDecompressor};

/// Trait for compressing a whole buffer.
pub trait Compressor {
    /// Compress `source`, returning the packed token stream.
    fn compress(&self, source: &[u8]) -> Vec<u8>;
}

/// Trait for decompressing a whole buffer.
pub trait Decompressor {
    /// Decompress `source`, returning as much data as the stream describes.
    fn decompress(&self, source: &[u8]) -> Vec<u8>;
}
