//! I/O module for datafile object payloads: LZSS streams, audio and FLIC video

pub mod audio;
pub mod compression;
pub mod flic;

pub use audio::{AudioAsset, AudioFormat, AudioKind, MidiData, VorbisDecoder};
pub use compression::{Compressor, Decompressor, LzssCompressor, LzssDecompressor};
pub use flic::{FrameDecoderConfiguration, VideoAsset};
