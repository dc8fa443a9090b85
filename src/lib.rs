//! # datgrab
//!
//! A pure Rust library for the payload codecs of Allegro-style game
//! datafiles.
//!
//! The archive layer that locates objects inside a datafile is not part of
//! this crate. It hands over byte ranges; this crate decompresses and
//! decodes them.
//!
//! ## Features
//!
//! - LZSS compression and decompression (4 KiB ring buffer, 3..=18 byte matches)
//! - Audio objects: DAT_SAMP PCM samples, Ogg Vorbis streams, DAT_MIDI music
//! - WAV export of PCM (and Ogg, given a Vorbis decoder)
//! - Standard MIDI File export and import, MIDI duration with tempo changes
//! - FLIC (FLI/FLC) header parsing and frame decoding to RGB
//!
//! ## Quick Start
//!
//! ```rust
//! use datgrab::io::compression::lzss;
//! use datgrab::io::audio::{AudioAsset, AudioKind};
//!
//! // Objects are stored compressed
//! let samp = AudioAsset::sample_pcm().serialize()?;
//! let packed = lzss::compress(&samp);
//! let unpacked = lzss::decompress(&packed);
//!
//! let sound = AudioAsset::parse(&unpacked, AudioKind::Pcm)?;
//! let wav = sound.wav_data(0)?;
//! assert_eq!(&wav[8..12], b"WAVE");
//! # Ok::<(), datgrab::GrabError>(())
//! ```
//!
//! ## Architecture
//!
//! - `io::compression` - `Compressor`/`Decompressor` traits and the LZSS engine
//! - `io::audio` - `AudioAsset` over the three audio sub-formats; Ogg decoding
//!   is delegated to a caller-supplied `VorbisDecoder`
//! - `io::flic` - `VideoAsset` and the per-session `FrameDecoder`
//! - `notification` - leniency decisions recorded during frame decoding

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod notification;
pub mod object_type;
pub mod types;

// Re-export commonly used types
pub use error::{GrabError, Result};
pub use io::audio::{AudioAsset, AudioFormat, AudioKind, MidiData, NoVorbisDecoder, VorbisDecoder, VorbisInfo};
pub use io::compression::lzss::{compress, decompress};
pub use io::flic::{FrameDecoderConfiguration, FrameSequence, VideoAsset};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use object_type::ObjectType;
pub use types::{Palette, Rgb, RgbFrame};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
