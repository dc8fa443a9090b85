//! Datafile object type tags.
//!
//! Every datafile object carries a four-character type tag packed into a
//! big-endian `u32` (`'SAMP'`, `'FLIC'`, ...). Only the tags whose payloads
//! this crate decodes are listed here.

use std::fmt;

use crate::io::audio::AudioKind;

/// Object types handled by the audio and video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectType {
    /// Ogg Vorbis stream (`"OGG "`).
    Ogg = u32::from_be_bytes(*b"OGG "),
    /// Digital sound sample (`"SAMP"`).
    Sample = u32::from_be_bytes(*b"SAMP"),
    /// MIDI music (`"MIDI"`).
    Midi = u32::from_be_bytes(*b"MIDI"),
    /// FLI or FLC animation (`"FLIC"`).
    Flic = u32::from_be_bytes(*b"FLIC"),
}

impl ObjectType {
    /// Look up a tag read from a datafile.
    pub fn from_id(id: u32) -> Option<Self> {
        match &id.to_be_bytes() {
            b"OGG " => Some(Self::Ogg),
            b"SAMP" => Some(Self::Sample),
            b"MIDI" => Some(Self::Midi),
            b"FLIC" => Some(Self::Flic),
            _ => None,
        }
    }

    /// The packed tag value.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// The audio sub-format stored under this tag, if it is an audio type.
    pub fn audio_kind(self) -> Option<AudioKind> {
        match self {
            Self::Ogg => Some(AudioKind::Ogg),
            Self::Sample => Some(AudioKind::Pcm),
            Self::Midi => Some(AudioKind::Midi),
            Self::Flic => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.id().to_be_bytes();
        write!(f, "{}", String::from_utf8_lossy(&tag))
    }
}
