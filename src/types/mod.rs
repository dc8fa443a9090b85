//! Core value types shared by the codecs

pub mod color;
pub mod frame;

pub use color::{Palette, Rgb, PALETTE_SIZE};
pub use frame::RgbFrame;
