//! Audio Module
//!
//! Decoded sample data and the handle type that resources and sound packs
//! pass around:
//! - Clip storage (`AudioClip`, `SampleHandle`)
//! - WAV decoding

pub mod clip;
pub mod decode;

pub use clip::{AudioClip, SampleHandle};
pub use decode::{decode_wav, generate_test_tone};
