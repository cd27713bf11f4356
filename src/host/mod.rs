//! Host Module
//!
//! The live resource graph the tuner patches, and a JSON snapshot format
//! for loading one outside the game.

pub mod graph;
pub mod snapshot;

pub use graph::{AmbientSlot, EffectKey, SharedGraph, SoundEffect, SoundGraph};
pub use snapshot::{AmbientSnapshot, EffectSnapshot, HostSnapshot};
