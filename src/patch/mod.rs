//! Patch Engine
//!
//! Generic backup/patch/revert state machine over `SoundResource`. Volume and
//! sample data are tracked as independent aspects, so a failure on one never
//! blocks the other.

pub mod backup;
pub mod engine;

pub use backup::{Aspect, AspectState, BackupRecord};
pub use engine::PatchEngine;
