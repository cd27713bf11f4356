//! Configuration Module
//!
//! User settings: per-sound volume and sound pack overrides, plus export of
//! the live settings as an example file.

pub mod export;
pub mod settings;

pub use export::snapshot_config;
pub use settings::{OverrideSpec, SoundOverride, TunerConfig, CURRENT_CONFIG_VERSION};
