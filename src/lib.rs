//! Ambient Tuner - Live Audio Override Engine
//!
//! Overrides the volume and sample data of a host application's sound
//! resources and can put every change back exactly as it was found.
//!
//! # Architecture
//!
//! A session runs in a fixed order:
//! - Duplication: identities sharing one effect slot get their own copy
//! - Catalog: every resource is wrapped behind the `SoundResource` trait
//! - Orchestration: overrides are resolved, backed up, then patched
//! - Revert: every backed-up aspect is restored from its original value

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod duplicator;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod patch;
pub mod session;
pub mod soundpack;

pub use error::{Result, TunerError};
pub use session::TunerSession;
