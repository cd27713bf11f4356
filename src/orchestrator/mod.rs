//! Orchestrator
//!
//! Resolves overrides from the settings, backs up what is about to change
//! and patches through the engine, collecting the outcome in a `RunSummary`.

pub mod runner;
pub mod summary;

pub use runner::Orchestrator;
pub use summary::{RunFailure, RunSummary};
