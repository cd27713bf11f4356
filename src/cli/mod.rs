//! CLI Module
//!
//! Command-line interface for applying sound overrides to a host snapshot.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ambient Tuner - override and restore live sound settings
#[derive(Parser, Debug)]
#[command(name = "ambient-tuner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a settings file to a host snapshot
    #[command(name = "apply")]
    Apply {
        /// Host snapshot (JSON)
        #[arg(long)]
        host: PathBuf,

        /// Settings file
        #[arg(short, long)]
        config: PathBuf,

        /// Directory searched for sound pack manifests
        #[arg(short, long)]
        packs: Option<PathBuf>,

        /// Revert everything after applying and report what was restored
        #[arg(long)]
        revert: bool,

        /// Write the run summary as JSON
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Write the host's current volumes as an example settings file
    #[command(name = "export")]
    Export {
        /// Host snapshot (JSON)
        #[arg(long)]
        host: PathBuf,

        /// Output settings file (printed to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List every sound of a host snapshot
    #[command(name = "inspect")]
    Inspect {
        /// Host snapshot (JSON)
        #[arg(long)]
        host: PathBuf,
    },

    /// List installed sound packs
    #[command(name = "packs")]
    Packs {
        /// Directory searched for sound pack manifests
        packs: PathBuf,
    },
}

impl Commands {
    /// Settings file the command reads, if any
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Apply { config, .. } => Some(config),
            _ => None,
        }
    }
}
