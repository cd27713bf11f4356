//! Ambient Tuner CLI
//!
//! Command-line interface for the Ambient Tuner override engine.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use ambient_tuner::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let debug = cli.verbose
        || cli
            .command
            .as_ref()
            .and_then(Commands::config_path)
            .is_some_and(|path| commands::wants_debug_logging(path));
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Ambient Tuner v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Ambient Tuner v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply {
            host,
            config,
            packs,
            revert,
            summary,
        } => commands::apply(&host, &config, packs.as_deref(), revert, summary.as_deref())
            .with_context(|| format!("failed to apply {}", config.display())),
        Commands::Export { host, output } => commands::export(&host, output.as_deref())
            .with_context(|| format!("failed to export settings of {}", host.display())),
        Commands::Inspect { host } => {
            commands::inspect(&host).with_context(|| format!("failed to inspect {}", host.display()))
        }
        Commands::Packs { packs } => commands::packs(&packs)
            .with_context(|| format!("failed to list sound packs in {}", packs.display())),
    }
}
