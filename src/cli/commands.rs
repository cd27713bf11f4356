//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::info;

use crate::catalog::ResourceCatalog;
use crate::config::TunerConfig;
use crate::duplicator::COMPATIBILITY_DUPLICATIONS;
use crate::error::Result;
use crate::host::HostSnapshot;
use crate::session::TunerSession;
use crate::soundpack::SoundPackIndex;

/// Stand up a prepared session for a host snapshot
fn open_session(host: &Path, packs: SoundPackIndex) -> Result<TunerSession> {
    let snapshot = HostSnapshot::load(host)?;
    let base_dir = host.parent().unwrap_or_else(|| Path::new("."));
    let graph = snapshot.into_graph(base_dir)?.into_shared();

    let mut session = TunerSession::new(graph, packs);
    let count = session.prepare(COMPATIBILITY_DUPLICATIONS)?;
    info!("Loaded {} sounds from {}", count, host.display());
    Ok(session)
}

fn load_packs(dir: Option<&Path>) -> SoundPackIndex {
    let mut packs = SoundPackIndex::new();
    if let Some(dir) = dir {
        packs.discover(dir);
    }
    packs
}

/// Whether the settings file asks for debug logging. Unreadable settings
/// count as `false`; the command itself reports the error.
pub fn wants_debug_logging(config: &Path) -> bool {
    TunerConfig::load(config)
        .map(|c| c.extra_debug_logging)
        .unwrap_or(false)
}

/// Apply a settings file, optionally reverting afterwards.
pub fn apply(
    host: &Path,
    config: &Path,
    packs: Option<&Path>,
    revert: bool,
    summary_path: Option<&Path>,
) -> Result<()> {
    info!("Applying {} to {}", config.display(), host.display());

    let config = TunerConfig::load(config)?;
    let mut session = open_session(host, load_packs(packs))?;

    let summary = session.apply(&config)?;
    println!(
        "Patched {} sound aspects ({} volumes, {} samples), {} sounds without override",
        summary.patched_count(),
        summary.patched_volumes.len(),
        summary.patched_samples.len(),
        summary.skipped
    );
    for failure in &summary.failures {
        println!("  [{}] {}", failure.code, failure.message);
    }

    if let Some(catalog) = session.catalog() {
        print_catalog(catalog);
    }

    if let Some(path) = summary_path {
        fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("Summary written: {}", path.display());
    }

    if revert {
        let reverted = session.revert()?;
        println!("Reverted {} sound aspects", reverted);
        if let Some(catalog) = session.catalog() {
            print_catalog(catalog);
        }
    }

    Ok(())
}

/// Export the host's current volumes as settings.
pub fn export(host: &Path, output: Option<&Path>) -> Result<()> {
    info!("Exporting sound settings of {}", host.display());

    let session = open_session(host, SoundPackIndex::new())?;
    let config = session.export_config()?;

    match output {
        Some(path) => {
            config.save(path)?;
            println!(
                "Example settings with {} sounds written: {}",
                config.override_count(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}

/// Print every sound of a host snapshot.
pub fn inspect(host: &Path) -> Result<()> {
    let session = open_session(host, SoundPackIndex::new())?;

    if let Some(catalog) = session.catalog() {
        print_catalog(catalog);
    }

    let duplications = session.duplications();
    if !duplications.is_empty() {
        println!("\n--- Duplicated ---");
        for (target, source) in duplications.iter() {
            println!("{} <- {}", target, source);
        }
    }

    Ok(())
}

/// List installed sound packs.
pub fn packs(dir: &Path) -> Result<()> {
    let index = load_packs(Some(dir));

    if index.is_empty() {
        println!("No sound packs found in {}", dir.display());
        return Ok(());
    }

    println!("Sound packs ({} sounds):", index.len());
    for name in index.pack_names() {
        println!("  {}", name);
    }

    Ok(())
}

fn print_catalog(catalog: &ResourceCatalog) {
    println!("{:-<72}", "");
    println!("{:<48} {:>8}  {}", "Sound", "Volume", "Sample");
    println!("{:-<72}", "");

    for resource in catalog.iter() {
        let volume = resource
            .volume()
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|_| "-".to_string());
        let sample = resource
            .sample()
            .map(|s| s.name().to_string())
            .unwrap_or_else(|_| "-".to_string());
        println!("{:<48} {:>8}  {}", resource.key().to_string(), volume, sample);
    }

    println!("{:-<72}", "");
}
