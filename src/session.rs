//! Tuner session
//!
//! Ties one host graph to the components working on it and enforces their
//! order: duplication, then catalog, then patching.

use log::info;

use crate::catalog::{Category, ResourceCatalog};
use crate::config::{snapshot_config, TunerConfig};
use crate::duplicator::{CategoryDuplicator, Duplication, DuplicationMap};
use crate::error::{Result, TunerError};
use crate::host::SharedGraph;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::patch::PatchEngine;
use crate::soundpack::SoundPackIndex;

/// Everything one activation of the tuner works with
pub struct TunerSession {
    graph: SharedGraph,
    packs: SoundPackIndex,
    engine: PatchEngine,
    duplicator: CategoryDuplicator,
    catalog: Option<ResourceCatalog>,
}

impl TunerSession {
    pub fn new(graph: SharedGraph, packs: SoundPackIndex) -> Self {
        Self {
            graph,
            packs,
            engine: PatchEngine::new(),
            duplicator: CategoryDuplicator::new(),
            catalog: None,
        }
    }

    /// Run the duplications, then enumerate the graph
    ///
    /// The catalog has to see the clones, so it is always rebuilt here.
    /// Returns the number of resources in the catalog.
    pub fn prepare(&mut self, duplications: &[Duplication]) -> Result<usize> {
        {
            let mut host = self
                .graph
                .try_borrow_mut()
                .map_err(|e| TunerError::CatalogUnavailable {
                    reason: format!("host graph is locked: {}", e),
                })?;
            self.duplicator.duplicate_all(&mut host, duplications);
        }

        let catalog = ResourceCatalog::build(&self.graph)?;
        let len = catalog.len();
        self.catalog = Some(catalog);
        Ok(len)
    }

    /// Apply every override of the settings
    pub fn apply(&mut self, config: &TunerConfig) -> Result<RunSummary> {
        let catalog = self.catalog.as_mut().ok_or_else(not_prepared)?;
        let summary = Orchestrator::new(&mut self.engine, &mut self.packs, config).run(catalog);
        summary.log();
        Ok(summary)
    }

    /// Apply only the `Misc` overrides, for hosts whose UI sounds load before
    /// the rest of the graph
    pub fn apply_ui_sounds(&mut self, config: &TunerConfig) -> Result<RunSummary> {
        let catalog = self.catalog.as_mut().ok_or_else(not_prepared)?;
        let summary = Orchestrator::new(&mut self.engine, &mut self.packs, config)
            .run_categories(catalog, &[Category::Misc]);
        summary.log();
        Ok(summary)
    }

    /// Restore every backed-up aspect
    pub fn revert(&mut self) -> Result<usize> {
        let catalog = self.catalog.as_mut().ok_or_else(not_prepared)?;
        let reverted = self.engine.revert_everything(catalog);
        info!("Reverted {} sound aspects", reverted);
        Ok(reverted)
    }

    /// Drop all session state so the next `prepare` starts over
    ///
    /// Call after the host has restored its own sounds, e.g. when a new map
    /// is loaded. Backups taken before are forgotten.
    pub fn reload(&mut self) {
        self.engine.clear();
        self.duplicator.reset();
        self.catalog = None;
        info!("Tuner session reset");
    }

    /// Current live volumes as a settings file
    pub fn export_config(&self) -> Result<TunerConfig> {
        let catalog = self.catalog.as_ref().ok_or_else(not_prepared)?;
        Ok(snapshot_config(catalog))
    }

    pub fn is_prepared(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn packs(&self) -> &SoundPackIndex {
        &self.packs
    }

    pub fn engine(&self) -> &PatchEngine {
        &self.engine
    }

    pub fn catalog(&self) -> Option<&ResourceCatalog> {
        self.catalog.as_ref()
    }

    pub fn duplications(&self) -> &DuplicationMap {
        self.duplicator.map()
    }
}

fn not_prepared() -> TunerError {
    TunerError::CatalogUnavailable {
        reason: "session has not been prepared".to_string(),
    }
}
