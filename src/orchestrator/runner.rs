//! Applies the user's overrides to a catalog

use log::{debug, info};

use crate::catalog::{Category, ResourceCatalog, ResourceKey, SoundResource};
use crate::config::{OverrideSpec, TunerConfig};
use crate::orchestrator::summary::RunSummary;
use crate::patch::{Aspect, PatchEngine};
use crate::soundpack::SoundPackIndex;

/// One pass of backup and patch over a catalog
///
/// Resources without an override are never backed up or touched. A patch is
/// only attempted for an aspect whose backup exists, so every change made
/// here can be reverted.
pub struct Orchestrator<'a> {
    engine: &'a mut PatchEngine,
    packs: &'a mut SoundPackIndex,
    config: &'a TunerConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(engine: &'a mut PatchEngine, packs: &'a mut SoundPackIndex, config: &'a TunerConfig) -> Self {
        Self {
            engine,
            packs,
            config,
        }
    }

    /// Apply overrides to every resource of the catalog
    pub fn run(&mut self, catalog: &mut ResourceCatalog) -> RunSummary {
        self.run_filtered(catalog, |_| true)
    }

    /// Apply overrides to resources of the given categories only
    pub fn run_categories(&mut self, catalog: &mut ResourceCatalog, categories: &[Category]) -> RunSummary {
        self.run_filtered(catalog, |category| categories.contains(&category))
    }

    /// Revert everything this session has patched
    pub fn revert(&mut self, catalog: &mut ResourceCatalog) -> usize {
        let reverted = self.engine.revert_everything(catalog);
        info!("Reverted {} sound aspects", reverted);
        reverted
    }

    fn run_filtered(&mut self, catalog: &mut ResourceCatalog, include: impl Fn(Category) -> bool) -> RunSummary {
        let mut summary = RunSummary::start();

        for resource in catalog.iter_mut() {
            let key = resource.key().clone();
            if !include(key.category) {
                continue;
            }
            match self.config.resolve(&key) {
                Some(spec) => self.apply(resource, &spec, &mut summary),
                None => summary.skipped += 1,
            }
        }

        summary.finish();
        summary
    }

    fn apply(&mut self, resource: &mut (dyn SoundResource + 'static), spec: &OverrideSpec, summary: &mut RunSummary) {
        let key = &spec.key;

        let volume_backed = match self.engine.backup_volume(&*resource) {
            Ok(()) => {
                summary.backed_up_volumes.push(key.clone());
                true
            }
            Err(e) => {
                summary.fail(key, Aspect::Volume, &e);
                false
            }
        };

        let sample_backed = match self.engine.backup_sample(&*resource) {
            Ok(()) => {
                summary.backed_up_samples.push(key.clone());
                true
            }
            Err(e) if e.is_unsupported() => false,
            Err(e) => {
                summary.fail(key, Aspect::Sample, &e);
                false
            }
        };

        if let Some(pack) = spec.replacement_pack() {
            if sample_backed {
                self.apply_sample(resource, key, pack, summary);
            } else {
                debug!("Sample of '{}' is not patched: it has no backup", key);
            }
        }

        if let Some(volume) = spec.target_volume {
            if volume_backed {
                match self.engine.patch_volume(resource, volume) {
                    Ok(()) => summary.patched_volumes.push(key.clone()),
                    Err(e) => summary.fail(key, Aspect::Volume, &e),
                }
            } else {
                debug!("Volume of '{}' is not patched: it has no backup", key);
            }
        }
    }

    fn apply_sample(
        &mut self,
        resource: &mut (dyn SoundResource + 'static),
        key: &ResourceKey,
        pack: &str,
        summary: &mut RunSummary,
    ) {
        let sample = match self.packs.lookup(key.category, &key.id, pack) {
            Ok(sample) => sample,
            Err(e) => {
                summary.fail(key, Aspect::Sample, &e);
                return;
            }
        };
        match self.engine.patch_sample(resource, sample) {
            Ok(()) => summary.patched_samples.push(key.clone()),
            Err(e) => summary.fail(key, Aspect::Sample, &e),
        }
    }
}
