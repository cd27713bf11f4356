//! Backup/patch/revert engine
//!
//! The engine is written once against `SoundResource`; category specifics
//! live in the catalog adapters. Backups are taken at most once per
//! `(resource, aspect)` and never overwritten, so a value written by a patch
//! can never be mistaken for an original.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::audio::SampleHandle;
use crate::catalog::{validate_volume, Category, ResourceCatalog, ResourceKey, SoundResource};
use crate::error::{Result, TunerError};
use crate::patch::backup::{Aspect, AspectState, BackupRecord};

/// Session-wide backup store and patch state
#[derive(Debug, Default)]
pub struct PatchEngine {
    records: BTreeMap<ResourceKey, BackupRecord>,
    patched: BTreeSet<(ResourceKey, Aspect)>,
}

impl PatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn record(&self, key: &ResourceKey) -> Option<&BackupRecord> {
        self.records.get(key)
    }

    pub fn records(&self) -> impl Iterator<Item = &BackupRecord> {
        self.records.values()
    }

    pub fn has_backup(&self, key: &ResourceKey, aspect: Aspect) -> bool {
        self.records.get(key).is_some_and(|r| r.has(aspect))
    }

    pub fn state(&self, key: &ResourceKey, aspect: Aspect) -> AspectState {
        if !self.has_backup(key, aspect) {
            AspectState::Unbacked
        } else if self.patched.contains(&(key.clone(), aspect)) {
            AspectState::Patched
        } else {
            AspectState::Backed
        }
    }

    /// Forget every backup. Only for a full reload, after the host has
    /// restored its own state.
    pub fn clear(&mut self) {
        self.records.clear();
        self.patched.clear();
    }

    fn record_mut(&mut self, key: &ResourceKey) -> &mut BackupRecord {
        self.records
            .entry(key.clone())
            .or_insert_with(|| BackupRecord::new(key.clone()))
    }

    // ========================================================================
    // Volume
    // ========================================================================

    /// Capture the current volume unless it was captured before
    ///
    /// A volume that could not be written back on revert is refused, so the
    /// aspect stays unbacked.
    pub fn backup_volume<R: SoundResource + ?Sized>(&mut self, resource: &R) -> Result<()> {
        let key = resource.key();
        if self.has_backup(key, Aspect::Volume) {
            debug!("Volume of '{}' was backed up before, keeping the original", key);
            return Ok(());
        }

        let volume = resource
            .volume()
            .and_then(|v| validate_volume(key, v))
            .map_err(|source| TunerError::Backup {
                key: key.clone(),
                aspect: Aspect::Volume,
                source,
            })?;
        self.record_mut(key).original_volume = Some(volume);
        debug!("Volume of '{}' has been backed up ({})", key, volume);
        Ok(())
    }

    /// Write a new volume
    ///
    /// Without a backup the write is still attempted, but no backup is made
    /// after the fact and the change cannot be reverted.
    pub fn patch_volume<R: SoundResource + ?Sized>(
        &mut self,
        resource: &mut R,
        volume: f32,
    ) -> Result<()> {
        let key = resource.key().clone();
        if !self.has_backup(&key, Aspect::Volume) {
            warn!("Patching volume of '{}' without a backup, it cannot be reverted", key);
        }

        resource
            .set_volume(volume)
            .map_err(|source| TunerError::Patch {
                key: key.clone(),
                aspect: Aspect::Volume,
                source,
            })?;
        debug!("Volume of '{}' has been patched to {}", key, volume);
        self.patched.insert((key, Aspect::Volume));
        Ok(())
    }

    /// Restore the backed-up volume. Returns `false` if there is no backup.
    pub fn revert_volume<R: SoundResource + ?Sized>(&mut self, resource: &mut R) -> Result<bool> {
        let key = resource.key().clone();
        let Some(original) = self.record(&key).and_then(|r| r.original_volume) else {
            return Ok(false);
        };

        resource
            .set_volume(original)
            .map_err(|source| TunerError::Patch {
                key: key.clone(),
                aspect: Aspect::Volume,
                source,
            })?;
        debug!("Volume of '{}' has been reverted to {}", key, original);
        self.patched.remove(&(key, Aspect::Volume));
        Ok(true)
    }

    // ========================================================================
    // Sample data
    // ========================================================================

    /// Capture the current sample handle unless it was captured before
    pub fn backup_sample<R: SoundResource + ?Sized>(&mut self, resource: &R) -> Result<()> {
        let key = resource.key();
        if self.has_backup(key, Aspect::Sample) {
            debug!("Sample of '{}' was backed up before, keeping the original", key);
            return Ok(());
        }

        let sample = resource.sample().map_err(|source| TunerError::Backup {
            key: key.clone(),
            aspect: Aspect::Sample,
            source,
        })?;
        debug!("Sample of '{}' has been backed up ({})", key, sample.name());
        self.record_mut(key).original_sample = Some(sample);
        Ok(())
    }

    /// Point the resource at new sample data, same backup policy as volumes
    pub fn patch_sample<R: SoundResource + ?Sized>(
        &mut self,
        resource: &mut R,
        sample: SampleHandle,
    ) -> Result<()> {
        let key = resource.key().clone();
        if !self.has_backup(&key, Aspect::Sample) {
            warn!("Patching sample of '{}' without a backup, it cannot be reverted", key);
        }

        let name = sample.name().to_string();
        resource
            .set_sample(sample)
            .map_err(|source| TunerError::Patch {
                key: key.clone(),
                aspect: Aspect::Sample,
                source,
            })?;
        debug!("Sample of '{}' has been patched to {}", key, name);
        self.patched.insert((key, Aspect::Sample));
        Ok(())
    }

    /// Restore the backed-up sample. Returns `false` if there is no backup.
    pub fn revert_sample<R: SoundResource + ?Sized>(&mut self, resource: &mut R) -> Result<bool> {
        let key = resource.key().clone();
        let Some(original) = self.record(&key).and_then(|r| r.original_sample.clone()) else {
            return Ok(false);
        };

        resource
            .set_sample(original)
            .map_err(|source| TunerError::Patch {
                key: key.clone(),
                aspect: Aspect::Sample,
                source,
            })?;
        debug!("Sample of '{}' has been reverted", key);
        self.patched.remove(&(key, Aspect::Sample));
        Ok(true)
    }

    // ========================================================================
    // Aspect dispatch
    // ========================================================================

    pub fn backup<R: SoundResource + ?Sized>(&mut self, resource: &R, aspect: Aspect) -> Result<()> {
        match aspect {
            Aspect::Volume => self.backup_volume(resource),
            Aspect::Sample => self.backup_sample(resource),
        }
    }

    pub fn revert<R: SoundResource + ?Sized>(
        &mut self,
        resource: &mut R,
        aspect: Aspect,
    ) -> Result<bool> {
        match aspect {
            Aspect::Volume => self.revert_volume(resource),
            Aspect::Sample => self.revert_sample(resource),
        }
    }

    // ========================================================================
    // Batch operations
    //
    // Each batch visits every id, logs individual failures and returns the
    // number of successes. None of them stops at the first error.
    // ========================================================================

    /// Back up one aspect of every resource in a category
    pub fn backup_all(
        &mut self,
        catalog: &ResourceCatalog,
        category: Category,
        aspect: Aspect,
    ) -> usize {
        let mut counter = 0;
        for resource in catalog.iter().filter(|r| r.key().category == category) {
            match self.backup(resource, aspect) {
                Ok(()) => counter += 1,
                Err(e) => debug!("{} of '{}' has not been backed up: {}", aspect, resource.key(), e),
            }
        }
        counter
    }

    /// Patch volumes for the given ids of a category
    pub fn patch_all_volumes(
        &mut self,
        catalog: &mut ResourceCatalog,
        category: Category,
        volumes: &BTreeMap<String, f32>,
    ) -> usize {
        let mut counter = 0;
        for (id, volume) in volumes {
            let key = ResourceKey::new(category, id.clone());
            let Some(resource) = catalog.get_mut(&key) else {
                debug!("Volume of '{}' has not been patched: not in catalog", key);
                continue;
            };
            match self.patch_volume(resource, *volume) {
                Ok(()) => counter += 1,
                Err(e) => debug!("Volume of '{}' has not been patched: {}", key, e),
            }
        }
        counter
    }

    /// Patch samples for the given ids of a category
    pub fn patch_all_samples(
        &mut self,
        catalog: &mut ResourceCatalog,
        category: Category,
        samples: &BTreeMap<String, SampleHandle>,
    ) -> usize {
        let mut counter = 0;
        for (id, sample) in samples {
            let key = ResourceKey::new(category, id.clone());
            let Some(resource) = catalog.get_mut(&key) else {
                debug!("Sample of '{}' has not been patched: not in catalog", key);
                continue;
            };
            match self.patch_sample(resource, sample.clone()) {
                Ok(()) => counter += 1,
                Err(e) => debug!("Sample of '{}' has not been patched: {}", key, e),
            }
        }
        counter
    }

    /// Revert one aspect of every backed-up resource in a category
    pub fn revert_all(
        &mut self,
        catalog: &mut ResourceCatalog,
        category: Category,
        aspect: Aspect,
    ) -> usize {
        let mut counter = 0;
        for resource in catalog
            .iter_mut()
            .filter(|r| r.key().category == category)
        {
            match self.revert(resource, aspect) {
                Ok(true) => counter += 1,
                Ok(false) => {}
                Err(e) => warn!("{} of '{}' could not be reverted: {}", aspect, resource.key(), e),
            }
        }
        counter
    }

    /// Revert both aspects of every resource in the catalog
    pub fn revert_everything(&mut self, catalog: &mut ResourceCatalog) -> usize {
        let mut counter = 0;
        for category in catalog.categories() {
            for aspect in Aspect::ALL {
                counter += self.revert_all(catalog, category, aspect);
            }
        }
        counter
    }
}
