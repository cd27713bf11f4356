//! Category Duplicator
//!
//! Some sound identities share one effect slot in the host, e.g. two
//! vehicle types playing the same siren. Patching one would patch both, so
//! before the catalog is built the shared slot is cloned and one identity is
//! rebound to the clone.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::catalog::{Category, ResourceKey, Storage};
use crate::error::{Result, TunerError};
use crate::host::SoundGraph;

/// Outcome of a duplication request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateResult {
    /// A clone was created and bound
    Success,
    /// The clone already exists; nothing was changed
    AlreadyPatched,
    /// The source sound does not exist in this game version
    NotFound,
}

/// A duplication to perform: `new_id` gets its own copy of `source_id`'s sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplication {
    pub category: Category,
    pub source_id: &'static str,
    pub new_id: &'static str,
    /// Human-readable name for log lines
    pub label: &'static str,
}

/// Duplications needed so that commonly tuned sounds can be set apart
pub const COMPATIBILITY_DUPLICATIONS: &[Duplication] = &[
    Duplication {
        category: Category::Vehicle,
        source_id: "Ambulance Siren",
        new_id: "Police Car Siren",
        label: "Police sirens",
    },
    Duplication {
        category: Category::Vehicle,
        source_id: "Small Car Movement",
        new_id: "Scooter Movement",
        label: "Scooter sounds",
    },
    Duplication {
        category: Category::Building,
        source_id: "Coal Power Plant",
        new_id: "Oil Power Plant",
        label: "Oil power plant sounds",
    },
    Duplication {
        category: Category::Building,
        source_id: "Water Drain Pipe",
        new_id: "Water Treatment Plant",
        label: "Water treatment plant sounds",
    },
];

/// Clones made this session, `target -> source`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicationMap {
    clones: BTreeMap<ResourceKey, ResourceKey>,
}

impl DuplicationMap {
    pub fn contains(&self, target: &ResourceKey) -> bool {
        self.clones.contains_key(target)
    }

    pub fn source_of(&self, target: &ResourceKey) -> Option<&ResourceKey> {
        self.clones.get(target)
    }

    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &ResourceKey)> {
        self.clones.iter()
    }

    fn record(&mut self, target: ResourceKey, source: ResourceKey) {
        self.clones.insert(target, source);
    }
}

/// Makes shared sounds independently patchable
#[derive(Debug, Default)]
pub struct CategoryDuplicator {
    map: DuplicationMap,
}

impl CategoryDuplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&self) -> &DuplicationMap {
        &self.map
    }

    /// Forget the session's clones. The graph keeps them; a later request
    /// detects them there.
    pub fn reset(&mut self) {
        self.map = DuplicationMap::default();
    }

    /// Give `new_id` its own copy of `source_id`'s effect
    pub fn duplicate(
        &mut self,
        graph: &mut SoundGraph,
        category: Category,
        source_id: &str,
        new_id: &str,
    ) -> DuplicateResult {
        let source = ResourceKey::new(category, source_id);
        let target = ResourceKey::new(category, new_id);

        if self.map.contains(&target) {
            return DuplicateResult::AlreadyPatched;
        }

        if category.storage() != Storage::Effect {
            debug!("{} does not use shared effect slots, nothing to duplicate", category);
            return DuplicateResult::NotFound;
        }

        let Some(source_slot) = graph.binding(&source).filter(|k| graph.effect(*k).is_some()) else {
            return DuplicateResult::NotFound;
        };

        // Only an unbound target or one sharing the source slot gets a clone
        if let Some(existing) = graph.binding(&target).filter(|k| *k != source_slot) {
            let cloned_from_source = graph
                .effect(existing)
                .is_some_and(|fx| fx.cloned_from == Some(source_slot));
            if cloned_from_source {
                self.map.record(target, source);
            } else {
                debug!("{} already has a sound of its own, leaving it alone", target);
            }
            return DuplicateResult::AlreadyPatched;
        }

        let Some(clone) = graph.clone_effect(source_slot) else {
            return DuplicateResult::NotFound;
        };
        graph.bind(target.clone(), clone);
        debug!("Duplicated {} into {}", source, target);
        self.map.record(target, source);
        DuplicateResult::Success
    }

    /// Like `duplicate`, with `NotFound` reported as a `Duplication` error
    pub fn try_duplicate(
        &mut self,
        graph: &mut SoundGraph,
        category: Category,
        source_id: &str,
        new_id: &str,
    ) -> Result<DuplicateResult> {
        match self.duplicate(graph, category, source_id, new_id) {
            DuplicateResult::NotFound => Err(TunerError::Duplication {
                category,
                source_id: source_id.to_string(),
                new_id: new_id.to_string(),
            }),
            result => Ok(result),
        }
    }

    /// Run a list of duplications, logging each outcome
    ///
    /// A missing source never stops the remaining duplications. Returns the
    /// number of requests that ended with the clone in place.
    pub fn duplicate_all(&mut self, graph: &mut SoundGraph, duplications: &[Duplication]) -> usize {
        let mut in_place = 0;
        for dup in duplications {
            match self.try_duplicate(graph, dup.category, dup.source_id, dup.new_id) {
                Ok(DuplicateResult::Success) => {
                    debug!("{} have been patched for compatibility", dup.label);
                    in_place += 1;
                }
                Ok(DuplicateResult::AlreadyPatched) => {
                    debug!("{} have been patched for compatibility already", dup.label);
                    in_place += 1;
                }
                Ok(DuplicateResult::NotFound) => {}
                Err(e) => warn!("Could not patch {} for compatibility: {}", dup.label.to_lowercase(), e),
            }
        }
        in_place
    }
}
