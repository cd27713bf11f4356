//! Catalog of every patchable resource for one session

use std::collections::HashMap;

use log::{debug, info};

use crate::catalog::adapters::resource_for;
use crate::catalog::category::{Category, ResourceKey};
use crate::catalog::resource::SoundResource;
use crate::error::{Result, TunerError};
use crate::host::SharedGraph;

/// Every resource the host exposes, grouped by category
///
/// Built once per activation, after duplication. Each key appears exactly
/// once.
pub struct ResourceCatalog {
    resources: Vec<Box<dyn SoundResource>>,
    index: HashMap<ResourceKey, usize>,
}

impl ResourceCatalog {
    /// Enumerate the graph
    ///
    /// # Errors
    /// `CatalogUnavailable` if the graph cannot be read at all.
    pub fn build(graph: &SharedGraph) -> Result<Self> {
        let keys: Vec<ResourceKey> = {
            let host = graph
                .try_borrow()
                .map_err(|e| TunerError::CatalogUnavailable {
                    reason: format!("host graph is locked: {}", e),
                })?;
            Category::ALL
                .into_iter()
                .flat_map(|category| host.keys(category))
                .collect()
        };

        let mut catalog = Self {
            resources: Vec::with_capacity(keys.len()),
            index: HashMap::with_capacity(keys.len()),
        };
        for key in keys {
            catalog.insert(resource_for(graph, key));
        }

        info!("Resource catalog built with {} sounds", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from already constructed resources
    ///
    /// A later resource with the same key replaces the earlier one.
    pub fn from_resources(resources: impl IntoIterator<Item = Box<dyn SoundResource>>) -> Self {
        let mut catalog = Self {
            resources: Vec::new(),
            index: HashMap::new(),
        };
        for resource in resources {
            catalog.insert(resource);
        }
        catalog
    }

    fn insert(&mut self, resource: Box<dyn SoundResource>) {
        let key = resource.key().clone();
        match self.index.get(&key) {
            Some(&i) => {
                debug!("Duplicate catalog entry for {}, keeping the latest", key);
                self.resources[i] = resource;
            }
            None => {
                self.index.insert(key, self.resources.len());
                self.resources.push(resource);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in enumeration order
    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.resources.iter().map(|r| r.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn SoundResource + 'static)> {
        self.resources.iter().map(|r| r.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn SoundResource + 'static)> {
        self.resources.iter_mut().map(|r| r.as_mut())
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&(dyn SoundResource + 'static)> {
        self.index.get(key).map(|&i| self.resources[i].as_ref())
    }

    pub fn get_mut(&mut self, key: &ResourceKey) -> Option<&mut (dyn SoundResource + 'static)> {
        let i = *self.index.get(key)?;
        Some(self.resources[i].as_mut())
    }

    /// Ids of one category, in enumeration order
    pub fn ids(&self, category: Category) -> Vec<String> {
        self.keys()
            .filter(|k| k.category == category)
            .map(|k| k.id.clone())
            .collect()
    }

    /// Categories that have at least one resource
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.keys().any(|k| k.category == *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AmbientSlot, SoundEffect, SoundGraph};

    fn sample_graph() -> SharedGraph {
        let mut graph = SoundGraph::new();
        let siren = graph.add_effect(SoundEffect::new("Siren", 1.0, None));
        graph.bind(ResourceKey::new(Category::Vehicle, "Ambulance Siren"), siren);
        graph.bind(ResourceKey::new(Category::Vehicle, "Police Car Siren"), siren);
        graph.insert_ambient(
            ResourceKey::new(Category::AmbientNight, "City"),
            AmbientSlot {
                volume: 0.4,
                clip: None,
            },
        );
        graph.insert_control("UI Clicks", 1.0);
        graph.into_shared()
    }

    #[test]
    fn test_build_is_exhaustive_and_grouped() {
        let graph = sample_graph();
        let catalog = ResourceCatalog::build(&graph).unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.categories(),
            vec![Category::AmbientNight, Category::Vehicle, Category::Misc]
        );
        assert_eq!(
            catalog.ids(Category::Vehicle),
            vec!["Ambulance Siren".to_string(), "Police Car Siren".to_string()]
        );
    }

    #[test]
    fn test_aliased_identities_are_separate_entries() {
        let graph = sample_graph();
        let catalog = ResourceCatalog::build(&graph).unwrap();

        assert!(catalog.contains(&ResourceKey::new(Category::Vehicle, "Ambulance Siren")));
        assert!(catalog.contains(&ResourceKey::new(Category::Vehicle, "Police Car Siren")));
    }

    #[test]
    fn test_build_fails_on_locked_graph() {
        let graph = sample_graph();
        let _guard = graph.borrow_mut();

        let err = ResourceCatalog::build(&graph).err().unwrap();
        assert_eq!(err.error_code(), "CATALOG_UNAVAILABLE");
    }

    #[test]
    fn test_get_mut_writes_through() {
        let graph = sample_graph();
        let mut catalog = ResourceCatalog::build(&graph).unwrap();
        let key = ResourceKey::new(Category::Misc, "UI Clicks");

        catalog.get_mut(&key).unwrap().set_volume(0.2).unwrap();
        assert_eq!(graph.borrow().control("UI Clicks"), Some(0.2));
    }
}
