//! Export of the live sound settings
//!
//! Written before anything is patched, so users get an example settings file
//! that lists every sound with the game's own volume.

use log::debug;

use crate::catalog::ResourceCatalog;
use crate::config::settings::{SoundOverride, TunerConfig};
use crate::soundpack::DEFAULT_PACK;

/// Current volume of every readable resource, with the `Default` pack
///
/// Resources whose volume cannot be read are left out.
pub fn snapshot_config(catalog: &ResourceCatalog) -> TunerConfig {
    let mut config = TunerConfig::new();
    for resource in catalog.iter() {
        match resource.volume() {
            Ok(volume) => {
                config.set_override(resource.key(), SoundOverride::with_pack(DEFAULT_PACK, volume));
            }
            Err(e) => debug!("Leaving {} out of the example settings: {}", resource.key(), e),
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ResourceKey};
    use crate::host::{SoundEffect, SoundGraph};

    #[test]
    fn test_snapshot_lists_current_volumes() {
        let mut graph = SoundGraph::new();
        let train = graph.add_effect(SoundEffect::new("Train", 0.5, None));
        let gone = graph.add_effect(SoundEffect::new("Metro", 0.5, None));
        graph.bind(ResourceKey::new(Category::Vehicle, "Train Movement"), train);
        graph.bind(ResourceKey::new(Category::Vehicle, "Metro Movement"), gone);
        graph.insert_control("UI Clicks", 0.9);
        let graph = graph.into_shared();
        let catalog = ResourceCatalog::build(&graph).unwrap();
        graph.borrow_mut().remove_effect(gone);

        let config = snapshot_config(&catalog);

        let train = config
            .resolve(&ResourceKey::new(Category::Vehicle, "Train Movement"))
            .unwrap();
        assert_eq!(train.target_volume, Some(0.5));
        assert_eq!(train.target_sound_pack.as_deref(), Some(DEFAULT_PACK));
        assert!(config
            .resolve(&ResourceKey::new(Category::Vehicle, "Metro Movement"))
            .is_none());
        assert_eq!(config.override_count(), 2);
    }
}
