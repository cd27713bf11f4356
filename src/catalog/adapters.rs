//! Category adapters over the host graph
//!
//! Resources hold a weak link to the graph: if the host drops the graph or
//! removes the underlying slot, accessors report `Gone` instead of keeping
//! the resource alive.

use std::cell::RefCell;
use std::rc::Weak;

use crate::audio::SampleHandle;
use crate::catalog::category::{Category, ResourceKey, Storage};
use crate::catalog::resource::{validate_volume, AccessError, AccessResult, SoundResource};
use crate::host::{SharedGraph, SoundGraph};

/// Weak link from a resource to the graph it lives in
#[derive(Debug, Clone)]
struct GraphLink {
    key: ResourceKey,
    graph: Weak<RefCell<SoundGraph>>,
}

impl GraphLink {
    fn new(graph: &SharedGraph, key: ResourceKey) -> Self {
        Self {
            key,
            graph: std::rc::Rc::downgrade(graph),
        }
    }

    fn gone(&self) -> AccessError {
        AccessError::Gone {
            key: self.key.clone(),
        }
    }

    fn busy(&self) -> AccessError {
        AccessError::Invalid {
            key: self.key.clone(),
            reason: "host graph is borrowed elsewhere".to_string(),
        }
    }

    /// Run `f` against the graph; `None` means the resource is gone
    fn read<T>(&self, f: impl FnOnce(&SoundGraph) -> Option<T>) -> AccessResult<T> {
        let graph = self.graph.upgrade().ok_or_else(|| self.gone())?;
        let graph = graph.try_borrow().map_err(|_| self.busy())?;
        f(&graph).ok_or_else(|| self.gone())
    }

    fn write<T>(&self, f: impl FnOnce(&mut SoundGraph) -> Option<T>) -> AccessResult<T> {
        let graph = self.graph.upgrade().ok_or_else(|| self.gone())?;
        let mut graph = graph.try_borrow_mut().map_err(|_| self.busy())?;
        f(&mut graph).ok_or_else(|| self.gone())
    }

    fn require_clip(&self, clip: Option<SampleHandle>) -> AccessResult<SampleHandle> {
        clip.ok_or_else(|| AccessError::Invalid {
            key: self.key.clone(),
            reason: "no sample data bound".to_string(),
        })
    }
}

/// `Ambient` and `AmbientNight` table entries
#[derive(Debug, Clone)]
pub struct AmbientResource {
    link: GraphLink,
}

impl SoundResource for AmbientResource {
    fn key(&self) -> &ResourceKey {
        &self.link.key
    }

    fn volume(&self) -> AccessResult<f32> {
        let key = &self.link.key;
        self.link.read(|g| g.ambient(key).map(|slot| slot.volume))
    }

    fn set_volume(&mut self, volume: f32) -> AccessResult<()> {
        let key = &self.link.key;
        let volume = validate_volume(key, volume)?;
        self.link
            .write(|g| g.ambient_mut(key).map(|slot| slot.volume = volume))
    }

    fn sample(&self) -> AccessResult<SampleHandle> {
        let key = &self.link.key;
        let clip = self.link.read(|g| g.ambient(key).map(|slot| slot.clip.clone()))?;
        self.link.require_clip(clip)
    }

    fn set_sample(&mut self, sample: SampleHandle) -> AccessResult<()> {
        let key = &self.link.key;
        self.link
            .write(|g| g.ambient_mut(key).map(|slot| slot.clip = Some(sample)))
    }
}

/// Identities bound to effect slots (`Animal`, `Building`, `Vehicle`, `Effect`)
///
/// Writes land on the slot, so every identity sharing the slot hears them.
#[derive(Debug, Clone)]
pub struct EffectResource {
    link: GraphLink,
}

impl SoundResource for EffectResource {
    fn key(&self) -> &ResourceKey {
        &self.link.key
    }

    fn volume(&self) -> AccessResult<f32> {
        let key = &self.link.key;
        self.link.read(|g| g.bound_effect(key).map(|fx| fx.volume))
    }

    fn set_volume(&mut self, volume: f32) -> AccessResult<()> {
        let key = &self.link.key;
        let volume = validate_volume(key, volume)?;
        self.link
            .write(|g| g.bound_effect_mut(key).map(|fx| fx.volume = volume))
    }

    fn sample(&self) -> AccessResult<SampleHandle> {
        let key = &self.link.key;
        let clip = self.link.read(|g| g.bound_effect(key).map(|fx| fx.clip.clone()))?;
        self.link.require_clip(clip)
    }

    fn set_sample(&mut self, sample: SampleHandle) -> AccessResult<()> {
        let key = &self.link.key;
        self.link
            .write(|g| g.bound_effect_mut(key).map(|fx| fx.clip = Some(sample)))
    }
}

/// Volume-only `Misc` controls such as UI click volume
#[derive(Debug, Clone)]
pub struct ControlResource {
    link: GraphLink,
}

impl SoundResource for ControlResource {
    fn key(&self) -> &ResourceKey {
        &self.link.key
    }

    fn volume(&self) -> AccessResult<f32> {
        let id = self.link.key.id.as_str();
        self.link.read(|g| g.control(id))
    }

    fn set_volume(&mut self, volume: f32) -> AccessResult<()> {
        let id = self.link.key.id.as_str();
        let volume = validate_volume(&self.link.key, volume)?;
        self.link.write(|g| g.control_mut(id).map(|v| *v = volume))
    }

    fn sample(&self) -> AccessResult<SampleHandle> {
        Err(AccessError::Unsupported {
            category: Category::Misc,
        })
    }

    fn set_sample(&mut self, _sample: SampleHandle) -> AccessResult<()> {
        Err(AccessError::Unsupported {
            category: Category::Misc,
        })
    }
}

/// Pick the adapter matching the key's storage kind
pub fn resource_for(graph: &SharedGraph, key: ResourceKey) -> Box<dyn SoundResource> {
    let storage = key.category.storage();
    let link = GraphLink::new(graph, key);
    match storage {
        Storage::Ambient => Box::new(AmbientResource { link }),
        Storage::Effect => Box::new(EffectResource { link }),
        Storage::Control => Box::new(ControlResource { link }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;
    use crate::host::{AmbientSlot, SoundEffect};

    fn handle(name: &str) -> SampleHandle {
        SampleHandle::new(AudioClip::silent(name, 48000, 8))
    }

    fn shared_graph() -> SharedGraph {
        let mut graph = SoundGraph::new();
        let engine = graph.add_effect(SoundEffect::new("Engine", 1.5, Some(handle("engine"))));
        graph.bind(ResourceKey::new(Category::Vehicle, "Small Car Movement"), engine);
        graph.insert_ambient(
            ResourceKey::new(Category::Ambient, "Forest"),
            AmbientSlot {
                volume: 0.6,
                clip: Some(handle("forest")),
            },
        );
        graph.insert_control("UI Clicks", 1.0);
        graph.into_shared()
    }

    #[test]
    fn test_effect_adapter_round_trip() {
        let graph = shared_graph();
        let mut car = resource_for(&graph, ResourceKey::new(Category::Vehicle, "Small Car Movement"));

        assert_eq!(car.volume(), Ok(1.5));
        car.set_volume(0.25).unwrap();
        assert_eq!(car.volume(), Ok(0.25));

        let replacement = handle("retro");
        car.set_sample(replacement.clone()).unwrap();
        assert_eq!(car.sample(), Ok(replacement));
    }

    #[test]
    fn test_ambient_adapter_round_trip() {
        let graph = shared_graph();
        let mut forest = resource_for(&graph, ResourceKey::new(Category::Ambient, "Forest"));

        assert_eq!(forest.sample().unwrap().name(), "forest");
        forest.set_volume(0.9).unwrap();
        assert_eq!(forest.volume(), Ok(0.9));
    }

    #[test]
    fn test_control_is_volume_only() {
        let graph = shared_graph();
        let mut clicks = resource_for(&graph, ResourceKey::new(Category::Misc, "UI Clicks"));

        clicks.set_volume(0.3).unwrap();
        assert_eq!(clicks.volume(), Ok(0.3));
        assert_eq!(
            clicks.sample(),
            Err(AccessError::Unsupported {
                category: Category::Misc
            })
        );
        assert!(clicks.set_sample(handle("x")).is_err());
    }

    #[test]
    fn test_dropped_graph_reports_gone() {
        let graph = shared_graph();
        let key = ResourceKey::new(Category::Vehicle, "Small Car Movement");
        let mut car = resource_for(&graph, key.clone());
        drop(graph);

        assert_eq!(car.volume(), Err(AccessError::Gone { key: key.clone() }));
        assert_eq!(car.set_volume(1.0), Err(AccessError::Gone { key }));
    }

    #[test]
    fn test_removed_resource_reports_gone() {
        let graph = shared_graph();
        let key = ResourceKey::new(Category::Ambient, "Forest");
        let forest = resource_for(&graph, key.clone());
        graph.borrow_mut().remove_ambient(&key);

        assert_eq!(forest.volume(), Err(AccessError::Gone { key }));
    }

    #[test]
    fn test_busy_graph_is_invalid_not_panic() {
        let graph = shared_graph();
        let mut car = resource_for(&graph, ResourceKey::new(Category::Vehicle, "Small Car Movement"));
        let _guard = graph.borrow_mut();

        assert!(matches!(car.set_volume(1.0), Err(AccessError::Invalid { .. })));
    }

    #[test]
    fn test_rejects_invalid_volume() {
        let graph = shared_graph();
        let mut car = resource_for(&graph, ResourceKey::new(Category::Vehicle, "Small Car Movement"));

        assert!(car.set_volume(f32::NAN).is_err());
        assert_eq!(car.volume(), Ok(1.5));
    }
}
