//! In-process model of the host application's sound resources
//!
//! The host owns the graph. Effect-backed identities point into a slot
//! arena, and two identities may point at the same slot, which is exactly
//! the aliasing the duplicator has to break before patching.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;
use slotmap::{new_key_type, SlotMap};

use crate::audio::SampleHandle;
use crate::catalog::{Category, ResourceKey, Storage};

new_key_type! {
    /// Handle to an effect slot in the graph
    pub struct EffectKey;
}

/// The graph as shared by the host and the resources enumerated from it
pub type SharedGraph = Rc<RefCell<SoundGraph>>;

/// A playable sound effect slot
#[derive(Debug, Clone)]
pub struct SoundEffect {
    pub name: String,
    pub volume: f32,
    pub clip: Option<SampleHandle>,
    /// Slot this one was cloned from, if it is a duplicate
    pub cloned_from: Option<EffectKey>,
}

impl SoundEffect {
    pub fn new(name: impl Into<String>, volume: f32, clip: Option<SampleHandle>) -> Self {
        Self {
            name: name.into(),
            volume,
            clip,
            cloned_from: None,
        }
    }
}

/// One entry of an ambient table
#[derive(Debug, Clone)]
pub struct AmbientSlot {
    pub volume: f32,
    pub clip: Option<SampleHandle>,
}

/// All sound resources the host currently holds
#[derive(Debug, Default)]
pub struct SoundGraph {
    effects: SlotMap<EffectKey, SoundEffect>,
    bindings: BTreeMap<ResourceKey, EffectKey>,
    ambients: BTreeMap<ResourceKey, AmbientSlot>,
    controls: BTreeMap<String, f32>,
}

impl SoundGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the graph for sharing with a catalog
    pub fn into_shared(self) -> SharedGraph {
        Rc::new(RefCell::new(self))
    }

    // ========================================================================
    // Effect slots
    // ========================================================================

    pub fn add_effect(&mut self, effect: SoundEffect) -> EffectKey {
        self.effects.insert(effect)
    }

    pub fn effect(&self, key: EffectKey) -> Option<&SoundEffect> {
        self.effects.get(key)
    }

    pub fn effect_mut(&mut self, key: EffectKey) -> Option<&mut SoundEffect> {
        self.effects.get_mut(key)
    }

    /// Destroy an effect slot. Identities bound to it become dangling.
    pub fn remove_effect(&mut self, key: EffectKey) -> Option<SoundEffect> {
        self.effects.remove(key)
    }

    /// Copy an effect slot into a new, independent slot
    pub fn clone_effect(&mut self, source: EffectKey) -> Option<EffectKey> {
        let mut copy = self.effects.get(source)?.clone();
        copy.cloned_from = Some(source);
        Some(self.effects.insert(copy))
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Number of slots that were created by cloning another slot
    pub fn clone_count(&self) -> usize {
        self.effects
            .values()
            .filter(|e| e.cloned_from.is_some())
            .count()
    }

    // ========================================================================
    // Identity bindings (effect-backed categories)
    // ========================================================================

    /// Bind an identity to an effect slot
    ///
    /// Returns `false` without binding when the category is not effect-backed.
    pub fn bind(&mut self, key: ResourceKey, effect: EffectKey) -> bool {
        if key.category.storage() != Storage::Effect {
            debug!("Refusing to bind {}: category is not effect-backed", key);
            return false;
        }
        self.bindings.insert(key, effect);
        true
    }

    pub fn binding(&self, key: &ResourceKey) -> Option<EffectKey> {
        self.bindings.get(key).copied()
    }

    /// The effect an identity currently plays, if both binding and slot exist
    pub fn bound_effect(&self, key: &ResourceKey) -> Option<&SoundEffect> {
        self.binding(key).and_then(|k| self.effects.get(k))
    }

    pub fn bound_effect_mut(&mut self, key: &ResourceKey) -> Option<&mut SoundEffect> {
        let effect = self.binding(key)?;
        self.effects.get_mut(effect)
    }

    /// All identities bound to the given slot
    pub fn aliases(&self, effect: EffectKey) -> Vec<&ResourceKey> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == effect)
            .map(|(key, _)| key)
            .collect()
    }

    // ========================================================================
    // Ambient tables
    // ========================================================================

    /// Returns `false` without inserting when the category is not an ambient table.
    pub fn insert_ambient(&mut self, key: ResourceKey, slot: AmbientSlot) -> bool {
        if key.category.storage() != Storage::Ambient {
            debug!("Refusing to add ambient {}: category is not an ambient table", key);
            return false;
        }
        self.ambients.insert(key, slot);
        true
    }

    pub fn ambient(&self, key: &ResourceKey) -> Option<&AmbientSlot> {
        self.ambients.get(key)
    }

    pub fn ambient_mut(&mut self, key: &ResourceKey) -> Option<&mut AmbientSlot> {
        self.ambients.get_mut(key)
    }

    pub fn remove_ambient(&mut self, key: &ResourceKey) -> Option<AmbientSlot> {
        self.ambients.remove(key)
    }

    // ========================================================================
    // Volume-only controls
    // ========================================================================

    pub fn insert_control(&mut self, id: impl Into<String>, volume: f32) {
        self.controls.insert(id.into(), volume);
    }

    pub fn control(&self, id: &str) -> Option<f32> {
        self.controls.get(id).copied()
    }

    pub fn control_mut(&mut self, id: &str) -> Option<&mut f32> {
        self.controls.get_mut(id)
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Every identity of a category the host currently knows about
    pub fn keys(&self, category: Category) -> Vec<ResourceKey> {
        match category.storage() {
            Storage::Ambient => self
                .ambients
                .keys()
                .filter(|k| k.category == category)
                .cloned()
                .collect(),
            Storage::Effect => self
                .bindings
                .keys()
                .filter(|k| k.category == category)
                .cloned()
                .collect(),
            Storage::Control => self
                .controls
                .keys()
                .map(|id| ResourceKey::new(Category::Misc, id.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;

    fn clip(name: &str) -> SampleHandle {
        SampleHandle::new(AudioClip::silent(name, 48000, 16))
    }

    #[test]
    fn test_shared_slot_aliases() {
        let mut graph = SoundGraph::new();
        let siren = graph.add_effect(SoundEffect::new("Siren", 1.0, Some(clip("siren"))));
        assert!(graph.bind(ResourceKey::new(Category::Vehicle, "Ambulance Siren"), siren));
        assert!(graph.bind(ResourceKey::new(Category::Vehicle, "Police Car Siren"), siren));

        assert_eq!(graph.aliases(siren).len(), 2);
        assert_eq!(graph.keys(Category::Vehicle).len(), 2);
    }

    #[test]
    fn test_bind_rejects_non_effect_category() {
        let mut graph = SoundGraph::new();
        let fx = graph.add_effect(SoundEffect::new("Clicks", 1.0, None));
        assert!(!graph.bind(ResourceKey::new(Category::Misc, "UI Clicks"), fx));
        assert!(graph.keys(Category::Misc).is_empty());
    }

    #[test]
    fn test_clone_effect_is_independent() {
        let mut graph = SoundGraph::new();
        let source = graph.add_effect(SoundEffect::new("Engine", 0.5, Some(clip("engine"))));
        let copy = graph.clone_effect(source).unwrap();

        graph.effect_mut(copy).unwrap().volume = 2.0;

        assert_eq!(graph.effect(source).unwrap().volume, 0.5);
        assert_eq!(graph.effect(copy).unwrap().cloned_from, Some(source));
        assert_eq!(graph.clone_count(), 1);
    }

    #[test]
    fn test_removed_slot_leaves_dangling_binding() {
        let mut graph = SoundGraph::new();
        let key = ResourceKey::new(Category::Animal, "Cow");
        let fx = graph.add_effect(SoundEffect::new("Moo", 1.0, None));
        graph.bind(key.clone(), fx);
        graph.remove_effect(fx);

        assert_eq!(graph.binding(&key), Some(fx));
        assert!(graph.bound_effect(&key).is_none());
    }

    #[test]
    fn test_keys_per_storage() {
        let mut graph = SoundGraph::new();
        graph.insert_ambient(
            ResourceKey::new(Category::Ambient, "World"),
            AmbientSlot {
                volume: 1.0,
                clip: None,
            },
        );
        graph.insert_ambient(
            ResourceKey::new(Category::AmbientNight, "World"),
            AmbientSlot {
                volume: 0.7,
                clip: None,
            },
        );
        graph.insert_control("UI Clicks", 1.0);

        assert_eq!(graph.keys(Category::Ambient).len(), 1);
        assert_eq!(graph.keys(Category::AmbientNight).len(), 1);
        assert_eq!(
            graph.keys(Category::Misc),
            vec![ResourceKey::new(Category::Misc, "UI Clicks")]
        );
    }
}
