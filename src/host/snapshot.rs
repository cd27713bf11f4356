//! JSON description of a host resource graph
//!
//! Used by the CLI and tests to stand up a graph without a running game.
//! Clip paths are relative to the snapshot file; entries without a clip get
//! a short placeholder tone.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::{decode_wav, generate_test_tone, SampleHandle};
use crate::catalog::{Category, ResourceKey, Storage};
use crate::error::{Result, TunerError};
use crate::host::graph::{AmbientSlot, SoundEffect, SoundGraph};

const PLACEHOLDER_FREQ_HZ: f32 = 440.0;
const PLACEHOLDER_SECS: f32 = 0.1;
const PLACEHOLDER_RATE: u32 = 48000;

/// An effect slot and the identities that play it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub name: String,
    pub volume: f32,
    #[serde(default)]
    pub clip: Option<PathBuf>,
    #[serde(default)]
    pub bindings: Vec<ResourceKey>,
}

/// One ambient table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientSnapshot {
    pub category: Category,
    pub id: String,
    pub volume: f32,
    #[serde(default)]
    pub clip: Option<PathBuf>,
}

/// Complete host description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub effects: Vec<EffectSnapshot>,
    #[serde(default)]
    pub ambients: Vec<AmbientSnapshot>,
    /// Volume-only controls, keyed by id
    #[serde(default)]
    pub controls: BTreeMap<String, f32>,
}

impl HostSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TunerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Build the graph, decoding clips relative to `base_dir`
    pub fn into_graph(self, base_dir: &Path) -> Result<SoundGraph> {
        let mut graph = SoundGraph::new();

        for effect in self.effects {
            let clip = load_clip(base_dir, &effect.name, effect.clip.as_deref())?;
            let slot = graph.add_effect(SoundEffect::new(effect.name, effect.volume, Some(clip)));
            for key in effect.bindings {
                if key.category.storage() != Storage::Effect {
                    return Err(TunerError::InvalidConfig {
                        reason: format!("{} cannot be bound to an effect slot", key),
                    });
                }
                graph.bind(key, slot);
            }
        }

        for ambient in self.ambients {
            let key = ResourceKey::new(ambient.category, ambient.id);
            if key.category.storage() != Storage::Ambient {
                return Err(TunerError::InvalidConfig {
                    reason: format!("{} is not an ambient category", key),
                });
            }
            let clip = load_clip(base_dir, &key.id, ambient.clip.as_deref())?;
            graph.insert_ambient(
                key,
                AmbientSlot {
                    volume: ambient.volume,
                    clip: Some(clip),
                },
            );
        }

        for (id, volume) in self.controls {
            graph.insert_control(id, volume);
        }

        Ok(graph)
    }
}

fn load_clip(base_dir: &Path, name: &str, clip: Option<&Path>) -> Result<SampleHandle> {
    let clip = match clip {
        Some(path) => decode_wav(&base_dir.join(path))?,
        None => generate_test_tone(name, PLACEHOLDER_FREQ_HZ, PLACEHOLDER_SECS, PLACEHOLDER_RATE),
    };
    Ok(SampleHandle::new(clip))
}
