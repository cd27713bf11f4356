//! Settings file
//!
//! ```json
//! {
//!   "version": 4,
//!   "extra_debug_logging": false,
//!   "sounds": {
//!     "Vehicle": {
//!       "Small Car Movement": { "sound_pack": "Default", "volume": 1.5 }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ResourceKey};
use crate::error::{Result, TunerError};
use crate::soundpack::DEFAULT_PACK;

/// Settings layout version written by this build
pub const CURRENT_CONFIG_VERSION: u32 = 4;

/// Override for one sound as stored in the settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundOverride {
    #[serde(default, alias = "SoundPack", skip_serializing_if = "Option::is_none")]
    pub sound_pack: Option<String>,
    #[serde(alias = "Volume")]
    pub volume: f32,
}

impl SoundOverride {
    pub fn volume(volume: f32) -> Self {
        Self {
            sound_pack: None,
            volume,
        }
    }

    pub fn with_pack(pack: impl Into<String>, volume: f32) -> Self {
        Self {
            sound_pack: Some(pack.into()),
            volume,
        }
    }
}

/// Resolved override request for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSpec {
    pub key: ResourceKey,
    pub target_sound_pack: Option<String>,
    pub target_volume: Option<f32>,
}

impl OverrideSpec {
    /// The pack to take sample data from, or `None` when the sample stays as is
    ///
    /// An empty name and `Default` both mean "volume only".
    pub fn replacement_pack(&self) -> Option<&str> {
        self.target_sound_pack
            .as_deref()
            .filter(|pack| !pack.is_empty() && *pack != DEFAULT_PACK)
    }
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub extra_debug_logging: bool,
    #[serde(default)]
    pub sounds: BTreeMap<Category, BTreeMap<String, SoundOverride>>,
}

fn default_version() -> u32 {
    CURRENT_CONFIG_VERSION
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            extra_debug_logging: false,
            sounds: BTreeMap::new(),
        }
    }
}

impl TunerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TunerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
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

    /// Load the settings, or start from defaults when the file does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings that could never be applied
    pub fn validate(&self) -> Result<()> {
        if self.version > CURRENT_CONFIG_VERSION {
            return Err(TunerError::InvalidConfig {
                reason: format!(
                    "settings version {} is newer than supported version {}",
                    self.version, CURRENT_CONFIG_VERSION
                ),
            });
        }
        for (category, sounds) in &self.sounds {
            for (id, sound) in sounds {
                if !sound.volume.is_finite() || sound.volume < 0.0 {
                    return Err(TunerError::InvalidConfig {
                        reason: format!("{}.{} has invalid volume {}", category, id, sound.volume),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up the override for a resource
    pub fn resolve(&self, key: &ResourceKey) -> Option<OverrideSpec> {
        let sound = self.sounds.get(&key.category)?.get(&key.id)?;
        Some(OverrideSpec {
            key: key.clone(),
            target_sound_pack: sound.sound_pack.clone(),
            target_volume: Some(sound.volume),
        })
    }

    pub fn set_override(&mut self, key: &ResourceKey, sound: SoundOverride) -> Option<SoundOverride> {
        self.sounds
            .entry(key.category)
            .or_default()
            .insert(key.id.clone(), sound)
    }

    pub fn remove_override(&mut self, key: &ResourceKey) -> Option<SoundOverride> {
        self.sounds.get_mut(&key.category)?.remove(&key.id)
    }

    /// Total number of configured overrides
    pub fn override_count(&self) -> usize {
        self.sounds.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_override() {
        let config = TunerConfig::from_json_str(
            r#"{
                "sounds": {
                    "Vehicle": {
                        "Small Car Movement": { "sound_pack": "Default", "volume": 1.5 }
                    }
                }
            }"#,
        )
        .unwrap();

        let key = ResourceKey::new(Category::Vehicle, "Small Car Movement");
        let spec = config.resolve(&key).unwrap();
        assert_eq!(spec.target_volume, Some(1.5));
        assert_eq!(spec.replacement_pack(), None);
        assert!(config
            .resolve(&ResourceKey::new(Category::Vehicle, "Train Movement"))
            .is_none());
        assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    }

    #[test]
    fn test_replacement_pack_rules() {
        let key = ResourceKey::new(Category::Ambient, "World");
        let spec = |pack: Option<&str>| OverrideSpec {
            key: key.clone(),
            target_sound_pack: pack.map(String::from),
            target_volume: None,
        };

        assert_eq!(spec(None).replacement_pack(), None);
        assert_eq!(spec(Some("")).replacement_pack(), None);
        assert_eq!(spec(Some("Default")).replacement_pack(), None);
        assert_eq!(spec(Some("Retro")).replacement_pack(), Some("Retro"));
    }

    #[test]
    fn test_accepts_legacy_field_names() {
        let config = TunerConfig::from_json_str(
            r#"{ "sounds": { "Misc": { "UI Clicks": { "Volume": 0.4 } } } }"#,
        )
        .unwrap();
        let spec = config
            .resolve(&ResourceKey::new(Category::Misc, "UI Clicks"))
            .unwrap();
        assert_eq!(spec.target_volume, Some(0.4));
        assert_eq!(spec.target_sound_pack, None);
    }

    #[test]
    fn test_rejects_negative_volume() {
        let err = TunerConfig::from_json_str(
            r#"{ "sounds": { "Animal": { "Cow": { "volume": -1.0 } } } }"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_rejects_future_version() {
        let err = TunerConfig::from_json_str(r#"{ "version": 99 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings").join("AmbientSoundsTuner.json");

        let mut config = TunerConfig::new();
        config.set_override(
            &ResourceKey::new(Category::Vehicle, "Police Car Siren"),
            SoundOverride::with_pack("Retro", 0.8),
        );
        config.save(&path).unwrap();

        let loaded = TunerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.override_count(), 1);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = TunerConfig::load_or_default(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, TunerConfig::default());
    }

    #[test]
    fn test_remove_override() {
        let key = ResourceKey::new(Category::Building, "Oil Power Plant");
        let mut config = TunerConfig::new();
        config.set_override(&key, SoundOverride::volume(0.1));

        assert_eq!(config.remove_override(&key), Some(SoundOverride::volume(0.1)));
        assert!(config.resolve(&key).is_none());
    }
}
