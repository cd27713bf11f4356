//! Sound pack declarations and manifest files
//!
//! A manifest maps `pack name -> category -> sound id -> file`, with file
//! paths relative to the manifest:
//!
//! ```json
//! { "Retro": { "Vehicle": { "Police Car Siren": "sirens/retro.wav" } } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::audio::SampleHandle;
use crate::catalog::Category;
use crate::error::{Result, TunerError};

/// File name the pack discovery looks for
pub const MANIFEST_FILENAME: &str = "SoundPacks.json";

type ManifestFile = BTreeMap<String, BTreeMap<Category, BTreeMap<String, PathBuf>>>;

/// Where a pack entry's audio comes from
#[derive(Debug, Clone)]
pub enum SampleSource {
    /// Decoded on first lookup
    File(PathBuf),
    Decoded(SampleHandle),
}

/// One sound offered by a pack
#[derive(Debug, Clone)]
pub struct PackSound {
    pub category: Category,
    pub sound_id: String,
    pub source: SampleSource,
}

/// A declared sound pack
#[derive(Debug, Clone)]
pub struct PackDescriptor {
    pub name: String,
    pub sounds: Vec<PackSound>,
}

impl PackDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sounds: Vec::new(),
        }
    }

    /// Add a sound backed by an audio file
    pub fn with_file(mut self, category: Category, sound_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.sounds.push(PackSound {
            category,
            sound_id: sound_id.into(),
            source: SampleSource::File(path.into()),
        });
        self
    }

    /// Add a sound that is already decoded
    pub fn with_sample(mut self, category: Category, sound_id: impl Into<String>, sample: SampleHandle) -> Self {
        self.sounds.push(PackSound {
            category,
            sound_id: sound_id.into(),
            source: SampleSource::Decoded(sample),
        });
        self
    }

    /// Parse a manifest, resolving file paths against `base_dir`
    pub fn parse_manifest(json: &str, base_dir: &Path) -> Result<Vec<PackDescriptor>> {
        let manifest: ManifestFile = serde_json::from_str(json)?;

        let packs = manifest
            .into_iter()
            .map(|(name, categories)| {
                let sounds = categories
                    .into_iter()
                    .flat_map(|(category, sounds)| {
                        sounds.into_iter().map(move |(sound_id, file)| PackSound {
                            category,
                            sound_id,
                            source: SampleSource::File(base_dir.join(file)),
                        })
                    })
                    .collect();
                PackDescriptor { name, sounds }
            })
            .collect();

        Ok(packs)
    }

    /// Load a manifest file; paths inside are relative to its directory
    pub fn load_manifest(path: &Path) -> Result<Vec<PackDescriptor>> {
        if !path.exists() {
            return Err(TunerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse_manifest(&content, base_dir)
    }
}

/// Find every manifest below `root`, in a stable order
pub fn discover_manifests(root: &Path) -> Vec<PathBuf> {
    let mut manifests: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable path while looking for sound packs: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME)
        .map(|entry| entry.into_path())
        .collect();
    manifests.sort();
    manifests
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_manifest_resolves_relative_paths() {
        let json = r#"{
            "Retro": {
                "Vehicle": { "Small Car Movement": "cars/small.wav" },
                "Ambient": { "World": "world.wav" }
            }
        }"#;
        let packs = PackDescriptor::parse_manifest(json, Path::new("/packs/retro")).unwrap();

        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "Retro");
        assert_eq!(packs[0].sounds.len(), 2);
        let car = packs[0]
            .sounds
            .iter()
            .find(|s| s.sound_id == "Small Car Movement")
            .unwrap();
        assert_eq!(car.category, Category::Vehicle);
        match &car.source {
            SampleSource::File(path) => assert_eq!(path, Path::new("/packs/retro/cars/small.wav")),
            SampleSource::Decoded(_) => panic!("manifest entries are file-backed"),
        }
    }

    #[test]
    fn test_parse_manifest_rejects_unknown_category() {
        let json = r#"{ "Retro": { "Weather": { "Rain": "rain.wav" } } }"#;
        assert!(PackDescriptor::parse_manifest(json, Path::new(".")).is_err());
    }

    #[test]
    fn test_discover_manifests_walks_subdirectories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("mods").join("retro");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(MANIFEST_FILENAME), "{}").unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "{}").unwrap();
        fs::write(dir.path().join("readme.txt"), "not a manifest").unwrap();

        let found = discover_manifests(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.file_name().unwrap() == MANIFEST_FILENAME));
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = PackDescriptor::load_manifest(Path::new("/nonexistent/SoundPacks.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
