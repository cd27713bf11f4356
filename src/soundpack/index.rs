//! Sound pack lookup

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::{debug, info, warn};

use crate::audio::{decode_wav, SampleHandle};
use crate::catalog::Category;
use crate::error::{ResolutionReason, Result, TunerError};
use crate::soundpack::descriptor::{discover_manifests, PackDescriptor, SampleSource};

/// Pack name meaning "keep the game's own sample"
pub const DEFAULT_PACK: &str = "Default";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    category: Category,
    sound_id: String,
    pack: String,
}

/// One registered sound of one pack
#[derive(Debug, Clone)]
pub struct SoundPackEntry {
    pub category: Category,
    pub sound_id: String,
    pub pack_name: String,
    source: SampleSource,
}

impl SoundPackEntry {
    /// Whether the audio has been decoded yet
    pub fn is_decoded(&self) -> bool {
        matches!(self.source, SampleSource::Decoded(_))
    }
}

/// Index of every registered sound pack entry
///
/// Registering the same `(category, sound id, pack)` twice keeps the last
/// registration.
#[derive(Debug, Default)]
pub struct SoundPackIndex {
    entries: HashMap<EntryKey, SoundPackEntry>,
    packs: BTreeSet<String>,
}

impl SoundPackIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a pack. Returns the number of entries it contributed.
    pub fn register(&mut self, descriptor: PackDescriptor) -> usize {
        let PackDescriptor { name, sounds } = descriptor;
        let count = sounds.len();

        for sound in sounds {
            let key = EntryKey {
                category: sound.category,
                sound_id: sound.sound_id.clone(),
                pack: name.clone(),
            };
            let entry = SoundPackEntry {
                category: sound.category,
                sound_id: sound.sound_id,
                pack_name: name.clone(),
                source: sound.source,
            };
            if let Some(previous) = self.entries.insert(key, entry) {
                debug!(
                    "Sound pack '{}' registered {}.{} again, the latest registration wins",
                    name, previous.category, previous.sound_id
                );
            }
        }

        debug!("Sound pack '{}' registered with {} sounds", name, count);
        self.packs.insert(name);
        count
    }

    /// Register every pack declared in one manifest file
    pub fn load_manifest(&mut self, path: &Path) -> Result<usize> {
        let packs = PackDescriptor::load_manifest(path)?;
        Ok(packs.into_iter().map(|p| self.register(p)).sum())
    }

    /// Register every manifest found below `root`
    ///
    /// A broken manifest is logged and skipped. Returns the number of
    /// manifests loaded.
    pub fn discover(&mut self, root: &Path) -> usize {
        let mut loaded = 0;
        for manifest in discover_manifests(root) {
            match self.load_manifest(&manifest) {
                Ok(count) => {
                    debug!("Loaded {} sounds from {}", count, manifest.display());
                    loaded += 1;
                }
                Err(e) => warn!("Could not load sound pack manifest {}: {}", manifest.display(), e),
            }
        }
        info!("Sound packs initialized: {} packs from {} manifests", self.packs.len(), loaded);
        loaded
    }

    /// Resolve a sound to decoded audio
    ///
    /// # Errors
    /// `Resolution` with reason `UnknownPack`, `MissingEntry` or `Undecodable`.
    pub fn lookup(&mut self, category: Category, sound_id: &str, pack: &str) -> Result<SampleHandle> {
        let unresolved = |reason| TunerError::Resolution {
            category,
            sound_id: sound_id.to_string(),
            pack: pack.to_string(),
            reason,
        };

        let key = EntryKey {
            category,
            sound_id: sound_id.to_string(),
            pack: pack.to_string(),
        };
        let Some(entry) = self.entries.get_mut(&key) else {
            let reason = if self.has_pack(pack) {
                ResolutionReason::MissingEntry
            } else {
                ResolutionReason::UnknownPack
            };
            return Err(unresolved(reason));
        };

        let path = match &entry.source {
            SampleSource::Decoded(sample) => return Ok(sample.clone()),
            SampleSource::File(path) => path.clone(),
        };

        let clip = decode_wav(&path)
            .map_err(|e| unresolved(ResolutionReason::Undecodable(e.to_string())))?;
        let sample = SampleHandle::new(clip);
        debug!("Decoded {}.{} from pack '{}'", category, sound_id, pack);
        entry.source = SampleSource::Decoded(sample.clone());
        Ok(sample)
    }

    pub fn has_pack(&self, pack: &str) -> bool {
        self.packs.contains(pack)
    }

    /// Registered pack names, sorted
    pub fn pack_names(&self) -> impl Iterator<Item = &str> {
        self.packs.iter().map(String::as_str)
    }

    /// Packs offering a replacement for the given sound, sorted
    pub fn packs_for(&self, category: Category, sound_id: &str) -> Vec<&str> {
        let mut packs: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.category == category && e.sound_id == sound_id)
            .map(|e| e.pack_name.as_str())
            .collect();
        packs.sort_unstable();
        packs
    }

    pub fn entry(&self, category: Category, sound_id: &str, pack: &str) -> Option<&SoundPackEntry> {
        self.entries.get(&EntryKey {
            category,
            sound_id: sound_id.to_string(),
            pack: pack.to_string(),
        })
    }

    /// Number of registered entries across all packs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;
    use crate::soundpack::descriptor::MANIFEST_FILENAME;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::fs;
    use tempfile::TempDir;

    fn handle(name: &str) -> SampleHandle {
        SampleHandle::new(AudioClip::silent(name, 48000, 4))
    }

    fn write_wav(path: &Path) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..64 {
            writer.write_sample((i * 100) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_lookup_reasons_are_distinguishable() {
        let mut index = SoundPackIndex::new();
        index.register(
            PackDescriptor::new("Retro").with_sample(Category::Vehicle, "Police Car Siren", handle("retro")),
        );

        match index.lookup(Category::Vehicle, "Small Car Movement", "Retro") {
            Err(TunerError::Resolution { reason, .. }) => assert_eq!(reason, ResolutionReason::MissingEntry),
            other => panic!("unexpected result: {:?}", other.map(|s| s.name().to_string())),
        }
        match index.lookup(Category::Vehicle, "Police Car Siren", "Modern") {
            Err(TunerError::Resolution { reason, .. }) => assert_eq!(reason, ResolutionReason::UnknownPack),
            other => panic!("unexpected result: {:?}", other.map(|s| s.name().to_string())),
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let first = handle("first");
        let second = handle("second");
        let mut index = SoundPackIndex::new();
        index.register(PackDescriptor::new("Retro").with_sample(Category::Animal, "Cow", first));
        index.register(PackDescriptor::new("Retro").with_sample(Category::Animal, "Cow", second.clone()));

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(Category::Animal, "Cow", "Retro").unwrap(), second);
    }

    #[test]
    fn test_file_entries_decode_once() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("siren.wav");
        write_wav(&wav);

        let mut index = SoundPackIndex::new();
        index.register(PackDescriptor::new("Retro").with_file(Category::Vehicle, "Police Car Siren", &wav));
        assert!(!index.entry(Category::Vehicle, "Police Car Siren", "Retro").unwrap().is_decoded());

        let first = index.lookup(Category::Vehicle, "Police Car Siren", "Retro").unwrap();
        let again = index.lookup(Category::Vehicle, "Police Car Siren", "Retro").unwrap();

        assert!(first.same_clip(&again));
        assert_eq!(first.clip().sample_rate, 44100);
        assert!(index.entry(Category::Vehicle, "Police Car Siren", "Retro").unwrap().is_decoded());
    }

    #[test]
    fn test_undecodable_file_is_a_resolution_failure() {
        let dir = TempDir::new().unwrap();
        let mut index = SoundPackIndex::new();
        index.register(PackDescriptor::new("Broken").with_file(
            Category::Ambient,
            "World",
            dir.path().join("missing.wav"),
        ));

        let err = index.lookup(Category::Ambient, "World", "Broken").unwrap_err();
        assert_eq!(err.error_code(), "RESOLUTION_FAILURE");
        assert!(matches!(
            err,
            TunerError::Resolution {
                reason: ResolutionReason::Undecodable(_),
                ..
            }
        ));
    }

    #[test]
    fn test_discover_and_packs_for() {
        let dir = TempDir::new().unwrap();
        for pack in ["retro", "modern"] {
            let pack_dir = dir.path().join(pack);
            fs::create_dir_all(&pack_dir).unwrap();
            write_wav(&pack_dir.join("car.wav"));
        }
        fs::write(
            dir.path().join("retro").join(MANIFEST_FILENAME),
            r#"{ "Retro": { "Vehicle": { "Small Car Movement": "car.wav" } } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("modern").join(MANIFEST_FILENAME),
            r#"{ "Modern": { "Vehicle": { "Small Car Movement": "car.wav" } } }"#,
        )
        .unwrap();

        let mut index = SoundPackIndex::new();
        assert_eq!(index.discover(dir.path()), 2);
        assert_eq!(index.pack_names().collect::<Vec<_>>(), vec!["Modern", "Retro"]);
        assert_eq!(
            index.packs_for(Category::Vehicle, "Small Car Movement"),
            vec!["Modern", "Retro"]
        );
        assert!(index.lookup(Category::Vehicle, "Small Car Movement", "Retro").is_ok());
    }

    #[test]
    fn test_discover_skips_broken_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "{ not json").unwrap();

        let mut index = SoundPackIndex::new();
        assert_eq!(index.discover(dir.path()), 0);
        assert!(index.is_empty());
    }
}
