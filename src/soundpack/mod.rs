//! Sound Pack Index
//!
//! Resolves `(category, sound id, pack name)` to decoded sample data. Packs
//! are declared in `SoundPacks.json` manifests; audio is decoded on first
//! lookup and cached.

pub mod descriptor;
pub mod index;

pub use descriptor::{discover_manifests, PackDescriptor, PackSound, SampleSource, MANIFEST_FILENAME};
pub use index::{SoundPackEntry, SoundPackIndex, DEFAULT_PACK};
