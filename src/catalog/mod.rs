//! Resource Catalog
//!
//! Enumerates every patchable resource in the host, grouped by category,
//! behind the uniform `SoundResource` capability.

pub mod adapters;
pub mod category;
pub mod registry;
pub mod resource;

pub use adapters::{resource_for, AmbientResource, ControlResource, EffectResource};
pub use category::{Category, ResourceKey, Storage};
pub use registry::ResourceCatalog;
pub use resource::{validate_volume, AccessError, AccessResult, SoundResource};
