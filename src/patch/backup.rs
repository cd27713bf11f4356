//! Backup records and per-aspect state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::SampleHandle;
use crate::catalog::ResourceKey;

/// Independently patchable property of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Volume,
    Sample,
}

impl Aspect {
    pub const ALL: [Aspect; 2] = [Aspect::Volume, Aspect::Sample];
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Volume => write!(f, "volume"),
            Aspect::Sample => write!(f, "sample"),
        }
    }
}

/// Where a `(resource, aspect)` pair stands
///
/// `Unbacked -> Backed -> Patched`, and back to `Backed` only via revert.
/// A touched resource never returns to `Unbacked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectState {
    Unbacked,
    Backed,
    Patched,
}

impl fmt::Display for AspectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectState::Unbacked => write!(f, "Unbacked"),
            AspectState::Backed => write!(f, "Backed"),
            AspectState::Patched => write!(f, "Patched"),
        }
    }
}

/// First-observed values of a resource
///
/// A `None` field means that aspect was never successfully backed up.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub key: ResourceKey,
    pub original_volume: Option<f32>,
    pub original_sample: Option<SampleHandle>,
}

impl BackupRecord {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            original_volume: None,
            original_sample: None,
        }
    }

    pub fn has(&self, aspect: Aspect) -> bool {
        match aspect {
            Aspect::Volume => self.original_volume.is_some(),
            Aspect::Sample => self.original_sample.is_some(),
        }
    }
}
