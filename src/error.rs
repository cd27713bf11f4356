//! Error handling for Ambient Tuner
//!
//! Per-resource failures (`Backup`, `Patch`, `Resolution`, `Duplication`) are
//! values that callers log and move past. Only `CatalogUnavailable` ends a run.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{AccessError, Category, ResourceKey};
use crate::patch::Aspect;

/// Result type alias for Ambient Tuner operations
pub type Result<T> = std::result::Result<T, TunerError>;

/// Why a sound pack lookup could not produce sample data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionReason {
    /// No pack with this name was registered
    UnknownPack,
    /// The pack exists but has no entry for the sound
    MissingEntry,
    /// The entry exists but its audio file could not be decoded
    Undecodable(String),
}

impl std::fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionReason::UnknownPack => write!(f, "sound pack is not installed"),
            ResolutionReason::MissingEntry => write!(f, "sound pack has no entry for this sound"),
            ResolutionReason::Undecodable(reason) => write!(f, "audio could not be decoded: {}", reason),
        }
    }
}

/// Main error type for Ambient Tuner operations
#[derive(Error, Debug)]
pub enum TunerError {
    // Patch engine errors
    #[error("Failed to back up {aspect} of {key}: {source}")]
    Backup {
        key: ResourceKey,
        aspect: Aspect,
        #[source]
        source: AccessError,
    },

    #[error("Failed to patch {aspect} of {key}: {source}")]
    Patch {
        key: ResourceKey,
        aspect: Aspect,
        #[source]
        source: AccessError,
    },

    // Sound pack errors
    #[error("Cannot resolve {category}.{sound_id} in sound pack '{pack}': {reason}")]
    Resolution {
        category: Category,
        sound_id: String,
        pack: String,
        reason: ResolutionReason,
    },

    // Duplication errors
    #[error("Cannot duplicate {category}.{source_id} into '{new_id}': source sound not found")]
    Duplication {
        category: Category,
        source_id: String,
        new_id: String,
    },

    // Catalog errors
    #[error("Resource catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    // File errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TunerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TunerError::Backup { .. } => "BACKUP_FAILURE",
            TunerError::Patch { .. } => "PATCH_FAILURE",
            TunerError::Resolution { .. } => "RESOLUTION_FAILURE",
            TunerError::Duplication { .. } => "DUPLICATION_FAILURE",
            TunerError::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            TunerError::FileNotFound { .. } => "FILE_NOT_FOUND",
            TunerError::InvalidAudio { .. } => "INVALID_AUDIO",
            TunerError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            TunerError::InvalidConfig { .. } => "INVALID_CONFIG",
            TunerError::Io(_) => "IO_ERROR",
            TunerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error only concerns a single resource and a batch may continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TunerError::Backup { .. }
                | TunerError::Patch { .. }
                | TunerError::Resolution { .. }
                | TunerError::Duplication { .. }
        )
    }

    /// Whether this error comes from a volume-only resource asked for sample data
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            TunerError::Backup {
                source: AccessError::Unsupported { .. },
                ..
            } | TunerError::Patch {
                source: AccessError::Unsupported { .. },
                ..
            }
        )
    }

    /// Returns a user-facing recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            TunerError::Backup { .. } => {
                Some("The sound could not be read; it will be left untouched this session.")
            }
            TunerError::Patch { .. } => {
                Some("The sound may have been unloaded by the game; try reloading.")
            }
            TunerError::Resolution { .. } => {
                Some("Check that the sound pack is installed, or pick 'Default'.")
            }
            TunerError::Duplication { .. } => {
                Some("This game version does not ship the sound; the override is ignored.")
            }
            TunerError::FileNotFound { .. } => Some("Check the file path and try again."),
            TunerError::UnsupportedFormat { .. } => Some("Convert the sound to mono or stereo WAV."),
            TunerError::InvalidConfig { .. } => Some("Fix the settings file or delete it to start over."),
            _ => None,
        }
    }
}
