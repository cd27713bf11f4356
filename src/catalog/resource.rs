//! Capability contract shared by every patchable resource

use thiserror::Error;

use crate::audio::SampleHandle;
use crate::catalog::category::{Category, ResourceKey};

/// Result of a single accessor call
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Why an accessor could not read or write a resource
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The host destroyed the resource after it was enumerated
    #[error("{key} no longer exists in the host")]
    Gone { key: ResourceKey },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: ResourceKey, reason: String },

    /// The category is volume-only
    #[error("{category} sounds carry no sample data")]
    Unsupported { category: Category },
}

/// Uniform read/write access to a live audio resource
///
/// Implemented once per storage kind. Accessors report every failure as an
/// `AccessError` value; nothing panics across this boundary.
pub trait SoundResource {
    /// Identity of the resource
    fn key(&self) -> &ResourceKey;

    /// Current playback volume
    fn volume(&self) -> AccessResult<f32>;

    /// Replace the playback volume
    fn set_volume(&mut self, volume: f32) -> AccessResult<()>;

    /// Handle to the sample data currently played
    fn sample(&self) -> AccessResult<SampleHandle>;

    /// Point the resource at different sample data
    fn set_sample(&mut self, sample: SampleHandle) -> AccessResult<()>;
}

/// Volumes must be finite and non-negative so they round-trip exactly
pub fn validate_volume(key: &ResourceKey, volume: f32) -> AccessResult<f32> {
    if volume.is_finite() && volume >= 0.0 {
        Ok(volume)
    } else {
        Err(AccessError::Invalid {
            key: key.clone(),
            reason: format!("volume {} is out of range", volume),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_volume() {
        let key = ResourceKey::new(Category::Vehicle, "Train Movement");
        assert_eq!(validate_volume(&key, 0.0), Ok(0.0));
        assert_eq!(validate_volume(&key, 3.0), Ok(3.0));
        assert!(validate_volume(&key, -0.5).is_err());
        assert!(validate_volume(&key, f32::NAN).is_err());
        assert!(validate_volume(&key, f32::INFINITY).is_err());
    }

    #[test]
    fn test_access_error_messages() {
        let key = ResourceKey::new(Category::Animal, "Seagull");
        let gone = AccessError::Gone { key };
        assert_eq!(gone.to_string(), "Animal.Seagull no longer exists in the host");

        let unsupported = AccessError::Unsupported {
            category: Category::Misc,
        };
        assert_eq!(unsupported.to_string(), "Misc sounds carry no sample data");
    }
}
