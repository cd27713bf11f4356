//! Decoded audio clips
//!
//! An `AudioClip` is immutable once decoded. Resources never own clips
//! directly, they hold a `SampleHandle`, so backing up a sample is a cheap
//! handle clone and reverting restores the very same clip.

use std::fmt;
use std::sync::Arc;

/// Decoded audio in 32-bit float, one `Vec` per channel
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Name the clip is known by (file stem or host asset name)
    pub name: String,
    /// Native sample rate in Hz; clips are never resampled
    pub sample_rate: u32,
    /// Sample data, indexed as `channels[channel][frame]`
    pub channels: Vec<Vec<f32>>,
}

impl AudioClip {
    /// Create a clip from de-interleaved channel data
    pub fn new(name: impl Into<String>, sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            sample_rate,
            channels,
        }
    }

    /// Create a silent mono clip with the given number of frames
    pub fn silent(name: impl Into<String>, sample_rate: u32, frames: usize) -> Self {
        Self::new(name, sample_rate, vec![vec![0.0; frames]])
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds at the clip's native rate
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }
}

/// Shared reference to decoded audio
///
/// Equality is handle identity: two handles are equal only when they point
/// at the same decoded clip, not when the samples happen to match.
#[derive(Clone)]
pub struct SampleHandle(Arc<AudioClip>);

impl SampleHandle {
    pub fn new(clip: AudioClip) -> Self {
        Self(Arc::new(clip))
    }

    pub fn clip(&self) -> &AudioClip {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Whether both handles refer to the same decoded clip
    pub fn same_clip(&self, other: &SampleHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<AudioClip> for SampleHandle {
    fn from(clip: AudioClip) -> Self {
        Self::new(clip)
    }
}

impl PartialEq for SampleHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_clip(other)
    }
}

impl Eq for SampleHandle {}

impl fmt::Debug for SampleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleHandle")
            .field("name", &self.0.name)
            .field("frames", &self.0.num_frames())
            .field("channels", &self.0.num_channels())
            .finish()
    }
}
