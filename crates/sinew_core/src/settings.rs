//! Animation Runtime Settings
//!
//! ```rust,ignore
//! use sinew_core::AnimationSettings;
//!
//! let settings = AnimationSettings {
//!     default_cross_fade_duration: 0.4,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Fallback cross-fade duration in seconds.
pub const DEFAULT_CROSS_FADE_DURATION: f32 = 0.25;

/// Tunables for skeleton instances and the frame driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Used by cross-fade requests that omit a duration or pass a negative one.
    pub default_cross_fade_duration: f32,
    /// Run the per-instance frame step on the rayon pool.
    /// Has no effect when the `parallel` feature is disabled.
    pub parallel: bool,
    /// Below this many instances the frame step stays on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            default_cross_fade_duration: DEFAULT_CROSS_FADE_DURATION,
            parallel: true,
            parallel_threshold: 4,
        }
    }
}

impl AnimationSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves a requested cross-fade duration against the configured fallback.
    #[must_use]
    pub fn resolve_cross_fade_duration(&self, requested: Option<f32>) -> f32 {
        match requested {
            Some(d) if d >= 0.0 && d.is_finite() => d,
            _ => self.default_cross_fade_duration.max(0.0),
        }
    }
}
