//! Error Types
//!
//! This module defines the error type shared by every Sinew crate.
//!
//! # Overview
//!
//! Errors only surface while data is being *loaded or bound*: building
//! curves and clips, assembling a catalog, attaching a skin, or parsing JSON.
//! The per-frame path (pose advance, cross-fade, skin matrices) never fails;
//! invalid indices and missing bones are skipped instead.
//!
//! ```rust,ignore
//! use sinew_core::errors::Result;
//!
//! fn load(json: &str) -> Result<ClipCatalog> {
//!     ClipCatalog::from_json(json)
//! }
//! ```

use thiserror::Error;

/// The main error type for Sinew.
#[derive(Error, Debug)]
pub enum SinewError {
    // ========================================================================
    // Curve Errors
    // ========================================================================
    /// Keyframe times must be ascending.
    #[error("Keyframes of {property} curve are not sorted by time (at index {index})")]
    UnsortedKeyframes {
        /// Property the curve drives
        property: String,
        /// Index of the first keyframe that goes back in time
        index: usize,
    },

    /// A keyframe contains NaN or infinity.
    #[error("Keyframe {index} of {property} curve has non-finite data")]
    NonFiniteKeyframe {
        /// Property the curve drives
        property: String,
        /// Offending keyframe index
        index: usize,
    },

    /// A transform curve set holds two curves for the same property.
    #[error("Bone {bone_index} has more than one {property} curve")]
    DuplicateProperty {
        /// Bone the curve set targets
        bone_index: usize,
        /// Property that appears twice
        property: String,
    },

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// Clip length must be finite and non-negative.
    #[error("Clip '{clip}' has invalid length {length}")]
    InvalidClipLength {
        /// Clip name
        clip: String,
        /// Offending length
        length: f32,
    },

    /// A recorded frame rate must be finite and positive.
    #[error("Clip '{clip}' has invalid frame rate {frame_rate}")]
    InvalidFrameRate {
        /// Clip name
        clip: String,
        /// Offending frame rate
        frame_rate: f32,
    },

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// Every skinned bone needs exactly one bind pose.
    #[error("Skin has {bones} bones but {bind_poses} bind poses")]
    SkinLengthMismatch {
        /// Number of bone handles
        bones: usize,
        /// Number of bind pose matrices
        bind_poses: usize,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, SinewError>`.
pub type Result<T> = std::result::Result<T, SinewError>;
