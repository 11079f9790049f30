//! Sinew Core
//!
//! Foundational types shared by the animation and scene crates:
//! the [`SinewError`] type, the bone [`Transform`] record and
//! [`AnimationSettings`].

pub mod errors;
pub mod settings;
pub mod transform;

pub use errors::{Result, SinewError};
pub use settings::{AnimationSettings, DEFAULT_CROSS_FADE_DURATION};
pub use transform::Transform;
