//! Sinew Animation
//!
//! Baked keyframe curves and the per-skeleton playback engine:
//!
//! - [`curve`] / [`evaluate`]: keyframes, property curves and the Hermite
//!   evaluator.
//! - [`clip`]: per-bone curve sets, clips and the shared [`ClipCatalog`].
//! - [`player`]: the root clock and pose writer ([`AnimationPlayer`]).
//! - [`cross_fade`]: the blend controller that masks clip switches.
//!
//! The engine writes local transforms through the [`BoneTransforms`] trait,
//! so any dense bone storage can be driven.

pub mod bones;
pub mod clip;
pub mod cross_fade;
pub mod curve;
pub mod evaluate;
pub mod player;
pub mod pose;

pub use bones::BoneTransforms;
pub use clip::{Clip, ClipCatalog, TransformCurveSet};
pub use cross_fade::{CrossFade, FadeTick};
pub use curve::{Channel, Keyframe, PropertyCurve, PropertyKind};
pub use evaluate::evaluate;
pub use player::{AnimationPlayer, AnimationState, PlaybackState};
pub use pose::{BonePose, SampledPose, sample_curve_set};
