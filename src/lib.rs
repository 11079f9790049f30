//! Sinew
//!
//! Skeletal animation runtime for rigged characters. Baked Hermite curves are
//! sampled every frame to pose a bone hierarchy, clip switches can be masked
//! with a cross-fade, and per-bone skin matrices are produced for GPU
//! deformation.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sinew::prelude::*;
//!
//! let catalog = Arc::new(ClipCatalog::from_json(&std::fs::read_to_string("clips.json")?)?);
//! let mut world = AnimationWorld::new(AnimationSettings::default());
//! let key = world.insert(SkeletonInstance::new("hero", hierarchy, bones, catalog, settings));
//!
//! world.get_mut(key).unwrap().cross_fade_to_by_name("run", Some(0.3));
//! world.update(dt);
//! ```

pub use sinew_animation as animation;
pub use sinew_scene as scene;
pub use sinew_core;

pub use glam;

pub use sinew_animation::{
    AnimationPlayer, AnimationState, BonePose, BoneTransforms, Clip, ClipCatalog, CrossFade,
    Keyframe, PlaybackState, PropertyCurve, PropertyKind, TransformCurveSet,
};
pub use sinew_core::{AnimationSettings, Result, SinewError, Transform};
pub use sinew_scene::{AnimationWorld, BoneHandle, BoneHierarchy, SkeletonInstance, SkeletonKey, Skin};

pub mod prelude {
    pub use crate::{
        AnimationSettings, AnimationWorld, BoneHandle, BoneHierarchy, Clip, ClipCatalog, Keyframe,
        PlaybackState, PropertyCurve, PropertyKind, SkeletonInstance, Skin, Transform,
        TransformCurveSet,
    };
}
