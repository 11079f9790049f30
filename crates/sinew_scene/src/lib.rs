//! Sinew Scene
//!
//! Runtime side of skeletal animation: per-instance bone hierarchies with
//! world-transform propagation, skin matrices, skeleton instances and the
//! [`AnimationWorld`] frame driver.

pub mod hierarchy;
pub mod skeleton;
pub mod skin;
pub mod system;

pub use hierarchy::{Bone, BoneHandle, BoneHierarchy};
pub use skeleton::SkeletonInstance;
pub use skin::Skin;
pub use system::{AnimationWorld, SkeletonKey};
