//! Skeleton instances.
//!
//! One instance owns a bone hierarchy, the playback state driving it and an
//! optional skin. [`SkeletonInstance::update`] runs the per-frame pipeline in
//! order: pose advance (or cross-fade), world-transform propagation, skin
//! matrices.

use std::sync::Arc;

use sinew_animation::{AnimationPlayer, BoneTransforms, ClipCatalog, PlaybackState};
use sinew_core::{AnimationSettings, Transform};

use crate::hierarchy::{BoneHandle, BoneHierarchy};
use crate::skin::Skin;

/// Maps curve bone indices onto live bones of a hierarchy.
struct BoundBones<'a> {
    hierarchy: &'a mut BoneHierarchy,
    handles: &'a [BoneHandle],
}

impl BoneTransforms for BoundBones<'_> {
    fn bone_count(&self) -> usize {
        self.handles.len()
    }

    fn local(&self, bone_index: usize) -> Option<&Transform> {
        let handle = *self.handles.get(bone_index)?;
        self.hierarchy.transform(handle)
    }

    fn local_mut(&mut self, bone_index: usize) -> Option<&mut Transform> {
        let handle = *self.handles.get(bone_index)?;
        self.hierarchy.transform_mut(handle)
    }
}

#[derive(Debug, Clone)]
pub struct SkeletonInstance {
    name: String,
    hierarchy: BoneHierarchy,
    /// `bone_handles[i]` is the bone curves address as index `i`.
    bone_handles: Vec<BoneHandle>,
    player: AnimationPlayer,
    skin: Option<Skin>,
}

impl SkeletonInstance {
    /// Binds `catalog` to the bones of `hierarchy`. The bone index order is
    /// fixed for the lifetime of the instance.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        hierarchy: BoneHierarchy,
        bone_handles: Vec<BoneHandle>,
        catalog: Arc<ClipCatalog>,
        settings: AnimationSettings,
    ) -> Self {
        let name = name.into();
        let max_bone = catalog.iter().filter_map(|clip| clip.max_bone_index()).max();
        if let Some(max_bone) = max_bone.filter(|&i| i >= bone_handles.len()) {
            log::warn!(
                "skeleton {name:?}: clips address bone {max_bone} but only {} bones are bound",
                bone_handles.len()
            );
        }

        Self {
            name,
            hierarchy,
            bone_handles,
            player: AnimationPlayer::with_settings(catalog, settings),
            skin: None,
        }
    }

    #[must_use]
    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Some(skin);
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &BoneHierarchy {
        &self.hierarchy
    }

    #[inline]
    pub fn hierarchy_mut(&mut self) -> &mut BoneHierarchy {
        &mut self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn bone_handles(&self) -> &[BoneHandle] {
        &self.bone_handles
    }

    #[inline]
    #[must_use]
    pub fn bone_handle(&self, bone_index: usize) -> Option<BoneHandle> {
        self.bone_handles.get(bone_index).copied()
    }

    /// Local transform of the bone at curve index `bone_index`.
    #[must_use]
    pub fn bone_transform(&self, bone_index: usize) -> Option<&Transform> {
        self.hierarchy.transform(self.bone_handle(bone_index)?)
    }

    #[inline]
    #[must_use]
    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut AnimationPlayer {
        &mut self.player
    }

    #[inline]
    #[must_use]
    pub fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.player.state()
    }

    pub fn set_clip(&mut self, clip_index: usize) {
        self.player.set_clip(clip_index);
    }

    pub fn set_clip_by_name(&mut self, name: &str) -> bool {
        self.player.set_clip_by_name(name)
    }

    pub fn set_time(&mut self, time: f32) {
        self.player.set_time(time);
    }

    pub fn cross_fade_to(&mut self, clip_index: usize, duration: Option<f32>) {
        self.player.cross_fade_to(clip_index, duration);
    }

    pub fn cross_fade_to_by_name(&mut self, name: &str, duration: Option<f32>) -> bool {
        self.player.cross_fade_to_by_name(name, duration)
    }

    /// Runs one frame: pose, then world transforms, then skin matrices.
    pub fn update(&mut self, dt: f32) {
        let mut bones = BoundBones {
            hierarchy: &mut self.hierarchy,
            handles: &self.bone_handles,
        };
        self.player.advance(dt, &mut bones);

        self.hierarchy.update_world_transforms();

        if let Some(skin) = &mut self.skin {
            skin.compute(&self.hierarchy);
        }
    }
}
