//! Pose advance engine.
//!
//! [`AnimationPlayer`] owns the playback clock of one skeleton instance. Each
//! [`advance`](AnimationPlayer::advance) either hands the frame to an active
//! cross-fade or moves the root clock forward, wraps it into the clip length
//! and writes every animated bone's local transform.

use std::sync::Arc;

use sinew_core::AnimationSettings;

use crate::bones::BoneTransforms;
use crate::clip::{Clip, ClipCatalog};
use crate::cross_fade::{CrossFade, FadeTick};
use crate::pose::{BonePose, sample_curve_set};

/// Playback state visible to gameplay code.
///
/// `clip_index` may be changed directly; the change is picked up on the next
/// advance, which restarts the clip from time zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub clip_index: usize,
    /// Seconds into the current clip, in `[0, length)` after every advance.
    pub root_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// The selected clip does not exist in the catalog.
    Idle,
    Playing,
    CrossFading,
}

#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    catalog: Arc<ClipCatalog>,
    state: AnimationState,
    /// Clip index seen by the last advance, for change detection.
    previous_clip_index: usize,
    cross_fade: CrossFade,
    settings: AnimationSettings,
}

impl AnimationPlayer {
    /// Creates a player on clip 0 at time 0.
    #[must_use]
    pub fn new(catalog: Arc<ClipCatalog>) -> Self {
        Self::with_settings(catalog, AnimationSettings::default())
    }

    #[must_use]
    pub fn with_settings(catalog: Arc<ClipCatalog>, settings: AnimationSettings) -> Self {
        Self {
            catalog,
            state: AnimationState::default(),
            previous_clip_index: 0,
            cross_fade: CrossFade::Inactive,
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Arc<ClipCatalog> {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn animation_state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn animation_state_mut(&mut self) -> &mut AnimationState {
        &mut self.state
    }

    #[inline]
    #[must_use]
    pub fn clip_index(&self) -> usize {
        self.state.clip_index
    }

    #[inline]
    #[must_use]
    pub fn root_time(&self) -> f32 {
        self.state.root_time
    }

    #[must_use]
    pub fn current_clip(&self) -> Option<&Clip> {
        self.catalog.get(self.state.clip_index)
    }

    #[inline]
    #[must_use]
    pub fn cross_fade(&self) -> &CrossFade {
        &self.cross_fade
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.cross_fade.is_active() {
            PlaybackState::CrossFading
        } else if self.current_clip().is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    // ========================================================================
    // Control plane
    // ========================================================================

    /// Switches to `clip_index` immediately, from time zero, without blending.
    /// Cancels any cross-fade in progress.
    pub fn set_clip(&mut self, clip_index: usize) {
        self.cross_fade.cancel();
        self.state.clip_index = clip_index;
        self.state.root_time = 0.0;
        self.previous_clip_index = clip_index;
        self.log_clip_switch(clip_index);
    }

    /// Returns `false` when no clip has that name.
    pub fn set_clip_by_name(&mut self, name: &str) -> bool {
        match self.catalog.find(name) {
            Some(index) => {
                self.set_clip(index);
                true
            }
            None => {
                log::warn!("set_clip_by_name: no clip named {name:?}");
                false
            }
        }
    }

    /// Overrides the root clock. Non-finite values are ignored.
    pub fn set_time(&mut self, time: f32) {
        if time.is_finite() {
            self.state.root_time = time;
        }
    }

    /// Starts a blend from the current pose toward `clip_index`'s first frame.
    ///
    /// `duration` falls back to the configured default when omitted or
    /// negative. An out-of-range index is ignored.
    pub fn cross_fade_to(&mut self, clip_index: usize, duration: Option<f32>) {
        if self.catalog.get(clip_index).is_none() {
            log::warn!(
                "cross_fade_to: clip index {clip_index} out of range ({} clips)",
                self.catalog.len()
            );
            return;
        }
        let duration = self.settings.resolve_cross_fade_duration(duration);
        self.cross_fade.start(clip_index, duration);
    }

    /// Returns `false` when no clip has that name.
    pub fn cross_fade_to_by_name(&mut self, name: &str, duration: Option<f32>) -> bool {
        match self.catalog.find(name) {
            Some(index) => {
                self.cross_fade_to(index, duration);
                true
            }
            None => {
                log::warn!("cross_fade_to_by_name: no clip named {name:?}");
                false
            }
        }
    }

    // ========================================================================
    // Frame step
    // ========================================================================

    /// Advances playback by `dt` seconds and writes the resulting local pose.
    pub fn advance<B: BoneTransforms + ?Sized>(&mut self, dt: f32, bones: &mut B) {
        let dt = if dt.is_finite() { dt } else { 0.0 };

        if self.cross_fade.is_active() {
            if let FadeTick::Completed { target } = self.cross_fade.tick(dt, &self.catalog, bones)
            {
                log::debug!("cross-fade complete, now playing clip {target}");
                self.state.clip_index = target;
                self.state.root_time = 0.0;
                self.previous_clip_index = target;
            }
            return;
        }

        if self.state.clip_index != self.previous_clip_index {
            let clip_index = self.state.clip_index;
            self.previous_clip_index = clip_index;
            self.state.root_time = 0.0;
            self.log_clip_switch(clip_index);
        }

        let Some(clip) = self.catalog.get(self.state.clip_index) else {
            return;
        };

        self.state.root_time = wrap_time(self.state.root_time + dt, clip.length());
        write_clip_pose(clip, self.state.root_time, bones);
    }

    fn log_clip_switch(&self, clip_index: usize) {
        match self.catalog.get(clip_index) {
            Some(clip) => log::debug!("playing clip {clip_index} ({})", clip.name()),
            None => log::warn!(
                "clip index {clip_index} out of range ({} clips), pose left unchanged",
                self.catalog.len()
            ),
        }
    }
}

/// Wraps `time` into `[0, length)`. Zero-length clips pin time to 0.
#[must_use]
pub fn wrap_time(time: f32, length: f32) -> f32 {
    if length <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    if (0.0..length).contains(&time) {
        return time;
    }
    let wrapped = time.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs.
    if wrapped < length { wrapped } else { 0.0 }
}

/// Samples every curve set of `clip` at `time` and writes the bones it
/// targets. Bones without a live transform are skipped.
pub fn write_clip_pose<B: BoneTransforms + ?Sized>(clip: &Clip, time: f32, bones: &mut B) {
    for set in clip.transform_curve_sets() {
        let bone_index = set.bone_index();
        let Some(transform) = bones.local_mut(bone_index) else {
            log::trace!("clip {:?}: bone {bone_index} has no live transform", clip.name());
            continue;
        };
        let base = BonePose::capture(transform);
        sample_curve_set(set, time, &base).apply(transform);
    }
}
