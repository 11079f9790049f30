//! Cross-fade blend controller.
//!
//! When a fade is requested the controller waits for the next tick, snapshots
//! every bone's local pose, and then blends that snapshot toward the target
//! clip's pose at its own time zero. While a fade runs it owns the pose
//! output; when the timer reaches the duration it reports completion and the
//! player switches clips.

use sinew_core::Transform;

use crate::bones::BoneTransforms;
use crate::clip::{Clip, ClipCatalog};
use crate::pose::{BonePose, sample_curve_set};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CrossFade {
    #[default]
    Inactive,
    /// Requested; the start pose is captured on the next tick.
    Capturing { target: usize, duration: f32 },
    Blending {
        target: usize,
        duration: f32,
        timer: f32,
        /// One entry per bone slot of the skeleton.
        captured: Vec<BonePose>,
    },
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTick {
    Idle,
    Running,
    Completed { target: usize },
}

impl CrossFade {
    /// Begins a fade toward `target`. A fade already in progress is
    /// restarted and will capture from whatever pose the bones hold now.
    pub fn start(&mut self, target: usize, duration: f32) {
        *self = Self::Capturing { target, duration };
    }

    pub fn cancel(&mut self) {
        *self = Self::Inactive;
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Inactive)
    }

    #[must_use]
    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Inactive => None,
            Self::Capturing { target, .. } | Self::Blending { target, .. } => Some(*target),
        }
    }

    /// Blend weight applied on the last tick, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        match self {
            Self::Blending {
                duration, timer, ..
            } => Some(blend_factor(*timer, *duration)),
            _ => None,
        }
    }

    #[must_use]
    pub fn captured_pose(&self) -> Option<&[BonePose]> {
        match self {
            Self::Blending { captured, .. } => Some(captured),
            _ => None,
        }
    }

    /// Advances the fade by `dt` and writes the blended pose.
    pub fn tick<B: BoneTransforms + ?Sized>(
        &mut self,
        dt: f32,
        catalog: &ClipCatalog,
        bones: &mut B,
    ) -> FadeTick {
        if let Self::Capturing { target, duration } = *self {
            let captured = capture_pose(bones);
            log::debug!(
                "cross-fade to clip {target}: captured {} bones, duration {duration}s",
                captured.len()
            );
            *self = Self::Blending {
                target,
                duration,
                timer: 0.0,
                captured,
            };
        }

        let (target, complete) = match self {
            Self::Blending {
                target,
                duration,
                timer,
                captured,
            } => {
                *timer += dt;
                let t = blend_factor(*timer, *duration);
                if let Some(clip) = catalog.get(*target) {
                    blend_toward_clip_start(clip, captured, t, bones);
                }
                (*target, *timer >= *duration)
            }
            _ => return FadeTick::Idle,
        };

        if complete {
            *self = Self::Inactive;
            FadeTick::Completed { target }
        } else {
            FadeTick::Running
        }
    }
}

/// `timer / duration` clamped to `[0, 1]`; a zero-length fade is already done.
#[inline]
#[must_use]
pub fn blend_factor(timer: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        (timer / duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn capture_pose<B: BoneTransforms + ?Sized>(bones: &B) -> Vec<BonePose> {
    (0..bones.bone_count())
        .map(|i| bones.local(i).map_or(BonePose::IDENTITY, BonePose::capture))
        .collect()
}

/// Writes `lerp/slerp(captured, clip pose at t=0, t)` to every bone the clip
/// animates. Scale is left alone.
pub fn blend_toward_clip_start<B: BoneTransforms + ?Sized>(
    clip: &Clip,
    captured: &[BonePose],
    t: f32,
    bones: &mut B,
) {
    for set in clip.transform_curve_sets() {
        let bone_index = set.bone_index();
        let Some(start) = captured.get(bone_index) else {
            continue;
        };
        let target = sample_curve_set(set, 0.0, start).pose;

        let Some(transform) = bones.local_mut(bone_index) else {
            log::trace!("cross-fade: bone {bone_index} has no live transform");
            continue;
        };
        write_blend(transform, start, &target, t);
    }
}

#[inline]
fn write_blend(transform: &mut Transform, start: &BonePose, target: &BonePose, t: f32) {
    transform.position = start.position.lerp(target.position, t);
    transform.rotation = start.rotation.slerp(target.rotation, t);
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::clip::TransformCurveSet;
    use crate::curve::{Keyframe, PropertyCurve, PropertyKind};

    const EPSILON: f32 = 1e-5;

    fn catalog_with_target(x0: f32) -> ClipCatalog {
        let curve = PropertyCurve::new(
            PropertyKind::PositionX,
            vec![Keyframe::flat(0.0, x0), Keyframe::flat(1.0, x0 + 100.0)],
        )
        .unwrap();
        let clip = Clip::new(
            "target",
            1.0,
            vec![TransformCurveSet::new(0, vec![curve]).unwrap()],
        )
        .unwrap();
        ClipCatalog::new(vec![clip]).unwrap()
    }

    #[test]
    fn blend_factor_clamps_and_handles_zero_duration() {
        assert_eq!(blend_factor(-1.0, 2.0), 0.0);
        assert_eq!(blend_factor(1.0, 2.0), 0.5);
        assert_eq!(blend_factor(5.0, 2.0), 1.0);
        assert_eq!(blend_factor(0.0, 0.0), 1.0);
    }

    #[test]
    fn capture_happens_on_first_tick_only() {
        let catalog = catalog_with_target(10.0);
        let mut bones = vec![Transform::new(), Transform::new()];
        bones[0].position = Vec3::new(2.0, 0.0, 0.0);

        let mut fade = CrossFade::default();
        fade.start(0, 1.0);
        assert!(fade.captured_pose().is_none());

        assert_eq!(fade.tick(0.25, &catalog, &mut bones[..]), FadeTick::Running);
        let captured = fade.captured_pose().unwrap().to_vec();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].position, Vec3::new(2.0, 0.0, 0.0));

        // Later ticks blend from the same snapshot even though the bone moved.
        assert_eq!(fade.tick(0.25, &catalog, &mut bones[..]), FadeTick::Running);
        assert_eq!(fade.captured_pose().unwrap(), &captured[..]);
        let x = bones[0].position.x;
        assert!((x - 6.0).abs() < EPSILON, "got {x}");
    }

    #[test]
    fn completes_at_duration_with_target_pose() {
        let catalog = catalog_with_target(10.0);
        let mut bones = vec![Transform::new()];
        let mut fade = CrossFade::default();
        fade.start(0, 0.5);

        assert_eq!(fade.tick(0.3, &catalog, &mut bones[..]), FadeTick::Running);
        assert_eq!(
            fade.tick(0.3, &catalog, &mut bones[..]),
            FadeTick::Completed { target: 0 }
        );
        assert!(!fade.is_active());
        assert!((bones[0].position.x - 10.0).abs() < EPSILON);
    }

    #[test]
    fn restart_recaptures_mid_blend_pose() {
        let catalog = catalog_with_target(10.0);
        let mut bones = vec![Transform::new()];
        let mut fade = CrossFade::default();
        fade.start(0, 1.0);
        let _ = fade.tick(0.5, &catalog, &mut bones[..]);
        assert!((bones[0].position.x - 5.0).abs() < EPSILON);

        fade.start(0, 1.0);
        let _ = fade.tick(0.0, &catalog, &mut bones[..]);
        let captured = fade.captured_pose().unwrap();
        assert!((captured[0].position.x - 5.0).abs() < EPSILON);
    }

    #[test]
    fn rotation_is_slerped() {
        let constant =
            |kind, value| PropertyCurve::new(kind, vec![Keyframe::flat(0.0, value)]).unwrap();
        let (s, c) = std::f32::consts::FRAC_PI_4.sin_cos();
        // 90 degrees about Z.
        let set = TransformCurveSet::new(
            0,
            vec![
                constant(PropertyKind::RotationZ, s),
                constant(PropertyKind::RotationW, c),
            ],
        )
        .unwrap();
        let clip = Clip::new("turn", 1.0, vec![set]).unwrap();
        let catalog = ClipCatalog::new(vec![clip]).unwrap();

        let mut bones = vec![Transform::new()];
        let mut fade = CrossFade::default();
        fade.start(0, 2.0);
        let _ = fade.tick(1.0, &catalog, &mut bones[..]);

        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(bones[0].rotation.dot(expected).abs() > 1.0 - EPSILON);
    }

    #[test]
    fn missing_bones_are_skipped_and_captured_as_identity() {
        let catalog = catalog_with_target(10.0);
        let mut bones: Vec<Option<Transform>> = vec![None, Some(Transform::new())];
        let mut fade = CrossFade::default();
        fade.start(0, 1.0);
        assert_eq!(fade.tick(1.0, &catalog, &mut bones[..]), FadeTick::Completed { target: 0 });
        assert!(bones[0].is_none());
    }

    #[test]
    fn invalid_target_still_times_out() {
        let catalog = ClipCatalog::default();
        let mut bones = vec![Transform::new()];
        let mut fade = CrossFade::default();
        fade.start(7, 0.1);
        assert_eq!(fade.tick(0.2, &catalog, &mut bones[..]), FadeTick::Completed { target: 7 });
        assert_eq!(bones[0].position, Vec3::ZERO);
    }
}
