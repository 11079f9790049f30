//! Per-bone pose sampling.
//!
//! A curve set drives any subset of a bone's channels. Undriven channels fall
//! back to the bone's current position/rotation and to unit scale.

use glam::{EulerRot, Quat, Vec3, Vec4};
use sinew_core::Transform;

use crate::clip::TransformCurveSet;
use crate::curve::Channel;

/// Below this squared length a quaternion is left un-normalized.
pub const DEGENERATE_QUAT_LENGTH_SQ: f32 = 1e-4;

/// Position, rotation and scale of one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BonePose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Snapshot of a bone's local position and rotation. Scale is assumed
    /// to be unit.
    #[must_use]
    pub fn capture(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: Vec3::ONE,
        }
    }
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Output of [`sample_curve_set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPose {
    pub pose: BonePose,
    /// Any quaternion or Euler channel had a curve.
    pub rotation_driven: bool,
}

impl SampledPose {
    /// Writes position and rotation to the local transform, scale to the
    /// post-transform scale.
    pub fn apply(&self, transform: &mut Transform) {
        transform.position = self.pose.position;
        transform.rotation = self.pose.rotation;
        transform.post_scale = self.pose.scale;
    }
}

/// Normalizes `raw` unless it is too short to normalize safely, in which
/// case it is returned as-is.
#[inline]
#[must_use]
pub fn normalize_or_keep(raw: Vec4) -> Quat {
    let q = Quat::from_vec4(raw);
    if raw.length_squared() > DEGENERATE_QUAT_LENGTH_SQ {
        q.normalize()
    } else {
        q
    }
}

/// Euler angles in radians, composed Z first, then X, then Y.
#[inline]
#[must_use]
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, euler.y, euler.x, euler.z)
}

/// Evaluates every curve of `set` at `time` on top of `base`.
///
/// Quaternion channels override single components of `base.rotation` and the
/// result is normalized. Euler channels, when present, replace the rotation
/// entirely. Scale starts from `(1, 1, 1)` regardless of `base`.
#[must_use]
pub fn sample_curve_set(set: &TransformCurveSet, time: f32, base: &BonePose) -> SampledPose {
    let mut position = base.position;
    let mut rotation = Vec4::from(base.rotation);
    let mut euler = Vec3::ZERO;
    let mut scale = Vec3::ONE;

    let mut quat_driven = false;
    let mut euler_driven = false;

    for curve in set.curves() {
        let channel = curve.kind().channel();
        if channel == Channel::Ignored {
            continue;
        }
        let value = curve.evaluate(time);
        match channel {
            Channel::Position(axis) => position[axis] = value,
            Channel::Rotation(axis) => {
                rotation[axis] = value;
                quat_driven = true;
            }
            Channel::Euler(axis) => {
                euler[axis] = value;
                euler_driven = true;
            }
            Channel::Scale(axis) => scale[axis] = value,
            Channel::Ignored => {}
        }
    }

    let rotation = if euler_driven {
        euler_to_quat(euler)
    } else if quat_driven {
        normalize_or_keep(rotation)
    } else {
        base.rotation
    };

    SampledPose {
        pose: BonePose {
            position,
            rotation,
            scale,
        },
        rotation_driven: quat_driven || euler_driven,
    }
}
