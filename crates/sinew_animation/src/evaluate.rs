//! Curve evaluation.
//!
//! Keyframes are joined by cubic Hermite segments. Tangents are stored as
//! slopes (value per second) and scaled by the segment length before the
//! basis is applied, which matches how curve authoring tools bake them.
//! Outside the keyed range the curve holds its boundary value.

use crate::curve::Keyframe;

/// Samples a sorted keyframe list at `time`.
///
/// - no keys: `0.0`
/// - one key: its value
/// - before the first / after the last key: the boundary value
/// - otherwise: Hermite interpolation on the enclosing segment
#[must_use]
pub fn evaluate(keyframes: &[Keyframe], time: f32) -> f32 {
    let (first, last) = match keyframes {
        [] => return 0.0,
        [only] => return only.value,
        [first, .., last] => (first, last),
    };

    if time.is_nan() || time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }

    // First key strictly after `time`; the segment starts one before it.
    let next = keyframes.partition_point(|k| k.time <= time);
    let Some(index) = next.checked_sub(1) else {
        return first.value;
    };
    if index + 1 >= keyframes.len() {
        return last.value;
    }

    hermite(&keyframes[index], &keyframes[index + 1], time)
}

/// Hermite interpolation between two keys at an absolute `time`.
///
/// A zero or negative span returns the left key's value.
#[inline]
#[must_use]
pub fn hermite(k0: &Keyframe, k1: &Keyframe, time: f32) -> f32 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k0.value;
    }

    let t = (time - k0.time) / dt;
    let m0 = k0.out_tangent * dt;
    let m1 = k1.in_tangent * dt;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * k0.value + h10 * m0 + h01 * k1.value + h11 * m1
}
