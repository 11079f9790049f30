use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sinew_core::{Result, SinewError};

use crate::evaluate::evaluate;

/// A single baked keyframe. Tangents are slopes in value-per-second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    #[must_use]
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    /// Keyframe with zero tangents.
    #[must_use]
    pub const fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.value.is_finite()
            && self.in_tangent.is_finite()
            && self.out_tangent.is_finite()
    }
}

/// The transform property a curve drives.
///
/// Deserializes from either the variant name (`"PositionX"`) or a raw
/// binding name (`"m_LocalPosition.x"`); anything else becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PropertyKind {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    RotationW,
    EulerX,
    EulerY,
    EulerZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Unknown,
}

/// Where a property's value lands in a bone pose, with its component index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position(usize),
    Rotation(usize),
    Euler(usize),
    Scale(usize),
    Ignored,
}

impl PropertyKind {
    /// Maps a conventional transform binding name (`m_LocalPosition.x`,
    /// `m_LocalRotation.w`, `localEulerAnglesRaw.y`, `m_LocalScale.z`, ...)
    /// to a property kind. Unrecognized names map to [`PropertyKind::Unknown`].
    #[must_use]
    pub fn from_property_name(name: &str) -> Self {
        match name {
            "m_LocalPosition.x" => Self::PositionX,
            "m_LocalPosition.y" => Self::PositionY,
            "m_LocalPosition.z" => Self::PositionZ,

            "m_LocalRotation.x" => Self::RotationX,
            "m_LocalRotation.y" => Self::RotationY,
            "m_LocalRotation.z" => Self::RotationZ,
            "m_LocalRotation.w" => Self::RotationW,

            "localEulerAnglesRaw.x" => Self::EulerX,
            "localEulerAnglesRaw.y" => Self::EulerY,
            "localEulerAnglesRaw.z" => Self::EulerZ,

            "m_LocalScale.x" => Self::ScaleX,
            "m_LocalScale.y" => Self::ScaleY,
            "m_LocalScale.z" => Self::ScaleZ,

            _ => Self::Unknown,
        }
    }

    /// Maps a variant name as written by `Serialize` back to its kind.
    fn from_variant_name(name: &str) -> Option<Self> {
        let kind = match name {
            "PositionX" => Self::PositionX,
            "PositionY" => Self::PositionY,
            "PositionZ" => Self::PositionZ,
            "RotationX" => Self::RotationX,
            "RotationY" => Self::RotationY,
            "RotationZ" => Self::RotationZ,
            "RotationW" => Self::RotationW,
            "EulerX" => Self::EulerX,
            "EulerY" => Self::EulerY,
            "EulerZ" => Self::EulerZ,
            "ScaleX" => Self::ScaleX,
            "ScaleY" => Self::ScaleY,
            "ScaleZ" => Self::ScaleZ,
            "Unknown" => Self::Unknown,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::PositionX => Channel::Position(0),
            Self::PositionY => Channel::Position(1),
            Self::PositionZ => Channel::Position(2),
            Self::RotationX => Channel::Rotation(0),
            Self::RotationY => Channel::Rotation(1),
            Self::RotationZ => Channel::Rotation(2),
            Self::RotationW => Channel::Rotation(3),
            Self::EulerX => Channel::Euler(0),
            Self::EulerY => Channel::Euler(1),
            Self::EulerZ => Channel::Euler(2),
            Self::ScaleX => Channel::Scale(0),
            Self::ScaleY => Channel::Scale(1),
            Self::ScaleZ => Channel::Scale(2),
            Self::Unknown => Channel::Ignored,
        }
    }
}

impl From<String> for PropertyKind {
    fn from(name: String) -> Self {
        Self::from_variant_name(&name).unwrap_or_else(|| Self::from_property_name(&name))
    }
}

impl FromStr for PropertyKind {
    type Err = Infallible;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_property_name(name))
    }
}

/// Keyframes for one property, sorted ascending by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCurve {
    kind: PropertyKind,
    keyframes: Vec<Keyframe>,
}

impl PropertyCurve {
    /// Builds a curve, rejecting unsorted or non-finite keyframes.
    ///
    /// Equal times are accepted; sampling at such a time resolves to the
    /// later key of the pair.
    pub fn new(kind: PropertyKind, keyframes: Vec<Keyframe>) -> Result<Self> {
        let curve = Self { kind, keyframes };
        curve.validate()?;
        Ok(curve)
    }

    /// Re-checks the invariants, used after deserialization.
    pub fn validate(&self) -> Result<()> {
        for (index, key) in self.keyframes.iter().enumerate() {
            if !key.is_finite() {
                return Err(SinewError::NonFiniteKeyframe {
                    property: format!("{:?}", self.kind),
                    index,
                });
            }
        }
        if let Some(index) = self
            .keyframes
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(SinewError::UnsortedKeyframes {
                property: format!("{:?}", self.kind),
                index: index + 1,
            });
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Samples the curve at `time` seconds.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, time: f32) -> f32 {
        evaluate(&self.keyframes, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_map_to_kinds() {
        assert_eq!(
            PropertyKind::from_property_name("m_LocalPosition.y"),
            PropertyKind::PositionY
        );
        assert_eq!(
            PropertyKind::from_property_name("m_LocalRotation.w"),
            PropertyKind::RotationW
        );
        assert_eq!(
            PropertyKind::from_property_name("localEulerAnglesRaw.z"),
            PropertyKind::EulerZ
        );
        assert_eq!(
            PropertyKind::from_property_name("m_LocalScale.x"),
            PropertyKind::ScaleX
        );
        assert_eq!(
            PropertyKind::from_property_name("material._Color.r"),
            PropertyKind::Unknown
        );
        assert_eq!(PropertyKind::Unknown.channel(), Channel::Ignored);
        assert_eq!("m_LocalPosition.z".parse::<PropertyKind>(), Ok(PropertyKind::PositionZ));
    }

    #[test]
    fn unsorted_keyframes_are_rejected() {
        let err = PropertyCurve::new(
            PropertyKind::PositionX,
            vec![Keyframe::flat(0.0, 0.0), Keyframe::flat(2.0, 1.0), Keyframe::flat(1.0, 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SinewError::UnsortedKeyframes { index: 2, .. }));
    }

    #[test]
    fn non_finite_keyframes_are_rejected() {
        let err = PropertyCurve::new(
            PropertyKind::ScaleZ,
            vec![Keyframe::new(0.0, 1.0, f32::NAN, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SinewError::NonFiniteKeyframe { index: 0, .. }));
    }

    #[test]
    fn duplicate_times_are_accepted() {
        let curve = PropertyCurve::new(
            PropertyKind::PositionX,
            vec![Keyframe::flat(0.0, 0.0), Keyframe::flat(0.0, 1.0)],
        );
        assert!(curve.is_ok());
    }

    #[test]
    fn unknown_kind_deserializes_from_unrecognized_name() {
        let kind: PropertyKind = serde_json::from_str("\"Opacity\"").unwrap();
        assert_eq!(kind, PropertyKind::Unknown);
    }

    #[test]
    fn kind_deserializes_from_variant_or_binding_name() {
        let kind: PropertyKind = serde_json::from_str("\"RotationW\"").unwrap();
        assert_eq!(kind, PropertyKind::RotationW);
        let kind: PropertyKind = serde_json::from_str("\"m_LocalRotation.w\"").unwrap();
        assert_eq!(kind, PropertyKind::RotationW);
        let kind: PropertyKind = serde_json::from_str("\"localEulerAnglesRaw.x\"").unwrap();
        assert_eq!(kind, PropertyKind::EulerX);

        let json = serde_json::to_string(&PropertyKind::ScaleY).unwrap();
        assert_eq!(json, "\"ScaleY\"");
        assert_eq!(serde_json::from_str::<PropertyKind>(&json).unwrap(), PropertyKind::ScaleY);
    }
}
