use std::io::Read;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sinew_core::{Result, SinewError};

use crate::curve::{PropertyCurve, PropertyKind};

/// All curves one clip applies to a single bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformCurveSet {
    bone_index: usize,
    curves: Vec<PropertyCurve>,
}

impl TransformCurveSet {
    /// Groups `curves` under `bone_index`. At most one curve per property
    /// kind is allowed; `Unknown` curves are kept but never applied.
    pub fn new(bone_index: usize, curves: Vec<PropertyCurve>) -> Result<Self> {
        let set = Self { bone_index, curves };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, curve) in self.curves.iter().enumerate() {
            curve.validate()?;
            let kind = curve.kind();
            if kind != PropertyKind::Unknown
                && self.curves[..i].iter().any(|c| c.kind() == kind)
            {
                return Err(SinewError::DuplicateProperty {
                    bone_index: self.bone_index,
                    property: format!("{kind:?}"),
                });
            }
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> usize {
        self.bone_index
    }

    #[inline]
    #[must_use]
    pub fn curves(&self) -> &[PropertyCurve] {
        &self.curves
    }

    #[must_use]
    pub fn curve(&self, kind: PropertyKind) -> Option<&PropertyCurve> {
        self.curves.iter().find(|c| c.kind() == kind)
    }
}

/// A named, timed animation: an ordered list of per-bone curve sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    name: String,
    length: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frame_rate: Option<f32>,
    transform_curve_sets: Vec<TransformCurveSet>,
}

impl Clip {
    pub fn new(
        name: impl Into<String>,
        length: f32,
        transform_curve_sets: Vec<TransformCurveSet>,
    ) -> Result<Self> {
        let clip = Self {
            name: name.into(),
            length,
            frame_rate: None,
            transform_curve_sets,
        };
        clip.validate()?;
        Ok(clip)
    }

    /// Records the rate the clip was sampled at when it was authored.
    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = (frame_rate.is_finite() && frame_rate > 0.0).then_some(frame_rate);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(SinewError::InvalidClipLength {
                clip: self.name.clone(),
                length: self.length,
            });
        }
        if let Some(frame_rate) = self.frame_rate.filter(|r| !r.is_finite() || *r <= 0.0) {
            return Err(SinewError::InvalidFrameRate {
                clip: self.name.clone(),
                frame_rate,
            });
        }
        self.transform_curve_sets
            .iter()
            .try_for_each(TransformCurveSet::validate)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in seconds. Playback loops at this point.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    /// Number of authored frames, if the frame rate is known.
    #[must_use]
    pub fn frame_count(&self) -> Option<u32> {
        self.frame_rate.map(|rate| (self.length * rate).round() as u32)
    }

    #[inline]
    #[must_use]
    pub fn transform_curve_sets(&self) -> &[TransformCurveSet] {
        &self.transform_curve_sets
    }

    /// Highest bone index any curve set targets.
    #[must_use]
    pub fn max_bone_index(&self) -> Option<usize> {
        self.transform_curve_sets.iter().map(TransformCurveSet::bone_index).max()
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    clips: Vec<Clip>,
}

/// The immutable set of clips a skeleton can play.
///
/// Built once at load time and shared read-only (behind an `Arc`) by every
/// skeleton instance bound to it. Clip indices never change after build.
#[derive(Debug, Clone, Default)]
pub struct ClipCatalog {
    clips: Vec<Clip>,
    by_name: FxHashMap<String, usize>,
}

impl ClipCatalog {
    /// Validates `clips` and indexes them by name. When two clips share a
    /// name, lookups by name resolve to the first.
    pub fn new(clips: Vec<Clip>) -> Result<Self> {
        let mut by_name = FxHashMap::default();
        for (index, clip) in clips.iter().enumerate() {
            clip.validate()?;
            by_name.entry(clip.name.clone()).or_insert(index);
        }
        Ok(Self { clips, by_name })
    }

    /// Parses a `{ "clips": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.clips)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let file: CatalogFile = serde_json::from_reader(reader)?;
        Self::new(file.clips)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Keyframe;

    fn curve(kind: PropertyKind) -> PropertyCurve {
        PropertyCurve::new(kind, vec![Keyframe::flat(0.0, 1.0)]).unwrap()
    }

    #[test]
    fn duplicate_property_in_set_is_rejected() {
        let err = TransformCurveSet::new(
            3,
            vec![curve(PropertyKind::PositionX), curve(PropertyKind::PositionX)],
        )
        .unwrap_err();
        assert!(matches!(err, SinewError::DuplicateProperty { bone_index: 3, .. }));
    }

    #[test]
    fn repeated_unknown_curves_are_allowed() {
        let set = TransformCurveSet::new(
            0,
            vec![curve(PropertyKind::Unknown), curve(PropertyKind::Unknown)],
        );
        assert!(set.is_ok());
    }

    #[test]
    fn negative_length_is_rejected() {
        let err = Clip::new("bad", -1.0, Vec::new()).unwrap_err();
        assert!(matches!(err, SinewError::InvalidClipLength { .. }));
        assert!(Clip::new("inf", f32::INFINITY, Vec::new()).is_err());
        assert!(Clip::new("still", 0.0, Vec::new()).is_ok());
    }

    #[test]
    fn frame_count_rounds() {
        let clip = Clip::new("walk", 1.01, Vec::new()).unwrap().with_frame_rate(30.0);
        assert_eq!(clip.frame_count(), Some(30));
        let clip = Clip::new("walk", 1.0, Vec::new()).unwrap().with_frame_rate(-1.0);
        assert_eq!(clip.frame_count(), None);
    }

    #[test]
    fn name_lookup_first_wins() {
        let catalog = ClipCatalog::new(vec![
            Clip::new("idle", 1.0, Vec::new()).unwrap(),
            Clip::new("run", 1.0, Vec::new()).unwrap(),
            Clip::new("idle", 2.0, Vec::new()).unwrap(),
        ])
        .unwrap();
        assert_eq!(catalog.find("idle"), Some(0));
        assert_eq!(catalog.find("run"), Some(1));
        assert_eq!(catalog.find("jump"), None);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn json_catalog_loads_and_validates() {
        let json = r#"{
            "clips": [{
                "name": "wave",
                "length": 2.0,
                "frame_rate": 30.0,
                "transform_curve_sets": [{
                    "bone_index": 1,
                    "curves": [{
                        "kind": "PositionX",
                        "keyframes": [
                            { "time": 0.0, "value": 0.0 },
                            { "time": 2.0, "value": 10.0, "in_tangent": 0.0, "out_tangent": 0.0 }
                        ]
                    }]
                }]
            }]
        }"#;
        let catalog = ClipCatalog::from_json(json).unwrap();
        let clip = catalog.get(0).unwrap();
        assert_eq!(clip.name(), "wave");
        assert_eq!(clip.frame_count(), Some(60));
        assert_eq!(clip.max_bone_index(), Some(1));
        let set = &clip.transform_curve_sets()[0];
        let x = set.curve(PropertyKind::PositionX).unwrap();
        assert!((x.evaluate(1.0) - 5.0).abs() < 1e-5);

        let unsorted = json.replace("\"time\": 2.0", "\"time\": -2.0");
        assert!(matches!(
            ClipCatalog::from_json(&unsorted),
            Err(SinewError::UnsortedKeyframes { .. })
        ));
        assert!(matches!(
            ClipCatalog::from_json("{ \"clips\": 4 }"),
            Err(SinewError::JsonError(_))
        ));
    }

    #[test]
    fn json_catalog_rejects_bad_frame_rate() {
        let json = |rate: &str| {
            format!(
                r#"{{ "clips": [{{ "name": "walk", "length": 2.0, "frame_rate": {rate},
                    "transform_curve_sets": [] }}] }}"#
            )
        };
        for rate in ["-30.0", "0.0"] {
            assert!(
                matches!(
                    ClipCatalog::from_json(&json(rate)),
                    Err(SinewError::InvalidFrameRate { .. })
                ),
                "rate {rate}"
            );
        }
        let catalog = ClipCatalog::from_json(&json("24.0")).unwrap();
        assert_eq!(catalog.get(0).unwrap().frame_count(), Some(48));
    }

    #[test]
    fn json_catalog_accepts_binding_names() {
        let json = r#"{
            "clips": [{
                "name": "nod",
                "length": 1.0,
                "transform_curve_sets": [{
                    "bone_index": 0,
                    "curves": [
                        { "kind": "m_LocalPosition.x", "keyframes": [{ "time": 0.0, "value": 3.0 }] },
                        { "kind": "m_LocalRotation.w", "keyframes": [{ "time": 0.0, "value": 1.0 }] },
                        { "kind": "m_IsActive", "keyframes": [{ "time": 0.0, "value": 1.0 }] }
                    ]
                }]
            }]
        }"#;
        let catalog = ClipCatalog::from_json(json).unwrap();
        let kinds: Vec<PropertyKind> = catalog.get(0).unwrap().transform_curve_sets()[0]
            .curves()
            .iter()
            .map(PropertyCurve::kind)
            .collect();
        assert_eq!(
            kinds,
            [PropertyKind::PositionX, PropertyKind::RotationW, PropertyKind::Unknown]
        );
    }
}
