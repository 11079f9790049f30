//! Curve sampling and full-frame benchmarks.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};

use sinew::animation::evaluate;
use sinew::{
    AnimationSettings, AnimationWorld, BoneHierarchy, Clip, ClipCatalog, Keyframe, PropertyCurve,
    PropertyKind, SkeletonInstance, Skin, Transform, TransformCurveSet,
};

const BONES: usize = 48;

fn dense_keys(count: usize) -> Vec<Keyframe> {
    (0..count)
        .map(|i| {
            let t = i as f32 / 30.0;
            Keyframe::new(t, t.sin(), t.cos(), t.cos())
        })
        .collect()
}

fn walk_catalog() -> Arc<ClipCatalog> {
    let sets = (0..BONES)
        .map(|bone| {
            let curves = [
                PropertyKind::PositionX,
                PropertyKind::PositionY,
                PropertyKind::RotationX,
                PropertyKind::RotationY,
                PropertyKind::RotationZ,
                PropertyKind::RotationW,
            ]
            .into_iter()
            .map(|kind| PropertyCurve::new(kind, dense_keys(60)).unwrap())
            .collect();
            TransformCurveSet::new(bone, curves).unwrap()
        })
        .collect();
    Arc::new(ClipCatalog::new(vec![Clip::new("walk", 2.0, sets).unwrap()]).unwrap())
}

fn chain_instance(catalog: Arc<ClipCatalog>, settings: &AnimationSettings) -> SkeletonInstance {
    let mut hierarchy = BoneHierarchy::new();
    let mut bones = Vec::with_capacity(BONES);
    let mut parent = None;
    for i in 0..BONES {
        let handle = hierarchy.add_bone(
            format!("bone{i}"),
            parent,
            Transform::from_position_rotation(Vec3::Y, Quat::IDENTITY),
        );
        bones.push(handle);
        parent = Some(handle);
    }
    let skin = Skin::new(bones[0], bones.clone(), vec![Mat4::IDENTITY; BONES]).unwrap();
    SkeletonInstance::new("chain", hierarchy, bones, catalog, settings.clone()).with_skin(skin)
}

fn bench_evaluate(c: &mut Criterion) {
    let keys = dense_keys(600);
    c.bench_function("evaluate_600_keys", |b| {
        let mut t = 0.0_f32;
        b.iter(|| {
            t = (t + 0.013) % 20.0;
            black_box(evaluate(black_box(&keys), t))
        });
    });
}

fn bench_world(c: &mut Criterion) {
    let catalog = walk_catalog();
    for (label, parallel) in [("world_update_sequential", false), ("world_update_parallel", true)] {
        let settings = AnimationSettings {
            parallel,
            ..Default::default()
        };
        let mut world = AnimationWorld::new(settings.clone());
        for _ in 0..64 {
            world.insert(chain_instance(catalog.clone(), &settings));
        }
        c.bench_function(label, |b| b.iter(|| world.update(black_box(1.0 / 60.0))));
    }
}

criterion_group!(benches, bench_evaluate, bench_world);
criterion_main!(benches);
