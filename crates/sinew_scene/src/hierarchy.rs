//! Bone hierarchy and world-transform propagation.
//!
//! Bones live in a [`SlotMap`] so handles stay valid while other bones are
//! added or removed. A removed bone's handle simply stops resolving, which
//! the pose and skin passes treat as "bone unavailable".

use glam::Affine3A;
use sinew_core::Transform;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct BoneHandle;
}

/// A single bone: hierarchy links plus its local transform.
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    parent: Option<BoneHandle>,
    children: SmallVec<[BoneHandle; 4]>,
    pub transform: Transform,
}

impl Bone {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BoneHandle] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoneHierarchy {
    bones: SlotMap<BoneHandle, Bone>,
    roots: Vec<BoneHandle>,
}

impl BoneHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bone under `parent`. A missing or stale parent makes the bone
    /// a root.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneHandle>,
        transform: Transform,
    ) -> BoneHandle {
        let parent = parent.filter(|p| self.bones.contains_key(*p));
        let handle = self.bones.insert(Bone {
            name: name.into(),
            parent,
            children: SmallVec::new(),
            transform,
        });

        match parent.and_then(|p| self.bones.get_mut(p)) {
            Some(parent_bone) => parent_bone.children.push(handle),
            None => self.roots.push(handle),
        }
        handle
    }

    /// Removes `handle` and its whole subtree. Returns how many bones were
    /// removed.
    pub fn remove_bone(&mut self, handle: BoneHandle) -> usize {
        let Some(parent) = self.bones.get(handle).map(Bone::parent) else {
            return 0;
        };

        match parent.and_then(|p| self.bones.get_mut(p)) {
            Some(parent_bone) => parent_bone.children.retain(|c| *c != handle),
            None => self.roots.retain(|r| *r != handle),
        }

        let mut removed = 0;
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(bone) = self.bones.remove(current) {
                stack.extend(bone.children);
                removed += 1;
            }
        }
        removed
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: BoneHandle) -> Option<&Bone> {
        self.bones.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: BoneHandle) -> Option<&mut Bone> {
        self.bones.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, handle: BoneHandle) -> Option<&Transform> {
        self.bones.get(handle).map(|b| &b.transform)
    }

    #[inline]
    pub fn transform_mut(&mut self, handle: BoneHandle) -> Option<&mut Transform> {
        self.bones.get_mut(handle).map(|b| &mut b.transform)
    }

    /// World matrix of a live bone whose world transform has been resolved.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self, handle: BoneHandle) -> Option<Affine3A> {
        self.bones.get(handle)?.transform.world_matrix().copied()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<BoneHandle> {
        self.bones
            .iter()
            .find_map(|(handle, bone)| (bone.name == name).then_some(handle))
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[BoneHandle] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneHandle, &Bone)> {
        self.bones.iter()
    }

    /// Recomputes local matrices that changed and propagates world matrices
    /// from the roots down.
    ///
    /// Uses an explicit stack rather than recursion so deep rigs cannot
    /// overflow. A bone's world matrix is rewritten only when its local
    /// matrix or an ancestor's world matrix changed.
    pub fn update_world_transforms(&mut self) {
        // (bone, parent world matrix, parent changed)
        let mut stack: Vec<(BoneHandle, Affine3A, bool)> = Vec::with_capacity(64);
        for &root in self.roots.iter().rev() {
            stack.push((root, Affine3A::IDENTITY, false));
        }

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(bone) = self.bones.get_mut(handle) else {
                continue;
            };

            let local_changed = bone.transform.update_local_matrix();
            let world_changed =
                local_changed || parent_changed || bone.transform.world_matrix().is_none();

            if world_changed {
                let world = parent_world * *bone.transform.local_matrix();
                bone.transform.set_world_matrix(world);
            }

            let Some(&world) = bone.transform.world_matrix() else {
                continue;
            };
            for &child in bone.children.iter().rev() {
                stack.push((child, world, world_changed));
            }
        }
    }
}
