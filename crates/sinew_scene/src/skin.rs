use std::sync::Arc;

use glam::Mat4;
use sinew_core::{Result, SinewError};

use crate::hierarchy::{BoneHandle, BoneHierarchy};

/// Root world matrices with a smaller |det| are treated as non-invertible.
pub const MIN_ROOT_DETERMINANT: f32 = 1e-8;

/// Skinning data for one mesh bound to a skeleton.
///
/// `bones[i]` pairs with `bind_poses[i]` and produces `matrices()[i]`, which
/// is the joint index the deformation shader expects.
#[derive(Debug, Clone)]
pub struct Skin {
    root: BoneHandle,
    bones: Vec<BoneHandle>,
    /// Rest pose of each bone relative to the mesh. Shared, never mutated.
    bind_poses: Arc<[Mat4]>,
    matrices: Vec<Mat4>,
}

impl Skin {
    pub fn new(
        root: BoneHandle,
        bones: Vec<BoneHandle>,
        bind_poses: impl Into<Arc<[Mat4]>>,
    ) -> Result<Self> {
        let bind_poses = bind_poses.into();
        if bones.len() != bind_poses.len() {
            return Err(SinewError::SkinLengthMismatch {
                bones: bones.len(),
                bind_poses: bind_poses.len(),
            });
        }
        let matrices = vec![Mat4::IDENTITY; bones.len()];
        Ok(Self {
            root,
            bones,
            bind_poses,
            matrices,
        })
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> BoneHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneHandle] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bind_poses(&self) -> &[Mat4] {
        &self.bind_poses
    }

    /// Skin matrices from the last [`compute`](Self::compute).
    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// The matrices as raw bytes, ready for a storage buffer upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
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

    /// Computes `inverse(root world) * bone world * bind pose` for every bone.
    ///
    /// World transforms must already be propagated. Bones whose world matrix
    /// is unavailable keep their previous skin matrix; if the root itself is
    /// unavailable or not invertible the whole batch is left as is. Returns
    /// the number of matrices written.
    pub fn compute(&mut self, hierarchy: &BoneHierarchy) -> usize {
        let Some(root_world) = hierarchy.world_matrix(self.root) else {
            log::trace!("skin root has no resolved world transform, skipping");
            return 0;
        };
        let det = root_world.matrix3.determinant();
        if !det.is_finite() || det.abs() < MIN_ROOT_DETERMINANT {
            log::trace!("skin root world matrix is not invertible (det {det}), skipping");
            return 0;
        }
        let root_inv = root_world.inverse();

        let mut written = 0;
        for ((&bone, bind_pose), out) in self
            .bones
            .iter()
            .zip(self.bind_poses.iter())
            .zip(self.matrices.iter_mut())
        {
            let Some(world) = hierarchy.world_matrix(bone) else {
                log::trace!("skin bone {bone:?} has no resolved world transform");
                continue;
            };
            *out = Mat4::from(root_inv * world) * *bind_pose;
            written += 1;
        }
        written
    }
}
