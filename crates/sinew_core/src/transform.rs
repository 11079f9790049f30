use glam::{Affine3A, Mat4, Quat, Vec3};

/// Local transform of a single bone.
///
/// Holds the bone's position, rotation and scale (TRS), a separate
/// `post_scale` written by animation, cached local/world matrices and the
/// shadow state used for dirty checking.
///
/// The local matrix is `TRS(scale, rotation, position) * Scale(post_scale)`.
/// Keeping the animated scale out of the TRS avoids shear when a scaled
/// parent is composed with a rotated child.
#[derive(Debug, Clone)]
pub struct Transform {
    // === Public properties ===
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Post-transform scale factor, driven by scale curves.
    pub post_scale: Vec3,

    // === Matrix cache ===
    local_matrix: Affine3A,
    world_matrix: Affine3A,
    world_resolved: bool,

    // === Dirty-check shadow state ===
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    last_post_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            post_scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            world_resolved: false,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            last_post_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Creates a transform at `position` with `rotation` and unit scale.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::new()
        }
    }

    // ========================================================================
    // Dirty checking
    // ========================================================================

    /// Recomputes the local matrix if any property changed since the last call.
    ///
    /// Returns whether the matrix changed.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.post_scale != self.last_post_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
                    * Affine3A::from_scale(self.post_scale);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.last_post_scale = self.post_scale;
            self.force_update = false;
        }

        changed
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// World matrix, or `None` until the hierarchy pass has resolved it once.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Option<&Affine3A> {
        self.world_resolved.then_some(&self.world_matrix)
    }

    /// World matrix as a `Mat4`, for skinning.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Option<Mat4> {
        self.world_matrix().map(|m| Mat4::from(*m))
    }

    /// Written by the hierarchy pass after the parent chain is resolved.
    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
        self.world_resolved = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
