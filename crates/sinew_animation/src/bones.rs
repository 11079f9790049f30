use sinew_core::Transform;

/// Dense view of a skeleton's bone transforms, indexed by the bone index
/// curves are authored against.
///
/// `None` means the bone has no live transform right now. Writers skip such
/// bones and carry on with the rest of the pose.
pub trait BoneTransforms {
    /// Number of bone slots, including ones that are currently missing.
    fn bone_count(&self) -> usize;

    fn local(&self, bone_index: usize) -> Option<&Transform>;

    fn local_mut(&mut self, bone_index: usize) -> Option<&mut Transform>;
}

impl BoneTransforms for [Transform] {
    fn bone_count(&self) -> usize {
        self.len()
    }

    fn local(&self, bone_index: usize) -> Option<&Transform> {
        self.get(bone_index)
    }

    fn local_mut(&mut self, bone_index: usize) -> Option<&mut Transform> {
        self.get_mut(bone_index)
    }
}

impl BoneTransforms for [Option<Transform>] {
    fn bone_count(&self) -> usize {
        self.len()
    }

    fn local(&self, bone_index: usize) -> Option<&Transform> {
        self.get(bone_index)?.as_ref()
    }

    fn local_mut(&mut self, bone_index: usize) -> Option<&mut Transform> {
        self.get_mut(bone_index)?.as_mut()
    }
}
