//! Frame driver for all skeleton instances.
//!
//! Instances share nothing mutable, so each frame they are stepped
//! independently. With the `parallel` feature the step is spread over the
//! rayon pool once there are enough instances to make it worthwhile.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use sinew_core::AnimationSettings;
use slotmap::{SlotMap, new_key_type};

use crate::skeleton::SkeletonInstance;

new_key_type! {
    pub struct SkeletonKey;
}

#[derive(Debug, Clone, Default)]
pub struct AnimationWorld {
    instances: SlotMap<SkeletonKey, SkeletonInstance>,
    settings: AnimationSettings,
}

impl AnimationWorld {
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            instances: SlotMap::with_key(),
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut AnimationSettings {
        &mut self.settings
    }

    pub fn insert(&mut self, instance: SkeletonInstance) -> SkeletonKey {
        let key = self.instances.insert(instance);
        log::debug!("added skeleton {key:?}");
        key
    }

    pub fn remove(&mut self, key: SkeletonKey) -> Option<SkeletonInstance> {
        self.instances.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: SkeletonKey) -> Option<&SkeletonInstance> {
        self.instances.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: SkeletonKey) -> Option<&mut SkeletonInstance> {
        self.instances.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkeletonKey, &SkeletonInstance)> {
        self.instances.iter()
    }

    /// Steps every instance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        #[cfg(feature = "parallel")]
        {
            if self.settings.parallel && self.instances.len() >= self.settings.parallel_threshold {
                let instances: Vec<&mut SkeletonInstance> = self.instances.values_mut().collect();
                instances
                    .into_par_iter()
                    .for_each(|instance| instance.update(dt));
                return;
            }
        }

        for instance in self.instances.values_mut() {
            instance.update(dt);
        }
    }
}
