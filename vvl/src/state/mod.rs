//! The shadow model of all live Vulkan objects.
//!
//! [`InstanceState`] and [`DeviceState`] own one [`ObjectMap`] per object type. Each map is
//! guarded by its own `RwLock`, which is held only while an entry is looked up, inserted or
//! removed; the `Arc` handed out lets the caller keep using the entry after the lock is gone.
//! Fields that change after creation sit behind a per-object `Mutex`.
//!
//! The state is written exclusively by the state trackers ([`InstanceStateTracker`],
//! [`DeviceStateTracker`]) from their record hooks. Validators read it from their validate hooks.

pub use self::{
    command_buffer::{
        CommandBuffer, CommandBufferRecording, CommandBufferState, CommandPool, RenderPassInstance,
    },
    descriptor::{DescriptorPool, DescriptorSet, DescriptorSetLayout},
    device::{DeviceState, DeviceStateTracker, EnabledFeatures},
    instance::{InstanceState, InstanceStateTracker, PhysicalDeviceInfo},
    memory::{Buffer, DeviceMemory, Image, ImageView, MappedRange, MemoryBinding, ResourceMemory},
    pipeline::{Pipeline, PipelineLayout, ShaderModule, ShaderObject},
    render_pass::{Framebuffer, RenderPass},
    sync::{Fence, FenceState, Queue, Semaphore, SemaphoreState, Submission},
};
use foldhash::HashMap;
use parking_lot::RwLock;
use std::{fmt, hash::Hash, sync::Arc};

mod command_buffer;
mod descriptor;
mod device;
mod instance;
mod memory;
mod pipeline;
mod render_pass;
mod sync;

/// A map from a Vulkan handle to the shared state of that object.
pub struct ObjectMap<H, T> {
    map: RwLock<HashMap<H, Arc<T>>>,
}

impl<H, T> ObjectMap<H, T>
where
    H: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        ObjectMap {
            map: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        self.map.read().get(&handle).cloned()
    }

    #[inline]
    pub fn contains(&self, handle: H) -> bool {
        self.map.read().contains_key(&handle)
    }

    /// Inserts the state of a newly created object, replacing any stale entry with the same
    /// handle.
    pub fn insert(&self, handle: H, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.map.write().insert(handle, value.clone());

        value
    }

    pub fn remove(&self, handle: H) -> Option<Arc<T>> {
        self.map.write().remove(&handle)
    }

    /// Removes every entry for which `f` returns `false`, and returns the removed entries.
    pub fn extract_if_not(&self, mut f: impl FnMut(&T) -> bool) -> Vec<Arc<T>> {
        let mut removed = Vec::new();

        self.map.write().retain(|_, value| {
            let keep = f(value);

            if !keep {
                removed.push(value.clone());
            }

            keep
        });

        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Returns a snapshot of the current handles.
    pub fn handles(&self) -> Vec<H> {
        self.map.read().keys().copied().collect()
    }

    /// Returns a snapshot of the current entries.
    pub fn values(&self) -> Vec<Arc<T>> {
        self.map.read().values().cloned().collect()
    }
}

impl<H, T> Default for ObjectMap<H, T>
where
    H: Copy + Eq + Hash,
{
    fn default() -> Self {
        ObjectMap::new()
    }
}

impl<H, T> fmt::Debug for ObjectMap<H, T>
where
    H: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.read().keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectMap;
    use ash::vk::{self, Handle};

    #[test]
    fn object_map() {
        let map = ObjectMap::new();
        let a = vk::Buffer::from_raw(1);
        let b = vk::Buffer::from_raw(2);
        map.insert(a, 10u32);
        map.insert(b, 20u32);

        assert_eq!(map.get(a).as_deref(), Some(&10));
        assert!(map.contains(b));
        assert_eq!(map.len(), 2);

        let removed = map.extract_if_not(|&value| value < 15);
        assert_eq!(removed.len(), 1);
        assert_eq!(*removed[0], 20);
        assert!(!map.contains(b));

        assert_eq!(map.remove(a).as_deref(), Some(&10));
        assert!(map.handles().is_empty());
    }
}
