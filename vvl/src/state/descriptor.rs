use ash::vk;
use parking_lot::Mutex;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct DescriptorSetLayout {
    pub handle: vk::DescriptorSetLayout,
    pub flags: vk::DescriptorSetLayoutCreateFlags,
    pub binding_count: u32,
    pub dynamic_descriptor_count: u32,
}

impl DescriptorSetLayout {
    /// # Safety
    ///
    /// - `create_info.p_bindings` must point to `create_info.binding_count` valid elements.
    pub unsafe fn new(
        handle: vk::DescriptorSetLayout,
        create_info: &vk::DescriptorSetLayoutCreateInfo<'_>,
    ) -> Self {
        let bindings =
            unsafe { crate::ffi::slice_from(create_info.p_bindings, create_info.binding_count) };
        let dynamic_descriptor_count = bindings
            .iter()
            .filter(|binding| {
                matches!(
                    binding.descriptor_type,
                    vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
                        | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
                )
            })
            .map(|binding| binding.descriptor_count)
            .sum();

        DescriptorSetLayout {
            handle,
            flags: create_info.flags,
            binding_count: create_info.binding_count,
            dynamic_descriptor_count,
        }
    }
}

#[derive(Debug)]
pub struct DescriptorPool {
    pub handle: vk::DescriptorPool,
    pub flags: vk::DescriptorPoolCreateFlags,
    pub max_sets: u32,
    sets: Mutex<SmallVec<[vk::DescriptorSet; 8]>>,
}

impl DescriptorPool {
    pub fn new(handle: vk::DescriptorPool, create_info: &vk::DescriptorPoolCreateInfo<'_>) -> Self {
        DescriptorPool {
            handle,
            flags: create_info.flags,
            max_sets: create_info.max_sets,
            sets: Mutex::new(SmallVec::new()),
        }
    }

    /// Whether individual sets may be returned with `vkFreeDescriptorSets`.
    #[inline]
    pub fn allows_free(&self) -> bool {
        self.flags
            .contains(vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET)
    }

    pub fn add_set(&self, set: vk::DescriptorSet) {
        self.sets.lock().push(set);
    }

    pub fn remove_set(&self, set: vk::DescriptorSet) {
        self.sets.lock().retain(|s| *s != set);
    }

    /// Forgets all sets allocated from the pool and returns them.
    pub fn take_sets(&self) -> SmallVec<[vk::DescriptorSet; 8]> {
        std::mem::take(&mut *self.sets.lock())
    }

    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.sets.lock().len()
    }
}

#[derive(Debug)]
pub struct DescriptorSet {
    pub handle: vk::DescriptorSet,
    pub pool: vk::DescriptorPool,
    pub layout: vk::DescriptorSetLayout,
}
