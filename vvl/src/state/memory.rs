use crate::handle::ObjectRef;
use ash::vk;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A `VkDeviceMemory` allocation.
#[derive(Debug)]
pub struct DeviceMemory {
    pub handle: vk::DeviceMemory,
    pub allocation_size: vk::DeviceSize,
    pub memory_type_index: u32,
    /// Property flags of the memory type, empty if the type index was invalid.
    pub property_flags: vk::MemoryPropertyFlags,
    freed: AtomicBool,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    mapped: Option<MappedRange>,
    bound: SmallVec<[ObjectRef; 4]>,
}

/// The range of an allocation that is currently mapped. `size` never is `VK_WHOLE_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappedRange {
    pub offset: vk::DeviceSize,
    pub size: vk::DeviceSize,
}

impl DeviceMemory {
    pub fn new(
        handle: vk::DeviceMemory,
        allocate_info: &vk::MemoryAllocateInfo<'_>,
        property_flags: vk::MemoryPropertyFlags,
    ) -> Self {
        DeviceMemory {
            handle,
            allocation_size: allocate_info.allocation_size,
            memory_type_index: allocate_info.memory_type_index,
            property_flags,
            freed: AtomicBool::new(false),
            state: Mutex::new(MemoryState::default()),
        }
    }

    #[inline]
    pub fn is_host_visible(&self) -> bool {
        self.property_flags
            .contains(vk::MemoryPropertyFlags::HOST_VISIBLE)
    }

    #[inline]
    pub fn mapped(&self) -> Option<MappedRange> {
        self.state.lock().mapped
    }

    /// Records a mapping, resolving `VK_WHOLE_SIZE` against the allocation size.
    pub fn map(&self, offset: vk::DeviceSize, size: vk::DeviceSize) {
        let size = if size == vk::WHOLE_SIZE {
            self.allocation_size.saturating_sub(offset)
        } else {
            size
        };

        self.state.lock().mapped = Some(MappedRange { offset, size });
    }

    pub fn unmap(&self) -> Option<MappedRange> {
        self.state.lock().mapped.take()
    }

    pub fn bind(&self, object: ObjectRef) {
        let mut state = self.state.lock();

        if !state.bound.contains(&object) {
            state.bound.push(object);
        }
    }

    pub fn unbind(&self, object: ObjectRef) {
        self.state.lock().bound.retain(|bound| *bound != object);
    }

    /// The buffers and images currently bound to this allocation.
    pub fn bound_objects(&self) -> SmallVec<[ObjectRef; 4]> {
        self.state.lock().bound.clone()
    }

    /// Whether `vkFreeMemory` was called while resources still referred to the allocation.
    #[inline]
    pub fn is_freed(&self) -> bool {
        self.freed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_freed(&self) {
        self.freed.store(true, Ordering::Release);
        self.state.lock().mapped = None;
    }
}

/// Where a buffer's or image's memory comes from.
#[derive(Clone, Debug)]
pub struct MemoryBinding {
    pub memory: Arc<DeviceMemory>,
    pub offset: vk::DeviceSize,
}

impl MemoryBinding {
    /// A binding stays recorded after its memory is freed, but is no longer usable.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.memory.is_freed()
    }
}

/// The memory side of a buffer or image: its requirements and its binding.
///
/// The binding goes from unbound to bound exactly once for non-sparse resources.
#[derive(Debug, Default)]
pub struct ResourceMemory {
    state: Mutex<ResourceMemoryState>,
}

#[derive(Debug, Default)]
struct ResourceMemoryState {
    requirements: Option<vk::MemoryRequirements>,
    binding: Option<MemoryBinding>,
}

impl ResourceMemory {
    #[inline]
    pub fn requirements(&self) -> Option<vk::MemoryRequirements> {
        self.state.lock().requirements
    }

    pub fn set_requirements(&self, requirements: vk::MemoryRequirements) {
        self.state.lock().requirements = Some(requirements);
    }

    #[inline]
    pub fn binding(&self) -> Option<MemoryBinding> {
        self.state.lock().binding.clone()
    }

    pub fn bind(&self, memory: Arc<DeviceMemory>, offset: vk::DeviceSize) {
        self.state.lock().binding = Some(MemoryBinding { memory, offset });
    }

    pub fn unbind(&self) -> Option<MemoryBinding> {
        self.state.lock().binding.take()
    }
}

#[derive(Debug)]
pub struct Buffer {
    pub handle: vk::Buffer,
    pub size: vk::DeviceSize,
    pub usage: vk::BufferUsageFlags,
    pub flags: vk::BufferCreateFlags,
    pub memory: ResourceMemory,
}

impl Buffer {
    pub fn new(handle: vk::Buffer, create_info: &vk::BufferCreateInfo<'_>) -> Self {
        Buffer {
            handle,
            size: create_info.size,
            usage: create_info.usage,
            flags: create_info.flags,
            memory: ResourceMemory::default(),
        }
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.flags.contains(vk::BufferCreateFlags::SPARSE_BINDING)
    }
}

#[derive(Debug)]
pub struct Image {
    pub handle: vk::Image,
    pub image_type: vk::ImageType,
    pub format: vk::Format,
    pub extent: vk::Extent3D,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub flags: vk::ImageCreateFlags,
    pub memory: ResourceMemory,
}

impl Image {
    pub fn new(handle: vk::Image, create_info: &vk::ImageCreateInfo<'_>) -> Self {
        Image {
            handle,
            image_type: create_info.image_type,
            format: create_info.format,
            extent: create_info.extent,
            mip_levels: create_info.mip_levels,
            array_layers: create_info.array_layers,
            tiling: create_info.tiling,
            usage: create_info.usage,
            flags: create_info.flags,
            memory: ResourceMemory::default(),
        }
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.flags.contains(vk::ImageCreateFlags::SPARSE_BINDING)
    }
}

#[derive(Debug)]
pub struct ImageView {
    pub handle: vk::ImageView,
    pub image: vk::Image,
    pub view_type: vk::ImageViewType,
    pub format: vk::Format,
}

impl ImageView {
    pub fn new(handle: vk::ImageView, create_info: &vk::ImageViewCreateInfo<'_>) -> Self {
        ImageView {
            handle,
            image: create_info.image,
            view_type: create_info.view_type,
            format: create_info.format,
        }
    }
}
