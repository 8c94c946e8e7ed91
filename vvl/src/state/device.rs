use super::{
    instance::extension_names, Buffer, CommandBuffer, CommandBufferState, CommandPool,
    DescriptorPool, DescriptorSet, DescriptorSetLayout, DeviceMemory, Fence, FenceState,
    Framebuffer, Image, ImageView, InstanceState, ObjectMap, PhysicalDeviceInfo, Pipeline,
    PipelineLayout, Queue, RenderPass, RenderPassInstance, Semaphore, SemaphoreState,
    ShaderModule, ShaderObject, Submission,
};
use crate::{
    commands::{DeviceDispatchTable, DeviceValidator},
    ffi::{chain_find, opt_ref, slice_from},
    handle::ObjectRef,
    version::Version,
    RecordObject,
};
use ash::vk;
use smallvec::SmallVec;
use std::{ffi::c_void, sync::Arc};

/// The device features the application enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnabledFeatures {
    pub core: vk::PhysicalDeviceFeatures,
    pub dynamic_rendering: bool,
    pub shader_object: bool,
    pub task_shader: bool,
    pub mesh_shader: bool,
}

impl EnabledFeatures {
    /// Collects the features from `pEnabledFeatures` and the `pNext` chain.
    ///
    /// # Safety
    ///
    /// - `create_info` must be a valid `VkDeviceCreateInfo`.
    pub unsafe fn from_create_info(create_info: &vk::DeviceCreateInfo<'_>) -> Self {
        let p_next = create_info.p_next;
        let mut features = EnabledFeatures::default();

        unsafe {
            if let Some(core) = opt_ref(create_info.p_enabled_features) {
                features.core = *core;
            }

            if let Some(features2) = chain_find::<vk::PhysicalDeviceFeatures2<'_>>(
                p_next,
                vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
            ) {
                features.core = features2.features;
            }

            if let Some(vulkan_13) = chain_find::<vk::PhysicalDeviceVulkan13Features<'_>>(
                p_next,
                vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
            ) {
                features.dynamic_rendering |= vulkan_13.dynamic_rendering != vk::FALSE;
            }

            if let Some(dynamic_rendering) = chain_find::<
                vk::PhysicalDeviceDynamicRenderingFeatures<'_>,
            >(
                p_next,
                vk::StructureType::PHYSICAL_DEVICE_DYNAMIC_RENDERING_FEATURES,
            ) {
                features.dynamic_rendering |= dynamic_rendering.dynamic_rendering != vk::FALSE;
            }

            if let Some(shader_object) = chain_find::<
                vk::PhysicalDeviceShaderObjectFeaturesEXT<'_>,
            >(
                p_next,
                vk::StructureType::PHYSICAL_DEVICE_SHADER_OBJECT_FEATURES_EXT,
            ) {
                features.shader_object = shader_object.shader_object != vk::FALSE;
            }

            if let Some(mesh_shader) = chain_find::<vk::PhysicalDeviceMeshShaderFeaturesEXT<'_>>(
                p_next,
                vk::StructureType::PHYSICAL_DEVICE_MESH_SHADER_FEATURES_EXT,
            ) {
                features.task_shader = mesh_shader.task_shader != vk::FALSE;
                features.mesh_shader = mesh_shader.mesh_shader != vk::FALSE;
            }
        }

        features
    }
}

/// The shadow state of one `VkDevice` and every object created from it.
#[derive(Debug)]
pub struct DeviceState {
    pub handle: vk::Device,
    pub physical_device: vk::PhysicalDevice,
    pub physical_device_info: Arc<PhysicalDeviceInfo>,
    pub instance: Arc<InstanceState>,
    /// The lower of the instance's and the physical device's API version.
    pub api_version: Version,
    pub enabled_extensions: Vec<String>,
    pub enabled_features: EnabledFeatures,
    /// `(queueFamilyIndex, queueCount)` of every `VkDeviceQueueCreateInfo`.
    pub queue_create_infos: Vec<(u32, u32)>,

    pub queues: ObjectMap<vk::Queue, Queue>,
    pub memories: ObjectMap<vk::DeviceMemory, DeviceMemory>,
    pub buffers: ObjectMap<vk::Buffer, Buffer>,
    pub images: ObjectMap<vk::Image, Image>,
    pub image_views: ObjectMap<vk::ImageView, ImageView>,
    pub fences: ObjectMap<vk::Fence, Fence>,
    pub semaphores: ObjectMap<vk::Semaphore, Semaphore>,
    pub shader_modules: ObjectMap<vk::ShaderModule, ShaderModule>,
    pub shader_objects: ObjectMap<vk::ShaderEXT, ShaderObject>,
    pub pipeline_layouts: ObjectMap<vk::PipelineLayout, PipelineLayout>,
    pub pipelines: ObjectMap<vk::Pipeline, Pipeline>,
    pub render_passes: ObjectMap<vk::RenderPass, RenderPass>,
    pub framebuffers: ObjectMap<vk::Framebuffer, Framebuffer>,
    pub descriptor_set_layouts: ObjectMap<vk::DescriptorSetLayout, DescriptorSetLayout>,
    pub descriptor_pools: ObjectMap<vk::DescriptorPool, DescriptorPool>,
    pub descriptor_sets: ObjectMap<vk::DescriptorSet, DescriptorSet>,
    pub command_pools: ObjectMap<vk::CommandPool, CommandPool>,
    pub command_buffers: ObjectMap<vk::CommandBuffer, CommandBuffer>,
}

impl DeviceState {
    /// # Safety
    ///
    /// - `create_info` must be the valid `VkDeviceCreateInfo` that `handle` was created with.
    /// - `physical_device` must belong to `instance`.
    pub unsafe fn new(
        handle: vk::Device,
        physical_device: vk::PhysicalDevice,
        instance: Arc<InstanceState>,
        create_info: &vk::DeviceCreateInfo<'_>,
    ) -> Self {
        let physical_device_info = unsafe { instance.physical_device_info(physical_device) };
        let api_version = instance.api_version.min(physical_device_info.api_version());
        let enabled_extensions = unsafe {
            extension_names(
                create_info.pp_enabled_extension_names,
                create_info.enabled_extension_count,
            )
        };
        let enabled_features = unsafe { EnabledFeatures::from_create_info(create_info) };
        let queue_create_infos = unsafe {
            slice_from(
                create_info.p_queue_create_infos,
                create_info.queue_create_info_count,
            )
        }
        .iter()
        .map(|info| (info.queue_family_index, info.queue_count))
        .collect();

        DeviceState {
            handle,
            physical_device,
            physical_device_info,
            instance,
            api_version,
            enabled_extensions,
            enabled_features,
            queue_create_infos,
            queues: ObjectMap::new(),
            memories: ObjectMap::new(),
            buffers: ObjectMap::new(),
            images: ObjectMap::new(),
            image_views: ObjectMap::new(),
            fences: ObjectMap::new(),
            semaphores: ObjectMap::new(),
            shader_modules: ObjectMap::new(),
            shader_objects: ObjectMap::new(),
            pipeline_layouts: ObjectMap::new(),
            pipelines: ObjectMap::new(),
            render_passes: ObjectMap::new(),
            framebuffers: ObjectMap::new(),
            descriptor_set_layouts: ObjectMap::new(),
            descriptor_pools: ObjectMap::new(),
            descriptor_sets: ObjectMap::new(),
            command_pools: ObjectMap::new(),
            command_buffers: ObjectMap::new(),
        }
    }

    #[inline]
    pub fn is_extension_enabled(&self, name: &str) -> bool {
        self.enabled_extensions.iter().any(|e| e == name)
    }

    /// Number of queues created in `queue_family_index`, or `None` if no queues were requested
    /// from that family.
    pub fn queue_count(&self, queue_family_index: u32) -> Option<u32> {
        self.queue_create_infos
            .iter()
            .find(|&&(family, _)| family == queue_family_index)
            .map(|&(_, count)| count)
    }

    /// Invalidates every command buffer whose recording uses `object`.
    pub fn invalidate_command_buffers(&self, object: ObjectRef) {
        for command_buffer in self.command_buffers.values() {
            let mut recording = command_buffer.lock();

            if recording.references(object) {
                log::trace!(
                    "{:?} invalidated by a change to {:?}",
                    command_buffer.handle,
                    object,
                );
                recording.invalidate(object);
            }
        }
    }

    /// Returns a pending command buffer whose recording uses `object`.
    pub fn pending_command_buffer_using(&self, object: ObjectRef) -> Option<vk::CommandBuffer> {
        self.command_buffers
            .values()
            .into_iter()
            .find(|command_buffer| {
                let recording = command_buffer.lock();
                recording.state == CommandBufferState::Pending && recording.references(object)
            })
            .map(|command_buffer| command_buffer.handle)
    }

    /// Every object created from the device that hasn't been destroyed yet.
    pub fn live_objects(&self) -> Vec<ObjectRef> {
        fn extend<H>(objects: &mut Vec<ObjectRef>, handles: Vec<H>)
        where
            H: vk::Handle,
        {
            objects.extend(handles.into_iter().map(ObjectRef::from));
        }

        let mut objects = Vec::new();
        extend(&mut objects, self.command_buffers.handles());
        extend(&mut objects, self.command_pools.handles());
        extend(&mut objects, self.descriptor_sets.handles());
        extend(&mut objects, self.descriptor_pools.handles());
        extend(&mut objects, self.descriptor_set_layouts.handles());
        extend(&mut objects, self.framebuffers.handles());
        extend(&mut objects, self.render_passes.handles());
        extend(&mut objects, self.pipelines.handles());
        extend(&mut objects, self.pipeline_layouts.handles());
        extend(&mut objects, self.shader_objects.handles());
        extend(&mut objects, self.shader_modules.handles());
        extend(&mut objects, self.semaphores.handles());
        extend(&mut objects, self.fences.handles());
        extend(&mut objects, self.image_views.handles());
        extend(&mut objects, self.images.handles());
        extend(&mut objects, self.buffers.handles());
        extend(&mut objects, self.memories.handles());

        objects
    }

    /// The command buffers of a submission, followed by the secondaries they execute.
    fn submitted_command_buffers(
        &self,
        command_buffers: &[vk::CommandBuffer],
    ) -> SmallVec<[Arc<CommandBuffer>; 4]> {
        let mut submitted = SmallVec::new();

        for &handle in command_buffers {
            let Some(command_buffer) = self.command_buffers.get(handle) else {
                continue;
            };
            let secondaries = command_buffer.lock().secondaries.clone();
            submitted.push(command_buffer);
            submitted.extend(
                secondaries
                    .into_iter()
                    .filter_map(|secondary| self.command_buffers.get(secondary)),
            );
        }

        submitted
    }

    /// Applies the completion of `submissions` to the command buffers and fences they used.
    pub fn retire_submissions(&self, submissions: Vec<Submission>) {
        for submission in submissions {
            log::trace!("retiring submission {}", submission.seq);

            for command_buffer in self.submitted_command_buffers(&submission.command_buffers) {
                command_buffer.lock().retire();
            }

            if let Some(fence) = self.fences.get(submission.fence) {
                if matches!(fence.state(), FenceState::Inflight { seq, .. } if seq == submission.seq)
                {
                    fence.set_state(FenceState::Signaled);
                }
            }
        }
    }

    /// Called when `fence` was observed signaled: retires its submission and everything queued
    /// before it.
    pub fn retire_fence(&self, fence: vk::Fence) {
        let Some(fence_state) = self.fences.get(fence) else {
            return;
        };

        if let FenceState::Inflight { queue, seq } = fence_state.state() {
            if let Some(queue) = self.queues.get(queue) {
                self.retire_submissions(queue.retire_through(seq));
            }
        }

        fence_state.set_state(FenceState::Signaled);
    }

    pub fn retire_queue(&self, queue: vk::Queue) {
        if let Some(queue) = self.queues.get(queue) {
            self.retire_submissions(queue.retire_all());
        }
    }

    pub fn retire_all(&self) {
        for queue in self.queues.values() {
            self.retire_submissions(queue.retire_all());
        }
    }
}

/// Keeps [`DeviceState`] current. Always the first device validator.
///
/// Creation is recorded after the driver succeeded. Destruction is recorded before the call is
/// forwarded, so the handle can't be reused by another thread while it is still in the maps.
pub struct DeviceStateTracker {
    state: Arc<DeviceState>,
    table: DeviceDispatchTable,
}

impl DeviceStateTracker {
    pub fn new(state: Arc<DeviceState>, table: DeviceDispatchTable) -> Self {
        DeviceStateTracker { state, table }
    }

    #[inline]
    pub fn state(&self) -> &Arc<DeviceState> {
        &self.state
    }

    /// Runs `f` on the recording of `command_buffer`, if the command buffer is known.
    fn record<R>(
        &self,
        command_buffer: vk::CommandBuffer,
        f: impl FnOnce(&mut super::CommandBufferRecording) -> R,
    ) -> Option<R> {
        let command_buffer = self.state.command_buffers.get(command_buffer)?;
        let mut recording = command_buffer.lock();

        Some(f(&mut recording))
    }

    fn destroyed(&self, object: ObjectRef) {
        self.state.invalidate_command_buffers(object);
    }
}

/// Returns the handles a creation command wrote, skipping null entries left by failed creations.
///
/// # Safety
///
/// - `p_handles` must point to `count` elements.
unsafe fn created<'a, H>(p_handles: *mut H, count: u32) -> impl Iterator<Item = (usize, H)> + 'a
where
    H: vk::Handle + Copy + 'a,
{
    unsafe { slice_from(p_handles.cast_const(), count) }
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, handle)| handle.as_raw() != 0)
}

impl DeviceValidator for DeviceStateTracker {
    unsafe fn pre_call_record_destroy_device(
        &self,
        device: vk::Device,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.state.instance.devices.lock().remove(&device);
    }

    unsafe fn post_call_record_get_device_queue(
        &self,
        _device: vk::Device,
        queue_family_index: u32,
        queue_index: u32,
        p_queue: *mut vk::Queue,
        _record_obj: &RecordObject,
    ) {
        let queue = unsafe { *p_queue };

        if queue != vk::Queue::null() && !self.state.queues.contains(queue) {
            self.state
                .queues
                .insert(queue, Queue::new(queue, queue_family_index, queue_index));
        }
    }

    unsafe fn post_call_record_device_wait_idle(
        &self,
        _device: vk::Device,
        record_obj: &RecordObject,
    ) {
        if record_obj.result == Some(vk::Result::SUCCESS) {
            self.state.retire_all();
        }
    }

    unsafe fn post_call_record_queue_submit(
        &self,
        queue: vk::Queue,
        submit_count: u32,
        p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
        record_obj: &RecordObject,
    ) {
        if record_obj.result != Some(vk::Result::SUCCESS) {
            return;
        }

        let Some(queue_state) = self.state.queues.get(queue) else {
            return;
        };
        let submits = unsafe { slice_from(p_submits, submit_count) };
        let mut last_seq = None;

        for (index, submit) in submits.iter().enumerate() {
            let command_buffers: SmallVec<[_; 4]> =
                unsafe { slice_from(submit.p_command_buffers, submit.command_buffer_count) }
                    .iter()
                    .copied()
                    .collect();
            let wait_semaphores: SmallVec<[_; 4]> =
                unsafe { slice_from(submit.p_wait_semaphores, submit.wait_semaphore_count) }
                    .iter()
                    .copied()
                    .collect();
            let signal_semaphores: SmallVec<[_; 4]> =
                unsafe { slice_from(submit.p_signal_semaphores, submit.signal_semaphore_count) }
                    .iter()
                    .copied()
                    .collect();

            for command_buffer in self.state.submitted_command_buffers(&command_buffers) {
                command_buffer.lock().submit();
            }

            for &semaphore in &wait_semaphores {
                if let Some(semaphore) = self.state.semaphores.get(semaphore) {
                    semaphore.set_state(SemaphoreState::Unsignaled);
                }
            }

            for &semaphore in &signal_semaphores {
                if let Some(semaphore) = self.state.semaphores.get(semaphore) {
                    semaphore.set_state(SemaphoreState::Signaled);
                }
            }

            let is_last = index + 1 == submits.len();
            last_seq = Some(queue_state.push_submission(Submission {
                seq: 0,
                command_buffers,
                wait_semaphores,
                signal_semaphores,
                fence: if is_last { fence } else { vk::Fence::null() },
            }));
        }

        if let Some(fence_state) = self.state.fences.get(fence) {
            let seq = last_seq.unwrap_or_else(|| {
                queue_state.push_submission(Submission {
                    fence,
                    ..Default::default()
                })
            });
            fence_state.set_state(FenceState::Inflight { queue, seq });
        }
    }

    unsafe fn post_call_record_queue_wait_idle(&self, queue: vk::Queue, record_obj: &RecordObject) {
        if record_obj.result == Some(vk::Result::SUCCESS) {
            self.state.retire_queue(queue);
        }
    }

    unsafe fn post_call_record_allocate_memory(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::MemoryAllocateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_memory: *mut vk::DeviceMemory,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let allocate_info = unsafe { &*p_allocate_info };
        let memory = unsafe { *p_memory };
        let property_flags = self
            .state
            .physical_device_info
            .memory_type_flags(allocate_info.memory_type_index)
            .unwrap_or_default();

        self.state.memories.insert(
            memory,
            DeviceMemory::new(memory, allocate_info, property_flags),
        );
    }

    unsafe fn pre_call_record_free_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if let Some(memory_state) = self.state.memories.remove(memory) {
            memory_state.mark_freed();
            self.destroyed(memory.into());
        }
    }

    unsafe fn post_call_record_map_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        _flags: vk::MemoryMapFlags,
        _pp_data: *mut *mut c_void,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            if let Some(memory) = self.state.memories.get(memory) {
                memory.map(offset, size);
            }
        }
    }

    unsafe fn pre_call_record_unmap_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _record_obj: &RecordObject,
    ) {
        if let Some(memory) = self.state.memories.get(memory) {
            memory.unmap();
        }
    }

    unsafe fn post_call_record_create_buffer(
        &self,
        device: vk::Device,
        p_create_info: *const vk::BufferCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_buffer: *mut vk::Buffer,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let handle = unsafe { *p_buffer };
        let buffer = self
            .state
            .buffers
            .insert(handle, Buffer::new(handle, unsafe { &*p_create_info }));

        if let Some(get_requirements) = self.table.get_buffer_memory_requirements {
            let mut requirements = vk::MemoryRequirements::default();
            unsafe { get_requirements(device, handle, &mut requirements) };
            buffer.memory.set_requirements(requirements);
        }
    }

    unsafe fn pre_call_record_destroy_buffer(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if let Some(buffer_state) = self.state.buffers.remove(buffer) {
            if let Some(binding) = buffer_state.memory.unbind() {
                binding.memory.unbind(buffer.into());
            }

            self.destroyed(buffer.into());
        }
    }

    unsafe fn post_call_record_bind_buffer_memory(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        if let (Some(buffer_state), Some(memory_state)) = (
            self.state.buffers.get(buffer),
            self.state.memories.get(memory),
        ) {
            memory_state.bind(buffer.into());
            buffer_state.memory.bind(memory_state, memory_offset);
        }
    }

    unsafe fn post_call_record_get_buffer_memory_requirements(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        p_memory_requirements: *mut vk::MemoryRequirements,
        _record_obj: &RecordObject,
    ) {
        if let Some(buffer) = self.state.buffers.get(buffer) {
            buffer
                .memory
                .set_requirements(unsafe { *p_memory_requirements });
        }
    }

    unsafe fn post_call_record_create_image(
        &self,
        device: vk::Device,
        p_create_info: *const vk::ImageCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_image: *mut vk::Image,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let handle = unsafe { *p_image };
        let image = self
            .state
            .images
            .insert(handle, Image::new(handle, unsafe { &*p_create_info }));

        if let Some(get_requirements) = self.table.get_image_memory_requirements {
            let mut requirements = vk::MemoryRequirements::default();
            unsafe { get_requirements(device, handle, &mut requirements) };
            image.memory.set_requirements(requirements);
        }
    }

    unsafe fn pre_call_record_destroy_image(
        &self,
        _device: vk::Device,
        image: vk::Image,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if let Some(image_state) = self.state.images.remove(image) {
            if let Some(binding) = image_state.memory.unbind() {
                binding.memory.unbind(image.into());
            }

            self.destroyed(image.into());
        }
    }

    unsafe fn post_call_record_bind_image_memory(
        &self,
        _device: vk::Device,
        image: vk::Image,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        if let (Some(image_state), Some(memory_state)) = (
            self.state.images.get(image),
            self.state.memories.get(memory),
        ) {
            memory_state.bind(image.into());
            image_state.memory.bind(memory_state, memory_offset);
        }
    }

    unsafe fn post_call_record_get_image_memory_requirements(
        &self,
        _device: vk::Device,
        image: vk::Image,
        p_memory_requirements: *mut vk::MemoryRequirements,
        _record_obj: &RecordObject,
    ) {
        if let Some(image) = self.state.images.get(image) {
            image
                .memory
                .set_requirements(unsafe { *p_memory_requirements });
        }
    }

    unsafe fn post_call_record_create_image_view(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::ImageViewCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_view: *mut vk::ImageView,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_view };
            self.state
                .image_views
                .insert(handle, ImageView::new(handle, unsafe { &*p_create_info }));
        }
    }

    unsafe fn pre_call_record_destroy_image_view(
        &self,
        _device: vk::Device,
        image_view: vk::ImageView,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.image_views.remove(image_view).is_some() {
            self.destroyed(image_view.into());
        }
    }

    unsafe fn post_call_record_create_fence(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::FenceCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_fence: *mut vk::Fence,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_fence };
            self.state
                .fences
                .insert(handle, Fence::new(handle, unsafe { &*p_create_info }));
        }
    }

    unsafe fn pre_call_record_destroy_fence(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.state.fences.remove(fence);
    }

    unsafe fn post_call_record_reset_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        for &fence in unsafe { slice_from(p_fences, fence_count) } {
            if let Some(fence) = self.state.fences.get(fence) {
                fence.set_state(FenceState::Unsignaled);
            }
        }
    }

    unsafe fn post_call_record_get_fence_status(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        record_obj: &RecordObject,
    ) {
        if record_obj.result == Some(vk::Result::SUCCESS) {
            self.state.retire_fence(fence);
        }
    }

    unsafe fn post_call_record_wait_for_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        wait_all: vk::Bool32,
        _timeout: u64,
        record_obj: &RecordObject,
    ) {
        // With `waitAll` false, success only tells that one of several fences signaled.
        if record_obj.result != Some(vk::Result::SUCCESS)
            || (wait_all == vk::FALSE && fence_count > 1)
        {
            return;
        }

        for &fence in unsafe { slice_from(p_fences, fence_count) } {
            self.state.retire_fence(fence);
        }
    }

    unsafe fn post_call_record_create_semaphore(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::SemaphoreCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_semaphore: *mut vk::Semaphore,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_semaphore };
            self.state
                .semaphores
                .insert(handle, unsafe { Semaphore::new(handle, &*p_create_info) });
        }
    }

    unsafe fn pre_call_record_destroy_semaphore(
        &self,
        _device: vk::Device,
        semaphore: vk::Semaphore,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.state.semaphores.remove(semaphore);
    }

    unsafe fn post_call_record_create_shader_module(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::ShaderModuleCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_shader_module: *mut vk::ShaderModule,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_shader_module };
            self.state.shader_modules.insert(
                handle,
                ShaderModule {
                    handle,
                    code_size: unsafe { (*p_create_info).code_size },
                },
            );
        }
    }

    unsafe fn pre_call_record_destroy_shader_module(
        &self,
        _device: vk::Device,
        shader_module: vk::ShaderModule,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.state.shader_modules.remove(shader_module);
    }

    unsafe fn post_call_record_create_pipeline_layout(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::PipelineLayoutCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_pipeline_layout: *mut vk::PipelineLayout,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_pipeline_layout };
            let layout = unsafe {
                PipelineLayout::new(handle, &*p_create_info, &self.state.descriptor_set_layouts)
            };
            self.state.pipeline_layouts.insert(handle, layout);
        }
    }

    unsafe fn pre_call_record_destroy_pipeline_layout(
        &self,
        _device: vk::Device,
        pipeline_layout: vk::PipelineLayout,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.pipeline_layouts.remove(pipeline_layout).is_some() {
            self.destroyed(pipeline_layout.into());
        }
    }

    unsafe fn post_call_record_create_graphics_pipelines(
        &self,
        _device: vk::Device,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::GraphicsPipelineCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_pipelines: *mut vk::Pipeline,
        _record_obj: &RecordObject,
    ) {
        let create_infos = unsafe { slice_from(p_create_infos, create_info_count) };

        for (index, handle) in unsafe { created(p_pipelines, create_info_count) } {
            let pipeline = unsafe { Pipeline::graphics(handle, &create_infos[index]) };
            self.state.pipelines.insert(handle, pipeline);
        }
    }

    unsafe fn post_call_record_create_compute_pipelines(
        &self,
        _device: vk::Device,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_pipelines: *mut vk::Pipeline,
        _record_obj: &RecordObject,
    ) {
        let create_infos = unsafe { slice_from(p_create_infos, create_info_count) };

        for (index, handle) in unsafe { created(p_pipelines, create_info_count) } {
            self.state
                .pipelines
                .insert(handle, Pipeline::compute(handle, &create_infos[index]));
        }
    }

    unsafe fn pre_call_record_destroy_pipeline(
        &self,
        _device: vk::Device,
        pipeline: vk::Pipeline,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.pipelines.remove(pipeline).is_some() {
            self.destroyed(pipeline.into());
        }
    }

    unsafe fn post_call_record_create_descriptor_set_layout(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::DescriptorSetLayoutCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_set_layout: *mut vk::DescriptorSetLayout,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_set_layout };
            self.state.descriptor_set_layouts.insert(handle, unsafe {
                DescriptorSetLayout::new(handle, &*p_create_info)
            });
        }
    }

    unsafe fn pre_call_record_destroy_descriptor_set_layout(
        &self,
        _device: vk::Device,
        descriptor_set_layout: vk::DescriptorSetLayout,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.state
            .descriptor_set_layouts
            .remove(descriptor_set_layout);
    }

    unsafe fn post_call_record_create_descriptor_pool(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::DescriptorPoolCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_descriptor_pool: *mut vk::DescriptorPool,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_descriptor_pool };
            self.state.descriptor_pools.insert(
                handle,
                DescriptorPool::new(handle, unsafe { &*p_create_info }),
            );
        }
    }

    unsafe fn pre_call_record_destroy_descriptor_pool(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        let Some(pool) = self.state.descriptor_pools.remove(descriptor_pool) else {
            return;
        };

        for set in pool.take_sets() {
            self.state.descriptor_sets.remove(set);
            self.destroyed(set.into());
        }
    }

    unsafe fn post_call_record_reset_descriptor_pool(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        _flags: vk::DescriptorPoolResetFlags,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        if let Some(pool) = self.state.descriptor_pools.get(descriptor_pool) {
            for set in pool.take_sets() {
                self.state.descriptor_sets.remove(set);
                self.destroyed(set.into());
            }
        }
    }

    unsafe fn post_call_record_allocate_descriptor_sets(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::DescriptorSetAllocateInfo<'_>,
        p_descriptor_sets: *mut vk::DescriptorSet,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let allocate_info = unsafe { &*p_allocate_info };
        let layouts = unsafe {
            slice_from(
                allocate_info.p_set_layouts,
                allocate_info.descriptor_set_count,
            )
        };
        let pool = self.state.descriptor_pools.get(allocate_info.descriptor_pool);

        for (index, handle) in
            unsafe { created(p_descriptor_sets, allocate_info.descriptor_set_count) }
        {
            self.state.descriptor_sets.insert(
                handle,
                DescriptorSet {
                    handle,
                    pool: allocate_info.descriptor_pool,
                    layout: layouts[index],
                },
            );

            if let Some(pool) = &pool {
                pool.add_set(handle);
            }
        }
    }

    unsafe fn post_call_record_free_descriptor_sets(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let pool = self.state.descriptor_pools.get(descriptor_pool);

        for &set in unsafe { slice_from(p_descriptor_sets, descriptor_set_count) } {
            if set == vk::DescriptorSet::null() {
                continue;
            }

            self.state.descriptor_sets.remove(set);

            if let Some(pool) = &pool {
                pool.remove_set(set);
            }

            self.destroyed(set.into());
        }
    }

    unsafe fn post_call_record_create_render_pass(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::RenderPassCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_render_pass: *mut vk::RenderPass,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_render_pass };
            self.state
                .render_passes
                .insert(handle, RenderPass::new(handle, unsafe { &*p_create_info }));
        }
    }

    unsafe fn pre_call_record_destroy_render_pass(
        &self,
        _device: vk::Device,
        render_pass: vk::RenderPass,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.render_passes.remove(render_pass).is_some() {
            self.destroyed(render_pass.into());
        }
    }

    unsafe fn post_call_record_create_framebuffer(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::FramebufferCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_framebuffer: *mut vk::Framebuffer,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_framebuffer };
            self.state
                .framebuffers
                .insert(handle, unsafe { Framebuffer::new(handle, &*p_create_info) });
        }
    }

    unsafe fn pre_call_record_destroy_framebuffer(
        &self,
        _device: vk::Device,
        framebuffer: vk::Framebuffer,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.framebuffers.remove(framebuffer).is_some() {
            self.destroyed(framebuffer.into());
        }
    }

    unsafe fn post_call_record_create_command_pool(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::CommandPoolCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_command_pool: *mut vk::CommandPool,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            let handle = unsafe { *p_command_pool };
            self.state
                .command_pools
                .insert(handle, CommandPool::new(handle, unsafe { &*p_create_info }));
        }
    }

    unsafe fn pre_call_record_destroy_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        let Some(pool) = self.state.command_pools.remove(command_pool) else {
            return;
        };

        for command_buffer in pool.command_buffers() {
            self.state.command_buffers.remove(command_buffer);
            self.destroyed(command_buffer.into());
        }
    }

    unsafe fn post_call_record_reset_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _flags: vk::CommandPoolResetFlags,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        if let Some(pool) = self.state.command_pools.get(command_pool) {
            for command_buffer in pool.command_buffers() {
                self.record(command_buffer, |recording| recording.reset());
                self.state.invalidate_command_buffers(command_buffer.into());
            }
        }
    }

    unsafe fn post_call_record_allocate_command_buffers(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::CommandBufferAllocateInfo<'_>,
        p_command_buffers: *mut vk::CommandBuffer,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let allocate_info = unsafe { &*p_allocate_info };
        let Some(pool) = self.state.command_pools.get(allocate_info.command_pool) else {
            return;
        };

        for (_, handle) in
            unsafe { created(p_command_buffers, allocate_info.command_buffer_count) }
        {
            self.state.command_buffers.insert(
                handle,
                CommandBuffer::new(handle, &pool, allocate_info.level),
            );
            pool.add_command_buffer(handle);
        }
    }

    unsafe fn pre_call_record_free_command_buffers(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        let pool = self.state.command_pools.get(command_pool);

        for &command_buffer in unsafe { slice_from(p_command_buffers, command_buffer_count) } {
            if self.state.command_buffers.remove(command_buffer).is_none() {
                continue;
            }

            if let Some(pool) = &pool {
                pool.remove_command_buffer(command_buffer);
            }

            self.destroyed(command_buffer.into());
        }
    }

    unsafe fn pre_call_record_begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        p_begin_info: *const vk::CommandBufferBeginInfo<'_>,
        _record_obj: &RecordObject,
    ) {
        let handle = command_buffer;
        let Some(command_buffer) = self.state.command_buffers.get(handle) else {
            return;
        };
        let begin_info = unsafe { &*p_begin_info };
        let inherited_render_pass = if command_buffer.is_secondary()
            && begin_info
                .flags
                .contains(vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE)
        {
            unsafe { self.inherited_render_pass(begin_info) }
        } else {
            None
        };

        command_buffer
            .lock()
            .begin(begin_info.flags, inherited_render_pass);

        // Primaries that execute the previous recording can't be submitted anymore.
        self.state.invalidate_command_buffers(handle.into());
    }

    unsafe fn post_call_record_end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            self.record(command_buffer, |recording| {
                if recording.is_recording() {
                    recording.state = CommandBufferState::Executable;
                }
            });
        }
    }

    unsafe fn post_call_record_reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        _flags: vk::CommandBufferResetFlags,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            self.record(command_buffer, |recording| recording.reset());
            self.state.invalidate_command_buffers(command_buffer.into());
        }
    }

    unsafe fn pre_call_record_cmd_bind_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            recording.bind_pipeline(pipeline_bind_point, pipeline);
            recording.add_reference(pipeline);
        });
    }

    unsafe fn pre_call_record_cmd_bind_descriptor_sets(
        &self,
        command_buffer: vk::CommandBuffer,
        _pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        _dynamic_offset_count: u32,
        _p_dynamic_offsets: *const u32,
        _record_obj: &RecordObject,
    ) {
        let sets = unsafe { slice_from(p_descriptor_sets, descriptor_set_count) };

        self.record(command_buffer, |recording| {
            let first_set = first_set as usize;
            let bound = &mut recording.bound_descriptor_sets;

            if bound.len() < first_set + sets.len() {
                bound.resize(first_set + sets.len(), vk::DescriptorSet::null());
            }

            bound[first_set..first_set + sets.len()].copy_from_slice(sets);
            recording.add_reference(layout);

            for &set in sets {
                recording.add_reference(set);
            }
        });
    }

    unsafe fn pre_call_record_cmd_bind_vertex_buffers(
        &self,
        command_buffer: vk::CommandBuffer,
        _first_binding: u32,
        binding_count: u32,
        p_buffers: *const vk::Buffer,
        _p_offsets: *const vk::DeviceSize,
        _record_obj: &RecordObject,
    ) {
        let buffers = unsafe { slice_from(p_buffers, binding_count) };

        self.record(command_buffer, |recording| {
            for &buffer in buffers {
                if buffer != vk::Buffer::null() {
                    recording.add_reference(buffer);
                }
            }
        });
    }

    unsafe fn pre_call_record_cmd_bind_index_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        _offset: vk::DeviceSize,
        _index_type: vk::IndexType,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            recording.index_buffer_bound = true;
            recording.add_reference(buffer);
        });
    }

    unsafe fn pre_call_record_cmd_copy_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        _region_count: u32,
        _p_regions: *const vk::BufferCopy,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            recording.add_reference(src_buffer);
            recording.add_reference(dst_buffer);
        });
    }

    unsafe fn pre_call_record_cmd_fill_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        _dst_offset: vk::DeviceSize,
        _size: vk::DeviceSize,
        _data: u32,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            recording.add_reference(dst_buffer)
        });
    }

    unsafe fn pre_call_record_cmd_pipeline_barrier(
        &self,
        command_buffer: vk::CommandBuffer,
        _src_stage_mask: vk::PipelineStageFlags,
        _dst_stage_mask: vk::PipelineStageFlags,
        _dependency_flags: vk::DependencyFlags,
        _memory_barrier_count: u32,
        _p_memory_barriers: *const vk::MemoryBarrier<'_>,
        buffer_memory_barrier_count: u32,
        p_buffer_memory_barriers: *const vk::BufferMemoryBarrier<'_>,
        image_memory_barrier_count: u32,
        p_image_memory_barriers: *const vk::ImageMemoryBarrier<'_>,
        _record_obj: &RecordObject,
    ) {
        let buffer_barriers =
            unsafe { slice_from(p_buffer_memory_barriers, buffer_memory_barrier_count) };
        let image_barriers =
            unsafe { slice_from(p_image_memory_barriers, image_memory_barrier_count) };

        self.record(command_buffer, |recording| {
            for barrier in buffer_barriers {
                recording.add_reference(barrier.buffer);
            }

            for barrier in image_barriers {
                recording.add_reference(barrier.image);
            }
        });
    }

    unsafe fn pre_call_record_cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        p_render_pass_begin: *const vk::RenderPassBeginInfo<'_>,
        _contents: vk::SubpassContents,
        _record_obj: &RecordObject,
    ) {
        let begin_info = unsafe { &*p_render_pass_begin };
        let subpass_count = self
            .state
            .render_passes
            .get(begin_info.render_pass)
            .map_or(1, |render_pass| render_pass.subpass_count);

        self.record(command_buffer, |recording| {
            recording.render_pass = Some(RenderPassInstance::Legacy {
                render_pass: begin_info.render_pass,
                framebuffer: begin_info.framebuffer,
                subpass: 0,
                subpass_count,
            });
            recording.add_reference(begin_info.render_pass);
            recording.add_reference(begin_info.framebuffer);
        });
    }

    unsafe fn pre_call_record_cmd_next_subpass(
        &self,
        command_buffer: vk::CommandBuffer,
        _contents: vk::SubpassContents,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            if let Some(RenderPassInstance::Legacy { subpass, .. }) = &mut recording.render_pass {
                *subpass += 1;
            }
        });
    }

    unsafe fn pre_call_record_cmd_end_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            if matches!(recording.render_pass, Some(RenderPassInstance::Legacy { .. })) {
                recording.render_pass = None;
            }
        });
    }

    unsafe fn pre_call_record_cmd_begin_rendering(
        &self,
        command_buffer: vk::CommandBuffer,
        p_rendering_info: *const vk::RenderingInfo<'_>,
        _record_obj: &RecordObject,
    ) {
        let rendering_info = unsafe { &*p_rendering_info };
        let color_attachments = unsafe {
            slice_from(
                rendering_info.p_color_attachments,
                rendering_info.color_attachment_count,
            )
        };

        self.record(command_buffer, |recording| {
            recording.render_pass = Some(RenderPassInstance::Dynamic {
                flags: rendering_info.flags,
            });

            for attachment in color_attachments {
                if attachment.image_view != vk::ImageView::null() {
                    recording.add_reference(attachment.image_view);
                }
            }
        });
    }

    unsafe fn pre_call_record_cmd_end_rendering(
        &self,
        command_buffer: vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        self.record(command_buffer, |recording| {
            if matches!(recording.render_pass, Some(RenderPassInstance::Dynamic { .. })) {
                recording.render_pass = None;
            }
        });
    }

    unsafe fn pre_call_record_cmd_execute_commands(
        &self,
        command_buffer: vk::CommandBuffer,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        let secondaries = unsafe { slice_from(p_command_buffers, command_buffer_count) };

        self.record(command_buffer, |recording| {
            for &secondary in secondaries {
                recording.secondaries.push(secondary);
                recording.add_reference(secondary);
            }
        });
    }

    unsafe fn post_call_record_create_shaders_ext(
        &self,
        _device: vk::Device,
        create_info_count: u32,
        p_create_infos: *const vk::ShaderCreateInfoEXT<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_shaders: *mut vk::ShaderEXT,
        _record_obj: &RecordObject,
    ) {
        let create_infos = unsafe { slice_from(p_create_infos, create_info_count) };

        // Failed creations leave null handles, and the ones before them are valid.
        for (index, handle) in unsafe { created(p_shaders, create_info_count) } {
            self.state
                .shader_objects
                .insert(handle, ShaderObject::new(handle, &create_infos[index]));
        }
    }

    unsafe fn pre_call_record_destroy_shader_ext(
        &self,
        _device: vk::Device,
        shader: vk::ShaderEXT,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if self.state.shader_objects.remove(shader).is_some() {
            self.destroyed(shader.into());
        }
    }

    unsafe fn pre_call_record_cmd_bind_shaders_ext(
        &self,
        command_buffer: vk::CommandBuffer,
        stage_count: u32,
        p_stages: *const vk::ShaderStageFlags,
        p_shaders: *const vk::ShaderEXT,
        _record_obj: &RecordObject,
    ) {
        let stages = unsafe { slice_from(p_stages, stage_count) };
        let shaders = unsafe { slice_from(p_shaders, stage_count) };

        self.record(command_buffer, |recording| {
            for (index, &stage) in stages.iter().enumerate() {
                let shader = shaders.get(index).copied().unwrap_or_default();
                recording.bind_shader(stage, shader);

                if shader != vk::ShaderEXT::null() {
                    recording.add_reference(shader);
                }
            }
        });
    }
}

impl DeviceStateTracker {
    /// Reads the render pass a secondary command buffer continues from its inheritance info.
    unsafe fn inherited_render_pass(
        &self,
        begin_info: &vk::CommandBufferBeginInfo<'_>,
    ) -> Option<RenderPassInstance> {
        let inheritance = unsafe { opt_ref(begin_info.p_inheritance_info) }?;

        if let Some(rendering_info) = unsafe {
            chain_find::<vk::CommandBufferInheritanceRenderingInfo<'_>>(
                inheritance.p_next,
                vk::StructureType::COMMAND_BUFFER_INHERITANCE_RENDERING_INFO,
            )
        } {
            return Some(RenderPassInstance::Dynamic {
                flags: rendering_info.flags,
            });
        }

        let subpass_count = self
            .state
            .render_passes
            .get(inheritance.render_pass)
            .map_or(1, |render_pass| render_pass.subpass_count);

        Some(RenderPassInstance::Legacy {
            render_pass: inheritance.render_pass,
            framebuffer: inheritance.framebuffer,
            subpass: inheritance.subpass,
            subpass_count,
        })
    }
}
