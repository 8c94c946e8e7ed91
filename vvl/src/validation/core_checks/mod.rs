//! Valid usage checks against the shadow state.
//!
//! The checks follow one pattern: a `validate_*` function per command returns the first
//! violated rule as a [`ValidationError`], and the hook reports it at the command's location.
//! The functions are grouped by area in the submodules.

pub use self::instance::InstanceCoreChecks;
use self::{
    command_buffer::{RenderPassScope, DRAW, DRAW_INDEXED},
    sync::InUseVuids,
};
use crate::{
    commands::DeviceValidator,
    handle::ObjectRef,
    location::{ErrorObject, Location},
    report::DebugReport,
    state::{CommandBuffer, CommandBufferRecording, DeviceState},
    ValidationError,
};
use ash::vk;
use std::{ffi::c_void, sync::Arc};

mod command_buffer;
mod descriptor;
mod instance;
mod memory;
mod shader;
mod sync;

/// The device-level core validator.
pub struct CoreChecks {
    state: Arc<DeviceState>,
    report: Arc<DebugReport>,
}

impl CoreChecks {
    pub fn new(state: Arc<DeviceState>, report: Arc<DebugReport>) -> Self {
        CoreChecks { state, report }
    }

    /// Reports `result` if it is an error. Returns whether the call should be skipped.
    fn emit(
        &self,
        objects: &[ObjectRef],
        location: &Location,
        result: Result<(), Box<ValidationError>>,
    ) -> bool {
        match result {
            Ok(()) => false,
            Err(err) => self.report.validation_error(objects, location, &err),
        }
    }

    /// Runs the checks common to every `vkCmd*` command, then `f`, with the command buffer's
    /// recording locked. The lock is released before anything is reported.
    fn check_cmd(
        &self,
        command_buffer: vk::CommandBuffer,
        error_obj: &ErrorObject,
        scope: RenderPassScope,
        f: impl FnOnce(&CommandBuffer, &CommandBufferRecording) -> Result<(), Box<ValidationError>>,
    ) -> bool {
        let Some(state) = self.state.command_buffers.get(command_buffer) else {
            return false;
        };

        let result = {
            let recording = state.lock();
            self.validate_cmd(&state, &recording, error_obj.location.command, scope)
                .and_then(|()| f(&state, &recording))
        };

        self.emit(&[command_buffer.into()], &error_obj.location, result)
    }

    fn check_not_in_use(
        &self,
        error_obj: &ErrorObject,
        object: ObjectRef,
        vuids: InUseVuids,
    ) -> bool {
        if object.is_null() {
            return false;
        }

        self.emit(
            &[error_obj.handle, object],
            &error_obj.location,
            self.validate_not_in_use(object, vuids),
        )
    }
}

impl DeviceValidator for CoreChecks {
    unsafe fn pre_call_validate_get_device_queue(
        &self,
        _device: vk::Device,
        queue_family_index: u32,
        queue_index: u32,
        _p_queue: *mut vk::Queue,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle],
            &error_obj.location,
            self.validate_get_device_queue(queue_family_index, queue_index),
        )
    }

    unsafe fn pre_call_validate_queue_submit(
        &self,
        queue: vk::Queue,
        submit_count: u32,
        p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
        error_obj: &ErrorObject,
    ) -> bool {
        let result = unsafe { self.validate_queue_submit(queue, submit_count, p_submits, fence) };

        self.emit(&[queue.into()], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_allocate_memory(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::MemoryAllocateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_memory: *mut vk::DeviceMemory,
        error_obj: &ErrorObject,
    ) -> bool {
        let result = self
            .validate_allocate_memory(unsafe { &*p_allocate_info })
            .map_err(|err| err.add_context("pAllocateInfo"));

        self.emit(&[error_obj.handle], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_free_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, memory.into(), InUseVuids::FREE_MEMORY)
    }

    unsafe fn pre_call_validate_map_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        _flags: vk::MemoryMapFlags,
        _pp_data: *mut *mut c_void,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, memory.into()],
            &error_obj.location,
            self.validate_map_memory(memory, offset, size),
        )
    }

    unsafe fn pre_call_validate_unmap_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, memory.into()],
            &error_obj.location,
            self.validate_unmap_memory(memory),
        )
    }

    unsafe fn pre_call_validate_destroy_buffer(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, buffer.into(), InUseVuids::DESTROY_BUFFER)
    }

    unsafe fn pre_call_validate_bind_buffer_memory(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[buffer.into(), memory.into()],
            &error_obj.location,
            self.validate_bind_buffer_memory(buffer, memory, memory_offset),
        )
    }

    unsafe fn pre_call_validate_destroy_image(
        &self,
        _device: vk::Device,
        image: vk::Image,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, image.into(), InUseVuids::DESTROY_IMAGE)
    }

    unsafe fn pre_call_validate_bind_image_memory(
        &self,
        _device: vk::Device,
        image: vk::Image,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[image.into(), memory.into()],
            &error_obj.location,
            self.validate_bind_image_memory(image, memory, memory_offset),
        )
    }

    unsafe fn pre_call_validate_destroy_image_view(
        &self,
        _device: vk::Device,
        image_view: vk::ImageView,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, image_view.into(), InUseVuids::DESTROY_IMAGE_VIEW)
    }

    unsafe fn pre_call_validate_destroy_fence(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, fence.into()],
            &error_obj.location,
            self.validate_destroy_fence(fence),
        )
    }

    unsafe fn pre_call_validate_reset_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        error_obj: &ErrorObject,
    ) -> bool {
        let result = unsafe { self.validate_reset_fences(fence_count, p_fences) };

        self.emit(&[error_obj.handle], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_destroy_semaphore(
        &self,
        _device: vk::Device,
        semaphore: vk::Semaphore,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, semaphore.into()],
            &error_obj.location,
            self.validate_destroy_semaphore(semaphore),
        )
    }

    unsafe fn pre_call_validate_create_shader_module(
        &self,
        _device: vk::Device,
        p_create_info: *const vk::ShaderModuleCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_shader_module: *mut vk::ShaderModule,
        error_obj: &ErrorObject,
    ) -> bool {
        let result = unsafe { self.validate_create_shader_module(&*p_create_info) }
            .map_err(|err| err.add_context("pCreateInfo"));

        self.emit(&[error_obj.handle], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_create_graphics_pipelines(
        &self,
        _device: vk::Device,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::GraphicsPipelineCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_pipelines: *mut vk::Pipeline,
        error_obj: &ErrorObject,
    ) -> bool {
        let create_infos = unsafe { crate::ffi::slice_from(p_create_infos, create_info_count) };
        let mut skip = false;

        for (index, create_info) in create_infos.iter().enumerate() {
            let result = unsafe { self.validate_graphics_pipeline_create_info(create_info) }
                .map_err(|err| err.add_context(format!("pCreateInfos[{}]", index)));
            skip |= self.emit(&[error_obj.handle], &error_obj.location, result);
        }

        skip
    }

    unsafe fn pre_call_validate_create_compute_pipelines(
        &self,
        _device: vk::Device,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_pipelines: *mut vk::Pipeline,
        error_obj: &ErrorObject,
    ) -> bool {
        let create_infos = unsafe { crate::ffi::slice_from(p_create_infos, create_info_count) };
        let mut skip = false;

        for (index, create_info) in create_infos.iter().enumerate() {
            let result = self
                .validate_compute_pipeline_create_info(create_info)
                .map_err(|err| err.add_context(format!("pCreateInfos[{}]", index)));
            skip |= self.emit(&[error_obj.handle], &error_obj.location, result);
        }

        skip
    }

    unsafe fn pre_call_validate_destroy_pipeline(
        &self,
        _device: vk::Device,
        pipeline: vk::Pipeline,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, pipeline.into(), InUseVuids::DESTROY_PIPELINE)
    }

    unsafe fn pre_call_validate_destroy_descriptor_pool(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, descriptor_pool.into()],
            &error_obj.location,
            self.validate_destroy_descriptor_pool(descriptor_pool),
        )
    }

    unsafe fn pre_call_validate_free_descriptor_sets(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        error_obj: &ErrorObject,
    ) -> bool {
        let result = unsafe {
            self.validate_free_descriptor_sets(
                descriptor_pool,
                descriptor_set_count,
                p_descriptor_sets,
            )
        };

        self.emit(
            &[error_obj.handle, descriptor_pool.into()],
            &error_obj.location,
            result,
        )
    }

    unsafe fn pre_call_validate_destroy_render_pass(
        &self,
        _device: vk::Device,
        render_pass: vk::RenderPass,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, render_pass.into(), InUseVuids::DESTROY_RENDER_PASS)
    }

    unsafe fn pre_call_validate_destroy_framebuffer(
        &self,
        _device: vk::Device,
        framebuffer: vk::Framebuffer,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, framebuffer.into(), InUseVuids::DESTROY_FRAMEBUFFER)
    }

    unsafe fn pre_call_validate_destroy_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, command_pool.into()],
            &error_obj.location,
            self.validate_pool_not_pending(
                command_pool,
                &["VUID-vkDestroyCommandPool-commandPool-00041"],
            ),
        )
    }

    unsafe fn pre_call_validate_reset_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _flags: vk::CommandPoolResetFlags,
        error_obj: &ErrorObject,
    ) -> bool {
        self.emit(
            &[error_obj.handle, command_pool.into()],
            &error_obj.location,
            self.validate_pool_not_pending(
                command_pool,
                &["VUID-vkResetCommandPool-commandPool-00040"],
            ),
        )
    }

    unsafe fn pre_call_validate_free_command_buffers(
        &self,
        _device: vk::Device,
        _command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        let result =
            unsafe { self.validate_free_command_buffers(command_buffer_count, p_command_buffers) };

        self.emit(&[error_obj.handle], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        p_begin_info: *const vk::CommandBufferBeginInfo<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        let Some(state) = self.state.command_buffers.get(command_buffer) else {
            return false;
        };
        let result = unsafe { self.validate_begin_command_buffer(&state, &*p_begin_info) };

        self.emit(&[command_buffer.into()], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        let Some(state) = self.state.command_buffers.get(command_buffer) else {
            return false;
        };
        let result = self.validate_end_command_buffer(&state);

        self.emit(&[command_buffer.into()], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        _flags: vk::CommandBufferResetFlags,
        error_obj: &ErrorObject,
    ) -> bool {
        let Some(state) = self.state.command_buffers.get(command_buffer) else {
            return false;
        };
        let result = self.validate_reset_command_buffer(&state);

        self.emit(&[command_buffer.into()], &error_obj.location, result)
    }

    unsafe fn pre_call_validate_cmd_bind_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_bind_pipeline(pipeline_bind_point, pipeline),
        )
    }

    unsafe fn pre_call_validate_cmd_bind_descriptor_sets(
        &self,
        command_buffer: vk::CommandBuffer,
        _pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        descriptor_set_count: u32,
        _p_descriptor_sets: *const vk::DescriptorSet,
        dynamic_offset_count: u32,
        _p_dynamic_offsets: *const u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| {
                self.validate_cmd_bind_descriptor_sets(
                    layout,
                    first_set,
                    descriptor_set_count,
                    dynamic_offset_count,
                )
            },
        )
    }

    unsafe fn pre_call_validate_cmd_bind_vertex_buffers(
        &self,
        command_buffer: vk::CommandBuffer,
        first_binding: u32,
        binding_count: u32,
        p_buffers: *const vk::Buffer,
        p_offsets: *const vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        let buffers = unsafe { crate::ffi::slice_from(p_buffers, binding_count) };
        let offsets = unsafe { crate::ffi::slice_from(p_offsets, binding_count) };

        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_bind_vertex_buffers(first_binding, buffers, offsets),
        )
    }

    unsafe fn pre_call_validate_cmd_bind_index_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_bind_index_buffer(buffer, offset, index_type),
        )
    }

    unsafe fn pre_call_validate_cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        first_viewport: u32,
        viewport_count: u32,
        _p_viewports: *const vk::Viewport,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_set_viewport(first_viewport, viewport_count),
        )
    }

    unsafe fn pre_call_validate_cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        first_scissor: u32,
        scissor_count: u32,
        _p_scissors: *const vk::Rect2D,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_set_scissor(first_scissor, scissor_count),
        )
    }

    unsafe fn pre_call_validate_cmd_draw(
        &self,
        command_buffer: vk::CommandBuffer,
        _vertex_count: u32,
        _instance_count: u32,
        _first_vertex: u32,
        _first_instance: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Inside,
            |_, recording| self.validate_draw(recording, &DRAW),
        )
    }

    unsafe fn pre_call_validate_cmd_draw_indexed(
        &self,
        command_buffer: vk::CommandBuffer,
        _index_count: u32,
        _instance_count: u32,
        _first_index: u32,
        _vertex_offset: i32,
        _first_instance: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Inside,
            |_, recording| self.validate_draw(recording, &DRAW_INDEXED),
        )
    }

    unsafe fn pre_call_validate_cmd_dispatch(
        &self,
        command_buffer: vk::CommandBuffer,
        _group_count_x: u32,
        _group_count_y: u32,
        _group_count_z: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Outside,
            |_, recording| self.validate_dispatch(recording),
        )
    }

    unsafe fn pre_call_validate_cmd_copy_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        region_count: u32,
        p_regions: *const vk::BufferCopy,
        error_obj: &ErrorObject,
    ) -> bool {
        let regions = unsafe { crate::ffi::slice_from(p_regions, region_count) };

        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Outside,
            |_, _| self.validate_cmd_copy_buffer(src_buffer, dst_buffer, regions),
        )
    }

    unsafe fn pre_call_validate_cmd_fill_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        size: vk::DeviceSize,
        _data: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Outside,
            |_, _| self.validate_cmd_fill_buffer(dst_buffer, dst_offset, size),
        )
    }

    unsafe fn pre_call_validate_cmd_pipeline_barrier(
        &self,
        command_buffer: vk::CommandBuffer,
        _src_stage_mask: vk::PipelineStageFlags,
        _dst_stage_mask: vk::PipelineStageFlags,
        _dependency_flags: vk::DependencyFlags,
        _memory_barrier_count: u32,
        _p_memory_barriers: *const vk::MemoryBarrier<'_>,
        _buffer_memory_barrier_count: u32,
        _p_buffer_memory_barriers: *const vk::BufferMemoryBarrier<'_>,
        _image_memory_barrier_count: u32,
        _p_image_memory_barriers: *const vk::ImageMemoryBarrier<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| Ok(()),
        )
    }

    unsafe fn pre_call_validate_cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        p_render_pass_begin: *const vk::RenderPassBeginInfo<'_>,
        _contents: vk::SubpassContents,
        error_obj: &ErrorObject,
    ) -> bool {
        let begin_info = unsafe { &*p_render_pass_begin };

        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Outside,
            |_, _| {
                self.validate_render_pass_begin_info(begin_info)
                    .map_err(|err| err.add_context("pRenderPassBegin"))
            },
        )
    }

    unsafe fn pre_call_validate_cmd_next_subpass(
        &self,
        command_buffer: vk::CommandBuffer,
        _contents: vk::SubpassContents,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Inside,
            |_, recording| self.validate_cmd_next_subpass(recording),
        )
    }

    unsafe fn pre_call_validate_cmd_end_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Inside,
            |_, recording| self.validate_cmd_end_render_pass(recording),
        )
    }

    unsafe fn pre_call_validate_cmd_begin_rendering(
        &self,
        command_buffer: vk::CommandBuffer,
        _p_rendering_info: *const vk::RenderingInfo<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Outside,
            |_, _| self.validate_cmd_begin_rendering(),
        )
    }

    unsafe fn pre_call_validate_cmd_end_rendering(
        &self,
        command_buffer: vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Inside,
            |_, recording| self.validate_cmd_end_rendering(recording),
        )
    }

    unsafe fn pre_call_validate_cmd_execute_commands(
        &self,
        command_buffer: vk::CommandBuffer,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        let secondaries =
            unsafe { crate::ffi::slice_from(p_command_buffers, command_buffer_count) };
        let Some(render_pass) = self.state.command_buffers.get(command_buffer).map(|state| {
            let recording = state.lock();
            recording.render_pass
        }) else {
            return false;
        };

        // The secondaries are locked one at a time, after the primary's lock was released.
        if self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| Ok(()),
        ) {
            return true;
        }

        self.emit(
            &[command_buffer.into()],
            &error_obj.location,
            self.validate_cmd_execute_commands(render_pass, secondaries),
        )
    }

    unsafe fn pre_call_validate_create_shaders_ext(
        &self,
        _device: vk::Device,
        create_info_count: u32,
        p_create_infos: *const vk::ShaderCreateInfoEXT<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_shaders: *mut vk::ShaderEXT,
        error_obj: &ErrorObject,
    ) -> bool {
        let create_infos = unsafe { crate::ffi::slice_from(p_create_infos, create_info_count) };

        if let Err(err) =
            self.validate_shader_object_enabled(&["VUID-vkCreateShadersEXT-None-08400"])
        {
            return self
                .report
                .validation_error(&[error_obj.handle], &error_obj.location, &err);
        }

        let mut skip = false;

        for (index, create_info) in create_infos.iter().enumerate() {
            let result = self
                .validate_shader_create_info(create_info)
                .map_err(|err| err.add_context(format!("pCreateInfos[{}]", index)));
            skip |= self.emit(&[error_obj.handle], &error_obj.location, result);
        }

        skip
    }

    unsafe fn pre_call_validate_destroy_shader_ext(
        &self,
        _device: vk::Device,
        shader: vk::ShaderEXT,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_not_in_use(error_obj, shader.into(), InUseVuids::DESTROY_SHADER)
    }

    unsafe fn pre_call_validate_cmd_bind_shaders_ext(
        &self,
        command_buffer: vk::CommandBuffer,
        stage_count: u32,
        p_stages: *const vk::ShaderStageFlags,
        p_shaders: *const vk::ShaderEXT,
        error_obj: &ErrorObject,
    ) -> bool {
        let stages = unsafe { crate::ffi::slice_from(p_stages, stage_count) };
        let shaders = unsafe { crate::ffi::slice_from(p_shaders, stage_count) };

        self.check_cmd(
            command_buffer,
            error_obj,
            RenderPassScope::Either,
            |_, _| self.validate_cmd_bind_shaders(stages, shaders),
        )
    }
}
