//! Checks that every handle a command receives refers to a live object of the right device or
//! instance, and that nothing is left alive when its parent is destroyed.
//!
//! The checks read the maps kept by the state trackers. A handle that isn't in its map was
//! either never created through the layer, or already destroyed.

use crate::{
    commands::{DeviceValidator, InstanceValidator},
    handle::ObjectRef,
    location::{ErrorObject, Location},
    report::DebugReport,
    state::{DeviceState, InstanceState},
};
use ash::vk;
use std::{ffi::c_void, sync::Arc};

/// Whether a handle parameter may be `VK_NULL_HANDLE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Null {
    Allowed,
    Forbidden,
}

/// Reports one handle that isn't known. Returns whether the call should be skipped.
fn report_unknown(
    report: &DebugReport,
    error_obj: &ErrorObject,
    location: &Location,
    param: &str,
    object: ObjectRef,
) -> bool {
    let vuid = format!(
        "VUID-{}-{}-parameter",
        error_obj.location.command.name(),
        param,
    );

    report.error(
        &vuid,
        &[error_obj.handle, object],
        location,
        format_args!(
            "Invalid {} object 0x{:x}. It was never created, or has been destroyed.",
            object.type_name(),
            object.raw,
        ),
    )
}

fn check(
    report: &DebugReport,
    error_obj: &ErrorObject,
    param: &'static str,
    object: ObjectRef,
    known: bool,
    null: Null,
) -> bool {
    if known || (object.is_null() && null == Null::Allowed) {
        return false;
    }

    let location = error_obj.location.dot(param);

    report_unknown(report, error_obj, &location, param, object)
}

/// The device-level object lifetime validator.
pub struct ObjectLifetimes {
    state: Arc<DeviceState>,
    report: Arc<DebugReport>,
}

impl ObjectLifetimes {
    pub fn new(state: Arc<DeviceState>, report: Arc<DebugReport>) -> Self {
        ObjectLifetimes { state, report }
    }

    fn check_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        check(
            &self.report,
            error_obj,
            "commandBuffer",
            command_buffer.into(),
            self.state.command_buffers.contains(command_buffer),
            Null::Forbidden,
        )
    }

    fn check_buffer(
        &self,
        error_obj: &ErrorObject,
        param: &'static str,
        buffer: vk::Buffer,
        null: Null,
    ) -> bool {
        check(
            &self.report,
            error_obj,
            param,
            buffer.into(),
            self.state.buffers.contains(buffer),
            null,
        )
    }

    fn check_memory(&self, error_obj: &ErrorObject, memory: vk::DeviceMemory, null: Null) -> bool {
        check(
            &self.report,
            error_obj,
            "memory",
            memory.into(),
            self.state.memories.contains(memory),
            null,
        )
    }

    fn check_fence(&self, error_obj: &ErrorObject, param: &'static str, fence: vk::Fence) -> bool {
        check(
            &self.report,
            error_obj,
            param,
            fence.into(),
            self.state.fences.contains(fence),
            Null::Allowed,
        )
    }

    /// Checks every element of a handle array, reporting each unknown one at `param[i]`.
    fn check_array<H>(
        &self,
        error_obj: &ErrorObject,
        param: &'static str,
        handles: &[H],
        null: Null,
        known: impl Fn(H) -> bool,
    ) -> bool
    where
        H: vk::Handle + Copy,
    {
        let mut skip = false;

        for (index, &handle) in handles.iter().enumerate() {
            let object = ObjectRef::from(handle);

            if known(handle) || (object.is_null() && null == Null::Allowed) {
                continue;
            }

            let location = error_obj.location.dot_index(param, index);
            skip |= report_unknown(&self.report, error_obj, &location, param, object);
        }

        skip
    }
}

/// Destroy commands whose handle may be null and must otherwise be live.
macro_rules! destroy_hooks {
    ($($validate:ident($handle:ident: $ty:ty, $param:literal, $map:ident);)*) => {
        $(
            unsafe fn $validate(
                &self,
                _device: vk::Device,
                $handle: $ty,
                _p_allocator: *const vk::AllocationCallbacks<'_>,
                error_obj: &ErrorObject,
            ) -> bool {
                check(
                    &self.report,
                    error_obj,
                    $param,
                    $handle.into(),
                    self.state.$map.contains($handle),
                    Null::Allowed,
                )
            }
        )*
    };
}

/// `vkCmd*` commands whose only handle parameter is the command buffer.
macro_rules! command_buffer_hooks {
    ($($validate:ident($($ty:ty),* $(,)?);)*) => {
        $(
            unsafe fn $validate(
                &self,
                command_buffer: vk::CommandBuffer,
                $(_: $ty,)*
                error_obj: &ErrorObject,
            ) -> bool {
                self.check_command_buffer(command_buffer, error_obj)
            }
        )*
    };
}

impl DeviceValidator for ObjectLifetimes {
    unsafe fn pre_call_validate_destroy_device(
        &self,
        device: vk::Device,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        let mut skip = false;

        for object in self.state.live_objects() {
            skip |= self.report.error(
                "VUID-vkDestroyDevice-device-05137",
                &[device.into(), object],
                &error_obj.location,
                format_args!(
                    "OBJ ERROR : For {:?}, {} 0x{:x} has not been destroyed.",
                    device,
                    object.type_name(),
                    object.raw,
                ),
            );
        }

        skip
    }

    unsafe fn pre_call_validate_queue_submit(
        &self,
        _queue: vk::Queue,
        submit_count: u32,
        p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
        error_obj: &ErrorObject,
    ) -> bool {
        let mut skip = self.check_fence(error_obj, "fence", fence);
        let submits = unsafe { crate::ffi::slice_from(p_submits, submit_count) };

        for submit in submits {
            let command_buffers = unsafe {
                crate::ffi::slice_from(submit.p_command_buffers, submit.command_buffer_count)
            };
            let wait_semaphores = unsafe {
                crate::ffi::slice_from(submit.p_wait_semaphores, submit.wait_semaphore_count)
            };
            let signal_semaphores = unsafe {
                crate::ffi::slice_from(submit.p_signal_semaphores, submit.signal_semaphore_count)
            };

            skip |= self.check_array(
                error_obj,
                "pCommandBuffers",
                command_buffers,
                Null::Forbidden,
                |handle| self.state.command_buffers.contains(handle),
            );
            skip |= self.check_array(
                error_obj,
                "pWaitSemaphores",
                wait_semaphores,
                Null::Forbidden,
                |handle| self.state.semaphores.contains(handle),
            );
            skip |= self.check_array(
                error_obj,
                "pSignalSemaphores",
                signal_semaphores,
                Null::Forbidden,
                |handle| self.state.semaphores.contains(handle),
            );
        }

        skip
    }

    unsafe fn pre_call_validate_free_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_memory(error_obj, memory, Null::Allowed)
    }

    unsafe fn pre_call_validate_map_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _offset: vk::DeviceSize,
        _size: vk::DeviceSize,
        _flags: vk::MemoryMapFlags,
        _pp_data: *mut *mut c_void,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_memory(error_obj, memory, Null::Forbidden)
    }

    unsafe fn pre_call_validate_unmap_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_memory(error_obj, memory, Null::Forbidden)
    }

    unsafe fn pre_call_validate_bind_buffer_memory(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        memory: vk::DeviceMemory,
        _memory_offset: vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_buffer(error_obj, "buffer", buffer, Null::Forbidden)
            | self.check_memory(error_obj, memory, Null::Forbidden)
    }

    unsafe fn pre_call_validate_get_buffer_memory_requirements(
        &self,
        _device: vk::Device,
        buffer: vk::Buffer,
        _p_memory_requirements: *mut vk::MemoryRequirements,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_buffer(error_obj, "buffer", buffer, Null::Forbidden)
    }

    unsafe fn pre_call_validate_bind_image_memory(
        &self,
        _device: vk::Device,
        image: vk::Image,
        memory: vk::DeviceMemory,
        _memory_offset: vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        check(
            &self.report,
            error_obj,
            "image",
            image.into(),
            self.state.images.contains(image),
            Null::Forbidden,
        ) | self.check_memory(error_obj, memory, Null::Forbidden)
    }

    unsafe fn pre_call_validate_get_image_memory_requirements(
        &self,
        _device: vk::Device,
        image: vk::Image,
        _p_memory_requirements: *mut vk::MemoryRequirements,
        error_obj: &ErrorObject,
    ) -> bool {
        check(
            &self.report,
            error_obj,
            "image",
            image.into(),
            self.state.images.contains(image),
            Null::Forbidden,
        )
    }

    unsafe fn pre_call_validate_reset_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        error_obj: &ErrorObject,
    ) -> bool {
        let fences = unsafe { crate::ffi::slice_from(p_fences, fence_count) };

        self.check_array(error_obj, "pFences", fences, Null::Forbidden, |fence| {
            self.state.fences.contains(fence)
        })
    }

    unsafe fn pre_call_validate_get_fence_status(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        error_obj: &ErrorObject,
    ) -> bool {
        check(
            &self.report,
            error_obj,
            "fence",
            fence.into(),
            self.state.fences.contains(fence),
            Null::Forbidden,
        )
    }

    unsafe fn pre_call_validate_wait_for_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        _wait_all: vk::Bool32,
        _timeout: u64,
        error_obj: &ErrorObject,
    ) -> bool {
        let fences = unsafe { crate::ffi::slice_from(p_fences, fence_count) };

        self.check_array(error_obj, "pFences", fences, Null::Forbidden, |fence| {
            self.state.fences.contains(fence)
        })
    }

    destroy_hooks! {
        pre_call_validate_destroy_buffer(buffer: vk::Buffer, "buffer", buffers);
        pre_call_validate_destroy_image(image: vk::Image, "image", images);
        pre_call_validate_destroy_image_view(image_view: vk::ImageView, "imageView", image_views);
        pre_call_validate_destroy_fence(fence: vk::Fence, "fence", fences);
        pre_call_validate_destroy_semaphore(semaphore: vk::Semaphore, "semaphore", semaphores);
        pre_call_validate_destroy_shader_module(
            shader_module: vk::ShaderModule, "shaderModule", shader_modules
        );
        pre_call_validate_destroy_pipeline_layout(
            pipeline_layout: vk::PipelineLayout, "pipelineLayout", pipeline_layouts
        );
        pre_call_validate_destroy_pipeline(pipeline: vk::Pipeline, "pipeline", pipelines);
        pre_call_validate_destroy_descriptor_set_layout(
            descriptor_set_layout: vk::DescriptorSetLayout,
            "descriptorSetLayout",
            descriptor_set_layouts
        );
        pre_call_validate_destroy_descriptor_pool(
            descriptor_pool: vk::DescriptorPool, "descriptorPool", descriptor_pools
        );
        pre_call_validate_destroy_render_pass(
            render_pass: vk::RenderPass, "renderPass", render_passes
        );
        pre_call_validate_destroy_framebuffer(
            framebuffer: vk::Framebuffer, "framebuffer", framebuffers
        );
        pre_call_validate_destroy_command_pool(
            command_pool: vk::CommandPool, "commandPool", command_pools
        );
        pre_call_validate_destroy_shader_ext(shader: vk::ShaderEXT, "shader", shader_objects);
    }

    unsafe fn pre_call_validate_free_descriptor_sets(
        &self,
        _device: vk::Device,
        descriptor_pool: vk::DescriptorPool,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        error_obj: &ErrorObject,
    ) -> bool {
        let sets = unsafe { crate::ffi::slice_from(p_descriptor_sets, descriptor_set_count) };

        check(
            &self.report,
            error_obj,
            "descriptorPool",
            descriptor_pool.into(),
            self.state.descriptor_pools.contains(descriptor_pool),
            Null::Forbidden,
        ) | self.check_array(error_obj, "pDescriptorSets", sets, Null::Allowed, |set| {
            self.state.descriptor_sets.contains(set)
        })
    }

    unsafe fn pre_call_validate_free_command_buffers(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        error_obj: &ErrorObject,
    ) -> bool {
        let command_buffers =
            unsafe { crate::ffi::slice_from(p_command_buffers, command_buffer_count) };

        check(
            &self.report,
            error_obj,
            "commandPool",
            command_pool.into(),
            self.state.command_pools.contains(command_pool),
            Null::Forbidden,
        ) | self.check_array(
            error_obj,
            "pCommandBuffers",
            command_buffers,
            Null::Allowed,
            |command_buffer| self.state.command_buffers.contains(command_buffer),
        )
    }

    command_buffer_hooks! {
        pre_call_validate_begin_command_buffer(*const vk::CommandBufferBeginInfo<'_>);
        pre_call_validate_end_command_buffer();
        pre_call_validate_reset_command_buffer(vk::CommandBufferResetFlags);
        pre_call_validate_cmd_set_viewport(u32, u32, *const vk::Viewport);
        pre_call_validate_cmd_set_scissor(u32, u32, *const vk::Rect2D);
        pre_call_validate_cmd_draw(u32, u32, u32, u32);
        pre_call_validate_cmd_draw_indexed(u32, u32, u32, i32, u32);
        pre_call_validate_cmd_dispatch(u32, u32, u32);
        pre_call_validate_cmd_pipeline_barrier(
            vk::PipelineStageFlags,
            vk::PipelineStageFlags,
            vk::DependencyFlags,
            u32,
            *const vk::MemoryBarrier<'_>,
            u32,
            *const vk::BufferMemoryBarrier<'_>,
            u32,
            *const vk::ImageMemoryBarrier<'_>,
        );
        pre_call_validate_cmd_next_subpass(vk::SubpassContents);
        pre_call_validate_cmd_end_render_pass();
        pre_call_validate_cmd_begin_rendering(*const vk::RenderingInfo<'_>);
        pre_call_validate_cmd_end_rendering();
    }

    unsafe fn pre_call_validate_cmd_bind_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        _pipeline_bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_command_buffer(command_buffer, error_obj)
            | check(
                &self.report,
                error_obj,
                "pipeline",
                pipeline.into(),
                self.state.pipelines.contains(pipeline),
                Null::Forbidden,
            )
    }

    unsafe fn pre_call_validate_cmd_bind_descriptor_sets(
        &self,
        command_buffer: vk::CommandBuffer,
        _pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        _first_set: u32,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        _dynamic_offset_count: u32,
        _p_dynamic_offsets: *const u32,
        error_obj: &ErrorObject,
    ) -> bool {
        let sets = unsafe { crate::ffi::slice_from(p_descriptor_sets, descriptor_set_count) };

        self.check_command_buffer(command_buffer, error_obj)
            | check(
                &self.report,
                error_obj,
                "layout",
                layout.into(),
                self.state.pipeline_layouts.contains(layout),
                Null::Forbidden,
            )
            | self.check_array(error_obj, "pDescriptorSets", sets, Null::Allowed, |set| {
                self.state.descriptor_sets.contains(set)
            })
    }

    unsafe fn pre_call_validate_cmd_bind_vertex_buffers(
        &self,
        command_buffer: vk::CommandBuffer,
        _first_binding: u32,
        binding_count: u32,
        p_buffers: *const vk::Buffer,
        _p_offsets: *const vk::DeviceSize,
        error_obj: &ErrorObject,
    ) -> bool {
        let buffers = unsafe { crate::ffi::slice_from(p_buffers, binding_count) };

        self.check_command_buffer(command_buffer, error_obj)
            | self.check_array(error_obj, "pBuffers", buffers, Null::Allowed, |buffer| {
                self.state.buffers.contains(buffer)
            })
    }

    unsafe fn pre_call_validate_cmd_bind_index_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        _offset: vk::DeviceSize,
        _index_type: vk::IndexType,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_command_buffer(command_buffer, error_obj)
            | self.check_buffer(error_obj, "buffer", buffer, Null::Allowed)
    }

    unsafe fn pre_call_validate_cmd_copy_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        _region_count: u32,
        _p_regions: *const vk::BufferCopy,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_command_buffer(command_buffer, error_obj)
            | self.check_buffer(error_obj, "srcBuffer", src_buffer, Null::Forbidden)
            | self.check_buffer(error_obj, "dstBuffer", dst_buffer, Null::Forbidden)
    }

    unsafe fn pre_call_validate_cmd_fill_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        _dst_offset: vk::DeviceSize,
        _size: vk::DeviceSize,
        _data: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_command_buffer(command_buffer, error_obj)
            | self.check_buffer(error_obj, "dstBuffer", dst_buffer, Null::Forbidden)
    }

    unsafe fn pre_call_validate_cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        p_render_pass_begin: *const vk::RenderPassBeginInfo<'_>,
        _contents: vk::SubpassContents,
        error_obj: &ErrorObject,
    ) -> bool {
        let mut skip = self.check_command_buffer(command_buffer, error_obj);
        let Some(begin_info) = (unsafe { crate::ffi::opt_ref(p_render_pass_begin) }) else {
            return skip;
        };
        let location = error_obj.location.dot("pRenderPassBegin");

        for (param, object, known) in [
            (
                "renderPass",
                ObjectRef::from(begin_info.render_pass),
                self.state.render_passes.contains(begin_info.render_pass),
            ),
            (
                "framebuffer",
                ObjectRef::from(begin_info.framebuffer),
                self.state.framebuffers.contains(begin_info.framebuffer),
            ),
        ] {
            if !known {
                let vuid = format!("VUID-VkRenderPassBeginInfo-{}-parameter", param);
                skip |= self.report.error(
                    &vuid,
                    &[error_obj.handle, object],
                    &location.dot(param),
                    format_args!(
                        "Invalid {} object 0x{:x}. It was never created, or has been destroyed.",
                        object.type_name(),
                        object.raw,
                    ),
                );
            }
        }

        skip
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

        self.check_command_buffer(command_buffer, error_obj)
            | self.check_array(
                error_obj,
                "pCommandBuffers",
                secondaries,
                Null::Forbidden,
                |secondary| self.state.command_buffers.contains(secondary),
            )
    }

    unsafe fn pre_call_validate_cmd_bind_shaders_ext(
        &self,
        command_buffer: vk::CommandBuffer,
        stage_count: u32,
        _p_stages: *const vk::ShaderStageFlags,
        p_shaders: *const vk::ShaderEXT,
        error_obj: &ErrorObject,
    ) -> bool {
        let shaders = unsafe { crate::ffi::slice_from(p_shaders, stage_count) };

        self.check_command_buffer(command_buffer, error_obj)
            | self.check_array(error_obj, "pShaders", shaders, Null::Allowed, |shader| {
                self.state.shader_objects.contains(shader)
            })
    }
}

/// The instance-level object lifetime validator.
pub struct InstanceObjectLifetimes {
    state: Arc<InstanceState>,
    report: Arc<DebugReport>,
}

impl InstanceObjectLifetimes {
    pub fn new(state: Arc<InstanceState>, report: Arc<DebugReport>) -> Self {
        InstanceObjectLifetimes { state, report }
    }

    /// Physical devices must have been returned by `vkEnumeratePhysicalDevices` before use.
    fn check_physical_device(
        &self,
        physical_device: vk::PhysicalDevice,
        error_obj: &ErrorObject,
    ) -> bool {
        let known = self
            .state
            .enumerated_physical_devices()
            .contains(&physical_device);

        check(
            &self.report,
            error_obj,
            "physicalDevice",
            physical_device.into(),
            known,
            Null::Forbidden,
        )
    }
}

impl InstanceValidator for InstanceObjectLifetimes {
    unsafe fn pre_call_validate_destroy_instance(
        &self,
        instance: vk::Instance,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        let messengers: Vec<_> = self.state.messengers.lock().iter().copied().collect();
        let mut skip = false;

        for messenger in messengers {
            let object = ObjectRef::from(messenger);
            skip |= self.report.error(
                "VUID-vkDestroyInstance-instance-00629",
                &[instance.into(), object],
                &error_obj.location,
                format_args!(
                    "OBJ ERROR : For {:?}, {} 0x{:x} has not been destroyed.",
                    instance,
                    object.type_name(),
                    object.raw,
                ),
            );
        }

        skip
    }

    unsafe fn pre_call_validate_get_physical_device_properties(
        &self,
        physical_device: vk::PhysicalDevice,
        _p_properties: *mut vk::PhysicalDeviceProperties,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_physical_device(physical_device, error_obj)
    }

    unsafe fn pre_call_validate_get_physical_device_features(
        &self,
        physical_device: vk::PhysicalDevice,
        _p_features: *mut vk::PhysicalDeviceFeatures,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_physical_device(physical_device, error_obj)
    }

    unsafe fn pre_call_validate_get_physical_device_queue_family_properties(
        &self,
        physical_device: vk::PhysicalDevice,
        _p_queue_family_property_count: *mut u32,
        _p_queue_family_properties: *mut vk::QueueFamilyProperties,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_physical_device(physical_device, error_obj)
    }

    unsafe fn pre_call_validate_get_physical_device_memory_properties(
        &self,
        physical_device: vk::PhysicalDevice,
        _p_memory_properties: *mut vk::PhysicalDeviceMemoryProperties,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_physical_device(physical_device, error_obj)
    }

    unsafe fn pre_call_validate_create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        _p_create_info: *const vk::DeviceCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_device: *mut vk::Device,
        error_obj: &ErrorObject,
    ) -> bool {
        self.check_physical_device(physical_device, error_obj)
    }

    unsafe fn pre_call_validate_destroy_debug_utils_messenger_ext(
        &self,
        _instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        let known = self.state.messengers.lock().contains(&messenger);

        check(
            &self.report,
            error_obj,
            "messenger",
            messenger.into(),
            known,
            Null::Allowed,
        )
    }
}
