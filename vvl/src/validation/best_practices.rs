//! Usage that is valid but likely to perform badly or be a mistake.
//!
//! Nothing reported here is an error, and no call is ever skipped.

use crate::{
    commands::DeviceValidator, location::ErrorObject, report::DebugReport, state::DeviceState,
};
use ash::vk;
use std::sync::Arc;

/// Allocations smaller than this should be suballocated from a larger one.
const MIN_DEVICE_ALLOCATION_SIZE: vk::DeviceSize = 256 * 1024;

/// Drivers are only guaranteed to support 4096 allocations, and some are slow well before that.
const MAX_RECOMMENDED_ALLOCATIONS: usize = 250;

/// The device-level best practices validator.
pub struct BestPractices {
    state: Arc<DeviceState>,
    report: Arc<DebugReport>,
}

impl BestPractices {
    pub fn new(state: Arc<DeviceState>, report: Arc<DebugReport>) -> Self {
        BestPractices { state, report }
    }

    fn validate_instance_count(
        &self,
        vuid: &str,
        command_buffer: vk::CommandBuffer,
        instance_count: u32,
        error_obj: &ErrorObject,
    ) {
        if instance_count == 0 {
            self.report.warning(
                vuid,
                &[command_buffer.into()],
                &error_obj.location.dot("instanceCount"),
                "is zero, so the draw does nothing",
            );
        }
    }
}

impl DeviceValidator for BestPractices {
    unsafe fn pre_call_validate_allocate_memory(
        &self,
        device: vk::Device,
        p_allocate_info: *const vk::MemoryAllocateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_memory: *mut vk::DeviceMemory,
        error_obj: &ErrorObject,
    ) -> bool {
        let allocation_count = self.state.memories.len();

        if allocation_count >= MAX_RECOMMENDED_ALLOCATIONS {
            self.report.performance(
                "BestPractices-vkAllocateMemory-too-many-objects",
                &[device.into()],
                &error_obj.location,
                format_args!(
                    "performance warning: this app has {} memory objects, more than the \
                    recommended {}. Suballocate from fewer, larger allocations instead.",
                    allocation_count, MAX_RECOMMENDED_ALLOCATIONS,
                ),
            );
        }

        let Some(allocate_info) = (unsafe { crate::ffi::opt_ref(p_allocate_info) }) else {
            return false;
        };

        if allocate_info.allocation_size < MIN_DEVICE_ALLOCATION_SIZE {
            self.report.performance(
                "BestPractices-vkAllocateMemory-small-allocation",
                &[device.into()],
                &error_obj.location.dot("pAllocateInfo").dot("allocationSize"),
                format_args!(
                    "({}) is smaller than the recommended minimum of {} bytes. Suballocate \
                    from a larger allocation instead.",
                    allocate_info.allocation_size, MIN_DEVICE_ALLOCATION_SIZE,
                ),
            );
        }

        false
    }

    unsafe fn pre_call_validate_create_command_pool(
        &self,
        device: vk::Device,
        p_create_info: *const vk::CommandPoolCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_command_pool: *mut vk::CommandPool,
        error_obj: &ErrorObject,
    ) -> bool {
        let Some(create_info) = (unsafe { crate::ffi::opt_ref(p_create_info) }) else {
            return false;
        };

        if create_info
            .flags
            .contains(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
        {
            self.report.performance(
                "BestPractices-vkCreateCommandPool-command-buffer-reset",
                &[device.into()],
                &error_obj.location.dot("pCreateInfo").dot("flags"),
                "contains `VK_COMMAND_POOL_CREATE_RESET_COMMAND_BUFFER_BIT`. Resetting the \
                whole pool with `vkResetCommandPool` is usually cheaper.",
            );
        }

        false
    }

    unsafe fn pre_call_validate_cmd_draw(
        &self,
        command_buffer: vk::CommandBuffer,
        _vertex_count: u32,
        instance_count: u32,
        _first_vertex: u32,
        _first_instance: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.validate_instance_count(
            "BestPractices-vkCmdDraw-instance-count-zero",
            command_buffer,
            instance_count,
            error_obj,
        );

        false
    }

    unsafe fn pre_call_validate_cmd_draw_indexed(
        &self,
        command_buffer: vk::CommandBuffer,
        _index_count: u32,
        instance_count: u32,
        _first_index: u32,
        _vertex_offset: i32,
        _first_instance: u32,
        error_obj: &ErrorObject,
    ) -> bool {
        self.validate_instance_count(
            "BestPractices-vkCmdDrawIndexed-instance-count-zero",
            command_buffer,
            instance_count,
            error_obj,
        );

        false
    }
}
