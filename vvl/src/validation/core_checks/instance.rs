use crate::{
    commands::InstanceValidator,
    location::ErrorObject,
    report::DebugReport,
    state::{InstanceState, PhysicalDeviceInfo},
    ValidationError,
};
use ash::vk;
use foldhash::HashSet;
use std::sync::Arc;

/// The instance-level core validator.
pub struct InstanceCoreChecks {
    state: Arc<InstanceState>,
    report: Arc<DebugReport>,
}

impl InstanceCoreChecks {
    pub fn new(state: Arc<InstanceState>, report: Arc<DebugReport>) -> Self {
        InstanceCoreChecks { state, report }
    }

    /// # Safety
    ///
    /// - `create_info.p_queue_create_infos` must point to `queue_create_info_count` valid
    ///   elements, each with a valid `pQueuePriorities` array.
    unsafe fn validate_device_create_info(
        &self,
        info: &PhysicalDeviceInfo,
        create_info: &vk::DeviceCreateInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let queue_create_infos = unsafe {
            crate::ffi::slice_from(
                create_info.p_queue_create_infos,
                create_info.queue_create_info_count,
            )
        };
        let mut families = HashSet::default();

        for (index, queue_create_info) in queue_create_infos.iter().enumerate() {
            unsafe { validate_queue_create_info(info, queue_create_info) }
                .map_err(|err| err.add_context(format!("pQueueCreateInfos[{}]", index)))?;

            if !families.insert(queue_create_info.queue_family_index) {
                return Err(Box::new(ValidationError {
                    context: format!("pQueueCreateInfos[{}].queueFamilyIndex", index).into(),
                    problem: format!(
                        "({}) is used by an earlier element of `pQueueCreateInfos`",
                        queue_create_info.queue_family_index,
                    )
                    .into(),
                    vuids: &["VUID-VkDeviceCreateInfo-queueFamilyIndex-02802"],
                }));
            }
        }

        Ok(())
    }
}

unsafe fn validate_queue_create_info(
    info: &PhysicalDeviceInfo,
    queue_create_info: &vk::DeviceQueueCreateInfo<'_>,
) -> Result<(), Box<ValidationError>> {
    let &vk::DeviceQueueCreateInfo {
        queue_family_index,
        queue_count,
        p_queue_priorities,
        ..
    } = queue_create_info;

    let Some(family) = info.queue_families.get(queue_family_index as usize) else {
        return Err(Box::new(ValidationError {
            context: "queueFamilyIndex".into(),
            problem: format!(
                "({}) is not less than the number of queue families of the physical device ({})",
                queue_family_index,
                info.queue_families.len(),
            )
            .into(),
            vuids: &["VUID-VkDeviceQueueCreateInfo-queueFamilyIndex-00381"],
        }));
    };

    if queue_count == 0 || queue_count > family.queue_count {
        return Err(Box::new(ValidationError {
            context: "queueCount".into(),
            problem: format!(
                "({}) is 0 or greater than the number of queues in queue family {} ({})",
                queue_count, queue_family_index, family.queue_count,
            )
            .into(),
            vuids: &["VUID-VkDeviceQueueCreateInfo-queueCount-00382"],
        }));
    }

    let priorities = unsafe { crate::ffi::slice_from(p_queue_priorities, queue_count) };

    for (index, &priority) in priorities.iter().enumerate() {
        if !(0.0..=1.0).contains(&priority) {
            return Err(Box::new(ValidationError {
                context: format!("pQueuePriorities[{}]", index).into(),
                problem: format!("({}) is not between 0.0 and 1.0 inclusive", priority).into(),
                vuids: &["VUID-VkDeviceQueueCreateInfo-pQueuePriorities-00383"],
            }));
        }
    }

    Ok(())
}

impl InstanceValidator for InstanceCoreChecks {
    unsafe fn pre_call_validate_destroy_instance(
        &self,
        instance: vk::Instance,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        error_obj: &ErrorObject,
    ) -> bool {
        let devices: Vec<_> = self.state.devices.lock().iter().copied().collect();
        let mut skip = false;

        for device in devices {
            skip |= self.report.error(
                "VUID-vkDestroyInstance-instance-00629",
                &[instance.into(), device.into()],
                &error_obj.location,
                format_args!(
                    "{:?} was created from this instance and has not been destroyed",
                    device,
                ),
            );
        }

        skip
    }

    unsafe fn pre_call_validate_create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        p_create_info: *const vk::DeviceCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _p_device: *mut vk::Device,
        error_obj: &ErrorObject,
    ) -> bool {
        let info = unsafe { self.state.physical_device_info(physical_device) };
        let result = unsafe { self.validate_device_create_info(&info, &*p_create_info) }
            .map_err(|err| err.add_context("pCreateInfo"));

        match result {
            Ok(()) => false,
            Err(err) => {
                self.report
                    .validation_error(&[physical_device.into()], &error_obj.location, &err)
            }
        }
    }
}
