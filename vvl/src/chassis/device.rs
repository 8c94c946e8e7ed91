use super::{lookup, DispatchRegistry, InstanceDispatch};
use crate::{
    commands::{Command, DeviceDispatchTable, DeviceValidator},
    handle::DispatchableHandle,
    report::DebugReport,
    state::DeviceState,
    version::Version,
    ErrorObject, RecordObject,
};
use ash::vk;
use std::sync::Arc;

static DEVICES: DispatchRegistry<DeviceDispatch> = DispatchRegistry::new();

/// Everything the layer keeps for one `VkDevice`.
pub struct DeviceDispatch {
    pub handle: vk::Device,
    pub instance: Arc<InstanceDispatch>,
    pub table: DeviceDispatchTable,
    /// The device state tracker first, then the enabled validators.
    pub validators: Vec<Box<dyn DeviceValidator>>,
    /// Shared with the instance.
    pub report: Arc<DebugReport>,
    pub api_version: Version,
    pub state: Arc<DeviceState>,
    pub(crate) next_get_device_proc_addr: vk::PFN_vkGetDeviceProcAddr,
}

impl DeviceDispatch {
    /// Returns the dispatch object of the device `handle` belongs to.
    ///
    /// # Safety
    ///
    /// - `handle` must be a live `VkDevice`, `VkQueue` or `VkCommandBuffer` created through the
    ///   layer.
    #[inline]
    pub unsafe fn get(handle: impl DispatchableHandle) -> Arc<Self> {
        unsafe { lookup(&DEVICES, handle) }
    }

    /// Number of live devices.
    pub fn count() -> usize {
        DEVICES.len()
    }
}

pub(super) fn register(key: usize, dispatch: DeviceDispatch) {
    DEVICES.insert(key, Arc::new(dispatch));
}

pub(crate) unsafe extern "system" fn destroy_device(
    device: vk::Device,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    if device == vk::Device::null() {
        return;
    }

    let key = unsafe { device.dispatch_key() };
    let dispatch = unsafe { DeviceDispatch::get(device) };
    let error_obj = ErrorObject::new(Command::DestroyDevice, device.into(), dispatch.api_version);
    let mut skip = false;

    for validator in &dispatch.validators {
        skip |=
            unsafe { validator.pre_call_validate_destroy_device(device, p_allocator, &error_obj) };
    }

    if skip {
        return;
    }

    let record_obj = RecordObject::new(Command::DestroyDevice);

    for validator in &dispatch.validators {
        unsafe { validator.pre_call_record_destroy_device(device, p_allocator, &record_obj) };
    }

    match dispatch.table.destroy_device {
        Some(next) => unsafe { next(device, p_allocator) },
        None => log::error!(
            "{} is not provided by the next link in the chain",
            Command::DestroyDevice,
        ),
    }

    for validator in &dispatch.validators {
        unsafe { validator.post_call_record_destroy_device(device, p_allocator, &record_obj) };
    }

    DEVICES.remove(key);
    log::debug!("destroyed {:?}", device);
}
