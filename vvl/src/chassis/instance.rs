use super::{lookup, DeviceDispatch, DispatchRegistry};
use crate::{
    commands::{Command, DeviceDispatchTable, InstanceDispatchTable, InstanceValidator},
    handle::DispatchableHandle,
    layer::{
        find_link_info, LayerDeviceCreateInfo, LayerInstanceCreateInfo,
        PFN_GetPhysicalDeviceProcAddr,
    },
    report::DebugReport,
    settings::{self, Settings},
    state::{DeviceState, InstanceState},
    validation,
    version::Version,
    ErrorObject, RecordObject,
};
use ash::vk;
use std::{mem, sync::Arc};

static INSTANCES: DispatchRegistry<InstanceDispatch> = DispatchRegistry::new();

/// Everything the layer keeps for one `VkInstance`.
pub struct InstanceDispatch {
    pub handle: vk::Instance,
    pub table: InstanceDispatchTable,
    /// The instance state tracker first, then the enabled validators.
    pub validators: Vec<Box<dyn InstanceValidator>>,
    pub report: Arc<DebugReport>,
    pub settings: Settings,
    pub api_version: Version,
    pub state: Arc<InstanceState>,
    pub(crate) next_get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    pub(crate) next_get_physical_device_proc_addr: Option<PFN_GetPhysicalDeviceProcAddr>,
}

impl InstanceDispatch {
    /// Returns the dispatch object of the instance `handle` belongs to.
    ///
    /// # Safety
    ///
    /// - `handle` must be a live `VkInstance` or `VkPhysicalDevice` created through the layer.
    #[inline]
    pub unsafe fn get(handle: impl DispatchableHandle) -> Arc<Self> {
        unsafe { lookup(&INSTANCES, handle) }
    }

    /// Number of live instances.
    pub fn count() -> usize {
        INSTANCES.len()
    }
}

pub(crate) unsafe extern "system" fn create_instance(
    p_create_info: *const vk::InstanceCreateInfo<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_instance: *mut vk::Instance,
) -> vk::Result {
    let create_info = unsafe { &*p_create_info };
    let Some(chain_info) =
        (unsafe { find_link_info::<LayerInstanceCreateInfo>(create_info.p_next) })
    else {
        panic!("vkCreateInstance called without loader link info");
    };

    let mut settings = Settings::load();
    settings::init_logging(&settings);

    if let Err(err) = unsafe { settings.apply_layer_settings(create_info.p_next) } {
        log::warn!("ignoring invalid layer settings: {}", err);
    }

    let link = unsafe { (*chain_info).u.p_layer_info };
    let (Some(next_gipa), next_gpdpa) = (unsafe {
        (
            (*link).pfn_next_get_instance_proc_addr,
            (*link).pfn_next_get_physical_device_proc_addr,
        )
    }) else {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    };
    let Some(next_create_instance) =
        (unsafe { next_gipa(vk::Instance::null(), c"vkCreateInstance".as_ptr()) })
    else {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    };
    let next_create_instance = unsafe {
        mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateInstance>(
            next_create_instance,
        )
    };

    // Advance the link for the next layer.
    unsafe { (*chain_info).u.p_layer_info = (*link).p_next };

    let result = unsafe { next_create_instance(p_create_info, p_allocator, p_instance) };

    if result != vk::Result::SUCCESS {
        return result;
    }

    let instance = unsafe { *p_instance };
    let table = InstanceDispatchTable::load(|name| unsafe { next_gipa(instance, name.as_ptr()) });
    let state = Arc::new(unsafe { InstanceState::new(instance, create_info, table) });
    let report = Arc::new(DebugReport::new(&settings));
    unsafe { report.register_chained(create_info.p_next) };

    let validators = validation::instance_validators(&settings, &state, &report);
    log::debug!(
        "created {:?} with API version {} and {} validators",
        instance,
        state.api_version,
        validators.len(),
    );

    let dispatch = InstanceDispatch {
        handle: instance,
        table,
        validators,
        report: report.clone(),
        settings,
        api_version: state.api_version,
        state,
        next_get_instance_proc_addr: next_gipa,
        next_get_physical_device_proc_addr: next_gpdpa,
    };
    INSTANCES.insert(unsafe { instance.dispatch_key() }, Arc::new(dispatch));
    report.park_chained();

    result
}

pub(crate) unsafe extern "system" fn destroy_instance(
    instance: vk::Instance,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    if instance == vk::Instance::null() {
        return;
    }

    let key = unsafe { instance.dispatch_key() };
    let dispatch = unsafe { InstanceDispatch::get(instance) };
    dispatch.report.restore_chained();

    let error_obj = ErrorObject::new(
        Command::DestroyInstance,
        instance.into(),
        dispatch.api_version,
    );
    let mut skip = false;

    for validator in &dispatch.validators {
        skip |= unsafe {
            validator.pre_call_validate_destroy_instance(instance, p_allocator, &error_obj)
        };
    }

    if skip {
        dispatch.report.park_chained();
        return;
    }

    let record_obj = RecordObject::new(Command::DestroyInstance);

    for validator in &dispatch.validators {
        unsafe { validator.pre_call_record_destroy_instance(instance, p_allocator, &record_obj) };
    }

    match dispatch.table.destroy_instance {
        Some(next) => unsafe { next(instance, p_allocator) },
        None => log::error!(
            "{} is not provided by the next link in the chain",
            Command::DestroyInstance,
        ),
    }

    for validator in &dispatch.validators {
        unsafe { validator.post_call_record_destroy_instance(instance, p_allocator, &record_obj) };
    }

    INSTANCES.remove(key);
    log::debug!("destroyed {:?}", instance);
}

/// `vkCreateDevice` is an instance-level command that creates a new dispatchable object, so
/// besides the usual three phases it sets up the device's dispatch object.
pub(crate) unsafe extern "system" fn create_device(
    physical_device: vk::PhysicalDevice,
    p_create_info: *const vk::DeviceCreateInfo<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_device: *mut vk::Device,
) -> vk::Result {
    let instance_dispatch = unsafe { InstanceDispatch::get(physical_device) };
    let error_obj = ErrorObject::new(
        Command::CreateDevice,
        physical_device.into(),
        instance_dispatch.api_version,
    );
    let mut skip = false;

    for validator in &instance_dispatch.validators {
        skip |= unsafe {
            validator.pre_call_validate_create_device(
                physical_device,
                p_create_info,
                p_allocator,
                p_device,
                &error_obj,
            )
        };
    }

    if skip {
        return vk::Result::ERROR_VALIDATION_FAILED_EXT;
    }

    let create_info = unsafe { &*p_create_info };
    let Some(chain_info) = (unsafe { find_link_info::<LayerDeviceCreateInfo>(create_info.p_next) })
    else {
        panic!("vkCreateDevice called without loader link info");
    };

    let link = unsafe { (*chain_info).u.p_layer_info };
    let (Some(next_gipa), Some(next_gdpa)) = (unsafe {
        (
            (*link).pfn_next_get_instance_proc_addr,
            (*link).pfn_next_get_device_proc_addr,
        )
    }) else {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    };
    let Some(next_create_device) =
        (unsafe { next_gipa(instance_dispatch.handle, c"vkCreateDevice".as_ptr()) })
    else {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    };
    let next_create_device = unsafe {
        mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateDevice>(next_create_device)
    };

    let mut record_obj = RecordObject::new(Command::CreateDevice);

    for validator in &instance_dispatch.validators {
        unsafe {
            validator.pre_call_record_create_device(
                physical_device,
                p_create_info,
                p_allocator,
                p_device,
                &record_obj,
            )
        };
    }

    unsafe { (*chain_info).u.p_layer_info = (*link).p_next };

    let result =
        unsafe { next_create_device(physical_device, p_create_info, p_allocator, p_device) };
    record_obj.result = Some(result);

    if result == vk::Result::SUCCESS {
        let device = unsafe { *p_device };
        let table = DeviceDispatchTable::load(|name| unsafe { next_gdpa(device, name.as_ptr()) });
        let state = Arc::new(unsafe {
            DeviceState::new(
                device,
                physical_device,
                instance_dispatch.state.clone(),
                create_info,
            )
        });
        let validators = validation::device_validators(
            &instance_dispatch.settings,
            &state,
            &instance_dispatch.report,
            table,
        );
        log::debug!(
            "created {:?} with API version {} and {} validators",
            device,
            state.api_version,
            validators.len(),
        );

        let dispatch = DeviceDispatch {
            handle: device,
            report: instance_dispatch.report.clone(),
            instance: instance_dispatch.clone(),
            table,
            validators,
            api_version: state.api_version,
            state,
            next_get_device_proc_addr: next_gdpa,
        };
        super::device::register(unsafe { device.dispatch_key() }, dispatch);
    }

    for validator in &instance_dispatch.validators {
        unsafe {
            validator.post_call_record_create_device(
                physical_device,
                p_create_info,
                p_allocator,
                p_device,
                &record_obj,
            )
        };
    }

    result
}
