//! Tests that run whole call chains: the layer's entry points on top, [`fake_driver`] below.
//!
//! Every test creates its own instance and device, with its own messenger, so tests can run in
//! parallel. The validators are selected per instance through `VkLayerSettingsCreateInfoEXT`.

use crate::{
    layer::{
        self, LayerDeviceCreateInfo, LayerDeviceCreateInfoData, LayerDeviceLink, LayerFunction,
        LayerInstanceCreateInfo, LayerInstanceCreateInfoData, LayerInstanceLink, LAYER_NAME,
    },
    DeviceDispatchTable, InstanceDispatchTable,
};
use ash::vk;
use parking_lot::Mutex;
use std::{
    ffi::{c_char, c_void, CStr},
    mem, ptr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Calls a command through the layer's trampoline for it.
macro_rules! call {
    ($device:expr, $command:ident($($arg:expr),* $(,)?)) => {
        unsafe {
            ($device
                .fns
                .$command
                .expect(concat!(stringify!($command), " is not loaded")))($($arg),*)
        }
    };
}

/// Creates a [`TestDevice`] with the default validators and the given extension features.
macro_rules! test_device {
    ($($feature:ident),* $(,)?) => {
        $crate::tests::TestDevice::new($crate::tests::Features {
            $($feature: true,)*
            ..Default::default()
        })
    };
}

/// Asserts that exactly the given VUIDs were reported since the last check, in order.
macro_rules! assert_reported {
    ($device:expr $(, $vuid:expr)* $(,)?) => {{
        let expected: &[&str] = &[$($vuid),*];
        assert_eq!($device.messages.take_vuids(), expected);
    }};
}

mod best_practices;
mod memory;
mod object_lifetimes;
mod shader_object;
mod shaders;
mod sync;

pub(crate) const DEFAULT_VALIDATORS: &[&CStr] = &[c"core", c"object_lifetimes", c"thread_safety"];
const ALL_VALIDATORS: [&CStr; 4] = [
    c"core",
    c"object_lifetimes",
    c"thread_safety",
    c"best_practices",
];

/// The device features a test enables.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Features {
    pub(crate) core: vk::PhysicalDeviceFeatures,
    pub(crate) dynamic_rendering: bool,
    pub(crate) shader_object: bool,
    pub(crate) task_shader: bool,
    pub(crate) mesh_shader: bool,
}

/// A message delivered to the test messenger.
#[derive(Clone, Debug)]
pub(crate) struct Message {
    pub(crate) severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub(crate) vuid: String,
    pub(crate) text: String,
}

#[derive(Debug, Default)]
pub(crate) struct Messages {
    received: Mutex<Vec<Message>>,
    skip_on_error: AtomicBool,
}

impl Messages {
    /// Makes the messenger ask the layer to skip calls that it reports an error for.
    pub(crate) fn skip_on_error(&self, skip: bool) {
        self.skip_on_error.store(skip, Ordering::Relaxed);
    }

    /// Takes the messages received so far.
    pub(crate) fn take(&self) -> Vec<Message> {
        mem::take(&mut *self.received.lock())
    }

    /// Takes the messages received so far and returns their VUIDs.
    pub(crate) fn take_vuids(&self) -> Vec<String> {
        self.take().into_iter().map(|message| message.vuid).collect()
    }
}

unsafe fn read_str(p: *const c_char) -> String {
    if p.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()
    }
}

unsafe extern "system" fn collect_messages(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _types: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    p_user_data: *mut c_void,
) -> vk::Bool32 {
    let messages = unsafe { &*p_user_data.cast::<Messages>() };
    let data = unsafe { &*p_callback_data };

    messages.received.lock().push(Message {
        severity,
        vuid: unsafe { read_str(data.p_message_id_name) },
        text: unsafe { read_str(data.p_message) },
    });

    let skip = severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR)
        && messages.skip_on_error.load(Ordering::Relaxed);

    skip.into()
}

/// Resolves a command through the layer's `vkGetInstanceProcAddr`.
///
/// # Safety
///
/// - `F` must be the function pointer type of the command `name`.
unsafe fn instance_proc<F: Copy>(instance: vk::Instance, name: &CStr) -> F {
    let f = unsafe { layer::vkGetInstanceProcAddr(instance, name.as_ptr()) }
        .unwrap_or_else(|| panic!("{:?} is not exposed by the layer", name));

    unsafe { mem::transmute_copy::<unsafe extern "system" fn(), F>(&f) }
}

/// An instance and a device created through the layer, on top of the fake driver, with a
/// messenger that collects everything the layer reports.
pub(crate) struct TestDevice {
    pub(crate) instance: vk::Instance,
    pub(crate) physical_device: vk::PhysicalDevice,
    pub(crate) device: vk::Device,
    pub(crate) queue: vk::Queue,
    /// The layer's trampolines for the device.
    pub(crate) fns: DeviceDispatchTable,
    pub(crate) instance_fns: InstanceDispatchTable,
    pub(crate) get_shader_binary_data: vk::PFN_vkGetShaderBinaryDataEXT,
    pub(crate) messages: Arc<Messages>,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl TestDevice {
    pub(crate) fn new(features: Features) -> Self {
        TestDevice::with_validators(features, DEFAULT_VALIDATORS)
    }

    /// Creates the device with exactly `validators` enabled.
    pub(crate) fn with_validators(features: Features, validators: &[&CStr]) -> Self {
        let (instance, instance_fns) = create_instance(validators);

        let messages = Arc::new(Messages::default());
        let messenger_info = vk::DebugUtilsMessengerCreateInfoEXT {
            message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            pfn_user_callback: Some(collect_messages),
            p_user_data: Arc::as_ptr(&messages).cast_mut().cast(),
            ..Default::default()
        };
        let mut messenger = vk::DebugUtilsMessengerEXT::null();
        let result = unsafe {
            (instance_fns.create_debug_utils_messenger_ext.unwrap())(
                instance,
                &messenger_info,
                ptr::null(),
                &mut messenger,
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);

        let mut count = 1;
        let mut physical_device = vk::PhysicalDevice::null();
        let result = unsafe {
            (instance_fns.enumerate_physical_devices.unwrap())(
                instance,
                &mut count,
                &mut physical_device,
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);

        let device = create_device(&instance_fns, physical_device, &features);
        let fns = DeviceDispatchTable::load(|name| unsafe {
            layer::vkGetDeviceProcAddr(device, name.as_ptr())
        });
        let get_shader_binary_data = unsafe {
            let f = layer::vkGetDeviceProcAddr(device, c"vkGetShaderBinaryDataEXT".as_ptr())
                .unwrap();
            mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkGetShaderBinaryDataEXT>(f)
        };

        let mut test_device = TestDevice {
            instance,
            physical_device,
            device,
            queue: vk::Queue::null(),
            fns,
            instance_fns,
            get_shader_binary_data,
            messages,
            messenger,
        };

        let mut queue = vk::Queue::null();
        call!(test_device, get_device_queue(device, 0, 0, &mut queue));
        test_device.queue = queue;

        test_device
    }

    pub(crate) fn create_buffer(
        &self,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> vk::Buffer {
        let create_info = vk::BufferCreateInfo {
            size,
            usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };
        let mut buffer = vk::Buffer::null();
        let result = call!(
            self,
            create_buffer(self.device, &create_info, ptr::null(), &mut buffer)
        );
        assert_eq!(result, vk::Result::SUCCESS);

        buffer
    }

    pub(crate) fn allocate_memory(
        &self,
        allocation_size: vk::DeviceSize,
        memory_type_index: u32,
    ) -> vk::DeviceMemory {
        let allocate_info = vk::MemoryAllocateInfo {
            allocation_size,
            memory_type_index,
            ..Default::default()
        };
        let mut memory = vk::DeviceMemory::null();
        let result =
            call!(self, allocate_memory(self.device, &allocate_info, ptr::null(), &mut memory));
        assert_eq!(result, vk::Result::SUCCESS);

        memory
    }

    /// Creates a buffer bound to its own device local allocation.
    pub(crate) fn create_bound_buffer(
        &self,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> (vk::Buffer, vk::DeviceMemory) {
        let buffer = self.create_buffer(size, usage);
        let mut requirements = vk::MemoryRequirements::default();
        call!(self, get_buffer_memory_requirements(self.device, buffer, &mut requirements));

        let memory =
            self.allocate_memory(requirements.size, fake_driver::DEVICE_LOCAL_MEMORY_TYPE);
        let result = call!(self, bind_buffer_memory(self.device, buffer, memory, 0));
        assert_eq!(result, vk::Result::SUCCESS);

        (buffer, memory)
    }

    pub(crate) fn create_fence(&self, flags: vk::FenceCreateFlags) -> vk::Fence {
        let create_info = vk::FenceCreateInfo {
            flags,
            ..Default::default()
        };
        let mut fence = vk::Fence::null();
        let result = call!(self, create_fence(self.device, &create_info, ptr::null(), &mut fence));
        assert_eq!(result, vk::Result::SUCCESS);

        fence
    }

    pub(crate) fn create_semaphore(&self) -> vk::Semaphore {
        let create_info = vk::SemaphoreCreateInfo::default();
        let mut semaphore = vk::Semaphore::null();
        let result = call!(
            self,
            create_semaphore(self.device, &create_info, ptr::null(), &mut semaphore)
        );
        assert_eq!(result, vk::Result::SUCCESS);

        semaphore
    }

    pub(crate) fn create_command_pool(&self, flags: vk::CommandPoolCreateFlags) -> vk::CommandPool {
        let create_info = vk::CommandPoolCreateInfo {
            flags,
            queue_family_index: 0,
            ..Default::default()
        };
        let mut pool = vk::CommandPool::null();
        let result = call!(
            self,
            create_command_pool(self.device, &create_info, ptr::null(), &mut pool)
        );
        assert_eq!(result, vk::Result::SUCCESS);

        pool
    }

    pub(crate) fn allocate_command_buffer(
        &self,
        pool: vk::CommandPool,
        level: vk::CommandBufferLevel,
    ) -> vk::CommandBuffer {
        let allocate_info = vk::CommandBufferAllocateInfo {
            command_pool: pool,
            level,
            command_buffer_count: 1,
            ..Default::default()
        };
        let mut command_buffer = vk::CommandBuffer::null();
        let result = call!(
            self,
            allocate_command_buffers(self.device, &allocate_info, &mut command_buffer)
        );
        assert_eq!(result, vk::Result::SUCCESS);

        command_buffer
    }

    /// Creates a pool and a primary command buffer from it.
    pub(crate) fn primary_command_buffer(&self) -> (vk::CommandPool, vk::CommandBuffer) {
        let pool = self.create_command_pool(vk::CommandPoolCreateFlags::empty());
        let command_buffer = self.allocate_command_buffer(pool, vk::CommandBufferLevel::PRIMARY);

        (pool, command_buffer)
    }

    /// Begins recording. Only for calls that aren't expected to be skipped.
    pub(crate) fn begin(
        &self,
        command_buffer: vk::CommandBuffer,
        flags: vk::CommandBufferUsageFlags,
    ) {
        let begin_info = vk::CommandBufferBeginInfo {
            flags,
            ..Default::default()
        };
        let result = call!(self, begin_command_buffer(command_buffer, &begin_info));
        assert_eq!(result, vk::Result::SUCCESS);
    }

    pub(crate) fn end(&self, command_buffer: vk::CommandBuffer) {
        assert_eq!(call!(self, end_command_buffer(command_buffer)), vk::Result::SUCCESS);
    }

    /// Submits `command_buffers` to the device's queue in one batch.
    pub(crate) fn submit(
        &self,
        command_buffers: &[vk::CommandBuffer],
        fence: vk::Fence,
    ) -> vk::Result {
        let submit_info = vk::SubmitInfo {
            command_buffer_count: command_buffers.len() as u32,
            p_command_buffers: command_buffers.as_ptr(),
            ..Default::default()
        };

        call!(self, queue_submit(self.queue, 1, &submit_info, fence))
    }

    pub(crate) fn wait_idle(&self) {
        assert_eq!(call!(self, queue_wait_idle(self.queue)), vk::Result::SUCCESS);
    }

    /// Creates shader objects from `create_infos`, returning the result and every handle
    /// written.
    pub(crate) fn create_shaders(
        &self,
        create_infos: &[vk::ShaderCreateInfoEXT<'_>],
    ) -> (vk::Result, Vec<vk::ShaderEXT>) {
        let mut shaders = vec![vk::ShaderEXT::null(); create_infos.len()];
        let result = call!(
            self,
            create_shaders_ext(
                self.device,
                create_infos.len() as u32,
                create_infos.as_ptr(),
                ptr::null(),
                shaders.as_mut_ptr(),
            )
        );

        (result, shaders)
    }

    pub(crate) fn destroy_shader(&self, shader: vk::ShaderEXT) {
        call!(self, destroy_shader_ext(self.device, shader, ptr::null()));
    }
}

impl Drop for TestDevice {
    fn drop(&mut self) {
        unsafe {
            if let Some(destroy_device) = self.fns.destroy_device {
                destroy_device(self.device, ptr::null());
            }

            if let Some(destroy_messenger) = self.instance_fns.destroy_debug_utils_messenger_ext {
                destroy_messenger(self.instance, self.messenger, ptr::null());
            }

            if let Some(destroy_instance) = self.instance_fns.destroy_instance {
                destroy_instance(self.instance, ptr::null());
            }
        }
    }
}

/// Creates an instance through the layer with exactly `validators` enabled, and no limit on
/// repeated messages.
fn create_instance(validators: &[&CStr]) -> (vk::Instance, InstanceDispatchTable) {
    let enables: Vec<*const c_char> = validators.iter().map(|name| name.as_ptr()).collect();
    let disables: Vec<*const c_char> = ALL_VALIDATORS
        .iter()
        .filter(|name| !validators.contains(name))
        .map(|name| name.as_ptr())
        .collect();
    let duplicate_message_limit = 0u32;
    let layer_settings = [
        vk::LayerSettingEXT {
            p_layer_name: LAYER_NAME.as_ptr(),
            p_setting_name: c"enables".as_ptr(),
            ty: vk::LayerSettingTypeEXT::STRING,
            value_count: enables.len() as u32,
            p_values: enables.as_ptr().cast(),
            ..Default::default()
        },
        vk::LayerSettingEXT {
            p_layer_name: LAYER_NAME.as_ptr(),
            p_setting_name: c"disables".as_ptr(),
            ty: vk::LayerSettingTypeEXT::STRING,
            value_count: disables.len() as u32,
            p_values: disables.as_ptr().cast(),
            ..Default::default()
        },
        vk::LayerSettingEXT {
            p_layer_name: LAYER_NAME.as_ptr(),
            p_setting_name: c"duplicate_message_limit".as_ptr(),
            ty: vk::LayerSettingTypeEXT::UINT32,
            value_count: 1,
            p_values: ptr::from_ref(&duplicate_message_limit).cast(),
            ..Default::default()
        },
    ];
    let layer_settings_info = vk::LayerSettingsCreateInfoEXT {
        setting_count: layer_settings.len() as u32,
        p_settings: layer_settings.as_ptr(),
        ..Default::default()
    };

    let mut link = LayerInstanceLink {
        p_next: ptr::null_mut(),
        pfn_next_get_instance_proc_addr: Some(fake_driver::get_instance_proc_addr),
        pfn_next_get_physical_device_proc_addr: None,
    };
    let mut chain_info = LayerInstanceCreateInfo {
        s_type: vk::StructureType::LOADER_INSTANCE_CREATE_INFO,
        p_next: ptr::from_ref(&layer_settings_info).cast(),
        function: LayerFunction::LAYER_LINK_INFO,
        u: LayerInstanceCreateInfoData {
            p_layer_info: &mut link,
        },
    };
    let application_info = vk::ApplicationInfo {
        api_version: vk::API_VERSION_1_3,
        ..Default::default()
    };
    let extension_names = [c"VK_EXT_debug_utils".as_ptr()];
    let create_info = vk::InstanceCreateInfo {
        p_next: ptr::from_mut(&mut chain_info).cast_const().cast(),
        p_application_info: &application_info,
        enabled_extension_count: extension_names.len() as u32,
        pp_enabled_extension_names: extension_names.as_ptr(),
        ..Default::default()
    };

    let mut instance = vk::Instance::null();
    let result = unsafe {
        let create_instance: vk::PFN_vkCreateInstance =
            instance_proc(vk::Instance::null(), c"vkCreateInstance");
        create_instance(&create_info, ptr::null(), &mut instance)
    };
    assert_eq!(result, vk::Result::SUCCESS);

    let table = InstanceDispatchTable::load(|name| unsafe {
        layer::vkGetInstanceProcAddr(instance, name.as_ptr())
    });

    (instance, table)
}

fn create_device(
    instance_fns: &InstanceDispatchTable,
    physical_device: vk::PhysicalDevice,
    features: &Features,
) -> vk::Device {
    let priorities = [1.0f32];
    let queue_create_info = vk::DeviceQueueCreateInfo {
        queue_family_index: 0,
        queue_count: 1,
        p_queue_priorities: priorities.as_ptr(),
        ..Default::default()
    };
    let mut mesh_shader_features = vk::PhysicalDeviceMeshShaderFeaturesEXT {
        task_shader: features.task_shader.into(),
        mesh_shader: features.mesh_shader.into(),
        ..Default::default()
    };
    let mut shader_object_features = vk::PhysicalDeviceShaderObjectFeaturesEXT {
        p_next: ptr::from_mut(&mut mesh_shader_features).cast(),
        shader_object: features.shader_object.into(),
        ..Default::default()
    };
    let mut dynamic_rendering_features = vk::PhysicalDeviceDynamicRenderingFeatures {
        p_next: ptr::from_mut(&mut shader_object_features).cast(),
        dynamic_rendering: features.dynamic_rendering.into(),
        ..Default::default()
    };
    let mut extension_names = Vec::new();

    if features.shader_object {
        extension_names.push(c"VK_EXT_shader_object".as_ptr());
    }

    if features.task_shader || features.mesh_shader {
        extension_names.push(c"VK_EXT_mesh_shader".as_ptr());
    }

    let mut link = LayerDeviceLink {
        p_next: ptr::null_mut(),
        pfn_next_get_instance_proc_addr: Some(fake_driver::get_instance_proc_addr),
        pfn_next_get_device_proc_addr: Some(fake_driver::get_device_proc_addr),
    };
    let mut chain_info = LayerDeviceCreateInfo {
        s_type: vk::StructureType::LOADER_DEVICE_CREATE_INFO,
        p_next: ptr::from_mut(&mut dynamic_rendering_features)
            .cast_const()
            .cast(),
        function: LayerFunction::LAYER_LINK_INFO,
        u: LayerDeviceCreateInfoData {
            p_layer_info: &mut link,
        },
    };
    let create_info = vk::DeviceCreateInfo {
        p_next: ptr::from_mut(&mut chain_info).cast_const().cast(),
        queue_create_info_count: 1,
        p_queue_create_infos: &queue_create_info,
        enabled_extension_count: extension_names.len() as u32,
        pp_enabled_extension_names: extension_names.as_ptr(),
        p_enabled_features: &features.core,
        ..Default::default()
    };

    let mut device = vk::Device::null();
    let result = unsafe {
        (instance_fns.create_device.unwrap())(
            physical_device,
            &create_info,
            ptr::null(),
            &mut device,
        )
    };
    assert_eq!(result, vk::Result::SUCCESS);

    device
}

#[test]
fn create_and_destroy() {
    let device = test_device!();
    assert_ne!(device.device, vk::Device::null());
    assert_ne!(device.queue, vk::Queue::null());
    assert_reported!(device);
}

#[test]
fn get_device_queue_out_of_range() {
    let device = test_device!();
    let mut queue = vk::Queue::null();

    call!(device, get_device_queue(device.device, 0, 1, &mut queue));
    assert_reported!(device, "VUID-vkGetDeviceQueue-queueIndex-00385");

    call!(device, get_device_queue(device.device, 1, 0, &mut queue));
    assert_reported!(device, "VUID-vkGetDeviceQueue-queueFamilyIndex-00384");
}

#[test]
fn create_device_with_bad_queue_info() {
    let device = test_device!();
    device.messages.skip_on_error(true);

    // Family 1 has a single queue.
    let priorities = [1.0f32, 1.0];
    let queue_create_info = vk::DeviceQueueCreateInfo {
        queue_family_index: 1,
        queue_count: 2,
        p_queue_priorities: priorities.as_ptr(),
        ..Default::default()
    };
    let create_info = vk::DeviceCreateInfo {
        queue_create_info_count: 1,
        p_queue_create_infos: &queue_create_info,
        ..Default::default()
    };
    let mut new_device = vk::Device::null();

    // Skipped before the layer looks for its link info.
    let result = unsafe {
        (device.instance_fns.create_device.unwrap())(
            device.physical_device,
            &create_info,
            ptr::null(),
            &mut new_device,
        )
    };
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_eq!(new_device, vk::Device::null());
    assert_reported!(device, "VUID-VkDeviceQueueCreateInfo-queueCount-00382");
}
