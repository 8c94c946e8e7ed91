use super::ObjectMap;
use crate::{
    commands::{InstanceDispatchTable, InstanceValidator},
    report::DebugReport,
    version::Version,
    RecordObject,
};
use ash::vk;
use foldhash::HashSet;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    ffi::{c_char, CStr},
    ptr,
    sync::Arc,
};

/// What the layer knows about a physical device, queried once from the next link.
#[derive(Debug)]
pub struct PhysicalDeviceInfo {
    pub handle: vk::PhysicalDevice,
    pub properties: vk::PhysicalDeviceProperties,
    pub features: vk::PhysicalDeviceFeatures,
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
    pub queue_families: Vec<vk::QueueFamilyProperties>,
}

impl PhysicalDeviceInfo {
    /// Queries the device through `table`. Entries missing from the table leave the
    /// corresponding fields zeroed.
    ///
    /// # Safety
    ///
    /// - `handle` must be a physical device of the instance `table` was loaded for.
    pub unsafe fn query(handle: vk::PhysicalDevice, table: &InstanceDispatchTable) -> Self {
        let mut properties = vk::PhysicalDeviceProperties::default();
        let mut features = vk::PhysicalDeviceFeatures::default();
        let mut memory_properties = vk::PhysicalDeviceMemoryProperties::default();
        let mut queue_families = Vec::new();

        unsafe {
            if let Some(get_properties) = table.get_physical_device_properties {
                get_properties(handle, &mut properties);
            }

            if let Some(get_features) = table.get_physical_device_features {
                get_features(handle, &mut features);
            }

            if let Some(get_memory_properties) = table.get_physical_device_memory_properties {
                get_memory_properties(handle, &mut memory_properties);
            }

            if let Some(get_queue_families) = table.get_physical_device_queue_family_properties {
                let mut count = 0;
                get_queue_families(handle, &mut count, ptr::null_mut());
                queue_families.resize(count as usize, vk::QueueFamilyProperties::default());
                get_queue_families(handle, &mut count, queue_families.as_mut_ptr());
                queue_families.truncate(count as usize);
            }
        }

        PhysicalDeviceInfo {
            handle,
            properties,
            features,
            memory_properties,
            queue_families,
        }
    }

    #[inline]
    pub fn api_version(&self) -> Version {
        Version::from_vulkan_version(self.properties.api_version)
    }

    #[inline]
    pub fn memory_types(&self) -> &[vk::MemoryType] {
        let count = (self.memory_properties.memory_type_count as usize)
            .min(self.memory_properties.memory_types.len());

        &self.memory_properties.memory_types[..count]
    }

    #[inline]
    pub fn memory_heaps(&self) -> &[vk::MemoryHeap] {
        let count = (self.memory_properties.memory_heap_count as usize)
            .min(self.memory_properties.memory_heaps.len());

        &self.memory_properties.memory_heaps[..count]
    }

    /// Property flags of memory type `index`, or `None` if the index is out of range.
    #[inline]
    pub fn memory_type_flags(&self, index: u32) -> Option<vk::MemoryPropertyFlags> {
        self.memory_types()
            .get(index as usize)
            .map(|memory_type| memory_type.property_flags)
    }
}

/// The shadow state of one `VkInstance`.
#[derive(Debug)]
pub struct InstanceState {
    pub handle: vk::Instance,
    /// The API version the application asked for, 1.0 if it gave none.
    pub api_version: Version,
    pub enabled_extensions: Vec<String>,
    table: InstanceDispatchTable,
    enumerated: Mutex<SmallVec<[vk::PhysicalDevice; 2]>>,
    pub physical_devices: ObjectMap<vk::PhysicalDevice, PhysicalDeviceInfo>,
    pub devices: Mutex<HashSet<vk::Device>>,
    pub messengers: Mutex<HashSet<vk::DebugUtilsMessengerEXT>>,
}

impl InstanceState {
    /// # Safety
    ///
    /// - `create_info` must be a valid `VkInstanceCreateInfo`.
    pub unsafe fn new(
        handle: vk::Instance,
        create_info: &vk::InstanceCreateInfo<'_>,
        table: InstanceDispatchTable,
    ) -> Self {
        let api_version = unsafe { crate::ffi::opt_ref(create_info.p_application_info) }
            .map_or(Version::V1_0, |info| {
                Version::from_vulkan_version(info.api_version)
            });
        let enabled_extensions = unsafe {
            extension_names(
                create_info.pp_enabled_extension_names,
                create_info.enabled_extension_count,
            )
        };

        InstanceState {
            handle,
            api_version,
            enabled_extensions,
            table,
            enumerated: Mutex::new(SmallVec::new()),
            physical_devices: ObjectMap::new(),
            devices: Mutex::new(HashSet::default()),
            messengers: Mutex::new(HashSet::default()),
        }
    }

    #[inline]
    pub fn is_extension_enabled(&self, name: &CStr) -> bool {
        let name = name.to_string_lossy();
        self.enabled_extensions.iter().any(|e| *e == name)
    }

    /// The physical devices returned so far by `vkEnumeratePhysicalDevices`.
    pub fn enumerated_physical_devices(&self) -> SmallVec<[vk::PhysicalDevice; 2]> {
        self.enumerated.lock().clone()
    }

    /// Returns the info of `physical_device`, querying it on first use.
    ///
    /// # Safety
    ///
    /// - `physical_device` must belong to this instance.
    pub unsafe fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Arc<PhysicalDeviceInfo> {
        if let Some(info) = self.physical_devices.get(physical_device) {
            return info;
        }

        log::debug!("querying physical device {:?}", physical_device);

        self.physical_devices.insert(physical_device, unsafe {
            PhysicalDeviceInfo::query(physical_device, &self.table)
        })
    }
}

/// Reads a `ppEnabledExtensionNames`-style array.
///
/// # Safety
///
/// - `names` must point to `count` valid null-terminated strings, or be null.
pub(crate) unsafe fn extension_names(names: *const *const c_char, count: u32) -> Vec<String> {
    unsafe { crate::ffi::slice_from(names, count) }
        .iter()
        .filter(|name| !name.is_null())
        .map(|&name| unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
        .collect()
}

/// Keeps [`InstanceState`] current. Always the first instance validator.
pub struct InstanceStateTracker {
    state: Arc<InstanceState>,
    report: Arc<DebugReport>,
}

impl InstanceStateTracker {
    pub fn new(state: Arc<InstanceState>, report: Arc<DebugReport>) -> Self {
        InstanceStateTracker { state, report }
    }

    #[inline]
    pub fn state(&self) -> &Arc<InstanceState> {
        &self.state
    }
}

impl InstanceValidator for InstanceStateTracker {
    unsafe fn post_call_record_enumerate_physical_devices(
        &self,
        _instance: vk::Instance,
        p_physical_device_count: *mut u32,
        p_physical_devices: *mut vk::PhysicalDevice,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() || p_physical_devices.is_null() {
            return;
        }

        let returned =
            unsafe { crate::ffi::slice_from(p_physical_devices, *p_physical_device_count) };
        let mut enumerated = self.state.enumerated.lock();

        for &physical_device in returned {
            if !enumerated.contains(&physical_device) {
                enumerated.push(physical_device);
            }
        }
    }

    unsafe fn post_call_record_create_device(
        &self,
        _physical_device: vk::PhysicalDevice,
        _p_create_info: *const vk::DeviceCreateInfo<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_device: *mut vk::Device,
        record_obj: &RecordObject,
    ) {
        if record_obj.succeeded() {
            self.state.devices.lock().insert(unsafe { *p_device });
        }
    }

    unsafe fn post_call_record_create_debug_utils_messenger_ext(
        &self,
        _instance: vk::Instance,
        p_create_info: *const vk::DebugUtilsMessengerCreateInfoEXT<'_>,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        p_messenger: *mut vk::DebugUtilsMessengerEXT,
        record_obj: &RecordObject,
    ) {
        if !record_obj.succeeded() {
            return;
        }

        let messenger = unsafe { *p_messenger };
        self.report.register(messenger, unsafe { &*p_create_info });
        self.state.messengers.lock().insert(messenger);
    }

    unsafe fn pre_call_record_destroy_debug_utils_messenger_ext(
        &self,
        _instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        if messenger != vk::DebugUtilsMessengerEXT::null() {
            self.report.unregister(messenger);
            self.state.messengers.lock().remove(&messenger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extension_names, PhysicalDeviceInfo};
    use ash::vk::{self, Handle};
    use std::ffi::c_char;

    #[test]
    fn memory_type_lookup() {
        let mut memory_properties = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: 2,
            memory_heap_count: 1,
            ..Default::default()
        };
        memory_properties.memory_types[0].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
        memory_properties.memory_types[1].property_flags =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;

        let info = PhysicalDeviceInfo {
            handle: vk::PhysicalDevice::from_raw(1),
            properties: Default::default(),
            features: Default::default(),
            memory_properties,
            queue_families: Vec::new(),
        };

        assert_eq!(info.memory_types().len(), 2);
        assert_eq!(info.memory_heaps().len(), 1);
        assert_eq!(
            info.memory_type_flags(0),
            Some(vk::MemoryPropertyFlags::DEVICE_LOCAL),
        );
        assert_eq!(info.memory_type_flags(2), None);
    }

    #[test]
    fn read_extension_names() {
        let names: [*const c_char; 2] = [
            c"VK_EXT_debug_utils".as_ptr(),
            c"VK_KHR_surface".as_ptr(),
        ];

        assert_eq!(
            unsafe { extension_names(names.as_ptr(), 2) },
            ["VK_EXT_debug_utils", "VK_KHR_surface"],
        );
        assert!(unsafe { extension_names(std::ptr::null(), 0) }.is_empty());
    }
}
