//! The interface between the Vulkan loader and the layer.
//!
//! The structures here mirror `vk_layer.h`. The loader finds the layer through its JSON
//! manifest, calls [`vkNegotiateLoaderLayerInterfaceVersion`] and from then on resolves every
//! command through [`vkGetInstanceProcAddr`] and [`vkGetDeviceProcAddr`].

#![allow(non_snake_case)]

use crate::{
    chassis::{self, DeviceDispatch, InstanceDispatch},
    commands::{device_proc, instance_proc},
    ffi::{fill_enumeration, write_c_str},
};
use ash::vk;
use std::{
    ffi::{c_char, c_void, CStr},
    mem,
};

/// The name the layer is enabled with.
pub const LAYER_NAME: &CStr = c"VK_LAYER_VVL_validation";
pub const LAYER_DESCRIPTION: &str = "Rust Vulkan validation layer";
pub const IMPLEMENTATION_VERSION: u32 = 1;

/// The newest loader-layer interface version the layer speaks.
pub const CURRENT_LOADER_LAYER_INTERFACE_VERSION: u32 = 2;

#[allow(non_camel_case_types)]
pub type PFN_GetPhysicalDeviceProcAddr =
    unsafe extern "system" fn(vk::Instance, *const c_char) -> vk::PFN_vkVoidFunction;

/// `VkLayerFunction`: which member of the create info union is valid.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerFunction(pub i32);

impl LayerFunction {
    pub const LAYER_LINK_INFO: Self = Self(0);
    pub const LOADER_DATA_CALLBACK: Self = Self(1);
    pub const LOADER_LAYER_CREATE_DEVICE_CALLBACK: Self = Self(2);
    pub const LOADER_FEATURES: Self = Self(3);
}

#[repr(C)]
pub struct LayerInstanceLink {
    pub p_next: *mut LayerInstanceLink,
    pub pfn_next_get_instance_proc_addr: Option<vk::PFN_vkGetInstanceProcAddr>,
    pub pfn_next_get_physical_device_proc_addr: Option<PFN_GetPhysicalDeviceProcAddr>,
}

#[repr(C)]
pub struct LayerDeviceLink {
    pub p_next: *mut LayerDeviceLink,
    pub pfn_next_get_instance_proc_addr: Option<vk::PFN_vkGetInstanceProcAddr>,
    pub pfn_next_get_device_proc_addr: Option<vk::PFN_vkGetDeviceProcAddr>,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LayerDeviceCallbacks {
    pub pfn_layer_create_device: *const c_void,
    pub pfn_layer_destroy_device: *const c_void,
}

#[repr(C)]
pub union LayerInstanceCreateInfoData {
    pub p_layer_info: *mut LayerInstanceLink,
    pub pfn_set_instance_loader_data: *const c_void,
    pub layer_device: LayerDeviceCallbacks,
    pub loader_features: u32,
}

/// `VkLayerInstanceCreateInfo`, found in the `pNext` chain of `VkInstanceCreateInfo`.
#[repr(C)]
pub struct LayerInstanceCreateInfo {
    pub s_type: vk::StructureType,
    pub p_next: *const c_void,
    pub function: LayerFunction,
    pub u: LayerInstanceCreateInfoData,
}

#[repr(C)]
pub union LayerDeviceCreateInfoData {
    pub p_layer_info: *mut LayerDeviceLink,
    pub pfn_set_device_loader_data: *const c_void,
}

/// `VkLayerDeviceCreateInfo`, found in the `pNext` chain of `VkDeviceCreateInfo`.
#[repr(C)]
pub struct LayerDeviceCreateInfo {
    pub s_type: vk::StructureType,
    pub p_next: *const c_void,
    pub function: LayerFunction,
    pub u: LayerDeviceCreateInfoData,
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegotiateLayerStructType(pub i32);

impl NegotiateLayerStructType {
    pub const UNINITIALIZED: Self = Self(0);
    pub const INTERFACE_STRUCT: Self = Self(1);
}

#[repr(C)]
pub struct NegotiateLayerInterface {
    pub s_type: NegotiateLayerStructType,
    pub p_next: *mut c_void,
    pub loader_layer_interface_version: u32,
    pub pfn_get_instance_proc_addr: Option<vk::PFN_vkGetInstanceProcAddr>,
    pub pfn_get_device_proc_addr: Option<vk::PFN_vkGetDeviceProcAddr>,
    pub pfn_get_physical_device_proc_addr: Option<PFN_GetPhysicalDeviceProcAddr>,
}

/// The chain info structures the loader inserts for the layer.
pub(crate) trait LoaderChainInfo {
    const STRUCTURE_TYPE: vk::StructureType;

    fn function(&self) -> LayerFunction;
}

impl LoaderChainInfo for LayerInstanceCreateInfo {
    const STRUCTURE_TYPE: vk::StructureType = vk::StructureType::LOADER_INSTANCE_CREATE_INFO;

    fn function(&self) -> LayerFunction {
        self.function
    }
}

impl LoaderChainInfo for LayerDeviceCreateInfo {
    const STRUCTURE_TYPE: vk::StructureType = vk::StructureType::LOADER_DEVICE_CREATE_INFO;

    fn function(&self) -> LayerFunction {
        self.function
    }
}

/// Finds the link info the loader put in a create info's `pNext` chain.
///
/// The chain is const to the application, but the loader owns these structures and expects the
/// layer to advance the link before calling down.
///
/// # Safety
///
/// - `p_next` must be null or a valid structure chain.
pub(crate) unsafe fn find_link_info<T: LoaderChainInfo>(p_next: *const c_void) -> Option<*mut T> {
    let mut next = p_next.cast::<vk::BaseInStructure<'_>>();

    while let Some(base) = unsafe { next.as_ref() } {
        if base.s_type == T::STRUCTURE_TYPE {
            let info = next.cast_mut().cast::<T>();

            if unsafe { (*info).function() } == LayerFunction::LAYER_LINK_INFO {
                return Some(info);
            }
        }

        next = base.p_next;
    }

    None
}

/// Casts a function pointer to the type-erased form handed out by the `GetProcAddr` functions.
macro_rules! void_function {
    ($f:expr, $ty:ty) => {{
        let f: $ty = $f;
        Some(unsafe { mem::transmute::<$ty, unsafe extern "system" fn()>(f) })
    }};
}

/// Commands whose trampolines are written by hand, and the layer's own entry points.
fn manual_instance_proc(name: &CStr) -> vk::PFN_vkVoidFunction {
    match name.to_bytes() {
        b"vkGetInstanceProcAddr" => {
            void_function!(vkGetInstanceProcAddr, vk::PFN_vkGetInstanceProcAddr)
        }
        b"vkGetDeviceProcAddr" => void_function!(vkGetDeviceProcAddr, vk::PFN_vkGetDeviceProcAddr),
        b"vkCreateInstance" => {
            void_function!(chassis::instance::create_instance, vk::PFN_vkCreateInstance)
        }
        b"vkDestroyInstance" => {
            void_function!(chassis::instance::destroy_instance, vk::PFN_vkDestroyInstance)
        }
        b"vkCreateDevice" => {
            void_function!(chassis::instance::create_device, vk::PFN_vkCreateDevice)
        }
        b"vkEnumerateInstanceLayerProperties" => void_function!(
            vkEnumerateInstanceLayerProperties,
            vk::PFN_vkEnumerateInstanceLayerProperties
        ),
        b"vkEnumerateInstanceExtensionProperties" => void_function!(
            vkEnumerateInstanceExtensionProperties,
            vk::PFN_vkEnumerateInstanceExtensionProperties
        ),
        b"vkEnumerateDeviceLayerProperties" => void_function!(
            vkEnumerateDeviceLayerProperties,
            vk::PFN_vkEnumerateDeviceLayerProperties
        ),
        b"vkEnumerateDeviceExtensionProperties" => void_function!(
            vkEnumerateDeviceExtensionProperties,
            vk::PFN_vkEnumerateDeviceExtensionProperties
        ),
        _ => None,
    }
}

fn manual_device_proc(name: &CStr) -> vk::PFN_vkVoidFunction {
    match name.to_bytes() {
        b"vkGetDeviceProcAddr" => void_function!(vkGetDeviceProcAddr, vk::PFN_vkGetDeviceProcAddr),
        b"vkDestroyDevice" => {
            void_function!(chassis::device::destroy_device, vk::PFN_vkDestroyDevice)
        }
        _ => None,
    }
}

fn layer_properties() -> vk::LayerProperties {
    let mut properties = vk::LayerProperties {
        spec_version: vk::make_api_version(0, 1, 3, vk::HEADER_VERSION),
        implementation_version: IMPLEMENTATION_VERSION,
        ..Default::default()
    };
    write_c_str(
        &mut properties.layer_name,
        &LAYER_NAME.to_string_lossy(),
    );
    write_c_str(&mut properties.description, LAYER_DESCRIPTION);

    properties
}

/// # Safety
///
/// - `p_version_struct` must point to a valid `VkNegotiateLayerInterface`.
#[no_mangle]
pub unsafe extern "system" fn vkNegotiateLoaderLayerInterfaceVersion(
    p_version_struct: *mut NegotiateLayerInterface,
) -> vk::Result {
    let Some(version_struct) = (unsafe { p_version_struct.as_mut() }) else {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    };

    if version_struct.s_type != NegotiateLayerStructType::INTERFACE_STRUCT {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    }

    if version_struct.loader_layer_interface_version >= 2 {
        version_struct.pfn_get_instance_proc_addr = Some(vkGetInstanceProcAddr);
        version_struct.pfn_get_device_proc_addr = Some(vkGetDeviceProcAddr);
        version_struct.pfn_get_physical_device_proc_addr = Some(vk_layerGetPhysicalDeviceProcAddr);
    }

    version_struct.loader_layer_interface_version = version_struct
        .loader_layer_interface_version
        .min(CURRENT_LOADER_LAYER_INTERFACE_VERSION);

    log::debug!(
        "negotiated loader interface version {}",
        version_struct.loader_layer_interface_version,
    );

    vk::Result::SUCCESS
}

/// # Safety
///
/// - `p_name` must be a valid null-terminated string.
/// - `instance` must be null or an instance created through the layer.
#[no_mangle]
pub unsafe extern "system" fn vkGetInstanceProcAddr(
    instance: vk::Instance,
    p_name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    if p_name.is_null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(p_name) };

    if let Some(f) = manual_instance_proc(name) {
        return Some(f);
    }

    if instance == vk::Instance::null() {
        return None;
    }

    let dispatch = unsafe { InstanceDispatch::get(instance) };
    let next = unsafe { (dispatch.next_get_instance_proc_addr)(instance, p_name) };

    // Only hand out a trampoline if there is something to forward to.
    if next.is_none() {
        return None;
    }

    instance_proc(name)
        .or_else(|| manual_device_proc(name))
        .or_else(|| device_proc(name))
        .or(next)
}

/// # Safety
///
/// - `p_name` must be a valid null-terminated string.
/// - `device` must be a device created through the layer.
#[no_mangle]
pub unsafe extern "system" fn vkGetDeviceProcAddr(
    device: vk::Device,
    p_name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    if p_name.is_null() || device == vk::Device::null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(p_name) };

    if let Some(f) = manual_device_proc(name) {
        return Some(f);
    }

    let dispatch = unsafe { DeviceDispatch::get(device) };
    let next = unsafe { (dispatch.next_get_device_proc_addr)(device, p_name) };

    if next.is_none() {
        return None;
    }

    device_proc(name).or(next)
}

/// # Safety
///
/// - `p_name` must be a valid null-terminated string.
/// - `instance` must be an instance created through the layer.
#[no_mangle]
pub unsafe extern "system" fn vk_layerGetPhysicalDeviceProcAddr(
    instance: vk::Instance,
    p_name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    if p_name.is_null() || instance == vk::Instance::null() {
        return None;
    }

    let dispatch = unsafe { InstanceDispatch::get(instance) };
    let next = dispatch.next_get_physical_device_proc_addr?;

    unsafe { next(instance, p_name) }
}

/// # Safety
///
/// - `p_property_count` must be valid for reads and writes.
/// - If non-null, `p_properties` must be valid for `*p_property_count` writes.
#[no_mangle]
pub unsafe extern "system" fn vkEnumerateInstanceLayerProperties(
    p_property_count: *mut u32,
    p_properties: *mut vk::LayerProperties,
) -> vk::Result {
    unsafe { fill_enumeration(&[layer_properties()], p_property_count, p_properties) }
}

/// # Safety
///
/// - `p_layer_name` must be null or a valid null-terminated string.
/// - `p_property_count` must be valid for reads and writes.
#[no_mangle]
pub unsafe extern "system" fn vkEnumerateInstanceExtensionProperties(
    p_layer_name: *const c_char,
    p_property_count: *mut u32,
    p_properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    if !p_layer_name.is_null() && unsafe { CStr::from_ptr(p_layer_name) } == LAYER_NAME {
        unsafe { fill_enumeration(&[], p_property_count, p_properties) }
    } else {
        vk::Result::ERROR_LAYER_NOT_PRESENT
    }
}

/// # Safety
///
/// - `p_property_count` must be valid for reads and writes.
/// - If non-null, `p_properties` must be valid for `*p_property_count` writes.
#[no_mangle]
pub unsafe extern "system" fn vkEnumerateDeviceLayerProperties(
    _physical_device: vk::PhysicalDevice,
    p_property_count: *mut u32,
    p_properties: *mut vk::LayerProperties,
) -> vk::Result {
    unsafe { fill_enumeration(&[layer_properties()], p_property_count, p_properties) }
}

/// Reports no extensions for this layer, and forwards queries about the implementation or
/// other layers down the chain.
///
/// # Safety
///
/// - `p_layer_name` must be null or a valid null-terminated string.
/// - `p_property_count` must be valid for reads and writes.
/// - `physical_device` must be null or a physical device of an instance created through the
///   layer.
#[no_mangle]
pub unsafe extern "system" fn vkEnumerateDeviceExtensionProperties(
    physical_device: vk::PhysicalDevice,
    p_layer_name: *const c_char,
    p_property_count: *mut u32,
    p_properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    if !p_layer_name.is_null() && unsafe { CStr::from_ptr(p_layer_name) } == LAYER_NAME {
        return unsafe { fill_enumeration(&[], p_property_count, p_properties) };
    }

    if physical_device == vk::PhysicalDevice::null() {
        return vk::Result::ERROR_LAYER_NOT_PRESENT;
    }

    let dispatch = unsafe { InstanceDispatch::get(physical_device) };
    let Some(next) = (unsafe {
        (dispatch.next_get_instance_proc_addr)(
            dispatch.handle,
            c"vkEnumerateDeviceExtensionProperties".as_ptr(),
        )
    }) else {
        return vk::Result::ERROR_LAYER_NOT_PRESENT;
    };
    let next = unsafe {
        mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkEnumerateDeviceExtensionProperties>(
            next,
        )
    };

    unsafe { next(physical_device, p_layer_name, p_property_count, p_properties) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn negotiate_version() {
        let mut negotiate = NegotiateLayerInterface {
            s_type: NegotiateLayerStructType::INTERFACE_STRUCT,
            p_next: ptr::null_mut(),
            loader_layer_interface_version: 5,
            pfn_get_instance_proc_addr: None,
            pfn_get_device_proc_addr: None,
            pfn_get_physical_device_proc_addr: None,
        };

        let result = unsafe { vkNegotiateLoaderLayerInterfaceVersion(&mut negotiate) };
        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(negotiate.loader_layer_interface_version, 2);
        assert!(negotiate.pfn_get_instance_proc_addr.is_some());
        assert!(negotiate.pfn_get_physical_device_proc_addr.is_some());

        negotiate.s_type = NegotiateLayerStructType::UNINITIALIZED;
        let result = unsafe { vkNegotiateLoaderLayerInterfaceVersion(&mut negotiate) };
        assert_eq!(result, vk::Result::ERROR_INITIALIZATION_FAILED);
    }

    #[test]
    fn enumerate_layer() {
        let mut count = 0;
        let mut properties = vk::LayerProperties::default();

        unsafe {
            vkEnumerateInstanceLayerProperties(&mut count, ptr::null_mut());
            assert_eq!(count, 1);
            vkEnumerateInstanceLayerProperties(&mut count, &mut properties);
        }

        assert_eq!(crate::ffi::read_c_str(&properties.layer_name), LAYER_NAME);
        assert_eq!(properties.implementation_version, IMPLEMENTATION_VERSION);

        count = 0;
        let result = unsafe {
            vkEnumerateInstanceExtensionProperties(
                LAYER_NAME.as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(count, 0);

        let result = unsafe {
            vkEnumerateInstanceExtensionProperties(
                c"VK_LAYER_other".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);
    }

    #[test]
    fn global_commands_without_instance() {
        unsafe {
            assert!(vkGetInstanceProcAddr(vk::Instance::null(), c"vkCreateInstance".as_ptr())
                .is_some());
            assert!(vkGetInstanceProcAddr(
                vk::Instance::null(),
                c"vkEnumerateInstanceLayerProperties".as_ptr(),
            )
            .is_some());
            assert!(
                vkGetInstanceProcAddr(vk::Instance::null(), c"vkCreateBuffer".as_ptr()).is_none()
            );
        }
    }

    #[test]
    fn find_link_info_skips_other_functions() {
        let mut link = LayerInstanceLink {
            p_next: ptr::null_mut(),
            pfn_next_get_instance_proc_addr: None,
            pfn_next_get_physical_device_proc_addr: None,
        };
        let link_info = LayerInstanceCreateInfo {
            s_type: vk::StructureType::LOADER_INSTANCE_CREATE_INFO,
            p_next: ptr::null(),
            function: LayerFunction::LAYER_LINK_INFO,
            u: LayerInstanceCreateInfoData {
                p_layer_info: &mut link,
            },
        };
        let callback_info = LayerInstanceCreateInfo {
            s_type: vk::StructureType::LOADER_INSTANCE_CREATE_INFO,
            p_next: ptr::from_ref(&link_info).cast(),
            function: LayerFunction::LOADER_DATA_CALLBACK,
            u: LayerInstanceCreateInfoData {
                pfn_set_instance_loader_data: ptr::null(),
            },
        };

        let found = unsafe {
            find_link_info::<LayerInstanceCreateInfo>(ptr::from_ref(&callback_info).cast())
        };
        assert_eq!(found, Some(ptr::from_ref(&link_info).cast_mut()));
        assert!(unsafe { find_link_info::<LayerDeviceCreateInfo>(ptr::null()) }.is_none());
    }
}
