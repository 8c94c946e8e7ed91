//! Helpers for reading the raw parameters the application hands to the layer.

use ash::vk;
use std::{
    ffi::{c_char, c_void, CStr},
    slice,
};

/// Views `count` elements at `ptr` as a slice. A null pointer or zero count gives an empty slice.
///
/// # Safety
///
/// - If non-null, `ptr` must point to `count` valid elements that outlive `'a`.
#[inline]
pub(crate) unsafe fn slice_from<'a, T>(ptr: *const T, count: u32) -> &'a [T] {
    if ptr.is_null() || count == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr, count as usize) }
    }
}

/// Dereferences an optional input pointer.
///
/// # Safety
///
/// - If non-null, `ptr` must point to a valid `T` that outlives `'a`.
#[inline]
pub(crate) unsafe fn opt_ref<'a, T>(ptr: *const T) -> Option<&'a T> {
    unsafe { ptr.as_ref() }
}

/// Iterates over the structures in a `pNext` chain that have type `s_type`, viewed as `T`.
///
/// # Safety
///
/// - `p_next` must be null or the head of a valid structure chain.
/// - `T` must be the structure that `s_type` identifies.
pub(crate) unsafe fn chain_iter<'a, T: 'a>(
    p_next: *const c_void,
    s_type: vk::StructureType,
) -> impl Iterator<Item = &'a T> {
    let mut next = p_next.cast::<vk::BaseInStructure<'a>>();

    std::iter::from_fn(move || unsafe {
        while let Some(base) = next.as_ref() {
            let current = next;
            next = base.p_next;

            if base.s_type == s_type {
                return Some(&*current.cast::<T>());
            }
        }

        None
    })
}

/// Returns the first structure of type `s_type` in a `pNext` chain.
///
/// # Safety
///
/// See [`chain_iter`].
#[inline]
pub(crate) unsafe fn chain_find<'a, T: 'a>(
    p_next: *const c_void,
    s_type: vk::StructureType,
) -> Option<&'a T> {
    unsafe { chain_iter(p_next, s_type).next() }
}

/// Copies `text` into a fixed size, NUL-terminated Vulkan string array, truncating if needed.
pub(crate) fn write_c_str<const N: usize>(dst: &mut [c_char; N], text: &str) {
    let len = text.len().min(N - 1);

    for (dst, &src) in dst.iter_mut().zip(&text.as_bytes()[..len]) {
        *dst = src as c_char;
    }

    dst[len] = 0;
}

/// Reads a fixed size, NUL-terminated Vulkan string array.
pub(crate) fn read_c_str<const N: usize>(src: &[c_char; N]) -> &CStr {
    let bytes = unsafe { slice::from_raw_parts(src.as_ptr().cast::<u8>(), N) };
    CStr::from_bytes_until_nul(bytes).unwrap_or_default()
}

/// Implements the two-call enumeration idiom: with a null `p_items`, writes the number of
/// available items; otherwise copies as many as fit and returns `VK_INCOMPLETE` if some didn't.
///
/// # Safety
///
/// - `p_count` must be valid for reads and writes.
/// - If non-null, `p_items` must be valid for `*p_count` writes.
pub(crate) unsafe fn fill_enumeration<T: Copy>(
    items: &[T],
    p_count: *mut u32,
    p_items: *mut T,
) -> vk::Result {
    unsafe {
        if p_items.is_null() {
            *p_count = items.len() as u32;
            return vk::Result::SUCCESS;
        }

        let count = (*p_count as usize).min(items.len());
        p_items.copy_from_nonoverlapping(items.as_ptr(), count);
        *p_count = count as u32;

        if count < items.len() {
            vk::Result::INCOMPLETE
        } else {
            vk::Result::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn chain_lookup() {
        let mut shader_object = vk::PhysicalDeviceShaderObjectFeaturesEXT {
            shader_object: vk::TRUE,
            ..Default::default()
        };
        let dynamic_rendering = vk::PhysicalDeviceDynamicRenderingFeatures {
            p_next: ptr::from_mut(&mut shader_object).cast(),
            dynamic_rendering: vk::TRUE,
            ..Default::default()
        };
        let head = ptr::from_ref(&dynamic_rendering).cast::<c_void>();

        let found: &vk::PhysicalDeviceShaderObjectFeaturesEXT<'_> = unsafe {
            chain_find(
                head,
                vk::StructureType::PHYSICAL_DEVICE_SHADER_OBJECT_FEATURES_EXT,
            )
        }
        .unwrap();
        assert_eq!(found.shader_object, vk::TRUE);

        let missing: Option<&vk::PhysicalDeviceFeatures2<'_>> = unsafe {
            chain_find(head, vk::StructureType::PHYSICAL_DEVICE_FEATURES_2)
        };
        assert!(missing.is_none());
        assert!(unsafe {
            chain_find::<vk::PhysicalDeviceFeatures2<'_>>(
                ptr::null(),
                vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
            )
        }
        .is_none());
    }

    #[test]
    fn c_str_arrays() {
        let mut name = [0 as c_char; vk::MAX_EXTENSION_NAME_SIZE];
        write_c_str(&mut name, "VK_LAYER_VVL_validation");
        assert_eq!(read_c_str(&name).to_bytes(), b"VK_LAYER_VVL_validation");

        let mut short = [0 as c_char; 4];
        write_c_str(&mut short, "abcdef");
        assert_eq!(read_c_str(&short).to_bytes(), b"abc");
    }

    #[test]
    fn enumeration() {
        let items = [1u32, 2, 3];
        let mut count = 0;
        unsafe {
            assert_eq!(
                fill_enumeration(&items, &mut count, ptr::null_mut()),
                vk::Result::SUCCESS,
            );
            assert_eq!(count, 3);

            let mut out = [0u32; 2];
            count = 2;
            assert_eq!(
                fill_enumeration(&items, &mut count, out.as_mut_ptr()),
                vk::Result::INCOMPLETE,
            );
            assert_eq!(out, [1, 2]);
        }
    }

    #[test]
    fn empty_slices() {
        let empty: &[u32] = unsafe { slice_from(ptr::null(), 4) };
        assert!(empty.is_empty());
    }
}
