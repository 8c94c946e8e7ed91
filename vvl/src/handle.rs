use ash::vk::{self, Handle};
use std::fmt;

/// A type-erased Vulkan handle, as it appears in reports and reference sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub object_type: vk::ObjectType,
    pub raw: u64,
}

impl ObjectRef {
    pub const NULL: ObjectRef = ObjectRef {
        object_type: vk::ObjectType::UNKNOWN,
        raw: 0,
    };

    #[inline]
    pub fn is_null(&self) -> bool {
        self.raw == 0
    }

    /// Returns the `VK_OBJECT_TYPE_*` name of the handle's type.
    pub fn type_name(&self) -> String {
        format!("VK_OBJECT_TYPE_{:?}", self.object_type)
    }
}

impl<H> From<H> for ObjectRef
where
    H: Handle,
{
    #[inline]
    fn from(handle: H) -> Self {
        ObjectRef {
            object_type: H::TYPE,
            raw: handle.as_raw(),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:x})", self.object_type, self.raw)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle = 0x{:x}, type = {}", self.raw, self.type_name())
    }
}

/// A handle whose first pointer-sized word is the loader's dispatch pointer.
///
/// Every handle derived from the same instance or device shares that word, which is what the
/// layer keys its per-instance and per-device data on.
pub trait DispatchableHandle: Handle + Copy {
    /// Reads the dispatch key out of the handle.
    ///
    /// # Safety
    ///
    /// - The handle must be a live dispatchable handle created through the loader.
    #[inline]
    unsafe fn dispatch_key(self) -> usize {
        let raw = self.as_raw() as usize as *const usize;
        assert!(!raw.is_null(), "null dispatchable {:?} handle", Self::TYPE);

        unsafe { *raw }
    }
}

impl DispatchableHandle for vk::Instance {}
impl DispatchableHandle for vk::PhysicalDevice {}
impl DispatchableHandle for vk::Device {}
impl DispatchableHandle for vk::Queue {}
impl DispatchableHandle for vk::CommandBuffer {}
