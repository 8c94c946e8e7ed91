//! Per-instance and per-device dispatch objects, and the registry that finds them from a
//! dispatchable handle.
//!
//! Every dispatchable handle starts with the loader's dispatch pointer, shared by all handles
//! derived from the same instance or device. The registry is keyed on that word, so a
//! `VkQueue` or `VkCommandBuffer` resolves to its device and a `VkPhysicalDevice` to its
//! instance without any per-handle bookkeeping.

pub use self::{device::DeviceDispatch, instance::InstanceDispatch};
use crate::{commands::Command, handle::DispatchableHandle};
use ash::vk;
use parking_lot::RwLock;
use std::sync::Arc;

pub(crate) mod device;
pub(crate) mod instance;

/// Maps dispatch keys to dispatch objects.
pub(crate) struct DispatchRegistry<T> {
    entries: RwLock<Vec<(usize, Arc<T>)>>,
}

impl<T> DispatchRegistry<T> {
    pub(crate) const fn new() -> Self {
        DispatchRegistry {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn insert(&self, key: usize, value: Arc<T>) {
        let mut entries = self.entries.write();
        entries.retain(|&(k, _)| k != key);
        entries.push((key, value));
    }

    pub(crate) fn remove(&self, key: usize) -> Option<Arc<T>> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|&(k, _)| k == key)?;

        Some(entries.swap_remove(index).1)
    }

    /// Looks up the entry for `key`. The lock is released before returning.
    pub(crate) fn get(&self, key: usize) -> Option<Arc<T>> {
        self.entries
            .read()
            .iter()
            .find(|&&(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Looks up the dispatch object of `handle`, panicking if the layer never saw the instance or
/// device it belongs to.
///
/// # Safety
///
/// - `handle` must be a live dispatchable handle.
pub(crate) unsafe fn lookup<T, H: DispatchableHandle>(
    registry: &DispatchRegistry<T>,
    handle: H,
) -> Arc<T> {
    let key = unsafe { handle.dispatch_key() };

    match registry.get(key) {
        Some(dispatch) => dispatch,
        None => panic!(
            "{:?} {:#x} has dispatch key {:#x}, which no live dispatch object is registered for",
            H::TYPE,
            handle.as_raw(),
            key,
        ),
    }
}

/// The return type of an intercepted command.
pub trait CommandReturn: Copy {
    /// The value returned when validation skipped the call.
    fn skipped() -> Self;

    /// The value returned when the next link doesn't provide the command.
    fn missing(command: Command) -> Self;

    /// The result code to store in the `RecordObject`, if there is one.
    fn record_result(&self) -> Option<vk::Result>;
}

fn log_missing(command: Command) {
    log::error!("{} is not provided by the next link in the chain", command);
}

impl CommandReturn for () {
    #[inline]
    fn skipped() -> Self {}

    #[inline]
    fn missing(command: Command) -> Self {
        log_missing(command);
    }

    #[inline]
    fn record_result(&self) -> Option<vk::Result> {
        None
    }
}

impl CommandReturn for vk::Result {
    #[inline]
    fn skipped() -> Self {
        vk::Result::ERROR_VALIDATION_FAILED_EXT
    }

    #[inline]
    fn missing(command: Command) -> Self {
        log_missing(command);
        vk::Result::ERROR_EXTENSION_NOT_PRESENT
    }

    #[inline]
    fn record_result(&self) -> Option<vk::Result> {
        Some(*self)
    }
}

macro_rules! impl_zero_command_return {
    ($($ty:ty),+) => {
        $(
            impl CommandReturn for $ty {
                #[inline]
                fn skipped() -> Self {
                    0
                }

                #[inline]
                fn missing(command: Command) -> Self {
                    log_missing(command);
                    0
                }

                #[inline]
                fn record_result(&self) -> Option<vk::Result> {
                    None
                }
            }
        )+
    };
}

impl_zero_command_return!(u32, u64);

#[cfg(test)]
mod tests {
    use super::{CommandReturn, DispatchRegistry};
    use crate::commands::Command;
    use ash::vk;
    use std::sync::Arc;

    #[test]
    fn registry() {
        let registry = DispatchRegistry::new();
        registry.insert(1, Arc::new("first"));
        registry.insert(2, Arc::new("second"));
        registry.insert(1, Arc::new("replaced"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).as_deref(), Some(&"replaced"));
        assert_eq!(registry.remove(2).as_deref(), Some(&"second"));
        assert!(registry.get(2).is_none());
        assert!(registry.remove(2).is_none());
    }

    #[test]
    fn command_return_values() {
        assert_eq!(
            <vk::Result as CommandReturn>::skipped(),
            vk::Result::ERROR_VALIDATION_FAILED_EXT,
        );
        assert_eq!(
            <vk::Result as CommandReturn>::missing(Command::CreateShadersEXT),
            vk::Result::ERROR_EXTENSION_NOT_PRESENT,
        );
        assert_eq!(<u64 as CommandReturn>::skipped(), 0);
        assert_eq!(
            vk::Result::TIMEOUT.record_result(),
            Some(vk::Result::TIMEOUT),
        );
        assert_eq!(().record_result(), None);
        assert_eq!(7u32.record_result(), None);
    }
}
