//! Detects externally synchronized objects being written from two threads at once.
//!
//! A write starts in the pre-call record phase and finishes in the post-call record phase, so an
//! object counts as in use exactly while the driver is executing the call. Writing an object that
//! another thread is still writing is reported as `UNASSIGNED-Threading-MultipleThreads-Write`.
//! The calls themselves are never skipped.

use crate::{
    commands::DeviceValidator,
    handle::ObjectRef,
    location::{Location, RecordObject},
    report::DebugReport,
    state::DeviceState,
};
use ash::vk;
use foldhash::HashMap;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    ffi::c_void,
    sync::Arc,
    thread::{self, ThreadId},
};

const MULTIPLE_THREADS_WRITE: &str = "UNASSIGNED-Threading-MultipleThreads-Write";

/// The device-level thread safety validator.
pub struct ThreadSafety {
    state: Arc<DeviceState>,
    report: Arc<DebugReport>,
    uses: UseTracker,
}

impl ThreadSafety {
    pub fn new(state: Arc<DeviceState>, report: Arc<DebugReport>) -> Self {
        ThreadSafety {
            state,
            report,
            uses: UseTracker::default(),
        }
    }

    fn start_write(&self, object: ObjectRef, location: &Location) {
        let current = thread::current().id();

        if let Some(other) = self.uses.start_write(object, current) {
            self.report.error(
                MULTIPLE_THREADS_WRITE,
                &[object],
                location,
                format_args!(
                    "THREADING ERROR : object of type {} is simultaneously used in current thread \
                    {:?} and thread {:?}",
                    object.type_name(),
                    current,
                    other,
                ),
            );
        }
    }

    fn finish_write(&self, object: ObjectRef) {
        self.uses.finish_write(object, thread::current().id());
    }

    /// Writing a command buffer also writes the pool it was allocated from.
    fn command_buffer_objects(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> SmallVec<[ObjectRef; 2]> {
        let mut objects = SmallVec::new();
        objects.push(ObjectRef::from(command_buffer));

        if let Some(command_buffer) = self.state.command_buffers.get(command_buffer) {
            objects.push(ObjectRef::from(command_buffer.pool));
        }

        objects
    }

    fn start_write_command_buffer(&self, command_buffer: vk::CommandBuffer, location: &Location) {
        for object in self.command_buffer_objects(command_buffer) {
            self.start_write(object, location);
        }
    }

    fn finish_write_command_buffer(&self, command_buffer: vk::CommandBuffer) {
        for object in self.command_buffer_objects(command_buffer) {
            self.finish_write(object);
        }
    }

    fn start_write_all<H>(&self, handles: &[H], location: &Location)
    where
        H: vk::Handle + Copy,
    {
        for &handle in handles {
            self.start_write(handle.into(), location);
        }
    }

    fn finish_write_all<H>(&self, handles: &[H])
    where
        H: vk::Handle + Copy,
    {
        for &handle in handles {
            self.finish_write(handle.into());
        }
    }
}

/// Counts the writers of every object that is currently in use, per writing thread.
#[derive(Default)]
struct UseTracker {
    uses: Mutex<HashMap<ObjectRef, ObjectUse>>,
}

/// Writing threads paired with their nesting depth. Entries never hold a zero count.
type ObjectUse = SmallVec<[(ThreadId, u32); 2]>;

impl UseTracker {
    /// Records a write of `object` by `thread`. Returns another thread if one is still writing the
    /// object.
    fn start_write(&self, object: ObjectRef, thread: ThreadId) -> Option<ThreadId> {
        if object.is_null() {
            return None;
        }

        let mut uses = self.uses.lock();
        let writers = uses.entry(object).or_default();
        let other = writers
            .iter()
            .find(|&&(writer, _)| writer != thread)
            .map(|&(writer, _)| writer);

        match writers.iter_mut().find(|(writer, _)| *writer == thread) {
            Some((_, count)) => *count += 1,
            None => writers.push((thread, 1)),
        }

        other
    }

    fn finish_write(&self, object: ObjectRef, thread: ThreadId) {
        let mut uses = self.uses.lock();

        let Some(writers) = uses.get_mut(&object) else {
            return;
        };

        if let Some(index) = writers.iter().position(|&(writer, _)| writer == thread) {
            writers[index].1 -= 1;

            if writers[index].1 == 0 {
                writers.swap_remove(index);
            }
        }

        if writers.is_empty() {
            uses.remove(&object);
        }
    }

    #[cfg(test)]
    fn in_use(&self) -> usize {
        self.uses.lock().len()
    }
}

/// Record hooks of commands that write their command buffer and nothing else.
macro_rules! command_buffer_writes {
    ($($pre_record:ident, $post_record:ident($($ty:ty),* $(,)?);)*) => {
        $(
            unsafe fn $pre_record(
                &self,
                command_buffer: vk::CommandBuffer,
                $(_: $ty,)*
                record_obj: &RecordObject,
            ) {
                self.start_write_command_buffer(command_buffer, &record_obj.location);
            }

            unsafe fn $post_record(
                &self,
                command_buffer: vk::CommandBuffer,
                $(_: $ty,)*
                _record_obj: &RecordObject,
            ) {
                self.finish_write_command_buffer(command_buffer);
            }
        )*
    };
}

impl DeviceValidator for ThreadSafety {
    command_buffer_writes! {
        pre_call_record_begin_command_buffer,
        post_call_record_begin_command_buffer(*const vk::CommandBufferBeginInfo<'_>);
        pre_call_record_end_command_buffer, post_call_record_end_command_buffer();
        pre_call_record_reset_command_buffer,
        post_call_record_reset_command_buffer(vk::CommandBufferResetFlags);
        pre_call_record_cmd_bind_pipeline,
        post_call_record_cmd_bind_pipeline(vk::PipelineBindPoint, vk::Pipeline);
        pre_call_record_cmd_bind_descriptor_sets,
        post_call_record_cmd_bind_descriptor_sets(
            vk::PipelineBindPoint,
            vk::PipelineLayout,
            u32,
            u32,
            *const vk::DescriptorSet,
            u32,
            *const u32,
        );
        pre_call_record_cmd_bind_vertex_buffers,
        post_call_record_cmd_bind_vertex_buffers(
            u32,
            u32,
            *const vk::Buffer,
            *const vk::DeviceSize,
        );
        pre_call_record_cmd_bind_index_buffer,
        post_call_record_cmd_bind_index_buffer(vk::Buffer, vk::DeviceSize, vk::IndexType);
        pre_call_record_cmd_set_viewport,
        post_call_record_cmd_set_viewport(u32, u32, *const vk::Viewport);
        pre_call_record_cmd_set_scissor,
        post_call_record_cmd_set_scissor(u32, u32, *const vk::Rect2D);
        pre_call_record_cmd_draw, post_call_record_cmd_draw(u32, u32, u32, u32);
        pre_call_record_cmd_draw_indexed,
        post_call_record_cmd_draw_indexed(u32, u32, u32, i32, u32);
        pre_call_record_cmd_dispatch, post_call_record_cmd_dispatch(u32, u32, u32);
        pre_call_record_cmd_copy_buffer,
        post_call_record_cmd_copy_buffer(vk::Buffer, vk::Buffer, u32, *const vk::BufferCopy);
        pre_call_record_cmd_fill_buffer,
        post_call_record_cmd_fill_buffer(vk::Buffer, vk::DeviceSize, vk::DeviceSize, u32);
        pre_call_record_cmd_pipeline_barrier,
        post_call_record_cmd_pipeline_barrier(
            vk::PipelineStageFlags,
            vk::PipelineStageFlags,
            vk::DependencyFlags,
            u32,
            *const vk::MemoryBarrier<'_>,
            u32,
            *const vk::BufferMemoryBarrier<'_>,
            u32,
            *const vk::ImageMemoryBarrier<'_>,
        );
        pre_call_record_cmd_begin_render_pass,
        post_call_record_cmd_begin_render_pass(
            *const vk::RenderPassBeginInfo<'_>,
            vk::SubpassContents,
        );
        pre_call_record_cmd_next_subpass, post_call_record_cmd_next_subpass(vk::SubpassContents);
        pre_call_record_cmd_end_render_pass, post_call_record_cmd_end_render_pass();
        pre_call_record_cmd_begin_rendering,
        post_call_record_cmd_begin_rendering(*const vk::RenderingInfo<'_>);
        pre_call_record_cmd_end_rendering, post_call_record_cmd_end_rendering();
        pre_call_record_cmd_execute_commands,
        post_call_record_cmd_execute_commands(u32, *const vk::CommandBuffer);
        pre_call_record_cmd_bind_shaders_ext,
        post_call_record_cmd_bind_shaders_ext(
            u32,
            *const vk::ShaderStageFlags,
            *const vk::ShaderEXT,
        );
    }

    unsafe fn pre_call_record_reset_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _flags: vk::CommandPoolResetFlags,
        record_obj: &RecordObject,
    ) {
        self.start_write(command_pool.into(), &record_obj.location);
    }

    unsafe fn post_call_record_reset_command_pool(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        _flags: vk::CommandPoolResetFlags,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(command_pool.into());
    }

    unsafe fn pre_call_record_allocate_command_buffers(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::CommandBufferAllocateInfo<'_>,
        _p_command_buffers: *mut vk::CommandBuffer,
        record_obj: &RecordObject,
    ) {
        if let Some(allocate_info) = unsafe { crate::ffi::opt_ref(p_allocate_info) } {
            self.start_write(allocate_info.command_pool.into(), &record_obj.location);
        }
    }

    unsafe fn post_call_record_allocate_command_buffers(
        &self,
        _device: vk::Device,
        p_allocate_info: *const vk::CommandBufferAllocateInfo<'_>,
        _p_command_buffers: *mut vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        if let Some(allocate_info) = unsafe { crate::ffi::opt_ref(p_allocate_info) } {
            self.finish_write(allocate_info.command_pool.into());
        }
    }

    unsafe fn pre_call_record_free_command_buffers(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        record_obj: &RecordObject,
    ) {
        let command_buffers =
            unsafe { crate::ffi::slice_from(p_command_buffers, command_buffer_count) };

        self.start_write(command_pool.into(), &record_obj.location);
        self.start_write_all(command_buffers, &record_obj.location);
    }

    unsafe fn post_call_record_free_command_buffers(
        &self,
        _device: vk::Device,
        command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
        _record_obj: &RecordObject,
    ) {
        let command_buffers =
            unsafe { crate::ffi::slice_from(p_command_buffers, command_buffer_count) };

        self.finish_write(command_pool.into());
        self.finish_write_all(command_buffers);
    }

    unsafe fn pre_call_record_queue_submit(
        &self,
        queue: vk::Queue,
        _submit_count: u32,
        _p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
        record_obj: &RecordObject,
    ) {
        self.start_write(queue.into(), &record_obj.location);
        self.start_write(fence.into(), &record_obj.location);
    }

    unsafe fn post_call_record_queue_submit(
        &self,
        queue: vk::Queue,
        _submit_count: u32,
        _p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(queue.into());
        self.finish_write(fence.into());
    }

    unsafe fn pre_call_record_queue_wait_idle(&self, queue: vk::Queue, record_obj: &RecordObject) {
        self.start_write(queue.into(), &record_obj.location);
    }

    unsafe fn post_call_record_queue_wait_idle(
        &self,
        queue: vk::Queue,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(queue.into());
    }

    unsafe fn pre_call_record_reset_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        record_obj: &RecordObject,
    ) {
        let fences = unsafe { crate::ffi::slice_from(p_fences, fence_count) };
        self.start_write_all(fences, &record_obj.location);
    }

    unsafe fn post_call_record_reset_fences(
        &self,
        _device: vk::Device,
        fence_count: u32,
        p_fences: *const vk::Fence,
        _record_obj: &RecordObject,
    ) {
        let fences = unsafe { crate::ffi::slice_from(p_fences, fence_count) };
        self.finish_write_all(fences);
    }

    unsafe fn pre_call_record_destroy_fence(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        record_obj: &RecordObject,
    ) {
        self.start_write(fence.into(), &record_obj.location);
    }

    unsafe fn post_call_record_destroy_fence(
        &self,
        _device: vk::Device,
        fence: vk::Fence,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(fence.into());
    }

    unsafe fn pre_call_record_map_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _offset: vk::DeviceSize,
        _size: vk::DeviceSize,
        _flags: vk::MemoryMapFlags,
        _pp_data: *mut *mut c_void,
        record_obj: &RecordObject,
    ) {
        self.start_write(memory.into(), &record_obj.location);
    }

    unsafe fn post_call_record_map_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _offset: vk::DeviceSize,
        _size: vk::DeviceSize,
        _flags: vk::MemoryMapFlags,
        _pp_data: *mut *mut c_void,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(memory.into());
    }

    unsafe fn pre_call_record_unmap_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        record_obj: &RecordObject,
    ) {
        self.start_write(memory.into(), &record_obj.location);
    }

    unsafe fn post_call_record_unmap_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(memory.into());
    }

    unsafe fn pre_call_record_free_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        record_obj: &RecordObject,
    ) {
        self.start_write(memory.into(), &record_obj.location);
    }

    unsafe fn post_call_record_free_memory(
        &self,
        _device: vk::Device,
        memory: vk::DeviceMemory,
        _p_allocator: *const vk::AllocationCallbacks<'_>,
        _record_obj: &RecordObject,
    ) {
        self.finish_write(memory.into());
    }
}

#[cfg(test)]
mod tests {
    use super::UseTracker;
    use crate::handle::ObjectRef;
    use ash::vk::{self, Handle};
    use std::{sync::Barrier, thread};

    #[test]
    fn same_thread_reentry() {
        let tracker = UseTracker::default();
        let object = ObjectRef::from(vk::CommandBuffer::from_raw(0x10));
        let current = thread::current().id();

        assert_eq!(tracker.start_write(object, current), None);
        assert_eq!(tracker.start_write(object, current), None);
        tracker.finish_write(object, current);
        assert_eq!(tracker.in_use(), 1);
        tracker.finish_write(object, current);
        assert_eq!(tracker.in_use(), 0);
    }

    #[test]
    fn null_handles_ignored() {
        let tracker = UseTracker::default();
        let current = thread::current().id();

        assert_eq!(
            tracker.start_write(ObjectRef::from(vk::Fence::null()), current),
            None,
        );
        assert_eq!(tracker.in_use(), 0);
    }

    #[test]
    fn concurrent_write_detected() {
        let tracker = UseTracker::default();
        let object = ObjectRef::from(vk::Queue::from_raw(0x20));
        let started = Barrier::new(2);
        let checked = Barrier::new(2);

        thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let id = thread::current().id();
                assert_eq!(tracker.start_write(object, id), None);
                started.wait();
                checked.wait();
                tracker.finish_write(object, id);
                id
            });

            started.wait();
            let current = thread::current().id();
            let conflict = tracker.start_write(object, current);
            tracker.finish_write(object, current);
            checked.wait();

            let writer_id = writer.join().unwrap();
            assert_eq!(conflict, Some(writer_id));
        });

        assert_eq!(tracker.in_use(), 0);
    }

    #[test]
    fn sequential_threads_ok() {
        let tracker = UseTracker::default();
        let object = ObjectRef::from(vk::Fence::from_raw(0x30));

        thread::scope(|scope| {
            scope
                .spawn(|| {
                    let id = thread::current().id();
                    assert_eq!(tracker.start_write(object, id), None);
                    tracker.finish_write(object, id);
                })
                .join()
                .unwrap();
        });

        assert_eq!(tracker.start_write(object, thread::current().id()), None);
    }

    #[test]
    fn conflict_names_remaining_writer() {
        let tracker = UseTracker::default();
        let object = ObjectRef::from(vk::CommandPool::from_raw(0x40));
        let [first, second, third] =
            [(); 3].map(|()| thread::spawn(|| thread::current().id()).join().unwrap());

        assert_eq!(tracker.start_write(object, first), None);
        assert_eq!(tracker.start_write(object, second), Some(first));
        tracker.finish_write(object, first);

        // Only `second` is writing now.
        assert_eq!(tracker.start_write(object, second), None);
        assert_eq!(tracker.start_write(object, third), Some(second));

        tracker.finish_write(object, third);
        tracker.finish_write(object, second);
        assert_eq!(tracker.in_use(), 1);
        tracker.finish_write(object, second);
        assert_eq!(tracker.in_use(), 0);
    }
}
