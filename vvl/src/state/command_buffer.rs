use crate::handle::ObjectRef;
use ash::vk;
use foldhash::HashSet;
use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;

/// The life cycle of a command buffer.
///
/// ```text
/// Initial -> Recording -> Executable -> Pending -> Executable
///                                              \-> Invalid   (one-time submit)
/// ```
///
/// Recording and executable command buffers also become `Invalid` when an object they
/// reference is destroyed. Resetting returns any state except `Pending` to `Initial`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandBufferState {
    Initial,
    Recording,
    Executable,
    Pending,
    Invalid,
}

/// The render pass instance a command buffer is currently recording into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPassInstance {
    /// Begun with `vkCmdBeginRenderPass`, or inherited by a secondary command buffer with
    /// `RENDER_PASS_CONTINUE`.
    Legacy {
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        subpass: u32,
        subpass_count: u32,
    },
    /// Begun with `vkCmdBeginRendering`.
    Dynamic { flags: vk::RenderingFlags },
}

/// Everything about a command buffer that changes while it is recorded and submitted.
#[derive(Debug)]
pub struct CommandBufferRecording {
    pub state: CommandBufferState,
    pub begin_flags: vk::CommandBufferUsageFlags,
    pub render_pass: Option<RenderPassInstance>,
    pub graphics_pipeline: Option<vk::Pipeline>,
    pub compute_pipeline: Option<vk::Pipeline>,
    /// Shader objects bound per stage. A null handle is an explicit "no shader" binding.
    pub bound_shaders: SmallVec<[(vk::ShaderStageFlags, vk::ShaderEXT); 4]>,
    pub bound_descriptor_sets: SmallVec<[vk::DescriptorSet; 4]>,
    pub index_buffer_bound: bool,
    /// Objects used by recorded commands. Destroying one of them invalidates the recording.
    pub referenced: HashSet<ObjectRef>,
    pub secondaries: SmallVec<[vk::CommandBuffer; 2]>,
    /// Number of queue submissions that include this command buffer and haven't retired.
    pub in_flight: u32,
    pub invalidated_by: Option<ObjectRef>,
}

impl Default for CommandBufferRecording {
    fn default() -> Self {
        CommandBufferRecording {
            state: CommandBufferState::Initial,
            begin_flags: vk::CommandBufferUsageFlags::empty(),
            render_pass: None,
            graphics_pipeline: None,
            compute_pipeline: None,
            bound_shaders: SmallVec::new(),
            bound_descriptor_sets: SmallVec::new(),
            index_buffer_bound: false,
            referenced: HashSet::default(),
            secondaries: SmallVec::new(),
            in_flight: 0,
            invalidated_by: None,
        }
    }
}

impl CommandBufferRecording {
    /// Clears everything recorded and returns to `Initial`.
    pub fn reset(&mut self) {
        *self = CommandBufferRecording::default();
    }

    /// Starts a new recording. Beginning implicitly resets the command buffer.
    pub fn begin(
        &mut self,
        flags: vk::CommandBufferUsageFlags,
        inherited_render_pass: Option<RenderPassInstance>,
    ) {
        self.reset();
        self.state = CommandBufferState::Recording;
        self.begin_flags = flags;
        self.render_pass = inherited_render_pass;
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.state == CommandBufferState::Recording
    }

    #[inline]
    pub fn is_one_time_submit(&self) -> bool {
        self.begin_flags
            .contains(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)
    }

    #[inline]
    pub fn is_simultaneous_use(&self) -> bool {
        self.begin_flags
            .contains(vk::CommandBufferUsageFlags::SIMULTANEOUS_USE)
    }

    /// Returns the shader object bound to `stage`, if a binding was made at all.
    pub fn bound_shader(&self, stage: vk::ShaderStageFlags) -> Option<vk::ShaderEXT> {
        self.bound_shaders
            .iter()
            .find(|&&(s, _)| s == stage)
            .map(|&(_, shader)| shader)
    }

    /// Binds `shader` to `stage`, replacing the previous binding of that stage. Binding to a
    /// graphics stage unbinds the graphics pipeline, and binding a compute shader unbinds the
    /// compute pipeline.
    pub fn bind_shader(&mut self, stage: vk::ShaderStageFlags, shader: vk::ShaderEXT) {
        match self.bound_shaders.iter_mut().find(|(s, _)| *s == stage) {
            Some(entry) => entry.1 = shader,
            None => self.bound_shaders.push((stage, shader)),
        }

        if stage == vk::ShaderStageFlags::COMPUTE {
            self.compute_pipeline = None;
        } else {
            self.graphics_pipeline = None;
        }
    }

    /// Binds a pipeline, replacing the shader objects of its bind point.
    pub fn bind_pipeline(&mut self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        match bind_point {
            vk::PipelineBindPoint::GRAPHICS => {
                self.graphics_pipeline = Some(pipeline);
                self.bound_shaders
                    .retain(|(stage, _)| *stage == vk::ShaderStageFlags::COMPUTE);
            }
            vk::PipelineBindPoint::COMPUTE => {
                self.compute_pipeline = Some(pipeline);
                self.bound_shaders
                    .retain(|(stage, _)| *stage != vk::ShaderStageFlags::COMPUTE);
            }
            _ => {}
        }
    }

    #[inline]
    pub fn add_reference(&mut self, object: impl Into<ObjectRef>) {
        self.referenced.insert(object.into());
    }

    #[inline]
    pub fn references(&self, object: ObjectRef) -> bool {
        self.referenced.contains(&object)
    }

    /// Marks the recording invalid because `object` was destroyed, freed or recorded anew. A
    /// pending command buffer keeps executing and turns invalid when its submission retires.
    pub fn invalidate(&mut self, object: ObjectRef) {
        self.invalidated_by.get_or_insert(object);

        if matches!(
            self.state,
            CommandBufferState::Recording | CommandBufferState::Executable,
        ) {
            self.state = CommandBufferState::Invalid;
        }
    }

    pub fn submit(&mut self) {
        self.in_flight += 1;
        self.state = CommandBufferState::Pending;
    }

    /// Called when one submission that contained this command buffer completed.
    pub fn retire(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.in_flight == 0 && self.state == CommandBufferState::Pending {
            self.state = if self.is_one_time_submit() || self.invalidated_by.is_some() {
                CommandBufferState::Invalid
            } else {
                CommandBufferState::Executable
            };
        }
    }
}

#[derive(Debug)]
pub struct CommandBuffer {
    pub handle: vk::CommandBuffer,
    pub pool: vk::CommandPool,
    pub level: vk::CommandBufferLevel,
    /// Create flags of the pool, copied so checks don't need to look the pool up.
    pub pool_flags: vk::CommandPoolCreateFlags,
    inner: Mutex<CommandBufferRecording>,
}

impl CommandBuffer {
    pub fn new(
        handle: vk::CommandBuffer,
        pool: &CommandPool,
        level: vk::CommandBufferLevel,
    ) -> Self {
        CommandBuffer {
            handle,
            pool: pool.handle,
            level,
            pool_flags: pool.flags,
            inner: Mutex::new(CommandBufferRecording::default()),
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, CommandBufferRecording> {
        self.inner.lock()
    }

    #[inline]
    pub fn state(&self) -> CommandBufferState {
        self.inner.lock().state
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.level == vk::CommandBufferLevel::PRIMARY
    }

    #[inline]
    pub fn is_secondary(&self) -> bool {
        self.level == vk::CommandBufferLevel::SECONDARY
    }
}

#[derive(Debug)]
pub struct CommandPool {
    pub handle: vk::CommandPool,
    pub queue_family_index: u32,
    pub flags: vk::CommandPoolCreateFlags,
    command_buffers: Mutex<HashSet<vk::CommandBuffer>>,
}

impl CommandPool {
    pub fn new(handle: vk::CommandPool, create_info: &vk::CommandPoolCreateInfo<'_>) -> Self {
        CommandPool {
            handle,
            queue_family_index: create_info.queue_family_index,
            flags: create_info.flags,
            command_buffers: Mutex::new(HashSet::default()),
        }
    }

    /// Whether command buffers may be reset individually.
    #[inline]
    pub fn allows_reset(&self) -> bool {
        self.flags
            .contains(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
    }

    pub fn add_command_buffer(&self, command_buffer: vk::CommandBuffer) {
        self.command_buffers.lock().insert(command_buffer);
    }

    pub fn remove_command_buffer(&self, command_buffer: vk::CommandBuffer) {
        self.command_buffers.lock().remove(&command_buffer);
    }

    /// Returns a snapshot of the command buffers allocated from the pool.
    pub fn command_buffers(&self) -> Vec<vk::CommandBuffer> {
        self.command_buffers.lock().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandBufferRecording, CommandBufferState};
    use crate::handle::ObjectRef;
    use ash::vk::{self, Handle};

    #[test]
    fn state_machine() {
        let mut recording = CommandBufferRecording::default();
        assert_eq!(recording.state, CommandBufferState::Initial);

        recording.begin(vk::CommandBufferUsageFlags::empty(), None);
        assert!(recording.is_recording());

        recording.state = CommandBufferState::Executable;
        recording.submit();
        recording.submit();
        assert_eq!(recording.state, CommandBufferState::Pending);

        recording.retire();
        assert_eq!(recording.state, CommandBufferState::Pending);
        recording.retire();
        assert_eq!(recording.state, CommandBufferState::Executable);
    }

    #[test]
    fn one_time_submit_retires_invalid() {
        let mut recording = CommandBufferRecording::default();
        recording.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT, None);
        recording.state = CommandBufferState::Executable;
        recording.submit();
        recording.retire();

        assert_eq!(recording.state, CommandBufferState::Invalid);
    }

    #[test]
    fn destroyed_reference_invalidates() {
        let buffer = ObjectRef::from(vk::Buffer::from_raw(7));
        let mut recording = CommandBufferRecording::default();
        recording.begin(vk::CommandBufferUsageFlags::empty(), None);
        recording.add_reference(vk::Buffer::from_raw(7));
        assert!(recording.references(buffer));

        recording.state = CommandBufferState::Executable;
        recording.submit();
        recording.invalidate(buffer);
        assert_eq!(recording.state, CommandBufferState::Pending);

        recording.retire();
        assert_eq!(recording.state, CommandBufferState::Invalid);
        assert_eq!(recording.invalidated_by, Some(buffer));

        recording.reset();
        assert_eq!(recording.state, CommandBufferState::Initial);
        assert!(recording.invalidated_by.is_none());
    }

    #[test]
    fn shader_and_pipeline_bindings_replace_each_other() {
        let mut recording = CommandBufferRecording::default();
        let vertex = vk::ShaderEXT::from_raw(1);

        recording.bind_pipeline(vk::PipelineBindPoint::GRAPHICS, vk::Pipeline::from_raw(2));
        recording.bind_shader(vk::ShaderStageFlags::VERTEX, vertex);
        recording.bind_shader(vk::ShaderStageFlags::GEOMETRY, vk::ShaderEXT::null());
        assert!(recording.graphics_pipeline.is_none());
        assert_eq!(
            recording.bound_shader(vk::ShaderStageFlags::VERTEX),
            Some(vertex),
        );
        assert_eq!(
            recording.bound_shader(vk::ShaderStageFlags::GEOMETRY),
            Some(vk::ShaderEXT::null()),
        );
        assert_eq!(recording.bound_shader(vk::ShaderStageFlags::FRAGMENT), None);

        recording.bind_pipeline(vk::PipelineBindPoint::GRAPHICS, vk::Pipeline::from_raw(2));
        assert!(recording.bound_shaders.is_empty());
    }
}
