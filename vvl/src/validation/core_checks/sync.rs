use super::CoreChecks;
use crate::{
    handle::ObjectRef,
    state::{CommandBufferState, FenceState, SemaphoreState},
    ValidationError,
};
use ash::vk;
use foldhash::{HashMap, HashSet};

/// The VUID a destroy or free command violates when the object is still used by a pending
/// command buffer.
#[derive(Clone, Copy, Debug)]
pub(super) struct InUseVuids(&'static [&'static str]);

impl InUseVuids {
    pub(super) const FREE_MEMORY: Self = InUseVuids(&["VUID-vkFreeMemory-memory-00677"]);
    pub(super) const DESTROY_BUFFER: Self = InUseVuids(&["VUID-vkDestroyBuffer-buffer-00922"]);
    pub(super) const DESTROY_IMAGE: Self = InUseVuids(&["VUID-vkDestroyImage-image-01000"]);
    pub(super) const DESTROY_IMAGE_VIEW: Self =
        InUseVuids(&["VUID-vkDestroyImageView-imageView-01026"]);
    pub(super) const DESTROY_PIPELINE: Self =
        InUseVuids(&["VUID-vkDestroyPipeline-pipeline-00765"]);
    pub(super) const DESTROY_RENDER_PASS: Self =
        InUseVuids(&["VUID-vkDestroyRenderPass-renderPass-00873"]);
    pub(super) const DESTROY_FRAMEBUFFER: Self =
        InUseVuids(&["VUID-vkDestroyFramebuffer-framebuffer-00892"]);
    pub(super) const DESTROY_SHADER: Self = InUseVuids(&["VUID-vkDestroyShaderEXT-shader-08481"]);
}

impl CoreChecks {
    pub(super) fn validate_not_in_use(
        &self,
        object: ObjectRef,
        vuids: InUseVuids,
    ) -> Result<(), Box<ValidationError>> {
        match self.state.pending_command_buffer_using(object) {
            Some(command_buffer) => Err(Box::new(ValidationError {
                problem: format!(
                    "{:?} is in use by {:?}, which is in the pending state",
                    object, command_buffer,
                )
                .into(),
                vuids: vuids.0,
                ..Default::default()
            })),
            None => Ok(()),
        }
    }

    pub(super) fn validate_get_device_queue(
        &self,
        queue_family_index: u32,
        queue_index: u32,
    ) -> Result<(), Box<ValidationError>> {
        let Some(queue_count) = self.state.queue_count(queue_family_index) else {
            return Err(Box::new(ValidationError {
                context: "queueFamilyIndex".into(),
                problem: format!(
                    "({}) is not one of the queue families requested when the device was created",
                    queue_family_index,
                )
                .into(),
                vuids: &["VUID-vkGetDeviceQueue-queueFamilyIndex-00384"],
            }));
        };

        if queue_index >= queue_count {
            return Err(Box::new(ValidationError {
                context: "queueIndex".into(),
                problem: format!(
                    "({}) is not less than the number of queues requested from queue family {} \
                    ({})",
                    queue_index, queue_family_index, queue_count,
                )
                .into(),
                vuids: &["VUID-vkGetDeviceQueue-queueIndex-00385"],
            }));
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - `p_submits` must point to `submit_count` valid `VkSubmitInfo` structures.
    pub(super) unsafe fn validate_queue_submit(
        &self,
        queue: vk::Queue,
        submit_count: u32,
        p_submits: *const vk::SubmitInfo<'_>,
        fence: vk::Fence,
    ) -> Result<(), Box<ValidationError>> {
        if let Some(fence_state) = self.state.fences.get(fence) {
            match fence_state.state() {
                FenceState::Signaled => {
                    return Err(Box::new(ValidationError {
                        context: "fence".into(),
                        problem: "is already signaled".into(),
                        vuids: &["VUID-vkQueueSubmit-fence-00063"],
                    }));
                }
                FenceState::Inflight { queue, .. } => {
                    return Err(Box::new(ValidationError {
                        context: "fence".into(),
                        problem: format!(
                            "is already associated with a queue submission on {:?} that hasn't \
                            completed",
                            queue,
                        )
                        .into(),
                        vuids: &["VUID-vkQueueSubmit-fence-00064"],
                    }));
                }
                FenceState::Unsignaled => {}
            }
        }

        let queue_family_index = self.state.queues.get(queue).map(|queue| queue.family_index);
        let submits = unsafe { crate::ffi::slice_from(p_submits, submit_count) };
        // Binary semaphore states as they would be after the batches checked so far.
        let mut signaled: HashMap<vk::Semaphore, bool> = HashMap::default();
        let mut submitted: HashSet<vk::CommandBuffer> = HashSet::default();

        for (index, submit) in submits.iter().enumerate() {
            unsafe {
                self.validate_submit_info(
                    submit,
                    queue_family_index,
                    &mut signaled,
                    &mut submitted,
                )
            }
            .map_err(|err| err.add_context(format!("pSubmits[{}]", index)))?;
        }

        Ok(())
    }

    unsafe fn validate_submit_info(
        &self,
        submit: &vk::SubmitInfo<'_>,
        queue_family_index: Option<u32>,
        signaled: &mut HashMap<vk::Semaphore, bool>,
        submitted: &mut HashSet<vk::CommandBuffer>,
    ) -> Result<(), Box<ValidationError>> {
        let wait_semaphores = unsafe {
            crate::ffi::slice_from(submit.p_wait_semaphores, submit.wait_semaphore_count)
        };
        let command_buffers = unsafe {
            crate::ffi::slice_from(submit.p_command_buffers, submit.command_buffer_count)
        };
        let signal_semaphores = unsafe {
            crate::ffi::slice_from(submit.p_signal_semaphores, submit.signal_semaphore_count)
        };

        for (index, &handle) in wait_semaphores.iter().enumerate() {
            let Some(semaphore) = self.state.semaphores.get(handle) else {
                continue;
            };

            if !semaphore.is_binary() {
                continue;
            }

            let is_signaled = *signaled
                .entry(handle)
                .or_insert_with(|| semaphore.state() == SemaphoreState::Signaled);

            if !is_signaled {
                return Err(Box::new(ValidationError {
                    context: format!("pWaitSemaphores[{}]", index).into(),
                    problem: "is a binary semaphore that is not signaled and has no pending \
                        signal operation"
                        .into(),
                    vuids: &["VUID-vkQueueSubmit-pWaitSemaphores-03238"],
                }));
            }

            signaled.insert(handle, false);
        }

        for (index, &handle) in command_buffers.iter().enumerate() {
            self.validate_submitted_command_buffer(handle, queue_family_index, submitted)
                .map_err(|err| err.add_context(format!("pCommandBuffers[{}]", index)))?;
        }

        for (index, &handle) in signal_semaphores.iter().enumerate() {
            let Some(semaphore) = self.state.semaphores.get(handle) else {
                continue;
            };

            if !semaphore.is_binary() {
                continue;
            }

            let is_signaled = *signaled
                .entry(handle)
                .or_insert_with(|| semaphore.state() == SemaphoreState::Signaled);

            if is_signaled {
                return Err(Box::new(ValidationError {
                    context: format!("pSignalSemaphores[{}]", index).into(),
                    problem: "is a binary semaphore that is already signaled, or has a pending \
                        signal operation"
                        .into(),
                    vuids: &["VUID-vkQueueSubmit-pSignalSemaphores-00067"],
                }));
            }

            signaled.insert(handle, true);
        }

        Ok(())
    }

    fn validate_submitted_command_buffer(
        &self,
        handle: vk::CommandBuffer,
        queue_family_index: Option<u32>,
        submitted: &mut HashSet<vk::CommandBuffer>,
    ) -> Result<(), Box<ValidationError>> {
        let Some(command_buffer) = self.state.command_buffers.get(handle) else {
            return Ok(());
        };

        if command_buffer.is_secondary() {
            return Err(Box::new(ValidationError {
                problem: "is a secondary command buffer".into(),
                vuids: &["VUID-VkSubmitInfo-pCommandBuffers-00075"],
                ..Default::default()
            }));
        }

        let (state, simultaneous_use, invalidated_by, secondaries) = {
            let recording = command_buffer.lock();
            (
                recording.state,
                recording.is_simultaneous_use(),
                recording.invalidated_by,
                recording.secondaries.clone(),
            )
        };
        let already_submitted = !submitted.insert(handle);

        match state {
            CommandBufferState::Executable => {}
            CommandBufferState::Pending if simultaneous_use => {}
            CommandBufferState::Pending => {
                return Err(Box::new(ValidationError {
                    problem: "is in the pending state, but was not recorded with \
                        `VK_COMMAND_BUFFER_USAGE_SIMULTANEOUS_USE_BIT`"
                        .into(),
                    vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00071"],
                    ..Default::default()
                }));
            }
            CommandBufferState::Invalid => {
                let cause = match invalidated_by {
                    Some(object) => format!(", because {:?} was destroyed or changed", object),
                    None => String::new(),
                };

                return Err(Box::new(ValidationError {
                    problem: format!("is in the invalid state{}", cause).into(),
                    vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00070"],
                    ..Default::default()
                }));
            }
            _ => {
                return Err(Box::new(ValidationError {
                    problem: format!(
                        "is in the {:?} state, but must be in the executable or pending state",
                        state,
                    )
                    .into(),
                    vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00070"],
                    ..Default::default()
                }));
            }
        }

        if already_submitted && !simultaneous_use {
            return Err(Box::new(ValidationError {
                problem: "is submitted more than once in this call, but was not recorded with \
                    `VK_COMMAND_BUFFER_USAGE_SIMULTANEOUS_USE_BIT`"
                    .into(),
                vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00071"],
                ..Default::default()
            }));
        }

        for secondary in secondaries {
            let Some(secondary_state) = self.state.command_buffers.get(secondary) else {
                continue;
            };
            let (state, simultaneous_use) = {
                let recording = secondary_state.lock();
                (recording.state, recording.is_simultaneous_use())
            };

            match state {
                CommandBufferState::Executable => {}
                CommandBufferState::Pending if simultaneous_use => {}
                CommandBufferState::Pending => {
                    return Err(Box::new(ValidationError {
                        problem: format!(
                            "executes the secondary command buffer {:?}, which is in the \
                            pending state but was not recorded with \
                            `VK_COMMAND_BUFFER_USAGE_SIMULTANEOUS_USE_BIT`",
                            secondary,
                        )
                        .into(),
                        vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00073"],
                        ..Default::default()
                    }));
                }
                _ => {
                    return Err(Box::new(ValidationError {
                        problem: format!(
                            "executes the secondary command buffer {:?}, which is in the {:?} \
                            state",
                            secondary, state,
                        )
                        .into(),
                        vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00072"],
                        ..Default::default()
                    }));
                }
            }
        }

        let pool_family_index = self
            .state
            .command_pools
            .get(command_buffer.pool)
            .map(|pool| pool.queue_family_index);

        if let (Some(pool_family_index), Some(queue_family_index)) =
            (pool_family_index, queue_family_index)
        {
            if pool_family_index != queue_family_index {
                return Err(Box::new(ValidationError {
                    problem: format!(
                        "was allocated from a command pool of queue family {}, but `queue` \
                        belongs to queue family {}",
                        pool_family_index, queue_family_index,
                    )
                    .into(),
                    vuids: &["VUID-vkQueueSubmit-pCommandBuffers-00074"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - `p_fences` must point to `fence_count` elements.
    pub(super) unsafe fn validate_reset_fences(
        &self,
        fence_count: u32,
        p_fences: *const vk::Fence,
    ) -> Result<(), Box<ValidationError>> {
        let fences = unsafe { crate::ffi::slice_from(p_fences, fence_count) };

        for (index, &handle) in fences.iter().enumerate() {
            let Some(fence) = self.state.fences.get(handle) else {
                continue;
            };

            if let FenceState::Inflight { queue, .. } = fence.state() {
                return Err(Box::new(ValidationError {
                    context: format!("pFences[{}]", index).into(),
                    problem: format!(
                        "is associated with a queue submission on {:?} that hasn't completed",
                        queue,
                    )
                    .into(),
                    vuids: &["VUID-vkResetFences-pFences-01123"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_destroy_fence(
        &self,
        fence: vk::Fence,
    ) -> Result<(), Box<ValidationError>> {
        match self.state.fences.get(fence).map(|fence| fence.state()) {
            Some(FenceState::Inflight { queue, .. }) => Err(Box::new(ValidationError {
                context: "fence".into(),
                problem: format!(
                    "is associated with a queue submission on {:?} that hasn't completed",
                    queue,
                )
                .into(),
                vuids: &["VUID-vkDestroyFence-fence-01120"],
            })),
            _ => Ok(()),
        }
    }

    pub(super) fn validate_destroy_semaphore(
        &self,
        semaphore: vk::Semaphore,
    ) -> Result<(), Box<ValidationError>> {
        if semaphore == vk::Semaphore::null() {
            return Ok(());
        }

        let in_use = self.state.queues.values().into_iter().any(|queue| {
            queue.any_submission(|submission| {
                submission.wait_semaphores.contains(&semaphore)
                    || submission.signal_semaphores.contains(&semaphore)
            })
        });

        if in_use {
            return Err(Box::new(ValidationError {
                context: "semaphore".into(),
                problem: "is used by a queue submission that hasn't completed".into(),
                vuids: &["VUID-vkDestroySemaphore-semaphore-05149"],
            }));
        }

        Ok(())
    }
}
