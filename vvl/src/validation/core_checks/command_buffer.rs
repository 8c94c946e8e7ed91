use super::CoreChecks;
use crate::{
    commands::Command,
    state::{CommandBuffer, CommandBufferRecording, CommandBufferState, RenderPassInstance},
    ValidationError,
};
use ash::vk;

/// Where a `vkCmd*` command may be recorded relative to a render pass instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum RenderPassScope {
    Inside,
    Outside,
    Either,
}

struct CommandVuids {
    recording: &'static [&'static str],
    render_pass: &'static [&'static str],
}

macro_rules! command_vuids {
    ($command:expr; $($variant:ident => $name:literal),* $(,)?) => {
        match $command {
            $(
                Command::$variant => CommandVuids {
                    recording: &[concat!("VUID-", $name, "-commandBuffer-recording")],
                    render_pass: &[concat!("VUID-", $name, "-renderpass")],
                },
            )*
            _ => CommandVuids {
                recording: &[],
                render_pass: &[],
            },
        }
    };
}

fn command_vuids(command: Command) -> CommandVuids {
    command_vuids! {
        command;
        CmdBindPipeline => "vkCmdBindPipeline",
        CmdBindDescriptorSets => "vkCmdBindDescriptorSets",
        CmdBindVertexBuffers => "vkCmdBindVertexBuffers",
        CmdBindIndexBuffer => "vkCmdBindIndexBuffer",
        CmdSetViewport => "vkCmdSetViewport",
        CmdSetScissor => "vkCmdSetScissor",
        CmdDraw => "vkCmdDraw",
        CmdDrawIndexed => "vkCmdDrawIndexed",
        CmdDispatch => "vkCmdDispatch",
        CmdCopyBuffer => "vkCmdCopyBuffer",
        CmdFillBuffer => "vkCmdFillBuffer",
        CmdPipelineBarrier => "vkCmdPipelineBarrier",
        CmdBeginRenderPass => "vkCmdBeginRenderPass",
        CmdNextSubpass => "vkCmdNextSubpass",
        CmdEndRenderPass => "vkCmdEndRenderPass",
        CmdBeginRendering => "vkCmdBeginRendering",
        CmdEndRendering => "vkCmdEndRendering",
        CmdExecuteCommands => "vkCmdExecuteCommands",
        CmdBindShadersEXT => "vkCmdBindShadersEXT",
    }
}

/// Commands that may only be recorded into primary command buffers.
fn primary_only_vuids(command: Command) -> Option<&'static [&'static str]> {
    match command {
        Command::CmdBeginRenderPass => Some(&["VUID-vkCmdBeginRenderPass-bufferlevel"]),
        Command::CmdNextSubpass => Some(&["VUID-vkCmdNextSubpass-bufferlevel"]),
        Command::CmdEndRenderPass => Some(&["VUID-vkCmdEndRenderPass-bufferlevel"]),
        Command::CmdExecuteCommands => Some(&["VUID-vkCmdExecuteCommands-bufferlevel"]),
        _ => None,
    }
}

/// The rules that differ between the draw commands only in their VUIDs.
pub(super) struct DrawVuids {
    pub(super) pipeline: &'static [&'static str],
    pub(super) pipeline_or_shaders: &'static [&'static str],
    pub(super) vertex_shader: &'static [&'static str],
    pub(super) tessellation_control_shader: &'static [&'static str],
    pub(super) tessellation_evaluation_shader: &'static [&'static str],
    pub(super) geometry_shader: &'static [&'static str],
    pub(super) fragment_shader: &'static [&'static str],
    pub(super) shaders_in_render_pass: &'static [&'static str],
    pub(super) render_pass: &'static [&'static str],
    pub(super) subpass: &'static [&'static str],
    pub(super) dynamic_rendering: &'static [&'static str],
    pub(super) index_buffer: Option<&'static [&'static str]>,
}

macro_rules! draw_vuids {
    ($name:literal, $index_buffer:expr) => {
        DrawVuids {
            pipeline: &[concat!("VUID-", $name, "-None-08606")],
            pipeline_or_shaders: &[concat!("VUID-", $name, "-None-08607")],
            vertex_shader: &[concat!("VUID-", $name, "-None-08684")],
            tessellation_control_shader: &[concat!("VUID-", $name, "-None-08685")],
            tessellation_evaluation_shader: &[concat!("VUID-", $name, "-None-08686")],
            geometry_shader: &[concat!("VUID-", $name, "-None-08687")],
            fragment_shader: &[concat!("VUID-", $name, "-None-08688")],
            shaders_in_render_pass: &[concat!("VUID-", $name, "-None-08876")],
            render_pass: &[concat!("VUID-", $name, "-renderPass-02684")],
            subpass: &[concat!("VUID-", $name, "-subpass-02685")],
            dynamic_rendering: &[concat!("VUID-", $name, "-renderPass-06198")],
            index_buffer: $index_buffer,
        }
    };
}

pub(super) const DRAW: DrawVuids = draw_vuids!("vkCmdDraw", None);
pub(super) const DRAW_INDEXED: DrawVuids = draw_vuids!(
    "vkCmdDrawIndexed",
    Some(&["VUID-vkCmdDrawIndexed-None-07312"])
);

impl CoreChecks {
    /// The checks every `vkCmd*` command shares: the command buffer is recording, has the
    /// right level and is inside or outside a render pass instance as the command requires.
    pub(super) fn validate_cmd(
        &self,
        command_buffer: &CommandBuffer,
        recording: &CommandBufferRecording,
        command: Command,
        scope: RenderPassScope,
    ) -> Result<(), Box<ValidationError>> {
        let vuids = command_vuids(command);

        if !recording.is_recording() {
            return Err(Box::new(ValidationError {
                context: "commandBuffer".into(),
                problem: format!(
                    "is in the {:?} state, but must be in the recording state",
                    recording.state,
                )
                .into(),
                vuids: vuids.recording,
            }));
        }

        if let Some(vuids) = primary_only_vuids(command) {
            if command_buffer.is_secondary() {
                return Err(Box::new(ValidationError {
                    context: "commandBuffer".into(),
                    problem: "is a secondary command buffer".into(),
                    vuids,
                }));
            }
        }

        match scope {
            RenderPassScope::Inside if recording.render_pass.is_none() => {
                Err(Box::new(ValidationError {
                    problem: "this command must be recorded inside a render pass instance, but \
                        there is no active render pass instance"
                        .into(),
                    vuids: vuids.render_pass,
                    ..Default::default()
                }))
            }
            RenderPassScope::Outside if recording.render_pass.is_some() => {
                Err(Box::new(ValidationError {
                    problem: "this command must be recorded outside a render pass instance, but \
                        a render pass instance is active"
                        .into(),
                    vuids: vuids.render_pass,
                    ..Default::default()
                }))
            }
            _ => Ok(()),
        }
    }

    pub(super) fn validate_begin_command_buffer(
        &self,
        command_buffer: &CommandBuffer,
        begin_info: &vk::CommandBufferBeginInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let state = command_buffer.state();

        match state {
            CommandBufferState::Recording | CommandBufferState::Pending => {
                return Err(Box::new(ValidationError {
                    context: "commandBuffer".into(),
                    problem: format!("is in the {:?} state", state).into(),
                    vuids: &["VUID-vkBeginCommandBuffer-commandBuffer-00049"],
                }));
            }
            CommandBufferState::Executable | CommandBufferState::Invalid
                if !command_buffer
                    .pool_flags
                    .contains(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER) =>
            {
                return Err(Box::new(ValidationError {
                    context: "commandBuffer".into(),
                    problem: format!(
                        "is in the {:?} state, but was allocated from a command pool that was \
                        not created with `VK_COMMAND_POOL_CREATE_RESET_COMMAND_BUFFER_BIT`",
                        state,
                    )
                    .into(),
                    vuids: &["VUID-vkBeginCommandBuffer-commandBuffer-00050"],
                }));
            }
            _ => {}
        }

        if command_buffer.is_secondary() && begin_info.p_inheritance_info.is_null() {
            return Err(Box::new(ValidationError {
                context: "pBeginInfo.pInheritanceInfo".into(),
                problem: "is null, but `commandBuffer` is a secondary command buffer".into(),
                vuids: &["VUID-vkBeginCommandBuffer-commandBuffer-00051"],
            }));
        }

        Ok(())
    }

    pub(super) fn validate_end_command_buffer(
        &self,
        command_buffer: &CommandBuffer,
    ) -> Result<(), Box<ValidationError>> {
        let recording = command_buffer.lock();

        if !recording.is_recording() {
            return Err(Box::new(ValidationError {
                context: "commandBuffer".into(),
                problem: format!(
                    "is in the {:?} state, but must be in the recording state",
                    recording.state,
                )
                .into(),
                vuids: &["VUID-vkEndCommandBuffer-commandBuffer-00059"],
            }));
        }

        if command_buffer.is_primary() && recording.render_pass.is_some() {
            return Err(Box::new(ValidationError {
                context: "commandBuffer".into(),
                problem: "is a primary command buffer with an active render pass instance".into(),
                vuids: &["VUID-vkEndCommandBuffer-commandBuffer-00060"],
            }));
        }

        Ok(())
    }

    pub(super) fn validate_reset_command_buffer(
        &self,
        command_buffer: &CommandBuffer,
    ) -> Result<(), Box<ValidationError>> {
        if !command_buffer
            .pool_flags
            .contains(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
        {
            return Err(Box::new(ValidationError {
                context: "commandBuffer".into(),
                problem: "was allocated from a command pool that was not created with \
                    `VK_COMMAND_POOL_CREATE_RESET_COMMAND_BUFFER_BIT`"
                    .into(),
                vuids: &["VUID-vkResetCommandBuffer-commandBuffer-00046"],
            }));
        }

        if command_buffer.state() == CommandBufferState::Pending {
            return Err(Box::new(ValidationError {
                context: "commandBuffer".into(),
                problem: "is in the pending state".into(),
                vuids: &["VUID-vkResetCommandBuffer-commandBuffer-00045"],
            }));
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - `p_command_buffers` must point to `command_buffer_count` elements.
    pub(super) unsafe fn validate_free_command_buffers(
        &self,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
    ) -> Result<(), Box<ValidationError>> {
        let command_buffers =
            unsafe { crate::ffi::slice_from(p_command_buffers, command_buffer_count) };

        for (index, &handle) in command_buffers.iter().enumerate() {
            let Some(command_buffer) = self.state.command_buffers.get(handle) else {
                continue;
            };

            if command_buffer.state() == CommandBufferState::Pending {
                return Err(Box::new(ValidationError {
                    context: format!("pCommandBuffers[{}]", index).into(),
                    problem: "is in the pending state".into(),
                    vuids: &["VUID-vkFreeCommandBuffers-pCommandBuffers-00047"],
                }));
            }
        }

        Ok(())
    }

    /// Checks that no command buffer allocated from `command_pool` is pending.
    pub(super) fn validate_pool_not_pending(
        &self,
        command_pool: vk::CommandPool,
        vuids: &'static [&'static str],
    ) -> Result<(), Box<ValidationError>> {
        let Some(pool) = self.state.command_pools.get(command_pool) else {
            return Ok(());
        };

        for handle in pool.command_buffers() {
            let pending = self
                .state
                .command_buffers
                .get(handle)
                .is_some_and(|command_buffer| {
                    command_buffer.state() == CommandBufferState::Pending
                });

            if pending {
                return Err(Box::new(ValidationError {
                    context: "commandPool".into(),
                    problem: format!(
                        "has command buffer {:?} allocated from it, which is in the pending \
                        state",
                        handle,
                    )
                    .into(),
                    vuids,
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_cmd_bind_pipeline(
        &self,
        pipeline_bind_point: vk::PipelineBindPoint,
        pipeline: vk::Pipeline,
    ) -> Result<(), Box<ValidationError>> {
        let Some(pipeline) = self.state.pipelines.get(pipeline) else {
            return Ok(());
        };

        if pipeline.bind_point != pipeline_bind_point {
            let vuids: &'static [&'static str] = match pipeline_bind_point {
                vk::PipelineBindPoint::COMPUTE => {
                    &["VUID-vkCmdBindPipeline-pipelineBindPoint-00779"]
                }
                _ => &["VUID-vkCmdBindPipeline-pipelineBindPoint-00780"],
            };

            return Err(Box::new(ValidationError {
                context: "pipeline".into(),
                problem: format!(
                    "is a {:?} pipeline, but `pipelineBindPoint` is {:?}",
                    pipeline.bind_point, pipeline_bind_point,
                )
                .into(),
                vuids,
            }));
        }

        Ok(())
    }

    pub(super) fn validate_cmd_bind_vertex_buffers(
        &self,
        first_binding: u32,
        buffers: &[vk::Buffer],
        offsets: &[vk::DeviceSize],
    ) -> Result<(), Box<ValidationError>> {
        let max_bindings = self
            .state
            .physical_device_info
            .properties
            .limits
            .max_vertex_input_bindings;

        if first_binding >= max_bindings {
            return Err(Box::new(ValidationError {
                context: "firstBinding".into(),
                problem: format!(
                    "is {}, but the `maxVertexInputBindings` limit is {}",
                    first_binding, max_bindings,
                )
                .into(),
                vuids: &["VUID-vkCmdBindVertexBuffers-firstBinding-00624"],
            }));
        }

        if u64::from(first_binding) + buffers.len() as u64 > u64::from(max_bindings) {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "`firstBinding` + `bindingCount` is greater than the \
                    `maxVertexInputBindings` limit ({})",
                    max_bindings,
                )
                .into(),
                vuids: &["VUID-vkCmdBindVertexBuffers-firstBinding-00625"],
                ..Default::default()
            }));
        }

        for (index, (&handle, &offset)) in buffers.iter().zip(offsets).enumerate() {
            let Some(buffer) = self.state.buffers.get(handle) else {
                continue;
            };

            if offset >= buffer.size {
                return Err(Box::new(ValidationError {
                    context: format!("pOffsets[{}]", index).into(),
                    problem: format!(
                        "({}) is not less than the size of `pBuffers[{}]` ({})",
                        offset, index, buffer.size,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdBindVertexBuffers-pOffsets-00626"],
                }));
            }

            if !buffer.usage.contains(vk::BufferUsageFlags::VERTEX_BUFFER) {
                return Err(Box::new(ValidationError {
                    context: format!("pBuffers[{}].usage", index).into(),
                    problem: "does not contain `VK_BUFFER_USAGE_VERTEX_BUFFER_BIT`".into(),
                    vuids: &["VUID-vkCmdBindVertexBuffers-pBuffers-00627"],
                }));
            }

            self.validate_buffer_memory(&buffer, &["VUID-vkCmdBindVertexBuffers-pBuffers-00628"])
                .map_err(|err| err.add_context(format!("pBuffers[{}]", index)))?;
        }

        Ok(())
    }

    pub(super) fn validate_cmd_bind_index_buffer(
        &self,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    ) -> Result<(), Box<ValidationError>> {
        let Some(buffer_state) = self.state.buffers.get(buffer) else {
            return Ok(());
        };

        if offset >= buffer_state.size {
            return Err(Box::new(ValidationError {
                context: "offset".into(),
                problem: format!(
                    "({}) is not less than the size of `buffer` ({})",
                    offset, buffer_state.size,
                )
                .into(),
                vuids: &["VUID-vkCmdBindIndexBuffer-offset-08782"],
            }));
        }

        let index_size = match index_type {
            vk::IndexType::UINT16 => 2,
            vk::IndexType::UINT32 => 4,
            _ => 1,
        };

        if offset % index_size != 0 {
            return Err(Box::new(ValidationError {
                context: "offset".into(),
                problem: format!("is not a multiple of the size of {:?}", index_type).into(),
                vuids: &["VUID-vkCmdBindIndexBuffer-offset-08783"],
            }));
        }

        if !buffer_state
            .usage
            .contains(vk::BufferUsageFlags::INDEX_BUFFER)
        {
            return Err(Box::new(ValidationError {
                context: "buffer.usage".into(),
                problem: "does not contain `VK_BUFFER_USAGE_INDEX_BUFFER_BIT`".into(),
                vuids: &["VUID-vkCmdBindIndexBuffer-buffer-08784"],
            }));
        }

        self.validate_buffer_memory(&buffer_state, &["VUID-vkCmdBindIndexBuffer-buffer-08785"])
            .map_err(|err| err.add_context("buffer"))
    }

    pub(super) fn validate_cmd_set_viewport(
        &self,
        first_viewport: u32,
        viewport_count: u32,
    ) -> Result<(), Box<ValidationError>> {
        let max_viewports = self
            .state
            .physical_device_info
            .properties
            .limits
            .max_viewports;

        if u64::from(first_viewport) + u64::from(viewport_count) > u64::from(max_viewports) {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "`firstViewport` + `viewportCount` is greater than the `maxViewports` limit \
                    ({})",
                    max_viewports,
                )
                .into(),
                vuids: &["VUID-vkCmdSetViewport-firstViewport-01223"],
                ..Default::default()
            }));
        }

        if self.state.enabled_features.core.multi_viewport == vk::FALSE {
            if first_viewport != 0 {
                return Err(Box::new(ValidationError {
                    context: "firstViewport".into(),
                    problem: "is not 0, but the `multiViewport` feature is not enabled".into(),
                    vuids: &["VUID-vkCmdSetViewport-firstViewport-01224"],
                }));
            }

            if viewport_count != 1 {
                return Err(Box::new(ValidationError {
                    context: "viewportCount".into(),
                    problem: "is not 1, but the `multiViewport` feature is not enabled".into(),
                    vuids: &["VUID-vkCmdSetViewport-viewportCount-01225"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_cmd_set_scissor(
        &self,
        first_scissor: u32,
        scissor_count: u32,
    ) -> Result<(), Box<ValidationError>> {
        let max_viewports = self
            .state
            .physical_device_info
            .properties
            .limits
            .max_viewports;

        if u64::from(first_scissor) + u64::from(scissor_count) > u64::from(max_viewports) {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "`firstScissor` + `scissorCount` is greater than the `maxViewports` limit \
                    ({})",
                    max_viewports,
                )
                .into(),
                vuids: &["VUID-vkCmdSetScissor-firstScissor-00592"],
                ..Default::default()
            }));
        }

        if self.state.enabled_features.core.multi_viewport == vk::FALSE {
            if first_scissor != 0 {
                return Err(Box::new(ValidationError {
                    context: "firstScissor".into(),
                    problem: "is not 0, but the `multiViewport` feature is not enabled".into(),
                    vuids: &["VUID-vkCmdSetScissor-firstScissor-00593"],
                }));
            }

            if scissor_count != 1 {
                return Err(Box::new(ValidationError {
                    context: "scissorCount".into(),
                    problem: "is not 1, but the `multiViewport` feature is not enabled".into(),
                    vuids: &["VUID-vkCmdSetScissor-scissorCount-00594"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_draw(
        &self,
        recording: &CommandBufferRecording,
        vuids: &DrawVuids,
    ) -> Result<(), Box<ValidationError>> {
        match recording.graphics_pipeline {
            Some(pipeline) => self.validate_pipeline_render_pass(recording, pipeline, vuids)?,
            None => self.validate_graphics_shaders(recording, vuids)?,
        }

        if let Some(index_buffer_vuids) = vuids.index_buffer {
            if !recording.index_buffer_bound {
                return Err(Box::new(ValidationError {
                    problem: "no index buffer is bound".into(),
                    vuids: index_buffer_vuids,
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    fn validate_pipeline_render_pass(
        &self,
        recording: &CommandBufferRecording,
        pipeline: vk::Pipeline,
        vuids: &DrawVuids,
    ) -> Result<(), Box<ValidationError>> {
        let Some(pipeline) = self.state.pipelines.get(pipeline) else {
            return Ok(());
        };

        match recording.render_pass {
            Some(RenderPassInstance::Legacy {
                render_pass,
                subpass,
                ..
            }) => {
                if pipeline.render_pass == vk::RenderPass::null()
                    || !self.render_passes_compatible(pipeline.render_pass, render_pass)
                {
                    return Err(Box::new(ValidationError {
                        problem: "the render pass of the bound graphics pipeline is not \
                            compatible with the render pass of the current render pass instance"
                            .into(),
                        vuids: vuids.render_pass,
                        ..Default::default()
                    }));
                }

                if pipeline.subpass != subpass {
                    return Err(Box::new(ValidationError {
                        problem: format!(
                            "the bound graphics pipeline was created for subpass {}, but the \
                            current subpass is {}",
                            pipeline.subpass, subpass,
                        )
                        .into(),
                        vuids: vuids.subpass,
                        ..Default::default()
                    }));
                }
            }
            Some(RenderPassInstance::Dynamic { .. })
                if pipeline.render_pass != vk::RenderPass::null() =>
            {
                return Err(Box::new(ValidationError {
                    problem: "the current render pass instance was begun with \
                        `vkCmdBeginRendering`, but the bound graphics pipeline was created with \
                        a render pass"
                        .into(),
                    vuids: vuids.dynamic_rendering,
                    ..Default::default()
                }));
            }
            _ => {}
        }

        Ok(())
    }

    pub(super) fn validate_dispatch(
        &self,
        recording: &CommandBufferRecording,
    ) -> Result<(), Box<ValidationError>> {
        if recording.compute_pipeline.is_some() {
            return Ok(());
        }

        if !self.state.enabled_features.shader_object {
            return Err(Box::new(ValidationError {
                problem: "no compute pipeline is bound".into(),
                vuids: &["VUID-vkCmdDispatch-None-08606"],
                ..Default::default()
            }));
        }

        match recording.bound_shader(vk::ShaderStageFlags::COMPUTE) {
            Some(shader) if shader != vk::ShaderEXT::null() => Ok(()),
            _ => Err(Box::new(ValidationError {
                problem: "neither a compute pipeline nor a compute shader object is bound".into(),
                vuids: &["VUID-vkCmdDispatch-None-08607"],
                ..Default::default()
            })),
        }
    }

    pub(super) fn validate_render_pass_begin_info(
        &self,
        begin_info: &vk::RenderPassBeginInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let Some(framebuffer) = self.state.framebuffers.get(begin_info.framebuffer) else {
            return Ok(());
        };

        if !self.render_passes_compatible(framebuffer.render_pass, begin_info.render_pass) {
            return Err(Box::new(ValidationError {
                context: "renderPass".into(),
                problem: "is not compatible with the render pass `framebuffer` was created with"
                    .into(),
                vuids: &["VUID-VkRenderPassBeginInfo-renderPass-00904"],
            }));
        }

        let attachment_begin_info = unsafe {
            crate::ffi::chain_find::<vk::RenderPassAttachmentBeginInfo<'_>>(
                begin_info.p_next,
                vk::StructureType::RENDER_PASS_ATTACHMENT_BEGIN_INFO,
            )
        };

        if framebuffer
            .flags
            .contains(vk::FramebufferCreateFlags::IMAGELESS)
            && attachment_begin_info.is_none()
        {
            return Err(Box::new(ValidationError {
                context: "pNext".into(),
                problem: "does not contain a `VkRenderPassAttachmentBeginInfo`, but `framebuffer` \
                    is imageless"
                    .into(),
                vuids: &["VUID-VkRenderPassBeginInfo-framebuffer-03207"],
            }));
        }

        Ok(())
    }

    pub(super) fn validate_cmd_next_subpass(
        &self,
        recording: &CommandBufferRecording,
    ) -> Result<(), Box<ValidationError>> {
        match recording.render_pass {
            Some(RenderPassInstance::Legacy {
                subpass,
                subpass_count,
                ..
            }) if subpass + 1 >= subpass_count => Err(Box::new(ValidationError {
                problem: format!(
                    "the current subpass ({}) is the last subpass of the render pass",
                    subpass,
                )
                .into(),
                vuids: &["VUID-vkCmdNextSubpass-None-00909"],
                ..Default::default()
            })),
            Some(RenderPassInstance::Dynamic { .. }) => Err(Box::new(ValidationError {
                problem: "the current render pass instance was begun with `vkCmdBeginRendering`"
                    .into(),
                vuids: &["VUID-vkCmdNextSubpass-None-10600"],
                ..Default::default()
            })),
            _ => Ok(()),
        }
    }

    pub(super) fn validate_cmd_end_render_pass(
        &self,
        recording: &CommandBufferRecording,
    ) -> Result<(), Box<ValidationError>> {
        match recording.render_pass {
            Some(RenderPassInstance::Legacy {
                subpass,
                subpass_count,
                ..
            }) if subpass + 1 != subpass_count => Err(Box::new(ValidationError {
                problem: format!(
                    "the current subpass ({}) is not the last subpass of the render pass ({})",
                    subpass,
                    subpass_count.saturating_sub(1),
                )
                .into(),
                vuids: &["VUID-vkCmdEndRenderPass-None-00910"],
                ..Default::default()
            })),
            Some(RenderPassInstance::Dynamic { .. }) => Err(Box::new(ValidationError {
                problem: "the current render pass instance was begun with `vkCmdBeginRendering`"
                    .into(),
                vuids: &["VUID-vkCmdEndRenderPass-None-06170"],
                ..Default::default()
            })),
            _ => Ok(()),
        }
    }

    pub(super) fn validate_cmd_begin_rendering(&self) -> Result<(), Box<ValidationError>> {
        if !self.state.enabled_features.dynamic_rendering {
            return Err(Box::new(ValidationError {
                problem: "the `dynamicRendering` feature is not enabled".into(),
                vuids: &["VUID-vkCmdBeginRendering-dynamicRendering-06446"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    pub(super) fn validate_cmd_end_rendering(
        &self,
        recording: &CommandBufferRecording,
    ) -> Result<(), Box<ValidationError>> {
        if let Some(RenderPassInstance::Legacy { .. }) = recording.render_pass {
            return Err(Box::new(ValidationError {
                problem: "the current render pass instance was begun with `vkCmdBeginRenderPass`"
                    .into(),
                vuids: &["VUID-vkCmdEndRendering-None-06161"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// `render_pass` is the render pass instance active in the primary command buffer.
    pub(super) fn validate_cmd_execute_commands(
        &self,
        render_pass: Option<RenderPassInstance>,
        secondaries: &[vk::CommandBuffer],
    ) -> Result<(), Box<ValidationError>> {
        for (index, &handle) in secondaries.iter().enumerate() {
            let Some(secondary) = self.state.command_buffers.get(handle) else {
                continue;
            };
            let context = || format!("pCommandBuffers[{}]", index);

            if secondary.is_primary() {
                return Err(Box::new(ValidationError {
                    context: context().into(),
                    problem: "is a primary command buffer".into(),
                    vuids: &["VUID-vkCmdExecuteCommands-pCommandBuffers-00088"],
                }));
            }

            let (state, simultaneous_use, continues_render_pass) = {
                let recording = secondary.lock();
                (
                    recording.state,
                    recording.is_simultaneous_use(),
                    recording
                        .begin_flags
                        .contains(vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE),
                )
            };

            match state {
                CommandBufferState::Executable => {}
                CommandBufferState::Pending if simultaneous_use => {}
                CommandBufferState::Pending => {
                    return Err(Box::new(ValidationError {
                        context: context().into(),
                        problem: "is in the pending state, but was not recorded with \
                            `VK_COMMAND_BUFFER_USAGE_SIMULTANEOUS_USE_BIT`"
                            .into(),
                        vuids: &["VUID-vkCmdExecuteCommands-pCommandBuffers-00091"],
                    }));
                }
                _ => {
                    return Err(Box::new(ValidationError {
                        context: context().into(),
                        problem: format!(
                            "is in the {:?} state, but must be in the executable or pending \
                            state",
                            state,
                        )
                        .into(),
                        vuids: &["VUID-vkCmdExecuteCommands-pCommandBuffers-00089"],
                    }));
                }
            }

            match render_pass {
                Some(RenderPassInstance::Legacy { .. }) if !continues_render_pass => {
                    return Err(Box::new(ValidationError {
                        context: context().into(),
                        problem: "was not recorded with \
                            `VK_COMMAND_BUFFER_USAGE_RENDER_PASS_CONTINUE_BIT`, but is executed \
                            inside a render pass instance"
                            .into(),
                        vuids: &["VUID-vkCmdExecuteCommands-pCommandBuffers-00096"],
                    }));
                }
                None if continues_render_pass => {
                    return Err(Box::new(ValidationError {
                        context: context().into(),
                        problem: "was recorded with \
                            `VK_COMMAND_BUFFER_USAGE_RENDER_PASS_CONTINUE_BIT`, but is executed \
                            outside a render pass instance"
                            .into(),
                        vuids: &["VUID-vkCmdExecuteCommands-pCommandBuffers-00100"],
                    }));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Two render passes are treated as compatible when they are the same object, or have the
    /// same number of attachments and subpasses. Unknown render passes are left to the object
    /// lifetime checks.
    pub(super) fn render_passes_compatible(&self, a: vk::RenderPass, b: vk::RenderPass) -> bool {
        if a == b {
            return true;
        }

        match (self.state.render_passes.get(a), self.state.render_passes.get(b)) {
            (Some(a), Some(b)) => {
                a.attachment_count == b.attachment_count && a.subpass_count == b.subpass_count
            }
            _ => true,
        }
    }
}
