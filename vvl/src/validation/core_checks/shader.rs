use super::{command_buffer::DrawVuids, CoreChecks};
use crate::{
    state::{CommandBufferRecording, RenderPassInstance},
    ValidationError,
};
use ash::vk;

const SPIRV_MAGIC: u32 = 0x0723_0203;

const TESSELLATION_CONTROL: vk::ShaderStageFlags = vk::ShaderStageFlags::TESSELLATION_CONTROL;
const TESSELLATION_EVALUATION: vk::ShaderStageFlags =
    vk::ShaderStageFlags::TESSELLATION_EVALUATION;

impl CoreChecks {
    pub(super) fn validate_shader_object_enabled(
        &self,
        vuids: &'static [&'static str],
    ) -> Result<(), Box<ValidationError>> {
        if !self.state.enabled_features.shader_object {
            return Err(Box::new(ValidationError {
                problem: "the `shaderObject` feature is not enabled".into(),
                vuids,
                ..Default::default()
            }));
        }

        Ok(())
    }

    pub(super) fn validate_shader_create_info(
        &self,
        create_info: &vk::ShaderCreateInfoEXT<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let &vk::ShaderCreateInfoEXT {
            stage,
            next_stage,
            code_type,
            code_size,
            p_code,
            ..
        } = create_info;
        let features = &self.state.enabled_features.core;

        match code_type {
            vk::ShaderCodeTypeEXT::SPIRV => {
                if code_size == 0 || code_size % 4 != 0 {
                    return Err(Box::new(ValidationError {
                        context: "codeSize".into(),
                        problem: format!(
                            "({}) is not a non-zero multiple of 4, but `codeType` is \
                            `VK_SHADER_CODE_TYPE_SPIRV_EXT`",
                            code_size,
                        )
                        .into(),
                        vuids: &["VUID-VkShaderCreateInfoEXT-codeSize-08735"],
                    }));
                }

                if p_code as usize % 4 != 0 {
                    return Err(Box::new(ValidationError {
                        context: "pCode".into(),
                        problem: "is not aligned to 4 bytes, but `codeType` is \
                            `VK_SHADER_CODE_TYPE_SPIRV_EXT`"
                            .into(),
                        vuids: &["VUID-VkShaderCreateInfoEXT-pCode-08493"],
                    }));
                }
            }
            vk::ShaderCodeTypeEXT::BINARY => {
                if p_code as usize % 16 != 0 {
                    return Err(Box::new(ValidationError {
                        context: "pCode".into(),
                        problem: "is not aligned to 16 bytes, but `codeType` is \
                            `VK_SHADER_CODE_TYPE_BINARY_EXT`"
                            .into(),
                        vuids: &["VUID-VkShaderCreateInfoEXT-pCode-08492"],
                    }));
                }
            }
            _ => {}
        }

        if (stage == TESSELLATION_CONTROL || stage == TESSELLATION_EVALUATION)
            && features.tessellation_shader == vk::FALSE
        {
            return Err(Box::new(ValidationError {
                context: "stage".into(),
                problem: format!(
                    "is {:?}, but the `tessellationShader` feature is not enabled",
                    stage,
                )
                .into(),
                vuids: &["VUID-VkShaderCreateInfoEXT-stage-08419"],
            }));
        }

        if stage == vk::ShaderStageFlags::GEOMETRY && features.geometry_shader == vk::FALSE {
            return Err(Box::new(ValidationError {
                context: "stage".into(),
                problem: "is `VK_SHADER_STAGE_GEOMETRY_BIT`, but the `geometryShader` feature is \
                    not enabled"
                    .into(),
                vuids: &["VUID-VkShaderCreateInfoEXT-stage-08420"],
            }));
        }

        if stage == vk::ShaderStageFlags::TASK_EXT && !self.state.enabled_features.task_shader {
            return Err(Box::new(ValidationError {
                context: "stage".into(),
                problem: "is `VK_SHADER_STAGE_TASK_BIT_EXT`, but the `taskShader` feature is not \
                    enabled"
                    .into(),
                vuids: &["VUID-VkShaderCreateInfoEXT-stage-08421"],
            }));
        }

        if stage == vk::ShaderStageFlags::MESH_EXT && !self.state.enabled_features.mesh_shader {
            return Err(Box::new(ValidationError {
                context: "stage".into(),
                problem: "is `VK_SHADER_STAGE_MESH_BIT_EXT`, but the `meshShader` feature is not \
                    enabled"
                    .into(),
                vuids: &["VUID-VkShaderCreateInfoEXT-stage-08422"],
            }));
        }

        let allowed_next_stages = match stage {
            vk::ShaderStageFlags::VERTEX => Some((
                TESSELLATION_CONTROL
                    | vk::ShaderStageFlags::GEOMETRY
                    | vk::ShaderStageFlags::FRAGMENT,
                &["VUID-VkShaderCreateInfoEXT-nextStage-08427"],
            )),
            TESSELLATION_CONTROL => Some((
                TESSELLATION_EVALUATION,
                &["VUID-VkShaderCreateInfoEXT-nextStage-08428"],
            )),
            TESSELLATION_EVALUATION => Some((
                vk::ShaderStageFlags::GEOMETRY | vk::ShaderStageFlags::FRAGMENT,
                &["VUID-VkShaderCreateInfoEXT-nextStage-08429"],
            )),
            vk::ShaderStageFlags::GEOMETRY => Some((
                vk::ShaderStageFlags::FRAGMENT,
                &["VUID-VkShaderCreateInfoEXT-nextStage-08430"],
            )),
            vk::ShaderStageFlags::FRAGMENT | vk::ShaderStageFlags::COMPUTE => Some((
                vk::ShaderStageFlags::empty(),
                &["VUID-VkShaderCreateInfoEXT-nextStage-08431"],
            )),
            _ => None,
        };

        if let Some((allowed, vuids)) = allowed_next_stages {
            if !allowed.contains(next_stage) {
                return Err(Box::new(ValidationError {
                    context: "nextStage".into(),
                    problem: format!(
                        "({:?}) contains stages that can't follow `stage` ({:?})",
                        next_stage, stage,
                    )
                    .into(),
                    vuids,
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_cmd_bind_shaders(
        &self,
        stages: &[vk::ShaderStageFlags],
        shaders: &[vk::ShaderEXT],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_shader_object_enabled(&["VUID-vkCmdBindShadersEXT-None-08462"])?;

        for (index, &stage) in stages.iter().enumerate() {
            if stages[..index].contains(&stage) {
                return Err(Box::new(ValidationError {
                    context: format!("pStages[{}]", index).into(),
                    problem: format!("({:?}) appears more than once in `pStages`", stage).into(),
                    vuids: &["VUID-vkCmdBindShadersEXT-pStages-08463"],
                }));
            }
        }

        for (index, (&stage, &shader)) in stages.iter().zip(shaders).enumerate() {
            let Some(shader) = self.state.shader_objects.get(shader) else {
                continue;
            };

            if shader.stage != stage {
                return Err(Box::new(ValidationError {
                    context: format!("pShaders[{}]", index).into(),
                    problem: format!(
                        "was created for stage {:?}, but `pStages[{}]` is {:?}",
                        shader.stage, index, stage,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdBindShadersEXT-pShaders-08469"],
                }));
            }
        }

        Ok(())
    }

    /// Checks the shader objects bound for a draw when no graphics pipeline is bound.
    pub(super) fn validate_graphics_shaders(
        &self,
        recording: &CommandBufferRecording,
        vuids: &DrawVuids,
    ) -> Result<(), Box<ValidationError>> {
        if !self.state.enabled_features.shader_object {
            return Err(Box::new(ValidationError {
                problem: "no graphics pipeline is bound".into(),
                vuids: vuids.pipeline,
                ..Default::default()
            }));
        }

        let any_graphics_shader = recording
            .bound_shaders
            .iter()
            .any(|&(stage, _)| stage != vk::ShaderStageFlags::COMPUTE);

        if !any_graphics_shader {
            return Err(Box::new(ValidationError {
                problem: "neither a graphics pipeline nor any graphics shader objects are bound"
                    .into(),
                vuids: vuids.pipeline_or_shaders,
                ..Default::default()
            }));
        }

        let features = &self.state.enabled_features.core;
        let required = [
            (vk::ShaderStageFlags::VERTEX, true, vuids.vertex_shader),
            (
                TESSELLATION_CONTROL,
                features.tessellation_shader != vk::FALSE,
                vuids.tessellation_control_shader,
            ),
            (
                TESSELLATION_EVALUATION,
                features.tessellation_shader != vk::FALSE,
                vuids.tessellation_evaluation_shader,
            ),
            (
                vk::ShaderStageFlags::GEOMETRY,
                features.geometry_shader != vk::FALSE,
                vuids.geometry_shader,
            ),
            (vk::ShaderStageFlags::FRAGMENT, true, vuids.fragment_shader),
        ];

        for (stage, enabled, stage_vuids) in required {
            if enabled && recording.bound_shader(stage).is_none() {
                return Err(Box::new(ValidationError {
                    problem: format!(
                        "no shader object (or explicit null binding) is bound to stage {:?}",
                        stage,
                    )
                    .into(),
                    vuids: stage_vuids,
                    ..Default::default()
                }));
            }
        }

        if let Some(RenderPassInstance::Legacy { .. }) = recording.render_pass {
            return Err(Box::new(ValidationError {
                problem: "graphics shader objects are bound, but the current render pass \
                    instance was begun with `vkCmdBeginRenderPass`"
                    .into(),
                vuids: vuids.shaders_in_render_pass,
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - If non-null, `create_info.p_code` must point to `create_info.code_size` bytes.
    pub(super) unsafe fn validate_create_shader_module(
        &self,
        create_info: &vk::ShaderModuleCreateInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let &vk::ShaderModuleCreateInfo {
            code_size, p_code, ..
        } = create_info;

        if code_size == 0 {
            return Err(Box::new(ValidationError {
                context: "codeSize".into(),
                problem: "is 0".into(),
                vuids: &["VUID-VkShaderModuleCreateInfo-codeSize-01085"],
            }));
        }

        if code_size % 4 != 0 {
            return Err(Box::new(ValidationError {
                context: "codeSize".into(),
                problem: format!("({}) is not a multiple of 4", code_size).into(),
                vuids: &["VUID-VkShaderModuleCreateInfo-codeSize-08735"],
            }));
        }

        let magic = unsafe { crate::ffi::opt_ref(p_code) }.copied();

        if magic != Some(SPIRV_MAGIC) {
            return Err(Box::new(ValidationError {
                context: "pCode".into(),
                problem: "does not start with the SPIR-V magic number".into(),
                vuids: &["VUID-VkShaderModuleCreateInfo-pCode-08736"],
            }));
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - `create_info.p_stages` must point to `create_info.stage_count` valid elements.
    pub(super) unsafe fn validate_graphics_pipeline_create_info(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        if create_info.render_pass == vk::RenderPass::null() {
            if !self.state.enabled_features.dynamic_rendering {
                return Err(Box::new(ValidationError {
                    context: "renderPass".into(),
                    problem: "is null, but the `dynamicRendering` feature is not enabled".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-dynamicRendering-06576"],
                }));
            }
        } else if let Some(render_pass) = self.state.render_passes.get(create_info.render_pass) {
            if create_info.subpass >= render_pass.subpass_count {
                return Err(Box::new(ValidationError {
                    context: "subpass".into(),
                    problem: format!(
                        "({}) is not less than the number of subpasses of `renderPass` ({})",
                        create_info.subpass, render_pass.subpass_count,
                    )
                    .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06046"],
                }));
            }
        }

        let stages =
            unsafe { crate::ffi::slice_from(create_info.p_stages, create_info.stage_count) }
                .iter()
                .fold(vk::ShaderStageFlags::empty(), |stages, stage| {
                    stages | stage.stage
                });

        if !stages.intersects(vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::MESH_EXT) {
            return Err(Box::new(ValidationError {
                context: "pStages".into(),
                problem: "contains neither a vertex nor a mesh shader stage".into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-02096"],
            }));
        }

        Ok(())
    }

    pub(super) fn validate_compute_pipeline_create_info(
        &self,
        create_info: &vk::ComputePipelineCreateInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        if create_info.stage.stage != vk::ShaderStageFlags::COMPUTE {
            return Err(Box::new(ValidationError {
                context: "stage.stage".into(),
                problem: format!(
                    "is {:?}, but must be `VK_SHADER_STAGE_COMPUTE_BIT`",
                    create_info.stage.stage,
                )
                .into(),
                vuids: &["VUID-VkComputePipelineCreateInfo-stage-00701"],
            }));
        }

        Ok(())
    }
}
