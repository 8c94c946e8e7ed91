use super::{DescriptorSetLayout, ObjectMap};
use ash::vk;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct ShaderModule {
    pub handle: vk::ShaderModule,
    pub code_size: usize,
}

/// A `VkShaderEXT` created with `VK_EXT_shader_object`.
#[derive(Debug)]
pub struct ShaderObject {
    pub handle: vk::ShaderEXT,
    pub stage: vk::ShaderStageFlags,
    pub next_stage: vk::ShaderStageFlags,
    pub code_type: vk::ShaderCodeTypeEXT,
    pub flags: vk::ShaderCreateFlagsEXT,
}

impl ShaderObject {
    pub fn new(handle: vk::ShaderEXT, create_info: &vk::ShaderCreateInfoEXT<'_>) -> Self {
        ShaderObject {
            handle,
            stage: create_info.stage,
            next_stage: create_info.next_stage,
            code_type: create_info.code_type,
            flags: create_info.flags,
        }
    }
}

#[derive(Debug)]
pub struct PipelineLayout {
    pub handle: vk::PipelineLayout,
    pub set_layouts: SmallVec<[vk::DescriptorSetLayout; 4]>,
    /// Number of dynamic uniform and storage buffer descriptors in each set. Unknown layouts
    /// count as zero.
    pub dynamic_descriptor_counts: SmallVec<[u32; 4]>,
    pub push_constant_ranges: SmallVec<[vk::PushConstantRange; 2]>,
}

impl PipelineLayout {
    /// # Safety
    ///
    /// - The arrays referenced by `create_info` must be valid.
    pub unsafe fn new(
        handle: vk::PipelineLayout,
        create_info: &vk::PipelineLayoutCreateInfo<'_>,
        set_layout_states: &ObjectMap<vk::DescriptorSetLayout, DescriptorSetLayout>,
    ) -> Self {
        let set_layouts: SmallVec<[_; 4]> = unsafe {
            crate::ffi::slice_from(create_info.p_set_layouts, create_info.set_layout_count)
        }
        .iter()
        .copied()
        .collect();
        let dynamic_descriptor_counts = set_layouts
            .iter()
            .map(|&layout| {
                set_layout_states
                    .get(layout)
                    .map_or(0, |state| state.dynamic_descriptor_count)
            })
            .collect();
        let push_constant_ranges = unsafe {
            crate::ffi::slice_from(
                create_info.p_push_constant_ranges,
                create_info.push_constant_range_count,
            )
        }
        .iter()
        .copied()
        .collect();

        PipelineLayout {
            handle,
            set_layouts,
            dynamic_descriptor_counts,
            push_constant_ranges,
        }
    }
}

#[derive(Debug)]
pub struct Pipeline {
    pub handle: vk::Pipeline,
    pub bind_point: vk::PipelineBindPoint,
    pub layout: vk::PipelineLayout,
    pub stages: vk::ShaderStageFlags,
    /// Null for graphics pipelines used with dynamic rendering, and for compute pipelines.
    pub render_pass: vk::RenderPass,
    pub subpass: u32,
}

impl Pipeline {
    /// # Safety
    ///
    /// - `create_info.p_stages` must point to `create_info.stage_count` valid elements.
    pub unsafe fn graphics(
        handle: vk::Pipeline,
        create_info: &vk::GraphicsPipelineCreateInfo<'_>,
    ) -> Self {
        let stages =
            unsafe { crate::ffi::slice_from(create_info.p_stages, create_info.stage_count) }
                .iter()
                .fold(vk::ShaderStageFlags::empty(), |stages, stage| stages | stage.stage);

        Pipeline {
            handle,
            bind_point: vk::PipelineBindPoint::GRAPHICS,
            layout: create_info.layout,
            stages,
            render_pass: create_info.render_pass,
            subpass: create_info.subpass,
        }
    }

    pub fn compute(handle: vk::Pipeline, create_info: &vk::ComputePipelineCreateInfo<'_>) -> Self {
        Pipeline {
            handle,
            bind_point: vk::PipelineBindPoint::COMPUTE,
            layout: create_info.layout,
            stages: create_info.stage.stage,
            render_pass: vk::RenderPass::null(),
            subpass: 0,
        }
    }
}
