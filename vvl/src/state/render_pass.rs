use ash::vk;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct RenderPass {
    pub handle: vk::RenderPass,
    pub attachment_count: u32,
    pub subpass_count: u32,
}

impl RenderPass {
    pub fn new(handle: vk::RenderPass, create_info: &vk::RenderPassCreateInfo<'_>) -> Self {
        RenderPass {
            handle,
            attachment_count: create_info.attachment_count,
            subpass_count: create_info.subpass_count,
        }
    }
}

#[derive(Debug)]
pub struct Framebuffer {
    pub handle: vk::Framebuffer,
    pub render_pass: vk::RenderPass,
    pub flags: vk::FramebufferCreateFlags,
    pub attachments: SmallVec<[vk::ImageView; 4]>,
    pub attachment_count: u32,
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

impl Framebuffer {
    /// # Safety
    ///
    /// - Unless the framebuffer is imageless, `create_info.p_attachments` must point to
    ///   `create_info.attachment_count` valid elements.
    pub unsafe fn new(
        handle: vk::Framebuffer,
        create_info: &vk::FramebufferCreateInfo<'_>,
    ) -> Self {
        let attachments = if create_info
            .flags
            .contains(vk::FramebufferCreateFlags::IMAGELESS)
        {
            SmallVec::new()
        } else {
            unsafe {
                crate::ffi::slice_from(create_info.p_attachments, create_info.attachment_count)
            }
            .iter()
            .copied()
            .collect()
        };

        Framebuffer {
            handle,
            render_pass: create_info.render_pass,
            flags: create_info.flags,
            attachments,
            attachment_count: create_info.attachment_count,
            width: create_info.width,
            height: create_info.height,
            layers: create_info.layers,
        }
    }
}
