use super::CoreChecks;
use crate::{
    state::{Buffer, ResourceMemory},
    ValidationError,
};
use ash::vk;

impl CoreChecks {
    pub(super) fn validate_allocate_memory(
        &self,
        allocate_info: &vk::MemoryAllocateInfo<'_>,
    ) -> Result<(), Box<ValidationError>> {
        let &vk::MemoryAllocateInfo {
            allocation_size,
            memory_type_index,
            ..
        } = allocate_info;

        let info = &self.state.physical_device_info;
        let Some(memory_type) = info.memory_types().get(memory_type_index as usize) else {
            return Err(Box::new(ValidationError {
                context: "memoryTypeIndex".into(),
                problem: format!(
                    "is {}, but the physical device has only {} memory types",
                    memory_type_index,
                    info.memory_types().len(),
                )
                .into(),
                vuids: &["VUID-vkAllocateMemory-pAllocateInfo-01714"],
            }));
        };

        if allocation_size == 0 {
            return Err(Box::new(ValidationError {
                context: "allocationSize".into(),
                problem: "is 0".into(),
                vuids: &["VUID-VkMemoryAllocateInfo-allocationSize-00638"],
            }));
        }

        if let Some(heap) = info.memory_heaps().get(memory_type.heap_index as usize) {
            if allocation_size > heap.size {
                return Err(Box::new(ValidationError {
                    context: "allocationSize".into(),
                    problem: format!(
                        "({}) is greater than the size of memory heap {} ({})",
                        allocation_size, memory_type.heap_index, heap.size,
                    )
                    .into(),
                    vuids: &["VUID-vkAllocateMemory-pAllocateInfo-01713"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_map_memory(
        &self,
        memory: vk::DeviceMemory,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
    ) -> Result<(), Box<ValidationError>> {
        let Some(memory) = self.state.memories.get(memory) else {
            return Ok(());
        };

        if !memory.is_host_visible() {
            return Err(Box::new(ValidationError {
                context: "memory".into(),
                problem: "was not allocated from a memory type with \
                    `VK_MEMORY_PROPERTY_HOST_VISIBLE_BIT`"
                    .into(),
                vuids: &["VUID-vkMapMemory-memory-00682"],
            }));
        }

        if let Some(mapped) = memory.mapped() {
            return Err(Box::new(ValidationError {
                context: "memory".into(),
                problem: format!(
                    "is already mapped at offset {} with size {}",
                    mapped.offset, mapped.size,
                )
                .into(),
                vuids: &["VUID-vkMapMemory-memory-00678"],
            }));
        }

        if offset >= memory.allocation_size {
            return Err(Box::new(ValidationError {
                context: "offset".into(),
                problem: format!(
                    "({}) is not less than the allocation size ({})",
                    offset, memory.allocation_size,
                )
                .into(),
                vuids: &["VUID-vkMapMemory-offset-00679"],
            }));
        }

        if size != vk::WHOLE_SIZE {
            if size == 0 {
                return Err(Box::new(ValidationError {
                    context: "size".into(),
                    problem: "is 0".into(),
                    vuids: &["VUID-vkMapMemory-size-00680"],
                }));
            }

            if size > memory.allocation_size - offset {
                return Err(Box::new(ValidationError {
                    context: "size".into(),
                    problem: format!(
                        "({}) is greater than the allocation size ({}) minus `offset` ({})",
                        size, memory.allocation_size, offset,
                    )
                    .into(),
                    vuids: &["VUID-vkMapMemory-size-00681"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_unmap_memory(
        &self,
        memory: vk::DeviceMemory,
    ) -> Result<(), Box<ValidationError>> {
        match self.state.memories.get(memory) {
            Some(memory) if memory.mapped().is_none() => Err(Box::new(ValidationError {
                context: "memory".into(),
                problem: "is not currently mapped".into(),
                vuids: &["VUID-vkUnmapMemory-memory-00689"],
            })),
            _ => Ok(()),
        }
    }

    pub(super) fn validate_bind_buffer_memory(
        &self,
        buffer: vk::Buffer,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
    ) -> Result<(), Box<ValidationError>> {
        let Some(buffer) = self.state.buffers.get(buffer) else {
            return Ok(());
        };

        if buffer.is_sparse() {
            return Err(Box::new(ValidationError {
                context: "buffer".into(),
                problem: "was created with `VK_BUFFER_CREATE_SPARSE_BINDING_BIT`".into(),
                vuids: &["VUID-vkBindBufferMemory-buffer-01030"],
            }));
        }

        self.validate_bind_resource_memory(
            &buffer.memory,
            memory,
            memory_offset,
            &BindVuids {
                already_bound: &["VUID-vkBindBufferMemory-buffer-07459"],
                offset_in_range: &["VUID-vkBindBufferMemory-memoryOffset-01031"],
                memory_type: &["VUID-vkBindBufferMemory-memory-01035"],
                alignment: &["VUID-vkBindBufferMemory-memoryOffset-01036"],
                size: &["VUID-vkBindBufferMemory-size-01037"],
            },
        )
    }

    pub(super) fn validate_bind_image_memory(
        &self,
        image: vk::Image,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
    ) -> Result<(), Box<ValidationError>> {
        let Some(image) = self.state.images.get(image) else {
            return Ok(());
        };

        if image.is_sparse() {
            return Err(Box::new(ValidationError {
                context: "image".into(),
                problem: "was created with `VK_IMAGE_CREATE_SPARSE_BINDING_BIT`".into(),
                vuids: &["VUID-vkBindImageMemory-image-01045"],
            }));
        }

        self.validate_bind_resource_memory(
            &image.memory,
            memory,
            memory_offset,
            &BindVuids {
                already_bound: &["VUID-vkBindImageMemory-image-07460"],
                offset_in_range: &["VUID-vkBindImageMemory-memoryOffset-01046"],
                memory_type: &["VUID-vkBindImageMemory-memory-01047"],
                alignment: &["VUID-vkBindImageMemory-memoryOffset-01048"],
                size: &["VUID-vkBindImageMemory-size-01049"],
            },
        )
    }

    fn validate_bind_resource_memory(
        &self,
        resource: &ResourceMemory,
        memory: vk::DeviceMemory,
        memory_offset: vk::DeviceSize,
        vuids: &BindVuids,
    ) -> Result<(), Box<ValidationError>> {
        if resource.binding().is_some() {
            return Err(Box::new(ValidationError {
                problem: "the resource is already bound to memory".into(),
                vuids: vuids.already_bound,
                ..Default::default()
            }));
        }

        let Some(memory) = self.state.memories.get(memory) else {
            return Ok(());
        };

        if memory_offset >= memory.allocation_size {
            return Err(Box::new(ValidationError {
                context: "memoryOffset".into(),
                problem: format!(
                    "({}) is not less than the size of `memory` ({})",
                    memory_offset, memory.allocation_size,
                )
                .into(),
                vuids: vuids.offset_in_range,
            }));
        }

        // Without queried requirements there is nothing to compare against.
        let Some(requirements) = resource.requirements() else {
            return Ok(());
        };

        if requirements.memory_type_bits & (1 << memory.memory_type_index) == 0 {
            return Err(Box::new(ValidationError {
                context: "memory".into(),
                problem: format!(
                    "was allocated from memory type {}, which is not allowed by the \
                    resource's memory requirements (`memoryTypeBits` = {:#b})",
                    memory.memory_type_index, requirements.memory_type_bits,
                )
                .into(),
                vuids: vuids.memory_type,
            }));
        }

        if requirements.alignment != 0 && memory_offset % requirements.alignment != 0 {
            return Err(Box::new(ValidationError {
                context: "memoryOffset".into(),
                problem: format!(
                    "({}) is not a multiple of the required alignment ({})",
                    memory_offset, requirements.alignment,
                )
                .into(),
                vuids: vuids.alignment,
            }));
        }

        if requirements.size > memory.allocation_size - memory_offset {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "the size of `memory` ({}) minus `memoryOffset` ({}) is less than the \
                    required size ({})",
                    memory.allocation_size, memory_offset, requirements.size,
                )
                .into(),
                vuids: vuids.size,
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// Checks that a non-sparse buffer used by a command is bound to memory that still exists.
    pub(super) fn validate_buffer_memory(
        &self,
        buffer: &Buffer,
        vuids: &'static [&'static str],
    ) -> Result<(), Box<ValidationError>> {
        if buffer.is_sparse() {
            return Ok(());
        }

        match buffer.memory.binding() {
            Some(binding) if binding.is_valid() => Ok(()),
            Some(binding) => Err(Box::new(ValidationError {
                problem: format!(
                    "is bound to {:?}, which has been freed",
                    binding.memory.handle,
                )
                .into(),
                vuids,
                ..Default::default()
            })),
            None => Err(Box::new(ValidationError {
                problem: "is not bound to memory".into(),
                vuids,
                ..Default::default()
            })),
        }
    }

    pub(super) fn validate_cmd_copy_buffer(
        &self,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        regions: &[vk::BufferCopy],
    ) -> Result<(), Box<ValidationError>> {
        let (Some(src), Some(dst)) = (
            self.state.buffers.get(src_buffer),
            self.state.buffers.get(dst_buffer),
        ) else {
            return Ok(());
        };

        if !src.usage.contains(vk::BufferUsageFlags::TRANSFER_SRC) {
            return Err(Box::new(ValidationError {
                context: "srcBuffer.usage".into(),
                problem: "does not contain `VK_BUFFER_USAGE_TRANSFER_SRC_BIT`".into(),
                vuids: &["VUID-vkCmdCopyBuffer-srcBuffer-00118"],
            }));
        }

        self.validate_buffer_memory(&src, &["VUID-vkCmdCopyBuffer-srcBuffer-00119"])
            .map_err(|err| err.add_context("srcBuffer"))?;

        if !dst.usage.contains(vk::BufferUsageFlags::TRANSFER_DST) {
            return Err(Box::new(ValidationError {
                context: "dstBuffer.usage".into(),
                problem: "does not contain `VK_BUFFER_USAGE_TRANSFER_DST_BIT`".into(),
                vuids: &["VUID-vkCmdCopyBuffer-dstBuffer-00120"],
            }));
        }

        self.validate_buffer_memory(&dst, &["VUID-vkCmdCopyBuffer-dstBuffer-00121"])
            .map_err(|err| err.add_context("dstBuffer"))?;

        for (index, region) in regions.iter().enumerate() {
            let &vk::BufferCopy {
                src_offset,
                dst_offset,
                size,
            } = region;
            let context = || format!("pRegions[{}]", index);

            if size == 0 {
                return Err(Box::new(ValidationError {
                    context: format!("{}.size", context()).into(),
                    problem: "is 0".into(),
                    vuids: &["VUID-VkBufferCopy-size-01988"],
                }));
            }

            if src_offset >= src.size {
                return Err(Box::new(ValidationError {
                    context: format!("{}.srcOffset", context()).into(),
                    problem: format!(
                        "({}) is not less than the size of `srcBuffer` ({})",
                        src_offset, src.size,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdCopyBuffer-srcOffset-00113"],
                }));
            }

            if dst_offset >= dst.size {
                return Err(Box::new(ValidationError {
                    context: format!("{}.dstOffset", context()).into(),
                    problem: format!(
                        "({}) is not less than the size of `dstBuffer` ({})",
                        dst_offset, dst.size,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdCopyBuffer-dstOffset-00114"],
                }));
            }

            if size > src.size - src_offset {
                return Err(Box::new(ValidationError {
                    context: format!("{}.size", context()).into(),
                    problem: format!(
                        "({}) is greater than the size of `srcBuffer` ({}) minus `srcOffset` \
                        ({})",
                        size, src.size, src_offset,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdCopyBuffer-size-00115"],
                }));
            }

            if size > dst.size - dst_offset {
                return Err(Box::new(ValidationError {
                    context: format!("{}.size", context()).into(),
                    problem: format!(
                        "({}) is greater than the size of `dstBuffer` ({}) minus `dstOffset` \
                        ({})",
                        size, dst.size, dst_offset,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdCopyBuffer-size-00116"],
                }));
            }
        }

        Ok(())
    }

    pub(super) fn validate_cmd_fill_buffer(
        &self,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        size: vk::DeviceSize,
    ) -> Result<(), Box<ValidationError>> {
        let Some(dst) = self.state.buffers.get(dst_buffer) else {
            return Ok(());
        };

        if dst_offset >= dst.size {
            return Err(Box::new(ValidationError {
                context: "dstOffset".into(),
                problem: format!(
                    "({}) is not less than the size of `dstBuffer` ({})",
                    dst_offset, dst.size,
                )
                .into(),
                vuids: &["VUID-vkCmdFillBuffer-dstOffset-00024"],
            }));
        }

        if dst_offset % 4 != 0 {
            return Err(Box::new(ValidationError {
                context: "dstOffset".into(),
                problem: "is not a multiple of 4".into(),
                vuids: &["VUID-vkCmdFillBuffer-dstOffset-00025"],
            }));
        }

        if size != vk::WHOLE_SIZE {
            if size == 0 {
                return Err(Box::new(ValidationError {
                    context: "size".into(),
                    problem: "is 0".into(),
                    vuids: &["VUID-vkCmdFillBuffer-size-00026"],
                }));
            }

            if size > dst.size - dst_offset {
                return Err(Box::new(ValidationError {
                    context: "size".into(),
                    problem: format!(
                        "({}) is greater than the size of `dstBuffer` ({}) minus `dstOffset` \
                        ({})",
                        size, dst.size, dst_offset,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdFillBuffer-size-00027"],
                }));
            }

            if size % 4 != 0 {
                return Err(Box::new(ValidationError {
                    context: "size".into(),
                    problem: "is not a multiple of 4".into(),
                    vuids: &["VUID-vkCmdFillBuffer-size-00028"],
                }));
            }
        }

        if !dst.usage.contains(vk::BufferUsageFlags::TRANSFER_DST) {
            return Err(Box::new(ValidationError {
                context: "dstBuffer.usage".into(),
                problem: "does not contain `VK_BUFFER_USAGE_TRANSFER_DST_BIT`".into(),
                vuids: &["VUID-vkCmdFillBuffer-dstBuffer-00029"],
            }));
        }

        self.validate_buffer_memory(&dst, &["VUID-vkCmdFillBuffer-dstBuffer-00031"])
            .map_err(|err| err.add_context("dstBuffer"))
    }
}

/// The VUIDs of the rules `vkBindBufferMemory` and `vkBindImageMemory` share.
struct BindVuids {
    already_bound: &'static [&'static str],
    offset_in_range: &'static [&'static str],
    memory_type: &'static [&'static str],
    alignment: &'static [&'static str],
    size: &'static [&'static str],
}
