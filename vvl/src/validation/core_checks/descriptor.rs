use super::CoreChecks;
use crate::{handle::ObjectRef, ValidationError};
use ash::vk;

impl CoreChecks {
    pub(super) fn validate_cmd_bind_descriptor_sets(
        &self,
        layout: vk::PipelineLayout,
        first_set: u32,
        descriptor_set_count: u32,
        dynamic_offset_count: u32,
    ) -> Result<(), Box<ValidationError>> {
        let Some(layout) = self.state.pipeline_layouts.get(layout) else {
            return Ok(());
        };
        let set_layout_count = layout.set_layouts.len() as u64;

        if u64::from(first_set) + u64::from(descriptor_set_count) > set_layout_count {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "`firstSet` ({}) + `descriptorSetCount` ({}) is greater than the number of \
                    set layouts in `layout` ({})",
                    first_set, descriptor_set_count, set_layout_count,
                )
                .into(),
                vuids: &["VUID-vkCmdBindDescriptorSets-firstSet-00360"],
                ..Default::default()
            }));
        }

        let expected: u32 = layout
            .dynamic_descriptor_counts
            .iter()
            .skip(first_set as usize)
            .take(descriptor_set_count as usize)
            .sum();

        if dynamic_offset_count != expected {
            return Err(Box::new(ValidationError {
                context: "dynamicOffsetCount".into(),
                problem: format!(
                    "({}) is not equal to the number of dynamic descriptors in the bound sets \
                    ({})",
                    dynamic_offset_count, expected,
                )
                .into(),
                vuids: &["VUID-vkCmdBindDescriptorSets-dynamicOffsetCount-00359"],
            }));
        }

        Ok(())
    }

    pub(super) fn validate_destroy_descriptor_pool(
        &self,
        descriptor_pool: vk::DescriptorPool,
    ) -> Result<(), Box<ValidationError>> {
        let Some(pool) = self.state.descriptor_pools.get(descriptor_pool) else {
            return Ok(());
        };

        for set in self.sets_of(pool.handle) {
            if let Some(command_buffer) = self.state.pending_command_buffer_using(set) {
                return Err(Box::new(ValidationError {
                    context: "descriptorPool".into(),
                    problem: format!(
                        "has {:?} allocated from it, which is in use by {:?} in the pending \
                        state",
                        set, command_buffer,
                    )
                    .into(),
                    vuids: &["VUID-vkDestroyDescriptorPool-descriptorPool-00303"],
                }));
            }
        }

        Ok(())
    }

    /// # Safety
    ///
    /// - `p_descriptor_sets` must point to `descriptor_set_count` elements.
    pub(super) unsafe fn validate_free_descriptor_sets(
        &self,
        descriptor_pool: vk::DescriptorPool,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
    ) -> Result<(), Box<ValidationError>> {
        if let Some(pool) = self.state.descriptor_pools.get(descriptor_pool) {
            if !pool.allows_free() {
                return Err(Box::new(ValidationError {
                    context: "descriptorPool".into(),
                    problem: "was not created with \
                        `VK_DESCRIPTOR_POOL_CREATE_FREE_DESCRIPTOR_SET_BIT`"
                        .into(),
                    vuids: &["VUID-vkFreeDescriptorSets-descriptorPool-00312"],
                }));
            }
        }

        let sets = unsafe { crate::ffi::slice_from(p_descriptor_sets, descriptor_set_count) };

        for (index, &set) in sets.iter().enumerate() {
            if set == vk::DescriptorSet::null() {
                continue;
            }

            if let Some(command_buffer) = self.state.pending_command_buffer_using(set.into()) {
                return Err(Box::new(ValidationError {
                    context: format!("pDescriptorSets[{}]", index).into(),
                    problem: format!(
                        "is in use by {:?}, which is in the pending state",
                        command_buffer,
                    )
                    .into(),
                    vuids: &["VUID-vkFreeDescriptorSets-pDescriptorSets-00309"],
                }));
            }
        }

        Ok(())
    }

    fn sets_of(&self, pool: vk::DescriptorPool) -> Vec<ObjectRef> {
        self.state
            .descriptor_sets
            .values()
            .into_iter()
            .filter(|set| set.pool == pool)
            .map(|set| ObjectRef::from(set.handle))
            .collect()
    }
}
