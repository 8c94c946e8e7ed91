use super::TestDevice;
use ash::vk;
use std::ptr;

fn submit_semaphores(
    device: &TestDevice,
    wait: &[vk::Semaphore],
    signal: &[vk::Semaphore],
) -> vk::Result {
    let wait_stages = vec![vk::PipelineStageFlags::ALL_COMMANDS; wait.len()];
    let submit_info = vk::SubmitInfo {
        wait_semaphore_count: wait.len() as u32,
        p_wait_semaphores: wait.as_ptr(),
        p_wait_dst_stage_mask: wait_stages.as_ptr(),
        signal_semaphore_count: signal.len() as u32,
        p_signal_semaphores: signal.as_ptr(),
        ..Default::default()
    };

    call!(device, queue_submit(device.queue, 1, &submit_info, vk::Fence::null()))
}

#[test]
fn fence_lifecycle() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let fence = device.create_fence(vk::FenceCreateFlags::SIGNALED);

    assert_eq!(
        device.submit(&[], fence),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkQueueSubmit-fence-00063");

    assert_eq!(
        call!(device, reset_fences(device.device, 1, &fence)),
        vk::Result::SUCCESS,
    );
    assert_eq!(device.submit(&[], fence), vk::Result::SUCCESS);
    assert_reported!(device);

    assert_eq!(
        device.submit(&[], fence),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkQueueSubmit-fence-00064");

    assert_eq!(
        call!(device, reset_fences(device.device, 1, &fence)),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkResetFences-pFences-01123");

    call!(device, destroy_fence(device.device, fence, ptr::null()));
    assert_reported!(device, "VUID-vkDestroyFence-fence-01120");

    // Waiting on the fence retires the submission.
    assert_eq!(
        call!(device, wait_for_fences(device.device, 1, &fence, vk::TRUE, u64::MAX)),
        vk::Result::SUCCESS,
    );
    call!(device, destroy_fence(device.device, fence, ptr::null()));
    assert_reported!(device);
}

#[test]
fn fence_status_retires_command_buffers() {
    let device = test_device!();
    let fence = device.create_fence(vk::FenceCreateFlags::empty());
    let (pool, command_buffer) = device.primary_command_buffer();

    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());
    device.end(command_buffer);
    assert_eq!(device.submit(&[command_buffer], fence), vk::Result::SUCCESS);
    assert_eq!(
        call!(device, get_fence_status(device.device, fence)),
        vk::Result::SUCCESS,
    );

    // No longer pending.
    assert_eq!(device.submit(&[command_buffer], vk::Fence::null()), vk::Result::SUCCESS);
    assert_eq!(call!(device, device_wait_idle(device.device)), vk::Result::SUCCESS);

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    call!(device, destroy_fence(device.device, fence, ptr::null()));
    assert_reported!(device);
}

#[test]
fn binary_semaphores() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let semaphore = device.create_semaphore();

    assert_eq!(
        submit_semaphores(&device, &[semaphore], &[]),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkQueueSubmit-pWaitSemaphores-03238");

    assert_eq!(submit_semaphores(&device, &[], &[semaphore]), vk::Result::SUCCESS);
    assert_eq!(
        submit_semaphores(&device, &[], &[semaphore]),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkQueueSubmit-pSignalSemaphores-00067");

    // The signal is pending, so the semaphore can't be destroyed yet.
    call!(device, destroy_semaphore(device.device, semaphore, ptr::null()));
    assert_reported!(device, "VUID-vkDestroySemaphore-semaphore-05149");

    assert_eq!(submit_semaphores(&device, &[semaphore], &[]), vk::Result::SUCCESS);
    assert_reported!(device);

    device.wait_idle();
    call!(device, destroy_semaphore(device.device, semaphore, ptr::null()));
    assert_reported!(device);
}

#[test]
fn semaphore_state_within_one_submit() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let semaphore = device.create_semaphore();

    // The second batch waits on the signal of the first.
    let wait_stage = vk::PipelineStageFlags::ALL_COMMANDS;
    let submits = [
        vk::SubmitInfo {
            signal_semaphore_count: 1,
            p_signal_semaphores: &semaphore,
            ..Default::default()
        },
        vk::SubmitInfo {
            wait_semaphore_count: 1,
            p_wait_semaphores: &semaphore,
            p_wait_dst_stage_mask: &wait_stage,
            ..Default::default()
        },
    ];
    assert_eq!(
        call!(
            device,
            queue_submit(device.queue, 2, submits.as_ptr(), vk::Fence::null())
        ),
        vk::Result::SUCCESS,
    );
    assert_reported!(device);

    device.wait_idle();
    call!(device, destroy_semaphore(device.device, semaphore, ptr::null()));
    assert_reported!(device);
}

#[test]
fn submit_to_other_queue_family() {
    let device = test_device!();
    device.messages.skip_on_error(true);

    let create_info = vk::CommandPoolCreateInfo {
        queue_family_index: 1,
        ..Default::default()
    };
    let mut pool = vk::CommandPool::null();
    assert_eq!(
        call!(
            device,
            create_command_pool(device.device, &create_info, ptr::null(), &mut pool)
        ),
        vk::Result::SUCCESS,
    );
    let command_buffer = device.allocate_command_buffer(pool, vk::CommandBufferLevel::PRIMARY);
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());
    device.end(command_buffer);

    assert_eq!(
        device.submit(&[command_buffer], vk::Fence::null()),
        vk::Result::ERROR_VALIDATION_FAILED_EXT,
    );
    assert_reported!(device, "VUID-vkQueueSubmit-pCommandBuffers-00074");

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
}
