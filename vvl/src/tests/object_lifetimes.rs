use super::fake_driver::HOST_VISIBLE_MEMORY_TYPE;
use ash::vk;
use std::{ffi::c_void, ptr};

#[test]
fn destroyed_handles_are_unknown() {
    let device = test_device!();
    device.messages.skip_on_error(true);

    let buffer = device.create_buffer(1024, vk::BufferUsageFlags::VERTEX_BUFFER);
    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
    assert_reported!(device);

    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
    assert_reported!(device, "VUID-vkDestroyBuffer-buffer-parameter");

    let memory = device.allocate_memory(4096, HOST_VISIBLE_MEMORY_TYPE);
    call!(device, free_memory(device.device, memory, ptr::null()));

    let mut data: *mut c_void = ptr::null_mut();
    let result = call!(
        device,
        map_memory(
            device.device,
            memory,
            0,
            vk::WHOLE_SIZE,
            vk::MemoryMapFlags::empty(),
            &mut data,
        )
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-memory-parameter");
}

#[test]
fn null_handles_may_be_destroyed() {
    let device = test_device!();

    call!(device, destroy_buffer(device.device, vk::Buffer::null(), ptr::null()));
    call!(device, free_memory(device.device, vk::DeviceMemory::null(), ptr::null()));
    assert_reported!(device);
}

#[test]
fn leaked_objects_are_reported_with_the_device() {
    let device = test_device!();
    let messages = device.messages.clone();

    let buffer = device.create_buffer(1024, vk::BufferUsageFlags::VERTEX_BUFFER);
    let fence = device.create_fence(vk::FenceCreateFlags::empty());
    call!(device, destroy_fence(device.device, fence, ptr::null()));
    assert_reported!(device);

    drop(device);

    let leaks: Vec<_> = messages
        .take()
        .into_iter()
        .filter(|message| message.vuid == "VUID-vkDestroyDevice-device-05137")
        .collect();
    assert_eq!(leaks.len(), 1);
    assert!(leaks[0].text.contains(&format!("{:x}", vk::Handle::as_raw(buffer))));
}
