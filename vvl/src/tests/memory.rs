use super::fake_driver::{DEVICE_LOCAL_MEMORY_TYPE, HOST_VISIBLE_MEMORY_TYPE, MEMORY_ALIGNMENT};
use ash::vk;
use std::{ffi::c_void, ptr};

#[test]
fn allocate_memory_info() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let mut memory = vk::DeviceMemory::null();

    let allocate_info = vk::MemoryAllocateInfo {
        allocation_size: 1024,
        memory_type_index: 7,
        ..Default::default()
    };
    let result =
        call!(device, allocate_memory(device.device, &allocate_info, ptr::null(), &mut memory));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkAllocateMemory-pAllocateInfo-01714");

    let allocate_info = vk::MemoryAllocateInfo {
        allocation_size: 0,
        memory_type_index: DEVICE_LOCAL_MEMORY_TYPE,
        ..Default::default()
    };
    let result =
        call!(device, allocate_memory(device.device, &allocate_info, ptr::null(), &mut memory));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-VkMemoryAllocateInfo-allocationSize-00638");

    // Both heaps are 1 GiB.
    let allocate_info = vk::MemoryAllocateInfo {
        allocation_size: 2 << 30,
        memory_type_index: DEVICE_LOCAL_MEMORY_TYPE,
        ..Default::default()
    };
    let result =
        call!(device, allocate_memory(device.device, &allocate_info, ptr::null(), &mut memory));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkAllocateMemory-pAllocateInfo-01713");

    assert_eq!(memory, vk::DeviceMemory::null());
}

#[test]
fn map_and_unmap() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let host_visible = device.allocate_memory(4096, HOST_VISIBLE_MEMORY_TYPE);
    let device_local = device.allocate_memory(4096, DEVICE_LOCAL_MEMORY_TYPE);
    let mut data: *mut c_void = ptr::null_mut();
    let flags = vk::MemoryMapFlags::empty();

    let result = call!(
        device,
        map_memory(device.device, device_local, 0, vk::WHOLE_SIZE, flags, &mut data)
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-memory-00682");

    call!(device, unmap_memory(device.device, host_visible));
    assert_reported!(device, "VUID-vkUnmapMemory-memory-00689");

    let result = call!(
        device,
        map_memory(device.device, host_visible, 4096, vk::WHOLE_SIZE, flags, &mut data)
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-offset-00679");

    let result = call!(
        device,
        map_memory(device.device, host_visible, 0, 0, flags, &mut data)
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-size-00680");

    let result = call!(
        device,
        map_memory(device.device, host_visible, 1024, 4096, flags, &mut data)
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-size-00681");

    let result = call!(
        device,
        map_memory(device.device, host_visible, 1024, 1024, flags, &mut data)
    );
    assert_eq!(result, vk::Result::SUCCESS);
    assert!(!data.is_null());
    assert_reported!(device);

    let result = call!(
        device,
        map_memory(device.device, host_visible, 0, vk::WHOLE_SIZE, flags, &mut data)
    );
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkMapMemory-memory-00678");

    call!(device, unmap_memory(device.device, host_visible));
    assert_reported!(device);

    // Freeing mapped memory unmaps it implicitly.
    let result = call!(
        device,
        map_memory(device.device, host_visible, 0, vk::WHOLE_SIZE, flags, &mut data)
    );
    assert_eq!(result, vk::Result::SUCCESS);

    call!(device, free_memory(device.device, host_visible, ptr::null()));
    call!(device, free_memory(device.device, device_local, ptr::null()));
    assert_reported!(device);
}

#[test]
fn bind_buffer_memory() {
    let device = test_device!();
    device.messages.skip_on_error(true);

    // Requirements are rounded up to the alignment.
    let buffer = device.create_buffer(1000, vk::BufferUsageFlags::VERTEX_BUFFER);
    let mut requirements = vk::MemoryRequirements::default();
    call!(device, get_buffer_memory_requirements(device.device, buffer, &mut requirements));
    assert_eq!(requirements.size, 1024);
    assert_eq!(requirements.alignment, MEMORY_ALIGNMENT);

    let memory = device.allocate_memory(2048, DEVICE_LOCAL_MEMORY_TYPE);

    let result = call!(device, bind_buffer_memory(device.device, buffer, memory, 2048));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkBindBufferMemory-memoryOffset-01031");

    let result = call!(device, bind_buffer_memory(device.device, buffer, memory, 100));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkBindBufferMemory-memoryOffset-01036");

    let result = call!(device, bind_buffer_memory(device.device, buffer, memory, 1280));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkBindBufferMemory-size-01037");

    let result = call!(device, bind_buffer_memory(device.device, buffer, memory, 1024));
    assert_eq!(result, vk::Result::SUCCESS);
    assert_reported!(device);

    let result = call!(device, bind_buffer_memory(device.device, buffer, memory, 0));
    assert_eq!(result, vk::Result::ERROR_VALIDATION_FAILED_EXT);
    assert_reported!(device, "VUID-vkBindBufferMemory-buffer-07459");

    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
    call!(device, free_memory(device.device, memory, ptr::null()));
    assert_reported!(device);
}

#[test]
fn unbound_buffer_in_commands() {
    let device = test_device!();
    let buffer = device.create_buffer(1024, vk::BufferUsageFlags::INDEX_BUFFER);
    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());

    call!(
        device,
        cmd_bind_index_buffer(command_buffer, buffer, 0, vk::IndexType::UINT16)
    );
    assert_reported!(device, "VUID-vkCmdBindIndexBuffer-buffer-08785");

    // Wrong usage is checked before the binding.
    call!(
        device,
        cmd_bind_vertex_buffers(command_buffer, 0, 1, &buffer, &0)
    );
    assert_reported!(device, "VUID-vkCmdBindVertexBuffers-pBuffers-00627");

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
}

#[test]
fn bind_vertex_and_index_buffers() {
    let device = test_device!();
    let (vertices, vertex_memory) =
        device.create_bound_buffer(1024, vk::BufferUsageFlags::VERTEX_BUFFER);
    let (indices, index_memory) =
        device.create_bound_buffer(1024, vk::BufferUsageFlags::INDEX_BUFFER);
    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());

    call!(
        device,
        cmd_bind_vertex_buffers(command_buffer, 0, 1, &vertices, &0)
    );
    call!(
        device,
        cmd_bind_index_buffer(command_buffer, indices, 512, vk::IndexType::UINT32)
    );
    assert_reported!(device);

    call!(
        device,
        cmd_bind_vertex_buffers(command_buffer, 0, 1, &vertices, &1024)
    );
    assert_reported!(device, "VUID-vkCmdBindVertexBuffers-pOffsets-00626");

    call!(
        device,
        cmd_bind_vertex_buffers(command_buffer, 16, 1, &vertices, &0)
    );
    assert_reported!(device, "VUID-vkCmdBindVertexBuffers-firstBinding-00624");

    call!(
        device,
        cmd_bind_index_buffer(command_buffer, indices, 2048, vk::IndexType::UINT32)
    );
    assert_reported!(device, "VUID-vkCmdBindIndexBuffer-offset-08782");

    call!(
        device,
        cmd_bind_index_buffer(command_buffer, indices, 2, vk::IndexType::UINT32)
    );
    assert_reported!(device, "VUID-vkCmdBindIndexBuffer-offset-08783");

    call!(
        device,
        cmd_bind_index_buffer(command_buffer, vertices, 0, vk::IndexType::UINT32)
    );
    assert_reported!(device, "VUID-vkCmdBindIndexBuffer-buffer-08784");

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    for (buffer, memory) in [(vertices, vertex_memory), (indices, index_memory)] {
        call!(device, destroy_buffer(device.device, buffer, ptr::null()));
        call!(device, free_memory(device.device, memory, ptr::null()));
    }
    assert_reported!(device);
}

#[test]
fn destroy_buffer_in_use() {
    let device = test_device!();
    device.messages.skip_on_error(true);
    let (buffer, memory) = device.create_bound_buffer(1024, vk::BufferUsageFlags::TRANSFER_DST);
    let (pool, command_buffer) = device.primary_command_buffer();

    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());
    call!(device, cmd_fill_buffer(command_buffer, buffer, 0, vk::WHOLE_SIZE, 0));
    device.end(command_buffer);
    assert_eq!(device.submit(&[command_buffer], vk::Fence::null()), vk::Result::SUCCESS);

    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
    assert_reported!(device, "VUID-vkDestroyBuffer-buffer-00922");

    device.wait_idle();
    call!(device, destroy_buffer(device.device, buffer, ptr::null()));
    call!(device, free_memory(device.device, memory, ptr::null()));
    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    assert_reported!(device);
}
