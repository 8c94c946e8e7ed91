use super::{
    fake_driver::DEVICE_LOCAL_MEMORY_TYPE,
    shaders::{self, spirv_create_info},
    Features, TestDevice, ALL_VALIDATORS,
};
use ash::vk;
use std::ptr;

fn best_practices_device(features: Features) -> TestDevice {
    TestDevice::with_validators(features, &ALL_VALIDATORS)
}

#[test]
fn small_allocation() {
    let device = best_practices_device(Features::default());

    let small = device.allocate_memory(4096, DEVICE_LOCAL_MEMORY_TYPE);
    assert_reported!(device, "BestPractices-vkAllocateMemory-small-allocation");

    let large = device.allocate_memory(1 << 20, DEVICE_LOCAL_MEMORY_TYPE);
    assert_reported!(device);

    call!(device, free_memory(device.device, small, ptr::null()));
    call!(device, free_memory(device.device, large, ptr::null()));
}

#[test]
fn too_many_allocations() {
    const ALLOCATION_SIZE: vk::DeviceSize = 256 * 1024;

    let device = best_practices_device(Features::default());
    let allocations: Vec<_> = (0..250)
        .map(|_| device.allocate_memory(ALLOCATION_SIZE, DEVICE_LOCAL_MEMORY_TYPE))
        .collect();
    assert_reported!(device);

    let one_too_many = device.allocate_memory(ALLOCATION_SIZE, DEVICE_LOCAL_MEMORY_TYPE);
    assert_reported!(device, "BestPractices-vkAllocateMemory-too-many-objects");

    for memory in allocations.into_iter().chain([one_too_many]) {
        call!(device, free_memory(device.device, memory, ptr::null()));
    }
    assert_reported!(device);
}

#[test]
fn command_buffer_reset_pool() {
    let device = best_practices_device(Features::default());

    let pool = device.create_command_pool(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
    assert_reported!(device, "BestPractices-vkCreateCommandPool-command-buffer-reset");

    let transient = device.create_command_pool(vk::CommandPoolCreateFlags::TRANSIENT);
    assert_reported!(device);

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    call!(device, destroy_command_pool(device.device, transient, ptr::null()));
}

#[test]
fn draw_zero_instances() {
    let device = best_practices_device(Features {
        dynamic_rendering: true,
        shader_object: true,
        ..Default::default()
    });

    let (result, shaders) = device.create_shaders(&[
        spirv_create_info(
            vk::ShaderStageFlags::VERTEX,
            vk::ShaderStageFlags::FRAGMENT,
            shaders::VERTEX_MINIMAL,
        ),
        spirv_create_info(
            vk::ShaderStageFlags::FRAGMENT,
            vk::ShaderStageFlags::empty(),
            shaders::FRAGMENT_MINIMAL,
        ),
    ]);
    assert_eq!(result, vk::Result::SUCCESS);

    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());

    let rendering_info = vk::RenderingInfo {
        render_area: vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: vk::Extent2D {
                width: 16,
                height: 16,
            },
        },
        layer_count: 1,
        ..Default::default()
    };
    call!(device, cmd_begin_rendering(command_buffer, &rendering_info));

    let stages = [vk::ShaderStageFlags::VERTEX, vk::ShaderStageFlags::FRAGMENT];
    call!(
        device,
        cmd_bind_shaders_ext(command_buffer, 2, stages.as_ptr(), shaders.as_ptr())
    );
    call!(device, cmd_draw(command_buffer, 3, 1, 0, 0));
    assert_reported!(device);

    call!(device, cmd_draw(command_buffer, 3, 0, 0, 0));
    assert_reported!(device, "BestPractices-vkCmdDraw-instance-count-zero");

    call!(device, cmd_end_rendering(command_buffer));
    device.end(command_buffer);

    for shader in shaders {
        device.destroy_shader(shader);
    }
    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    assert_reported!(device);
}

#[test]
fn disabled_by_default() {
    let device = test_device!();

    let memory = device.allocate_memory(4096, DEVICE_LOCAL_MEMORY_TYPE);
    call!(device, free_memory(device.device, memory, ptr::null()));
    assert_reported!(device);
}
