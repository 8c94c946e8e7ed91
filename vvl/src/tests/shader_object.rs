//! Legal `VK_EXT_shader_object` usage that must pass without reports, and the creation rules.

use super::{
    fake_driver::{MAX_TASK_SHARED_MEMORY_SIZE, SHADER_BINARY_SIZE},
    shaders::{self, spirv_create_info},
    Features, TestDevice,
};
use ash::vk;
use std::{mem, ptr};

const VERTEX: vk::ShaderStageFlags = vk::ShaderStageFlags::VERTEX;
const FRAGMENT: vk::ShaderStageFlags = vk::ShaderStageFlags::FRAGMENT;

#[repr(C, align(16))]
#[derive(Clone, Copy)]
struct ShaderBinary([u8; SHADER_BINARY_SIZE]);

impl TestDevice {
    fn create_shader(&self, create_info: &vk::ShaderCreateInfoEXT<'_>) -> vk::ShaderEXT {
        let (result, shaders) = self.create_shaders(std::slice::from_ref(create_info));
        assert_eq!(result, vk::Result::SUCCESS);

        shaders[0]
    }

    fn shader_binary(&self, shader: vk::ShaderEXT) -> ShaderBinary {
        let mut size = 0;
        let result = unsafe {
            (self.get_shader_binary_data)(self.device, shader, &mut size, ptr::null_mut())
        };
        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(size, SHADER_BINARY_SIZE);

        let mut binary = ShaderBinary([0; SHADER_BINARY_SIZE]);
        let result = unsafe {
            (self.get_shader_binary_data)(
                self.device,
                shader,
                &mut size,
                binary.0.as_mut_ptr().cast(),
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);

        binary
    }
}

#[test]
fn create_and_destroy_shader_object() {
    let device = test_device!(shader_object);

    let shader = device.create_shader(&spirv_create_info(
        VERTEX,
        vk::ShaderStageFlags::empty(),
        shaders::VERTEX_MINIMAL,
    ));
    assert_ne!(shader, vk::ShaderEXT::null());

    device.destroy_shader(shader);
    assert_reported!(device);
}

#[test]
fn task_shared_memory() {
    let device = test_device!(shader_object, task_shader, mesh_shader);

    // Exactly fills the task shader's shared memory with `uint`s.
    let length = MAX_TASK_SHARED_MEMORY_SIZE / 4;
    let map_entry = vk::SpecializationMapEntry {
        constant_id: 0,
        offset: 0,
        size: mem::size_of::<u32>(),
    };
    let specialization_info = vk::SpecializationInfo {
        map_entry_count: 1,
        p_map_entries: &map_entry,
        data_size: mem::size_of::<u32>(),
        p_data: ptr::from_ref(&length).cast(),
        ..Default::default()
    };
    let create_info = vk::ShaderCreateInfoEXT {
        p_specialization_info: &specialization_info,
        ..spirv_create_info(
            vk::ShaderStageFlags::TASK_EXT,
            vk::ShaderStageFlags::MESH_EXT,
            shaders::TASK_SHARED_MEMORY,
        )
    };

    let shader = device.create_shader(&create_info);
    device.destroy_shader(shader);
    assert_reported!(device);
}

#[test]
fn draw_with_vertex_and_fragment_shader_objects() {
    // Neither tessellation nor geometry shaders are enabled, so only these two stages need a
    // binding.
    let device = test_device!(shader_object, dynamic_rendering);

    let vertex = device.create_shader(&spirv_create_info(
        VERTEX,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    ));
    let fragment = device.create_shader(&spirv_create_info(
        FRAGMENT,
        vk::ShaderStageFlags::empty(),
        shaders::FRAGMENT_MINIMAL,
    ));

    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

    let rendering_info = vk::RenderingInfo {
        render_area: vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: vk::Extent2D {
                width: 32,
                height: 32,
            },
        },
        layer_count: 1,
        ..Default::default()
    };
    call!(device, cmd_begin_rendering(command_buffer, &rendering_info));

    let stages = [VERTEX, FRAGMENT];
    let shaders = [vertex, fragment];
    call!(
        device,
        cmd_bind_shaders_ext(command_buffer, 2, stages.as_ptr(), shaders.as_ptr())
    );
    call!(device, cmd_draw(command_buffer, 4, 1, 0, 0));
    call!(device, cmd_end_rendering(command_buffer));

    device.end(command_buffer);
    assert_eq!(device.submit(&[command_buffer], vk::Fence::null()), vk::Result::SUCCESS);
    device.wait_idle();

    device.destroy_shader(vertex);
    device.destroy_shader(fragment);
    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    assert_reported!(device);
}

#[test]
fn fail_create_shaders() {
    const SHADER_COUNT: usize = 20;
    const FAILING_INDEX: usize = 15;

    let device = test_device!(shader_object);

    let vertex = device.create_shader(&spirv_create_info(
        VERTEX,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    ));
    let fragment = device.create_shader(&spirv_create_info(
        FRAGMENT,
        vk::ShaderStageFlags::empty(),
        shaders::FRAGMENT_MINIMAL,
    ));
    let vertex_binary = device.shader_binary(vertex);
    let fragment_binary = device.shader_binary(fragment);

    let mut binaries: Vec<ShaderBinary> = (0..SHADER_COUNT)
        .map(|index| {
            if index % 2 == 0 {
                vertex_binary
            } else {
                fragment_binary
            }
        })
        .collect();
    binaries[FAILING_INDEX].0[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    let create_infos: Vec<_> = binaries
        .iter()
        .enumerate()
        .map(|(index, binary)| {
            let (stage, next_stage) = if index % 2 == 0 {
                (VERTEX, FRAGMENT)
            } else {
                (FRAGMENT, vk::ShaderStageFlags::empty())
            };

            vk::ShaderCreateInfoEXT {
                stage,
                next_stage,
                code_type: vk::ShaderCodeTypeEXT::BINARY,
                code_size: SHADER_BINARY_SIZE,
                p_code: binary.0.as_ptr().cast(),
                p_name: shaders::ENTRY_POINT.as_ptr(),
                ..Default::default()
            }
        })
        .collect();

    let (result, created) = device.create_shaders(&create_infos);
    assert_eq!(result, vk::Result::INCOMPATIBLE_SHADER_BINARY_EXT);

    for (index, &shader) in created.iter().enumerate() {
        if index < FAILING_INDEX {
            assert_ne!(shader, vk::ShaderEXT::null(), "shader {} should exist", index);
            device.destroy_shader(shader);
        } else {
            assert_eq!(shader, vk::ShaderEXT::null(), "shader {} should be null", index);
        }
    }

    device.destroy_shader(vertex);
    device.destroy_shader(fragment);
    assert_reported!(device);
}

#[test]
fn shader_object_feature_required() {
    let device = test_device!();

    let (result, created) = device.create_shaders(&[spirv_create_info(
        VERTEX,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    )]);
    assert_eq!(result, vk::Result::SUCCESS);
    assert_reported!(device, "VUID-vkCreateShadersEXT-None-08400");

    device.destroy_shader(created[0]);
}

#[test]
fn create_info_rules() {
    let device = TestDevice::new(Features {
        shader_object: true,
        ..Default::default()
    });

    // Not a multiple of 4.
    let mut create_info = spirv_create_info(VERTEX, FRAGMENT, shaders::VERTEX_MINIMAL);
    create_info.code_size -= 2;
    let (_, created) = device.create_shaders(&[create_info]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-codeSize-08735");
    device.destroy_shader(created[0]);

    // Compute shaders have no next stage.
    let (_, created) = device.create_shaders(&[spirv_create_info(
        vk::ShaderStageFlags::COMPUTE,
        FRAGMENT,
        shaders::COMPUTE_MINIMAL,
    )]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-nextStage-08431");
    device.destroy_shader(created[0]);

    // A vertex shader can't be followed by a compute shader.
    let (_, created) = device.create_shaders(&[spirv_create_info(
        VERTEX,
        vk::ShaderStageFlags::COMPUTE,
        shaders::VERTEX_MINIMAL,
    )]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-nextStage-08427");
    device.destroy_shader(created[0]);

    // The geometry shader feature isn't enabled.
    let (_, created) = device.create_shaders(&[spirv_create_info(
        vk::ShaderStageFlags::GEOMETRY,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    )]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-stage-08420");
    device.destroy_shader(created[0]);

    // Neither the task nor the mesh shader feature is enabled.
    let (_, created) = device.create_shaders(&[spirv_create_info(
        vk::ShaderStageFlags::TASK_EXT,
        vk::ShaderStageFlags::MESH_EXT,
        shaders::TASK_SHARED_MEMORY,
    )]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-stage-08421");
    device.destroy_shader(created[0]);

    let (_, created) = device.create_shaders(&[spirv_create_info(
        vk::ShaderStageFlags::MESH_EXT,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    )]);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-stage-08422");
    device.destroy_shader(created[0]);

    // Binaries must be 16-byte aligned.
    let binary = ShaderBinary([0; SHADER_BINARY_SIZE]);
    let create_info = vk::ShaderCreateInfoEXT {
        stage: VERTEX,
        code_type: vk::ShaderCodeTypeEXT::BINARY,
        code_size: SHADER_BINARY_SIZE - 4,
        p_code: binary.0[4..].as_ptr().cast(),
        p_name: shaders::ENTRY_POINT.as_ptr(),
        ..Default::default()
    };
    let (result, _) = device.create_shaders(&[create_info]);
    assert_eq!(result, vk::Result::INCOMPATIBLE_SHADER_BINARY_EXT);
    assert_reported!(device, "VUID-VkShaderCreateInfoEXT-pCode-08492");
}

#[test]
fn draw_requires_fragment_binding() {
    let device = test_device!(shader_object, dynamic_rendering);

    let vertex = device.create_shader(&spirv_create_info(
        VERTEX,
        FRAGMENT,
        shaders::VERTEX_MINIMAL,
    ));
    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());

    let rendering_info = vk::RenderingInfo {
        layer_count: 1,
        ..Default::default()
    };
    call!(device, cmd_begin_rendering(command_buffer, &rendering_info));
    call!(
        device,
        cmd_bind_shaders_ext(command_buffer, 1, &VERTEX, &vertex)
    );
    call!(device, cmd_draw(command_buffer, 3, 1, 0, 0));
    assert_reported!(device, "VUID-vkCmdDraw-None-08688");

    // An explicit null binding is enough.
    let null = vk::ShaderEXT::null();
    call!(device, cmd_bind_shaders_ext(command_buffer, 1, &FRAGMENT, &null));
    call!(device, cmd_draw(command_buffer, 3, 1, 0, 0));
    assert_reported!(device);

    // Binding a shader to a stage it wasn't created for.
    call!(device, cmd_bind_shaders_ext(command_buffer, 1, &FRAGMENT, &vertex));
    assert_reported!(device, "VUID-vkCmdBindShadersEXT-pShaders-08469");

    call!(device, cmd_end_rendering(command_buffer));
    device.end(command_buffer);

    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
    device.destroy_shader(vertex);
    assert_reported!(device);
}

#[test]
fn draw_without_shader_objects() {
    let device = test_device!(dynamic_rendering);

    let (pool, command_buffer) = device.primary_command_buffer();
    device.begin(command_buffer, vk::CommandBufferUsageFlags::empty());

    let rendering_info = vk::RenderingInfo {
        layer_count: 1,
        ..Default::default()
    };
    call!(device, cmd_begin_rendering(command_buffer, &rendering_info));
    call!(device, cmd_draw(command_buffer, 3, 1, 0, 0));
    assert_reported!(device, "VUID-vkCmdDraw-None-08606");

    call!(device, cmd_end_rendering(command_buffer));
    device.end(command_buffer);
    call!(device, destroy_command_pool(device.device, pool, ptr::null()));
}
