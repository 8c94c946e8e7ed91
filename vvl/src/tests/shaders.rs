//! Minimal hand-assembled SPIR-V modules, one per stage the tests use.
//!
//! Each is an empty `main` with only the execution modes its stage requires.

use ash::vk;
use std::{ffi::CStr, mem};

pub(crate) const ENTRY_POINT: &CStr = c"main";

/// `"main\0"` as SPIR-V string words.
const MAIN: [u32; 2] = [0x6E69_616D, 0];

macro_rules! spirv {
    ($bound:expr; $($word:expr),* $(,)?) => {
        &[0x0723_0203, 0x0001_0000, 0, $bound, 0, $($word),*]
    };
}

pub(crate) const VERTEX_MINIMAL: &[u32] = spirv![
    5;
    0x0002_0011, 1,                       // OpCapability Shader
    0x0003_000E, 0, 1,                    // OpMemoryModel Logical GLSL450
    0x0005_000F, 0, 1, MAIN[0], MAIN[1],  // OpEntryPoint Vertex %1 "main"
    0x0002_0013, 2,                       // %2 = OpTypeVoid
    0x0003_0021, 3, 2,                    // %3 = OpTypeFunction %2
    0x0005_0036, 2, 1, 0, 3,              // %1 = OpFunction %2 None %3
    0x0002_00F8, 4,                       // %4 = OpLabel
    0x0001_00FD,                          // OpReturn
    0x0001_0038,                          // OpFunctionEnd
];

pub(crate) const FRAGMENT_MINIMAL: &[u32] = spirv![
    5;
    0x0002_0011, 1,
    0x0003_000E, 0, 1,
    0x0005_000F, 4, 1, MAIN[0], MAIN[1],  // OpEntryPoint Fragment %1 "main"
    0x0003_0010, 1, 7,                    // OpExecutionMode %1 OriginUpperLeft
    0x0002_0013, 2,
    0x0003_0021, 3, 2,
    0x0005_0036, 2, 1, 0, 3,
    0x0002_00F8, 4,
    0x0001_00FD,
    0x0001_0038,
];

pub(crate) const COMPUTE_MINIMAL: &[u32] = spirv![
    5;
    0x0002_0011, 1,
    0x0003_000E, 0, 1,
    0x0005_000F, 5, 1, MAIN[0], MAIN[1],  // OpEntryPoint GLCompute %1 "main"
    0x0006_0010, 1, 17, 1, 1, 1,          // OpExecutionMode %1 LocalSize 1 1 1
    0x0002_0013, 2,
    0x0003_0021, 3, 2,
    0x0005_0036, 2, 1, 0, 3,
    0x0002_00F8, 4,
    0x0001_00FD,
    0x0001_0038,
];

/// A task shader with a workgroup-shared `uint` array whose length is specialization constant
/// 0, which then launches one mesh workgroup.
pub(crate) const TASK_SHARED_MEMORY: &[u32] = &[
    0x0723_0203, 0x0001_0400, 0, 11, 0,
    0x0002_0011, 1,                       // OpCapability Shader
    0x0002_0011, 5283,                    // OpCapability MeshShadingEXT
    0x0006_000A,                          // OpExtension "SPV_EXT_mesh_shader"
    0x5F56_5053, 0x5F54_5845, 0x6873_656D, 0x6168_735F, 0x0072_6564,
    0x0003_000E, 0, 1,
    0x0006_000F, 5364, 1, MAIN[0], MAIN[1], 9, // OpEntryPoint TaskEXT %1 "main" %9
    0x0006_0010, 1, 17, 1, 1, 1,
    0x0004_0047, 6, 1, 0,                 // OpDecorate %6 SpecId 0
    0x0002_0013, 2,
    0x0003_0021, 3, 2,
    0x0004_0015, 5, 32, 0,                // %5 = OpTypeInt 32 0
    0x0004_0032, 5, 6, 1,                 // %6 = OpSpecConstant %5 1
    0x0004_001C, 7, 5, 6,                 // %7 = OpTypeArray %5 %6
    0x0004_0020, 8, 4, 7,                 // %8 = OpTypePointer Workgroup %7
    0x0004_003B, 8, 9, 4,                 // %9 = OpVariable %8 Workgroup
    0x0004_002B, 5, 10, 1,                // %10 = OpConstant %5 1
    0x0005_0036, 2, 1, 0, 3,
    0x0002_00F8, 4,
    0x0004_14AE, 10, 10, 10,              // OpEmitMeshTasksEXT %10 %10 %10
    0x0001_0038,
];

/// A `VkShaderCreateInfoEXT` for SPIR-V `code` with the `main` entry point.
pub(crate) fn spirv_create_info<'a>(
    stage: vk::ShaderStageFlags,
    next_stage: vk::ShaderStageFlags,
    code: &'a [u32],
) -> vk::ShaderCreateInfoEXT<'a> {
    vk::ShaderCreateInfoEXT {
        stage,
        next_stage,
        code_type: vk::ShaderCodeTypeEXT::SPIRV,
        code_size: mem::size_of_val(code),
        p_code: code.as_ptr().cast(),
        p_name: ENTRY_POINT.as_ptr(),
        ..Default::default()
    }
}

#[test]
fn headers_are_consistent() {
    for code in [
        VERTEX_MINIMAL,
        FRAGMENT_MINIMAL,
        COMPUTE_MINIMAL,
        TASK_SHARED_MEMORY,
    ] {
        assert_eq!(code[0], 0x0723_0203);

        // Every instruction's word count must land exactly on the end of the module.
        let mut offset = 5;

        while offset < code.len() {
            let word_count = (code[offset] >> 16) as usize;
            assert_ne!(word_count, 0);
            offset += word_count;
        }

        assert_eq!(offset, code.len());
    }
}
