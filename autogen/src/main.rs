//! Regenerates `vvl/src/commands.rs` from the Vulkan registry.
//!
//! ```text
//! cargo run --bin autogen -- [--all] [path/to/vk.xml]
//! ```
//!
//! Without `--all`, only the commands in [`INTERCEPTED`] are emitted. With it, every command of
//! the registry that is dispatched through an instance or device is.

use indexmap::IndexMap;
use regex::Regex;
use std::{
    env,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process,
};
use vk_parse::{
    Command, CommandDefinition, Registry, RegistryChild, Type, TypeSpec, TypesChild,
};

mod commands;
mod types;

/// The commands the layer intercepts, in table order.
const INTERCEPTED: &[&str] = &[
    // Instance level
    "vkDestroyInstance",
    "vkEnumeratePhysicalDevices",
    "vkGetPhysicalDeviceProperties",
    "vkGetPhysicalDeviceFeatures",
    "vkGetPhysicalDeviceQueueFamilyProperties",
    "vkGetPhysicalDeviceMemoryProperties",
    "vkCreateDevice",
    "vkCreateDebugUtilsMessengerEXT",
    "vkDestroyDebugUtilsMessengerEXT",
    // Device level
    "vkDestroyDevice",
    "vkGetDeviceQueue",
    "vkDeviceWaitIdle",
    "vkQueueSubmit",
    "vkQueueWaitIdle",
    "vkAllocateMemory",
    "vkFreeMemory",
    "vkMapMemory",
    "vkUnmapMemory",
    "vkCreateBuffer",
    "vkDestroyBuffer",
    "vkBindBufferMemory",
    "vkGetBufferMemoryRequirements",
    "vkCreateImage",
    "vkDestroyImage",
    "vkBindImageMemory",
    "vkGetImageMemoryRequirements",
    "vkCreateImageView",
    "vkDestroyImageView",
    "vkCreateFence",
    "vkDestroyFence",
    "vkResetFences",
    "vkGetFenceStatus",
    "vkWaitForFences",
    "vkCreateSemaphore",
    "vkDestroySemaphore",
    "vkCreateShaderModule",
    "vkDestroyShaderModule",
    "vkCreatePipelineLayout",
    "vkDestroyPipelineLayout",
    "vkCreateGraphicsPipelines",
    "vkCreateComputePipelines",
    "vkDestroyPipeline",
    "vkCreateDescriptorSetLayout",
    "vkDestroyDescriptorSetLayout",
    "vkCreateDescriptorPool",
    "vkDestroyDescriptorPool",
    "vkResetDescriptorPool",
    "vkAllocateDescriptorSets",
    "vkFreeDescriptorSets",
    "vkCreateRenderPass",
    "vkDestroyRenderPass",
    "vkCreateFramebuffer",
    "vkDestroyFramebuffer",
    "vkCreateCommandPool",
    "vkDestroyCommandPool",
    "vkResetCommandPool",
    "vkAllocateCommandBuffers",
    "vkFreeCommandBuffers",
    "vkBeginCommandBuffer",
    "vkEndCommandBuffer",
    "vkResetCommandBuffer",
    "vkCmdBindPipeline",
    "vkCmdBindDescriptorSets",
    "vkCmdBindVertexBuffers",
    "vkCmdBindIndexBuffer",
    "vkCmdSetViewport",
    "vkCmdSetScissor",
    "vkCmdDraw",
    "vkCmdDrawIndexed",
    "vkCmdDispatch",
    "vkCmdCopyBuffer",
    "vkCmdFillBuffer",
    "vkCmdPipelineBarrier",
    "vkCmdBeginRenderPass",
    "vkCmdNextSubpass",
    "vkCmdEndRenderPass",
    "vkCmdBeginRendering",
    "vkCmdEndRendering",
    "vkCmdExecuteCommands",
    "vkCreateShadersEXT",
    "vkDestroyShaderEXT",
    "vkCmdBindShadersEXT",
];

/// Commands whose trampolines are written by hand in the chassis.
const MANUAL: &[&str] = &["vkDestroyInstance", "vkCreateDevice", "vkDestroyDevice"];

const OUTPUT_PATH: &str = "vvl/src/commands.rs";

fn main() {
    let mut all = false;
    let mut registry_path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--all" => all = true,
            "-h" | "--help" => {
                println!("usage: autogen [--all] [path/to/vk.xml]");
                return;
            }
            _ if arg.starts_with('-') => {
                eprintln!("unknown option `{}`", arg);
                process::exit(2);
            }
            _ => registry_path = Some(PathBuf::from(arg)),
        }
    }

    let root = workspace_root();
    let registry_path = registry_path.unwrap_or_else(|| root.join("vk.xml"));
    let registry = get_vk_registry(&registry_path);
    let vk_data = VkRegistryData::new(&registry);

    let selected: Vec<&str> = if all {
        vk_data.commands.keys().copied().collect()
    } else {
        for &name in INTERCEPTED {
            if !vk_data.commands.contains_key(name) {
                eprintln!("`{}` is not in {}", name, registry_path.display());
                process::exit(1);
            }
        }

        INTERCEPTED.to_vec()
    };

    let output_path = root.join(OUTPUT_PATH);
    let mut writer = BufWriter::new(File::create(&output_path).unwrap());
    commands::write(&mut writer, &vk_data, &selected);
    writer.flush().unwrap();

    println!(
        "wrote {} commands to {}",
        selected.len(),
        output_path.display(),
    );
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_owned()
}

fn get_vk_registry(path: &Path) -> Registry {
    let (registry, errors) = vk_parse::parse_file(path).unwrap();

    if !errors.is_empty() {
        eprintln!("The following errors were found while parsing the file:");

        for error in errors {
            eprintln!("{:?}", error);
        }

        process::exit(1);
    }

    registry
}

/// The parts of the registry the generator works from.
pub struct VkRegistryData<'r> {
    pub header_version: u32,
    pub commands: IndexMap<&'r str, &'r CommandDefinition>,
    pub types: IndexMap<&'r str, &'r Type>,
}

impl<'r> VkRegistryData<'r> {
    fn new(registry: &'r Registry) -> Self {
        let types = Self::get_types(registry);
        let header_version = Self::get_header_version(&types);
        let commands = Self::get_commands(registry);

        VkRegistryData {
            header_version,
            commands,
            types,
        }
    }

    fn get_header_version(types: &IndexMap<&str, &Type>) -> u32 {
        let regex = Regex::new(r"#define\s+VK_HEADER_VERSION\s+(\d+)").unwrap();

        types
            .get("VK_HEADER_VERSION")
            .and_then(|ty| match &ty.spec {
                TypeSpec::Code(code) => regex.captures(&code.code),
                _ => None,
            })
            .and_then(|captures| captures[1].parse().ok())
            .unwrap()
    }

    fn get_types(registry: &Registry) -> IndexMap<&str, &Type> {
        registry
            .0
            .iter()
            .filter_map(|child| match child {
                RegistryChild::Types(types) => Some(types.children.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(|child| match child {
                TypesChild::Type(ty) if is_vulkan_api(ty.api.as_deref()) => {
                    let name = ty.name.as_deref().or_else(|| type_code_name(ty))?;
                    Some((name, ty))
                }
                _ => None,
            })
            .collect()
    }

    fn get_commands(registry: &Registry) -> IndexMap<&str, &CommandDefinition> {
        let mut commands = IndexMap::new();

        for child in &registry.0 {
            if let RegistryChild::Commands(registry_commands) = child {
                for command in &registry_commands.children {
                    // Aliases share their target's function pointer type, so only definitions
                    // get their own table entry.
                    if let Command::Definition(definition) = command {
                        commands
                            .entry(definition.proto.name.as_str())
                            .or_insert(definition);
                    }
                }
            }
        }

        commands
    }
}

/// Some types only carry their name inside the markup of their code.
fn type_code_name(ty: &Type) -> Option<&str> {
    match &ty.spec {
        TypeSpec::Code(code) => code.markup.iter().find_map(|markup| match markup {
            vk_parse::TypeCodeMarkup::Name(name) => Some(name.as_str()),
            _ => None,
        }),
        _ => None,
    }
}

/// Whether an `api` attribute includes plain Vulkan, as opposed to only Vulkan SC.
pub fn is_vulkan_api(api: Option<&str>) -> bool {
    api.map_or(true, |api| api.split(',').any(|api| api == "vulkan"))
}
