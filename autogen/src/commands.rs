use super::{is_vulkan_api, types::TypeMapper, VkRegistryData, MANUAL};
use heck::ToSnakeCase;
use std::io::Write;
use vk_parse::CommandDefinition;

/// Which dispatch table a command goes through, decided by its first parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Instance,
    Device,
}

#[derive(Clone, Debug)]
struct VvlCommand {
    variant: String,
    vk_name: String,
    field: String,
    manual: bool,
    params: Vec<(String, String)>,
    ret: Option<String>,
}

pub fn write<W: Write>(writer: &mut W, vk_data: &VkRegistryData<'_>, selected: &[&str]) {
    let mapper = TypeMapper::new(&vk_data.types);
    let mut instance = Vec::new();
    let mut device = Vec::new();

    for &name in selected {
        let definition = vk_data.commands[name];

        match level(definition) {
            Some(Level::Instance) => instance.push(make_command(&mapper, definition)),
            Some(Level::Device) => device.push(make_command(&mapper, definition)),
            // Global commands are answered by the layer's own entry points.
            None => continue,
        }
    }

    write!(
        writer,
        "// This file is generated by `autogen` from vk.xml header version {}. Do not edit by \
        hand.\n\n\
        #[allow(unused_imports)]\n\
        use ash::vk;\n\
        #[allow(unused_imports)]\n\
        use std::ffi::{{c_char, c_void}};\n\n\
        vulkan_commands! {{",
        vk_data.header_version,
    )
    .unwrap();

    write_level(writer, "instance", &instance);
    write_level(writer, "device", &device);

    writeln!(writer, "}}").unwrap();
}

fn write_level<W: Write>(writer: &mut W, level: &str, commands: &[VvlCommand]) {
    write!(writer, "\n    {} {{", level).unwrap();

    for command in commands {
        if command.manual {
            write!(writer, "\n        #[manual]").unwrap();
        }

        write!(
            writer,
            "\n        {} = \"{}\" => {} {{",
            command.variant, command.vk_name, command.field,
        )
        .unwrap();

        for hook in ["pre_call_validate", "pre_call_record", "post_call_record"] {
            write!(writer, "\n            {}_{},", hook, command.field).unwrap();
        }

        write!(writer, "\n        }} (").unwrap();

        for (name, ty) in &command.params {
            write!(writer, "\n            {}: {},", name, ty).unwrap();
        }

        write!(writer, "\n        )").unwrap();

        if let Some(ret) = &command.ret {
            write!(writer, " -> {}", ret).unwrap();
        }

        write!(writer, ";").unwrap();
    }

    write!(writer, "\n    }}\n").unwrap();
}

fn level(definition: &CommandDefinition) -> Option<Level> {
    let first = definition.params.first()?;

    match first.definition.type_name.as_deref()? {
        "VkInstance" | "VkPhysicalDevice" => Some(Level::Instance),
        "VkDevice" | "VkQueue" | "VkCommandBuffer" => Some(Level::Device),
        _ => None,
    }
}

fn make_command(mapper: &TypeMapper, definition: &CommandDefinition) -> VvlCommand {
    let vk_name = definition.proto.name.clone();
    let variant = vk_name.strip_prefix("vk").unwrap().to_owned();
    let field = variant.to_snake_case();

    let params = definition
        .params
        .iter()
        .filter(|param| is_vulkan_api(param.api.as_deref()))
        .map(|param| {
            let (name, ty) = mapper.declaration(&param.definition.code);
            (name.to_snake_case(), ty)
        })
        .collect();

    let ret = definition
        .proto
        .type_name
        .as_deref()
        .and_then(|type_name| mapper.return_type(type_name));

    VvlCommand {
        manual: MANUAL.contains(&vk_name.as_str()),
        variant,
        vk_name,
        field,
        params,
        ret,
    }
}
