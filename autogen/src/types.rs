use super::is_vulkan_api;
use indexmap::IndexMap;
use regex::Regex;
use std::{collections::HashSet, sync::LazyLock};
use vk_parse::{Type, TypeMember, TypeSpec};

/// `[const] type [* [const]]... name [N]`, as written in a `<param>` or `<member>`.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:const\s+)?(?:struct\s+)?(?P<base>\w+)(?P<pointers>(?:\s*\*\s*(?:const\b)?)*)\s*(?P<name>\w+)\s*(?:\[(?P<len>\w+)\])?$",
    )
    .unwrap()
});

/// Maps Vulkan declarations to the Rust types ash uses for them.
pub struct TypeMapper {
    /// Structs and unions that hold pointers, directly or through a member, and so carry a
    /// lifetime parameter in ash.
    with_lifetime: HashSet<String>,
}

impl TypeMapper {
    pub fn new(types: &IndexMap<&str, &Type>) -> Self {
        let mut with_lifetime = HashSet::new();

        // Iterate to a fixed point, since a struct can embed another one by value that is
        // declared later.
        loop {
            let mut changed = false;

            for (&name, ty) in types {
                if with_lifetime.contains(name) {
                    continue;
                }

                let TypeSpec::Members(members) = &ty.spec else {
                    continue;
                };

                let holds_pointer = members.iter().any(|member| match member {
                    TypeMember::Definition(def) if is_vulkan_api(def.api.as_deref()) => {
                        let code = def.code.split("//").next().unwrap_or_default();

                        code.contains('*')
                            || DECLARATION
                                .captures(code.trim())
                                .is_some_and(|captures| with_lifetime.contains(&captures["base"]))
                    }
                    _ => false,
                });

                if holds_pointer {
                    with_lifetime.insert(name.to_owned());
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        // Aliases such as `VkRenderingInfoKHR` share their target's definition.
        for (&name, ty) in types {
            if let Some(alias) = &ty.alias {
                if with_lifetime.contains(alias.as_str()) {
                    with_lifetime.insert(name.to_owned());
                }
            }
        }

        TypeMapper { with_lifetime }
    }

    /// Splits a C declaration such as `const VkBufferCopy* pRegions` into the parameter name and
    /// its Rust type.
    pub fn declaration(&self, code: &str) -> (String, String) {
        let code = code.split_whitespace().collect::<Vec<_>>().join(" ");
        let captures = DECLARATION
            .captures(&code)
            .unwrap_or_else(|| panic!("unrecognized declaration `{}`", code));

        let mut ty = self.base_type(&captures["base"]);
        let mut pointee_const = code.starts_with("const ");

        if let Some(len) = captures.name("len") {
            // Fixed-size array parameters decay to a pointer to the array.
            let len = match len.as_str().parse::<usize>() {
                Ok(len) => len.to_string(),
                Err(_) => format!("vk::{}", len.as_str().trim_start_matches("VK_")),
            };
            ty = format!("*{} [{}; {}]", mutability(pointee_const), ty, len);
        }

        for pointer in captures["pointers"].split('*').skip(1) {
            ty = format!("*{} {}", mutability(pointee_const), ty);
            pointee_const = pointer.trim() == "const";
        }

        (captures["name"].to_owned(), ty)
    }

    /// The Rust type of a return value, or `None` for `void`.
    pub fn return_type(&self, type_name: &str) -> Option<String> {
        (type_name != "void").then(|| self.base_type(type_name))
    }

    fn base_type(&self, name: &str) -> String {
        let primitive = match name {
            "void" => "c_void",
            "char" => "c_char",
            "float" => "f32",
            "double" => "f64",
            "int" | "int32_t" => "i32",
            "uint8_t" => "u8",
            "uint16_t" => "u16",
            "uint32_t" => "u32",
            "int64_t" => "i64",
            "uint64_t" => "u64",
            "size_t" => "usize",
            _ => "",
        };

        if !primitive.is_empty() {
            return primitive.to_owned();
        }

        if let Some(stripped) = name.strip_prefix("Vk") {
            if self.with_lifetime.contains(name) {
                format!("vk::{}<'_>", stripped)
            } else {
                format!("vk::{}", stripped)
            }
        } else {
            // Function pointer and platform types keep their registry names in ash.
            format!("vk::{}", name)
        }
    }
}

fn mutability(is_const: bool) -> &'static str {
    if is_const {
        "const"
    } else {
        "mut"
    }
}
