/// Expands the command table in `commands.rs` into everything the layer needs per command:
///
/// - the `Command` id enum,
/// - the `InstanceValidator` / `DeviceValidator` hook traits, with a
///   `pre_call_validate_*` / `pre_call_record_*` / `post_call_record_*` triple per command,
/// - the `InstanceDispatchTable` / `DeviceDispatchTable` structs holding the next link's
///   function pointers,
/// - one `extern "system"` trampoline per command that fans the call out to the validators,
/// - the name lookups used by `vkGetInstanceProcAddr` and `vkGetDeviceProcAddr`.
///
/// Commands marked `#[manual]` get hooks and a table entry, but their trampolines are written by
/// hand in the chassis.
macro_rules! vulkan_commands {
    {
        instance { $($instance:tt)* }
        device { $($device:tt)* }
    } => {
        vulkan_commands!(@command_ids $($instance)* $($device)*);

        vulkan_commands! {
            @surface
            #[doc = "Hooks around every intercepted instance-level command."]
            #[doc = ""]
            #[doc = "The first parameter of each hook is the `VkInstance` or `VkPhysicalDevice` the"]
            #[doc = "command was called on."]
            InstanceValidator, InstanceDispatchTable,
            $crate::chassis::InstanceDispatch, instance_trampolines, instance_proc;
            $($instance)*
        }

        vulkan_commands! {
            @surface
            #[doc = "Hooks around every intercepted device-level command."]
            #[doc = ""]
            #[doc = "The first parameter of each hook is the `VkDevice`, `VkQueue` or"]
            #[doc = "`VkCommandBuffer` the command was called on."]
            DeviceValidator, DeviceDispatchTable,
            $crate::chassis::DeviceDispatch, device_trampolines, device_proc;
            $($device)*
        }
    };

    (
        @command_ids
        $(
            $(#[$attr:ident])?
            $variant:ident = $vk_name:literal => $field:ident { $($hooks:ident),+ $(,)? }
            ($($params:tt)*) $(-> $ret:ty)?;
        )*
    ) => {
        /// Identifies an intercepted Vulkan command.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Command {
            $($variant,)*
        }

        impl Command {
            /// Returns the Vulkan name of the command, such as `vkCreateBuffer`.
            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Command::$variant => $vk_name,)*
                }
            }
        }

        impl ::std::fmt::Display for Command {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };

    (
        @surface
        $(#[$trait_meta:meta])*
        $trait:ident, $table:ident, $dispatch:ty, $trampolines:ident, $proc_fn:ident;
        $(
            $(#[$attr:ident])?
            $variant:ident = $vk_name:literal => $field:ident {
                $validate:ident, $pre_record:ident, $post_record:ident $(,)?
            }
            ($first:ident: $first_ty:ty $(, $param:ident: $param_ty:ty)* $(,)?) $(-> $ret:ty)?;
        )*
    ) => {
        $(#[$trait_meta])*
        ///
        /// Every hook has a default implementation: validate hooks return `false` and record
        /// hooks do nothing, so implementors override only what they check or track.
        ///
        /// # Safety
        ///
        /// Hooks receive the application's parameters unchanged. Pointers are only as valid as
        /// the application made them.
        #[allow(clippy::too_many_arguments)]
        pub trait $trait: Send + Sync {
            $(
                #[allow(unused_variables)]
                unsafe fn $validate(
                    &self,
                    $first: $first_ty,
                    $($param: $param_ty,)*
                    error_obj: &$crate::ErrorObject,
                ) -> bool {
                    false
                }

                #[allow(unused_variables)]
                unsafe fn $pre_record(
                    &self,
                    $first: $first_ty,
                    $($param: $param_ty,)*
                    record_obj: &$crate::RecordObject,
                ) {
                }

                #[allow(unused_variables)]
                unsafe fn $post_record(
                    &self,
                    $first: $first_ty,
                    $($param: $param_ty,)*
                    record_obj: &$crate::RecordObject,
                ) {
                }
            )*
        }

        /// Function pointers of the next link in the chain.
        ///
        /// An entry is `None` when the next link doesn't provide the command.
        #[derive(Clone, Copy, Default)]
        pub struct $table {
            $(
                pub $field: Option<
                    unsafe extern "system" fn($first_ty $(, $param_ty)*) $(-> $ret)?
                >,
            )*
        }

        impl $table {
            /// Loads every entry through `load_fn`, which is typically the next link's
            /// `vkGetInstanceProcAddr` or `vkGetDeviceProcAddr`.
            pub fn load(
                mut load_fn: impl FnMut(&::std::ffi::CStr) -> ::ash::vk::PFN_vkVoidFunction,
            ) -> Self {
                $table {
                    $(
                        $field: load_fn(unsafe {
                            ::std::ffi::CStr::from_bytes_with_nul_unchecked(
                                concat!($vk_name, "\0").as_bytes(),
                            )
                        })
                        .map(|f| unsafe {
                            ::std::mem::transmute::<
                                unsafe extern "system" fn(),
                                unsafe extern "system" fn($first_ty $(, $param_ty)*) $(-> $ret)?,
                            >(f)
                        }),
                    )*
                }
            }
        }

        impl ::std::fmt::Debug for $table {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($table)).finish_non_exhaustive()
            }
        }

        pub(crate) mod $trampolines {
            #[allow(unused_imports)]
            use super::*;

            $(
                vulkan_commands! {
                    @trampoline [$($attr)?]
                    $trait, $dispatch, $variant, $field, $validate, $pre_record, $post_record;
                    ($first: $first_ty $(, $param: $param_ty)*) $(-> $ret)?
                }
            )*
        }

        /// Returns the layer's trampoline for the command `name`, if it is intercepted and not
        /// handled manually by the chassis.
        pub(crate) fn $proc_fn(name: &::std::ffi::CStr) -> ::ash::vk::PFN_vkVoidFunction {
            let name = name.to_bytes();

            $(
                vulkan_commands! {
                    @proc [$($attr)?]
                    name, $vk_name, $trampolines::$field,
                    ($first_ty $(, $param_ty)*) $(-> $ret)?
                }
            )*

            None
        }
    };

    (
        @trampoline [manual]
        $($rest:tt)*
    ) => {};

    (
        @trampoline []
        $trait:ident, $dispatch:ty, $variant:ident, $field:ident,
        $validate:ident, $pre_record:ident, $post_record:ident;
        ($first:ident: $first_ty:ty $(, $param:ident: $param_ty:ty)*) $(-> $ret:ty)?
    ) => {
        #[allow(clippy::let_unit_value, clippy::unit_arg)]
        pub(crate) unsafe extern "system" fn $field(
            $first: $first_ty,
            $($param: $param_ty,)*
        ) $(-> $ret)? {
            use $crate::chassis::CommandReturn;

            let dispatch = unsafe { <$dispatch>::get($first) };
            let error_obj = $crate::ErrorObject::new(
                Command::$variant,
                $first.into(),
                dispatch.api_version,
            );

            let mut skip = false;

            for validator in dispatch.validators.iter() {
                skip |= unsafe { validator.$validate($first, $($param,)* &error_obj) };
            }

            if skip {
                ::log::trace!("{} skipped by validation", Command::$variant);
                return CommandReturn::skipped();
            }

            let Some(next) = dispatch.table.$field else {
                return CommandReturn::missing(Command::$variant);
            };

            let mut record_obj = $crate::RecordObject::new(Command::$variant);

            for validator in dispatch.validators.iter() {
                unsafe { validator.$pre_record($first, $($param,)* &record_obj) };
            }

            let ret = unsafe { next($first, $($param,)*) };
            record_obj.result = ret.record_result();

            for validator in dispatch.validators.iter() {
                unsafe { validator.$post_record($first, $($param,)* &record_obj) };
            }

            ret
        }
    };

    (
        @proc [manual]
        $($rest:tt)*
    ) => {};

    (
        @proc []
        $name:ident, $vk_name:literal, $path:path,
        ($($param_ty:ty),*) $(-> $ret:ty)?
    ) => {
        if $name == $vk_name.as_bytes() {
            let f: unsafe extern "system" fn($($param_ty),*) $(-> $ret)? = $path;

            return Some(unsafe {
                ::std::mem::transmute::<
                    unsafe extern "system" fn($($param_ty),*) $(-> $ret)?,
                    unsafe extern "system" fn(),
                >(f)
            });
        }
    };
}
