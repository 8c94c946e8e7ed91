//! A Vulkan validation layer.
//!
//! The layer sits between the application and the driver in the loader's call chain. Every
//! intercepted command is routed through a trampoline that runs three phases across an ordered
//! list of validators:
//!
//! 1. **pre-call validate**: each validator checks the call against the shadow state and reports
//!    problems through the shared [`DebugReport`]. If any validator returns `true` the call is
//!    not forwarded.
//! 2. **pre-call record**: validators update their state before the driver sees the call.
//! 3. **post-call record**: after the driver returns, validators see the real outputs and
//!    result code.
//!
//! The first validator of every list is the state tracker, which keeps a shadow model of all
//! live objects (see [`state`]). The other validators in [`validation`] only read it.
//!
//! The hook surface ([`InstanceValidator`], [`DeviceValidator`]), the dispatch tables and the
//! trampolines are expanded from the command table in `commands.rs`, which `autogen` generates
//! from the Vulkan registry.

pub use crate::{
    commands::{
        Command, DeviceDispatchTable, DeviceValidator, InstanceDispatchTable, InstanceValidator,
    },
    handle::{DispatchableHandle, ObjectRef},
    location::{ErrorObject, Location, RecordObject},
    report::DebugReport,
    settings::{Settings, SettingsError},
    version::Version,
};
pub use ash::vk;
use std::{borrow::Cow, error::Error, fmt};

#[macro_use]
mod macros;
mod commands;

pub mod chassis;
mod ffi;
mod handle;
pub mod layer;
mod location;
pub mod report;
pub mod settings;
pub mod state;
#[cfg(test)]
mod tests;
pub mod validation;
mod version;

/// A violated rule, found while validating one structure or parameter of a call.
///
/// Validators return these from helper functions and hand them to
/// [`DebugReport::validation_error`], which prefixes the call's [`Location`].
#[derive(Clone, Debug, Default)]
pub struct ValidationError {
    /// The path of the parameter or field that has the problem, relative to where the error is
    /// reported.
    pub context: Cow<'static, str>,

    /// A description of what the problem is.
    pub problem: Cow<'static, str>,

    /// Valid usage IDs (VUIDs) in the Vulkan specification that relate to the problem.
    pub vuids: &'static [&'static str],
}

impl ValidationError {
    /// Prepends `context` to the existing path.
    pub fn add_context(mut self: Box<Self>, context: impl Into<Cow<'static, str>>) -> Box<Self> {
        let context = context.into();

        if self.context.is_empty() {
            self.context = context;
        } else if self.context.starts_with('[') {
            self.context = format!("{}{}", context, self.context).into();
        } else {
            self.context = format!("{}.{}", context, self.context).into();
        }

        self
    }

    pub fn set_vuids(mut self: Box<Self>, vuids: &'static [&'static str]) -> Box<Self> {
        self.vuids = vuids;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.problem)?;
        } else {
            write!(f, "{} {}", self.context, self.problem)?;
        }

        if !self.vuids.is_empty() {
            write!(f, "\n\nVulkan VUIDs:")?;

            for vuid in self.vuids {
                write!(f, "\n    {}", vuid)?;
            }
        }

        Ok(())
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod validation_error_tests {
    use super::ValidationError;

    #[test]
    fn context_paths() {
        let error = Box::new(ValidationError {
            context: "codeSize".into(),
            problem: "is not a multiple of 4".into(),
            vuids: &["VUID-VkShaderCreateInfoEXT-codeSize-08735"],
        })
        .add_context("[3]")
        .add_context("pCreateInfos");

        assert_eq!(error.context, "pCreateInfos[3].codeSize");
        assert!(error
            .to_string()
            .starts_with("pCreateInfos[3].codeSize is not a multiple of 4"));
    }

    #[test]
    fn replace_vuids() {
        let error = Box::new(ValidationError {
            problem: "is not a valid handle".into(),
            ..Default::default()
        })
        .set_vuids(&["VUID-vkDestroyBuffer-buffer-parameter"]);

        assert_eq!(error.vuids, ["VUID-vkDestroyBuffer-buffer-parameter"]);
        assert_eq!(error.context, "");
    }
}
