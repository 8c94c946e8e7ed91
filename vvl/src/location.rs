use crate::{commands::Command, handle::ObjectRef, version::Version};
use ash::vk;
use smallvec::SmallVec;
use std::fmt;

/// Where in an API call a problem was found: the command plus a path into its parameters.
///
/// Displays as `vkCreateShadersEXT(): pCreateInfos[3].codeSize`.
#[derive(Clone, PartialEq, Eq)]
pub struct Location {
    pub command: Command,
    path: SmallVec<[PathElement; 4]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathElement {
    Field(&'static str),
    Index(usize),
}

impl Location {
    #[inline]
    pub fn new(command: Command) -> Self {
        Location {
            command,
            path: SmallVec::new(),
        }
    }

    /// Returns a new location that descends into the field `name`.
    #[inline]
    pub fn dot(&self, name: &'static str) -> Self {
        let mut location = self.clone();
        location.path.push(PathElement::Field(name));
        location
    }

    /// Returns a new location that indexes into the array at this location.
    #[inline]
    pub fn index(&self, index: usize) -> Self {
        let mut location = self.clone();
        location.path.push(PathElement::Index(index));
        location
    }

    /// Shorthand for `self.dot(name).index(index)`.
    #[inline]
    pub fn dot_index(&self, name: &'static str, index: usize) -> Self {
        self.dot(name).index(index)
    }

    /// Formats the location followed by a dotted path that isn't known statically, as
    /// carried by [`ValidationError::context`](crate::ValidationError).
    pub fn with_context(&self, context: &str) -> String {
        if context.is_empty() {
            self.to_string()
        } else if self.path.is_empty() {
            format!("{}{}", self, context)
        } else {
            format!("{}.{}", self, context)
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(): ", self.command.name())?;

        for (i, element) in self.path.iter().enumerate() {
            match element {
                PathElement::Field(name) if i == 0 => f.write_str(name)?,
                PathElement::Field(name) => write!(f, ".{}", name)?,
                PathElement::Index(index) => write!(f, "[{}]", index)?,
            }
        }

        Ok(())
    }
}

/// Call-site context handed to every validate hook.
#[derive(Clone, Debug)]
pub struct ErrorObject {
    pub location: Location,
    /// The dispatchable handle the command was called on.
    pub handle: ObjectRef,
    pub api_version: Version,
}

impl ErrorObject {
    #[inline]
    pub fn new(command: Command, handle: ObjectRef, api_version: Version) -> Self {
        ErrorObject {
            location: Location::new(command),
            handle,
            api_version,
        }
    }
}

/// Call-site context handed to every record hook.
///
/// `result` is `None` in the pre-call phase and for commands that don't return a `VkResult`.
#[derive(Clone, Debug)]
pub struct RecordObject {
    pub location: Location,
    pub result: Option<vk::Result>,
}

impl RecordObject {
    #[inline]
    pub fn new(command: Command) -> Self {
        RecordObject {
            location: Location::new(command),
            result: None,
        }
    }

    /// Whether the driver call completed with a success code.
    ///
    /// Commands without a `VkResult` always count as succeeded.
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.result.map_or(true, |result| result.as_raw() >= 0)
    }
}
