use std::{cmp::Ordering, fmt};

/// Represents an API version of Vulkan.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// Patch version number.
    pub patch: u32,
}

impl Version {
    pub const V1_0: Version = Version::major_minor(1, 0);
    pub const V1_1: Version = Version::major_minor(1, 1);
    pub const V1_2: Version = Version::major_minor(1, 2);
    pub const V1_3: Version = Version::major_minor(1, 3);

    /// Constructs a `Version` from the given major and minor version numbers.
    #[inline]
    pub const fn major_minor(major: u32, minor: u32) -> Version {
        Version {
            major,
            minor,
            patch: 0,
        }
    }

    /// Turns a version number given by Vulkan into a `Version`.
    ///
    /// The variant bits are ignored. A value of `0` means the application didn't ask for a
    /// version, which Vulkan treats as 1.0.
    #[inline]
    pub const fn from_vulkan_version(value: u32) -> Version {
        if value == 0 {
            return Version::V1_0;
        }

        Version {
            major: (value >> 22) & 0x7f,
            minor: (value >> 12) & 0x3ff,
            patch: value & 0xfff,
        }
    }

    /// Turns a `Version` into a version number accepted by Vulkan.
    #[inline]
    pub const fn to_vulkan_version(self) -> u32 {
        (self.major << 22) | (self.minor << 12) | self.patch
    }
}

impl Default for Version {
    #[inline]
    fn default() -> Self {
        Version::V1_0
    }
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Version;
    use ash::vk;

    #[test]
    fn to_vk_version() {
        assert_eq!(Version::V1_0.to_vulkan_version(), vk::API_VERSION_1_0);
        assert_eq!(Version::V1_3.to_vulkan_version(), vk::API_VERSION_1_3);
    }

    #[test]
    fn from_vk_version() {
        assert_eq!(
            Version::from_vulkan_version(vk::make_api_version(0, 1, 2, 198)),
            Version {
                major: 1,
                minor: 2,
                patch: 198,
            },
        );
        assert_eq!(Version::from_vulkan_version(0), Version::V1_0);
    }

    #[test]
    fn ordering() {
        assert!(Version::V1_3 > Version::V1_1);
        assert!(
            Version {
                major: 1,
                minor: 0,
                patch: 5,
            } > Version::V1_0
        );
        assert_eq!(Version::V1_2.min(Version::V1_1), Version::V1_1);
    }
}
