//! Platform configuration.

use prism_core::types::{make_version, cl_version, IcdDispatch};

/// Static description of a platform
///
/// Everything the frontend reports about a platform that is not owned by
/// the backend.
#[derive(Debug, Clone, Copy)]
pub struct PlatformConfig {
    /// `CL_PLATFORM_NAME`
    pub name: &'static str,
    /// `CL_PLATFORM_VENDOR`
    pub vendor: &'static str,
    /// `CL_PLATFORM_PROFILE`
    pub profile: &'static str,
    /// Supported OpenCL major version
    pub version_major: u32,
    /// Supported OpenCL minor version
    pub version_minor: u32,
    /// `CL_PLATFORM_EXTENSIONS` (space separated)
    pub extensions: &'static str,
    /// `CL_PLATFORM_ICD_SUFFIX_KHR`
    pub icd_suffix: &'static str,
    /// Dispatch table stamped into every object of the platform
    pub dispatch: IcdDispatch,
}

impl PlatformConfig {
    /// Packed `CL_PLATFORM_NUMERIC_VERSION`
    pub const fn numeric_version(&self) -> cl_version {
        make_version(self.version_major, self.version_minor, 0)
    }

    /// `true` if the platform implements at least `major.minor`
    pub const fn is_version_or_newer(&self, major: u32, minor: u32) -> bool {
        self.version_major > major || (self.version_major == major && self.version_minor >= minor)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "PRISM",
            vendor: "Helix OS",
            profile: "FULL_PROFILE",
            version_major: 3,
            version_minor: 0,
            extensions: "cl_khr_icd",
            icd_suffix: "PRISM",
            dispatch: IcdDispatch::NONE,
        }
    }
}
