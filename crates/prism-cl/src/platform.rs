//! # Platforms
//!
//! The process-wide platform registry and handle validation.
//!
//! ## Registry
//!
//! ```text
//! PLATFORMS: RwLock<Vec<Arc<Platform>>>
//!     │
//!     ├── Platform ── devices ── contexts ── { queues, memories, samplers, programs }
//!     └── Platform ── ...
//! ```
//!
//! The registry starts empty, is filled by [`Platform::register`] and is
//! never torn down. A handle is only an address, so every entry point
//! resolves it by scanning this tree for an object at that address. A
//! stale or forged handle is simply not found.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ffi::c_void;
use core::fmt;

use spin::RwLock;

use prism_core::types::*;
use prism_core::{cl_enum, Error, GetInfo, InfoValue, PropertyList, Result};

use crate::backend::PlatformImpl;
use crate::config::PlatformConfig;
use crate::context::{Context, ContextErrorCallback};
use crate::device::Device;
use crate::object_list::ObjectList;

// =============================================================================
// REGISTRY
// =============================================================================

/// Every registered platform
static PLATFORMS: RwLock<Vec<Arc<Platform>>> = RwLock::new(Vec::new());

/// Run `f` over the registered platforms until it returns `Some`
pub(crate) fn scan<R>(mut f: impl FnMut(&Arc<Platform>) -> Option<R>) -> Option<R> {
    PLATFORMS.read().iter().find_map(|platform| f(platform))
}

// =============================================================================
// PLATFORM
// =============================================================================

/// An OpenCL platform
#[repr(C)]
pub struct Platform {
    dispatch: IcdDispatch,
    config: PlatformConfig,
    /// `CL_PLATFORM_VERSION`
    version: String,
    imp: Box<dyn PlatformImpl>,
    devices: Vec<Arc<Device>>,
    contexts: ObjectList<Context>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Platform, dispatch), 0);
static_assertions::assert_impl_all!(Platform: Send, Sync);

impl Platform {
    /// Enumerate the backend's devices and add a platform to the registry
    pub fn register(imp: Box<dyn PlatformImpl>, config: PlatformConfig) -> Result<Arc<Self>> {
        let infos = imp.create_devices()?;

        let platform = Arc::new_cyclic(|weak| {
            let devices = infos
                .into_iter()
                .map(|info| Arc::new(Device::new(weak.clone(), config.dispatch, info)))
                .collect();

            Self {
                dispatch: config.dispatch,
                version: format!(
                    "OpenCL {}.{} {}",
                    config.version_major, config.version_minor, config.name
                ),
                config,
                imp,
                devices,
                contexts: ObjectList::new(),
            }
        });

        log::debug!(
            "Registered platform {} ({} devices)",
            platform.config.name,
            platform.devices.len()
        );

        PLATFORMS.write().push(Arc::clone(&platform));
        Ok(platform)
    }

    /// Snapshot of the registered platforms
    pub fn platforms() -> Vec<Arc<Self>> {
        PLATFORMS.read().clone()
    }

    /// The platform used when the application names none
    pub fn default_platform() -> Option<Arc<Self>> {
        PLATFORMS.read().first().cloned()
    }

    /// The live platform behind `handle`, if any
    pub fn lookup(handle: cl_platform_id) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        scan(|p| (Arc::as_ptr(p) == ptr).then(|| Arc::clone(p)))
    }

    /// `true` if `handle` names a registered platform
    pub fn is_valid(handle: cl_platform_id) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_platform_id {
        self as *const Self as cl_platform_id
    }

    /// Static configuration
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// `true` if the platform implements at least `major.minor`
    pub fn is_version_or_newer(&self, major: u32, minor: u32) -> bool {
        self.config.is_version_or_newer(major, minor)
    }

    pub(crate) fn backend(&self) -> &dyn PlatformImpl {
        self.imp.as_ref()
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Root devices
    pub fn devices(&self) -> &[Arc<Device>] {
        &self.devices
    }

    /// Devices matching a `CL_DEVICE_TYPE_*` selection
    ///
    /// `DEFAULT` matches devices flagged as default, or the first device if
    /// none is.
    pub fn devices_of_type(&self, device_type: DeviceType) -> Vec<Arc<Device>> {
        let mut matched: Vec<_> = self
            .devices
            .iter()
            .filter(|d| d.info().device_type.intersects(device_type))
            .cloned()
            .collect();

        if matched.is_empty() && device_type.contains(DeviceType::DEFAULT) {
            matched.extend(self.devices.first().cloned());
        }
        matched
    }

    /// `true` if the device at `device` belongs to this platform
    pub fn has_device(&self, device: *const Device) -> bool {
        self.devices.iter().any(|d| Arc::as_ptr(d) == device)
    }

    pub(crate) fn find_device(&self, device: *const Device) -> Option<Arc<Device>> {
        self.devices.iter().find(|d| Arc::as_ptr(d) == device).cloned()
    }

    // =========================================================================
    // Contexts
    // =========================================================================

    /// Create a context over `devices`
    pub fn create_context(
        self: &Arc<Self>,
        properties: PropertyList<cl_context_properties>,
        devices: &[Arc<Device>],
        notify: Option<ContextErrorCallback>,
        user_data: *mut c_void,
    ) -> Result<Arc<Context>> {
        let context = Context::new(self, properties, devices, notify, user_data)?;
        log::debug!(
            "Platform {}: created context {:p} ({} devices)",
            self.config.name,
            Arc::as_ptr(&context),
            context.devices().len()
        );
        self.contexts.insert(Arc::clone(&context));
        Ok(context)
    }

    /// Create a context over every device matching `device_type`
    pub fn create_context_from_type(
        self: &Arc<Self>,
        properties: PropertyList<cl_context_properties>,
        device_type: DeviceType,
        notify: Option<ContextErrorCallback>,
        user_data: *mut c_void,
    ) -> Result<Arc<Context>> {
        let devices = self.devices_of_type(device_type);
        if devices.is_empty() {
            return Err(Error::DeviceNotFound);
        }
        self.create_context(properties, &devices, notify, user_data)
    }

    /// Snapshot of the live contexts
    pub fn contexts(&self) -> Vec<Arc<Context>> {
        self.contexts.snapshot()
    }

    /// `true` if the context at `context` belongs to this platform
    pub fn has_context(&self, context: *const Context) -> bool {
        self.contexts.contains(context)
    }

    pub(crate) fn find_context(&self, context: *const Context) -> Option<Arc<Context>> {
        self.contexts.find(context)
    }

    /// Run `f` over the live contexts until it returns `Some`
    pub(crate) fn scan_contexts<R>(&self, f: impl FnMut(&Arc<Context>) -> Option<R>) -> Option<R> {
        self.contexts.find_map(f)
    }

    /// Erase a context whose reference count reached zero
    pub(crate) fn destroy_context(&self, context: &Context) {
        let removed = self.contexts.take(context);
        if removed.is_none() {
            log::warn!("Platform {}: context {:p} not found", self.config.name, context);
        }
        // Dropped here, outside the list lock
        drop(removed);
    }
}

// =============================================================================
// INFO
// =============================================================================

cl_enum! {
    /// `clGetPlatformInfo` parameters
    pub enum PlatformParam {
        /// `CL_PLATFORM_PROFILE`
        Profile = CL_PLATFORM_PROFILE,
        /// `CL_PLATFORM_VERSION`
        Version = CL_PLATFORM_VERSION,
        /// `CL_PLATFORM_NAME`
        Name = CL_PLATFORM_NAME,
        /// `CL_PLATFORM_VENDOR`
        Vendor = CL_PLATFORM_VENDOR,
        /// `CL_PLATFORM_EXTENSIONS`
        Extensions = CL_PLATFORM_EXTENSIONS,
        /// `CL_PLATFORM_NUMERIC_VERSION`
        NumericVersion = CL_PLATFORM_NUMERIC_VERSION,
        /// `CL_PLATFORM_ICD_SUFFIX_KHR`
        IcdSuffix = CL_PLATFORM_ICD_SUFFIX_KHR,
    }
}

impl GetInfo for Platform {
    type Param = PlatformParam;

    fn info(&self, param: PlatformParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            PlatformParam::Profile => InfoValue::string(self.config.profile),
            PlatformParam::Version => InfoValue::string(&self.version),
            PlatformParam::Name => InfoValue::string(self.config.name),
            PlatformParam::Vendor => InfoValue::string(self.config.vendor),
            PlatformParam::Extensions => InfoValue::string(self.config.extensions),
            PlatformParam::NumericVersion => InfoValue::Uint(self.config.numeric_version()),
            PlatformParam::IcdSuffix => InfoValue::string(self.config.icd_suffix),
        })
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.config.name)
            .field("devices", &self.devices.len())
            .field("contexts", &self.contexts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use alloc::vec;

    #[test]
    fn test_register_enumerates_devices() {
        let (platform, _) = testing::platform(vec![testing::gpu("a"), testing::cpu("b")]);
        assert_eq!(platform.devices().len(), 2);
        assert!(Platform::is_valid(platform.handle()));
        assert!(Platform::platforms().iter().any(|p| Arc::ptr_eq(p, &platform)));
        assert!(Platform::default_platform().is_some());
    }

    #[test]
    fn test_failed_enumeration_registers_nothing() {
        let before = Platform::platforms().len();
        let result = Platform::register(Box::new(testing::FailingPlatform), PlatformConfig::default());
        assert_eq!(result.err(), Some(Error::OutOfHostMemory));
        // Other tests may register concurrently, never unregister
        assert!(Platform::platforms().len() >= before);
    }

    #[test]
    fn test_unknown_handles_are_invalid() {
        let bogus = 0x1000 as cl_platform_id;
        assert!(!Platform::is_valid(bogus));
        assert!(!Platform::is_valid(core::ptr::null_mut()));
    }

    #[test]
    fn test_devices_of_type() {
        let (platform, _) = testing::platform(vec![testing::gpu("a"), testing::cpu("b")]);
        assert_eq!(platform.devices_of_type(DeviceType::GPU).len(), 1);
        assert_eq!(platform.devices_of_type(DeviceType::all()).len(), 2);
        assert!(platform.devices_of_type(DeviceType::ACCELERATOR).is_empty());

        // No device is flagged default: the first one stands in
        let default = platform.devices_of_type(DeviceType::DEFAULT);
        assert_eq!(default.len(), 1);
        assert!(Arc::ptr_eq(&default[0], &platform.devices()[0]));
    }

    #[test]
    fn test_context_from_type() {
        let (platform, _) = testing::platform(vec![testing::gpu("a"), testing::cpu("b")]);
        let context = platform
            .create_context_from_type(
                PropertyList::empty(),
                DeviceType::CPU,
                None,
                core::ptr::null_mut(),
            )
            .unwrap();
        assert_eq!(context.devices().len(), 1);
        assert!(platform.has_context(Arc::as_ptr(&context)));

        let missing = platform.create_context_from_type(
            PropertyList::empty(),
            DeviceType::ACCELERATOR,
            None,
            core::ptr::null_mut(),
        );
        assert_eq!(missing.err(), Some(Error::DeviceNotFound));
    }

    #[test]
    fn test_info() {
        let (platform, _) = testing::platform(vec![testing::gpu("a")]);

        let mut size = 0;
        platform.get_info(CL_PLATFORM_VERSION, None, Some(&mut size)).unwrap();
        let mut version = vec![0u8; size];
        platform.get_info(CL_PLATFORM_VERSION, Some(&mut version), None).unwrap();
        assert_eq!(&version[..], b"OpenCL 3.0 PRISM\0");

        let mut numeric = [0u8; 4];
        platform
            .get_info(CL_PLATFORM_NUMERIC_VERSION, Some(&mut numeric), None)
            .unwrap();
        assert_eq!(u32::from_ne_bytes(numeric), make_version(3, 0, 0));

        assert_eq!(platform.get_info(0x0905, None, Some(&mut size)), Err(Error::InvalidValue));
    }
}
