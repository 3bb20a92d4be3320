//! # Devices
//!
//! Root devices are enumerated once per platform and live as long as it.
//! Their description is immutable; the only mutable state is the slot
//! naming the device's on-device default command queue.

use alloc::string::String;
use alloc::sync::{Arc, Weak};
use core::fmt;

use spin::Mutex;

use prism_core::types::*;
use prism_core::{cl_enum, GetInfo, InfoValue, RefCount, RefCounted, Result};

use crate::command_queue::CommandQueue;
use crate::platform::{self, Platform};

// =============================================================================
// DEVICE INFO
// =============================================================================

/// Immutable device description supplied by the backend
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// `CL_DEVICE_TYPE`
    pub device_type: DeviceType,
    /// `CL_DEVICE_NAME`
    pub name: String,
    /// `CL_DEVICE_VERSION`
    pub version: String,
    /// `CL_DEVICE_IMAGE_SUPPORT`
    pub image_support: bool,
    /// `CL_DEVICE_IL_VERSION`, empty if no IL is accepted
    pub il_version: String,
    /// `CL_DEVICE_BUILT_IN_KERNELS`, `;` separated
    pub built_in_kernels: String,
    /// `CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE`
    pub queue_on_device_preferred_size: cl_uint,
    /// `CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE`, zero if on-device queues are unsupported
    pub queue_on_device_max_size: cl_uint,
}

// =============================================================================
// DEVICE
// =============================================================================

/// An OpenCL device
#[repr(C)]
pub struct Device {
    dispatch: IcdDispatch,
    refs: RefCount,
    platform: Weak<Platform>,
    info: DeviceInfo,
    /// Current on-device default queue, never owning
    default_queue: Mutex<Weak<CommandQueue>>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Device, dispatch), 0);
static_assertions::assert_impl_all!(Device: Send, Sync);

impl Device {
    pub(crate) fn new(platform: Weak<Platform>, dispatch: IcdDispatch, info: DeviceInfo) -> Self {
        Self {
            dispatch,
            refs: RefCount::new(),
            platform,
            info,
            default_queue: Mutex::new(Weak::new()),
        }
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_device_id {
        self as *const Self as cl_device_id
    }

    /// The live device behind `handle`, if any
    pub fn lookup(handle: cl_device_id) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.find_device(ptr))
    }

    /// `true` if `handle` names a live device
    pub fn is_valid(handle: cl_device_id) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Immutable description
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Owning platform's handle
    pub fn platform_handle(&self) -> cl_platform_id {
        self.platform.as_ptr() as cl_platform_id
    }

    /// `true` if the device supports images
    pub fn supports_images(&self) -> bool {
        self.info.image_support
    }

    /// `true` if the device accepts at least one intermediate language
    pub fn supports_il(&self) -> bool {
        !self.info.il_version.is_empty()
    }

    /// `true` if `name` is one of the device's built-in kernels
    pub fn supports_built_in_kernel(&self, name: &str) -> bool {
        self.info
            .built_in_kernels
            .split(';')
            .any(|kernel| kernel.trim() == name)
    }

    /// `true` if the device can host on-device queues
    pub fn supports_on_device_queues(&self) -> bool {
        self.info.queue_on_device_max_size > 0
    }

    // =========================================================================
    // Default Queue
    // =========================================================================

    /// Current on-device default queue, null if there is none
    pub fn default_queue(&self) -> *const CommandQueue {
        let slot = self.default_queue.lock();
        if slot.strong_count() > 0 {
            slot.as_ptr()
        } else {
            core::ptr::null()
        }
    }

    /// Make `queue` the default queue, replacing any previous one
    pub(crate) fn set_default_queue(&self, queue: &Arc<CommandQueue>) {
        let mut slot = self.default_queue.lock();
        if slot.strong_count() > 0 {
            log::debug!(
                "Device {:p}: default queue {:p} replaced by {:p}",
                self,
                slot.as_ptr(),
                Arc::as_ptr(queue)
            );
        }
        *slot = Arc::downgrade(queue);
    }

    /// Clear the default queue if it is `queue`
    pub(crate) fn clear_default_queue(&self, queue: *const CommandQueue) {
        let mut slot = self.default_queue.lock();
        if slot.as_ptr() == queue {
            *slot = Weak::new();
        }
    }
}

impl RefCounted for Device {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        // Root devices belong to the platform and are never freed here
        self.refs.remove_ref()
    }
}

// =============================================================================
// INFO
// =============================================================================

cl_enum! {
    /// `clGetDeviceInfo` parameters
    pub enum DeviceParam {
        /// `CL_DEVICE_TYPE`
        Type = CL_DEVICE_TYPE,
        /// `CL_DEVICE_IMAGE_SUPPORT`
        ImageSupport = CL_DEVICE_IMAGE_SUPPORT,
        /// `CL_DEVICE_NAME`
        Name = CL_DEVICE_NAME,
        /// `CL_DEVICE_VERSION`
        Version = CL_DEVICE_VERSION,
        /// `CL_DEVICE_PLATFORM`
        Platform = CL_DEVICE_PLATFORM,
        /// `CL_DEVICE_BUILT_IN_KERNELS`
        BuiltInKernels = CL_DEVICE_BUILT_IN_KERNELS,
        /// `CL_DEVICE_REFERENCE_COUNT`
        ReferenceCount = CL_DEVICE_REFERENCE_COUNT,
        /// `CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE`
        QueueOnDevicePreferredSize = CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE,
        /// `CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE`
        QueueOnDeviceMaxSize = CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE,
        /// `CL_DEVICE_IL_VERSION`
        IlVersion = CL_DEVICE_IL_VERSION,
    }
}

impl GetInfo for Device {
    type Param = DeviceParam;

    fn info(&self, param: DeviceParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            DeviceParam::Type => InfoValue::Ulong(self.info.device_type.bits()),
            DeviceParam::ImageSupport => InfoValue::bool(self.info.image_support),
            DeviceParam::Name => InfoValue::string(&self.info.name),
            DeviceParam::Version => InfoValue::string(&self.info.version),
            DeviceParam::Platform => InfoValue::handle(self.platform_handle()),
            DeviceParam::BuiltInKernels => InfoValue::string(&self.info.built_in_kernels),
            // Root devices: internal holders are not visible to the application
            DeviceParam::ReferenceCount => InfoValue::Uint(1),
            DeviceParam::QueueOnDevicePreferredSize => {
                InfoValue::Uint(self.info.queue_on_device_preferred_size)
            }
            DeviceParam::QueueOnDeviceMaxSize => InfoValue::Uint(self.info.queue_on_device_max_size),
            DeviceParam::IlVersion => InfoValue::string(&self.info.il_version),
        })
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.info.name)
            .field("type", &self.info.device_type)
            .field("refs", &self.refs)
            .finish()
    }
}
