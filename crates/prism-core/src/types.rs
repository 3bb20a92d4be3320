//! # OpenCL Types
//!
//! Scalar typedefs, opaque handles, enumerants and flag sets of the OpenCL
//! C API, expressed in Rust.
//!
//! The lower-case typedefs deliberately mirror the C header names so the
//! entry-point signatures read like the API they implement.

#![allow(non_camel_case_types, non_upper_case_globals)]

use core::ffi::c_void;

// =============================================================================
// SCALAR TYPES
// =============================================================================

/// Signed 32-bit integer (error codes)
pub type cl_int = i32;
/// Unsigned 32-bit integer
pub type cl_uint = u32;
/// Unsigned 64-bit integer
pub type cl_ulong = u64;
/// Boolean (`CL_TRUE` / `CL_FALSE`)
pub type cl_bool = cl_uint;
/// Bit field
pub type cl_bitfield = cl_ulong;
/// Generic property value
pub type cl_properties = cl_ulong;
/// Packed `major.minor.patch` version
pub type cl_version = cl_uint;

/// Device type bit field
pub type cl_device_type = cl_bitfield;
/// Command-queue property bit field
pub type cl_command_queue_properties = cl_bitfield;
/// Command-queue extended property
pub type cl_queue_properties = cl_properties;
/// Context property (pointer sized)
pub type cl_context_properties = isize;
/// Memory flag bit field
pub type cl_mem_flags = cl_bitfield;
/// Memory extended property
pub type cl_mem_properties = cl_properties;
/// Sampler extended property
pub type cl_sampler_properties = cl_properties;
/// Memory object type
pub type cl_mem_object_type = cl_uint;
/// Sampler addressing mode
pub type cl_addressing_mode = cl_uint;
/// Sampler filter mode
pub type cl_filter_mode = cl_uint;
/// Image channel order
pub type cl_channel_order = cl_uint;
/// Image channel data type
pub type cl_channel_type = cl_uint;

/// `CL_TRUE`
pub const CL_TRUE: cl_bool = 1;
/// `CL_FALSE`
pub const CL_FALSE: cl_bool = 0;

// =============================================================================
// OPAQUE HANDLES
// =============================================================================

macro_rules! opaque_handles {
    ($($(#[$meta:meta])* $raw:ident => $handle:ident;)+) => {
        $(
            #[doc(hidden)]
            #[repr(C)]
            #[derive(Debug)]
            pub struct $raw {
                _private: [u8; 0],
            }

            $(#[$meta])*
            pub type $handle = *mut $raw;
        )+
    };
}

opaque_handles! {
    /// Platform handle
    _cl_platform_id => cl_platform_id;
    /// Device handle
    _cl_device_id => cl_device_id;
    /// Context handle
    _cl_context => cl_context;
    /// Command-queue handle
    _cl_command_queue => cl_command_queue;
    /// Memory object handle
    _cl_mem => cl_mem;
    /// Sampler handle
    _cl_sampler => cl_sampler;
    /// Program handle
    _cl_program => cl_program;
}

/// ICD dispatch table pointer
///
/// Every object handed to an ICD loader must start with a pointer to the
/// driver's dispatch table. The table itself is owned by the loader glue;
/// the frontend only stores and propagates the address.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcdDispatch(*const c_void);

impl IcdDispatch {
    /// No dispatch table (objects not handed to a loader)
    pub const NONE: Self = Self(core::ptr::null());

    /// Wrap a dispatch table address
    pub const fn new(table: *const c_void) -> Self {
        Self(table)
    }

    /// Table address
    pub const fn as_ptr(self) -> *const c_void {
        self.0
    }
}

impl Default for IcdDispatch {
    fn default() -> Self {
        Self::NONE
    }
}

// SAFETY: the dispatch table is an immutable static owned by the loader glue
unsafe impl Send for IcdDispatch {}
// SAFETY: see above
unsafe impl Sync for IcdDispatch {}

// =============================================================================
// VERSIONS
// =============================================================================

/// Pack a version the way `CL_MAKE_VERSION` does
pub const fn make_version(major: u32, minor: u32, patch: u32) -> cl_version {
    ((major & 0x3ff) << 22) | ((minor & 0x3ff) << 12) | (patch & 0xfff)
}

/// Major part of a packed version
pub const fn version_major(version: cl_version) -> u32 {
    version >> 22
}

/// Minor part of a packed version
pub const fn version_minor(version: cl_version) -> u32 {
    (version >> 12) & 0x3ff
}

// =============================================================================
// PLATFORM / DEVICE ENUMERANTS
// =============================================================================

/// `CL_PLATFORM_PROFILE`
pub const CL_PLATFORM_PROFILE: cl_uint = 0x0900;
/// `CL_PLATFORM_VERSION`
pub const CL_PLATFORM_VERSION: cl_uint = 0x0901;
/// `CL_PLATFORM_NAME`
pub const CL_PLATFORM_NAME: cl_uint = 0x0902;
/// `CL_PLATFORM_VENDOR`
pub const CL_PLATFORM_VENDOR: cl_uint = 0x0903;
/// `CL_PLATFORM_EXTENSIONS`
pub const CL_PLATFORM_EXTENSIONS: cl_uint = 0x0904;
/// `CL_PLATFORM_NUMERIC_VERSION`
pub const CL_PLATFORM_NUMERIC_VERSION: cl_uint = 0x0906;
/// `CL_PLATFORM_ICD_SUFFIX_KHR`
pub const CL_PLATFORM_ICD_SUFFIX_KHR: cl_uint = 0x0920;

/// `CL_DEVICE_TYPE`
pub const CL_DEVICE_TYPE: cl_uint = 0x1000;
/// `CL_DEVICE_IMAGE_SUPPORT`
pub const CL_DEVICE_IMAGE_SUPPORT: cl_uint = 0x1016;
/// `CL_DEVICE_NAME`
pub const CL_DEVICE_NAME: cl_uint = 0x102B;
/// `CL_DEVICE_VERSION`
pub const CL_DEVICE_VERSION: cl_uint = 0x102F;
/// `CL_DEVICE_PLATFORM`
pub const CL_DEVICE_PLATFORM: cl_uint = 0x1031;
/// `CL_DEVICE_BUILT_IN_KERNELS`
pub const CL_DEVICE_BUILT_IN_KERNELS: cl_uint = 0x103F;
/// `CL_DEVICE_REFERENCE_COUNT`
pub const CL_DEVICE_REFERENCE_COUNT: cl_uint = 0x1047;
/// `CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE`
pub const CL_DEVICE_QUEUE_ON_DEVICE_PREFERRED_SIZE: cl_uint = 0x104E;
/// `CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE`
pub const CL_DEVICE_QUEUE_ON_DEVICE_MAX_SIZE: cl_uint = 0x104F;
/// `CL_DEVICE_IL_VERSION`
pub const CL_DEVICE_IL_VERSION: cl_uint = 0x105B;

// =============================================================================
// CONTEXT ENUMERANTS
// =============================================================================

/// `CL_CONTEXT_REFERENCE_COUNT`
pub const CL_CONTEXT_REFERENCE_COUNT: cl_uint = 0x1080;
/// `CL_CONTEXT_DEVICES`
pub const CL_CONTEXT_DEVICES: cl_uint = 0x1081;
/// `CL_CONTEXT_PROPERTIES`
pub const CL_CONTEXT_PROPERTIES: cl_uint = 0x1082;
/// `CL_CONTEXT_NUM_DEVICES`
pub const CL_CONTEXT_NUM_DEVICES: cl_uint = 0x1083;
/// `CL_CONTEXT_PLATFORM` (property key)
pub const CL_CONTEXT_PLATFORM: cl_context_properties = 0x1084;
/// `CL_CONTEXT_INTEROP_USER_SYNC` (property key)
pub const CL_CONTEXT_INTEROP_USER_SYNC: cl_context_properties = 0x1085;

// =============================================================================
// COMMAND QUEUE ENUMERANTS
// =============================================================================

/// `CL_QUEUE_CONTEXT`
pub const CL_QUEUE_CONTEXT: cl_uint = 0x1090;
/// `CL_QUEUE_DEVICE`
pub const CL_QUEUE_DEVICE: cl_uint = 0x1091;
/// `CL_QUEUE_REFERENCE_COUNT`
pub const CL_QUEUE_REFERENCE_COUNT: cl_uint = 0x1092;
/// `CL_QUEUE_PROPERTIES` (query and property key)
pub const CL_QUEUE_PROPERTIES: cl_uint = 0x1093;
/// `CL_QUEUE_SIZE` (query and property key)
pub const CL_QUEUE_SIZE: cl_uint = 0x1094;
/// `CL_QUEUE_DEVICE_DEFAULT`
pub const CL_QUEUE_DEVICE_DEFAULT: cl_uint = 0x1095;
/// `CL_QUEUE_PROPERTIES_ARRAY`
pub const CL_QUEUE_PROPERTIES_ARRAY: cl_uint = 0x1098;

// =============================================================================
// MEMORY ENUMERANTS
// =============================================================================

/// `CL_MEM_OBJECT_BUFFER`
pub const CL_MEM_OBJECT_BUFFER: cl_uint = 0x10F0;
/// `CL_MEM_OBJECT_IMAGE2D`
pub const CL_MEM_OBJECT_IMAGE2D: cl_uint = 0x10F1;
/// `CL_MEM_OBJECT_IMAGE3D`
pub const CL_MEM_OBJECT_IMAGE3D: cl_uint = 0x10F2;
/// `CL_MEM_OBJECT_IMAGE2D_ARRAY`
pub const CL_MEM_OBJECT_IMAGE2D_ARRAY: cl_uint = 0x10F3;
/// `CL_MEM_OBJECT_IMAGE1D`
pub const CL_MEM_OBJECT_IMAGE1D: cl_uint = 0x10F4;
/// `CL_MEM_OBJECT_IMAGE1D_ARRAY`
pub const CL_MEM_OBJECT_IMAGE1D_ARRAY: cl_uint = 0x10F5;
/// `CL_MEM_OBJECT_IMAGE1D_BUFFER`
pub const CL_MEM_OBJECT_IMAGE1D_BUFFER: cl_uint = 0x10F6;

/// `CL_MEM_TYPE`
pub const CL_MEM_TYPE: cl_uint = 0x1100;
/// `CL_MEM_FLAGS`
pub const CL_MEM_FLAGS: cl_uint = 0x1101;
/// `CL_MEM_SIZE`
pub const CL_MEM_SIZE: cl_uint = 0x1102;
/// `CL_MEM_HOST_PTR`
pub const CL_MEM_HOST_PTR: cl_uint = 0x1103;
/// `CL_MEM_MAP_COUNT`
pub const CL_MEM_MAP_COUNT: cl_uint = 0x1104;
/// `CL_MEM_REFERENCE_COUNT`
pub const CL_MEM_REFERENCE_COUNT: cl_uint = 0x1105;
/// `CL_MEM_CONTEXT`
pub const CL_MEM_CONTEXT: cl_uint = 0x1106;
/// `CL_MEM_ASSOCIATED_MEMOBJECT`
pub const CL_MEM_ASSOCIATED_MEMOBJECT: cl_uint = 0x1107;
/// `CL_MEM_OFFSET`
pub const CL_MEM_OFFSET: cl_uint = 0x1108;
/// `CL_MEM_PROPERTIES`
pub const CL_MEM_PROPERTIES: cl_uint = 0x110A;

/// `CL_IMAGE_FORMAT`
pub const CL_IMAGE_FORMAT: cl_uint = 0x1110;
/// `CL_IMAGE_ELEMENT_SIZE`
pub const CL_IMAGE_ELEMENT_SIZE: cl_uint = 0x1111;
/// `CL_IMAGE_ROW_PITCH`
pub const CL_IMAGE_ROW_PITCH: cl_uint = 0x1112;
/// `CL_IMAGE_SLICE_PITCH`
pub const CL_IMAGE_SLICE_PITCH: cl_uint = 0x1113;
/// `CL_IMAGE_WIDTH`
pub const CL_IMAGE_WIDTH: cl_uint = 0x1114;
/// `CL_IMAGE_HEIGHT`
pub const CL_IMAGE_HEIGHT: cl_uint = 0x1115;
/// `CL_IMAGE_DEPTH`
pub const CL_IMAGE_DEPTH: cl_uint = 0x1116;
/// `CL_IMAGE_ARRAY_SIZE`
pub const CL_IMAGE_ARRAY_SIZE: cl_uint = 0x1117;

// Channel orders
/// `CL_R`
pub const CL_R: cl_channel_order = 0x10B0;
/// `CL_A`
pub const CL_A: cl_channel_order = 0x10B1;
/// `CL_RG`
pub const CL_RG: cl_channel_order = 0x10B2;
/// `CL_RA`
pub const CL_RA: cl_channel_order = 0x10B3;
/// `CL_RGB`
pub const CL_RGB: cl_channel_order = 0x10B4;
/// `CL_RGBA`
pub const CL_RGBA: cl_channel_order = 0x10B5;
/// `CL_BGRA`
pub const CL_BGRA: cl_channel_order = 0x10B6;
/// `CL_ARGB`
pub const CL_ARGB: cl_channel_order = 0x10B7;
/// `CL_INTENSITY`
pub const CL_INTENSITY: cl_channel_order = 0x10B8;
/// `CL_LUMINANCE`
pub const CL_LUMINANCE: cl_channel_order = 0x10B9;
/// `CL_Rx`
pub const CL_Rx: cl_channel_order = 0x10BA;
/// `CL_RGx`
pub const CL_RGx: cl_channel_order = 0x10BB;
/// `CL_RGBx`
pub const CL_RGBx: cl_channel_order = 0x10BC;
/// `CL_DEPTH`
pub const CL_DEPTH: cl_channel_order = 0x10BD;

// Channel data types
/// `CL_SNORM_INT8`
pub const CL_SNORM_INT8: cl_channel_type = 0x10D0;
/// `CL_SNORM_INT16`
pub const CL_SNORM_INT16: cl_channel_type = 0x10D1;
/// `CL_UNORM_INT8`
pub const CL_UNORM_INT8: cl_channel_type = 0x10D2;
/// `CL_UNORM_INT16`
pub const CL_UNORM_INT16: cl_channel_type = 0x10D3;
/// `CL_UNORM_SHORT_565`
pub const CL_UNORM_SHORT_565: cl_channel_type = 0x10D4;
/// `CL_UNORM_SHORT_555`
pub const CL_UNORM_SHORT_555: cl_channel_type = 0x10D5;
/// `CL_UNORM_INT_101010`
pub const CL_UNORM_INT_101010: cl_channel_type = 0x10D6;
/// `CL_SIGNED_INT8`
pub const CL_SIGNED_INT8: cl_channel_type = 0x10D7;
/// `CL_SIGNED_INT16`
pub const CL_SIGNED_INT16: cl_channel_type = 0x10D8;
/// `CL_SIGNED_INT32`
pub const CL_SIGNED_INT32: cl_channel_type = 0x10D9;
/// `CL_UNSIGNED_INT8`
pub const CL_UNSIGNED_INT8: cl_channel_type = 0x10DA;
/// `CL_UNSIGNED_INT16`
pub const CL_UNSIGNED_INT16: cl_channel_type = 0x10DB;
/// `CL_UNSIGNED_INT32`
pub const CL_UNSIGNED_INT32: cl_channel_type = 0x10DC;
/// `CL_HALF_FLOAT`
pub const CL_HALF_FLOAT: cl_channel_type = 0x10DD;
/// `CL_FLOAT`
pub const CL_FLOAT: cl_channel_type = 0x10DE;

// =============================================================================
// SAMPLER ENUMERANTS
// =============================================================================

/// `CL_ADDRESS_NONE`
pub const CL_ADDRESS_NONE: cl_uint = 0x1130;
/// `CL_ADDRESS_CLAMP_TO_EDGE`
pub const CL_ADDRESS_CLAMP_TO_EDGE: cl_uint = 0x1131;
/// `CL_ADDRESS_CLAMP`
pub const CL_ADDRESS_CLAMP: cl_uint = 0x1132;
/// `CL_ADDRESS_REPEAT`
pub const CL_ADDRESS_REPEAT: cl_uint = 0x1133;
/// `CL_ADDRESS_MIRRORED_REPEAT`
pub const CL_ADDRESS_MIRRORED_REPEAT: cl_uint = 0x1134;

/// `CL_FILTER_NEAREST`
pub const CL_FILTER_NEAREST: cl_uint = 0x1140;
/// `CL_FILTER_LINEAR`
pub const CL_FILTER_LINEAR: cl_uint = 0x1141;

/// `CL_SAMPLER_REFERENCE_COUNT`
pub const CL_SAMPLER_REFERENCE_COUNT: cl_uint = 0x1150;
/// `CL_SAMPLER_CONTEXT`
pub const CL_SAMPLER_CONTEXT: cl_uint = 0x1151;
/// `CL_SAMPLER_NORMALIZED_COORDS` (query and property key)
pub const CL_SAMPLER_NORMALIZED_COORDS: cl_uint = 0x1152;
/// `CL_SAMPLER_ADDRESSING_MODE` (query and property key)
pub const CL_SAMPLER_ADDRESSING_MODE: cl_uint = 0x1153;
/// `CL_SAMPLER_FILTER_MODE` (query and property key)
pub const CL_SAMPLER_FILTER_MODE: cl_uint = 0x1154;
/// `CL_SAMPLER_PROPERTIES`
pub const CL_SAMPLER_PROPERTIES: cl_uint = 0x1158;

// =============================================================================
// PROGRAM ENUMERANTS
// =============================================================================

/// `CL_PROGRAM_REFERENCE_COUNT`
pub const CL_PROGRAM_REFERENCE_COUNT: cl_uint = 0x1160;
/// `CL_PROGRAM_CONTEXT`
pub const CL_PROGRAM_CONTEXT: cl_uint = 0x1161;
/// `CL_PROGRAM_NUM_DEVICES`
pub const CL_PROGRAM_NUM_DEVICES: cl_uint = 0x1162;
/// `CL_PROGRAM_DEVICES`
pub const CL_PROGRAM_DEVICES: cl_uint = 0x1163;
/// `CL_PROGRAM_SOURCE`
pub const CL_PROGRAM_SOURCE: cl_uint = 0x1164;
/// `CL_PROGRAM_BINARY_SIZES`
pub const CL_PROGRAM_BINARY_SIZES: cl_uint = 0x1165;
/// `CL_PROGRAM_KERNEL_NAMES`
pub const CL_PROGRAM_KERNEL_NAMES: cl_uint = 0x1168;
/// `CL_PROGRAM_IL`
pub const CL_PROGRAM_IL: cl_uint = 0x1169;

// =============================================================================
// FLAG SETS
// =============================================================================

bitflags::bitflags! {
    /// Device type selection (`cl_device_type`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceType: cl_device_type {
        /// `CL_DEVICE_TYPE_DEFAULT`
        const DEFAULT = 1 << 0;
        /// `CL_DEVICE_TYPE_CPU`
        const CPU = 1 << 1;
        /// `CL_DEVICE_TYPE_GPU`
        const GPU = 1 << 2;
        /// `CL_DEVICE_TYPE_ACCELERATOR`
        const ACCELERATOR = 1 << 3;
        /// `CL_DEVICE_TYPE_CUSTOM`
        const CUSTOM = 1 << 4;
    }
}

impl DeviceType {
    /// `CL_DEVICE_TYPE_ALL`
    pub const ALL_TYPES: cl_device_type = 0xFFFF_FFFF;

    /// Parse a device type selector, accepting `CL_DEVICE_TYPE_ALL`
    pub fn from_selector(raw: cl_device_type) -> Option<Self> {
        if raw == Self::ALL_TYPES {
            Some(Self::all())
        } else {
            Self::from_bits(raw).filter(|ty| !ty.is_empty())
        }
    }
}

bitflags::bitflags! {
    /// Command-queue properties (`cl_command_queue_properties`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandQueueProperties: cl_command_queue_properties {
        /// `CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE`
        const OUT_OF_ORDER_EXEC_MODE_ENABLE = 1 << 0;
        /// `CL_QUEUE_PROFILING_ENABLE`
        const PROFILING_ENABLE = 1 << 1;
        /// `CL_QUEUE_ON_DEVICE`
        const ON_DEVICE = 1 << 2;
        /// `CL_QUEUE_ON_DEVICE_DEFAULT`
        const ON_DEVICE_DEFAULT = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Memory object flags (`cl_mem_flags`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemFlags: cl_mem_flags {
        /// `CL_MEM_READ_WRITE`
        const READ_WRITE = 1 << 0;
        /// `CL_MEM_WRITE_ONLY`
        const WRITE_ONLY = 1 << 1;
        /// `CL_MEM_READ_ONLY`
        const READ_ONLY = 1 << 2;
        /// `CL_MEM_USE_HOST_PTR`
        const USE_HOST_PTR = 1 << 3;
        /// `CL_MEM_ALLOC_HOST_PTR`
        const ALLOC_HOST_PTR = 1 << 4;
        /// `CL_MEM_COPY_HOST_PTR`
        const COPY_HOST_PTR = 1 << 5;
        /// `CL_MEM_HOST_WRITE_ONLY`
        const HOST_WRITE_ONLY = 1 << 7;
        /// `CL_MEM_HOST_READ_ONLY`
        const HOST_READ_ONLY = 1 << 8;
        /// `CL_MEM_HOST_NO_ACCESS`
        const HOST_NO_ACCESS = 1 << 9;
    }
}

impl MemFlags {
    /// Device access bits
    pub const DEVICE_ACCESS: Self = Self::READ_WRITE
        .union(Self::WRITE_ONLY)
        .union(Self::READ_ONLY);

    /// Host access bits
    pub const HOST_ACCESS: Self = Self::HOST_WRITE_ONLY
        .union(Self::HOST_READ_ONLY)
        .union(Self::HOST_NO_ACCESS);

    /// Host pointer usage bits
    pub const HOST_PTR_USAGE: Self = Self::USE_HOST_PTR.union(Self::COPY_HOST_PTR);
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

cl_enum! {
    /// Memory object type
    pub enum MemObjectType {
        /// Buffer
        Buffer = CL_MEM_OBJECT_BUFFER,
        /// 2D image
        Image2D = CL_MEM_OBJECT_IMAGE2D,
        /// 3D image
        Image3D = CL_MEM_OBJECT_IMAGE3D,
        /// 2D image array
        Image2DArray = CL_MEM_OBJECT_IMAGE2D_ARRAY,
        /// 1D image
        Image1D = CL_MEM_OBJECT_IMAGE1D,
        /// 1D image array
        Image1DArray = CL_MEM_OBJECT_IMAGE1D_ARRAY,
        /// 1D image backed by a buffer
        Image1DBuffer = CL_MEM_OBJECT_IMAGE1D_BUFFER,
    }
}

cl_enum! {
    /// Sampler addressing mode
    pub enum AddressingMode {
        /// `CL_ADDRESS_NONE`
        None = CL_ADDRESS_NONE,
        /// `CL_ADDRESS_CLAMP_TO_EDGE`
        ClampToEdge = CL_ADDRESS_CLAMP_TO_EDGE,
        /// `CL_ADDRESS_CLAMP`
        Clamp = CL_ADDRESS_CLAMP,
        /// `CL_ADDRESS_REPEAT`
        Repeat = CL_ADDRESS_REPEAT,
        /// `CL_ADDRESS_MIRRORED_REPEAT`
        MirroredRepeat = CL_ADDRESS_MIRRORED_REPEAT,
    }
}

cl_enum! {
    /// Sampler filter mode
    pub enum FilterMode {
        /// `CL_FILTER_NEAREST`
        Nearest = CL_FILTER_NEAREST,
        /// `CL_FILTER_LINEAR`
        Linear = CL_FILTER_LINEAR,
    }
}

// =============================================================================
// C STRUCTURES
// =============================================================================

/// `cl_image_format`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct cl_image_format {
    /// Channel order
    pub image_channel_order: cl_channel_order,
    /// Channel data type
    pub image_channel_data_type: cl_channel_type,
}

impl cl_image_format {
    /// Size in bytes of one image element, `None` for unknown combinations
    pub fn element_size(&self) -> Option<usize> {
        let packed = match self.image_channel_data_type {
            CL_UNORM_SHORT_565 | CL_UNORM_SHORT_555 => Some(2),
            CL_UNORM_INT_101010 => Some(4),
            _ => None,
        };
        if let Some(size) = packed {
            return matches!(self.image_channel_order, CL_RGB | CL_RGBx).then_some(size);
        }

        let channels = match self.image_channel_order {
            CL_R | CL_A | CL_Rx | CL_INTENSITY | CL_LUMINANCE | CL_DEPTH => 1,
            CL_RG | CL_RA | CL_RGx => 2,
            CL_RGB | CL_RGBx => return None,
            CL_RGBA | CL_BGRA | CL_ARGB => 4,
            _ => return None,
        };
        let channel_size = match self.image_channel_data_type {
            CL_SNORM_INT8 | CL_UNORM_INT8 | CL_SIGNED_INT8 | CL_UNSIGNED_INT8 => 1,
            CL_SNORM_INT16 | CL_UNORM_INT16 | CL_SIGNED_INT16 | CL_UNSIGNED_INT16
            | CL_HALF_FLOAT => 2,
            CL_SIGNED_INT32 | CL_UNSIGNED_INT32 | CL_FLOAT => 4,
            _ => return None,
        };
        Some(channels * channel_size)
    }
}

/// `cl_image_desc`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cl_image_desc {
    /// Image type
    pub image_type: cl_mem_object_type,
    /// Width in pixels
    pub image_width: usize,
    /// Height in pixels
    pub image_height: usize,
    /// Depth in pixels
    pub image_depth: usize,
    /// Number of array layers
    pub image_array_size: usize,
    /// Row pitch in bytes
    pub image_row_pitch: usize,
    /// Slice pitch in bytes
    pub image_slice_pitch: usize,
    /// Mip levels (must be 0)
    pub num_mip_levels: cl_uint,
    /// Samples (must be 0)
    pub num_samples: cl_uint,
    /// Backing buffer for 1D buffer images
    pub mem_object: cl_mem,
}

static_assertions::assert_impl_all!(IcdDispatch: Send, Sync, Copy);
static_assertions::const_assert_eq!(core::mem::size_of::<cl_image_format>(), 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_packing() {
        let v = make_version(3, 0, 0);
        assert_eq!(version_major(v), 3);
        assert_eq!(version_minor(v), 0);

        let v = make_version(2, 1, 7);
        assert_eq!(version_major(v), 2);
        assert_eq!(version_minor(v), 1);
    }

    #[test]
    fn test_element_size() {
        let rgba8 = cl_image_format {
            image_channel_order: CL_RGBA,
            image_channel_data_type: CL_UNORM_INT8,
        };
        assert_eq!(rgba8.element_size(), Some(4));

        let rg_float = cl_image_format {
            image_channel_order: CL_RG,
            image_channel_data_type: CL_FLOAT,
        };
        assert_eq!(rg_float.element_size(), Some(8));

        let rgb565 = cl_image_format {
            image_channel_order: CL_RGB,
            image_channel_data_type: CL_UNORM_SHORT_565,
        };
        assert_eq!(rgb565.element_size(), Some(2));
    }

    #[test]
    fn test_element_size_rejects_invalid_combinations() {
        let rgba565 = cl_image_format {
            image_channel_order: CL_RGBA,
            image_channel_data_type: CL_UNORM_SHORT_565,
        };
        assert_eq!(rgba565.element_size(), None);

        let rgb8 = cl_image_format {
            image_channel_order: CL_RGB,
            image_channel_data_type: CL_UNORM_INT8,
        };
        assert_eq!(rgb8.element_size(), None);

        let unknown = cl_image_format {
            image_channel_order: 0xdead,
            image_channel_data_type: CL_FLOAT,
        };
        assert_eq!(unknown.element_size(), None);
    }

    #[test]
    fn test_enum_conversion() {
        assert_eq!(
            AddressingMode::try_from(CL_ADDRESS_REPEAT),
            Ok(AddressingMode::Repeat)
        );
        assert_eq!(FilterMode::Linear.raw(), CL_FILTER_LINEAR);
        assert_eq!(
            MemObjectType::try_from(0x1234),
            Err(crate::error::Error::InvalidValue)
        );
    }

    #[test]
    fn test_device_type_selector() {
        assert_eq!(DeviceType::from_selector(DeviceType::ALL_TYPES), Some(DeviceType::all()));
        assert_eq!(DeviceType::from_selector(4), Some(DeviceType::GPU));
        assert_eq!(DeviceType::from_selector(0), None);
        assert_eq!(DeviceType::from_selector(1 << 40), None);
    }

    #[test]
    fn test_mem_flag_groups() {
        assert!(MemFlags::DEVICE_ACCESS.contains(MemFlags::READ_ONLY));
        assert!(MemFlags::HOST_ACCESS.contains(MemFlags::HOST_NO_ACCESS));
        assert!(!MemFlags::HOST_PTR_USAGE.contains(MemFlags::ALLOC_HOST_PTR));
    }
}
