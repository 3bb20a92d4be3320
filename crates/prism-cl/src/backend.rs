//! # Backend Traits
//!
//! The frontend owns lifetimes, validation and queries. Everything that
//! touches a real device goes through these traits, one implementation
//! object per frontend object.
//!
//! ## Trait Hierarchy
//!
//! ```text
//! PlatformImpl
//!    │
//!    ├── create_devices ──▶ DeviceInfo (immutable)
//!    │
//!    └── create_context ──▶ ContextImpl
//!                              │
//!                              ├── create_command_queue ──▶ CommandQueueImpl
//!                              ├── create_buffer/image  ──▶ MemoryImpl
//!                              ├── create_sampler       ──▶ SamplerImpl
//!                              └── create_program       ──▶ ProgramImpl
//! ```
//!
//! A factory either returns an implementation object or an error. The
//! frontend only creates its own object once the factory succeeded.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ffi::c_void;

use prism_core::types::{
    cl_context_properties, cl_image_format, cl_mem_properties, cl_queue_properties,
    cl_sampler_properties, cl_uint, AddressingMode, CommandQueueProperties, FilterMode, MemFlags,
};
use prism_core::Result;

use crate::device::{Device, DeviceInfo};
use crate::memory::ImageDescriptor;

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Validated context creation parameters
#[derive(Debug)]
pub struct ContextDesc<'a> {
    /// Member devices, all owned by the creating platform
    pub devices: &'a [Arc<Device>],
    /// Property list as supplied, terminator included
    pub properties: &'a [cl_context_properties],
    /// `CL_CONTEXT_INTEROP_USER_SYNC`
    pub user_sync: bool,
}

/// Validated command-queue creation parameters
#[derive(Debug)]
pub struct CommandQueueDesc<'a> {
    /// Target device, a member of the context
    pub device: &'a Device,
    /// Queue properties
    pub properties: CommandQueueProperties,
    /// Extended property list (empty on the legacy path)
    pub property_array: &'a [cl_queue_properties],
    /// On-device queue size, set only for on-device queues
    pub size: Option<cl_uint>,
}

/// Validated buffer creation parameters
#[derive(Debug)]
pub struct BufferDesc<'a> {
    /// Memory flags, device access defaulted
    pub flags: MemFlags,
    /// Size in bytes, never zero
    pub size: usize,
    /// Host memory for `USE_HOST_PTR` / `COPY_HOST_PTR`, otherwise null
    pub host_ptr: *mut c_void,
    /// Extended property list
    pub properties: &'a [cl_mem_properties],
}

/// Validated image creation parameters
#[derive(Debug)]
pub struct ImageDesc<'a> {
    /// Memory flags, device access defaulted
    pub flags: MemFlags,
    /// Pixel format
    pub format: cl_image_format,
    /// Extents and pitches
    pub image: &'a ImageDescriptor,
    /// Host memory for `USE_HOST_PTR` / `COPY_HOST_PTR`, otherwise null
    pub host_ptr: *mut c_void,
    /// Extended property list
    pub properties: &'a [cl_mem_properties],
}

/// Validated sampler creation parameters
#[derive(Debug)]
pub struct SamplerDesc<'a> {
    /// Normalized coordinates
    pub normalized_coords: bool,
    /// Addressing mode
    pub addressing_mode: AddressingMode,
    /// Filter mode
    pub filter_mode: FilterMode,
    /// Extended property list (empty on the legacy path)
    pub properties: &'a [cl_sampler_properties],
}

/// Where a program comes from
#[derive(Debug)]
pub enum ProgramSource<'a> {
    /// OpenCL C source, all strings concatenated
    Source(&'a [u8]),
    /// Intermediate language module
    Il(&'a [u8]),
    /// One binary per device
    Binary {
        /// Target devices
        devices: &'a [Arc<Device>],
        /// Binaries, same order as `devices`
        binaries: &'a [Vec<u8>],
    },
    /// Built-in kernels
    BuiltInKernels {
        /// Target devices
        devices: &'a [Arc<Device>],
        /// `;`-separated kernel names
        names: &'a str,
    },
}

// =============================================================================
// IMPLEMENTATION TRAITS
// =============================================================================

/// Platform implementation
pub trait PlatformImpl: Send + Sync {
    /// Enumerate the platform's root devices
    fn create_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Create the implementation of a new context
    fn create_context(&self, desc: &ContextDesc<'_>) -> Result<Box<dyn ContextImpl>>;
}

/// Context implementation
pub trait ContextImpl: Send + Sync {
    /// Create a command queue
    fn create_command_queue(
        &self,
        desc: &CommandQueueDesc<'_>,
    ) -> Result<Box<dyn CommandQueueImpl>>;

    /// Create a buffer
    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<Box<dyn MemoryImpl>>;

    /// Create an image
    fn create_image(&self, desc: &ImageDesc<'_>) -> Result<Box<dyn MemoryImpl>>;

    /// Create a sampler
    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> Result<Box<dyn SamplerImpl>>;

    /// Create a program
    fn create_program(&self, source: &ProgramSource<'_>) -> Result<Box<dyn ProgramImpl>>;
}

/// Command-queue implementation
pub trait CommandQueueImpl: Send + Sync {
    /// Enable or disable `properties` on the device queue
    ///
    /// May query the queue, but must not call `set_property` on the same
    /// queue again.
    fn set_property(&self, properties: CommandQueueProperties, enable: bool) -> Result<()>;
}

/// Memory object implementation
pub trait MemoryImpl: Send + Sync {}

/// Sampler implementation
pub trait SamplerImpl: Send + Sync {}

/// Program implementation
pub trait ProgramImpl: Send + Sync {}
