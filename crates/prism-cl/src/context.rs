//! # Contexts
//!
//! A context owns every command queue, memory object, sampler and program
//! created from it. Each kind lives in its own lock-guarded list; the list
//! entry is the only owning pointer to the child.
//!
//! ## Lifecycle
//!
//! ```text
//! create_x ─▶ validate ─▶ backend factory ─▶ child ─▶ list.insert ─▶ handle
//!                 │              │
//!                 └──── Err ─────┴──▶ nothing registered
//!
//! child.release() reaches 0 ─▶ context.destroy_x(child) ─▶ list.take ─▶ drop
//! ```
//!
//! Children hold a counted reference to their context, so a context only
//! reaches zero once all of its children are gone.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::ffi::{c_char, c_void, CStr};
use core::fmt;

use prism_core::types::*;
use prism_core::{cl_enum, Error, GetInfo, InfoValue, PropertyList, Ref, RefCount, RefCounted, Result};

use crate::backend::{ContextDesc, ContextImpl};
use crate::command_queue::CommandQueue;
use crate::device::Device;
use crate::memory::{self, ImageDescriptor, Memory};
use crate::object_list::ObjectList;
use crate::platform::{self, Platform};
use crate::program::Program;
use crate::sampler::Sampler;

/// `pfn_notify` of `clCreateContext`
pub type ContextErrorCallback = unsafe extern "C" fn(
    errinfo: *const c_char,
    private_info: *const c_void,
    cb: usize,
    user_data: *mut c_void,
);

// =============================================================================
// CONTEXT
// =============================================================================

/// An OpenCL context
#[repr(C)]
pub struct Context {
    dispatch: IcdDispatch,
    refs: RefCount,
    platform: Weak<Platform>,
    properties: PropertyList<cl_context_properties>,
    notify: Option<ContextErrorCallback>,
    /// Opaque to the frontend, handed back to `notify`
    user_data: usize,
    user_sync: bool,
    imp: Box<dyn ContextImpl>,
    devices: Vec<Ref<Device>>,

    command_queues: ObjectList<CommandQueue>,
    memories: ObjectList<Memory>,
    samplers: ObjectList<Sampler>,
    programs: ObjectList<Program>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Context, dispatch), 0);
static_assertions::assert_impl_all!(Context: Send, Sync);

impl Context {
    pub(crate) fn new(
        platform: &Arc<Platform>,
        properties: PropertyList<cl_context_properties>,
        devices: &[Arc<Device>],
        notify: Option<ContextErrorCallback>,
        user_data: *mut c_void,
    ) -> Result<Arc<Self>> {
        if notify.is_none() && !user_data.is_null() {
            return Err(Error::InvalidValue);
        }
        let user_sync = parse_properties(platform, &properties)?;

        if devices.is_empty() {
            return Err(Error::InvalidValue);
        }
        let mut members: Vec<Arc<Device>> = Vec::with_capacity(devices.len());
        for device in devices {
            if !platform.has_device(Arc::as_ptr(device)) {
                return Err(Error::InvalidDevice);
            }
            if !members.iter().any(|m| Arc::ptr_eq(m, device)) {
                members.push(Arc::clone(device));
            }
        }

        let desc = ContextDesc {
            devices: &members,
            properties: properties.as_slice(),
            user_sync,
        };
        let imp = platform.backend().create_context(&desc).map_err(|e| {
            log::warn!("Backend failed to create context: {}", e);
            e
        })?;

        Ok(Arc::new(Self {
            dispatch: platform.config().dispatch,
            refs: RefCount::new(),
            platform: Arc::downgrade(platform),
            properties,
            notify,
            user_data: user_data as usize,
            user_sync,
            imp,
            devices: members.into_iter().map(Ref::new).collect(),
            command_queues: ObjectList::new(),
            memories: ObjectList::new(),
            samplers: ObjectList::new(),
            programs: ObjectList::new(),
        }))
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_context {
        self as *const Self as cl_context
    }

    /// The live context behind `handle`, if any
    pub fn lookup(handle: cl_context) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.find_context(ptr))
    }

    /// `true` if `handle` names a live context
    pub fn is_valid(handle: cl_context) -> bool {
        Self::lookup(handle).is_some()
    }

    /// `true` if `handle` names a live context whose platform implements
    /// at least `major.minor`
    pub fn is_valid_and_version_or_newer(handle: cl_context, major: u32, minor: u32) -> bool {
        Self::lookup(handle)
            .and_then(|context| context.platform())
            .is_some_and(|platform| platform.is_version_or_newer(major, minor))
    }

    /// Owning platform
    pub fn platform(&self) -> Option<Arc<Platform>> {
        self.platform.upgrade()
    }

    /// Member devices
    pub fn devices(&self) -> &[Ref<Device>] {
        &self.devices
    }

    /// `CL_CONTEXT_INTEROP_USER_SYNC`
    pub fn user_sync(&self) -> bool {
        self.user_sync
    }

    pub(crate) fn backend(&self) -> &dyn ContextImpl {
        self.imp.as_ref()
    }

    pub(crate) fn dispatch(&self) -> IcdDispatch {
        self.dispatch
    }

    /// Forward an error report to the application's callback
    pub fn report_error(&self, errinfo: &CStr, private_info: &[u8]) {
        if let Some(notify) = self.notify {
            // SAFETY: the application registered `notify` together with
            // `user_data` and guarantees they stay usable for the context's lifetime
            unsafe {
                notify(
                    errinfo.as_ptr(),
                    private_info.as_ptr().cast(),
                    private_info.len(),
                    self.user_data as *mut c_void,
                );
            }
        }
    }

    // =========================================================================
    // Device Aggregates
    // =========================================================================

    /// `true` if `device` is a member
    pub fn has_device(&self, device: *const Device) -> bool {
        self.devices.iter().any(|d| d.as_ptr() == device)
    }

    /// Member device at `device`, or `InvalidDevice`
    pub(crate) fn member(&self, device: *const Device) -> Result<Arc<Device>> {
        self.devices
            .iter()
            .find(|d| d.as_ptr() == device)
            .map(|d| Arc::clone(d.arc()))
            .ok_or(Error::InvalidDevice)
    }

    fn members(&self, devices: &[Arc<Device>]) -> Result<Vec<Arc<Device>>> {
        if devices.is_empty() {
            return Err(Error::InvalidValue);
        }
        devices.iter().map(|d| self.member(Arc::as_ptr(d))).collect()
    }

    /// `true` if any member device supports images
    pub fn supports_images(&self) -> bool {
        self.devices.iter().any(|d| d.supports_images())
    }

    /// `true` if any member device accepts an intermediate language
    pub fn supports_il(&self) -> bool {
        self.devices.iter().any(|d| d.supports_il())
    }

    /// `true` if any member device provides the built-in kernel `name`
    pub fn supports_built_in_kernel(&self, name: &str) -> bool {
        self.devices.iter().any(|d| d.supports_built_in_kernel(name))
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// `true` if the queue at `queue` belongs to this context
    pub fn has_command_queue(&self, queue: *const CommandQueue) -> bool {
        self.command_queues.contains(queue)
    }

    /// `true` if the memory object at `memory` belongs to this context
    pub fn has_memory(&self, memory: *const Memory) -> bool {
        self.memories.contains(memory)
    }

    /// `true` if the sampler at `sampler` belongs to this context
    pub fn has_sampler(&self, sampler: *const Sampler) -> bool {
        self.samplers.contains(sampler)
    }

    /// `true` if the program at `program` belongs to this context
    pub fn has_program(&self, program: *const Program) -> bool {
        self.programs.contains(program)
    }

    /// Number of live command queues
    pub fn num_command_queues(&self) -> usize {
        self.command_queues.len()
    }

    /// Number of live memory objects
    pub fn num_memories(&self) -> usize {
        self.memories.len()
    }

    /// Number of live samplers
    pub fn num_samplers(&self) -> usize {
        self.samplers.len()
    }

    /// Number of live programs
    pub fn num_programs(&self) -> usize {
        self.programs.len()
    }

    pub(crate) fn find_command_queue(&self, queue: *const CommandQueue) -> Option<Arc<CommandQueue>> {
        self.command_queues.find(queue)
    }

    pub(crate) fn find_memory(&self, memory: *const Memory) -> Option<Arc<Memory>> {
        self.memories.find(memory)
    }

    pub(crate) fn find_sampler(&self, sampler: *const Sampler) -> Option<Arc<Sampler>> {
        self.samplers.find(sampler)
    }

    pub(crate) fn find_program(&self, program: *const Program) -> Option<Arc<Program>> {
        self.programs.find(program)
    }

    // =========================================================================
    // Command Queues
    // =========================================================================

    /// `clCreateCommandQueue`
    pub fn create_command_queue(
        self: &Arc<Self>,
        device: &Arc<Device>,
        properties: cl_command_queue_properties,
    ) -> Result<Arc<CommandQueue>> {
        let device = self.member(Arc::as_ptr(device))?;
        let queue = CommandQueue::new(self, device, properties)?;
        Ok(self.register(&self.command_queues, queue, "command queue"))
    }

    /// `clCreateCommandQueueWithProperties`
    pub fn create_command_queue_with_properties(
        self: &Arc<Self>,
        device: &Arc<Device>,
        properties: PropertyList<cl_queue_properties>,
    ) -> Result<Arc<CommandQueue>> {
        let device = self.member(Arc::as_ptr(device))?;
        let queue = CommandQueue::with_properties(self, device, properties)?;
        Ok(self.register(&self.command_queues, queue, "command queue"))
    }

    // =========================================================================
    // Memory
    // =========================================================================

    /// `clCreateBuffer` / `clCreateBufferWithProperties`
    pub fn create_buffer(
        self: &Arc<Self>,
        properties: PropertyList<cl_mem_properties>,
        flags: cl_mem_flags,
        size: usize,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Memory>> {
        let flags = memory::parse_flags(flags)?;
        if size == 0 {
            return Err(Error::InvalidBufferSize);
        }
        memory::check_host_ptr(flags, host_ptr)?;
        memory::check_properties(&properties)?;

        let buffer = Memory::new_buffer(self, properties, flags, size, host_ptr)?;
        Ok(self.register(&self.memories, buffer, "buffer"))
    }

    /// `clCreateImage` / `clCreateImageWithProperties`
    pub fn create_image(
        self: &Arc<Self>,
        properties: PropertyList<cl_mem_properties>,
        flags: cl_mem_flags,
        format: &cl_image_format,
        desc: &cl_image_desc,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Memory>> {
        if !self.supports_images() {
            return Err(Error::InvalidOperation);
        }
        let flags = memory::parse_flags(flags)?;
        let element_size = format
            .element_size()
            .ok_or(Error::InvalidImageFormatDescriptor)?;
        let descriptor = ImageDescriptor::new(desc, element_size, !host_ptr.is_null())?;
        memory::check_host_ptr(flags, host_ptr)?;
        memory::check_properties(&properties)?;

        let image = Memory::new_image(self, properties, flags, *format, descriptor, host_ptr)?;
        Ok(self.register(&self.memories, image, "image"))
    }

    /// `clCreateImage2D`
    pub fn create_image_2d(
        self: &Arc<Self>,
        flags: cl_mem_flags,
        format: &cl_image_format,
        width: usize,
        height: usize,
        row_pitch: usize,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Memory>> {
        let desc = cl_image_desc {
            image_type: CL_MEM_OBJECT_IMAGE2D,
            image_width: width,
            image_height: height,
            image_depth: 0,
            image_array_size: 0,
            image_row_pitch: row_pitch,
            image_slice_pitch: 0,
            num_mip_levels: 0,
            num_samples: 0,
            mem_object: core::ptr::null_mut(),
        };
        self.create_image(PropertyList::empty(), flags, format, &desc, host_ptr)
    }

    /// `clCreateImage3D`
    pub fn create_image_3d(
        self: &Arc<Self>,
        flags: cl_mem_flags,
        format: &cl_image_format,
        width: usize,
        height: usize,
        depth: usize,
        row_pitch: usize,
        slice_pitch: usize,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Memory>> {
        if !self.supports_images() {
            return Err(Error::InvalidOperation);
        }
        // The legacy entry point only takes true volumes
        if depth <= 1 {
            return Err(Error::InvalidImageSize);
        }
        let desc = cl_image_desc {
            image_type: CL_MEM_OBJECT_IMAGE3D,
            image_width: width,
            image_height: height,
            image_depth: depth,
            image_array_size: 0,
            image_row_pitch: row_pitch,
            image_slice_pitch: slice_pitch,
            num_mip_levels: 0,
            num_samples: 0,
            mem_object: core::ptr::null_mut(),
        };
        self.create_image(PropertyList::empty(), flags, format, &desc, host_ptr)
    }

    // =========================================================================
    // Samplers
    // =========================================================================

    /// `clCreateSampler`
    pub fn create_sampler(
        self: &Arc<Self>,
        normalized_coords: cl_bool,
        addressing_mode: cl_addressing_mode,
        filter_mode: cl_filter_mode,
    ) -> Result<Arc<Sampler>> {
        if !self.supports_images() {
            return Err(Error::InvalidOperation);
        }
        let sampler = Sampler::new(
            self,
            PropertyList::empty(),
            normalized_coords != CL_FALSE,
            AddressingMode::try_from(addressing_mode)?,
            FilterMode::try_from(filter_mode)?,
        )?;
        Ok(self.register(&self.samplers, sampler, "sampler"))
    }

    /// `clCreateSamplerWithProperties`
    pub fn create_sampler_with_properties(
        self: &Arc<Self>,
        properties: PropertyList<cl_sampler_properties>,
    ) -> Result<Arc<Sampler>> {
        if !self.supports_images() {
            return Err(Error::InvalidOperation);
        }
        let sampler = Sampler::with_properties(self, properties)?;
        Ok(self.register(&self.samplers, sampler, "sampler"))
    }

    // =========================================================================
    // Programs
    // =========================================================================

    /// `clCreateProgramWithSource`
    pub fn create_program_with_source(self: &Arc<Self>, strings: &[&[u8]]) -> Result<Arc<Program>> {
        if strings.is_empty() {
            return Err(Error::InvalidValue);
        }
        let source = strings.concat();
        let program = Program::with_source(self, source)?;
        Ok(self.register(&self.programs, program, "program"))
    }

    /// `clCreateProgramWithIL`
    pub fn create_program_with_il(self: &Arc<Self>, il: &[u8]) -> Result<Arc<Program>> {
        if !self.supports_il() {
            return Err(Error::InvalidOperation);
        }
        if il.is_empty() {
            return Err(Error::InvalidValue);
        }
        let program = Program::with_il(self, il.to_vec())?;
        Ok(self.register(&self.programs, program, "program"))
    }

    /// `clCreateProgramWithBinary`
    pub fn create_program_with_binary(
        self: &Arc<Self>,
        devices: &[Arc<Device>],
        binaries: &[&[u8]],
    ) -> Result<Arc<Program>> {
        let devices = self.members(devices)?;
        if binaries.len() != devices.len() || binaries.iter().any(|b| b.is_empty()) {
            return Err(Error::InvalidValue);
        }
        let binaries = binaries.iter().map(|b| b.to_vec()).collect();
        let program = Program::with_binaries(self, devices, binaries)?;
        Ok(self.register(&self.programs, program, "program"))
    }

    /// `clCreateProgramWithBuiltInKernels`
    pub fn create_program_with_built_in_kernels(
        self: &Arc<Self>,
        devices: &[Arc<Device>],
        kernel_names: &str,
    ) -> Result<Arc<Program>> {
        let devices = self.members(devices)?;
        let mut names = kernel_names.split(';').map(str::trim).peekable();
        if names.peek().map_or(true, |name| name.is_empty()) {
            return Err(Error::InvalidValue);
        }
        for name in names {
            if !self.supports_built_in_kernel(name) {
                log::trace!("Built-in kernel {:?} not provided by any device", name);
                return Err(Error::InvalidValue);
            }
        }
        let program = Program::with_built_in_kernels(self, devices, String::from(kernel_names))?;
        Ok(self.register(&self.programs, program, "program"))
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Erase a command queue whose reference count reached zero
    pub(crate) fn destroy_command_queue(&self, queue: &CommandQueue) {
        drop(self.command_queues.take(queue));
    }

    /// Erase a memory object whose reference count reached zero
    pub(crate) fn destroy_memory(&self, memory: &Memory) {
        drop(self.memories.take(memory));
    }

    /// Erase a sampler whose reference count reached zero
    pub(crate) fn destroy_sampler(&self, sampler: &Sampler) {
        drop(self.samplers.take(sampler));
    }

    /// Erase a program whose reference count reached zero
    pub(crate) fn destroy_program(&self, program: &Program) {
        drop(self.programs.take(program));
    }

    fn register<T>(&self, list: &ObjectList<T>, object: Arc<T>, kind: &str) -> Arc<T> {
        log::debug!("Context {:p}: created {} {:p}", self, kind, Arc::as_ptr(&object));
        list.insert(Arc::clone(&object));
        object
    }
}

/// Validate a context property list, returning `CL_CONTEXT_INTEROP_USER_SYNC`
fn parse_properties(
    platform: &Platform,
    properties: &PropertyList<cl_context_properties>,
) -> Result<bool> {
    properties.check_unique_keys(Error::InvalidProperty)?;

    let mut user_sync = false;
    for (key, value) in properties.pairs() {
        match key {
            CL_CONTEXT_PLATFORM => {
                if value as usize != platform.handle() as usize {
                    return Err(Error::InvalidPlatform);
                }
            }
            CL_CONTEXT_INTEROP_USER_SYNC => user_sync = value as cl_bool != CL_FALSE,
            _ => {
                log::trace!("Unknown context property {:#x}", key);
                return Err(Error::InvalidProperty);
            }
        }
    }
    Ok(user_sync)
}

impl RefCounted for Context {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        let released = self.refs.remove_ref();
        if released {
            if let Some(platform) = self.platform.upgrade() {
                platform.destroy_context(self);
            }
        }
        released
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        log::debug!("Destroying context {:p}", self);
    }
}

// =============================================================================
// INFO
// =============================================================================

cl_enum! {
    /// `clGetContextInfo` parameters
    pub enum ContextParam {
        /// `CL_CONTEXT_REFERENCE_COUNT`
        ReferenceCount = CL_CONTEXT_REFERENCE_COUNT,
        /// `CL_CONTEXT_DEVICES`
        Devices = CL_CONTEXT_DEVICES,
        /// `CL_CONTEXT_PROPERTIES`
        Properties = CL_CONTEXT_PROPERTIES,
        /// `CL_CONTEXT_NUM_DEVICES`
        NumDevices = CL_CONTEXT_NUM_DEVICES,
    }
}

impl GetInfo for Context {
    type Param = ContextParam;

    fn info(&self, param: ContextParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            ContextParam::ReferenceCount => InfoValue::Uint(self.refs.count()),
            ContextParam::Devices => InfoValue::handles(self.devices.iter().map(|d| d.as_ptr())),
            ContextParam::Properties => InfoValue::Bytes(self.properties.as_bytes()),
            ContextParam::NumDevices => InfoValue::Uint(self.devices.len() as cl_uint),
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("refs", &self.refs)
            .field("devices", &self.devices.len())
            .field("command_queues", &self.command_queues)
            .field("memories", &self.memories)
            .field("samplers", &self.samplers)
            .field("programs", &self.programs)
            .finish()
    }
}
