//! # C Entry Points
//!
//! The OpenCL functions an ICD exports. Every function resolves its handles
//! through the registry before touching them, converts the typed result to
//! a `cl_int` and never panics.
//!
//! ## Conventions
//!
//! ```text
//! clCreateX(..., errcode_ret) ─▶ handle or null, code written to errcode_ret
//! clRetainX / clReleaseX       ─▶ code
//! clGetXInfo                   ─▶ code, answer copied through write_info
//! ```
//!
//! Entry points introduced after OpenCL 1.2 check the owning platform's
//! version and report `CL_INVALID_CONTEXT` when it is too old.

#![allow(non_snake_case)]

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ffi::{c_char, c_void, CStr};
use core::ptr;

use prism_core::error::CL_SUCCESS;
use prism_core::types::*;
use prism_core::{Error, GetInfo, PropertyList, RefCounted, Result};

use crate::command_queue::CommandQueue;
use crate::context::{Context, ContextErrorCallback};
use crate::device::Device;
use crate::memory::Memory;
use crate::platform::Platform;
use crate::program::Program;
use crate::sampler::Sampler;

// =============================================================================
// HELPERS
// =============================================================================

/// Store `code` in an optional `errcode_ret`
///
/// # Safety
/// `errcode_ret` must be null or valid for one write.
unsafe fn set_errcode(errcode_ret: *mut cl_int, code: cl_int) {
    // SAFETY: caller contract
    if let Some(slot) = unsafe { errcode_ret.as_mut() } {
        *slot = code;
    }
}

/// Turn a creation result into the handle returned to C
///
/// # Safety
/// `errcode_ret` must be null or valid for one write.
unsafe fn created<T>(result: Result<*mut T>, errcode_ret: *mut cl_int) -> *mut T {
    let (handle, code) = match result {
        Ok(handle) => (handle, CL_SUCCESS),
        Err(e) => (ptr::null_mut(), e.code()),
    };
    // SAFETY: forwarded caller contract
    unsafe { set_errcode(errcode_ret, code) };
    handle
}

/// Borrow a C array, rejecting a null pointer with a non-zero length
///
/// # Safety
/// A non-null `ptr` must be valid for `len` reads.
unsafe fn slice_from_raw<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T]> {
    match (ptr.is_null(), len) {
        (_, 0) => Ok(&[]),
        (true, _) => Err(Error::InvalidValue),
        // SAFETY: caller contract
        (false, len) => Ok(unsafe { core::slice::from_raw_parts(ptr, len) }),
    }
}

/// Fill a caller-supplied handle array the way `clGet*IDs` does
///
/// # Safety
/// `out` must be null or valid for `num_entries` writes, `num_ret` null or
/// valid for one write.
unsafe fn write_handles<H: Copy>(
    handles: &[H],
    num_entries: cl_uint,
    out: *mut H,
    num_ret: *mut cl_uint,
) -> Result<()> {
    if (out.is_null() && num_ret.is_null()) || (!out.is_null() && num_entries == 0) {
        return Err(Error::InvalidValue);
    }
    if !out.is_null() {
        for (i, handle) in handles.iter().take(num_entries as usize).enumerate() {
            // SAFETY: `i < num_entries`, within the caller's array
            unsafe { out.add(i).write(*handle) };
        }
    }
    // SAFETY: caller contract
    if let Some(num_ret) = unsafe { num_ret.as_mut() } {
        *num_ret = handles.len() as cl_uint;
    }
    Ok(())
}

/// Resolve a C device list
///
/// # Safety
/// A non-null `devices` must be valid for `num_devices` reads.
unsafe fn devices_from_raw(devices: *const cl_device_id, num_devices: cl_uint) -> Result<Vec<Arc<Device>>> {
    if devices.is_null() || num_devices == 0 {
        return Err(Error::InvalidValue);
    }
    // SAFETY: caller contract
    let handles = unsafe { slice_from_raw(devices, num_devices as usize)? };
    handles
        .iter()
        .map(|&handle| Device::lookup(handle).ok_or(Error::InvalidDevice))
        .collect()
}

/// A null platform selects the first registered one
fn platform_or_default(handle: cl_platform_id) -> Result<Arc<Platform>> {
    let platform = if handle.is_null() {
        Platform::default_platform()
    } else {
        Platform::lookup(handle)
    };
    platform.ok_or(Error::InvalidPlatform)
}

/// A live context whose platform implements at least `major.minor`
fn context_at_least(handle: cl_context, major: u32, minor: u32) -> Result<Arc<Context>> {
    Context::lookup(handle)
        .filter(|context| {
            context
                .platform()
                .is_some_and(|platform| platform.is_version_or_newer(major, minor))
        })
        .ok_or(Error::InvalidContext)
}

fn context(handle: cl_context) -> Result<Arc<Context>> {
    Context::lookup(handle).ok_or(Error::InvalidContext)
}

fn retain<T: RefCounted>(object: Option<Arc<T>>, invalid: Error) -> cl_int {
    match object {
        Some(object) => {
            object.retain();
            CL_SUCCESS
        }
        None => invalid.code(),
    }
}

fn release<T: RefCounted>(object: Option<Arc<T>>, invalid: Error) -> cl_int {
    match object {
        Some(object) => {
            // At zero the owner erases its entry; `object` is the last Arc
            // and drops here, outside every lock
            object.release();
            CL_SUCCESS
        }
        None => invalid.code(),
    }
}

/// # Safety
/// Same contract as [`prism_core::info::write_info`].
unsafe fn get_info<T: GetInfo>(
    object: Option<&T>,
    invalid: Error,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let Some(object) = object else {
        return invalid.code();
    };
    // SAFETY: forwarded caller contract
    Error::to_code(unsafe {
        object.get_info_raw(param_name, param_value_size, param_value, param_value_size_ret)
    })
}

// =============================================================================
// PLATFORMS AND DEVICES
// =============================================================================

/// `clGetPlatformIDs`
///
/// # Safety
/// `platforms` must be null or valid for `num_entries` writes,
/// `num_platforms` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clGetPlatformIDs(
    num_entries: cl_uint,
    platforms: *mut cl_platform_id,
    num_platforms: *mut cl_uint,
) -> cl_int {
    let handles: Vec<cl_platform_id> = Platform::platforms().iter().map(|p| p.handle()).collect();
    // SAFETY: forwarded caller contract
    Error::to_code(unsafe { write_handles(&handles, num_entries, platforms, num_platforms) })
}

/// `clGetPlatformInfo`
///
/// # Safety
/// `param_value` must be null or valid for `param_value_size` writes,
/// `param_value_size_ret` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clGetPlatformInfo(
    platform: cl_platform_id,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let platform = platform_or_default(platform).ok();
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            platform.as_deref(),
            Error::InvalidPlatform,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

/// `clGetDeviceIDs`
///
/// # Safety
/// `devices` must be null or valid for `num_entries` writes, `num_devices`
/// null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clGetDeviceIDs(
    platform: cl_platform_id,
    device_type: cl_device_type,
    num_entries: cl_uint,
    devices: *mut cl_device_id,
    num_devices: *mut cl_uint,
) -> cl_int {
    let result = platform_or_default(platform).and_then(|platform| {
        let device_type = DeviceType::from_selector(device_type).ok_or(Error::InvalidDeviceType)?;
        let handles: Vec<cl_device_id> = platform
            .devices_of_type(device_type)
            .iter()
            .map(|d| d.handle())
            .collect();
        if handles.is_empty() {
            return Err(Error::DeviceNotFound);
        }
        // SAFETY: forwarded caller contract
        unsafe { write_handles(&handles, num_entries, devices, num_devices) }
    });
    Error::to_code(result)
}

/// `clGetDeviceInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetDeviceInfo(
    device: cl_device_id,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let device = Device::lookup(device);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            device.as_deref(),
            Error::InvalidDevice,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

// =============================================================================
// CONTEXTS
// =============================================================================

/// Platform named by `CL_CONTEXT_PLATFORM`, if the list has one
fn property_platform(properties: &PropertyList<cl_context_properties>) -> Result<Option<Arc<Platform>>> {
    match properties.get(CL_CONTEXT_PLATFORM) {
        Some(handle) => Platform::lookup(handle as cl_platform_id)
            .map(Some)
            .ok_or(Error::InvalidPlatform),
        None => Ok(None),
    }
}

/// `clCreateContext`
///
/// # Safety
/// `properties` must be null or a zero-terminated list, `devices` valid for
/// `num_devices` reads, `errcode_ret` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateContext(
    properties: *const cl_context_properties,
    num_devices: cl_uint,
    devices: *const cl_device_id,
    pfn_notify: Option<ContextErrorCallback>,
    user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_context {
    // SAFETY: caller contract
    let properties = unsafe { PropertyList::from_raw(properties) };
    // SAFETY: caller contract
    let result = unsafe { devices_from_raw(devices, num_devices) }.and_then(|devices| {
        let platform = match property_platform(&properties)? {
            Some(platform) => platform,
            None => Platform::lookup(devices[0].platform_handle()).ok_or(Error::InvalidDevice)?,
        };
        Ok(platform
            .create_context(properties, &devices, pfn_notify, user_data)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateContextFromType`
///
/// # Safety
/// See [`clCreateContext`].
#[no_mangle]
pub unsafe extern "C" fn clCreateContextFromType(
    properties: *const cl_context_properties,
    device_type: cl_device_type,
    pfn_notify: Option<ContextErrorCallback>,
    user_data: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_context {
    // SAFETY: caller contract
    let properties = unsafe { PropertyList::from_raw(properties) };
    let result = property_platform(&properties).and_then(|platform| {
        let platform = match platform {
            Some(platform) => platform,
            None => Platform::default_platform().ok_or(Error::InvalidPlatform)?,
        };
        let device_type = DeviceType::from_selector(device_type).ok_or(Error::InvalidDeviceType)?;
        Ok(platform
            .create_context_from_type(properties, device_type, pfn_notify, user_data)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clRetainContext`
#[no_mangle]
pub extern "C" fn clRetainContext(context: cl_context) -> cl_int {
    retain(Context::lookup(context), Error::InvalidContext)
}

/// `clReleaseContext`
#[no_mangle]
pub extern "C" fn clReleaseContext(context: cl_context) -> cl_int {
    release(Context::lookup(context), Error::InvalidContext)
}

/// `clGetContextInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetContextInfo(
    context: cl_context,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let context = Context::lookup(context);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            context.as_deref(),
            Error::InvalidContext,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

// =============================================================================
// COMMAND QUEUES
// =============================================================================

/// `clCreateCommandQueue`
///
/// # Safety
/// `errcode_ret` must be null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateCommandQueue(
    context: cl_context,
    device: cl_device_id,
    properties: cl_command_queue_properties,
    errcode_ret: *mut cl_int,
) -> cl_command_queue {
    let result = self::context(context).and_then(|context| {
        let device = Device::lookup(device).ok_or(Error::InvalidDevice)?;
        Ok(context.create_command_queue(&device, properties)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateCommandQueueWithProperties`
///
/// # Safety
/// `properties` must be null or a zero-terminated list, `errcode_ret` null
/// or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateCommandQueueWithProperties(
    context: cl_context,
    device: cl_device_id,
    properties: *const cl_queue_properties,
    errcode_ret: *mut cl_int,
) -> cl_command_queue {
    let result = context_at_least(context, 2, 0).and_then(|context| {
        let device = Device::lookup(device).ok_or(Error::InvalidDevice)?;
        // SAFETY: caller contract
        let properties = unsafe { PropertyList::from_raw(properties) };
        Ok(context.create_command_queue_with_properties(&device, properties)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clRetainCommandQueue`
#[no_mangle]
pub extern "C" fn clRetainCommandQueue(command_queue: cl_command_queue) -> cl_int {
    retain(CommandQueue::lookup(command_queue), Error::InvalidCommandQueue)
}

/// `clReleaseCommandQueue`
#[no_mangle]
pub extern "C" fn clReleaseCommandQueue(command_queue: cl_command_queue) -> cl_int {
    release(CommandQueue::lookup(command_queue), Error::InvalidCommandQueue)
}

/// `clGetCommandQueueInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetCommandQueueInfo(
    command_queue: cl_command_queue,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let queue = CommandQueue::lookup(command_queue);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            queue.as_deref(),
            Error::InvalidCommandQueue,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

/// `clSetCommandQueueProperty`
///
/// `old_properties` receives the previous set even when the change is
/// rejected.
///
/// # Safety
/// `old_properties` must be null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clSetCommandQueueProperty(
    command_queue: cl_command_queue,
    properties: cl_command_queue_properties,
    enable: cl_bool,
    old_properties: *mut cl_command_queue_properties,
) -> cl_int {
    let Some(queue) = CommandQueue::lookup(command_queue) else {
        return Error::InvalidCommandQueue.code();
    };
    let outcome = queue.set_property(
        CommandQueueProperties::from_bits_retain(properties),
        enable != CL_FALSE,
    );
    // SAFETY: caller contract
    if let Some(old) = unsafe { old_properties.as_mut() } {
        *old = outcome.old.bits();
    }
    Error::to_code(outcome.result)
}

// =============================================================================
// MEMORY OBJECTS
// =============================================================================

/// `clCreateBuffer`
///
/// # Safety
/// `host_ptr` must satisfy the usual OpenCL contract for `flags`,
/// `errcode_ret` must be null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateBuffer(
    context: cl_context,
    flags: cl_mem_flags,
    size: usize,
    host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    let result = self::context(context).and_then(|context| {
        Ok(context
            .create_buffer(PropertyList::empty(), flags, size, host_ptr)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateImage`
///
/// # Safety
/// `image_format` and `image_desc` must be null or valid for reads,
/// `errcode_ret` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateImage(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_desc: *const cl_image_desc,
    host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    let result = context_at_least(context, 1, 2).and_then(|context| {
        // SAFETY: caller contract
        let format = unsafe { image_format.as_ref() }.ok_or(Error::InvalidImageFormatDescriptor)?;
        // SAFETY: caller contract
        let desc = unsafe { image_desc.as_ref() }.ok_or(Error::InvalidImageDescriptor)?;
        Ok(context
            .create_image(PropertyList::empty(), flags, format, desc, host_ptr)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateImage2D`
///
/// # Safety
/// See [`clCreateImage`].
#[no_mangle]
pub unsafe extern "C" fn clCreateImage2D(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_width: usize,
    image_height: usize,
    image_row_pitch: usize,
    host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    let result = self::context(context).and_then(|context| {
        // SAFETY: caller contract
        let format = unsafe { image_format.as_ref() }.ok_or(Error::InvalidImageFormatDescriptor)?;
        Ok(context
            .create_image_2d(flags, format, image_width, image_height, image_row_pitch, host_ptr)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateImage3D`
///
/// # Safety
/// See [`clCreateImage`].
#[no_mangle]
pub unsafe extern "C" fn clCreateImage3D(
    context: cl_context,
    flags: cl_mem_flags,
    image_format: *const cl_image_format,
    image_width: usize,
    image_height: usize,
    image_depth: usize,
    image_row_pitch: usize,
    image_slice_pitch: usize,
    host_ptr: *mut c_void,
    errcode_ret: *mut cl_int,
) -> cl_mem {
    let result = self::context(context).and_then(|context| {
        // SAFETY: caller contract
        let format = unsafe { image_format.as_ref() }.ok_or(Error::InvalidImageFormatDescriptor)?;
        Ok(context
            .create_image_3d(
                flags,
                format,
                image_width,
                image_height,
                image_depth,
                image_row_pitch,
                image_slice_pitch,
                host_ptr,
            )?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clRetainMemObject`
#[no_mangle]
pub extern "C" fn clRetainMemObject(memobj: cl_mem) -> cl_int {
    retain(Memory::lookup(memobj), Error::InvalidMemObject)
}

/// `clReleaseMemObject`
#[no_mangle]
pub extern "C" fn clReleaseMemObject(memobj: cl_mem) -> cl_int {
    release(Memory::lookup(memobj), Error::InvalidMemObject)
}

/// `clGetMemObjectInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetMemObjectInfo(
    memobj: cl_mem,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let memory = Memory::lookup(memobj);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            memory.as_deref(),
            Error::InvalidMemObject,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

/// `clGetImageInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetImageInfo(
    image: cl_mem,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let memory = Memory::lookup(image);
    let image = memory.as_ref().and_then(|memory| memory.image());
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            image.as_ref(),
            Error::InvalidMemObject,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

// =============================================================================
// SAMPLERS
// =============================================================================

/// `clCreateSampler`
///
/// # Safety
/// `errcode_ret` must be null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateSampler(
    context: cl_context,
    normalized_coords: cl_bool,
    addressing_mode: cl_addressing_mode,
    filter_mode: cl_filter_mode,
    errcode_ret: *mut cl_int,
) -> cl_sampler {
    let result = self::context(context).and_then(|context| {
        Ok(context
            .create_sampler(normalized_coords, addressing_mode, filter_mode)?
            .handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateSamplerWithProperties`
///
/// # Safety
/// `sampler_properties` must be null or a zero-terminated list,
/// `errcode_ret` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateSamplerWithProperties(
    context: cl_context,
    sampler_properties: *const cl_sampler_properties,
    errcode_ret: *mut cl_int,
) -> cl_sampler {
    let result = context_at_least(context, 2, 0).and_then(|context| {
        // SAFETY: caller contract
        let properties = unsafe { PropertyList::from_raw(sampler_properties) };
        Ok(context.create_sampler_with_properties(properties)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clRetainSampler`
#[no_mangle]
pub extern "C" fn clRetainSampler(sampler: cl_sampler) -> cl_int {
    retain(Sampler::lookup(sampler), Error::InvalidSampler)
}

/// `clReleaseSampler`
#[no_mangle]
pub extern "C" fn clReleaseSampler(sampler: cl_sampler) -> cl_int {
    release(Sampler::lookup(sampler), Error::InvalidSampler)
}

/// `clGetSamplerInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetSamplerInfo(
    sampler: cl_sampler,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let sampler = Sampler::lookup(sampler);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            sampler.as_deref(),
            Error::InvalidSampler,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

// =============================================================================
// PROGRAMS
// =============================================================================

/// `clCreateProgramWithSource`
///
/// A null `lengths`, or a zero entry in it, marks a NUL-terminated string.
///
/// # Safety
/// `strings` must be valid for `count` reads, each string valid for its
/// length (or NUL-terminated), `lengths` null or valid for `count` reads.
#[no_mangle]
pub unsafe extern "C" fn clCreateProgramWithSource(
    context: cl_context,
    count: cl_uint,
    strings: *const *const c_char,
    lengths: *const usize,
    errcode_ret: *mut cl_int,
) -> cl_program {
    let result = self::context(context).and_then(|context| {
        if strings.is_null() || count == 0 {
            return Err(Error::InvalidValue);
        }
        // SAFETY: caller contract
        let strings = unsafe { slice_from_raw(strings, count as usize)? };
        let lengths: &[usize] = if lengths.is_null() {
            &[]
        } else {
            // SAFETY: caller contract
            unsafe { slice_from_raw(lengths, count as usize)? }
        };

        let mut sources: Vec<&[u8]> = Vec::with_capacity(strings.len());
        for (i, &string) in strings.iter().enumerate() {
            if string.is_null() {
                return Err(Error::InvalidValue);
            }
            let source = match lengths.get(i).copied().unwrap_or(0) {
                // SAFETY: caller guarantees NUL termination when no length is given
                0 => unsafe { CStr::from_ptr(string) }.to_bytes(),
                // SAFETY: caller guarantees `len` readable bytes
                len => unsafe { core::slice::from_raw_parts(string.cast::<u8>(), len) },
            };
            sources.push(source);
        }
        Ok(context.create_program_with_source(&sources)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateProgramWithIL`
///
/// # Safety
/// `il` must be valid for `length` reads, `errcode_ret` null or valid for
/// one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateProgramWithIL(
    context: cl_context,
    il: *const c_void,
    length: usize,
    errcode_ret: *mut cl_int,
) -> cl_program {
    let result = context_at_least(context, 2, 1).and_then(|context| {
        if il.is_null() {
            return Err(Error::InvalidValue);
        }
        // SAFETY: caller contract
        let il = unsafe { slice_from_raw(il.cast::<u8>(), length)? };
        Ok(context.create_program_with_il(il)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateProgramWithBinary`
///
/// # Safety
/// `device_list`, `lengths` and `binaries` must be valid for `num_devices`
/// reads, every binary for its length. `binary_status` must be null or
/// valid for `num_devices` writes, `errcode_ret` null or valid for one
/// write.
#[no_mangle]
pub unsafe extern "C" fn clCreateProgramWithBinary(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    lengths: *const usize,
    binaries: *const *const u8,
    binary_status: *mut cl_int,
    errcode_ret: *mut cl_int,
) -> cl_program {
    let result = self::context(context).and_then(|context| {
        // SAFETY: caller contract
        let devices = unsafe { devices_from_raw(device_list, num_devices)? };
        if lengths.is_null() || binaries.is_null() {
            return Err(Error::InvalidValue);
        }
        // SAFETY: caller contract
        let lengths = unsafe { slice_from_raw(lengths, devices.len())? };
        // SAFETY: caller contract
        let pointers = unsafe { slice_from_raw(binaries, devices.len())? };

        let mut images: Vec<&[u8]> = Vec::with_capacity(devices.len());
        let mut rejected = false;
        for (i, (&binary, &len)) in pointers.iter().zip(lengths).enumerate() {
            let valid = !binary.is_null() && len != 0;
            if !binary_status.is_null() {
                let status = if valid { CL_SUCCESS } else { Error::InvalidValue.code() };
                // SAFETY: caller guarantees `num_devices` writable entries
                unsafe { binary_status.add(i).write(status) };
            }
            if valid {
                // SAFETY: caller guarantees `len` readable bytes
                images.push(unsafe { core::slice::from_raw_parts(binary, len) });
            } else {
                rejected = true;
            }
        }
        if rejected {
            return Err(Error::InvalidValue);
        }
        Ok(context.create_program_with_binary(&devices, &images)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clCreateProgramWithBuiltInKernels`
///
/// # Safety
/// `device_list` must be valid for `num_devices` reads, `kernel_names` null
/// or NUL-terminated, `errcode_ret` null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn clCreateProgramWithBuiltInKernels(
    context: cl_context,
    num_devices: cl_uint,
    device_list: *const cl_device_id,
    kernel_names: *const c_char,
    errcode_ret: *mut cl_int,
) -> cl_program {
    let result = context_at_least(context, 1, 2).and_then(|context| {
        // SAFETY: caller contract
        let devices = unsafe { devices_from_raw(device_list, num_devices)? };
        if kernel_names.is_null() {
            return Err(Error::InvalidValue);
        }
        // SAFETY: caller contract
        let names = unsafe { CStr::from_ptr(kernel_names) }
            .to_str()
            .map_err(|_| Error::InvalidValue)?;
        Ok(context.create_program_with_built_in_kernels(&devices, names)?.handle())
    });
    // SAFETY: caller contract
    unsafe { created(result, errcode_ret) }
}

/// `clRetainProgram`
#[no_mangle]
pub extern "C" fn clRetainProgram(program: cl_program) -> cl_int {
    retain(Program::lookup(program), Error::InvalidProgram)
}

/// `clReleaseProgram`
#[no_mangle]
pub extern "C" fn clReleaseProgram(program: cl_program) -> cl_int {
    release(Program::lookup(program), Error::InvalidProgram)
}

/// `clGetProgramInfo`
///
/// # Safety
/// See [`clGetPlatformInfo`].
#[no_mangle]
pub unsafe extern "C" fn clGetProgramInfo(
    program: cl_program,
    param_name: cl_uint,
    param_value_size: usize,
    param_value: *mut c_void,
    param_value_size_ret: *mut usize,
) -> cl_int {
    let program = Program::lookup(program);
    // SAFETY: forwarded caller contract
    unsafe {
        get_info(
            program.as_deref(),
            Error::InvalidProgram,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}
