//! # Memory Objects
//!
//! Buffers and images. The frontend validates flags, host pointers and
//! image descriptors, keeps what the info queries report, and leaves the
//! storage itself to the backend.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::ffi::c_void;
use core::fmt;

use prism_core::types::*;
use prism_core::{cl_enum, Error, GetInfo, InfoValue, PropertyList, Ref, RefCount, RefCounted, Result};

use crate::backend::{BufferDesc, ImageDesc, MemoryImpl};
use crate::context::Context;
use crate::platform;

// =============================================================================
// VALIDATION
// =============================================================================

/// Parse `cl_mem_flags`, defaulting device access to read-write
pub(crate) fn parse_flags(raw: cl_mem_flags) -> Result<MemFlags> {
    let mut flags = MemFlags::from_bits(raw).ok_or(Error::InvalidValue)?;

    // At most one flag out of each exclusive group
    let exclusive = [
        flags & MemFlags::DEVICE_ACCESS,
        flags & MemFlags::HOST_ACCESS,
        flags & (MemFlags::USE_HOST_PTR | MemFlags::ALLOC_HOST_PTR),
        flags & MemFlags::HOST_PTR_USAGE,
    ];
    if exclusive.iter().any(|group| group.bits().count_ones() > 1) {
        return Err(Error::InvalidValue);
    }

    if (flags & MemFlags::DEVICE_ACCESS).is_empty() {
        flags |= MemFlags::READ_WRITE;
    }
    Ok(flags)
}

/// A host pointer is required exactly when the flags say it is used
pub(crate) fn check_host_ptr(flags: MemFlags, host_ptr: *mut c_void) -> Result<()> {
    let uses_host_ptr = flags.intersects(MemFlags::HOST_PTR_USAGE);
    if uses_host_ptr == host_ptr.is_null() {
        return Err(Error::InvalidHostPtr);
    }
    Ok(())
}

/// No memory property is defined; any key is rejected
pub(crate) fn check_properties(properties: &PropertyList<cl_mem_properties>) -> Result<()> {
    match properties.pairs().next() {
        Some((key, _)) => {
            log::trace!("Unknown memory property {:#x}", key);
            Err(Error::InvalidProperty)
        }
        None => Ok(()),
    }
}

// =============================================================================
// IMAGE DESCRIPTOR
// =============================================================================

/// Validated image geometry
///
/// Extents that do not apply to the image type are zero, pitches are
/// resolved to their effective values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Image type
    pub image_type: MemObjectType,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Depth in pixels
    pub depth: usize,
    /// Number of array layers
    pub array_size: usize,
    /// Bytes per row
    pub row_pitch: usize,
    /// Bytes per slice or layer
    pub slice_pitch: usize,
    /// Bytes per pixel
    pub element_size: usize,
}

impl ImageDescriptor {
    /// Validate `desc` for a format of `element_size` bytes
    ///
    /// Pitches may only be given along with a host pointer.
    pub fn new(desc: &cl_image_desc, element_size: usize, has_host_ptr: bool) -> Result<Self> {
        let image_type =
            MemObjectType::try_from(desc.image_type).map_err(|_| Error::InvalidImageDescriptor)?;
        if desc.num_mip_levels != 0 || desc.num_samples != 0 || !desc.mem_object.is_null() {
            return Err(Error::InvalidImageDescriptor);
        }

        let (has_height, has_depth, has_layers) = match image_type {
            MemObjectType::Image1D => (false, false, false),
            MemObjectType::Image1DArray => (false, false, true),
            MemObjectType::Image2D => (true, false, false),
            MemObjectType::Image2DArray => (true, false, true),
            MemObjectType::Image3D => (true, true, false),
            MemObjectType::Buffer | MemObjectType::Image1DBuffer => {
                return Err(Error::InvalidImageDescriptor);
            }
        };
        let has_slices = has_depth || has_layers;

        let width = desc.image_width;
        let height = if has_height { desc.image_height } else { 0 };
        let depth = if has_depth { desc.image_depth } else { 0 };
        let array_size = if has_layers { desc.image_array_size } else { 0 };
        if width == 0
            || (has_height && height == 0)
            || (has_depth && depth == 0)
            || (has_layers && array_size == 0)
        {
            return Err(Error::InvalidImageSize);
        }

        if !has_host_ptr && (desc.image_row_pitch != 0 || desc.image_slice_pitch != 0) {
            return Err(Error::InvalidImageDescriptor);
        }

        let min_row_pitch = width
            .checked_mul(element_size)
            .ok_or(Error::InvalidImageSize)?;
        let row_pitch = match desc.image_row_pitch {
            0 => min_row_pitch,
            pitch if pitch < min_row_pitch || pitch % element_size != 0 => {
                return Err(Error::InvalidImageDescriptor);
            }
            pitch => pitch,
        };

        let slice_pitch = if has_slices {
            let min_slice_pitch = row_pitch
                .checked_mul(height.max(1))
                .ok_or(Error::InvalidImageSize)?;
            match desc.image_slice_pitch {
                0 => min_slice_pitch,
                pitch if pitch < min_slice_pitch || pitch % row_pitch != 0 => {
                    return Err(Error::InvalidImageDescriptor);
                }
                pitch => pitch,
            }
        } else {
            0
        };

        let descriptor = Self {
            image_type,
            width,
            height,
            depth,
            array_size,
            row_pitch,
            slice_pitch,
            element_size,
        };
        descriptor.checked_size().ok_or(Error::InvalidImageSize)?;
        Ok(descriptor)
    }

    fn checked_size(&self) -> Option<usize> {
        match self.image_type {
            MemObjectType::Image1D => Some(self.row_pitch),
            MemObjectType::Image2D => self.row_pitch.checked_mul(self.height),
            MemObjectType::Image3D => self.slice_pitch.checked_mul(self.depth),
            MemObjectType::Image1DArray | MemObjectType::Image2DArray => {
                self.slice_pitch.checked_mul(self.array_size)
            }
            MemObjectType::Buffer | MemObjectType::Image1DBuffer => None,
        }
    }

    /// Total size in bytes
    pub fn size(&self) -> usize {
        self.checked_size().unwrap_or(0)
    }
}

// =============================================================================
// MEMORY OBJECT
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ImageState {
    format: cl_image_format,
    descriptor: ImageDescriptor,
}

/// An OpenCL memory object
#[repr(C)]
pub struct Memory {
    dispatch: IcdDispatch,
    refs: RefCount,
    context: Ref<Context>,
    mem_type: MemObjectType,
    flags: MemFlags,
    size: usize,
    /// Reported only for `USE_HOST_PTR`
    host_ptr: usize,
    properties: PropertyList<cl_mem_properties>,
    image: Option<ImageState>,
    imp: Box<dyn MemoryImpl>,
}

static_assertions::const_assert_eq!(core::mem::offset_of!(Memory, dispatch), 0);
static_assertions::assert_impl_all!(Memory: Send, Sync);

impl Memory {
    pub(crate) fn new_buffer(
        context: &Arc<Context>,
        properties: PropertyList<cl_mem_properties>,
        flags: MemFlags,
        size: usize,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Self>> {
        let desc = BufferDesc {
            flags,
            size,
            host_ptr,
            properties: properties.as_slice(),
        };
        let imp = context.backend().create_buffer(&desc).map_err(|e| {
            log::warn!("Backend failed to create buffer of {} bytes: {}", size, e);
            e
        })?;

        Ok(Arc::new(Self::with_parts(
            context,
            MemObjectType::Buffer,
            flags,
            size,
            host_ptr,
            properties,
            None,
            imp,
        )))
    }

    pub(crate) fn new_image(
        context: &Arc<Context>,
        properties: PropertyList<cl_mem_properties>,
        flags: MemFlags,
        format: cl_image_format,
        descriptor: ImageDescriptor,
        host_ptr: *mut c_void,
    ) -> Result<Arc<Self>> {
        let desc = ImageDesc {
            flags,
            format,
            image: &descriptor,
            host_ptr,
            properties: properties.as_slice(),
        };
        let imp = context.backend().create_image(&desc).map_err(|e| {
            log::warn!("Backend failed to create {:?}: {}", descriptor.image_type, e);
            e
        })?;

        Ok(Arc::new(Self::with_parts(
            context,
            descriptor.image_type,
            flags,
            descriptor.size(),
            host_ptr,
            properties,
            Some(ImageState { format, descriptor }),
            imp,
        )))
    }

    fn with_parts(
        context: &Arc<Context>,
        mem_type: MemObjectType,
        flags: MemFlags,
        size: usize,
        host_ptr: *mut c_void,
        properties: PropertyList<cl_mem_properties>,
        image: Option<ImageState>,
        imp: Box<dyn MemoryImpl>,
    ) -> Self {
        let host_ptr = if flags.contains(MemFlags::USE_HOST_PTR) {
            host_ptr as usize
        } else {
            0
        };
        Self {
            dispatch: context.dispatch(),
            refs: RefCount::new(),
            context: Ref::new(Arc::clone(context)),
            mem_type,
            flags,
            size,
            host_ptr,
            properties,
            image,
            imp,
        }
    }

    /// Handle given to the application
    pub fn handle(&self) -> cl_mem {
        self as *const Self as cl_mem
    }

    /// The live memory object behind `handle`, if any
    pub fn lookup(handle: cl_mem) -> Option<Arc<Self>> {
        let ptr = handle as *const Self;
        platform::scan(|p| p.scan_contexts(|c| c.find_memory(ptr)))
    }

    /// `true` if `handle` names a live memory object
    pub fn is_valid(handle: cl_mem) -> bool {
        Self::lookup(handle).is_some()
    }

    /// Owning context
    pub fn context(&self) -> &Arc<Context> {
        self.context.arc()
    }

    /// Object type
    pub fn mem_type(&self) -> MemObjectType {
        self.mem_type
    }

    /// Flags, device access defaulted
    pub fn flags(&self) -> MemFlags {
        self.flags
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Image view, `None` for buffers
    pub fn image(&self) -> Option<Image<'_>> {
        self.image.as_ref().map(|state| Image { state })
    }

    /// Backend object
    pub fn backend(&self) -> &dyn MemoryImpl {
        self.imp.as_ref()
    }
}

impl RefCounted for Memory {
    fn ref_count(&self) -> &RefCount {
        &self.refs
    }

    fn release(&self) -> bool {
        let released = self.refs.remove_ref();
        if released {
            self.context.destroy_memory(self);
        }
        released
    }
}

impl Drop for Memory {
    fn drop(&mut self) {
        log::debug!("Destroying {:?} {:p}", self.mem_type, self);
    }
}

// =============================================================================
// INFO
// =============================================================================

cl_enum! {
    /// `clGetMemObjectInfo` parameters
    pub enum MemParam {
        /// `CL_MEM_TYPE`
        Type = CL_MEM_TYPE,
        /// `CL_MEM_FLAGS`
        Flags = CL_MEM_FLAGS,
        /// `CL_MEM_SIZE`
        Size = CL_MEM_SIZE,
        /// `CL_MEM_HOST_PTR`
        HostPtr = CL_MEM_HOST_PTR,
        /// `CL_MEM_MAP_COUNT`
        MapCount = CL_MEM_MAP_COUNT,
        /// `CL_MEM_REFERENCE_COUNT`
        ReferenceCount = CL_MEM_REFERENCE_COUNT,
        /// `CL_MEM_CONTEXT`
        Context = CL_MEM_CONTEXT,
        /// `CL_MEM_ASSOCIATED_MEMOBJECT`
        AssociatedMemObject = CL_MEM_ASSOCIATED_MEMOBJECT,
        /// `CL_MEM_OFFSET`
        Offset = CL_MEM_OFFSET,
        /// `CL_MEM_PROPERTIES`
        Properties = CL_MEM_PROPERTIES,
    }
}

impl GetInfo for Memory {
    type Param = MemParam;

    fn info(&self, param: MemParam) -> Result<InfoValue<'_>> {
        Ok(match param {
            MemParam::Type => InfoValue::Uint(self.mem_type.raw()),
            MemParam::Flags => InfoValue::Ulong(self.flags.bits()),
            MemParam::Size => InfoValue::Size(self.size),
            MemParam::HostPtr => InfoValue::Size(self.host_ptr),
            // Mapping is done by the backend
            MemParam::MapCount => InfoValue::Uint(0),
            MemParam::ReferenceCount => InfoValue::Uint(self.refs.count()),
            MemParam::Context => InfoValue::handle(self.context.as_ptr()),
            MemParam::AssociatedMemObject => InfoValue::Size(0),
            MemParam::Offset => InfoValue::Size(0),
            MemParam::Properties => InfoValue::Bytes(self.properties.as_bytes()),
        })
    }
}

cl_enum! {
    /// `clGetImageInfo` parameters
    pub enum ImageParam {
        /// `CL_IMAGE_FORMAT`
        Format = CL_IMAGE_FORMAT,
        /// `CL_IMAGE_ELEMENT_SIZE`
        ElementSize = CL_IMAGE_ELEMENT_SIZE,
        /// `CL_IMAGE_ROW_PITCH`
        RowPitch = CL_IMAGE_ROW_PITCH,
        /// `CL_IMAGE_SLICE_PITCH`
        SlicePitch = CL_IMAGE_SLICE_PITCH,
        /// `CL_IMAGE_WIDTH`
        Width = CL_IMAGE_WIDTH,
        /// `CL_IMAGE_HEIGHT`
        Height = CL_IMAGE_HEIGHT,
        /// `CL_IMAGE_DEPTH`
        Depth = CL_IMAGE_DEPTH,
        /// `CL_IMAGE_ARRAY_SIZE`
        ArraySize = CL_IMAGE_ARRAY_SIZE,
    }
}

/// Image-specific view of a memory object
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    state: &'a ImageState,
}

impl Image<'_> {
    /// Pixel format
    pub fn format(&self) -> cl_image_format {
        self.state.format
    }

    /// Geometry
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.state.descriptor
    }
}

impl GetInfo for Image<'_> {
    type Param = ImageParam;

    fn info(&self, param: ImageParam) -> Result<InfoValue<'_>> {
        let desc = &self.state.descriptor;
        Ok(match param {
            ImageParam::Format => InfoValue::Bytes(bytemuck::bytes_of(&self.state.format)),
            ImageParam::ElementSize => InfoValue::Size(desc.element_size),
            ImageParam::RowPitch => InfoValue::Size(desc.row_pitch),
            ImageParam::SlicePitch => InfoValue::Size(desc.slice_pitch),
            ImageParam::Width => InfoValue::Size(desc.width),
            ImageParam::Height => InfoValue::Size(desc.height),
            ImageParam::Depth => InfoValue::Size(desc.depth),
            ImageParam::ArraySize => InfoValue::Size(desc.array_size),
        })
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("type", &self.mem_type)
            .field("flags", &self.flags)
            .field("size", &self.size)
            .field("refs", &self.refs)
            .finish()
    }
}
