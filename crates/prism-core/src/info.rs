//! # Info Queries
//!
//! The `clGet*Info` protocol shared by every object class.
//!
//! A query always has a canonical answer, an [`InfoValue`], whose byte
//! size is fixed before anything is copied. The caller may ask for the
//! size, the bytes or both:
//!
//! - no buffer: only the size is reported
//! - buffer smaller than the answer: `CL_INVALID_VALUE`, nothing written
//! - otherwise: exactly `size` bytes are copied and the size is reported

use alloc::vec::Vec;
use core::ffi::c_void;
use core::fmt::Debug;

use crate::error::{Error, Result};
use crate::types::{cl_uint, cl_ulong};

// =============================================================================
// INFO VALUE
// =============================================================================

/// Canonical answer to an info query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoValue<'a> {
    /// `cl_uint` (also `cl_bool` and every 32-bit enumerant)
    Uint(cl_uint),
    /// `cl_ulong` (also every `cl_bitfield`)
    Ulong(cl_ulong),
    /// `size_t`, or a handle carried as its address
    Size(usize),
    /// Bytes borrowed from the queried object
    Bytes(&'a [u8]),
    /// Bytes assembled for this query
    Owned(Vec<u8>),
}

impl<'a> InfoValue<'a> {
    /// A handle, reported as the object's address
    pub fn handle<T>(ptr: *const T) -> Self {
        Self::Size(ptr as usize)
    }

    /// A C string, NUL terminator included
    pub fn string(value: &str) -> Self {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
        Self::Owned(bytes)
    }

    /// An array of handles
    pub fn handles<T>(ptrs: impl IntoIterator<Item = *const T>) -> Self {
        let values: Vec<usize> = ptrs.into_iter().map(|ptr| ptr as usize).collect();
        Self::Owned(bytemuck::cast_slice(&values).to_vec())
    }

    /// An array of `size_t`
    pub fn sizes(values: &[usize]) -> Self {
        Self::Owned(bytemuck::cast_slice(values).to_vec())
    }

    /// A `cl_bool`
    pub fn bool(value: bool) -> Self {
        Self::Uint(value as cl_uint)
    }

    /// Native-endian bytes of the answer
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Uint(v) => bytemuck::bytes_of(v),
            Self::Ulong(v) => bytemuck::bytes_of(v),
            Self::Size(v) => bytemuck::bytes_of(v),
            Self::Bytes(bytes) => bytes,
            Self::Owned(bytes) => bytes,
        }
    }

    /// Size of the answer in bytes
    pub fn size(&self) -> usize {
        self.as_bytes().len()
    }
}

// =============================================================================
// COPY PROTOCOL
// =============================================================================

/// Copy a query answer into the caller's buffers
///
/// A buffer that is too small is left untouched and `size_ret` is not
/// written either.
pub fn copy_info(
    src: &[u8],
    value: Option<&mut [u8]>,
    size_ret: Option<&mut usize>,
) -> Result<()> {
    if let Some(value) = value {
        if value.len() < src.len() {
            return Err(Error::InvalidValue);
        }
        value[..src.len()].copy_from_slice(src);
    }

    if let Some(size_ret) = size_ret {
        *size_ret = src.len();
    }

    Ok(())
}

/// [`copy_info`] over raw C pointers
///
/// # Safety
/// - `value` must be null or valid for `value_size` writable bytes
/// - `size_ret` must be null or valid for one `usize` write
pub unsafe fn write_info(
    src: &[u8],
    value_size: usize,
    value: *mut c_void,
    size_ret: *mut usize,
) -> Result<()> {
    let value = if value.is_null() {
        None
    } else {
        // SAFETY: caller guarantees `value` covers `value_size` bytes
        Some(unsafe { core::slice::from_raw_parts_mut(value.cast::<u8>(), value_size) })
    };
    // SAFETY: caller guarantees `size_ret` is null or writable
    let size_ret = unsafe { size_ret.as_mut() };

    copy_info(src, value, size_ret)
}

// =============================================================================
// QUERY TRAIT
// =============================================================================

/// An object that answers `clGet*Info`
pub trait GetInfo {
    /// Parameter names this class understands
    type Param: TryFrom<cl_uint, Error = Error> + Copy + Debug;

    /// Canonical answer for `param`
    fn info(&self, param: Self::Param) -> Result<InfoValue<'_>>;

    /// Answer a raw query into Rust buffers
    fn get_info(
        &self,
        param: cl_uint,
        value: Option<&mut [u8]>,
        size_ret: Option<&mut usize>,
    ) -> Result<()> {
        let param = Self::Param::try_from(param).map_err(|e| {
            log::trace!("unknown info parameter {:#x}", param);
            e
        })?;
        let answer = self.info(param)?;
        copy_info(answer.as_bytes(), value, size_ret)
    }

    /// Answer a raw query into C buffers
    ///
    /// # Safety
    /// Same contract as [`write_info`].
    unsafe fn get_info_raw(
        &self,
        param: cl_uint,
        value_size: usize,
        value: *mut c_void,
        size_ret: *mut usize,
    ) -> Result<()> {
        let param = Self::Param::try_from(param)?;
        let answer = self.info(param)?;
        // SAFETY: forwarded caller contract
        unsafe { write_info(answer.as_bytes(), value_size, value, size_ret) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    cl_enum! {
        enum Query {
            Count = 0x10,
            Name = 0x11,
            Owner = 0x12,
        }
    }

    struct Thing {
        name: &'static str,
    }

    impl GetInfo for Thing {
        type Param = Query;

        fn info(&self, param: Query) -> Result<InfoValue<'_>> {
            Ok(match param {
                Query::Count => InfoValue::Uint(7),
                Query::Name => InfoValue::string(self.name),
                Query::Owner => InfoValue::handle(self as *const Self),
            })
        }
    }

    #[test]
    fn test_size_probe_matches_copy() {
        let thing = Thing { name: "prism" };
        let mut size = 0;
        thing.get_info(0x11, None, Some(&mut size)).unwrap();
        assert_eq!(size, 6);

        let mut buffer = [0xffu8; 16];
        let mut copied = 0;
        thing
            .get_info(0x11, Some(&mut buffer[..size]), Some(&mut copied))
            .unwrap();
        assert_eq!(copied, size);
        assert_eq!(&buffer[..6], b"prism\0");
        assert_eq!(buffer[6], 0xff);
    }

    #[test]
    fn test_undersized_buffer_is_untouched() {
        let thing = Thing { name: "prism" };
        let mut buffer = [0xaau8; 2];
        let mut size = 1234;
        let result = thing.get_info(0x10, Some(&mut buffer), Some(&mut size));
        assert_eq!(result, Err(Error::InvalidValue));
        assert_eq!(buffer, [0xaa, 0xaa]);
        assert_eq!(size, 1234);
    }

    #[test]
    fn test_oversized_buffer_copies_exact_size() {
        let thing = Thing { name: "prism" };
        let mut buffer = [0u8; 8];
        thing.get_info(0x10, Some(&mut buffer), None).unwrap();
        assert_eq!(&buffer[..4], &7u32.to_ne_bytes());
        assert_eq!(&buffer[4..], &[0; 4]);
    }

    #[test]
    fn test_unknown_param() {
        let thing = Thing { name: "prism" };
        let mut size = 99;
        assert_eq!(
            thing.get_info(0x99, None, Some(&mut size)),
            Err(Error::InvalidValue)
        );
        assert_eq!(size, 99);
    }

    #[test]
    fn test_handle_answer() {
        let thing = Thing { name: "" };
        let mut raw = 0usize;
        let mut size = 0;
        unsafe {
            thing
                .get_info_raw(
                    0x12,
                    core::mem::size_of::<usize>(),
                    (&mut raw as *mut usize).cast(),
                    &mut size,
                )
                .unwrap();
        }
        assert_eq!(raw, &thing as *const Thing as usize);
        assert_eq!(size, core::mem::size_of::<usize>());
    }

    #[test]
    fn test_handles_and_sizes() {
        let values = [1usize, 2, 3];
        let answer = InfoValue::sizes(&values);
        assert_eq!(answer.size(), 3 * core::mem::size_of::<usize>());

        let ptrs = [0x1000 as *const u8, 0x2000 as *const u8];
        let answer = InfoValue::handles(ptrs);
        assert_eq!(answer.as_bytes(), bytemuck::cast_slice::<usize, u8>(&[0x1000, 0x2000]));
    }
}
