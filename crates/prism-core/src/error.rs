//! # PRISM Error Handling
//!
//! Typed errors for the OpenCL frontend.
//!
//! Error handling in PRISM follows these principles:
//! - Errors are typed inside the crate and become a `cl_int` only at the
//!   C boundary
//! - No panics on any entry-point path
//! - The frontend never retries or recovers; the caller decides
//! - Codes reported by a backend pass through unchanged

use core::fmt;

use crate::types::cl_int;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// PRISM Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR CODES
// =============================================================================

/// `CL_SUCCESS`
pub const CL_SUCCESS: cl_int = 0;
/// `CL_DEVICE_NOT_FOUND`
pub const CL_DEVICE_NOT_FOUND: cl_int = -1;
/// `CL_OUT_OF_RESOURCES`
pub const CL_OUT_OF_RESOURCES: cl_int = -5;
/// `CL_OUT_OF_HOST_MEMORY`
pub const CL_OUT_OF_HOST_MEMORY: cl_int = -6;
/// `CL_IMAGE_FORMAT_NOT_SUPPORTED`
pub const CL_IMAGE_FORMAT_NOT_SUPPORTED: cl_int = -10;
/// `CL_INVALID_VALUE`
pub const CL_INVALID_VALUE: cl_int = -30;
/// `CL_INVALID_DEVICE_TYPE`
pub const CL_INVALID_DEVICE_TYPE: cl_int = -31;
/// `CL_INVALID_PLATFORM`
pub const CL_INVALID_PLATFORM: cl_int = -32;
/// `CL_INVALID_DEVICE`
pub const CL_INVALID_DEVICE: cl_int = -33;
/// `CL_INVALID_CONTEXT`
pub const CL_INVALID_CONTEXT: cl_int = -34;
/// `CL_INVALID_QUEUE_PROPERTIES`
pub const CL_INVALID_QUEUE_PROPERTIES: cl_int = -35;
/// `CL_INVALID_COMMAND_QUEUE`
pub const CL_INVALID_COMMAND_QUEUE: cl_int = -36;
/// `CL_INVALID_HOST_PTR`
pub const CL_INVALID_HOST_PTR: cl_int = -37;
/// `CL_INVALID_MEM_OBJECT`
pub const CL_INVALID_MEM_OBJECT: cl_int = -38;
/// `CL_INVALID_IMAGE_FORMAT_DESCRIPTOR`
pub const CL_INVALID_IMAGE_FORMAT_DESCRIPTOR: cl_int = -39;
/// `CL_INVALID_IMAGE_SIZE`
pub const CL_INVALID_IMAGE_SIZE: cl_int = -40;
/// `CL_INVALID_SAMPLER`
pub const CL_INVALID_SAMPLER: cl_int = -41;
/// `CL_INVALID_BINARY`
pub const CL_INVALID_BINARY: cl_int = -42;
/// `CL_INVALID_PROGRAM`
pub const CL_INVALID_PROGRAM: cl_int = -44;
/// `CL_INVALID_OPERATION`
pub const CL_INVALID_OPERATION: cl_int = -59;
/// `CL_INVALID_BUFFER_SIZE`
pub const CL_INVALID_BUFFER_SIZE: cl_int = -61;
/// `CL_INVALID_PROPERTY`
pub const CL_INVALID_PROPERTY: cl_int = -64;
/// `CL_INVALID_IMAGE_DESCRIPTOR`
pub const CL_INVALID_IMAGE_DESCRIPTOR: cl_int = -65;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// PRISM unified error type
///
/// One variant per OpenCL error code the frontend produces. Anything else a
/// backend reports is carried verbatim in [`Error::Backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Argument Errors
    // =========================================================================
    /// Bad property name, undersized buffer or otherwise invalid argument
    InvalidValue,
    /// Unknown or duplicated property key
    InvalidProperty,
    /// Device type selector has unknown bits
    InvalidDeviceType,
    /// Queue property combination not supported by the device
    InvalidQueueProperties,
    /// Zero or oversized buffer size
    InvalidBufferSize,
    /// Host pointer inconsistent with the memory flags
    InvalidHostPtr,
    /// Image extents out of range
    InvalidImageSize,
    /// Malformed image descriptor
    InvalidImageDescriptor,
    /// Malformed image format
    InvalidImageFormatDescriptor,
    /// Image format not supported by the device
    ImageFormatNotSupported,
    /// Program binary rejected
    InvalidBinary,

    // =========================================================================
    // Handle Errors
    // =========================================================================
    /// Not a live platform
    InvalidPlatform,
    /// Not a live device, or not a member of the context
    InvalidDevice,
    /// Not a live context
    InvalidContext,
    /// Not a live command queue
    InvalidCommandQueue,
    /// Not a live memory object
    InvalidMemObject,
    /// Not a live sampler
    InvalidSampler,
    /// Not a live program
    InvalidProgram,
    /// No device matched the requested type
    DeviceNotFound,

    // =========================================================================
    // State / Backend Errors
    // =========================================================================
    /// Operation not permitted in the current state
    InvalidOperation,
    /// Backend ran out of device resources
    OutOfResources,
    /// Backend ran out of host memory
    OutOfHostMemory,
    /// Any other code reported by the backend
    Backend(cl_int),
}

impl Error {
    /// OpenCL error code for this error
    pub const fn code(self) -> cl_int {
        match self {
            Self::InvalidValue => CL_INVALID_VALUE,
            Self::InvalidProperty => CL_INVALID_PROPERTY,
            Self::InvalidDeviceType => CL_INVALID_DEVICE_TYPE,
            Self::InvalidQueueProperties => CL_INVALID_QUEUE_PROPERTIES,
            Self::InvalidBufferSize => CL_INVALID_BUFFER_SIZE,
            Self::InvalidHostPtr => CL_INVALID_HOST_PTR,
            Self::InvalidImageSize => CL_INVALID_IMAGE_SIZE,
            Self::InvalidImageDescriptor => CL_INVALID_IMAGE_DESCRIPTOR,
            Self::InvalidImageFormatDescriptor => CL_INVALID_IMAGE_FORMAT_DESCRIPTOR,
            Self::ImageFormatNotSupported => CL_IMAGE_FORMAT_NOT_SUPPORTED,
            Self::InvalidBinary => CL_INVALID_BINARY,
            Self::InvalidPlatform => CL_INVALID_PLATFORM,
            Self::InvalidDevice => CL_INVALID_DEVICE,
            Self::InvalidContext => CL_INVALID_CONTEXT,
            Self::InvalidCommandQueue => CL_INVALID_COMMAND_QUEUE,
            Self::InvalidMemObject => CL_INVALID_MEM_OBJECT,
            Self::InvalidSampler => CL_INVALID_SAMPLER,
            Self::InvalidProgram => CL_INVALID_PROGRAM,
            Self::DeviceNotFound => CL_DEVICE_NOT_FOUND,
            Self::InvalidOperation => CL_INVALID_OPERATION,
            Self::OutOfResources => CL_OUT_OF_RESOURCES,
            Self::OutOfHostMemory => CL_OUT_OF_HOST_MEMORY,
            Self::Backend(code) => code,
        }
    }

    /// Map an OpenCL error code back to an error
    ///
    /// Returns `None` for `CL_SUCCESS`.
    pub const fn from_code(code: cl_int) -> Option<Self> {
        let error = match code {
            CL_SUCCESS => return None,
            CL_INVALID_VALUE => Self::InvalidValue,
            CL_INVALID_PROPERTY => Self::InvalidProperty,
            CL_INVALID_DEVICE_TYPE => Self::InvalidDeviceType,
            CL_INVALID_QUEUE_PROPERTIES => Self::InvalidQueueProperties,
            CL_INVALID_BUFFER_SIZE => Self::InvalidBufferSize,
            CL_INVALID_HOST_PTR => Self::InvalidHostPtr,
            CL_INVALID_IMAGE_SIZE => Self::InvalidImageSize,
            CL_INVALID_IMAGE_DESCRIPTOR => Self::InvalidImageDescriptor,
            CL_INVALID_IMAGE_FORMAT_DESCRIPTOR => Self::InvalidImageFormatDescriptor,
            CL_IMAGE_FORMAT_NOT_SUPPORTED => Self::ImageFormatNotSupported,
            CL_INVALID_BINARY => Self::InvalidBinary,
            CL_INVALID_PLATFORM => Self::InvalidPlatform,
            CL_INVALID_DEVICE => Self::InvalidDevice,
            CL_INVALID_CONTEXT => Self::InvalidContext,
            CL_INVALID_COMMAND_QUEUE => Self::InvalidCommandQueue,
            CL_INVALID_MEM_OBJECT => Self::InvalidMemObject,
            CL_INVALID_SAMPLER => Self::InvalidSampler,
            CL_INVALID_PROGRAM => Self::InvalidProgram,
            CL_DEVICE_NOT_FOUND => Self::DeviceNotFound,
            CL_INVALID_OPERATION => Self::InvalidOperation,
            CL_OUT_OF_RESOURCES => Self::OutOfResources,
            CL_OUT_OF_HOST_MEMORY => Self::OutOfHostMemory,
            other => Self::Backend(other),
        };
        Some(error)
    }

    /// Convert a `Result` into the code returned across the C boundary
    pub fn to_code(result: Result<()>) -> cl_int {
        match result {
            Ok(()) => CL_SUCCESS,
            Err(e) => e.code(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Arguments
            Self::InvalidValue => write!(f, "invalid value"),
            Self::InvalidProperty => write!(f, "invalid property"),
            Self::InvalidDeviceType => write!(f, "invalid device type"),
            Self::InvalidQueueProperties => write!(f, "invalid queue properties"),
            Self::InvalidBufferSize => write!(f, "invalid buffer size"),
            Self::InvalidHostPtr => write!(f, "invalid host pointer"),
            Self::InvalidImageSize => write!(f, "invalid image size"),
            Self::InvalidImageDescriptor => write!(f, "invalid image descriptor"),
            Self::InvalidImageFormatDescriptor => write!(f, "invalid image format descriptor"),
            Self::ImageFormatNotSupported => write!(f, "image format not supported"),
            Self::InvalidBinary => write!(f, "invalid program binary"),

            // Handles
            Self::InvalidPlatform => write!(f, "invalid platform"),
            Self::InvalidDevice => write!(f, "invalid device"),
            Self::InvalidContext => write!(f, "invalid context"),
            Self::InvalidCommandQueue => write!(f, "invalid command queue"),
            Self::InvalidMemObject => write!(f, "invalid memory object"),
            Self::InvalidSampler => write!(f, "invalid sampler"),
            Self::InvalidProgram => write!(f, "invalid program"),
            Self::DeviceNotFound => write!(f, "device not found"),

            // State / backend
            Self::InvalidOperation => write!(f, "invalid operation"),
            Self::OutOfResources => write!(f, "out of resources"),
            Self::OutOfHostMemory => write!(f, "out of host memory"),
            Self::Backend(code) => write!(f, "backend error {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip_for_known_errors() {
        let errors = [
            Error::InvalidValue,
            Error::InvalidDevice,
            Error::InvalidOperation,
            Error::OutOfResources,
            Error::OutOfHostMemory,
            Error::InvalidCommandQueue,
        ];
        for error in errors {
            assert_eq!(Error::from_code(error.code()), Some(error));
        }
    }

    #[test]
    fn test_success_is_not_an_error() {
        assert_eq!(Error::from_code(CL_SUCCESS), None);
        assert_eq!(Error::to_code(Ok(())), CL_SUCCESS);
    }

    #[test]
    fn test_backend_codes_pass_through() {
        let error = Error::from_code(-1001);
        assert_eq!(error, Some(Error::Backend(-1001)));
        assert_eq!(Error::to_code(Err(Error::Backend(-1001))), -1001);
    }
}
