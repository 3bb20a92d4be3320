//! # PRISM Core
//!
//! Foundational types for the PRISM OpenCL frontend.
//!
//! This crate holds everything the object model needs that does not depend
//! on a particular CL object: scalar and handle types, error codes, the
//! reference-count base, property arrays and the generic `getInfo`
//! protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        prism-core                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Types     │  │   Object    │  │   Info protocol     │  │
//! │  │ (cl_uint,   │  │ (RefCount,  │  │ (InfoValue,         │  │
//! │  │  handles)   │  │  Ref<T>)    │  │  GetInfo)           │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │  ┌─────────────┐  ┌───────────────────────────────────────┐ │
//! │  │   Error     │  │  Properties (zero-terminated arrays)  │ │
//! │  └─────────────┘  └───────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(test)]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

#[macro_use]
mod macros;

pub mod error;
pub mod info;
pub mod object;
pub mod properties;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use info::{copy_info, GetInfo, InfoValue};
pub use object::{Ref, RefCount, RefCounted};
pub use properties::PropertyList;
pub use types::*;
