//! # PRISM OpenCL Frontend
//!
//! The object model behind the OpenCL entry points: platforms, devices,
//! contexts and the objects a context owns.
//!
//! ## Ownership
//!
//! ```text
//!   PLATFORMS (process-wide registry)
//!       │
//!       ▼
//!   Platform ──owns──▶ Device ◀─────────────────┐ counted
//!       │                 ▲ weak (default queue) │
//!       │ owns            │                      │
//!       ▼                 │ counted              │
//!   Context ──────────────┘                      │
//!       │ owns (lists)                           │
//!       ├──▶ CommandQueue ───────────────────────┘
//!       ├──▶ Memory
//!       ├──▶ Sampler
//!       └──▶ Program
//!
//!   every child ──counted──▶ its Context
//! ```
//!
//! A parent list holds the only owning `Arc` of each child. When a child's
//! API reference count reaches zero it asks its parent to erase it, which
//! drops that `Arc`. Children keep a counted [`Ref`](prism_core::Ref) to
//! their context, so a context cannot reach zero while children exist.
//!
//! Real device work is delegated to the [`backend`] traits.

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

pub mod api;
pub mod backend;
pub mod command_queue;
pub mod config;
pub mod context;
pub mod device;
pub mod memory;
mod object_list;
pub mod platform;
pub mod program;
pub mod sampler;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use command_queue::{CommandQueue, SetPropertyOutcome};
pub use config::PlatformConfig;
pub use context::Context;
pub use device::{Device, DeviceInfo};
pub use memory::Memory;
pub use platform::Platform;
pub use program::Program;
pub use sampler::Sampler;

pub use prism_core::{Error, Result};
