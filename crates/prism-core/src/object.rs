//! # Reference Counting
//!
//! The API-visible reference count of every CL object, and a counted
//! pointer that holds one of those references.
//!
//! Two counts exist for each object:
//!
//! - the `Arc` strong count, which only governs when memory is freed;
//! - the [`RefCount`], which is what `clRetain*`/`clRelease*` and
//!   `*_REFERENCE_COUNT` queries see.
//!
//! Reaching zero on the API count never frees anything by itself.
//! [`RefCounted::release`] implementations react to it by erasing the
//! object from its owner's list, which drops the owning `Arc`.

use alloc::sync::Arc;
use core::fmt;
use core::ops::Deref;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::types::cl_uint;

// =============================================================================
// REFERENCE COUNT
// =============================================================================

/// Atomic API reference count
///
/// Starts at one: the reference returned to whoever created the object.
pub struct RefCount {
    count: AtomicU32,
}

impl RefCount {
    /// Create a count holding the creator's reference
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(1),
        }
    }

    /// Increment the count
    pub fn add_ref(&self) {
        let previous = self.count.fetch_add(1, Ordering::Relaxed);
        debug_assert!(previous != u32::MAX, "reference count overflow");

        #[cfg(feature = "debug-refcount")]
        log::trace!("add_ref {:p}: {} -> {}", self, previous, previous + 1);
    }

    /// Decrement the count
    ///
    /// Returns `true` when this call dropped the last reference. The caller
    /// is responsible for whatever cleanup that implies.
    pub fn remove_ref(&self) -> bool {
        let previous = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous != 0, "reference count underflow");

        #[cfg(feature = "debug-refcount")]
        log::trace!("remove_ref {:p}: {} -> {}", self, previous, previous - 1);

        previous == 1
    }

    /// Current count
    pub fn count(&self) -> cl_uint {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefCount").field(&self.count()).finish()
    }
}

// =============================================================================
// REFERENCE COUNTED OBJECTS
// =============================================================================

/// An object with an API reference count
pub trait RefCounted: Send + Sync {
    /// The object's API reference count
    fn ref_count(&self) -> &RefCount;

    /// `clRetain*`
    fn retain(&self) {
        self.ref_count().add_ref();
    }

    /// `clRelease*`
    ///
    /// Returns `true` if this call released the last reference. At that
    /// point the implementation removes the object from its owner.
    fn release(&self) -> bool;
}

// =============================================================================
// COUNTED POINTER
// =============================================================================

/// Shared pointer that holds one API reference
///
/// Creating or cloning a `Ref` retains the target; dropping it releases.
/// Children use it to keep their context (and queues their device) alive:
/// a context cannot reach zero while any child still holds a `Ref` to it.
pub struct Ref<T: RefCounted> {
    inner: Arc<T>,
}

impl<T: RefCounted> Ref<T> {
    /// Take a new reference on `object`
    pub fn new(object: Arc<T>) -> Self {
        object.retain();
        Self { inner: object }
    }

    /// Underlying shared pointer
    pub fn arc(&self) -> &Arc<T> {
        &self.inner
    }

    /// Address of the target (the value its handle carries)
    pub fn as_ptr(&self) -> *const T {
        Arc::as_ptr(&self.inner)
    }
}

impl<T: RefCounted> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.inner))
    }
}

impl<T: RefCounted> Deref for Ref<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: RefCounted> Drop for Ref<T> {
    fn drop(&mut self) {
        self.inner.release();
    }
}

impl<T: RefCounted> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.as_ptr()).finish()
    }
}
