//! Owning object lists.
//!
//! Every parent keeps its children in one of these. The list holds the
//! owning `Arc`; lookups compare addresses only.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use spin::RwLock;

/// Lock-guarded list of owned objects
pub(crate) struct ObjectList<T> {
    entries: RwLock<Vec<Arc<T>>>,
}

impl<T> ObjectList<T> {
    /// Empty list
    pub(crate) const fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append an object
    pub(crate) fn insert(&self, object: Arc<T>) {
        self.entries.write().push(object);
    }

    /// Remove the object at `ptr` and hand back its owning pointer
    ///
    /// The lock is released before returning, so the caller decides when
    /// the object is dropped.
    pub(crate) fn take(&self, ptr: *const T) -> Option<Arc<T>> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|e| Arc::as_ptr(e) == ptr)?;
        Some(entries.remove(index))
    }

    /// `true` if the object at `ptr` is in the list
    pub(crate) fn contains(&self, ptr: *const T) -> bool {
        self.entries.read().iter().any(|e| Arc::as_ptr(e) == ptr)
    }

    /// Shared pointer to the object at `ptr`
    pub(crate) fn find(&self, ptr: *const T) -> Option<Arc<T>> {
        self.entries
            .read()
            .iter()
            .find(|e| Arc::as_ptr(e) == ptr)
            .cloned()
    }

    /// First object matching `pred`
    pub(crate) fn find_map<R>(&self, pred: impl FnMut(&Arc<T>) -> Option<R>) -> Option<R> {
        self.entries.read().iter().find_map(pred)
    }

    /// Number of objects
    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Copy of the current entries
    pub(crate) fn snapshot(&self) -> Vec<Arc<T>> {
        self.entries.read().clone()
    }
}

impl<T> fmt::Debug for ObjectList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectList").field("len", &self.len()).finish()
    }
}
