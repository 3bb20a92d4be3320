//! # Property Arrays
//!
//! Extended creation properties are passed as a flat list of key/value
//! pairs terminated by a zero key:
//!
//! ```text
//! [ key0, value0, key1, value1, ..., 0 ]
//! ```
//!
//! The list is kept exactly as received (terminator included) so that
//! `*_PROPERTIES` queries return it verbatim.

use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

/// A zero-terminated key/value property list, stored verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyList<T: Pod> {
    raw: Vec<T>,
}

impl<T: Pod + PartialEq> PropertyList<T> {
    /// No properties were supplied
    pub const fn empty() -> Self {
        Self { raw: Vec::new() }
    }

    /// Copy a list out of a slice
    ///
    /// An empty slice means "no properties". Otherwise the slice must hold
    /// a zero key at an even index; anything after it is ignored.
    pub fn from_slice(values: &[T]) -> Result<Self> {
        if values.is_empty() {
            return Ok(Self::empty());
        }

        let end = values
            .iter()
            .step_by(2)
            .position(|key| *key == T::zeroed())
            .map(|pair| pair * 2)
            .ok_or(Error::InvalidValue)?;

        Ok(Self {
            raw: values[..=end].to_vec(),
        })
    }

    /// Copy a list out of a raw, zero-terminated pointer
    ///
    /// A null pointer yields an empty list.
    ///
    /// # Safety
    /// - `ptr` must be null or point to a readable list terminated by a
    ///   zero key at an even index
    pub unsafe fn from_raw(ptr: *const T) -> Self {
        if ptr.is_null() {
            return Self::empty();
        }

        let mut raw = Vec::new();
        let mut index = 0;
        loop {
            // SAFETY: caller guarantees the list is readable up to its terminator
            let key = unsafe { ptr.add(index).read() };
            raw.push(key);
            if key == T::zeroed() {
                break;
            }
            // SAFETY: a non-zero key is always followed by its value
            raw.push(unsafe { ptr.add(index + 1).read() });
            index += 2;
        }

        Self { raw }
    }

    /// Iterate over `(key, value)` pairs, terminator excluded
    pub fn pairs(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.raw
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .take_while(|(key, _)| *key != T::zeroed())
    }

    /// Look up the value stored for `key`
    pub fn get(&self, key: T) -> Option<T> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Fail with `error` if any key appears twice
    pub fn check_unique_keys(&self, error: Error) -> Result<()> {
        for (index, (key, _)) in self.pairs().enumerate() {
            if self.pairs().skip(index + 1).any(|(k, _)| k == key) {
                return Err(error);
            }
        }
        Ok(())
    }

    /// The verbatim list, terminator included
    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    /// The verbatim list as bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.raw)
    }

    /// `true` if no list was supplied at all
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<T: Pod + PartialEq> Default for PropertyList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_terminator_and_drops_trailing_values() {
        let list = PropertyList::<u64>::from_slice(&[0x1093, 3, 0, 99]).unwrap();
        assert_eq!(list.as_slice(), &[0x1093, 3, 0]);
        assert_eq!(list.as_bytes().len(), 3 * 8);
    }

    #[test]
    fn test_empty_slice_is_no_properties() {
        let list = PropertyList::<u64>::from_slice(&[]).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.pairs().count(), 0);
    }

    #[test]
    fn test_lone_terminator_is_kept() {
        let list = PropertyList::<u64>::from_slice(&[0]).unwrap();
        assert!(!list.is_empty());
        assert_eq!(list.as_bytes().len(), 8);
    }

    #[test]
    fn test_missing_terminator_is_rejected() {
        assert_eq!(
            PropertyList::<u64>::from_slice(&[0x1093, 3]),
            Err(Error::InvalidValue)
        );
        // A zero value is not a terminator
        assert_eq!(
            PropertyList::<u64>::from_slice(&[0x1093, 0, 0x1094]),
            Err(Error::InvalidValue)
        );
    }

    #[test]
    fn test_pairs_and_lookup() {
        let list = PropertyList::<isize>::from_slice(&[0x1084, 42, 0x1085, 1, 0]).unwrap();
        let pairs: Vec<_> = list.pairs().collect();
        assert_eq!(pairs, [(0x1084, 42), (0x1085, 1)]);
        assert_eq!(list.get(0x1085), Some(1));
        assert_eq!(list.get(0x9999), None);
    }

    #[test]
    fn test_duplicate_keys() {
        let list = PropertyList::<u64>::from_slice(&[1, 2, 1, 3, 0]).unwrap();
        assert_eq!(
            list.check_unique_keys(Error::InvalidProperty),
            Err(Error::InvalidProperty)
        );
    }

    #[test]
    fn test_from_raw() {
        let values: [u64; 5] = [0x1093, 1, 0x1094, 4096, 0];
        let list = unsafe { PropertyList::from_raw(values.as_ptr()) };
        assert_eq!(list.as_slice(), &values);

        let null = unsafe { PropertyList::<u64>::from_raw(core::ptr::null()) };
        assert!(null.is_empty());
    }
}
