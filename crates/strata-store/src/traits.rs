use strata_types::{EntityRef, PropertyBag};

use crate::error::StoreResult;

/// A flat record store keyed by entity reference.
///
/// All implementations must satisfy these invariants:
/// - `put` replaces the record's whole bag; it never merges with a
///   previously stored bag.
/// - `get` returns the bag as last written, order-irrelevant.
/// - The store never interprets property values; it is a pure key-value
///   store over bags.
/// - All I/O errors are propagated, never silently ignored.
pub trait RecordStore: Send + Sync {
    /// Read the bag stored under a key.
    ///
    /// Returns `Ok(None)` if no record exists.
    fn get(&self, key: &EntityRef) -> StoreResult<Option<PropertyBag>>;

    /// Write a record, replacing any previous bag under the key.
    fn put(&self, key: &EntityRef, bag: &PropertyBag) -> StoreResult<()>;

    /// Delete a record. Returns `true` if it existed.
    fn delete(&self, key: &EntityRef) -> StoreResult<bool>;

    /// Check whether a record exists.
    fn contains(&self, key: &EntityRef) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
