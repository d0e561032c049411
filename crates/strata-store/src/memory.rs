use std::collections::HashMap;
use std::sync::RwLock;

use strata_types::{EntityRef, PropertyBag};
use tracing::trace;

use crate::error::StoreResult;
use crate::traits::RecordStore;

/// In-memory, HashMap-based record store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock`;
/// bags are cloned on read and write, so callers never observe aliased
/// mutation.
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<EntityRef, PropertyBag>>,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.records.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, key: &EntityRef) -> StoreResult<Option<PropertyBag>> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &EntityRef, bag: &PropertyBag) -> StoreResult<()> {
        let mut map = self.records.write().expect("lock poisoned");
        trace!(kind = key.kind(), properties = bag.len(), "storing record");
        // Whole-bag replacement; never merge with a previous bag.
        map.insert(key.clone(), bag.clone());
        Ok(())
    }

    fn delete(&self, key: &EntityRef) -> StoreResult<bool> {
        let mut map = self.records.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn contains(&self, key: &EntityRef) -> StoreResult<bool> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len())
            .finish()
    }
}
