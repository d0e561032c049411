//! The discovered path → loader mapping for one class.
//!
//! Built once per class by [`ClassMapping::discover`], immutable afterwards,
//! and safe for unsynchronized concurrent reads. `load` and `save` are pure
//! functions of (mapping, instance, bag): no I/O, no shared mutable state.

use std::collections::BTreeMap;
use std::sync::Arc;

use strata_model::{EntityClass, Instance};
use strata_types::{PropertyBag, RefCodec};
use tracing::trace;

use crate::error::{MarshalError, MarshalResult};
use crate::loader::Loader;
use crate::visitor::Visitor;

/// Accumulates registrations during discovery, rejecting collisions.
pub(crate) struct MappingBuilder {
    class_name: String,
    /// Current path names only; drives save iteration.
    primary: BTreeMap<String, Arc<Loader>>,
    /// Current and legacy path names; drives load lookup.
    by_path: BTreeMap<String, Arc<Loader>>,
}

impl MappingBuilder {
    fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            primary: BTreeMap::new(),
            by_path: BTreeMap::new(),
        }
    }

    pub(crate) fn register_primary(
        &mut self,
        path: String,
        loader: Arc<Loader>,
    ) -> MarshalResult<()> {
        self.register(path.clone(), Arc::clone(&loader))?;
        self.primary.insert(path, loader);
        Ok(())
    }

    pub(crate) fn register_alias(&mut self, path: String, loader: Arc<Loader>) -> MarshalResult<()> {
        self.register(path, loader)
    }

    fn register(&mut self, path: String, loader: Arc<Loader>) -> MarshalResult<()> {
        if self.by_path.contains_key(&path) {
            return Err(MarshalError::AmbiguousPath {
                class: self.class_name.clone(),
                path,
            });
        }
        self.by_path.insert(path, loader);
        Ok(())
    }

    fn build(self) -> ClassMapping {
        ClassMapping {
            class_name: self.class_name,
            primary: self.primary,
            by_path: self.by_path,
        }
    }
}

/// The immutable schema mapping for one class.
#[derive(Debug, PartialEq)]
pub struct ClassMapping {
    class_name: String,
    primary: BTreeMap<String, Arc<Loader>>,
    by_path: BTreeMap<String, Arc<Loader>>,
}

impl ClassMapping {
    /// One-time recursive discovery over a class's shape.
    ///
    /// All configuration errors (path collisions, missing no-argument
    /// construction, repeated embedded shapes) surface here and never at
    /// `load`/`save` time.
    pub fn discover(class: &Arc<EntityClass>) -> MarshalResult<Self> {
        let mut builder = MappingBuilder::new(class.name());
        Visitor::root().visit_class(class, &mut builder)?;
        Ok(builder.build())
    }

    /// The class this mapping was discovered from.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Number of primary (current-name) paths.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Returns `true` if the class has no persistable leaf attributes.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// All primary path names, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.primary.keys().map(String::as_str)
    }

    /// Look up the loader bound under a path (primary or alias).
    pub fn loader(&self, path: &str) -> Option<&Arc<Loader>> {
        self.by_path.get(path)
    }

    /// Load every matching property in the bag into the instance.
    ///
    /// Unmatched paths are skipped silently (stored data may be older or
    /// newer than the registered shape). Matched paths resolve their
    /// navigator, lazily creating intermediate embedded objects.
    pub fn load(
        &self,
        bag: &PropertyBag,
        instance: &mut Instance,
        codec: &dyn RefCodec,
    ) -> MarshalResult<()> {
        for (path, property) in bag.iter() {
            match self.by_path.get(path) {
                Some(loader) => loader.load(instance, path, property, codec)?,
                None => {
                    trace!(class = %self.class_name, path, "skipping unknown stored property");
                }
            }
        }
        Ok(())
    }

    /// Produce the instance's flat property form into `bag`.
    ///
    /// Iteration is driven by the mapping, never by the instance's current
    /// slot state, so attributes that became null/empty are simply absent
    /// from the output. Callers reconcile against previously stored data by
    /// replacing the whole bag.
    pub fn save_into(
        &self,
        instance: &Instance,
        bag: &mut PropertyBag,
        codec: &dyn RefCodec,
    ) -> MarshalResult<()> {
        for (path, loader) in &self.primary {
            if let Some(property) = loader.save(instance, path, codec)? {
                bag.insert(path.clone(), property);
            }
        }
        Ok(())
    }

    /// Convenience: produce a fresh bag from the instance.
    pub fn save(&self, instance: &Instance, codec: &dyn RefCodec) -> MarshalResult<PropertyBag> {
        let mut bag = PropertyBag::new();
        self.save_into(instance, &mut bag, codec)?;
        Ok(bag)
    }
}
