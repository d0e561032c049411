//! The registration API: one cached mapping per class.
//!
//! Registration is an explicit, non-thread-safe initialization step done
//! once per class at startup; the cached mappings are immutable afterwards
//! and the registry can be shared freely for `load`/`save`.

use std::collections::HashMap;
use std::sync::Arc;

use strata_model::{EntityClass, Instance};
use strata_types::{PathRefCodec, PropertyBag, RefCodec};
use tracing::debug;

use crate::error::{MarshalError, MarshalResult};
use crate::mapping::ClassMapping;

/// Class-to-mapping cache plus the reference codec all conversions use.
pub struct Registry {
    codec: Arc<dyn RefCodec>,
    mappings: HashMap<String, Arc<ClassMapping>>,
}

impl Registry {
    /// A registry using the default [`PathRefCodec`].
    pub fn new() -> Self {
        Self::with_codec(Arc::new(PathRefCodec))
    }

    /// A registry using a caller-provided reference codec.
    pub fn with_codec(codec: Arc<dyn RefCodec>) -> Self {
        Self {
            codec,
            mappings: HashMap::new(),
        }
    }

    /// Register a class, running discovery and caching its mapping.
    ///
    /// Idempotent per class name: re-registering an already-known class is
    /// a no-op. Configuration errors surface here, synchronously, never at
    /// first use.
    pub fn register(&mut self, class: &Arc<EntityClass>) -> MarshalResult<()> {
        if self.mappings.contains_key(class.name()) {
            return Ok(());
        }
        let mapping = ClassMapping::discover(class)?;
        debug!(class = class.name(), paths = mapping.len(), "registered class");
        self.mappings
            .insert(class.name().to_string(), Arc::new(mapping));
        Ok(())
    }

    /// Returns `true` if the class name has been registered.
    pub fn is_registered(&self, class_name: &str) -> bool {
        self.mappings.contains_key(class_name)
    }

    /// The cached mapping for a class name.
    pub fn mapping(&self, class_name: &str) -> MarshalResult<&Arc<ClassMapping>> {
        self.mappings
            .get(class_name)
            .ok_or_else(|| MarshalError::Unregistered {
                class: class_name.to_string(),
            })
    }

    /// Load a property bag into an instance of a registered class.
    pub fn load(&self, bag: &PropertyBag, instance: &mut Instance) -> MarshalResult<()> {
        self.mapping(instance.class().name())?
            .load(bag, instance, self.codec.as_ref())
    }

    /// Produce a fresh property bag from an instance of a registered class.
    ///
    /// The result is the complete flat form; callers persisting it replace
    /// any previously stored bag rather than merging.
    pub fn save(&self, instance: &Instance) -> MarshalResult<PropertyBag> {
        self.mapping(instance.class().name())?
            .save(instance, self.codec.as_ref())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut classes: Vec<&str> = self.mappings.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("Registry").field("classes", &classes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_model::{AttrSpec, AttrValue};
    use strata_types::{EntityRef, RefId, Scalar, ScalarType};

    fn task() -> Arc<EntityClass> {
        EntityClass::builder("Task")
            .attr(AttrSpec::scalar("id", ScalarType::Int).identity())
            .attr(AttrSpec::scalar("title", ScalarType::Text))
            .attr(AttrSpec::scalar("owner", ScalarType::Ref))
            .build()
            .unwrap()
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = Registry::new();
        let class = task();
        registry.register(&class).unwrap();
        registry.register(&class).unwrap();
        assert!(registry.is_registered("Task"));
    }

    #[test]
    fn unregistered_class_errors_at_dispatch() {
        let registry = Registry::new();
        let instance = Instance::instantiate(&task()).unwrap();
        assert_eq!(
            registry.save(&instance),
            Err(MarshalError::Unregistered {
                class: "Task".to_string(),
            })
        );
    }

    #[test]
    fn configuration_errors_surface_at_registration() {
        let mut registry = Registry::new();
        let broken = EntityClass::builder("Broken")
            .attr(AttrSpec::scalar("a", ScalarType::Int).alias("b"))
            .attr(AttrSpec::scalar("b", ScalarType::Int))
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(&broken),
            Err(MarshalError::AmbiguousPath { .. })
        ));
        assert!(!registry.is_registered("Broken"));
    }

    #[test]
    fn typed_references_round_trip_through_the_codec() {
        let mut registry = Registry::new();
        let class = task();
        registry.register(&class).unwrap();

        let owner = EntityRef::with_parent(
            EntityRef::new("Team", RefId::Name("core".into())),
            "User",
            RefId::Int(12),
        );
        let mut instance = Instance::instantiate(&class).unwrap();
        instance
            .set("owner", AttrValue::Scalar(Scalar::Ref(owner.clone())))
            .unwrap();

        let bag = registry.save(&instance).unwrap();
        assert_eq!(bag.get("owner").unwrap().value, json!("Team:core/User:#12"));

        let mut fetched = Instance::instantiate(&class).unwrap();
        registry.load(&bag, &mut fetched).unwrap();
        assert_eq!(
            fetched.get("owner").unwrap(),
            &AttrValue::Scalar(Scalar::Ref(owner))
        );
    }

    #[test]
    fn identity_attributes_never_enter_the_bag() {
        let mut registry = Registry::new();
        let class = task();
        registry.register(&class).unwrap();

        let mut instance = Instance::instantiate(&class).unwrap();
        instance
            .set("id", AttrValue::Scalar(Scalar::Int(99)))
            .unwrap();
        let bag = registry.save(&instance).unwrap();
        assert!(!bag.contains("id"));
    }
}
