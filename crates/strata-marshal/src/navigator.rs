//! Path navigation: locating the sub-instance that owns a leaf attribute.
//!
//! A [`Navigator`] is a pure path-resolution strategy bound at discovery
//! time. It never retains object references; it is re-evaluated against the
//! root instance on every call. The root variant is identity resolution;
//! the embedded variant resolves its parent level first, then steps through
//! one embedded attribute.

use std::sync::Arc;

use strata_model::{AttrValue, EntityClass, Instance};

use crate::error::{MarshalError, MarshalResult};

/// Strategy for reaching the instance that directly owns a leaf attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Navigator {
    /// The leaf lives on the root instance itself.
    Root,
    /// The leaf lives on a single embedded sub-object.
    Embedded {
        parent: Box<Navigator>,
        attribute: String,
        class: Arc<EntityClass>,
    },
}

impl Navigator {
    /// The root navigator: identity resolution, no state.
    pub fn root() -> Self {
        Navigator::Root
    }

    /// A navigator stepping through one embedded attribute of the level
    /// `parent` resolves to. `class` is the embedded attribute's class,
    /// needed for lazy construction.
    pub fn embedded(
        parent: Navigator,
        attribute: impl Into<String>,
        class: Arc<EntityClass>,
    ) -> Self {
        Navigator::Embedded {
            parent: Box::new(parent),
            attribute: attribute.into(),
            class,
        }
    }

    /// Resolve for writing (the load path).
    ///
    /// Any unset intermediate embedded attribute is instantiated via its
    /// class's no-argument construction and stored back onto its owner, so
    /// resolution can mutate the graph. Constructibility was verified at
    /// discovery time.
    pub fn resolve_mut<'a>(&self, root: &'a mut Instance) -> MarshalResult<&'a mut Instance> {
        match self {
            Navigator::Root => Ok(root),
            Navigator::Embedded {
                parent,
                attribute,
                class,
            } => {
                let owner = parent.resolve_mut(root)?;
                if owner.get(attribute)?.is_unset() {
                    let fresh = Instance::instantiate(class)?;
                    owner.set(attribute, AttrValue::Embedded(fresh))?;
                }
                match owner.get_mut(attribute)? {
                    AttrValue::Embedded(instance) => Ok(instance),
                    other => Err(MarshalError::SlotShape {
                        attribute: attribute.clone(),
                        expected: "embedded object",
                        found: other.variant_name(),
                    }),
                }
            }
        }
    }

    /// Resolve for reading (the save path).
    ///
    /// Never mutates the graph: an unset level anywhere in the chain
    /// resolves to `None`, and the caller treats every leaf beneath it as
    /// absent.
    pub fn resolve_ref<'a>(&self, root: &'a Instance) -> MarshalResult<Option<&'a Instance>> {
        match self {
            Navigator::Root => Ok(Some(root)),
            Navigator::Embedded {
                parent, attribute, ..
            } => {
                let Some(owner) = parent.resolve_ref(root)? else {
                    return Ok(None);
                };
                match owner.get(attribute)? {
                    AttrValue::Unset => Ok(None),
                    AttrValue::Embedded(instance) => Ok(Some(instance)),
                    other => Err(MarshalError::SlotShape {
                        attribute: attribute.clone(),
                        expected: "embedded object",
                        found: other.variant_name(),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_model::AttrSpec;
    use strata_types::{Scalar, ScalarType};

    fn inner() -> Arc<EntityClass> {
        EntityClass::builder("Inner")
            .attr(AttrSpec::scalar("leaf", ScalarType::Int))
            .build()
            .unwrap()
    }

    fn outer() -> Arc<EntityClass> {
        EntityClass::builder("Outer")
            .attr(AttrSpec::embedded("inner", inner()))
            .build()
            .unwrap()
    }

    #[test]
    fn root_resolves_to_the_root_instance() {
        let class = outer();
        let mut instance = Instance::instantiate(&class).unwrap();
        let resolved = Navigator::root().resolve_mut(&mut instance).unwrap();
        assert_eq!(resolved.class().name(), "Outer");
    }

    #[test]
    fn resolve_mut_creates_missing_embedded_level() {
        let class = outer();
        let mut instance = Instance::instantiate(&class).unwrap();
        assert!(instance.get("inner").unwrap().is_unset());

        let nav = Navigator::embedded(Navigator::root(), "inner", inner());
        let resolved = nav.resolve_mut(&mut instance).unwrap();
        resolved
            .set("leaf", AttrValue::Scalar(Scalar::Int(5)))
            .unwrap();

        match instance.get("inner").unwrap() {
            AttrValue::Embedded(sub) => {
                assert_eq!(sub.get("leaf").unwrap(), &AttrValue::Scalar(Scalar::Int(5)));
            }
            other => panic!("expected embedded, got {other:?}"),
        }
    }

    #[test]
    fn resolve_mut_reuses_existing_embedded_level() {
        let class = outer();
        let mut instance = Instance::instantiate(&class).unwrap();
        let nav = Navigator::embedded(Navigator::root(), "inner", inner());

        nav.resolve_mut(&mut instance)
            .unwrap()
            .set("leaf", AttrValue::Scalar(Scalar::Int(1)))
            .unwrap();
        // A second resolution must not replace the instance created above.
        let resolved = nav.resolve_mut(&mut instance).unwrap();
        assert_eq!(resolved.get("leaf").unwrap(), &AttrValue::Scalar(Scalar::Int(1)));
    }

    #[test]
    fn resolve_ref_reports_absent_without_creating() {
        let class = outer();
        let instance = Instance::instantiate(&class).unwrap();
        let nav = Navigator::embedded(Navigator::root(), "inner", inner());

        assert_eq!(nav.resolve_ref(&instance).unwrap(), None);
        // The read-only walk must leave the slot unset.
        assert!(instance.get("inner").unwrap().is_unset());
    }

    #[test]
    fn non_embedded_slot_is_a_shape_error() {
        let class = outer();
        let mut instance = Instance::instantiate(&class).unwrap();
        instance
            .set("inner", AttrValue::Scalar(Scalar::Int(3)))
            .unwrap();
        let nav = Navigator::embedded(Navigator::root(), "inner", inner());
        assert!(matches!(
            nav.resolve_mut(&mut instance),
            Err(MarshalError::SlotShape { .. })
        ));
        assert!(matches!(
            nav.resolve_ref(&instance),
            Err(MarshalError::SlotShape { .. })
        ));
    }
}
