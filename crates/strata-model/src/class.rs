//! Class descriptions: the immutable shape a marshaler discovers.
//!
//! An [`EntityClass`] is built once with [`ClassBuilder`], wrapped in an
//! `Arc`, and never mutated afterwards. A class may extend a parent class;
//! the parent's attributes come first in declaration order, exactly as an
//! inherited field precedes a subclass's own.

use std::sync::Arc;

use strata_types::{ScalarType, SeqKind};

use crate::error::{ModelError, ModelResult};
use crate::value::AttrValue;

/// How an attribute participates in persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrRole {
    /// Marshaled normally.
    Persistent,
    /// Never persisted (in-memory only).
    Transient,
    /// The entity's own primary key; resolved outside the marshaler.
    Identity,
    /// The entity's parent reference; resolved outside the marshaler.
    ParentRef,
}

/// The declared shape of an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrShape {
    /// A single leaf value.
    Scalar(ScalarType),
    /// A fixed-size sequence of leaf values.
    Array(ScalarType),
    /// A dynamic sequence/set of leaf values. `declared: None` means the
    /// declared type is abstract and the concrete kind is recorded at save
    /// time; `Some(kind)` pins the concrete kind.
    Seq {
        elem: ScalarType,
        declared: Option<SeqKind>,
    },
    /// A single embedded sub-object, flattened into the owner's namespace.
    Embedded(Arc<EntityClass>),
    /// A fixed-size sequence of embedded sub-objects. Declarable, but
    /// rejected at discovery time.
    EmbeddedArray(Arc<EntityClass>),
    /// A dynamic sequence of embedded sub-objects. Declarable, but rejected
    /// at discovery time.
    EmbeddedSeq(Arc<EntityClass>),
}

/// One attribute declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct AttrSpec {
    name: String,
    aliases: Vec<String>,
    role: AttrRole,
    unindexed: bool,
    shape: AttrShape,
    default: Option<AttrValue>,
}

impl AttrSpec {
    fn new(name: impl Into<String>, shape: AttrShape) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            role: AttrRole::Persistent,
            unindexed: false,
            shape,
            default: None,
        }
    }

    /// A scalar attribute.
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(name, AttrShape::Scalar(ty))
    }

    /// A fixed-size sequence attribute.
    pub fn array(name: impl Into<String>, elem: ScalarType) -> Self {
        Self::new(name, AttrShape::Array(elem))
    }

    /// A dynamic sequence attribute with a pinned concrete kind.
    pub fn seq(name: impl Into<String>, elem: ScalarType, kind: SeqKind) -> Self {
        Self::new(
            name,
            AttrShape::Seq {
                elem,
                declared: Some(kind),
            },
        )
    }

    /// A dynamic sequence attribute with an abstract declared type; the
    /// concrete kind is whatever the value carries at save time.
    pub fn abstract_seq(name: impl Into<String>, elem: ScalarType) -> Self {
        Self::new(
            name,
            AttrShape::Seq {
                elem,
                declared: None,
            },
        )
    }

    /// A single embedded sub-object attribute.
    pub fn embedded(name: impl Into<String>, class: Arc<EntityClass>) -> Self {
        Self::new(name, AttrShape::Embedded(class))
    }

    /// A fixed-size sequence of embedded sub-objects (rejected at discovery).
    pub fn embedded_array(name: impl Into<String>, class: Arc<EntityClass>) -> Self {
        Self::new(name, AttrShape::EmbeddedArray(class))
    }

    /// A dynamic sequence of embedded sub-objects (rejected at discovery).
    pub fn embedded_seq(name: impl Into<String>, class: Arc<EntityClass>) -> Self {
        Self::new(name, AttrShape::EmbeddedSeq(class))
    }

    /// Add a legacy path alias, consulted only when loading.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Mark the attribute transient.
    pub fn transient(mut self) -> Self {
        self.role = AttrRole::Transient;
        self
    }

    /// Mark the attribute as the entity's primary key.
    pub fn identity(mut self) -> Self {
        self.role = AttrRole::Identity;
        self
    }

    /// Mark the attribute as the entity's parent reference.
    pub fn parent_ref(mut self) -> Self {
        self.role = AttrRole::ParentRef;
        self
    }

    /// Suppress secondary indexing for this attribute (and, for embedded
    /// attributes, every leaf beneath it).
    pub fn unindexed(mut self) -> Self {
        self.unindexed = true;
        self
    }

    /// Declare a constructor default: the value a fresh instance's slot
    /// starts with instead of unset.
    pub fn default_value(mut self, value: AttrValue) -> Self {
        self.default = Some(value);
        self
    }

    /// The attribute name (one path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Legacy aliases for this attribute.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The attribute's persistence role.
    pub fn role(&self) -> AttrRole {
        self.role
    }

    /// Whether indexing is suppressed on this attribute.
    pub fn is_unindexed(&self) -> bool {
        self.unindexed
    }

    /// The declared shape.
    pub fn shape(&self) -> &AttrShape {
        &self.shape
    }

    /// The constructor default, if declared.
    pub fn default(&self) -> Option<&AttrValue> {
        self.default.as_ref()
    }
}

/// An immutable class description.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityClass {
    name: String,
    parent: Option<Arc<EntityClass>>,
    attrs: Vec<AttrSpec>,
    constructible: bool,
}

impl EntityClass {
    /// Start building a class description.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            parent: None,
            attrs: Vec::new(),
            constructible: true,
        }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent class, if this class extends one.
    pub fn parent(&self) -> Option<&Arc<EntityClass>> {
        self.parent.as_ref()
    }

    /// The attributes declared directly on this class, in declaration order.
    pub fn declared_attrs(&self) -> &[AttrSpec] {
        &self.attrs
    }

    /// Whether the class supports no-argument construction.
    pub fn is_constructible(&self) -> bool {
        self.constructible
    }

    /// All attributes in the chain, parents first, declaration order within
    /// each class.
    pub fn all_attrs(&self) -> Vec<&AttrSpec> {
        let mut out = Vec::new();
        self.collect_attrs(&mut out);
        out
    }

    fn collect_attrs<'a>(&'a self, out: &mut Vec<&'a AttrSpec>) {
        if let Some(parent) = &self.parent {
            parent.collect_attrs(out);
        }
        out.extend(self.attrs.iter());
    }

    /// Look up an attribute by name, searching the whole chain.
    pub fn attr(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs
            .iter()
            .find(|a| a.name() == name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.attr(name)))
    }
}

/// Builder for [`EntityClass`].
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<EntityClass>>,
    attrs: Vec<AttrSpec>,
    constructible: bool,
}

impl ClassBuilder {
    /// Extend a parent class.
    pub fn parent(mut self, parent: Arc<EntityClass>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare the class without no-argument construction.
    pub fn not_constructible(mut self) -> Self {
        self.constructible = false;
        self
    }

    /// Declare one attribute. Declaration order is preserved.
    pub fn attr(mut self, spec: AttrSpec) -> Self {
        self.attrs.push(spec);
        self
    }

    /// Finish the description.
    ///
    /// Fails if the chain declares the same attribute name twice; slot
    /// storage is keyed by name, so duplicates cannot coexist.
    pub fn build(self) -> ModelResult<Arc<EntityClass>> {
        let class = EntityClass {
            name: self.name,
            parent: self.parent,
            attrs: self.attrs,
            constructible: self.constructible,
        };
        let mut seen = std::collections::BTreeSet::new();
        for attr in class.all_attrs() {
            if !seen.insert(attr.name().to_string()) {
                return Err(ModelError::DuplicateAttribute {
                    class: class.name.clone(),
                    attribute: attr.name().to_string(),
                });
            }
        }
        Ok(Arc::new(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Arc<EntityClass> {
        EntityClass::builder("Address")
            .attr(AttrSpec::scalar("street", ScalarType::Text))
            .attr(AttrSpec::scalar("city", ScalarType::Text))
            .build()
            .unwrap()
    }

    #[test]
    fn chain_attrs_come_parents_first() {
        let base = EntityClass::builder("Base")
            .attr(AttrSpec::scalar("created", ScalarType::Int))
            .build()
            .unwrap();
        let class = EntityClass::builder("Person")
            .parent(base)
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .build()
            .unwrap();

        let names: Vec<&str> = class.all_attrs().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["created", "name"]);
    }

    #[test]
    fn attr_lookup_searches_the_chain() {
        let base = EntityClass::builder("Base")
            .attr(AttrSpec::scalar("created", ScalarType::Int))
            .build()
            .unwrap();
        let class = EntityClass::builder("Person")
            .parent(base)
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .build()
            .unwrap();

        assert!(class.attr("created").is_some());
        assert!(class.attr("name").is_some());
        assert!(class.attr("missing").is_none());
    }

    #[test]
    fn duplicate_attribute_fails_build() {
        let err = EntityClass::builder("Person")
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .build();
        assert_eq!(
            err,
            Err(ModelError::DuplicateAttribute {
                class: "Person".to_string(),
                attribute: "name".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_across_the_chain_fails_build() {
        let base = EntityClass::builder("Base")
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .build()
            .unwrap();
        let err = EntityClass::builder("Person")
            .parent(base)
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .build();
        assert!(matches!(err, Err(ModelError::DuplicateAttribute { .. })));
    }

    #[test]
    fn non_constructible_class_refuses_instantiation() {
        use crate::instance::Instance;

        let class = EntityClass::builder("Opaque")
            .not_constructible()
            .build()
            .unwrap();
        assert_eq!(
            Instance::instantiate(&class),
            Err(ModelError::NotConstructible("Opaque".to_string()))
        );
    }

    #[test]
    fn embedded_shape_holds_the_target_class() {
        let class = EntityClass::builder("Person")
            .attr(AttrSpec::embedded("home", address()))
            .build()
            .unwrap();
        match class.attr("home").unwrap().shape() {
            AttrShape::Embedded(target) => assert_eq!(target.name(), "Address"),
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
