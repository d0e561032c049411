//! Dynamic instances of a class.
//!
//! An [`Instance`] owns one slot per attribute declared anywhere in its
//! class chain. Slots are created at construction time, so lookups can only
//! fail for names the class does not declare at all. The instance
//! exclusively owns every embedded sub-instance reachable from it.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::class::EntityClass;
use crate::error::{ModelError, ModelResult};
use crate::value::AttrValue;

/// A dynamic object of one [`EntityClass`].
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    class: Arc<EntityClass>,
    slots: BTreeMap<String, AttrValue>,
}

impl Instance {
    /// No-argument construction: a fresh instance with every slot at its
    /// declared default (unset when none is declared).
    ///
    /// Fails when the class was declared without no-argument construction.
    pub fn instantiate(class: &Arc<EntityClass>) -> ModelResult<Self> {
        if !class.is_constructible() {
            return Err(ModelError::NotConstructible(class.name().to_string()));
        }
        let slots = class
            .all_attrs()
            .iter()
            .map(|attr| {
                let value = attr.default().cloned().unwrap_or(AttrValue::Unset);
                (attr.name().to_string(), value)
            })
            .collect();
        Ok(Self {
            class: Arc::clone(class),
            slots,
        })
    }

    /// The class this instance belongs to.
    pub fn class(&self) -> &Arc<EntityClass> {
        &self.class
    }

    /// Read an attribute slot.
    pub fn get(&self, attribute: &str) -> ModelResult<&AttrValue> {
        self.slots
            .get(attribute)
            .ok_or_else(|| self.unknown(attribute))
    }

    /// Read an attribute slot mutably.
    pub fn get_mut(&mut self, attribute: &str) -> ModelResult<&mut AttrValue> {
        match self.slots.get_mut(attribute) {
            Some(slot) => Ok(slot),
            None => Err(ModelError::UnknownAttribute {
                class: self.class.name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }

    /// Write an attribute slot, replacing its previous value.
    pub fn set(&mut self, attribute: &str, value: AttrValue) -> ModelResult<()> {
        *self.get_mut(attribute)? = value;
        Ok(())
    }

    /// Reset an attribute slot to unset.
    pub fn clear(&mut self, attribute: &str) -> ModelResult<()> {
        self.set(attribute, AttrValue::Unset)
    }

    fn unknown(&self, attribute: &str) -> ModelError {
        ModelError::UnknownAttribute {
            class: self.class.name().to_string(),
            attribute: attribute.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::AttrSpec;
    use crate::value::SeqValue;
    use strata_types::{Scalar, ScalarType, SeqKind};

    fn person() -> Arc<EntityClass> {
        let base = EntityClass::builder("Base")
            .attr(AttrSpec::scalar("created", ScalarType::Int))
            .build()
            .unwrap();
        EntityClass::builder("Person")
            .parent(base)
            .attr(AttrSpec::scalar("name", ScalarType::Text))
            .attr(
                AttrSpec::seq("tags", ScalarType::Text, SeqKind::List)
                    .default_value(AttrValue::Seq(SeqValue::new(SeqKind::List))),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn fresh_instance_has_defaults() {
        let instance = Instance::instantiate(&person()).unwrap();
        assert!(instance.get("name").unwrap().is_unset());
        assert!(instance.get("created").unwrap().is_unset());
        match instance.get("tags").unwrap() {
            AttrValue::Seq(seq) => assert!(seq.is_empty()),
            other => panic!("expected a sequence default, got {other:?}"),
        }
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut instance = Instance::instantiate(&person()).unwrap();
        instance
            .set("name", AttrValue::Scalar(Scalar::Text("alice".into())))
            .unwrap();
        assert_eq!(
            instance.get("name").unwrap(),
            &AttrValue::Scalar(Scalar::Text("alice".into()))
        );
    }

    #[test]
    fn inherited_slot_is_writable() {
        let mut instance = Instance::instantiate(&person()).unwrap();
        instance
            .set("created", AttrValue::Scalar(Scalar::Int(7)))
            .unwrap();
        assert_eq!(
            instance.get("created").unwrap(),
            &AttrValue::Scalar(Scalar::Int(7))
        );
    }

    #[test]
    fn unknown_attribute_errors() {
        let mut instance = Instance::instantiate(&person()).unwrap();
        assert!(matches!(
            instance.get("nope"),
            Err(ModelError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            instance.set("nope", AttrValue::Unset),
            Err(ModelError::UnknownAttribute { .. })
        ));
    }
}
