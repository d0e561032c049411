//! Leaf conversion: one flat property to/from one attribute's value.
//!
//! A [`Loader`] is bound at discovery time to a navigator, a target
//! attribute, and an indexing flag; its [`LoaderKind`] picks the conversion
//! rules. The null/empty rules live here:
//!
//! - scalars persist null (and load a stored null back to unset),
//! - fixed-size sequences and dynamic sequences never persist null or
//!   empty values,
//! - a dynamic sequence loaded from an absent or empty stored value leaves
//!   the attribute's current value untouched.

use serde_json::Value;
use strata_model::{AttrValue, Instance, SeqValue};
use strata_types::{Property, RefCodec, Scalar, ScalarType, SeqKind, TypeError};

use crate::error::{MarshalError, MarshalResult};
use crate::navigator::Navigator;

/// Conversion variant, chosen once at discovery by declared shape.
#[derive(Clone, Debug, PartialEq)]
pub enum LoaderKind {
    /// One leaf value.
    Scalar { ty: ScalarType },
    /// A fixed-size sequence of leaf values.
    Array { elem: ScalarType },
    /// A dynamic sequence/set. `declared` pins the concrete container kind;
    /// `None` defers to the type tag recorded in the stored property.
    Seq {
        elem: ScalarType,
        declared: Option<SeqKind>,
    },
}

/// A leaf converter bound to its navigator and target attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Loader {
    navigator: Navigator,
    attribute: String,
    indexed: bool,
    kind: LoaderKind,
}

fn conversion(path: &str, source: TypeError) -> MarshalError {
    MarshalError::Conversion {
        path: path.to_string(),
        source,
    }
}

impl Loader {
    /// Bind a converter. `indexed` is the already-resolved indexing flag
    /// (force-unindexed propagation happens during discovery).
    pub fn new(
        navigator: Navigator,
        attribute: impl Into<String>,
        indexed: bool,
        kind: LoaderKind,
    ) -> Self {
        Self {
            navigator,
            attribute: attribute.into(),
            indexed,
            kind,
        }
    }

    /// The target attribute name (the final path segment).
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Whether the emitted property asks for a secondary index.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// The conversion variant.
    pub fn kind(&self) -> &LoaderKind {
        &self.kind
    }

    /// Load one stored property into the attribute.
    ///
    /// Conversion runs before navigation, so a malformed stored value never
    /// mutates the object graph. `path` is the full path the property was
    /// matched under, used for error context only.
    pub fn load(
        &self,
        root: &mut Instance,
        path: &str,
        property: &Property,
        codec: &dyn RefCodec,
    ) -> MarshalResult<()> {
        match &self.kind {
            LoaderKind::Scalar { ty } => {
                let scalar = Scalar::from_stored(&property.value, *ty, codec)
                    .map_err(|e| conversion(path, e))?;
                let value = if scalar.is_null() {
                    AttrValue::Unset
                } else {
                    AttrValue::Scalar(scalar)
                };
                let owner = self.navigator.resolve_mut(root)?;
                owner.set(&self.attribute, value)?;
                Ok(())
            }
            LoaderKind::Array { elem } => {
                if property.value.is_null() {
                    let owner = self.navigator.resolve_mut(root)?;
                    owner.set(&self.attribute, AttrValue::Unset)?;
                    return Ok(());
                }
                let elems = self.stored_elems(path, &property.value, *elem, codec)?;
                let owner = self.navigator.resolve_mut(root)?;
                owner.set(&self.attribute, AttrValue::Array(elems))?;
                Ok(())
            }
            LoaderKind::Seq { elem, declared } => {
                // Absent or empty stored sequences leave the attribute's
                // current value (and identity) alone.
                if property.value.is_null() {
                    return Ok(());
                }
                let elems = self.stored_elems(path, &property.value, *elem, codec)?;
                if elems.is_empty() {
                    return Ok(());
                }
                let kind = (*declared).or(property.seq_kind).unwrap_or(SeqKind::List);
                let seq = SeqValue::from_elems(kind, elems);
                let owner = self.navigator.resolve_mut(root)?;
                owner.set(&self.attribute, AttrValue::Seq(seq))?;
                Ok(())
            }
        }
    }

    /// Produce this attribute's flat property, or nothing per the
    /// null/empty rules. Never mutates the graph.
    pub fn save(
        &self,
        root: &Instance,
        path: &str,
        codec: &dyn RefCodec,
    ) -> MarshalResult<Option<Property>> {
        let slot = match self.navigator.resolve_ref(root)? {
            Some(owner) => Some(owner.get(&self.attribute)?),
            None => None,
        };
        match &self.kind {
            LoaderKind::Scalar { ty } => {
                let value = match slot {
                    None | Some(AttrValue::Unset) => Value::Null,
                    Some(AttrValue::Scalar(s)) => {
                        s.to_stored(*ty, codec).map_err(|e| conversion(path, e))?
                    }
                    Some(other) => return Err(self.slot_shape("scalar", other)),
                };
                Ok(Some(Property::new(value).indexed(self.indexed)))
            }
            LoaderKind::Array { elem } => match slot {
                None | Some(AttrValue::Unset) => Ok(None),
                Some(AttrValue::Array(elems)) => {
                    if elems.is_empty() {
                        return Ok(None);
                    }
                    let values = self.memory_elems(path, elems, *elem, codec)?;
                    Ok(Some(Property::new(Value::Array(values)).indexed(self.indexed)))
                }
                Some(other) => Err(self.slot_shape("array", other)),
            },
            LoaderKind::Seq { elem, .. } => match slot {
                None | Some(AttrValue::Unset) => Ok(None),
                Some(AttrValue::Seq(seq)) => {
                    if seq.is_empty() {
                        return Ok(None);
                    }
                    let values = self.memory_elems(path, seq.elems(), *elem, codec)?;
                    Ok(Some(
                        Property::new(Value::Array(values))
                            .indexed(self.indexed)
                            .with_seq_kind(seq.kind()),
                    ))
                }
                Some(other) => Err(self.slot_shape("sequence", other)),
            },
        }
    }

    /// Element-wise conversion from stored form, preserving null elements.
    fn stored_elems(
        &self,
        path: &str,
        value: &Value,
        elem: ScalarType,
        codec: &dyn RefCodec,
    ) -> MarshalResult<Vec<Scalar>> {
        let items = value.as_array().ok_or_else(|| {
            conversion(
                path,
                TypeError::TypeMismatch {
                    expected: format!("array of {elem}"),
                    found: "scalar".to_string(),
                },
            )
        })?;
        items
            .iter()
            .map(|item| Scalar::from_stored(item, elem, codec).map_err(|e| conversion(path, e)))
            .collect()
    }

    /// Element-wise conversion to stored form, preserving null elements.
    fn memory_elems(
        &self,
        path: &str,
        elems: &[Scalar],
        elem: ScalarType,
        codec: &dyn RefCodec,
    ) -> MarshalResult<Vec<Value>> {
        elems
            .iter()
            .map(|s| s.to_stored(elem, codec).map_err(|e| conversion(path, e)))
            .collect()
    }

    fn slot_shape(&self, expected: &'static str, found: &AttrValue) -> MarshalError {
        MarshalError::SlotShape {
            attribute: self.attribute.clone(),
            expected,
            found: found.variant_name(),
        }
    }
}
