//! Attribute slot values.
//!
//! [`AttrValue`] is what one slot of an [`Instance`](crate::Instance) holds.
//! `Unset` stands for "no value": a freshly constructed instance starts with
//! every slot unset unless its attribute declares a constructor default.
//! [`SeqValue`] is a dynamic sequence whose concrete container semantics
//! (ordering, deduplication) follow its [`SeqKind`] tag, so a value built as
//! a sorted set behaves and round-trips as one.

use std::cmp::Ordering;

use strata_types::{Scalar, SeqKind};

use crate::instance::Instance;

/// A dynamic sequence value with concrete-container semantics.
#[derive(Clone, Debug, PartialEq)]
pub struct SeqValue {
    kind: SeqKind,
    elems: Vec<Scalar>,
}

/// Total order over scalars, used to keep sorted sets sorted.
///
/// Variants order by rank (null, bool, int, float, text, ref); floats use
/// `total_cmp` so the order is total even in the presence of NaN.
fn cmp_scalars(a: &Scalar, b: &Scalar) -> Ordering {
    fn rank(s: &Scalar) -> u8 {
        match s {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::Int(_) => 2,
            Scalar::Float(_) => 3,
            Scalar::Text(_) => 4,
            Scalar::Ref(_) => 5,
        }
    }
    match (a, b) {
        (Scalar::Bool(x), Scalar::Bool(y)) => x.cmp(y),
        (Scalar::Int(x), Scalar::Int(y)) => x.cmp(y),
        (Scalar::Float(x), Scalar::Float(y)) => x.total_cmp(y),
        (Scalar::Text(x), Scalar::Text(y)) => x.cmp(y),
        (Scalar::Ref(x), Scalar::Ref(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

impl SeqValue {
    /// Create an empty sequence of the given concrete kind.
    pub fn new(kind: SeqKind) -> Self {
        Self {
            kind,
            elems: Vec::new(),
        }
    }

    /// Build a sequence from elements, applying the kind's semantics
    /// (deduplication for sets, sorting for sorted sets).
    pub fn from_elems(kind: SeqKind, elems: impl IntoIterator<Item = Scalar>) -> Self {
        let mut seq = Self::new(kind);
        for elem in elems {
            seq.push(elem);
        }
        seq
    }

    /// Append one element, honoring the kind's semantics.
    ///
    /// Lists and deques keep every element in insertion order. Sets drop
    /// duplicates and keep insertion order. Sorted sets drop duplicates and
    /// keep elements sorted.
    pub fn push(&mut self, elem: Scalar) {
        match self.kind {
            SeqKind::List | SeqKind::Deque => self.elems.push(elem),
            SeqKind::Set => {
                if !self.elems.contains(&elem) {
                    self.elems.push(elem);
                }
            }
            SeqKind::SortedSet => {
                if let Err(pos) = self
                    .elems
                    .binary_search_by(|probe| cmp_scalars(probe, &elem))
                {
                    self.elems.insert(pos, elem);
                }
            }
        }
    }

    /// The concrete-container kind of this sequence.
    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    /// The elements, in container order.
    pub fn elems(&self) -> &[Scalar] {
        &self.elems
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns `true` if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Returns `true` if the sequence contains the element.
    pub fn contains(&self, elem: &Scalar) -> bool {
        self.elems.contains(elem)
    }
}

/// The value held by one attribute slot.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// No value. The state of a fresh slot without a declared default, and
    /// of a scalar slot loaded from a stored null.
    Unset,
    /// A leaf scalar.
    Scalar(Scalar),
    /// A fixed-size sequence of scalars.
    Array(Vec<Scalar>),
    /// A dynamic sequence/set of scalars.
    Seq(SeqValue),
    /// A single embedded sub-object.
    Embedded(Instance),
}

impl AttrValue {
    /// Returns `true` if the slot holds no value.
    pub fn is_unset(&self) -> bool {
        matches!(self, AttrValue::Unset)
    }

    /// Short name of the variant, for error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            AttrValue::Unset => "unset",
            AttrValue::Scalar(_) => "scalar",
            AttrValue::Array(_) => "array",
            AttrValue::Seq(_) => "sequence",
            AttrValue::Embedded(_) => "embedded object",
        }
    }
}

impl From<Scalar> for AttrValue {
    fn from(s: Scalar) -> Self {
        AttrValue::Scalar(s)
    }
}

impl From<SeqValue> for AttrValue {
    fn from(s: SeqValue) -> Self {
        AttrValue::Seq(s)
    }
}
