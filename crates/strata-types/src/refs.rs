//! Typed entity references and their raw string form.
//!
//! An [`EntityRef`] identifies one entity, optionally through a chain of
//! parent references. The record store only understands an opaque string
//! identifier; the [`RefCodec`] trait is the boundary where the typed form
//! and the raw form meet. [`PathRefCodec`] is the default codec, rendering
//! the chain root-first as `kind:id` segments joined by `/`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// The identifier half of a reference: numeric or named.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RefId {
    /// Store-assigned numeric identifier.
    Int(i64),
    /// Caller-assigned name.
    Name(String),
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefId::Int(n) => write!(f, "#{n}"),
            RefId::Name(s) => write!(f, "{s}"),
        }
    }
}

/// A structured reference to another entity.
///
/// References form a chain: a ref may carry a parent ref, whose raw segment
/// precedes it in the encoded path. The chain is immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    kind: String,
    id: RefId,
    parent: Option<Box<EntityRef>>,
}

impl EntityRef {
    /// Create a root-level reference.
    pub fn new(kind: impl Into<String>, id: RefId) -> Self {
        Self {
            kind: kind.into(),
            id,
            parent: None,
        }
    }

    /// Create a reference nested under `parent`.
    pub fn with_parent(parent: EntityRef, kind: impl Into<String>, id: RefId) -> Self {
        Self {
            kind: kind.into(),
            id,
            parent: Some(Box::new(parent)),
        }
    }

    /// The entity kind this reference points at.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The identifier within the kind.
    pub fn id(&self) -> &RefId {
        &self.id
    }

    /// The parent reference, if this ref is nested.
    pub fn parent(&self) -> Option<&EntityRef> {
        self.parent.as_deref()
    }

    /// Depth of the parent chain (a root ref has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.parent().map_or(0, EntityRef::depth)
    }
}

/// Converts between typed references and the raw string identifiers the
/// record store persists.
///
/// Implementations must be pure: `decode(encode(r)) == r` for every ref the
/// codec accepts, and neither direction may depend on external state.
pub trait RefCodec: Send + Sync {
    /// Render a reference as a raw store identifier.
    fn encode(&self, entity_ref: &EntityRef) -> TypeResult<String>;

    /// Parse a raw store identifier back into a typed reference.
    fn decode(&self, raw: &str) -> TypeResult<EntityRef>;
}

/// Default codec: root-first `kind:id` segments joined by `/`.
///
/// Numeric ids render as `#123`; named ids render verbatim. Kinds and names
/// must be non-empty and must not contain `/` or `:`; names must not begin
/// with `#` (that prefix marks numeric ids).
#[derive(Clone, Copy, Debug, Default)]
pub struct PathRefCodec;

impl PathRefCodec {
    fn check_kind(kind: &str) -> TypeResult<()> {
        if kind.is_empty() {
            return Err(TypeError::InvalidRefComponent {
                component: kind.to_string(),
                reason: "kind must not be empty".to_string(),
            });
        }
        if kind.contains(['/', ':']) {
            return Err(TypeError::InvalidRefComponent {
                component: kind.to_string(),
                reason: "kind must not contain '/' or ':'".to_string(),
            });
        }
        Ok(())
    }

    fn check_name(name: &str) -> TypeResult<()> {
        if name.is_empty() {
            return Err(TypeError::InvalidRefComponent {
                component: name.to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
        if name.contains(['/', ':']) {
            return Err(TypeError::InvalidRefComponent {
                component: name.to_string(),
                reason: "name must not contain '/' or ':'".to_string(),
            });
        }
        if name.starts_with('#') {
            return Err(TypeError::InvalidRefComponent {
                component: name.to_string(),
                reason: "name must not begin with '#'".to_string(),
            });
        }
        Ok(())
    }

    fn encode_into(entity_ref: &EntityRef, out: &mut String) -> TypeResult<()> {
        if let Some(parent) = entity_ref.parent() {
            Self::encode_into(parent, out)?;
            out.push('/');
        }
        Self::check_kind(entity_ref.kind())?;
        out.push_str(entity_ref.kind());
        out.push(':');
        match entity_ref.id() {
            RefId::Int(n) => {
                out.push('#');
                out.push_str(&n.to_string());
            }
            RefId::Name(name) => {
                Self::check_name(name)?;
                out.push_str(name);
            }
        }
        Ok(())
    }

    fn decode_segment(raw: &str, segment: &str) -> TypeResult<(String, RefId)> {
        let (kind, id) = segment.split_once(':').ok_or_else(|| TypeError::InvalidRef {
            raw: raw.to_string(),
            reason: format!("segment {segment:?} is missing ':'"),
        })?;
        Self::check_kind(kind).map_err(|_| TypeError::InvalidRef {
            raw: raw.to_string(),
            reason: format!("segment {segment:?} has an invalid kind"),
        })?;
        let id = if let Some(digits) = id.strip_prefix('#') {
            let n = digits.parse::<i64>().map_err(|_| TypeError::InvalidRef {
                raw: raw.to_string(),
                reason: format!("segment {segment:?} has a malformed numeric id"),
            })?;
            RefId::Int(n)
        } else {
            Self::check_name(id).map_err(|_| TypeError::InvalidRef {
                raw: raw.to_string(),
                reason: format!("segment {segment:?} has an invalid name"),
            })?;
            RefId::Name(id.to_string())
        };
        Ok((kind.to_string(), id))
    }
}

impl RefCodec for PathRefCodec {
    fn encode(&self, entity_ref: &EntityRef) -> TypeResult<String> {
        let mut out = String::new();
        Self::encode_into(entity_ref, &mut out)?;
        Ok(out)
    }

    fn decode(&self, raw: &str) -> TypeResult<EntityRef> {
        let mut current: Option<EntityRef> = None;
        for segment in raw.split('/') {
            let (kind, id) = Self::decode_segment(raw, segment)?;
            current = Some(match current {
                Some(parent) => EntityRef::with_parent(parent, kind, id),
                None => EntityRef::new(kind, id),
            });
        }
        current.ok_or_else(|| TypeError::InvalidRef {
            raw: raw.to_string(),
            reason: "empty reference string".to_string(),
        })
    }
}
