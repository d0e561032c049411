//! Scalar leaf values and their stored-form conversion rules.
//!
//! A [`Scalar`] is the value of one leaf attribute (or one element of a
//! sequence attribute) in memory. The stored form is a `serde_json::Value`;
//! conversion in either direction is driven by the attribute's declared
//! [`ScalarType`], never by sniffing the in-memory variant. Typed references
//! persist as raw strings through a [`RefCodec`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::refs::{EntityRef, RefCodec};

/// Declared type tag for a leaf attribute or sequence element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Text,
    /// A typed reference to another entity; stored as a raw string.
    Ref,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Text => "text",
            ScalarType::Ref => "ref",
        };
        f.write_str(name)
    }
}

/// One in-memory leaf value.
///
/// `Null` is a first-class value so that sequences can carry null elements
/// verbatim, and so a scalar attribute explicitly set to null is
/// representable after a load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ref(EntityRef),
}

/// Short description of a stored value's shape, for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) => format!("number {n}"),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

impl Scalar {
    /// Returns `true` if this is [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Convert a stored value into a scalar of the declared type.
    ///
    /// A stored null converts to `Scalar::Null` for every declared type.
    /// Integers widen into `Float`; every other cross-type conversion is a
    /// [`TypeError::TypeMismatch`].
    pub fn from_stored(value: &Value, ty: ScalarType, codec: &dyn RefCodec) -> TypeResult<Self> {
        let mismatch = || TypeError::TypeMismatch {
            expected: ty.to_string(),
            found: describe(value),
        };
        if value.is_null() {
            return Ok(Scalar::Null);
        }
        match ty {
            ScalarType::Bool => value.as_bool().map(Scalar::Bool).ok_or_else(mismatch),
            ScalarType::Int => value.as_i64().map(Scalar::Int).ok_or_else(mismatch),
            ScalarType::Float => value.as_f64().map(Scalar::Float).ok_or_else(mismatch),
            ScalarType::Text => value
                .as_str()
                .map(|s| Scalar::Text(s.to_string()))
                .ok_or_else(mismatch),
            ScalarType::Ref => {
                let raw = value.as_str().ok_or_else(mismatch)?;
                Ok(Scalar::Ref(codec.decode(raw)?))
            }
        }
    }

    /// Convert this scalar into its stored value, checked against the
    /// declared type.
    ///
    /// The declared-type check exists because attribute slots are dynamic:
    /// a slot can hold a variant its declaration does not allow, and that
    /// must surface as a conversion error at save time rather than corrupt
    /// the stored form.
    pub fn to_stored(&self, ty: ScalarType, codec: &dyn RefCodec) -> TypeResult<Value> {
        let mismatch = || TypeError::TypeMismatch {
            expected: ty.to_string(),
            found: self.variant_name().to_string(),
        };
        match (self, ty) {
            (Scalar::Null, _) => Ok(Value::Null),
            (Scalar::Bool(b), ScalarType::Bool) => Ok(Value::Bool(*b)),
            (Scalar::Int(n), ScalarType::Int) => Ok(Value::from(*n)),
            (Scalar::Int(n), ScalarType::Float) => Ok(Value::from(*n as f64)),
            (Scalar::Float(x), ScalarType::Float) => {
                if !x.is_finite() {
                    return Err(TypeError::NonFiniteFloat(*x));
                }
                Ok(Value::from(*x))
            }
            (Scalar::Text(s), ScalarType::Text) => Ok(Value::String(s.clone())),
            (Scalar::Ref(r), ScalarType::Ref) => Ok(Value::String(codec.encode(r)?)),
            _ => Err(mismatch()),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Ref(_) => "ref",
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<EntityRef> for Scalar {
    fn from(v: EntityRef) -> Self {
        Scalar::Ref(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::{PathRefCodec, RefId};
    use serde_json::json;

    #[test]
    fn stored_null_converts_for_every_type() {
        for ty in [
            ScalarType::Bool,
            ScalarType::Int,
            ScalarType::Float,
            ScalarType::Text,
            ScalarType::Ref,
        ] {
            let s = Scalar::from_stored(&Value::Null, ty, &PathRefCodec).unwrap();
            assert!(s.is_null());
        }
    }

    #[test]
    fn int_round_trips() {
        let stored = Scalar::Int(42).to_stored(ScalarType::Int, &PathRefCodec).unwrap();
        assert_eq!(stored, json!(42));
        let back = Scalar::from_stored(&stored, ScalarType::Int, &PathRefCodec).unwrap();
        assert_eq!(back, Scalar::Int(42));
    }

    #[test]
    fn int_widens_into_float() {
        let s = Scalar::from_stored(&json!(3), ScalarType::Float, &PathRefCodec).unwrap();
        assert_eq!(s, Scalar::Float(3.0));
        let stored = Scalar::Int(3).to_stored(ScalarType::Float, &PathRefCodec).unwrap();
        assert_eq!(stored, json!(3.0));
    }

    #[test]
    fn ref_persists_through_codec() {
        let r = EntityRef::new("Task", RefId::Int(9));
        let stored = Scalar::Ref(r.clone())
            .to_stored(ScalarType::Ref, &PathRefCodec)
            .unwrap();
        assert_eq!(stored, json!("Task:#9"));
        let back = Scalar::from_stored(&stored, ScalarType::Ref, &PathRefCodec).unwrap();
        assert_eq!(back, Scalar::Ref(r));
    }

    #[test]
    fn cross_type_conversion_fails() {
        let err = Scalar::from_stored(&json!("hello"), ScalarType::Int, &PathRefCodec);
        assert!(matches!(err, Err(TypeError::TypeMismatch { .. })));

        let err = Scalar::Text("hello".into()).to_stored(ScalarType::Bool, &PathRefCodec);
        assert!(matches!(err, Err(TypeError::TypeMismatch { .. })));
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let err = Scalar::Float(f64::NAN).to_stored(ScalarType::Float, &PathRefCodec);
        assert!(matches!(err, Err(TypeError::NonFiniteFloat(_))));
    }
}
