use thiserror::Error;

/// Errors produced by value-level operations.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    /// A raw reference string could not be parsed.
    #[error("invalid reference string {raw:?}: {reason}")]
    InvalidRef { raw: String, reason: String },

    /// A reference component contains characters the raw form cannot carry.
    #[error("invalid reference component {component:?}: {reason}")]
    InvalidRefComponent { component: String, reason: String },

    /// A stored value's shape does not match the declared type it is being
    /// converted into.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Non-finite floats have no stored representation.
    #[error("non-finite float {0} cannot be stored")]
    NonFiniteFloat(f64),
}

/// Result alias for value-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
