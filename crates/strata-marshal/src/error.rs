use strata_model::ModelError;
use strata_types::TypeError;
use thiserror::Error;

/// Errors produced by the marshaling engine.
///
/// Configuration errors (`AmbiguousPath`, `MissingConstructor`,
/// `RepeatedEmbedded`) surface at registration time and never at load/save
/// time; discovery is exhaustive and eager. Conversion and slot-shape errors
/// surface during `load`/`save` and propagate to the caller unretried.
#[derive(Debug, Error, PartialEq)]
pub enum MarshalError {
    /// Two attributes (or an attribute and a legacy alias) resolve to the
    /// same full path name.
    #[error("ambiguous mapping: class {class} binds path {path:?} more than once")]
    AmbiguousPath { class: String, path: String },

    /// An embedded class lacks no-argument construction.
    #[error("embedded class {class} has no no-argument construction")]
    MissingConstructor { class: String },

    /// An attribute is an array or dynamic sequence of embedded objects.
    #[error("attribute {attribute:?} on class {class}: repeated embedded objects are not supported")]
    RepeatedEmbedded { class: String, attribute: String },

    /// A class was used through the registry without being registered.
    #[error("class {class} is not registered")]
    Unregistered { class: String },

    /// A stored value could not be converted to or from an attribute value.
    #[error("conversion failed for path {path:?}: {source}")]
    Conversion {
        path: String,
        #[source]
        source: TypeError,
    },

    /// An attribute slot holds a value whose shape does not match the
    /// attribute's declaration.
    #[error("attribute {attribute:?} holds {found}, expected {expected}")]
    SlotShape {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An underlying model operation failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result alias for engine operations.
pub type MarshalResult<T> = Result<T, MarshalError>;
